//! Edge id generation for connect gestures
//! Sequential ids read like the seeded ones ("e1-3"), falling back to a
//! base-36 counter suffix ("e1-3-00", "e1-3-01", ...) when the plain form is taken

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use ulid::Ulid;

const CHARS: &[char] = &[
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J',
    'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T',
    'U', 'V', 'W', 'X', 'Y', 'Z',
];

/// How fresh edge ids are produced
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EdgeIdStrategy {
    /// Readable ids with a monotonic counter suffix on collision
    #[default]
    Sequential,
    /// Always suffix with a ULID
    Ulid,
}

impl std::str::FromStr for EdgeIdStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(EdgeIdStrategy::Sequential),
            "ulid" => Ok(EdgeIdStrategy::Ulid),
            other => Err(anyhow::anyhow!("Unknown edge id strategy: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IdGenerator {
    strategy: EdgeIdStrategy,
    /// Current suffix length (starts at 2)
    length: usize,
    /// Counter for next suffix
    counter: u64,
    /// Maximum value before needing to expand
    max_value: u64,
}

impl IdGenerator {
    pub fn new(strategy: EdgeIdStrategy) -> Self {
        Self::with_length(strategy, 2)
    }

    pub fn with_length(strategy: EdgeIdStrategy, length: usize) -> Self {
        let max_value = (CHARS.len() as u64).pow(length as u32);
        Self {
            strategy,
            length,
            counter: 0,
            max_value,
        }
    }

    pub fn strategy(&self) -> EdgeIdStrategy {
        self.strategy
    }

    /// Produce an id for an edge `source -> target` that is not in `existing`
    pub fn edge_id(&mut self, source: &str, target: &str, existing: &HashSet<&str>) -> String {
        let base = format!("e{}-{}", source, target);

        if self.strategy == EdgeIdStrategy::Sequential && !existing.contains(base.as_str()) {
            return base;
        }

        loop {
            let candidate = match self.strategy {
                EdgeIdStrategy::Sequential => format!("{}-{}", base, self.next_suffix()),
                EdgeIdStrategy::Ulid => format!("{}-{}", base, Ulid::new()),
            };
            if !existing.contains(candidate.as_str()) {
                return candidate;
            }
        }
    }

    /// Generate the next counter suffix
    pub fn next_suffix(&mut self) -> String {
        if self.counter >= self.max_value {
            self.expand();
        }

        let id = self.encode(self.counter);
        self.counter += 1;
        id
    }

    /// Encode a number to base-36 alphanumeric string
    fn encode(&self, mut num: u64) -> String {
        let base = CHARS.len() as u64;
        let mut result = Vec::new();

        for _ in 0..self.length {
            let digit = (num % base) as usize;
            result.push(CHARS[digit]);
            num /= base;
        }

        result.reverse();
        result.into_iter().collect()
    }

    /// Expand to the next length
    fn expand(&mut self) {
        self.length += 1;
        self.max_value = (CHARS.len() as u64).pow(self.length as u32);
        // Longer suffixes never collide with shorter ones
        self.counter = 0;
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(EdgeIdStrategy::default())
    }
}
