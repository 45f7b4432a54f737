use crate::{Edge, Node};
use egui::{pos2, vec2, Pos2, Rect, Vec2};

/// Rendered node size in canvas units
pub const NODE_SIZE: Vec2 = Vec2::new(150.0, 40.0);
/// Radius of the connect handles drawn on each node
pub const HANDLE_RADIUS: f32 = 5.0;

pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 5.0;

/// Pan/zoom transform between canvas and screen space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Screen-space offset of the canvas origin, relative to the surface's top-left
    pub offset: Vec2,
    pub zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    /// Convert canvas coordinates to screen coordinates
    pub fn canvas_to_screen(&self, pos: Pos2, surface: Rect) -> Pos2 {
        surface.left_top() + vec2(pos.x * self.zoom, pos.y * self.zoom) + self.offset
    }

    /// Convert screen coordinates to canvas coordinates
    pub fn screen_to_canvas(&self, pos: Pos2, surface: Rect) -> Pos2 {
        let relative = pos - surface.left_top() - self.offset;
        pos2(relative.x / self.zoom, relative.y / self.zoom)
    }

    pub fn canvas_to_screen_rect(&self, rect: Rect, surface: Rect) -> Rect {
        Rect::from_two_pos(
            self.canvas_to_screen(rect.min, surface),
            self.canvas_to_screen(rect.max, surface),
        )
    }

    /// Zoom by `factor`, keeping the canvas point under `anchor` fixed on screen
    pub fn zoom_around(&mut self, factor: f32, anchor: Pos2, surface: Rect) {
        let before = self.screen_to_canvas(anchor, surface);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let after = self.canvas_to_screen(before, surface);
        self.offset += anchor - after;
    }

    /// Centre `bounds` in the surface at the largest zoom that fits, capped at 1.0
    pub fn fit(&mut self, bounds: Rect, surface: Rect, padding: f32) {
        if !bounds.is_positive() {
            return;
        }
        let avail = surface.size() - vec2(padding * 2.0, padding * 2.0);
        let zoom = (avail.x / bounds.width())
            .min(avail.y / bounds.height())
            .clamp(MIN_ZOOM, 1.0);

        self.zoom = zoom;
        self.offset = surface.size() * 0.5 - bounds.center().to_vec2() * zoom;
    }
}

/// Canvas-space rectangle a node occupies
pub fn node_rect(node: &Node) -> Rect {
    Rect::from_min_size(pos2(node.position.x, node.position.y), NODE_SIZE)
}

/// Source handle (bottom centre) of a node, canvas space
pub fn source_handle(node: &Node) -> Pos2 {
    node_rect(node).center_bottom()
}

/// Target handle (top centre) of a node, canvas space
pub fn target_handle(node: &Node) -> Pos2 {
    node_rect(node).center_top()
}

/// Bounding box of all nodes
pub fn graph_bounds(nodes: &[Node]) -> Option<Rect> {
    nodes.iter().map(node_rect).reduce(|acc, r| acc.union(r))
}

/// Topmost node under `point`; later nodes draw on top
pub fn hit_node(nodes: &[Node], point: Pos2) -> Option<&Node> {
    nodes.iter().rev().find(|n| node_rect(n).contains(point))
}

/// Node whose source handle is within `tolerance` of `point`
pub fn hit_source_handle(nodes: &[Node], point: Pos2, tolerance: f32) -> Option<&Node> {
    nodes
        .iter()
        .rev()
        .find(|n| source_handle(n).distance(point) <= tolerance)
}

/// Closest edge within `tolerance` of `point`
pub fn hit_edge<'a>(
    nodes: &[Node],
    edges: &'a [Edge],
    point: Pos2,
    tolerance: f32,
) -> Option<&'a Edge> {
    edges
        .iter()
        .filter_map(|edge| {
            let (from, to) = edge_endpoints(nodes, edge)?;
            let distance = distance_to_segment(point, from, to);
            (distance <= tolerance).then_some((edge, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(edge, _)| edge)
}

/// Canvas-space line an edge is drawn along, if both endpoints exist
pub fn edge_endpoints(nodes: &[Node], edge: &Edge) -> Option<(Pos2, Pos2)> {
    let source = nodes.iter().find(|n| n.id == edge.source)?;
    let target = nodes.iter().find(|n| n.id == edge.target)?;
    Some((source_handle(source), target_handle(target)))
}

pub fn distance_to_segment(point: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq == 0.0 {
        return point.distance(a);
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    point.distance(a + ab * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow_state::{initial_edges, initial_nodes};

    fn surface() -> Rect {
        Rect::from_min_size(pos2(100.0, 50.0), vec2(800.0, 600.0))
    }

    #[test]
    fn test_screen_canvas_roundtrip() {
        let view = Viewport {
            offset: vec2(30.0, -20.0),
            zoom: 2.0,
        };
        let canvas = pos2(12.5, 40.0);
        let screen = view.canvas_to_screen(canvas, surface());

        assert_eq!(screen, pos2(100.0 + 25.0 + 30.0, 50.0 + 80.0 - 20.0));
        assert_eq!(view.screen_to_canvas(screen, surface()), canvas);
    }

    #[test]
    fn test_zoom_is_clamped_and_anchored() {
        let mut view = Viewport::default();
        let anchor = pos2(300.0, 200.0);
        let under_anchor = view.screen_to_canvas(anchor, surface());

        view.zoom_around(100.0, anchor, surface());
        assert_eq!(view.zoom, MAX_ZOOM);
        let moved = view.canvas_to_screen(under_anchor, surface());
        assert!(moved.distance(anchor) < 1e-3);

        view.zoom_around(0.0001, anchor, surface());
        assert_eq!(view.zoom, MIN_ZOOM);
    }

    #[test]
    fn test_fit_centres_graph() {
        let nodes = initial_nodes();
        let bounds = graph_bounds(&nodes).unwrap();
        let mut view = Viewport::default();

        view.fit(bounds, surface(), 20.0);

        assert_eq!(view.zoom, 1.0);
        let centre = view.canvas_to_screen(bounds.center(), surface());
        assert!(centre.distance(surface().center()) < 1e-3);
    }

    #[test]
    fn test_graph_bounds() {
        let bounds = graph_bounds(&initial_nodes()).unwrap();

        assert_eq!(bounds.min, pos2(0.0, 0.0));
        assert_eq!(bounds.max, pos2(150.0, 240.0));
        assert!(graph_bounds(&[]).is_none());
    }

    #[test]
    fn test_hit_node() {
        let nodes = initial_nodes();

        assert_eq!(hit_node(&nodes, pos2(10.0, 110.0)).map(|n| n.id.as_str()), Some("2"));
        assert!(hit_node(&nodes, pos2(10.0, 60.0)).is_none());
    }

    #[test]
    fn test_hit_source_handle() {
        let nodes = initial_nodes();

        let hit = hit_source_handle(&nodes, pos2(75.0, 41.0), HANDLE_RADIUS);
        assert_eq!(hit.map(|n| n.id.as_str()), Some("1"));
        assert!(hit_source_handle(&nodes, pos2(10.0, 10.0), HANDLE_RADIUS).is_none());
    }

    #[test]
    fn test_hit_edge() {
        let nodes = initial_nodes();
        let edges = initial_edges();

        // e1-2 runs from (75, 40) to (75, 100)
        let hit = hit_edge(&nodes, &edges, pos2(78.0, 70.0), 5.0);
        assert_eq!(hit.map(|e| e.id.as_str()), Some("e1-2"));
        assert!(hit_edge(&nodes, &edges, pos2(120.0, 70.0), 5.0).is_none());
    }

    #[test]
    fn test_distance_to_segment() {
        let a = pos2(0.0, 0.0);
        let b = pos2(10.0, 0.0);

        assert_eq!(distance_to_segment(pos2(5.0, 3.0), a, b), 3.0);
        assert_eq!(distance_to_segment(pos2(-4.0, 3.0), a, b), 5.0);
        assert_eq!(distance_to_segment(pos2(1.0, 1.0), a, a), 2f32.sqrt());
    }
}
