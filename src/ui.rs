use crate::{
    gestures::{removal_changes, selection_changes, ClickTarget},
    viewport::{
        edge_endpoints, graph_bounds, hit_edge, hit_node, hit_source_handle, node_rect,
        source_handle, target_handle, Viewport, HANDLE_RADIUS,
    },
    Adjacency, AdjacencyError, ChangeKind, Connection, Direction, EdgeIdStrategy, FlowConfig,
    FlowState, NodeChange, Position, Theme,
};
use egui::{
    epaint::PathShape, pos2, vec2, Align, Align2, Color32, FontId, Key, Layout, Pos2, Rect,
    Sense, Stroke, Vec2,
};
use std::path::PathBuf;

const FIT_PADDING: f32 = 40.0;
const MINIMAP_SIZE: Vec2 = Vec2::new(180.0, 120.0);

/// Main application state
pub struct FlowEditorApp {
    /// The diagram's node and edge collections
    state: FlowState,

    config: FlowConfig,

    /// Where "Save settings" writes to
    config_path: PathBuf,

    /// Theme the egui context currently has
    applied_theme: Option<Theme>,

    active_page: Page,

    viewport: Viewport,

    ui_state: UiState,

    /// Status message
    status_message: String,
}

#[derive(Default)]
struct UiState {
    /// Node being dragged (moved)
    dragging_node: Option<String>,

    /// Offset from pointer to node origin when drag started
    drag_offset: Option<Vec2>,

    /// Source node of an in-progress connect gesture
    connecting_from: Option<String>,

    /// Canvas-space pointer while connecting
    connect_pointer: Option<Pos2>,

    /// Fit the graph on the next frame
    needs_fit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Home,
    Settings,
}

impl Default for FlowEditorApp {
    fn default() -> Self {
        Self::new(FlowConfig::default(), FlowConfig::config_file_path())
    }
}

impl FlowEditorApp {
    pub fn new(config: FlowConfig, config_path: PathBuf) -> Self {
        Self {
            state: FlowState::with_strategy(config.edge_ids),
            config,
            config_path,
            applied_theme: None,
            active_page: Page::Home,
            viewport: Viewport::default(),
            ui_state: UiState {
                needs_fit: true,
                ..Default::default()
            },
            status_message: "Drag nodes, connect handles, press Delete to remove".to_string(),
        }
    }

    /// Read-only access to the diagram
    pub fn state(&self) -> &FlowState {
        &self.state
    }

    fn apply_theme(&mut self, ctx: &egui::Context) {
        if self.applied_theme == Some(self.config.theme) {
            return;
        }
        let visuals = if self.config.theme.is_dark() {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        ctx.set_visuals(visuals);
        self.applied_theme = Some(self.config.theme);
    }

    fn save_settings(&mut self) {
        match self.config.save(&self.config_path) {
            Ok(()) => {
                tracing::info!(path = %self.config_path.display(), "saved settings");
                self.status_message = format!("✓ Settings saved to {}", self.config_path.display());
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to save settings");
                self.status_message = format!("❌ Save failed: {:#}", e);
            }
        }
    }

    /// Render the entire UI
    fn render_ui(&mut self, ctx: &egui::Context) {
        self.apply_theme(ctx);

        // Header bar
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("☰").on_hover_text("Toggle sidebar").clicked() {
                    self.config.sidebar_open = !self.config.sidebar_open;
                }
                ui.heading("OGBT Application");

                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    let icon = if self.config.theme.is_dark() { "☀" } else { "🌙" };
                    if ui.button(icon).on_hover_text("Toggle theme").clicked() {
                        self.config.theme = self.config.theme.toggled();
                    }
                });
            });
        });

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.status_message);
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    ui.label(format!("Zoom: {:.0}%", self.viewport.zoom * 100.0));
                    ui.label(format!("Edges: {}", self.state.edge_count()));
                    ui.label(format!("Nodes: {}", self.state.node_count()));
                });
            });
        });

        // Sidebar
        egui::SidePanel::left("sidebar")
            .resizable(false)
            .default_width(220.0)
            .show_animated(ctx, self.config.sidebar_open, |ui| {
                self.render_sidebar(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| match self.active_page {
            Page::Home => self.render_home(ui),
            Page::Settings => self.render_settings(ui),
        });
    }

    fn render_sidebar(&mut self, ui: &mut egui::Ui) {
        ui.add_space(8.0);
        ui.strong("Navigation");
        ui.selectable_value(&mut self.active_page, Page::Home, "🏠 Home");
        ui.selectable_value(&mut self.active_page, Page::Settings, "⚙ Settings");

        ui.separator();
        ui.strong("Selection");

        let selected: Vec<_> = self.state.selected_nodes().cloned().collect();
        let selected_edges: Vec<_> = self.state.selected_edges().cloned().collect();

        if selected.is_empty() && selected_edges.is_empty() {
            ui.weak("Nothing selected");
        }

        for node in &selected {
            ui.label(format!("Node {} · {}", node.id, node.label()));
            ui.small(format!("at ({:.0}, {:.0})", node.position.x, node.position.y));
            self.render_neighbors(ui, &node.id);
        }

        for edge in &selected_edges {
            ui.label(format!("Edge {}", edge.id));
            ui.small(format!("{} → {}", edge.source, edge.target));
        }

        ui.separator();
        ui.strong("Recent changes");
        let history = self.state.history();
        if history.is_empty() {
            ui.weak("No changes yet");
        }
        for record in history.iter().rev().take(5) {
            let text = match &record.kind {
                ChangeKind::NodesChanged { applied, skipped } => {
                    format!("nodes: {} applied, {} skipped", applied, skipped)
                }
                ChangeKind::EdgesChanged { applied, skipped } => {
                    format!("edges: {} applied, {} skipped", applied, skipped)
                }
                ChangeKind::Connected { edge_id, .. } => format!("connected {}", edge_id),
            };
            ui.small(format!("{} {}", record.at.format("%H:%M:%S"), text));
        }
    }

    /// Outgoing and incoming neighbours of a node
    fn render_neighbors(&self, ui: &mut egui::Ui, node_id: &str) {
        let nodes = self.state.nodes();
        let Some(index) = nodes.iter().position(|n| n.id == node_id) else {
            return;
        };

        let describe = |direction: Direction| -> Result<String, AdjacencyError> {
            let adjacency = Adjacency::from_flow(nodes, self.state.edges(), direction)?;
            let names: Vec<&str> = adjacency
                .neighbors(index as u32)
                .iter()
                .map(|&i| nodes[i as usize].label())
                .collect();
            Ok(if names.is_empty() {
                "none".to_string()
            } else {
                names.join(", ")
            })
        };

        match (describe(Direction::Forward), describe(Direction::Reverse)) {
            (Ok(outgoing), Ok(incoming)) => {
                ui.small(format!("→ {}", outgoing));
                ui.small(format!("← {}", incoming));
            }
            (Err(e), _) | (_, Err(e)) => {
                ui.colored_label(Color32::from_rgb(255, 165, 0), format!("⚠ {}", e));
            }
        }
    }

    fn render_home(&mut self, ui: &mut egui::Ui) {
        ui.heading("Welcome to OGBT");
        ui.weak("An interactive node diagram hosted in a sidebar layout");
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            for (title, blurb) in [
                ("Flow editor", "Interactive node-based diagrams"),
                ("Sidebar layout", "Collapsible navigation"),
                ("Themes", "Light and dark modes"),
            ] {
                egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.set_width(180.0);
                    ui.strong(title);
                    ui.small(blurb);
                });
            }
        });

        ui.add_space(12.0);
        ui.heading("Flow Demo");
        self.render_flow(ui);
    }

    fn render_settings(&mut self, ui: &mut egui::Ui) {
        ui.heading("Settings");
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            ui.label("Theme:");
            ui.radio_value(&mut self.config.theme, Theme::Light, "Light");
            ui.radio_value(&mut self.config.theme, Theme::Dark, "Dark");
        });
        ui.checkbox(&mut self.config.sidebar_open, "Sidebar open");
        ui.checkbox(&mut self.config.show_minimap, "Show minimap");
        ui.checkbox(&mut self.config.show_controls, "Show zoom controls");
        ui.add(egui::Slider::new(&mut self.config.background_gap, 4.0..=48.0).text("Background gap"));
        ui.horizontal(|ui| {
            ui.label("Edge ids:");
            ui.radio_value(&mut self.config.edge_ids, EdgeIdStrategy::Sequential, "Sequential");
            ui.radio_value(&mut self.config.edge_ids, EdgeIdStrategy::Ulid, "ULID");
        });
        if self.config.edge_ids != self.state.edge_id_strategy() {
            ui.label(format!(
                "Current session uses {:?} ids; saved choice applies on restart",
                self.state.edge_id_strategy()
            ));
        }

        ui.add_space(8.0);
        if ui.button("💾 Save settings").clicked() {
            self.save_settings();
        }
    }

    // ========== Flow surface ==========

    fn render_flow(&mut self, ui: &mut egui::Ui) {
        let size = vec2(ui.available_width(), ui.available_height().max(320.0));
        let (response, painter) = ui.allocate_painter(size, Sense::click_and_drag());
        let surface = response.rect;

        if self.ui_state.needs_fit {
            self.fit_view(surface);
            self.ui_state.needs_fit = false;
        }

        let pointer_canvas = response
            .interact_pointer_pos()
            .or(response.hover_pos())
            .map(|p| self.viewport.screen_to_canvas(p, surface));

        // Zoom with scroll
        if response.hovered() {
            let scroll_delta = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll_delta != 0.0 {
                if let Some(anchor) = response.hover_pos() {
                    self.viewport
                        .zoom_around((scroll_delta * 0.002).exp(), anchor, surface);
                }
            }
        }

        let hit_tolerance = HANDLE_RADIUS * 2.0 / self.viewport.zoom;

        if response.drag_started() {
            let origin = ui
                .input(|i| i.pointer.press_origin())
                .map(|p| self.viewport.screen_to_canvas(p, surface));
            if let Some(origin) = origin {
                self.begin_drag(origin, hit_tolerance);
            }
        }

        if response.dragged() {
            if let (Some(id), Some(offset), Some(pointer)) = (
                self.ui_state.dragging_node.clone(),
                self.ui_state.drag_offset,
                pointer_canvas,
            ) {
                let position =
                    Position::new(pointer.x, pointer.y).translated(-offset.x, -offset.y);
                self.state.on_nodes_change(&[NodeChange::position(id, position)]);
            } else if self.ui_state.connecting_from.is_some() {
                self.ui_state.connect_pointer = pointer_canvas;
            } else {
                self.viewport.offset += response.drag_delta();
            }
        }

        if response.drag_stopped() {
            self.finish_drag(pointer_canvas);
        }

        if response.clicked() {
            if let Some(point) = pointer_canvas {
                self.click_at(point, hit_tolerance);
            }
        }

        if response.hovered()
            && ui.input(|i| i.key_pressed(Key::Delete) || i.key_pressed(Key::Backspace))
        {
            self.delete_selection();
        }

        // Draw
        painter.rect_filled(surface, 8.0, ui.visuals().extreme_bg_color);
        self.draw_background(&painter, surface, ui.visuals());
        self.draw_edges(&painter, surface, ui.visuals());
        self.draw_pending_connection(&painter, surface, ui.visuals());
        self.draw_nodes(&painter, surface, ui.visuals());

        if self.config.show_minimap {
            self.draw_minimap(&painter, surface, ui.visuals());
        }
        if self.config.show_controls {
            self.render_controls(ui, surface);
        }
    }

    fn fit_view(&mut self, surface: Rect) {
        if let Some(bounds) = graph_bounds(self.state.nodes()) {
            self.viewport.fit(bounds, surface, FIT_PADDING);
        }
    }

    fn begin_drag(&mut self, origin: Pos2, tolerance: f32) {
        let nodes = self.state.nodes();
        if let Some(node) = hit_source_handle(nodes, origin, tolerance) {
            self.ui_state.connecting_from = Some(node.id.clone());
            self.ui_state.connect_pointer = Some(origin);
        } else if let Some(node) = hit_node(nodes, origin) {
            self.ui_state.drag_offset = Some(vec2(
                origin.x - node.position.x,
                origin.y - node.position.y,
            ));
            self.ui_state.dragging_node = Some(node.id.clone());
        }
    }

    fn finish_drag(&mut self, pointer: Option<Pos2>) {
        if let Some(source) = self.ui_state.connecting_from.take() {
            let target = pointer
                .and_then(|p| hit_node(self.state.nodes(), p))
                .map(|n| n.id.clone());

            match target {
                Some(target) => {
                    let connection = Connection::new(source, target)
                        .with_handles(Some("bottom".to_string()), Some("top".to_string()));
                    let self_loop = connection.is_self_loop();
                    let edge_id = self.state.on_connect(connection);
                    self.status_message = if self_loop {
                        format!("🔁 Created self-loop {}", edge_id)
                    } else {
                        format!("🔗 Created edge {}", edge_id)
                    };
                }
                None => {
                    self.status_message = "Connection cancelled".to_string();
                }
            }
        }

        self.ui_state.dragging_node = None;
        self.ui_state.drag_offset = None;
        self.ui_state.connect_pointer = None;
    }

    fn click_at(&mut self, point: Pos2, tolerance: f32) {
        let target = if let Some(node) = hit_node(self.state.nodes(), point) {
            ClickTarget::Node(node.id.clone())
        } else if let Some(edge) = hit_edge(self.state.nodes(), self.state.edges(), point, tolerance)
        {
            ClickTarget::Edge(edge.id.clone())
        } else {
            ClickTarget::Empty
        };

        let (node_changes, edge_changes) = selection_changes(&self.state, &target);
        self.state.on_nodes_change(&node_changes);
        self.state.on_edges_change(&edge_changes);
    }

    fn delete_selection(&mut self) {
        let (node_changes, edge_changes) = removal_changes(&self.state);
        if node_changes.is_empty() && edge_changes.is_empty() {
            return;
        }
        self.state.on_nodes_change(&node_changes);
        self.state.on_edges_change(&edge_changes);
        self.status_message = format!(
            "🗑 Removed {} nodes, {} edges",
            node_changes.len(),
            edge_changes.len()
        );
    }

    /// Dotted background
    fn draw_background(&self, painter: &egui::Painter, surface: Rect, visuals: &egui::Visuals) {
        let spacing = self.config.background_gap * self.viewport.zoom;
        if spacing < 4.0 {
            return;
        }
        let dot_color = visuals.widgets.noninteractive.bg_stroke.color;

        let start_x = surface.left() + self.viewport.offset.x.rem_euclid(spacing);
        let start_y = surface.top() + self.viewport.offset.y.rem_euclid(spacing);

        let mut x = start_x;
        while x < surface.right() {
            let mut y = start_y;
            while y < surface.bottom() {
                painter.circle_filled(pos2(x, y), 1.0, dot_color);
                y += spacing;
            }
            x += spacing;
        }
    }

    fn draw_edges(&self, painter: &egui::Painter, surface: Rect, visuals: &egui::Visuals) {
        let nodes = self.state.nodes();
        for edge in self.state.edges() {
            // Edges to removed nodes stay in the collection but have nowhere to draw
            let Some((from, to)) = edge_endpoints(nodes, edge) else {
                continue;
            };
            let color = if edge.selected {
                visuals.selection.stroke.color
            } else {
                visuals.widgets.inactive.fg_stroke.color
            };
            self.draw_arrow(
                painter,
                self.viewport.canvas_to_screen(from, surface),
                self.viewport.canvas_to_screen(to, surface),
                color,
            );
        }
    }

    fn draw_arrow(&self, painter: &egui::Painter, from: Pos2, to: Pos2, color: Color32) {
        let stroke = Stroke::new(2.0, color);
        painter.line_segment([from, to], stroke);

        if from.distance(to) < f32::EPSILON {
            return;
        }
        let dir = (to - from).normalized();
        let perpendicular = vec2(-dir.y, dir.x);
        let arrow_size = 8.0 * self.viewport.zoom.max(0.5);

        let point1 = to - dir * arrow_size + perpendicular * arrow_size * 0.5;
        let point2 = to - dir * arrow_size - perpendicular * arrow_size * 0.5;
        painter.add(PathShape::convex_polygon(vec![to, point1, point2], color, stroke));
    }

    fn draw_pending_connection(&self, painter: &egui::Painter, surface: Rect, visuals: &egui::Visuals) {
        let (Some(source_id), Some(pointer)) =
            (&self.ui_state.connecting_from, self.ui_state.connect_pointer)
        else {
            return;
        };
        let Some(source) = self.state.get_node(source_id) else {
            return;
        };
        let from = self.viewport.canvas_to_screen(source_handle(source), surface);
        let to = self.viewport.canvas_to_screen(pointer, surface);
        painter.extend(egui::Shape::dashed_line(
            &[from, to],
            Stroke::new(1.5, visuals.selection.stroke.color),
            6.0,
            4.0,
        ));
    }

    fn draw_nodes(&self, painter: &egui::Painter, surface: Rect, visuals: &egui::Visuals) {
        let zoom = self.viewport.zoom;
        for node in self.state.nodes() {
            let screen_rect = self.viewport.canvas_to_screen_rect(node_rect(node), surface);
            let stroke = if node.selected {
                Stroke::new(2.0, visuals.selection.stroke.color)
            } else {
                Stroke::new(1.0, visuals.widgets.noninteractive.fg_stroke.color)
            };

            painter.rect(screen_rect, 4.0 * zoom, visuals.window_fill, stroke);
            painter.text(
                screen_rect.center(),
                Align2::CENTER_CENTER,
                node.label(),
                FontId::proportional((14.0 * zoom).max(6.0)),
                visuals.text_color(),
            );

            for handle in [target_handle(node), source_handle(node)] {
                painter.circle(
                    self.viewport.canvas_to_screen(handle, surface),
                    HANDLE_RADIUS * zoom.max(0.5),
                    visuals.widgets.inactive.bg_fill,
                    Stroke::new(1.0, visuals.widgets.noninteractive.fg_stroke.color),
                );
            }
        }
    }

    fn draw_minimap(&self, painter: &egui::Painter, surface: Rect, visuals: &egui::Visuals) {
        let Some(bounds) = graph_bounds(self.state.nodes()) else {
            return;
        };
        let visible = Rect::from_two_pos(
            self.viewport.screen_to_canvas(surface.min, surface),
            self.viewport.screen_to_canvas(surface.max, surface),
        );
        let world = bounds.union(visible);

        let map_rect = Rect::from_min_size(
            surface.right_bottom() - MINIMAP_SIZE - vec2(10.0, 10.0),
            MINIMAP_SIZE,
        );
        let scale = (map_rect.width() / world.width()).min(map_rect.height() / world.height());
        let to_map = |p: Pos2| map_rect.min + (p - world.min) * scale;

        painter.rect(
            map_rect,
            4.0,
            visuals.faint_bg_color,
            Stroke::new(1.0, visuals.widgets.noninteractive.bg_stroke.color),
        );
        for node in self.state.nodes() {
            let r = node_rect(node);
            painter.rect_filled(
                Rect::from_two_pos(to_map(r.min), to_map(r.max)),
                1.0,
                visuals.widgets.inactive.fg_stroke.color,
            );
        }
        painter.rect_stroke(
            Rect::from_two_pos(to_map(visible.min), to_map(visible.max)),
            0.0,
            Stroke::new(1.0, visuals.selection.stroke.color),
        );
    }

    /// Zoom in / zoom out / fit view buttons
    fn render_controls(&mut self, ui: &mut egui::Ui, surface: Rect) {
        let button_size = vec2(28.0, 24.0);
        let origin = surface.left_bottom() + vec2(10.0, -10.0 - button_size.y * 3.0 - 8.0);

        let buttons = ["+", "−", "⛶"];
        for (i, label) in buttons.into_iter().enumerate() {
            let rect = Rect::from_min_size(
                origin + vec2(0.0, i as f32 * (button_size.y + 4.0)),
                button_size,
            );
            if ui.put(rect, egui::Button::new(label)).clicked() {
                match i {
                    0 => self.viewport.zoom_around(1.2, surface.center(), surface),
                    1 => self.viewport.zoom_around(1.0 / 1.2, surface.center(), surface),
                    _ => self.fit_view(surface),
                }
            }
        }
    }
}

impl eframe::App for FlowEditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.render_ui(ctx);
    }
}
