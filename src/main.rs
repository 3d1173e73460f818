use eframe::egui;

use spatial_atlas::camera::{CameraChoreographer, OrbitConfig, OrbitControls};
use spatial_atlas::config::AtlasConfig;
use spatial_atlas::fast_math::{cross, dot, normalize, sub, Point3};
use spatial_atlas::layout::{
    arrange, build_connections, layout_tree, ItemLayout, LayoutPattern, TreeLayout,
};
use spatial_atlas::model::{AtlasData, CategoryTree, Connection, ExpansionState};
use spatial_atlas::snapshot::AtlasSnapshot;

/// Which experience is on screen
#[derive(Debug, Clone, Copy, PartialEq)]
enum ViewMode {
    /// Topic mind-map (category tree)
    MindMap,
    /// Flat article arrangement
    Items,
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let data = match args.first() {
        Some(path) => AtlasData::load(path).unwrap_or_else(|e| {
            log::warn!("{}; falling back to demo data", e);
            AtlasData::demo()
        }),
        None => AtlasData::demo(),
    };
    let config = match args.get(1) {
        Some(path) => AtlasConfig::load(path).unwrap_or_else(|e| {
            log::warn!("{}; using default config", e);
            AtlasConfig::default()
        }),
        None => AtlasConfig::default(),
    };
    if let Err(e) = data.tree().validate() {
        log::warn!("category data: {}", e);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 800.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        "Spatial Atlas",
        options,
        Box::new(move |_cc| Ok(Box::new(AtlasApp::new(data, config)))),
    );
    if let Err(e) = result {
        log::error!("viewer failed: {}", e);
        std::process::exit(1);
    }
}

struct AtlasApp {
    data: AtlasData,
    tree: CategoryTree,
    root_id: Option<String>,
    config: AtlasConfig,
    expansion: ExpansionState,
    mode: ViewMode,
    pattern: LayoutPattern,
    radius: f32,
    tree_layout: TreeLayout,
    item_layout: ItemLayout,
    connections: Vec<Connection>,
    /// Orbit controls; `None` until the canvas exists
    controls: Option<OrbitConfig>,
    choreo: CameraChoreographer,
    /// Screen positions from the last paint, for click picking
    hit_targets: Vec<(String, egui::Pos2)>,
}

impl AtlasApp {
    fn new(data: AtlasData, config: AtlasConfig) -> Self {
        let tree = data.tree();
        let root_id = tree.root_id().map(str::to_string);
        let mut expansion = ExpansionState::new();
        if let Some(root) = &root_id {
            expansion.expand(root);
        }
        let choreo = CameraChoreographer::new(config.camera.clone());
        let mut app = Self {
            data,
            tree,
            root_id,
            config,
            expansion,
            mode: ViewMode::MindMap,
            pattern: LayoutPattern::Galaxy,
            radius: 12.0,
            tree_layout: TreeLayout::default(),
            item_layout: ItemLayout::default(),
            connections: Vec::new(),
            controls: None,
            choreo,
            hit_targets: Vec::new(),
        };
        app.relayout();
        app
    }

    fn relayout(&mut self) {
        self.tree_layout = match &self.root_id {
            Some(root) => layout_tree(&self.tree, &self.expansion, root, &self.config.tree),
            None => TreeLayout::default(),
        };
        self.item_layout = arrange(&self.data.items, self.pattern, self.radius, &self.config.pattern);
        self.connections = build_connections(
            &self.data.items,
            &self.item_layout,
            self.config.connection.default_strength,
        );
    }

    fn snapshot(&self) -> AtlasSnapshot {
        let snap = match self.mode {
            ViewMode::MindMap => AtlasSnapshot::from_tree(
                &self.tree_layout,
                self.config.connection.default_strength,
            ),
            ViewMode::Items => AtlasSnapshot::from_items(&self.item_layout, self.connections.clone()),
        };
        snap.with_camera(self.controls)
    }

    fn toggle_node(&mut self, id: &str) {
        if self.expansion.is_expanded(id) {
            self.expansion.collapse_subtree(&self.tree, id);
        } else {
            self.expansion.expand(id);
        }
        self.relayout();
    }

    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let before = self.mode;
            ui.selectable_value(&mut self.mode, ViewMode::MindMap, "Mind map");
            ui.selectable_value(&mut self.mode, ViewMode::Items, "Articles");
            if self.mode != before {
                self.choreo.trigger_from(&self.controls);
            }

            ui.separator();
            match self.mode {
                ViewMode::Items => {
                    let before = self.pattern;
                    egui::ComboBox::from_label("Pattern")
                        .selected_text(self.pattern.name())
                        .show_ui(ui, |ui| {
                            for p in LayoutPattern::ALL {
                                ui.selectable_value(&mut self.pattern, p, p.name());
                            }
                        });
                    let radius_changed = ui
                        .add(egui::Slider::new(&mut self.radius, 2.0..=40.0).text("radius"))
                        .changed();
                    if self.pattern != before {
                        self.choreo.trigger_from(&self.controls);
                    }
                    if self.pattern != before || radius_changed {
                        self.relayout();
                    }
                }
                ViewMode::MindMap => {
                    if ui.button("Expand all").clicked() {
                        self.expansion.expand_all(&self.tree);
                        self.relayout();
                    }
                    if ui.button("Collapse").clicked() {
                        self.expansion.clear();
                        if let Some(root) = self.root_id.clone() {
                            self.expansion.expand(&root);
                        }
                        self.relayout();
                    }
                }
            }

            ui.separator();
            if ui.button("Recenter").clicked() {
                self.choreo.trigger_from(&self.controls);
            }
            if ui.button("Export snapshot").clicked() {
                match self.snapshot().to_json() {
                    Ok(json) => println!("{}", json),
                    Err(e) => log::warn!("{}", e),
                }
            }
        });
    }

    fn draw_scene(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let rect = response.rect;

        // Advance the choreographer before the controls come up: first frame no-ops.
        let dt = ctx.input(|i| i.stable_dt).min(0.1);
        self.choreo.drive(&mut self.controls, dt);
        if self.controls.is_none() {
            self.controls = Some(self.config.camera.home);
        }
        if self.choreo.is_transitioning() {
            ctx.request_repaint();
        }

        // Drag to orbit, scroll to dolly
        let (polar_min, polar_max) = (self.config.camera.polar_min, self.config.camera.polar_max);
        if response.dragged() {
            self.choreo.cancel();
            if let Some(orbit) = self.controls.orbit() {
                let delta = response.drag_delta();
                self.controls.set_orbit(
                    OrbitConfig::new(
                        orbit.azimuth - delta.x * 0.008,
                        orbit.polar - delta.y * 0.008,
                        orbit.radius,
                    )
                    .clamped(polar_min, polar_max),
                );
            }
        }
        if response.hovered() {
            let scroll = ui.input(|i| i.raw_scroll_delta.y);
            if scroll.abs() > 0.1 {
                if let Some(mut orbit) = self.controls.orbit() {
                    orbit.radius = (orbit.radius * (1.0 - scroll * 0.003)).clamp(2.0, 200.0);
                    self.controls.set_orbit(orbit);
                }
            }
        }

        painter.rect_filled(rect, 0.0, egui::Color32::from_rgb(10, 10, 31));
        let Some(orbit) = self.controls.orbit() else {
            return;
        };
        let camera = ViewCamera::new(orbit, [0.0, 0.0, 0.0], rect);

        let edge_color = egui::Color32::from_rgba_unmultiplied(190, 205, 230, 90);
        let edges = match self.mode {
            ViewMode::MindMap => self
                .tree_layout
                .connectors(self.config.connection.default_strength),
            ViewMode::Items => self.connections.clone(),
        };
        for edge in &edges {
            if let (Some((a, _)), Some((b, _))) = (camera.project(edge.from), camera.project(edge.to)) {
                let alpha = (edge.strength * 255.0) as u8;
                let color = egui::Color32::from_rgba_unmultiplied(
                    edge_color.r(),
                    edge_color.g(),
                    edge_color.b(),
                    alpha.min(edge_color.a()),
                );
                painter.line_segment([a, b], egui::Stroke::new(1.0, color));
            }
        }

        self.hit_targets.clear();
        match self.mode {
            ViewMode::MindMap => {
                for node in self.tree_layout.visible() {
                    let Some((pos, depth)) = camera.project(node.position) else {
                        continue;
                    };
                    let color = self
                        .tree
                        .get(&node.id)
                        .and_then(|c| c.color.as_deref())
                        .and_then(parse_hex)
                        .unwrap_or(egui::Color32::WHITE);
                    let size = ((12.0 - node.depth as f32 * 3.0) * (30.0 / depth)).clamp(2.0, 18.0);
                    painter.circle_filled(pos, size, color);
                    let label = self
                        .tree
                        .get(&node.id)
                        .map(|c| c.label.as_str())
                        .unwrap_or(node.id.as_str());
                    let marker = if self.tree.children_of(&node.id).is_empty() {
                        ""
                    } else if self.expansion.is_expanded(&node.id) {
                        " -"
                    } else {
                        " +"
                    };
                    painter.text(
                        pos + egui::vec2(0.0, size + 8.0),
                        egui::Align2::CENTER_CENTER,
                        format!("{}{}", label, marker),
                        egui::FontId::proportional(13.0),
                        egui::Color32::from_rgb(230, 235, 245),
                    );
                    self.hit_targets.push((node.id.clone(), pos));
                }
            }
            ViewMode::Items => {
                for placed in self.item_layout.iter() {
                    let Some((pos, depth)) = camera.project(placed.position) else {
                        continue;
                    };
                    let size = (5.0 * (30.0 / depth)).clamp(1.5, 10.0);
                    painter.circle_filled(pos, size, egui::Color32::from_rgb(0, 217, 255));
                    self.hit_targets.push((placed.id.clone(), pos));
                }
            }
        }

        if response.clicked() {
            if let Some(click) = response.interact_pointer_pos() {
                let picked = self
                    .hit_targets
                    .iter()
                    .map(|(id, p)| (id, p.distance(click)))
                    .filter(|(_, d)| *d < 14.0)
                    .min_by(|a, b| a.1.total_cmp(&b.1))
                    .map(|(id, _)| id.clone());
                if let Some(id) = picked {
                    if self.mode == ViewMode::MindMap {
                        self.toggle_node(&id);
                    } else {
                        log::info!("selected {}", id);
                    }
                }
            }
        }

        painter.text(
            rect.left_bottom() + egui::vec2(8.0, -8.0),
            egui::Align2::LEFT_BOTTOM,
            format!(
                "Drag: rotate | Scroll: zoom | Click: expand | az={:.2} polar={:.2} r={:.1}",
                orbit.azimuth, orbit.polar, orbit.radius
            ),
            egui::FontId::proportional(12.0),
            egui::Color32::from_rgba_unmultiplied(200, 200, 210, 180),
        );
    }
}

impl eframe::App for AtlasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.draw_toolbar(ui));
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.draw_scene(ui, ctx));
    }
}

/// Perspective projection for the orbit camera.
struct ViewCamera {
    eye: Point3,
    forward: Point3,
    right: Point3,
    up: Point3,
    tan_half_fov: f32,
    rect: egui::Rect,
}

impl ViewCamera {
    fn new(orbit: OrbitConfig, target: Point3, rect: egui::Rect) -> Self {
        let eye = orbit.to_cartesian(target);
        let forward = normalize(sub(target, eye));
        let right = normalize(cross(forward, [0.0, 1.0, 0.0]));
        let up = cross(right, forward);
        Self {
            eye,
            forward,
            right,
            up,
            tan_half_fov: (60.0_f32.to_radians() * 0.5).tan(),
            rect,
        }
    }

    /// Screen position and view depth, or `None` behind the camera.
    fn project(&self, p: Point3) -> Option<(egui::Pos2, f32)> {
        let rel = sub(p, self.eye);
        let z = dot(rel, self.forward);
        if z < 0.1 {
            return None;
        }
        let aspect = self.rect.width() / self.rect.height().max(1.0);
        let ndc_x = dot(rel, self.right) / (z * self.tan_half_fov * aspect);
        let ndc_y = -dot(rel, self.up) / (z * self.tan_half_fov);
        if ndc_x.abs() > 1.5 || ndc_y.abs() > 1.5 {
            return None;
        }
        let sx = self.rect.center().x + ndc_x * self.rect.width() * 0.5;
        let sy = self.rect.center().y + ndc_y * self.rect.height() * 0.5;
        Some((egui::pos2(sx, sy), z))
    }
}

/// `#rrggbb` → Color32
fn parse_hex(s: &str) -> Option<egui::Color32> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let v = u32::from_str_radix(hex, 16).ok()?;
    Some(egui::Color32::from_rgb((v >> 16) as u8, (v >> 8) as u8, v as u8))
}
