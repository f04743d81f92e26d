//! Gallery, control panel, and code window overlays using bevy_egui

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};
use shapeforge_core::{
    generate, Clipboard, ClipboardError, ControlPanel, HexColor, PrimitiveShape, Rgb, Settings,
    SettingsPatch, ShapeReference, SnippetViewer, Variant, ViewKind, WidgetKind, WidgetValue,
};

use crate::models::ModelCache;
use crate::types::{
    BundledModels, CodeWindow, ControlPanelSlot, EditSession, EditorView, GalleryActions,
    Navigation,
};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(EditorView::Customize), mount_editor_ui)
            .add_systems(OnExit(EditorView::Customize), unmount_editor_ui)
            .add_systems(
                EguiPrimaryContextPass,
                gallery_ui.run_if(in_state(EditorView::Gallery)),
            )
            .add_systems(
                EguiPrimaryContextPass,
                (control_panel_ui, code_window_ui)
                    .chain()
                    .run_if(in_state(EditorView::Customize).and(resource_exists::<EditSession>)),
            );
    }
}

/// Clipboard writes through egui's platform output
struct EguiClipboard<'a>(&'a egui::Context);

impl Clipboard for EguiClipboard<'_> {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.0.copy_text(text.to_string());
        Ok(())
    }
}

/// Build the view-scoped widgets from the navigated shape
fn mount_editor_ui(
    mut commands: Commands,
    navigation: Res<Navigation>,
    mut slot: ResMut<ControlPanelSlot>,
) {
    let Some(shape) = navigation.shape.as_ref() else {
        return;
    };
    let view = ViewKind::from(shape);
    let settings = Settings::defaults_for(view);
    slot.acquire(ControlPanel::mount(view, &settings));
    commands.insert_resource(CodeWindow(SnippetViewer::new(generate(
        &settings, shape, None,
    ))));
}

fn unmount_editor_ui(mut commands: Commands, mut slot: ResMut<ControlPanelSlot>) {
    if !slot.release() {
        tracing::debug!("No control panel to release");
    }
    commands.remove_resource::<CodeWindow>();
}

fn gallery_ui(
    mut contexts: EguiContexts,
    bundled: Res<BundledModels>,
    mut navigation: ResMut<Navigation>,
    mut actions: ResMut<GalleryActions>,
    mut next_view: ResMut<NextState<EditorView>>,
) {
    let Ok(ctx) = contexts.ctx_mut() else { return };

    let mut chosen: Option<ShapeReference> = None;

    egui::Window::new("Shapes")
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .resizable(false)
        .collapsible(false)
        .show(ctx, |ui| {
            ui.heading("Primitives");
            egui::Grid::new("primitive_grid")
                .num_columns(4)
                .spacing([8.0, 8.0])
                .show(ui, |ui| {
                    for (index, primitive) in PrimitiveShape::ALL.iter().enumerate() {
                        if ui.button(primitive.name()).clicked() {
                            chosen = Some(ShapeReference::Primitive(*primitive));
                        }
                        if index % 4 == 3 {
                            ui.end_row();
                        }
                    }
                });

            ui.separator();
            ui.heading("Models");
            ui.horizontal_wrapped(|ui| {
                for model in &bundled.models {
                    if ui.button(&model.label).clicked() {
                        chosen = Some(ShapeReference::resolve(&model.path));
                    }
                }
            });

            ui.separator();
            let upload_button = egui::Button::new(egui::RichText::new("Upload model (.glb, .gltf)"));
            if ui.add(upload_button).clicked() {
                actions.upload_requested = true;
            }
        });

    if let Some(shape) = chosen {
        navigation.open(shape);
        next_view.set(EditorView::Customize);
    }
}

fn control_panel_ui(
    mut contexts: EguiContexts,
    mut session: ResMut<EditSession>,
    mut slot: ResMut<ControlPanelSlot>,
    mut code_window: ResMut<CodeWindow>,
    model_cache: Res<ModelCache>,
    mut next_view: ResMut<NextState<EditorView>>,
) {
    let Ok(ctx) = contexts.ctx_mut() else { return };
    let Some(panel) = slot.0.as_mut() else { return };

    let widgets = panel.widgets().to_vec();
    let mut patches: Vec<SettingsPatch> = Vec::new();

    egui::SidePanel::right("control_panel")
        .default_width(280.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("← Back").clicked() {
                    next_view.set(EditorView::Gallery);
                }
                ui.heading(session.shape.label());
            });

            if let ShapeReference::Model(path) = &session.shape {
                if let Some(reason) = model_cache.failed.get(path) {
                    ui.colored_label(egui::Color32::RED, format!("Model failed to load: {}", reason));
                } else if model_cache.loading.contains_key(path) {
                    ui.label(egui::RichText::new("Loading model…").italics());
                }
            }

            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| {
                for widget in &widgets {
                    match (widget.kind, &widget.value, widget.field) {
                        (WidgetKind::Slider { min, max }, WidgetValue::Number(value), Some(field)) => {
                            let mut value = *value;
                            let response = ui.add(
                                egui::Slider::new(&mut value, min..=max).text(widget.label),
                            );
                            if response.changed() {
                                patches.extend(panel.set_number(field, value));
                            }
                        }
                        (WidgetKind::Color, WidgetValue::Color(color), Some(field)) => {
                            let rgb = color.rgb().unwrap_or(Rgb::new(255, 255, 255));
                            let mut srgb = [rgb.r, rgb.g, rgb.b];
                            ui.horizontal(|ui| {
                                if ui.color_edit_button_srgb(&mut srgb).changed() {
                                    let picked = HexColor::from(Rgb::new(srgb[0], srgb[1], srgb[2]));
                                    patches.extend(panel.set_color(field, picked));
                                }
                                ui.label(widget.label);
                            });
                        }
                        _ => {}
                    }
                }

                ui.separator();
                ui.label(egui::RichText::new("Animations").strong());
                ui.horizontal_wrapped(|ui| {
                    for widget in &widgets {
                        if let (WidgetKind::AnimationToggle(id), WidgetValue::Toggle(on)) =
                            (widget.kind, &widget.value)
                        {
                            if ui.selectable_label(*on, widget.label).clicked() {
                                patches.extend(panel.toggle_animation(id));
                            }
                        }
                    }
                });
            });

            ui.separator();
            let code_label = if code_window.0.is_open() { "Hide Code" } else { "Get Code" };
            if ui.button(code_label).clicked() {
                code_window.0.toggle_open();
            }
        });

    for patch in patches {
        session.store.update(&patch);
    }
}

fn code_window_ui(
    mut contexts: EguiContexts,
    session: Res<EditSession>,
    mut code_window: ResMut<CodeWindow>,
    time: Res<Time>,
) {
    if !code_window.0.is_open() {
        return;
    }
    let Ok(ctx) = contexts.ctx_mut() else { return };

    let settings = session.settings();
    let viewer = &mut code_window.0;
    viewer.regenerate(generate(settings, &session.shape, settings.animation));

    let now = time.elapsed();
    let lines: Vec<String> = viewer.lines().map(str::to_string).collect();
    let mut open = true;
    let mut copy_all = false;
    let mut copy_line: Option<usize> = None;
    let mut selected: Option<Variant> = None;

    egui::Window::new("Code")
        .open(&mut open)
        .default_size([560.0, 420.0])
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                for variant in Variant::ALL {
                    if ui
                        .selectable_label(viewer.active() == variant, variant.label())
                        .clicked()
                    {
                        selected = Some(variant);
                    }
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Copy").clicked() {
                        copy_all = true;
                    }
                    if viewer.is_copied(now) {
                        ui.colored_label(egui::Color32::GREEN, "Copied!");
                    }
                });
            });
            ui.separator();

            egui::ScrollArea::both().show(ui, |ui| {
                for (index, line) in lines.iter().enumerate() {
                    ui.horizontal(|ui| {
                        if ui.small_button("⧉").on_hover_text("Copy line").clicked() {
                            copy_line = Some(index);
                        }
                        ui.monospace(line);
                    });
                }
            });
        });

    let mut clipboard = EguiClipboard(ctx);
    if let Some(variant) = selected {
        viewer.select(variant);
    }
    if copy_all {
        viewer.copy_active(&mut clipboard, now);
    }
    if let Some(index) = copy_line {
        viewer.copy_line(&mut clipboard, index, now);
    }
    if !open {
        viewer.set_open(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_plugins(bevy::state::app::StatesPlugin)
            .init_state::<EditorView>()
            .init_resource::<Navigation>()
            .init_resource::<ControlPanelSlot>()
            .add_systems(OnEnter(EditorView::Customize), mount_editor_ui)
            .add_systems(OnExit(EditorView::Customize), unmount_editor_ui);
        app
    }

    fn go_to(app: &mut App, view: EditorView) {
        app.world_mut()
            .resource_mut::<NextState<EditorView>>()
            .set(view);
        app.update();
    }

    #[test]
    fn test_panel_lives_with_the_view() {
        let mut app = test_app();
        app.world_mut()
            .resource_mut::<Navigation>()
            .open(ShapeReference::primitive("torus-knot"));

        go_to(&mut app, EditorView::Customize);
        {
            let slot = app.world().resource::<ControlPanelSlot>();
            let panel = slot.0.as_ref().unwrap();
            assert_eq!(panel.view(), ViewKind::Shape);
            assert!(!panel.is_destroyed());
        }
        let code = app.world().resource::<CodeWindow>();
        assert!(code.0.snippet().get(Variant::Vanilla).contains("TorusKnotGeometry"));

        go_to(&mut app, EditorView::Gallery);
        assert!(app.world().resource::<ControlPanelSlot>().0.is_none());
        assert!(app.world().get_resource::<CodeWindow>().is_none());
    }

    #[test]
    fn test_model_view_gets_model_panel() {
        let mut app = test_app();
        app.world_mut()
            .resource_mut::<Navigation>()
            .open(ShapeReference::resolve("models/shiba.glb"));

        go_to(&mut app, EditorView::Customize);
        let slot = app.world().resource::<ControlPanelSlot>();
        assert_eq!(slot.0.as_ref().unwrap().view(), ViewKind::Model);
    }

    #[test]
    fn test_no_panel_without_navigation() {
        let mut app = test_app();
        go_to(&mut app, EditorView::Customize);
        assert!(app.world().resource::<ControlPanelSlot>().0.is_none());
        assert!(app.world().get_resource::<CodeWindow>().is_none());
    }
}
