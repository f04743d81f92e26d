//! Camera controls, orbit navigation, and field of view

use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll};
use bevy::prelude::*;
use bevy_egui::EguiContexts;
use shapeforge_core::{apply_camera_fov, PerspectiveCamera};

use crate::types::{EditSession, EditorView};

/// Camera controller settings
#[derive(Debug, Clone, Resource)]
pub struct CameraSettings {
    pub distance: f32,
    pub target_distance: f32,
    pub azimuth: f32,
    pub elevation: f32,
    pub target: Vec3,
    pub sensitivity: f32,
    pub zoom_speed: f32,
    pub smooth_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            distance: 10.0,
            target_distance: 10.0,
            azimuth: 0.0,
            elevation: 0.0,
            target: Vec3::ZERO,
            sensitivity: 0.005,
            zoom_speed: 0.1,
            smooth_factor: 0.05,
            min_distance: 2.0,
            max_distance: 50.0,
        }
    }
}

impl CameraSettings {
    /// Camera position for the current orbit angles (Y up)
    pub fn eye(&self) -> Vec3 {
        let horizontal = self.distance * self.elevation.cos();
        self.target
            + Vec3::new(
                horizontal * self.azimuth.sin(),
                self.distance * self.elevation.sin(),
                horizontal * self.azimuth.cos(),
            )
    }
}

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Plugin for camera controls
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraSettings>()
            .add_systems(Update, update_camera);
        add_fov_systems(app);
    }
}

fn add_fov_systems(app: &mut App) {
    app.add_systems(
        Update,
        apply_session_fov
            .run_if(in_state(EditorView::Customize).and(resource_exists::<EditSession>)),
    )
    .add_systems(OnExit(EditorView::Customize), reset_camera);
}

fn update_camera(
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
    mut settings: ResMut<CameraSettings>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    mouse_scroll: Res<AccumulatedMouseScroll>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    time: Res<Time>,
    mut contexts: EguiContexts,
) {
    // Leave the pointer to egui while it is over a panel
    let egui_wants_pointer = contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_pointer_input())
        .unwrap_or(false);

    if !egui_wants_pointer {
        if mouse_button.pressed(MouseButton::Left) {
            let motion = mouse_motion.delta;
            settings.azimuth -= motion.x * settings.sensitivity;
            settings.elevation =
                (settings.elevation + motion.y * settings.sensitivity).clamp(-1.5, 1.5);
        }

        if mouse_scroll.delta.y != 0.0 {
            let zoom_factor = 1.0 - mouse_scroll.delta.y * settings.zoom_speed;
            settings.target_distance = (settings.target_distance * zoom_factor)
                .clamp(settings.min_distance, settings.max_distance);
        }
    }

    // Damped zoom
    let dt = time.delta_secs();
    let lerp_factor = 1.0 - (-settings.smooth_factor * 60.0 * dt).exp();
    settings.distance += (settings.target_distance - settings.distance) * lerp_factor;

    if let Ok(mut transform) = camera_query.single_mut() {
        transform.translation = settings.eye();
        transform.look_at(settings.target, Vec3::Y);
    }
}

/// [`PerspectiveCamera`] over a Bevy projection component
struct ProjectionHandle<'a>(Mut<'a, Projection>);

impl PerspectiveCamera for ProjectionHandle<'_> {
    fn set_fov_degrees(&mut self, fov: f64) {
        if let Projection::Perspective(perspective) = self.0.bypass_change_detection() {
            perspective.fov = (fov as f32).to_radians();
        }
    }

    fn update_projection_matrix(&mut self) {
        // The camera system recomputes the matrix for changed projections
        self.0.set_changed();
    }
}

/// Apply `cameraFOV` whenever it differs from the camera's projection
fn apply_session_fov(
    session: Res<EditSession>,
    mut camera_query: Query<&mut Projection, With<MainCamera>>,
) {
    let fov = session.settings().camera_fov;
    let Ok(projection) = camera_query.single_mut() else {
        return;
    };
    if let Projection::Perspective(perspective) = projection.as_ref() {
        if (perspective.fov - (fov as f32).to_radians()).abs() < 1e-6 {
            return;
        }
    }
    apply_camera_fov(&mut ProjectionHandle(projection), fov);
    tracing::debug!("Camera FOV set to {}", fov);
}

fn reset_camera(
    mut settings: ResMut<CameraSettings>,
    mut camera_query: Query<&mut Projection, With<MainCamera>>,
) {
    *settings = CameraSettings::default();
    if let Ok(projection) = camera_query.single_mut() {
        apply_camera_fov(&mut ProjectionHandle(projection), 50.0);
    }
}
