//! Shapeforge Scene - 3D editing view and editor panels
//!
//! This crate wires the pure editor model from `shapeforge-core` into Bevy:
//! the shape gallery, the customize view with its live-bound object, and
//! the code window. Platform concerns (window, file picking, asset
//! sources) are left to the embedding app.

pub mod binder;
pub mod camera;
pub mod gallery;
pub mod meshes;
pub mod models;
pub mod scene;
pub mod types;
pub mod ui;

use bevy::prelude::*;

/// Plugin that sets up the editor views
pub struct ShapeforgeScenePlugin;

impl Plugin for ShapeforgeScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<EditorView>()
            .init_resource::<Navigation>()
            .init_resource::<BundledModels>()
            .init_resource::<GalleryActions>()
            .init_resource::<ControlPanelSlot>()
            .add_plugins(camera::CameraPlugin)
            .add_plugins(scene::SceneSetupPlugin)
            .add_plugins(gallery::GalleryPlugin)
            .add_plugins(models::ModelsPlugin)
            .add_plugins(binder::BinderPlugin)
            .add_plugins(ui::UiPlugin);
    }
}

// Re-export commonly used types
pub use types::*;
pub use camera::CameraSettings;
