//! Bevy application setup

use bevy::asset::io::memory::{Dir, MemoryAssetReader};
use bevy::asset::io::{AssetSource, AssetSourceId};
use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use bevy_picking::{DefaultPickingPlugins, prelude::MeshPickingPlugin};
use shapeforge_scene::ShapeforgeScenePlugin;

use crate::file_picker::FilePickerPlugin;

/// Asset source name backing `upload://` locators
pub const UPLOAD_SOURCE: &str = "upload";

/// In-memory directory holding the bytes of uploaded models
#[derive(Resource, Clone, Default)]
pub struct UploadDir(pub Dir);

/// Run the Bevy application
pub fn run() {
    let upload_dir = UploadDir::default();
    let reader_root = upload_dir.0.clone();

    App::new()
        // Asset sources must be registered before AssetPlugin is built
        .register_asset_source(
            AssetSourceId::from(UPLOAD_SOURCE),
            AssetSource::build().with_reader(move || {
                Box::new(MemoryAssetReader {
                    root: reader_root.clone(),
                })
            }),
        )
        .insert_resource(upload_dir)
        .add_plugins(DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Shapeforge".to_string(),
                    canvas: Some("#shapeforge-canvas".to_string()),
                    fit_canvas_to_parent: true,
                    prevent_default_event_handling: false,
                    ..default()
                }),
                ..default()
            })
            .set(AssetPlugin {
                // Bundled models are served next to index.html
                file_path: "".to_string(),
                // Don't look for .meta files - the static host doesn't have them
                meta_check: bevy::asset::AssetMetaCheck::Never,
                ..default()
            })
        )
        // These must be added BEFORE EguiPlugin so it can detect PickingPlugin
        .add_plugins(DefaultPickingPlugins)
        .add_plugins(MeshPickingPlugin)
        .add_plugins(EguiPlugin::default())
        .add_plugins(ShapeforgeScenePlugin)
        .add_plugins(FilePickerPlugin)
        .run();
}
