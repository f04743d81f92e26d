//! Spawning the edited object and loading glTF models

use bevy::asset::LoadState;
use bevy::gltf::Gltf;
use bevy::prelude::*;
use shapeforge_core::{resolve, ShapeReference};
use std::collections::HashMap;

use crate::meshes::build_mesh;
use crate::types::{BindState, EditSession, EditTarget, EditorView, Navigation};

/// Cache of loaded model handles
#[derive(Resource, Default)]
pub struct ModelCache {
    pub models: HashMap<String, Handle<Scene>>,
    pub loading: HashMap<String, Handle<Gltf>>,
    pub failed: HashMap<String, String>,
}

/// A target whose model scene has not been attached yet
#[derive(Component)]
pub struct PendingModel {
    pub path: String,
}

/// Plugin for the edited object's lifecycle
pub struct ModelsPlugin;

impl Plugin for ModelsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ModelCache>()
            .add_systems(OnEnter(EditorView::Customize), spawn_edit_target)
            .add_systems(
                Update,
                (load_models, attach_loaded_models.after(load_models))
                    .run_if(in_state(EditorView::Customize)),
            )
            .add_systems(OnExit(EditorView::Customize), despawn_edit_target);
    }
}

/// Start the editing session for the shape in [`Navigation`]
fn spawn_edit_target(
    mut commands: Commands,
    navigation: Res<Navigation>,
    mut next_view: ResMut<NextState<EditorView>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut model_cache: ResMut<ModelCache>,
    asset_server: Res<AssetServer>,
) {
    let Some(shape) = navigation.shape.clone() else {
        tracing::error!("Customize view entered without a shape; returning to gallery");
        next_view.set(EditorView::Gallery);
        return;
    };

    match &shape {
        ShapeReference::Primitive(primitive) => {
            let geometry = resolve(primitive.name());
            tracing::info!("Spawning {} with args {:?}", primitive, geometry.args);
            commands.spawn((
                Mesh3d(meshes.add(build_mesh(&geometry))),
                MeshMaterial3d(materials.add(flat_aware_material(primitive.is_flat()))),
                Transform::default(),
                EditTarget,
                BindState::default(),
            ));
        }
        ShapeReference::Model(path) => {
            if !model_cache.models.contains_key(path) && !model_cache.loading.contains_key(path) {
                tracing::info!("Starting to load model: {}", path);
                model_cache.failed.remove(path);
                let handle: Handle<Gltf> = asset_server.load(path.clone());
                model_cache.loading.insert(path.clone(), handle);
            }
            commands.spawn((
                Transform::default(),
                Visibility::default(),
                EditTarget,
                BindState::default(),
                PendingModel { path: path.clone() },
            ));
        }
    }

    commands.insert_resource(EditSession::new(shape));
}

/// Flat shapes are visible from both sides
fn flat_aware_material(flat: bool) -> StandardMaterial {
    let mut material = StandardMaterial::default();
    if flat {
        material.double_sided = true;
        material.cull_mode = None;
    }
    material
}

/// Check loading state and extract scenes from loaded glTFs
fn load_models(
    mut model_cache: ResMut<ModelCache>,
    asset_server: Res<AssetServer>,
    gltf_assets: Res<Assets<Gltf>>,
) {
    let loading: Vec<(String, Handle<Gltf>)> = model_cache
        .loading
        .iter()
        .map(|(key, handle)| (key.clone(), handle.clone()))
        .collect();

    for (key, handle) in loading {
        match asset_server.get_load_state(handle.id()) {
            Some(LoadState::Loaded) => {
                let scene = gltf_assets.get(&handle).and_then(|gltf| {
                    gltf.default_scene
                        .clone()
                        .or_else(|| gltf.scenes.first().cloned())
                });
                match scene {
                    Some(scene) => {
                        tracing::info!("Model loaded: {}", key);
                        model_cache.models.insert(key.clone(), scene);
                    }
                    None => {
                        tracing::error!("Model has no scenes: {}", key);
                        model_cache.failed.insert(key.clone(), "no scenes".to_string());
                    }
                }
                model_cache.loading.remove(&key);
            }
            Some(LoadState::Failed(err)) => {
                tracing::error!("Failed to load model {}: {}", key, err);
                model_cache.loading.remove(&key);
                model_cache.failed.insert(key, err.to_string());
            }
            _ => {
                // Still loading
            }
        }
    }
}

/// Give pending targets their scene once it is available
fn attach_loaded_models(
    mut commands: Commands,
    model_cache: Res<ModelCache>,
    pending: Query<(Entity, &PendingModel)>,
) {
    for (entity, model) in &pending {
        if let Some(scene) = model_cache.models.get(&model.path) {
            commands
                .entity(entity)
                .insert(SceneRoot(scene.clone()))
                .remove::<PendingModel>();
        } else if model_cache.failed.contains_key(&model.path) {
            // The target stays empty; the binder skips it
            commands.entity(entity).remove::<PendingModel>();
        }
    }
}

fn despawn_edit_target(
    mut commands: Commands,
    mut navigation: ResMut<Navigation>,
    targets: Query<Entity, With<EditTarget>>,
) {
    for entity in &targets {
        commands.entity(entity).despawn();
    }
    commands.remove_resource::<EditSession>();
    navigation.clear();
}
