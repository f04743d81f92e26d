//! Floating shape previews behind the gallery window

use bevy::prelude::*;
use shapeforge_core::{resolve, PrimitiveShape};

use crate::meshes::build_mesh;
use crate::types::EditorView;

/// Preview placement: shape, position around the gallery window, and color
const PREVIEWS: [(PrimitiveShape, [f32; 3], Color); 8] = [
    (PrimitiveShape::Box, [-4.0, 2.5, 0.0], Color::srgb(1.0, 0.0, 0.0)),
    (PrimitiveShape::Sphere, [4.0, 2.7, 0.0], Color::srgb(0.0, 0.0, 1.0)),
    (PrimitiveShape::Cone, [-4.0, -2.0, 0.0], Color::srgb(0.0, 0.5, 0.0)),
    (PrimitiveShape::Torus, [3.0, -3.0, 0.0], Color::srgb(0.5, 0.0, 0.5)),
    (PrimitiveShape::Cylinder, [-5.5, -0.5, -2.0], Color::srgb(1.0, 0.647, 0.0)),
    (PrimitiveShape::Dodecahedron, [4.0, 0.0, -2.0], Color::srgb(0.0, 1.0, 1.0)),
    (PrimitiveShape::TorusKnot, [0.0, 2.7, -1.0], Color::srgb(1.0, 1.0, 0.0)),
    (PrimitiveShape::Octahedron, [0.0, -2.5, -1.0], Color::srgb(1.0, 1.0, 0.0)),
];

const PREVIEW_SCALE: f32 = 0.6;

/// Idle motion parameters
const FLOAT_SPEED: f32 = 2.0;
const ROTATION_INTENSITY: f32 = 0.5;
const FLOAT_INTENSITY: f32 = 1.5;

/// A gallery preview mesh and where it floats around
#[derive(Component, Debug, Clone, Copy)]
pub struct GalleryPreview {
    pub base: Vec3,
    /// Time offset so previews do not move in lockstep
    pub phase: f32,
}

/// Plugin for the gallery backdrop
pub struct GalleryPlugin;

impl Plugin for GalleryPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(EditorView::Gallery), spawn_previews)
            .add_systems(
                Update,
                float_previews.run_if(in_state(EditorView::Gallery)),
            )
            .add_systems(OnExit(EditorView::Gallery), despawn_previews);
    }
}

/// Bob height and sway rotation at time `t`
pub fn float_pose(t: f32) -> (f32, Quat) {
    let angle = t / 4.0 * FLOAT_SPEED;
    let rotation = Quat::from_euler(
        EulerRot::XYZ,
        angle.cos() / 8.0 * ROTATION_INTENSITY,
        angle.sin() / 8.0 * ROTATION_INTENSITY,
        angle.sin() / 20.0 * ROTATION_INTENSITY,
    );
    (angle.sin() / 10.0 * FLOAT_INTENSITY, rotation)
}

fn spawn_previews(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (index, (shape, position, color)) in PREVIEWS.into_iter().enumerate() {
        let mut material = StandardMaterial::from(color);
        if shape.is_flat() {
            material.double_sided = true;
            material.cull_mode = None;
        }
        let base = Vec3::from_array(position);
        commands.spawn((
            Mesh3d(meshes.add(build_mesh(&resolve(shape.name())))),
            MeshMaterial3d(materials.add(material)),
            Transform::from_translation(base).with_scale(Vec3::splat(PREVIEW_SCALE)),
            GalleryPreview {
                base,
                phase: index as f32 * 1.7,
            },
        ));
    }
    tracing::debug!("Spawned {} gallery previews", PREVIEWS.len());
}

fn float_previews(time: Res<Time>, mut previews: Query<(&GalleryPreview, &mut Transform)>) {
    let elapsed = time.elapsed_secs();
    for (preview, mut transform) in &mut previews {
        let (bob, rotation) = float_pose(elapsed + preview.phase);
        transform.translation = preview.base + Vec3::Y * bob;
        transform.rotation = rotation;
    }
}

fn despawn_previews(mut commands: Commands, previews: Query<Entity, With<GalleryPreview>>) {
    for entity in &previews {
        commands.entity(entity).despawn();
    }
}
