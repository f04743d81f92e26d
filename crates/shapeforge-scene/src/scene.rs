//! Scene setup - camera, lights, and the star backdrop

use bevy::prelude::*;
use std::f32::consts::PI;

use crate::camera::MainCamera;

/// Marker component for the key lights
#[derive(Component)]
pub struct SceneLight;

/// Marker component for star backdrop entities
#[derive(Component)]
pub struct Star;

const STAR_COUNT: usize = 600;
const STAR_RADIUS: f32 = 100.0;

/// Plugin for scene setup
pub struct SceneSetupPlugin;

impl Plugin for SceneSetupPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::BLACK))
            .add_systems(Startup, (setup_scene, spawn_stars));
    }
}

fn setup_scene(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: 50.0_f32.to_radians(),
            near: 0.1,
            far: 1000.0,
            ..default()
        }),
        Transform::from_xyz(0.0, 0.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
        AmbientLight {
            color: Color::WHITE,
            brightness: 400.0,
            ..default()
        },
        MainCamera,
    ));

    // Two key lights in front of the object, mirrored across the origin
    for position in [Vec3::new(10.0, 10.0, 25.0), Vec3::new(-10.0, -10.0, 25.0)] {
        commands.spawn((
            DirectionalLight {
                illuminance: 4000.0,
                shadows_enabled: true,
                ..default()
            },
            Transform::from_translation(position).looking_at(Vec3::ZERO, Vec3::Y),
            SceneLight,
        ));
    }
}

/// Evenly spread points on a sphere (golden-angle spiral)
pub fn fibonacci_sphere(count: usize, radius: f32) -> Vec<Vec3> {
    let golden_angle = PI * (3.0 - 5.0_f32.sqrt());
    (0..count)
        .map(|i| {
            let y = 1.0 - (i as f32 + 0.5) / count as f32 * 2.0;
            let ring = (1.0 - y * y).sqrt();
            let theta = golden_angle * i as f32;
            Vec3::new(theta.cos() * ring, y, theta.sin() * ring) * radius
        })
        .collect()
}

fn spawn_stars(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mesh = meshes.add(Sphere::new(0.15).mesh().uv(6, 4));
    let material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        unlit: true,
        ..default()
    });

    for position in fibonacci_sphere(STAR_COUNT, STAR_RADIUS) {
        commands.spawn((
            Mesh3d(mesh.clone()),
            MeshMaterial3d(material.clone()),
            Transform::from_translation(position),
            Star,
        ));
    }
    tracing::debug!("Spawned {} stars", STAR_COUNT);
}
