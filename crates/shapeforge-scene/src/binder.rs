//! Live binding of the settings store onto the edited entity
//!
//! Bevy components are wrapped in the core binder traits so the same
//! `apply_settings` procedure drives both the renderer and headless
//! inspection.

use bevy::prelude::*;
use shapeforge_core::{animated_settings, apply_settings, MeshMaterial, Rgb, SceneObject};
use std::collections::HashSet;

use crate::types::{AnimationDriver, BindState, EditSession, EditTarget, EditorView};

/// Plugin for settings application and preset tweens
pub struct BinderPlugin;

impl Plugin for BinderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AnimationDriver>()
            .add_systems(
                Update,
                (sync_animation, advance_tweens, apply_to_targets)
                    .chain()
                    .run_if(in_state(EditorView::Customize).and(resource_exists::<EditSession>)),
            )
            .add_systems(OnExit(EditorView::Customize), stop_animation);
    }
}

/// [`MeshMaterial`] over a `StandardMaterial` asset
struct MaterialHandle<'a> {
    material: &'a mut StandardMaterial,
    emissive_intensity: f32,
}

fn to_color(rgb: Rgb) -> Color {
    Color::srgb_u8(rgb.r, rgb.g, rgb.b)
}

impl MeshMaterial for MaterialHandle<'_> {
    fn set_base_color(&mut self, color: Rgb) {
        self.material.base_color = to_color(color);
    }

    fn set_metalness(&mut self, metalness: f64) {
        self.material.metallic = metalness as f32;
    }

    fn set_roughness(&mut self, roughness: f64) {
        self.material.perceptual_roughness = roughness as f32;
    }

    fn set_emissive_intensity(&mut self, intensity: f64) {
        // StandardMaterial has no separate intensity; it scales the emissive color
        self.emissive_intensity = intensity as f32;
    }

    fn supports_emissive(&self) -> bool {
        !self.material.unlit
    }

    fn set_emissive_color(&mut self, color: Rgb) {
        let linear = to_color(color).to_linear();
        self.material.emissive = LinearRgba::rgb(
            linear.red * self.emissive_intensity,
            linear.green * self.emissive_intensity,
            linear.blue * self.emissive_intensity,
        );
    }
}

/// [`SceneObject`] over the target's transform and its mesh materials
struct TargetHandle<'a> {
    transform: &'a mut Transform,
    materials: &'a mut Assets<StandardMaterial>,
    material_ids: Vec<AssetId<StandardMaterial>>,
}

impl SceneObject for TargetHandle<'_> {
    fn set_scale(&mut self, scale: f64) {
        self.transform.scale = Vec3::splat(scale as f32);
    }

    fn set_rotation(&mut self, euler: [f64; 3]) {
        self.transform.rotation = Quat::from_euler(
            EulerRot::XYZ,
            euler[0] as f32,
            euler[1] as f32,
            euler[2] as f32,
        );
    }

    fn set_position(&mut self, position: [f64; 3]) {
        self.transform.translation = Vec3::new(
            position[0] as f32,
            position[1] as f32,
            position[2] as f32,
        );
    }

    fn for_each_mesh_material(&mut self, visit: &mut dyn FnMut(&mut dyn MeshMaterial)) {
        for id in &self.material_ids {
            if let Some(material) = self.materials.get_mut(*id) {
                visit(&mut MaterialHandle {
                    material,
                    emissive_intensity: 1.0,
                });
            }
        }
    }
}

/// Follow the preset selected in the store; at most one runs per target
fn sync_animation(
    session: Res<EditSession>,
    mut driver: ResMut<AnimationDriver>,
    mut targets: Query<(Entity, &mut BindState), With<EditTarget>>,
) {
    let requested = session.settings().animation;
    let transition = driver.controller.apply(requested);
    if transition.stops().is_none() && transition.starts().is_none() {
        return;
    }

    for (entity, mut state) in &mut targets {
        if transition.stops().is_some() {
            driver.registry.kill_tweens_of(&entity);
        }
        if let Some(preset) = transition.starts() {
            driver.registry.start(entity, preset);
        }
        // Re-apply from the base snapshot so stopped offsets are cleared
        state.applied_revision = None;
    }
    tracing::info!(?transition, "Animation changed");
}

fn advance_tweens(time: Res<Time>, mut driver: ResMut<AnimationDriver>) {
    if !driver.registry.is_empty() {
        driver.registry.advance(time.delta_secs_f64());
    }
}

/// Re-apply settings when the revision, the mesh set, or a running tween
/// calls for it. Targets without meshes (model still loading) are skipped.
fn apply_to_targets(
    session: Res<EditSession>,
    driver: Res<AnimationDriver>,
    mut targets: Query<(Entity, &mut Transform, &mut BindState), With<EditTarget>>,
    children: Query<&Children>,
    mesh_materials: Query<&MeshMaterial3d<StandardMaterial>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let revision = session.store.revision();

    for (entity, mut transform, mut state) in &mut targets {
        let mut seen = HashSet::new();
        let mut mesh_count = 0;
        let mut material_ids = Vec::new();
        for node in std::iter::once(entity).chain(children.iter_descendants(entity)) {
            if let Ok(material) = mesh_materials.get(node) {
                mesh_count += 1;
                let id = material.0.id();
                if seen.insert(id) {
                    material_ids.push(id);
                }
            }
        }
        if mesh_count == 0 {
            continue;
        }

        let samples = driver.registry.sample(&entity);
        let stale = state.applied_revision != Some(revision) || state.mesh_count != mesh_count;
        if !stale && samples.is_empty() {
            continue;
        }

        let settings = animated_settings(session.settings(), &samples);
        let mut object = TargetHandle {
            transform: &mut transform,
            materials: &mut materials,
            material_ids,
        };
        apply_settings(&mut object, &settings);

        if stale {
            tracing::debug!(revision, mesh_count, "Settings applied to target");
        }
        state.applied_revision = Some(revision);
        state.mesh_count = mesh_count;
    }
}

fn stop_animation(mut driver: ResMut<AnimationDriver>) {
    *driver = AnimationDriver::default();
}

#[cfg(test)]
mod tests {
    use super::*;
    use shapeforge_core::{AnimationId, SettingsPatch, ShapeReference};

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_plugins(bevy::state::app::StatesPlugin)
            .add_plugins(AssetPlugin::default())
            .init_asset::<StandardMaterial>()
            .init_state::<EditorView>()
            .add_plugins(BinderPlugin);
        app
    }

    fn spawn_target(app: &mut App) -> (Entity, Handle<StandardMaterial>) {
        let handle = app
            .world_mut()
            .resource_mut::<Assets<StandardMaterial>>()
            .add(StandardMaterial::default());
        let entity = app
            .world_mut()
            .spawn((
                Transform::default(),
                MeshMaterial3d(handle.clone()),
                EditTarget,
                BindState::default(),
            ))
            .id();
        (entity, handle)
    }

    fn enter_customize(app: &mut App) {
        app.insert_resource(EditSession::new(ShapeReference::primitive("box")));
        app.world_mut()
            .resource_mut::<NextState<EditorView>>()
            .set(EditorView::Customize);
        app.update();
    }

    #[test]
    fn test_settings_reach_transform_and_material() {
        let mut app = test_app();
        let (entity, handle) = spawn_target(&mut app);
        enter_customize(&mut app);

        app.world_mut().resource_mut::<EditSession>().store.update(&SettingsPatch {
            model_scale: Some(2.0),
            position_x: Some(3.0),
            metalness: Some(1.0),
            ..Default::default()
        });
        app.update();

        let transform = app.world().get::<Transform>(entity).unwrap();
        assert_eq!(transform.scale, Vec3::splat(2.0));
        assert_eq!(transform.translation.x, 3.0);
        let material = app
            .world()
            .resource::<Assets<StandardMaterial>>()
            .get(&handle)
            .unwrap();
        assert_eq!(material.metallic, 1.0);
    }

    #[test]
    fn test_toggle_preset_leaves_no_tweens() {
        let mut app = test_app();
        let (entity, _) = spawn_target(&mut app);
        enter_customize(&mut app);

        let preset = AnimationId::new(2).unwrap();
        app.world_mut()
            .resource_mut::<EditSession>()
            .store
            .update(&SettingsPatch::animation(Some(preset)));
        app.update();
        assert_eq!(
            app.world().resource::<AnimationDriver>().registry.active_for(&entity),
            1
        );

        app.world_mut()
            .resource_mut::<EditSession>()
            .store
            .update(&SettingsPatch::animation(None));
        app.update();

        let driver = app.world().resource::<AnimationDriver>();
        assert_eq!(driver.registry.active_for(&entity), 0);
        assert_eq!(driver.controller.active(), None);
        // Offsets are gone once the animation stops
        let transform = app.world().get::<Transform>(entity).unwrap();
        assert_eq!(transform.rotation, Quat::IDENTITY);
        assert_eq!(transform.translation, Vec3::ZERO);
    }

    #[test]
    fn test_switching_presets_keeps_one() {
        let mut app = test_app();
        let (entity, _) = spawn_target(&mut app);
        enter_customize(&mut app);

        for id in [3, 1] {
            let preset = AnimationId::new(id).unwrap();
            app.world_mut()
                .resource_mut::<EditSession>()
                .store
                .update(&SettingsPatch::animation(Some(preset)));
            app.update();
        }

        let driver = app.world().resource::<AnimationDriver>();
        assert_eq!(
            driver.registry.presets_for(&entity),
            vec![AnimationId::new(1).unwrap()]
        );
    }

    #[test]
    fn test_settings_wait_for_meshes() {
        let mut app = test_app();
        let target = app
            .world_mut()
            .spawn((Transform::default(), EditTarget, BindState::default()))
            .id();
        enter_customize(&mut app);

        app.world_mut().resource_mut::<EditSession>().store.update(&SettingsPatch {
            model_scale: Some(3.0),
            metalness: Some(0.9),
            ..Default::default()
        });
        app.update();
        assert_eq!(app.world().get::<Transform>(target).unwrap().scale, Vec3::ONE);

        // The loaded scene arrives as a child with its own material
        let handle = app
            .world_mut()
            .resource_mut::<Assets<StandardMaterial>>()
            .add(StandardMaterial::default());
        app.world_mut()
            .spawn((MeshMaterial3d(handle.clone()), ChildOf(target)));
        app.update();

        assert_eq!(
            app.world().get::<Transform>(target).unwrap().scale,
            Vec3::splat(3.0)
        );
        let material = app
            .world()
            .resource::<Assets<StandardMaterial>>()
            .get(&handle)
            .unwrap();
        assert_eq!(material.metallic, 0.9);
        assert_eq!(app.world().get::<BindState>(target).unwrap().mesh_count, 1);
    }

    #[test]
    fn test_emissive_scaled_by_intensity() {
        let mut material = StandardMaterial::default();
        let mut handle = MaterialHandle {
            material: &mut material,
            emissive_intensity: 1.0,
        };
        handle.set_emissive_intensity(2.0);
        handle.set_emissive_color(Rgb::new(255, 0, 0));
        assert_eq!(material.emissive, LinearRgba::rgb(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_unlit_has_no_emissive() {
        let mut material = StandardMaterial {
            unlit: true,
            ..default()
        };
        let handle = MaterialHandle {
            material: &mut material,
            emissive_intensity: 1.0,
        };
        assert!(!handle.supports_emissive());
    }
}
