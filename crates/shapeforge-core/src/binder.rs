//! Applying settings to a live scene object
//!
//! The renderer is reached only through [`SceneObject`], [`MeshMaterial`]
//! and [`PerspectiveCamera`]. [`SceneNode`] and [`CameraNode`] are plain
//! in-memory implementations used for headless inspection.

use serde::Serialize;

use crate::settings::{Rgb, Settings};

/// Material of one mesh-bearing node
pub trait MeshMaterial {
    fn set_base_color(&mut self, color: Rgb);
    fn set_metalness(&mut self, metalness: f64);
    fn set_roughness(&mut self, roughness: f64);
    fn set_emissive_intensity(&mut self, intensity: f64);
    fn supports_emissive(&self) -> bool;
    fn set_emissive_color(&mut self, color: Rgb);
}

/// Root of an edited object's render graph
pub trait SceneObject {
    fn set_scale(&mut self, scale: f64);
    /// Euler angles in radians, XYZ order
    fn set_rotation(&mut self, euler: [f64; 3]);
    fn set_position(&mut self, position: [f64; 3]);
    /// Visit the material of every mesh-bearing node, the root included
    fn for_each_mesh_material(&mut self, visit: &mut dyn FnMut(&mut dyn MeshMaterial));
}

pub trait PerspectiveCamera {
    fn set_fov_degrees(&mut self, fov: f64);
    fn update_projection_matrix(&mut self);
}

/// Apply a settings snapshot to `object`.
///
/// Order is fixed: scale, rotation, position, then materials. Every call is a
/// full re-apply, so calling twice with the same snapshot is a no-op the
/// second time. A color that fails to parse is skipped.
pub fn apply_settings(object: &mut dyn SceneObject, settings: &Settings) {
    object.set_scale(settings.model_scale);
    object.set_rotation(settings.rotation());
    object.set_position(settings.position());

    let base_color = settings
        .model_color
        .rgb()
        .map_err(|e| tracing::debug!("Skipping base color: {}", e))
        .ok();
    let emissive_color = settings
        .emissive_color
        .rgb()
        .map_err(|e| tracing::debug!("Skipping emissive color: {}", e))
        .ok();

    object.for_each_mesh_material(&mut |material| {
        if let Some(color) = base_color {
            material.set_base_color(color);
        }
        material.set_metalness(settings.metalness);
        material.set_roughness(settings.roughness);
        material.set_emissive_intensity(settings.emissive_intensity);
        if material.supports_emissive() {
            if let Some(color) = emissive_color {
                material.set_emissive_color(color);
            }
        }
    });
}

/// Set the camera's vertical field of view and refresh its projection
pub fn apply_camera_fov(camera: &mut dyn PerspectiveCamera, fov_degrees: f64) {
    camera.set_fov_degrees(fov_degrees);
    camera.update_projection_matrix();
}

/// Material state of a [`SceneNode`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMaterial {
    pub color: String,
    pub metalness: f64,
    pub roughness: f64,
    pub emissive_intensity: f64,
    /// `None` when the material has no emissive channel
    pub emissive: Option<String>,
}

impl NodeMaterial {
    pub fn standard() -> Self {
        Self {
            color: "#FFFFFF".to_string(),
            metalness: 0.0,
            roughness: 1.0,
            emissive_intensity: 1.0,
            emissive: Some("#000000".to_string()),
        }
    }

    pub fn unlit() -> Self {
        Self {
            emissive: None,
            ..Self::standard()
        }
    }
}

impl MeshMaterial for NodeMaterial {
    fn set_base_color(&mut self, color: Rgb) {
        self.color = color.to_hex();
    }

    fn set_metalness(&mut self, metalness: f64) {
        self.metalness = metalness;
    }

    fn set_roughness(&mut self, roughness: f64) {
        self.roughness = roughness;
    }

    fn set_emissive_intensity(&mut self, intensity: f64) {
        self.emissive_intensity = intensity;
    }

    fn supports_emissive(&self) -> bool {
        self.emissive.is_some()
    }

    fn set_emissive_color(&mut self, color: Rgb) {
        if let Some(emissive) = self.emissive.as_mut() {
            *emissive = color.to_hex();
        }
    }
}

/// In-memory object graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneNode {
    pub name: String,
    pub scale: [f64; 3],
    pub rotation: [f64; 3],
    pub position: [f64; 3],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<NodeMaterial>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    /// Node without a mesh
    pub fn group(name: impl Into<String>, children: Vec<SceneNode>) -> Self {
        Self {
            name: name.into(),
            scale: [1.0; 3],
            rotation: [0.0; 3],
            position: [0.0; 3],
            material: None,
            children,
        }
    }

    /// Mesh-bearing leaf
    pub fn mesh(name: impl Into<String>, material: NodeMaterial) -> Self {
        Self {
            material: Some(material),
            ..Self::group(name, Vec::new())
        }
    }

    pub fn mesh_count(&self) -> usize {
        self.material.is_some() as usize
            + self.children.iter().map(SceneNode::mesh_count).sum::<usize>()
    }

    fn visit_materials(&mut self, visit: &mut dyn FnMut(&mut dyn MeshMaterial)) {
        if let Some(material) = self.material.as_mut() {
            visit(material);
        }
        for child in &mut self.children {
            child.visit_materials(visit);
        }
    }
}

impl SceneObject for SceneNode {
    fn set_scale(&mut self, scale: f64) {
        self.scale = [scale; 3];
    }

    fn set_rotation(&mut self, euler: [f64; 3]) {
        self.rotation = euler;
    }

    fn set_position(&mut self, position: [f64; 3]) {
        self.position = position;
    }

    fn for_each_mesh_material(&mut self, visit: &mut dyn FnMut(&mut dyn MeshMaterial)) {
        self.visit_materials(visit);
    }
}

/// In-memory perspective camera
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraNode {
    pub fov: f64,
    pub projection_fov: f64,
}

impl Default for CameraNode {
    fn default() -> Self {
        Self {
            fov: 50.0,
            projection_fov: 50.0,
        }
    }
}

impl PerspectiveCamera for CameraNode {
    fn set_fov_degrees(&mut self, fov: f64) {
        self.fov = fov;
    }

    fn update_projection_matrix(&mut self) {
        self.projection_fov = self.fov;
    }
}
