//! Headless binding of settings onto an in-memory object graph

use serde::Serialize;
use shapeforge_core::{
    apply_camera_fov, apply_settings, resolve, CameraNode, NodeMaterial, SceneNode, Settings,
    ShapeReference,
};

/// What the editor would show for a scene, as plain data
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Inspection {
    pub shape: ShapeReference,
    pub geometry_args: Vec<f64>,
    pub settings: Settings,
    pub object: SceneNode,
    pub camera: CameraNode,
}

/// Object graph for a shape before any settings are applied.
///
/// Models are not parsed here, so their graph has no meshes and material
/// settings have nothing to land on.
fn object_for(shape: &ShapeReference) -> SceneNode {
    match shape {
        ShapeReference::Primitive(primitive) => {
            SceneNode::mesh(primitive.name(), NodeMaterial::standard())
        }
        ShapeReference::Model(_) => SceneNode::group(shape.label(), Vec::new()),
    }
}

pub fn inspect(shape: &ShapeReference, settings: &Settings) -> Inspection {
    let mut object = object_for(shape);
    apply_settings(&mut object, settings);

    let mut camera = CameraNode::default();
    apply_camera_fov(&mut camera, settings.camera_fov);

    let geometry_args = match shape {
        ShapeReference::Primitive(primitive) => resolve(primitive.name()).args,
        ShapeReference::Model(_) => Vec::new(),
    };

    Inspection {
        shape: shape.clone(),
        geometry_args,
        settings: settings.clone(),
        object,
        camera,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shapeforge_core::{HexColor, SettingsPatch};

    #[test]
    fn test_primitive_material_follows_settings() {
        let shape = ShapeReference::primitive("sphere");
        let settings = SettingsPatch {
            model_color: Some(HexColor::from("#ff00ff")),
            emissive_color: Some(HexColor::from("#00FF00")),
            camera_fov: Some(90.0),
            ..Default::default()
        }
        .merged_onto(&Settings::default());

        let inspection = inspect(&shape, &settings);
        let material = inspection.object.material.as_ref().unwrap();
        assert_eq!(material.color, "#FF00FF");
        assert_eq!(material.emissive.as_deref(), Some("#00FF00"));
        assert_eq!(inspection.camera.projection_fov, 90.0);
        assert!(!inspection.geometry_args.is_empty());
    }

    #[test]
    fn test_model_graph_has_no_meshes() {
        let shape = ShapeReference::resolve("models/airbus.glb");
        let inspection = inspect(&shape, &Settings::default());
        assert_eq!(inspection.object.mesh_count(), 0);
        assert_eq!(inspection.object.name, "airbus.glb");
    }

    #[test]
    fn test_json_uses_camel_case() {
        let shape = ShapeReference::primitive("box");
        let json = serde_json::to_value(inspect(&shape, &Settings::default())).unwrap();
        assert_eq!(json["settings"]["cameraFOV"], 50.0);
        assert_eq!(json["object"]["scale"][0], 1.0);
        assert!(json["geometryArgs"].is_array());
    }
}
