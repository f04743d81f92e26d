//! Primitive shape catalog and geometry resolution
//!
//! Two tables are maintained side by side: [`resolve`] yields the numeric
//! constructor arguments used by the renderer, and [`resolve_source`] yields
//! the constructor text emitted into generated code. Both are keyed by the
//! same case-insensitive shape name and both fall back to a box.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed set of primitive shapes the editor can build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrimitiveShape {
    Box,
    Sphere,
    Plane,
    Circle,
    Cone,
    Cylinder,
    Torus,
    TorusKnot,
    Dodecahedron,
    Icosahedron,
    Octahedron,
    Tetrahedron,
    Ring,
    Capsule,
}

impl PrimitiveShape {
    /// All shapes in gallery order
    pub const ALL: [PrimitiveShape; 14] = [
        PrimitiveShape::Box,
        PrimitiveShape::Sphere,
        PrimitiveShape::Plane,
        PrimitiveShape::Circle,
        PrimitiveShape::Cone,
        PrimitiveShape::Cylinder,
        PrimitiveShape::Torus,
        PrimitiveShape::TorusKnot,
        PrimitiveShape::Dodecahedron,
        PrimitiveShape::Icosahedron,
        PrimitiveShape::Octahedron,
        PrimitiveShape::Tetrahedron,
        PrimitiveShape::Ring,
        PrimitiveShape::Capsule,
    ];

    /// Canonical lowercase name (e.g. "torus-knot")
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveShape::Box => "box",
            PrimitiveShape::Sphere => "sphere",
            PrimitiveShape::Plane => "plane",
            PrimitiveShape::Circle => "circle",
            PrimitiveShape::Cone => "cone",
            PrimitiveShape::Cylinder => "cylinder",
            PrimitiveShape::Torus => "torus",
            PrimitiveShape::TorusKnot => "torus-knot",
            PrimitiveShape::Dodecahedron => "dodecahedron",
            PrimitiveShape::Icosahedron => "icosahedron",
            PrimitiveShape::Octahedron => "octahedron",
            PrimitiveShape::Tetrahedron => "tetrahedron",
            PrimitiveShape::Ring => "ring",
            PrimitiveShape::Capsule => "capsule",
        }
    }

    /// Look up a shape by name, ignoring ASCII case
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|shape| shape.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Whether the shape is flat and needs double-sided rendering
    pub fn is_flat(&self) -> bool {
        matches!(
            self,
            PrimitiveShape::Plane | PrimitiveShape::Circle | PrimitiveShape::Ring
        )
    }
}

impl fmt::Display for PrimitiveShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Renderer-facing geometry: the shape and its positional constructor arguments
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryDescriptor {
    pub shape: PrimitiveShape,
    pub args: Vec<f64>,
}

impl GeometryDescriptor {
    fn new(shape: PrimitiveShape, args: &[f64]) -> Self {
        Self {
            shape,
            args: args.to_vec(),
        }
    }

    /// Positional argument at `index`, or `default` when absent
    pub fn arg(&self, index: usize, default: f64) -> f64 {
        self.args.get(index).copied().unwrap_or(default)
    }
}

/// Resolve a shape name to the renderer's geometry arguments.
///
/// Unrecognized names resolve to the default box.
pub fn resolve(name: &str) -> GeometryDescriptor {
    let shape = PrimitiveShape::from_name(name).unwrap_or(PrimitiveShape::Box);
    match shape {
        PrimitiveShape::Box => GeometryDescriptor::new(shape, &[2.0, 2.0, 2.0]),
        PrimitiveShape::Sphere => GeometryDescriptor::new(shape, &[1.5, 32.0, 32.0]),
        PrimitiveShape::Plane => GeometryDescriptor::new(shape, &[4.0, 4.0]),
        PrimitiveShape::Circle => GeometryDescriptor::new(shape, &[2.0, 32.0]),
        PrimitiveShape::Cone => GeometryDescriptor::new(shape, &[1.5, 3.0, 32.0]),
        PrimitiveShape::Cylinder => GeometryDescriptor::new(shape, &[1.0, 1.0, 3.0, 32.0]),
        PrimitiveShape::Torus => GeometryDescriptor::new(shape, &[1.0, 0.4, 16.0, 100.0]),
        PrimitiveShape::TorusKnot => GeometryDescriptor::new(shape, &[1.0, 0.3, 100.0, 16.0]),
        PrimitiveShape::Dodecahedron => GeometryDescriptor::new(shape, &[1.0, 0.0]),
        PrimitiveShape::Icosahedron => GeometryDescriptor::new(shape, &[1.0, 0.0]),
        PrimitiveShape::Octahedron => GeometryDescriptor::new(shape, &[1.0, 0.0]),
        PrimitiveShape::Tetrahedron => GeometryDescriptor::new(shape, &[1.0, 0.0]),
        PrimitiveShape::Ring => GeometryDescriptor::new(shape, &[1.0, 2.0, 32.0]),
        PrimitiveShape::Capsule => GeometryDescriptor::new(shape, &[1.0, 2.0, 8.0, 16.0]),
    }
}

/// Source-level geometry constructor as it appears in generated code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometrySource {
    pub shape: PrimitiveShape,
    /// Three.js class name (e.g. "SphereGeometry")
    pub constructor: &'static str,
    /// Comma-separated argument list (e.g. "1.5, 32, 32")
    pub args: &'static str,
}

impl GeometrySource {
    /// Constructor call text, e.g. `SphereGeometry(1.5, 32, 32)`
    pub fn call(&self) -> String {
        format!("{}({})", self.constructor, self.args)
    }

    /// JSX element, e.g. `<sphereGeometry args={[1.5, 32, 32]} />`
    pub fn jsx(&self) -> String {
        let mut chars = self.constructor.chars();
        let element = match chars.next() {
            Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
            None => String::new(),
        };
        format!("<{} args={{[{}]}} />", element, self.args)
    }
}

/// Resolve a shape name to the constructor text used in generated code.
///
/// Kept as its own table; unrecognized names resolve to the box constructor.
pub fn resolve_source(name: &str) -> GeometrySource {
    let (shape, constructor, args) = match name.trim().to_ascii_lowercase().as_str() {
        "sphere" => (PrimitiveShape::Sphere, "SphereGeometry", "1.5, 32, 32"),
        "plane" => (PrimitiveShape::Plane, "PlaneGeometry", "4, 4"),
        "circle" => (PrimitiveShape::Circle, "CircleGeometry", "2, 32"),
        "cone" => (PrimitiveShape::Cone, "ConeGeometry", "1.5, 3, 32"),
        "cylinder" => (PrimitiveShape::Cylinder, "CylinderGeometry", "1, 1, 3, 32"),
        "torus" => (PrimitiveShape::Torus, "TorusGeometry", "1, 0.4, 16, 100"),
        "torus-knot" => (PrimitiveShape::TorusKnot, "TorusKnotGeometry", "1, 0.3, 100, 16"),
        "dodecahedron" => (PrimitiveShape::Dodecahedron, "DodecahedronGeometry", "1, 0"),
        "icosahedron" => (PrimitiveShape::Icosahedron, "IcosahedronGeometry", "1, 0"),
        "octahedron" => (PrimitiveShape::Octahedron, "OctahedronGeometry", "1, 0"),
        "tetrahedron" => (PrimitiveShape::Tetrahedron, "TetrahedronGeometry", "1, 0"),
        "ring" => (PrimitiveShape::Ring, "RingGeometry", "1, 2, 32"),
        "capsule" => (PrimitiveShape::Capsule, "CapsuleGeometry", "1, 2, 8, 16"),
        _ => (PrimitiveShape::Box, "BoxGeometry", "2, 2, 2"),
    };
    GeometrySource {
        shape,
        constructor,
        args,
    }
}

/// What an editing view was opened for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ShapeReference {
    /// One of the built-in primitives
    Primitive(PrimitiveShape),
    /// A glTF asset locator (bundled path or uploaded asset)
    Model(String),
}

/// Locator prefix for models registered from a user upload
pub const UPLOAD_SCHEME: &str = "upload://";

/// Path of an accepted upload inside the upload asset source
pub fn upload_asset_path(id: u64, filename: &str) -> String {
    format!("{}/{}", id, filename)
}

impl ShapeReference {
    /// Primitive reference; unknown names fall back to a box
    pub fn primitive(name: &str) -> Self {
        ShapeReference::Primitive(PrimitiveShape::from_name(name).unwrap_or(PrimitiveShape::Box))
    }

    /// Model-aware resolution: recognized names become primitives, anything
    /// else is treated as an asset locator
    pub fn resolve(locator: &str) -> Self {
        match PrimitiveShape::from_name(locator) {
            Some(shape) => ShapeReference::Primitive(shape),
            None => ShapeReference::Model(locator.to_string()),
        }
    }

    /// Reference to a model registered through the upload asset source.
    ///
    /// `id` scopes the locator to one acceptance, so picking a different
    /// file with the same name never resolves to an earlier upload.
    pub fn uploaded(id: u64, filename: &str) -> Self {
        ShapeReference::Model(format!("{}{}", UPLOAD_SCHEME, upload_asset_path(id, filename)))
    }

    pub fn is_model(&self) -> bool {
        matches!(self, ShapeReference::Model(_))
    }

    /// Path to emit in generated code.
    ///
    /// Uploaded models only exist inside the editor session, so they are
    /// emitted as a relative file path the user places next to their code.
    pub fn code_path(&self) -> Option<String> {
        match self {
            ShapeReference::Primitive(_) => None,
            ShapeReference::Model(locator) => Some(match locator.strip_prefix(UPLOAD_SCHEME) {
                Some(path) => {
                    let filename = path.split_once('/').map_or(path, |(_, name)| name);
                    format!("./{}", filename)
                }
                None => locator.clone(),
            }),
        }
    }

    /// Short label for UI headings
    pub fn label(&self) -> String {
        match self {
            ShapeReference::Primitive(shape) => shape.name().to_uppercase(),
            ShapeReference::Model(locator) => locator
                .rsplit('/')
                .next()
                .unwrap_or(locator.as_str())
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_and_source_tables_agree() {
        for shape in PrimitiveShape::ALL {
            let upper = shape.name().to_uppercase();
            assert_eq!(resolve(shape.name()).shape, resolve_source(shape.name()).shape);
            assert_eq!(resolve(&upper).shape, resolve_source(&upper).shape);
            assert_eq!(resolve(&upper).shape, shape);
        }
    }

    #[test]
    fn test_source_args_match_render_args() {
        for shape in PrimitiveShape::ALL {
            let rendered: Vec<String> = resolve(shape.name())
                .args
                .iter()
                .map(|a| a.to_string())
                .collect();
            assert_eq!(rendered.join(", "), resolve_source(shape.name()).args, "{}", shape);
        }
    }

    #[test]
    fn test_unknown_shape_defaults_to_box() {
        assert_eq!(resolve("hexagon").shape, PrimitiveShape::Box);
        assert_eq!(resolve("hexagon").args, vec![2.0, 2.0, 2.0]);
        assert_eq!(resolve_source("hexagon").call(), "BoxGeometry(2, 2, 2)");
        assert_eq!(resolve("").shape, PrimitiveShape::Box);
    }

    #[test]
    fn test_case_insensitive_lookup() {
        assert_eq!(resolve("Torus").shape, PrimitiveShape::Torus);
        assert_eq!(resolve_source("Torus").constructor, "TorusGeometry");
        assert_eq!(resolve("TORUS-KNOT").shape, PrimitiveShape::TorusKnot);
    }

    #[test]
    fn test_source_rendering() {
        let sphere = resolve_source("sphere");
        assert_eq!(sphere.call(), "SphereGeometry(1.5, 32, 32)");
        assert_eq!(sphere.jsx(), "<sphereGeometry args={[1.5, 32, 32]} />");
        assert_eq!(
            resolve_source("torus-knot").jsx(),
            "<torusKnotGeometry args={[1, 0.3, 100, 16]} />"
        );
    }

    #[test]
    fn test_shape_reference_resolution() {
        assert_eq!(
            ShapeReference::resolve("Sphere"),
            ShapeReference::Primitive(PrimitiveShape::Sphere)
        );
        assert_eq!(
            ShapeReference::resolve("/models/shiba.glb"),
            ShapeReference::Model("/models/shiba.glb".to_string())
        );
        assert_eq!(
            ShapeReference::primitive("/models/shiba.glb"),
            ShapeReference::Primitive(PrimitiveShape::Box)
        );
    }

    #[test]
    fn test_code_path_for_uploads() {
        let uploaded = ShapeReference::uploaded(7, "robot.glb");
        assert_eq!(uploaded, ShapeReference::Model("upload://7/robot.glb".to_string()));
        assert_eq!(uploaded.code_path().as_deref(), Some("./robot.glb"));
        assert_eq!(uploaded.label(), "robot.glb");

        let bundled = ShapeReference::Model("/models/airbus.glb".to_string());
        assert_eq!(bundled.code_path().as_deref(), Some("/models/airbus.glb"));
        assert_eq!(ShapeReference::primitive("cone").code_path(), None);
    }

    #[test]
    fn test_same_name_uploads_stay_distinct() {
        let first = ShapeReference::uploaded(0, "robot.glb");
        let second = ShapeReference::uploaded(1, "robot.glb");
        assert_ne!(first, second);
        assert_eq!(first.code_path(), second.code_path());
        assert_eq!(first.label(), second.label());
    }
}
