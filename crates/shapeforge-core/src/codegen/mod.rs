//! Code snippet generation
//!
//! [`generate`] is a pure function of the settings snapshot, the shape
//! reference and the active preset. The inputs are first flattened into
//! [`CodeParams`], then the versioned skeletons in [`templates`] are filled
//! by [`fill`].

pub mod templates;

use std::fmt;

use crate::animation::{AnimationId, TweenDelta, TweenPath, TweenSpec, RepeatMode};
use crate::geometry::{resolve_source, ShapeReference};
use crate::settings::{HexColor, Settings};

/// Output flavour of a generated snippet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    React,
    Next,
    Vanilla,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::React, Variant::Next, Variant::Vanilla];

    pub fn label(&self) -> &'static str {
        match self {
            Variant::React => "React",
            Variant::Next => "Next",
            Variant::Vanilla => "Vanilla",
        }
    }

    /// Case-insensitive lookup by label
    pub fn from_label(label: &str) -> Option<Variant> {
        Variant::ALL
            .into_iter()
            .find(|variant| variant.label().eq_ignore_ascii_case(label.trim()))
    }

    /// Expression naming the animated object in this variant's code
    pub fn object_ref(&self) -> &'static str {
        match self {
            Variant::React | Variant::Next => "modelRef.current",
            Variant::Vanilla => "model",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The three snippet texts for one scene
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSnippet {
    pub react: String,
    pub next: String,
    pub vanilla: String,
}

impl GeneratedSnippet {
    pub fn get(&self, variant: Variant) -> &str {
        match variant {
            Variant::React => &self.react,
            Variant::Next => &self.next,
            Variant::Vanilla => &self.vanilla,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Variant, &str)> {
        Variant::ALL.into_iter().map(move |variant| (variant, self.get(variant)))
    }
}

/// Format a number as a JavaScript literal without losing precision
pub fn js_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        // Display gives the shortest text that parses back to the same value
        format!("{}", value)
    }
}

/// Escape text for use inside a JavaScript string literal
pub fn js_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\u{2028}' => escaped.push_str("\\u2028"),
            '\u{2029}' => escaped.push_str("\\u2029"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Replace every `{{name}}` in `template` with `lookup(name)`.
///
/// Unknown names are logged and left in place so the gap is visible in the
/// output. Substituted text is not scanned again.
pub fn fill(template: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len() + 256);
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let name = after.find("}}").map(|end| &after[..end]);

        match name {
            Some(name) if is_placeholder_name(name) => {
                match lookup(name) {
                    Some(value) => out.push_str(&value),
                    None => {
                        tracing::warn!("Unknown template placeholder: {}", name);
                        out.push_str("{{");
                        out.push_str(name);
                        out.push_str("}}");
                    }
                }
                rest = &after[name.len() + 2..];
            }
            _ => {
                // Not a placeholder; emit one brace and rescan from the next
                out.push('{');
                rest = &rest[start + 1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Settings flattened into template values
#[derive(Debug, Clone, PartialEq)]
pub struct CodeParams {
    pub model_scale: f64,
    pub rotation: [f64; 3],
    pub position: [f64; 3],
    pub model_color: HexColor,
    pub metalness: f64,
    pub roughness: f64,
    pub emissive_color: HexColor,
    pub emissive_intensity: f64,
    pub camera_fov: f64,
}

impl From<&Settings> for CodeParams {
    fn from(settings: &Settings) -> Self {
        Self {
            model_scale: settings.model_scale,
            rotation: settings.rotation(),
            position: settings.position(),
            model_color: settings.model_color.clone(),
            metalness: settings.metalness,
            roughness: settings.roughness,
            emissive_color: settings.emissive_color.clone(),
            emissive_intensity: settings.emissive_intensity,
            camera_fov: settings.camera_fov,
        }
    }
}

impl CodeParams {
    /// Value for a settings placeholder
    pub fn lookup(&self, key: &str) -> Option<String> {
        let value = match key {
            "modelScale" => js_number(self.model_scale),
            "rotationX" => js_number(self.rotation[0]),
            "rotationY" => js_number(self.rotation[1]),
            "rotationZ" => js_number(self.rotation[2]),
            "positionX" => js_number(self.position[0]),
            "positionY" => js_number(self.position[1]),
            "positionZ" => js_number(self.position[2]),
            "modelColor" => js_escape(self.model_color.as_str()),
            "metalness" => js_number(self.metalness),
            "roughness" => js_number(self.roughness),
            "emissiveColor" => js_escape(self.emissive_color.as_str()),
            "emissiveIntensity" => js_number(self.emissive_intensity),
            "cameraFOV" => js_number(self.camera_fov),
            _ => return None,
        };
        Some(value)
    }
}

fn indent(text: &str, spaces: usize) -> String {
    let pad = " ".repeat(spaces);
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{}{}", pad, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn tween_props(spec: &TweenSpec) -> String {
    match spec.delta {
        TweenDelta::Relative(delta) => {
            let amount = format!("\"+={}\"", js_number(delta));
            match spec.path {
                TweenPath::PositionY | TweenPath::RotationY => format!("y: {}", amount),
                TweenPath::RotationZ => format!("z: {}", amount),
                TweenPath::Scale => format!("x: {0}, y: {0}, z: {0}", amount),
                TweenPath::MaterialColor => String::new(),
            }
        }
        TweenDelta::Color(hex) => match HexColor::from(hex).rgb() {
            Ok(rgb) => {
                let [r, g, b] = rgb.to_linear();
                format!("r: {}, g: {}, b: {}", js_number(r), js_number(g), js_number(b))
            }
            Err(e) => {
                tracing::warn!("Preset color does not parse: {}", e);
                String::new()
            }
        },
    }
}

/// Tween statements for `preset`, one per line, targeting `object_ref`
pub fn render_tweens(preset: AnimationId, object_ref: &str) -> String {
    preset
        .preset()
        .tweens
        .iter()
        .map(|spec| {
            let template = match spec.delta {
                TweenDelta::Color(_) => templates::COLOR_TWEEN_V1,
                TweenDelta::Relative(_) => templates::TWEEN_V1,
            };
            fill(template, |key| match key {
                "target" => Some(object_ref.to_string()),
                "path" => Some(spec.path.code_path().to_string()),
                "props" => Some(tween_props(spec)),
                "duration" => Some(js_number(spec.duration_secs)),
                "yoyo" => Some((spec.repeat == RepeatMode::Yoyo).to_string()),
                "ease" => Some(spec.ease.name().to_string()),
                _ => None,
            })
        })
        .collect::<Vec<_>>()
        .join("\n")
}

const GSAP_IMPORT: &str = "import { gsap } from \"gsap\";\n";

fn react_snippet(
    params: &CodeParams,
    shape: &ShapeReference,
    animation: Option<AnimationId>,
    variant: Variant,
) -> String {
    let (directive, component) = match variant {
        Variant::Next => ("\"use client\";\n", "Page"),
        _ => ("", "Scene"),
    };

    let (drei_imports, model_setup, wrapper, model_markup) = match shape.code_path() {
        Some(path) => (
            "useGLTF, OrbitControls",
            format!("  const {{ scene }} = useGLTF(\"{}\");", js_escape(&path)),
            "group",
            "      <primitive object={scene} />".to_string(),
        ),
        None => {
            let source = resolve_source(&shape_name(shape));
            (
                "OrbitControls",
                String::new(),
                "mesh",
                format!("      {}\n      <meshStandardMaterial />", source.jsx()),
            )
        }
    };

    let animation_effect = animation
        .map(|preset| {
            let tweens = indent(&render_tweens(preset, variant.object_ref()), 4);
            fill(templates::REACT_ANIMATION_V1, |key| match key {
                "tweens" => Some(tweens.clone()),
                _ => None,
            })
        })
        .unwrap_or_default();
    let gsap_import = if animation.is_some() { GSAP_IMPORT } else { "" };

    fill(templates::REACT_V1, |key| match key {
        "directive" => Some(directive.to_string()),
        "component" => Some(component.to_string()),
        "dreiImports" => Some(drei_imports.to_string()),
        "gsapImport" => Some(gsap_import.to_string()),
        "modelSetup" => Some(model_setup.clone()),
        "animationEffect" => Some(animation_effect.clone()),
        "wrapper" => Some(wrapper.to_string()),
        "modelMarkup" => Some(model_markup.clone()),
        _ => params.lookup(key),
    })
}

fn vanilla_snippet(
    params: &CodeParams,
    shape: &ShapeReference,
    animation: Option<AnimationId>,
) -> String {
    let model_path = shape.code_path();
    let tweens = animation
        .map(|preset| render_tweens(preset, Variant::Vanilla.object_ref()))
        .unwrap_or_default();

    let object_setup = match &model_path {
        Some(path) => {
            let tweens = if tweens.is_empty() {
                String::new()
            } else {
                indent(&tweens, 2) + "\n"
            };
            fill(templates::VANILLA_MODEL_V1, |key| match key {
                "modelPath" => Some(js_escape(path)),
                "tweens" => Some(tweens.clone()),
                _ => params.lookup(key),
            })
        }
        None => {
            let source = resolve_source(&shape_name(shape));
            let tweens = if tweens.is_empty() {
                String::new()
            } else {
                tweens.clone() + "\n"
            };
            fill(templates::VANILLA_SHAPE_V1, |key| match key {
                "geometryCall" => Some(source.call()),
                "tweens" => Some(tweens.clone()),
                _ => params.lookup(key),
            })
        }
    };

    let loader_import = if model_path.is_some() {
        "import { GLTFLoader } from \"three/examples/jsm/loaders/GLTFLoader.js\";\n"
    } else {
        ""
    };
    let gsap_import = if animation.is_some() { GSAP_IMPORT } else { "" };

    fill(templates::VANILLA_V1, |key| match key {
        "loaderImport" => Some(loader_import.to_string()),
        "gsapImport" => Some(gsap_import.to_string()),
        "objectSetup" => Some(object_setup.clone()),
        _ => params.lookup(key),
    })
}

fn shape_name(shape: &ShapeReference) -> String {
    match shape {
        ShapeReference::Primitive(primitive) => primitive.name().to_string(),
        ShapeReference::Model(locator) => locator.clone(),
    }
}

/// Render all three snippet variants
pub fn generate(
    settings: &Settings,
    shape: &ShapeReference,
    animation: Option<AnimationId>,
) -> GeneratedSnippet {
    let params = CodeParams::from(settings);
    tracing::debug!(
        shape = %shape.label(),
        animation = ?animation.map(AnimationId::get),
        version = templates::TEMPLATE_VERSION,
        "Generating snippets"
    );
    GeneratedSnippet {
        react: react_snippet(&params, shape, animation, Variant::React),
        next: react_snippet(&params, shape, animation, Variant::Next),
        vanilla: vanilla_snippet(&params, shape, animation),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PrimitiveShape;
    use crate::settings::{Rgb, SettingsPatch, ViewKind};

    fn id(n: u8) -> AnimationId {
        AnimationId::new(n).unwrap()
    }

    #[test]
    fn test_fill_substitutes_and_skips_non_placeholders() {
        let out = fill("a {{x}} b {{ y: {{x}} }} {{{x}}} {{missing}}", |key| {
            (key == "x").then(|| "1".to_string())
        });
        assert_eq!(out, "a 1 b {{ y: 1 }} {1} {{missing}}");
    }

    #[test]
    fn test_fill_does_not_rescan_values() {
        let out = fill("{{a}}", |_| Some("{{a}}".to_string()));
        assert_eq!(out, "{{a}}");
    }

    #[test]
    fn test_js_number_round_trips() {
        assert_eq!(js_number(3.0988), "3.0988");
        assert_eq!(js_number(50.0), "50");
        assert_eq!(js_number(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(js_number(f64::INFINITY), "Infinity");
        assert_eq!(js_number(f64::NAN), "NaN");
        let text = js_number(std::f64::consts::TAU);
        assert_eq!(text.parse::<f64>().unwrap(), std::f64::consts::TAU);
    }

    #[test]
    fn test_js_escape() {
        assert_eq!(js_escape(r#"a'b"c\d"#), r#"a\'b\"c\\d"#);
    }

    #[test]
    fn test_every_number_survives_in_every_variant() {
        let settings = SettingsPatch {
            model_scale: Some(3.0988),
            rotation_x: Some(0.123456789),
            rotation_y: Some(1.1),
            rotation_z: Some(6.283185307179586),
            position_x: Some(-7.25),
            position_y: Some(4.0001),
            position_z: Some(-0.3333333333333333),
            metalness: Some(0.77),
            roughness: Some(0.0625),
            emissive_intensity: Some(4.999),
            camera_fov: Some(87.5),
            ..Default::default()
        }
        .merged_onto(&Settings::default());

        let numbers = [
            settings.model_scale,
            settings.rotation_x,
            settings.rotation_y,
            settings.rotation_z,
            settings.position_x,
            settings.position_y,
            settings.position_z,
            settings.metalness,
            settings.roughness,
            settings.emissive_intensity,
            settings.camera_fov,
        ];

        for shape in [
            ShapeReference::Primitive(PrimitiveShape::Torus),
            ShapeReference::Model("models/shiba.glb".to_string()),
        ] {
            let snippet = generate(&settings, &shape, None);
            for (variant, text) in snippet.iter() {
                for number in numbers {
                    let literal = js_number(number);
                    assert!(
                        text.contains(&literal),
                        "{} snippet for {} is missing {}",
                        variant,
                        shape.label(),
                        literal
                    );
                }
                assert!(!text.contains("3.1,"));
            }
        }
    }

    #[test]
    fn test_sphere_vanilla_defaults() {
        let snippet = generate(&Settings::default(), &ShapeReference::primitive("sphere"), None);
        assert!(snippet.vanilla.contains("SphereGeometry(1.5, 32, 32)"));
        assert!(snippet
            .vanilla
            .contains("new THREE.PerspectiveCamera(50, window.innerWidth"));
        assert!(!snippet.vanilla.contains("gsap"));
        assert!(!snippet.vanilla.contains("GLTFLoader"));
    }

    #[test]
    fn test_react_contains_color_and_intensity() {
        let settings = SettingsPatch {
            model_color: Some(HexColor::from("#FF00FF")),
            emissive_intensity: Some(2.5),
            ..Default::default()
        }
        .merged_onto(&Settings::defaults_for(ViewKind::Shape));

        let snippet = generate(&settings, &ShapeReference::primitive("box"), None);
        assert!(snippet.react.contains("'#FF00FF'"));
        assert!(snippet.react.contains("2.5"));
        assert!(snippet.react.contains("<boxGeometry args={[2, 2, 2]} />"));
        assert!(snippet.react.contains("camera={{ fov: 50, position: [0, 0, 10] }}"));
        assert!(snippet.react.contains("<CameraController fov={50} />"));
    }

    #[test]
    fn test_next_adds_client_directive() {
        let snippet = generate(&Settings::default(), &ShapeReference::primitive("cone"), None);
        assert!(snippet.next.starts_with("\"use client\";\n"));
        assert!(snippet.next.contains("export default Page;"));
        assert!(!snippet.react.contains("use client"));
        assert!(snippet.react.contains("export default Scene;"));
    }

    #[test]
    fn test_model_snippets_use_loader() {
        let shape = ShapeReference::uploaded(4, "robot.glb");
        let snippet = generate(&Settings::defaults_for(ViewKind::Model), &shape, None);
        assert!(snippet.react.contains("useGLTF(\"./robot.glb\")"));
        assert!(snippet.react.contains("<primitive object={scene} />"));
        assert!(snippet.vanilla.contains("loader.load(\"./robot.glb\""));
        assert!(!snippet.vanilla.contains("upload://"));
    }

    #[test]
    fn test_animation_spliced_per_variant() {
        let snippet = generate(&Settings::default(), &ShapeReference::primitive("box"), Some(id(2)));
        assert!(snippet.react.contains("import { gsap } from \"gsap\";"));
        assert!(snippet.react.contains("gsap.to(modelRef.current.rotation, { y: \"+=6.283185307179586\""));
        assert!(snippet.react.contains("gsap.killTweensOf"));
        assert!(snippet.vanilla.contains("gsap.to(model.rotation, { y: \"+=6.283185307179586\""));
        assert!(snippet.vanilla.contains("repeat: -1, yoyo: false, ease: \"none\""));

        let inactive = generate(&Settings::default(), &ShapeReference::primitive("box"), None);
        assert!(!inactive.react.contains("gsap"));
    }

    #[test]
    fn test_color_preset_targets_materials() {
        let text = render_tweens(id(5), "model");
        assert!(text.starts_with("model.traverse("));
        assert!(text.contains("gsap.to(child.material.color, { r: 1, g: "));
        assert!(text.contains("yoyo: true"));
    }

    #[test]
    fn test_color_preset_emits_linear_channels() {
        let text = render_tweens(id(5), "model");
        let [r, g, b] = Rgb::new(255, 99, 71).to_linear();
        let expected = format!("r: {}, g: {}, b: {}", js_number(r), js_number(g), js_number(b));
        assert!(text.contains(&expected), "{}", text);
        // Not the sRGB byte ratio 99/255
        assert!(!text.contains(&format!("g: {}", js_number(99.0 / 255.0))));
        assert!(g < 0.13);
    }

    #[test]
    fn test_no_unfilled_placeholders() {
        for preset in [None, Some(id(1)), Some(id(3)), Some(id(5))] {
            for shape in [
                ShapeReference::primitive("ring"),
                ShapeReference::Model("models/airbus.glb".to_string()),
            ] {
                let snippet = generate(&Settings::default(), &shape, preset);
                for (_, text) in snippet.iter() {
                    for key in ["{{modelScale", "{{tweens", "{{wrapper", "{{objectSetup", "{{target"] {
                        assert!(!text.contains(key), "unfilled {} in {}", key, text);
                    }
                }
            }
        }
    }
}
