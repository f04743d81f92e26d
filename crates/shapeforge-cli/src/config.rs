//! Scene description loading and validation

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use shapeforge_core::{AnimationId, SettingsPatch, SettingsStore, ShapeReference, Variant};
use std::path::{Path, PathBuf};
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scene: SceneConfig,
    /// Overrides on top of the view defaults, camelCase keys
    #[serde(default)]
    pub settings: SettingsPatch,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Primitive name; unknown names build a box
    #[serde(default = "default_shape")]
    pub shape: String,
    /// Model path; takes precedence over `shape` when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Animation preset id (1-5)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<u8>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            shape: default_shape(),
            model: None,
            animation: None,
        }
    }
}

fn default_shape() -> String {
    "box".to_string()
}

impl SceneConfig {
    pub fn shape_reference(&self) -> ShapeReference {
        match &self.model {
            Some(model) => ShapeReference::Model(model.clone()),
            None => ShapeReference::primitive(&self.shape),
        }
    }

    pub fn animation_id(&self) -> Result<Option<AnimationId>> {
        self.animation
            .map(AnimationId::new)
            .transpose()
            .context("Invalid [scene].animation")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// "react", "next", "vanilla", or "all"
    #[serde(default = "default_variant")]
    pub variant: String,
    /// File to write; stdout when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            variant: default_variant(),
            path: None,
        }
    }
}

fn default_variant() -> String {
    "all".to_string()
}

impl OutputConfig {
    /// Variants selected for output, in tab order
    pub fn variants(&self) -> Result<Vec<Variant>> {
        if self.variant.trim().eq_ignore_ascii_case("all") {
            return Ok(Variant::ALL.to_vec());
        }
        Variant::from_label(&self.variant)
            .map(|variant| vec![variant])
            .ok_or_else(|| anyhow!("Unknown variant '{}' (expected react, next, vanilla or all)", self.variant))
    }
}

impl Config {
    /// Settings store seeded with the view defaults, the `[settings]`
    /// overrides and the selected preset
    pub fn build_store(&self) -> Result<SettingsStore> {
        let shape = self.scene.shape_reference();
        let mut store = SettingsStore::for_shape(&shape);
        if !self.settings.is_empty() {
            store.update(&self.settings);
        }
        if let Some(id) = self.scene.animation_id()? {
            store.update(&SettingsPatch::animation(Some(id)));
        }
        Ok(store)
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(Config::default())
    }
}

const CONFIG_HEADER: &str = "\
# Shapeforge scene description
#
# [scene]     shape = primitive name, or model = path to a .glb/.gltf;
#             animation = preset id (1 float, 2 spin, 3 pulse, 4 sway, 5 glow)
# [settings]  any of modelScale, rotationX/Y/Z, positionX/Y/Z, modelColor,
#             metalness, roughness, emissiveColor, emissiveIntensity, cameraFOV
# [output]    variant = react | next | vanilla | all; path = output file

";

/// Save default configuration to file
pub fn save_default_config(path: &Path) -> Result<()> {
    let config = Config {
        scene: SceneConfig {
            shape: "torus-knot".to_string(),
            model: None,
            animation: Some(2),
        },
        settings: SettingsPatch {
            model_scale: Some(1.5),
            metalness: Some(0.8),
            roughness: Some(0.2),
            ..Default::default()
        },
        output: OutputConfig::default(),
    };

    let content = format!("{}{}", CONFIG_HEADER, toml::to_string_pretty(&config)?);
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shapeforge_core::{HexColor, PrimitiveShape};

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(
            config.scene.shape_reference(),
            ShapeReference::Primitive(PrimitiveShape::Box)
        );
        assert!(config.settings.is_empty());
        assert_eq!(config.output.variants().unwrap(), Variant::ALL.to_vec());
    }

    #[test]
    fn test_default_config_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shapeforge.toml");
        save_default_config(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# Shapeforge scene description"));

        let config = load_config(&path).unwrap();
        assert_eq!(
            config.scene.shape_reference(),
            ShapeReference::Primitive(PrimitiveShape::TorusKnot)
        );
        assert_eq!(config.settings.model_scale, Some(1.5));
        let store = config.build_store().unwrap();
        assert_eq!(store.get().animation, AnimationId::new(2).ok());
        assert_eq!(store.get().metalness, 0.8);
    }

    #[test]
    fn test_camel_case_settings_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.toml");
        std::fs::write(
            &path,
            r##"
[scene]
model = "models/shiba.glb"

[settings]
modelColor = "#FF00FF"
cameraFOV = 75.0
positionX = -12.5

[output]
variant = "vanilla"
"##,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        let store = config.build_store().unwrap();
        let settings = store.get();
        assert_eq!(settings.model_color, HexColor::from("#FF00FF"));
        assert_eq!(settings.camera_fov, 75.0);
        assert_eq!(settings.position_x, -12.5);
        // Untouched fields keep the model defaults
        assert_eq!(settings.roughness, 0.5);
        assert_eq!(config.output.variants().unwrap(), vec![Variant::Vanilla]);
    }

    #[test]
    fn test_invalid_animation_is_an_error() {
        let config = Config {
            scene: SceneConfig {
                animation: Some(9),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.build_store().is_err());
    }

    #[test]
    fn test_unknown_variant_is_an_error() {
        let output = OutputConfig {
            variant: "svelte".to_string(),
            path: None,
        };
        assert!(output.variants().is_err());
    }
}
