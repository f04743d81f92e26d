//! Settings snapshots for the edited object
//!
//! [`SettingsStore`] is the single source of truth for one editing view.
//! Every update produces a fresh snapshot so consumers can detect changes by
//! revision or pointer identity. Values are stored exactly as given: ranges
//! are a UI concern and nothing here clamps or rejects input.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::fmt;
use std::ops::RangeInclusive;
use std::sync::Arc;
use thiserror::Error;

use crate::animation::AnimationId;
use crate::geometry::ShapeReference;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("Color must start with '#': {0}")]
    MissingHash(String),
    #[error("Color must have 3 or 6 hex digits: {0}")]
    BadLength(String),
    #[error("Invalid hex digit in color: {0}")]
    BadDigit(String),
}

/// 8-bit sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels scaled to 0.0-1.0
    pub fn to_unit(self) -> [f64; 3] {
        [
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
        ]
    }

    /// Build from 0.0-1.0 channels, rounding to the nearest 8-bit value
    pub fn from_unit(channels: [f64; 3]) -> Self {
        let to_byte = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(to_byte(channels[0]), to_byte(channels[1]), to_byte(channels[2]))
    }

    /// Linear-light channels, as three.js stores `Color` under color management
    pub fn to_linear(self) -> [f64; 3] {
        let decode = |c: f64| {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        };
        let [r, g, b] = self.to_unit();
        [decode(r), decode(g), decode(b)]
    }

    /// Inverse of [`Rgb::to_linear`], rounding to the nearest 8-bit value
    pub fn from_linear(channels: [f64; 3]) -> Self {
        let encode = |c: f64| {
            let c = c.clamp(0.0, 1.0);
            if c <= 0.0031308 {
                c * 12.92
            } else {
                1.055 * c.powf(1.0 / 2.4) - 0.055
            }
        };
        Self::from_unit([encode(channels[0]), encode(channels[1]), encode(channels[2])])
    }

    /// Interpolate in linear light, the space a tween on `Color.r/g/b` moves in
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let a = self.to_linear();
        let b = other.to_linear();
        Rgb::from_linear([
            a[0] + (b[0] - a[0]) * t,
            a[1] + (b[1] - a[1]) * t,
            a[2] + (b[2] - a[2]) * t,
        ])
    }

    /// Uppercase `#RRGGBB` form
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// A color as the user entered it.
///
/// The original text is preserved so it can be echoed verbatim into
/// generated code; parsing happens only when a renderer needs channels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HexColor(String);

impl HexColor {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse `#RGB` or `#RRGGBB`
    pub fn rgb(&self) -> Result<Rgb, ColorError> {
        let text = self.0.trim();
        let digits = text
            .strip_prefix('#')
            .ok_or_else(|| ColorError::MissingHash(self.0.clone()))?;
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return Err(ColorError::BadLength(self.0.clone())),
        };
        let channel = |i: usize| {
            expanded
                .get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| ColorError::BadDigit(self.0.clone()))
        };
        Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl From<Rgb> for HexColor {
    fn from(rgb: Rgb) -> Self {
        Self(rgb.to_hex())
    }
}

impl From<&str> for HexColor {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What kind of object an editing view customizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    Shape,
    Model,
}

impl From<&ShapeReference> for ViewKind {
    fn from(shape: &ShapeReference) -> Self {
        if shape.is_model() {
            ViewKind::Model
        } else {
            ViewKind::Shape
        }
    }
}

/// Full parameter set for one edited object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub model_scale: f64,
    pub rotation_x: f64,
    pub rotation_y: f64,
    pub rotation_z: f64,
    pub position_x: f64,
    pub position_y: f64,
    pub position_z: f64,
    pub model_color: HexColor,
    pub metalness: f64,
    pub roughness: f64,
    pub emissive_color: HexColor,
    pub emissive_intensity: f64,
    #[serde(rename = "cameraFOV")]
    pub camera_fov: f64,
    #[serde(default)]
    pub animation: Option<AnimationId>,
}

impl Settings {
    /// Defaults for a view of the given kind
    pub fn defaults_for(kind: ViewKind) -> Self {
        let model_color = match kind {
            ViewKind::Shape => "#4169E1",
            ViewKind::Model => "#FFFFFF",
        };
        Self {
            model_scale: 1.0,
            rotation_x: 0.0,
            rotation_y: 0.0,
            rotation_z: 0.0,
            position_x: 0.0,
            position_y: 0.0,
            position_z: 0.0,
            model_color: HexColor::from(model_color),
            metalness: 0.5,
            roughness: 0.5,
            emissive_color: HexColor::from("#000000"),
            emissive_intensity: 0.5,
            camera_fov: 50.0,
            animation: None,
        }
    }

    pub fn rotation(&self) -> [f64; 3] {
        [self.rotation_x, self.rotation_y, self.rotation_z]
    }

    pub fn position(&self) -> [f64; 3] {
        [self.position_x, self.position_y, self.position_z]
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::defaults_for(ViewKind::Shape)
    }
}

/// A partial set of fields to merge into a snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsPatch {
    pub model_scale: Option<f64>,
    pub rotation_x: Option<f64>,
    pub rotation_y: Option<f64>,
    pub rotation_z: Option<f64>,
    pub position_x: Option<f64>,
    pub position_y: Option<f64>,
    pub position_z: Option<f64>,
    pub model_color: Option<HexColor>,
    pub metalness: Option<f64>,
    pub roughness: Option<f64>,
    pub emissive_color: Option<HexColor>,
    pub emissive_intensity: Option<f64>,
    #[serde(rename = "cameraFOV")]
    pub camera_fov: Option<f64>,
    /// `Some(None)` clears the active preset
    #[serde(skip)]
    pub animation: Option<Option<AnimationId>>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        *self == SettingsPatch::default()
    }

    pub fn animation(id: Option<AnimationId>) -> Self {
        Self {
            animation: Some(id),
            ..Default::default()
        }
    }

    /// Produce a new snapshot with this patch applied on top of `base`
    pub fn merged_onto(&self, base: &Settings) -> Settings {
        Settings {
            model_scale: self.model_scale.unwrap_or(base.model_scale),
            rotation_x: self.rotation_x.unwrap_or(base.rotation_x),
            rotation_y: self.rotation_y.unwrap_or(base.rotation_y),
            rotation_z: self.rotation_z.unwrap_or(base.rotation_z),
            position_x: self.position_x.unwrap_or(base.position_x),
            position_y: self.position_y.unwrap_or(base.position_y),
            position_z: self.position_z.unwrap_or(base.position_z),
            model_color: self
                .model_color
                .clone()
                .unwrap_or_else(|| base.model_color.clone()),
            metalness: self.metalness.unwrap_or(base.metalness),
            roughness: self.roughness.unwrap_or(base.roughness),
            emissive_color: self
                .emissive_color
                .clone()
                .unwrap_or_else(|| base.emissive_color.clone()),
            emissive_intensity: self.emissive_intensity.unwrap_or(base.emissive_intensity),
            camera_fov: self.camera_fov.unwrap_or(base.camera_fov),
            animation: self.animation.unwrap_or(base.animation),
        }
    }
}

/// Holds the current settings snapshot for one editing view
#[derive(Debug, Clone)]
pub struct SettingsStore {
    current: Arc<Settings>,
    revision: u64,
}

impl SettingsStore {
    pub fn new(initial: Settings) -> Self {
        Self {
            current: Arc::new(initial),
            revision: 0,
        }
    }

    /// Store seeded with the defaults for the given shape reference
    pub fn for_shape(shape: &ShapeReference) -> Self {
        Self::new(Settings::defaults_for(ViewKind::from(shape)))
    }

    /// Current snapshot; cheap to clone and never mutated afterwards
    pub fn snapshot(&self) -> Arc<Settings> {
        Arc::clone(&self.current)
    }

    pub fn get(&self) -> &Settings {
        &self.current
    }

    /// Incremented on every update
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Merge `patch` into a new snapshot and return it
    pub fn update(&mut self, patch: &SettingsPatch) -> Arc<Settings> {
        let next = patch.merged_onto(&self.current);
        self.current = Arc::new(next);
        self.revision += 1;
        tracing::debug!(revision = self.revision, "Settings updated");
        self.snapshot()
    }
}

/// Value kind of a settings field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Number,
    Color,
}

/// Editable fields, in control panel order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingField {
    ModelScale,
    ModelColor,
    Metalness,
    Roughness,
    EmissiveColor,
    EmissiveIntensity,
    PositionX,
    PositionY,
    PositionZ,
    RotationX,
    RotationY,
    RotationZ,
    CameraFov,
}

impl SettingField {
    pub const ALL: [SettingField; 13] = [
        SettingField::ModelScale,
        SettingField::ModelColor,
        SettingField::Metalness,
        SettingField::Roughness,
        SettingField::EmissiveColor,
        SettingField::EmissiveIntensity,
        SettingField::PositionX,
        SettingField::PositionY,
        SettingField::PositionZ,
        SettingField::RotationX,
        SettingField::RotationY,
        SettingField::RotationZ,
        SettingField::CameraFov,
    ];

    /// Serialized key, also used as the widget label
    pub fn key(&self) -> &'static str {
        match self {
            SettingField::ModelScale => "modelScale",
            SettingField::ModelColor => "modelColor",
            SettingField::Metalness => "metalness",
            SettingField::Roughness => "roughness",
            SettingField::EmissiveColor => "emissiveColor",
            SettingField::EmissiveIntensity => "emissiveIntensity",
            SettingField::PositionX => "positionX",
            SettingField::PositionY => "positionY",
            SettingField::PositionZ => "positionZ",
            SettingField::RotationX => "rotationX",
            SettingField::RotationY => "rotationY",
            SettingField::RotationZ => "rotationZ",
            SettingField::CameraFov => "cameraFOV",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            SettingField::ModelColor | SettingField::EmissiveColor => FieldKind::Color,
            _ => FieldKind::Number,
        }
    }

    /// Slider range for numeric fields; positions get more room for models
    pub fn range(&self, view: ViewKind) -> Option<RangeInclusive<f64>> {
        let position_extent = match view {
            ViewKind::Shape => 10.0,
            ViewKind::Model => 30.0,
        };
        match self {
            SettingField::ModelScale => Some(0.1..=5.0),
            SettingField::Metalness | SettingField::Roughness => Some(0.0..=1.0),
            SettingField::EmissiveIntensity => Some(0.0..=5.0),
            SettingField::PositionX | SettingField::PositionY | SettingField::PositionZ => {
                Some(-position_extent..=position_extent)
            }
            SettingField::RotationX | SettingField::RotationY | SettingField::RotationZ => {
                Some(0.0..=TAU)
            }
            SettingField::CameraFov => Some(30.0..=120.0),
            SettingField::ModelColor | SettingField::EmissiveColor => None,
        }
    }

    /// Read a numeric field; `None` for color fields
    pub fn number(&self, settings: &Settings) -> Option<f64> {
        match self {
            SettingField::ModelScale => Some(settings.model_scale),
            SettingField::Metalness => Some(settings.metalness),
            SettingField::Roughness => Some(settings.roughness),
            SettingField::EmissiveIntensity => Some(settings.emissive_intensity),
            SettingField::PositionX => Some(settings.position_x),
            SettingField::PositionY => Some(settings.position_y),
            SettingField::PositionZ => Some(settings.position_z),
            SettingField::RotationX => Some(settings.rotation_x),
            SettingField::RotationY => Some(settings.rotation_y),
            SettingField::RotationZ => Some(settings.rotation_z),
            SettingField::CameraFov => Some(settings.camera_fov),
            SettingField::ModelColor | SettingField::EmissiveColor => None,
        }
    }

    /// Read a color field; `None` for numeric fields
    pub fn color<'a>(&self, settings: &'a Settings) -> Option<&'a HexColor> {
        match self {
            SettingField::ModelColor => Some(&settings.model_color),
            SettingField::EmissiveColor => Some(&settings.emissive_color),
            _ => None,
        }
    }

    /// Patch setting this numeric field; empty for color fields
    pub fn number_patch(&self, value: f64) -> SettingsPatch {
        let mut patch = SettingsPatch::default();
        match self {
            SettingField::ModelScale => patch.model_scale = Some(value),
            SettingField::Metalness => patch.metalness = Some(value),
            SettingField::Roughness => patch.roughness = Some(value),
            SettingField::EmissiveIntensity => patch.emissive_intensity = Some(value),
            SettingField::PositionX => patch.position_x = Some(value),
            SettingField::PositionY => patch.position_y = Some(value),
            SettingField::PositionZ => patch.position_z = Some(value),
            SettingField::RotationX => patch.rotation_x = Some(value),
            SettingField::RotationY => patch.rotation_y = Some(value),
            SettingField::RotationZ => patch.rotation_z = Some(value),
            SettingField::CameraFov => patch.camera_fov = Some(value),
            SettingField::ModelColor | SettingField::EmissiveColor => {}
        }
        patch
    }

    /// Patch setting this color field; empty for numeric fields
    pub fn color_patch(&self, value: HexColor) -> SettingsPatch {
        let mut patch = SettingsPatch::default();
        match self {
            SettingField::ModelColor => patch.model_color = Some(value),
            SettingField::EmissiveColor => patch.emissive_color = Some(value),
            _ => {}
        }
        patch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_per_view_kind() {
        let shape = Settings::defaults_for(ViewKind::Shape);
        let model = Settings::defaults_for(ViewKind::Model);
        assert_eq!(shape.model_color.as_str(), "#4169E1");
        assert_eq!(model.model_color.as_str(), "#FFFFFF");
        assert_eq!(shape.camera_fov, 50.0);
        assert_eq!(shape.animation, None);
    }

    #[test]
    fn test_update_produces_new_snapshot() {
        let mut store = SettingsStore::new(Settings::default());
        let before = store.snapshot();

        let after = store.update(&SettingsPatch {
            model_scale: Some(3.0988),
            ..Default::default()
        });

        assert_eq!(before.model_scale, 1.0);
        assert_eq!(after.model_scale, 3.0988);
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(store.revision(), 1);
        // Untouched fields carry over
        assert_eq!(after.metalness, before.metalness);
    }

    #[test]
    fn test_update_does_not_clamp() {
        let mut store = SettingsStore::new(Settings::default());
        store.update(&SettingField::Metalness.number_patch(7.5));
        store.update(&SettingField::CameraFov.number_patch(-3.0));
        assert_eq!(store.get().metalness, 7.5);
        assert_eq!(store.get().camera_fov, -3.0);
    }

    #[test]
    fn test_animation_patch_sets_and_clears() {
        let mut store = SettingsStore::new(Settings::default());
        let id = AnimationId::new(3).unwrap();
        store.update(&SettingsPatch::animation(Some(id)));
        assert_eq!(store.get().animation, Some(id));

        // A patch without animation leaves it alone
        store.update(&SettingField::Roughness.number_patch(0.2));
        assert_eq!(store.get().animation, Some(id));

        store.update(&SettingsPatch::animation(None));
        assert_eq!(store.get().animation, None);
    }

    #[test]
    fn test_hex_color_parsing() {
        assert_eq!(HexColor::from("#FF00FF").rgb(), Ok(Rgb::new(255, 0, 255)));
        assert_eq!(HexColor::from("#4169e1").rgb(), Ok(Rgb::new(0x41, 0x69, 0xE1)));
        assert_eq!(HexColor::from("#fff").rgb(), Ok(Rgb::new(255, 255, 255)));
        assert!(matches!(HexColor::from("FF00FF").rgb(), Err(ColorError::MissingHash(_))));
        assert!(matches!(HexColor::from("#FF00").rgb(), Err(ColorError::BadLength(_))));
        assert!(matches!(HexColor::from("#GG0000").rgb(), Err(ColorError::BadDigit(_))));
    }

    #[test]
    fn test_rgb_hex_and_lerp() {
        let black = Rgb::new(0, 0, 0);
        let white = Rgb::new(255, 255, 255);
        assert_eq!(black.lerp(white, 0.0), black);
        assert_eq!(black.lerp(white, 1.0), white);
        // Halfway in linear light is lighter than halfway in sRGB
        assert_eq!(black.lerp(white, 0.5), Rgb::new(188, 188, 188));
        assert_eq!(Rgb::new(255, 99, 71).to_hex(), "#FF6347");
    }

    #[test]
    fn test_linear_channels() {
        let [r, g, b] = Rgb::new(255, 99, 71).to_linear();
        assert!((r - 1.0).abs() < 1e-9);
        assert!((g - 0.1248).abs() < 1e-3);
        assert!((b - 0.0630).abs() < 1e-3);
        for rgb in [Rgb::new(255, 99, 71), Rgb::new(65, 105, 225), Rgb::new(3, 0, 1)] {
            assert_eq!(Rgb::from_linear(rgb.to_linear()), rgb);
        }
    }

    #[test]
    fn test_field_table() {
        assert_eq!(SettingField::CameraFov.key(), "cameraFOV");
        assert_eq!(SettingField::PositionX.range(ViewKind::Shape), Some(-10.0..=10.0));
        assert_eq!(SettingField::PositionX.range(ViewKind::Model), Some(-30.0..=30.0));
        assert_eq!(SettingField::ModelColor.range(ViewKind::Shape), None);

        let settings = Settings::default();
        for field in SettingField::ALL {
            match field.kind() {
                FieldKind::Number => {
                    assert!(field.number(&settings).is_some());
                    assert!(!field.number_patch(1.0).is_empty());
                }
                FieldKind::Color => {
                    assert!(field.color(&settings).is_some());
                    assert!(!field.color_patch(HexColor::from("#123456")).is_empty());
                }
            }
        }
    }

    #[test]
    fn test_patch_deserializes_camel_case() {
        let patch: SettingsPatch =
            serde_json::from_str(r##"{"modelScale": 2.5, "cameraFOV": 75, "modelColor": "#FF00FF"}"##)
                .unwrap();
        assert_eq!(patch.model_scale, Some(2.5));
        assert_eq!(patch.camera_fov, Some(75.0));
        assert_eq!(patch.model_color, Some(HexColor::from("#FF00FF")));
        assert_eq!(patch.rotation_x, None);
    }
}
