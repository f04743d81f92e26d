//! Shapeforge Core - Scene settings, shape resolution, and code generation
//!
//! This crate provides the renderer-independent logic for Shapeforge:
//! - Geometry resolution for the primitive shape catalog (render and source tables)
//! - Settings snapshots and partial updates for an edited object
//! - Scene binding traits and the settings application procedure
//! - Animation presets, the preset state machine, and the tween registry
//! - Control panel model bridging widget edits into the settings store
//! - Code snippet generation for React, Next.js, and Vanilla Three.js
//! - Snippet viewer state with clipboard feedback
//! - Upload validation for glTF model files

pub mod animation;
pub mod binder;
pub mod codegen;
pub mod geometry;
pub mod panel;
pub mod settings;
pub mod snippet;
pub mod tween;
pub mod upload;

pub use animation::{
    AnimationController, AnimationId, AnimationPreset, AnimationTransition, PresetError,
};
pub use binder::{
    apply_camera_fov, apply_settings, CameraNode, MeshMaterial, NodeMaterial, PerspectiveCamera, SceneNode,
    SceneObject,
};
pub use codegen::{generate, CodeParams, GeneratedSnippet, Variant};
pub use geometry::{
    resolve, resolve_source, upload_asset_path, GeometryDescriptor, GeometrySource, PrimitiveShape,
    ShapeReference,
};
pub use panel::{ControlPanel, PanelWidget, WidgetKind, WidgetValue};
pub use settings::{
    ColorError, FieldKind, HexColor, Rgb, SettingField, Settings, SettingsPatch, SettingsStore, ViewKind,
};
pub use snippet::{Clipboard, ClipboardError, SnippetViewer};
pub use tween::{animated_settings, TweenRegistry, TweenSample};
pub use upload::{accept_upload, validate_model_file, UploadError};
