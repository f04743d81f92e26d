//! Shared types for navigation, the editing session, and UI state

use bevy::prelude::*;
use shapeforge_core::{
    AnimationController, ControlPanel, Settings, SettingsStore, ShapeReference, SnippetViewer,
    TweenRegistry,
};

/// Which page of the editor is showing
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EditorView {
    #[default]
    Gallery,
    Customize,
}

/// Per-navigation state handed to the customize view
#[derive(Debug, Clone, Resource, Default)]
pub struct Navigation {
    pub shape: Option<ShapeReference>,
}

impl Navigation {
    /// Record the shape to open; the caller switches to [`EditorView::Customize`]
    pub fn open(&mut self, shape: ShapeReference) {
        tracing::info!("Opening editor for {}", shape.label());
        self.shape = Some(shape);
    }

    pub fn clear(&mut self) {
        self.shape = None;
    }
}

/// A model shipped with the app
#[derive(Debug, Clone)]
pub struct BundledModel {
    pub label: String,
    pub path: String,
}

/// Models listed in the gallery next to the primitives
#[derive(Debug, Clone, Resource)]
pub struct BundledModels {
    pub models: Vec<BundledModel>,
}

impl Default for BundledModels {
    fn default() -> Self {
        Self {
            models: vec![
                BundledModel {
                    label: "Airbus".to_string(),
                    path: "models/airbus.glb".to_string(),
                },
                BundledModel {
                    label: "Shiba".to_string(),
                    path: "models/shiba.glb".to_string(),
                },
            ],
        }
    }
}

/// Requests raised by the gallery for platform code to pick up
#[derive(Debug, Clone, Resource, Default)]
pub struct GalleryActions {
    /// Set when the user asks to upload a model file
    pub upload_requested: bool,
}

/// State of the open editing view; present only while customizing
#[derive(Resource)]
pub struct EditSession {
    pub shape: ShapeReference,
    pub store: SettingsStore,
}

impl EditSession {
    pub fn new(shape: ShapeReference) -> Self {
        let store = SettingsStore::for_shape(&shape);
        Self { shape, store }
    }

    pub fn settings(&self) -> &Settings {
        self.store.get()
    }
}

/// View-scoped widget panel; filled on entering the editor, emptied on leaving
#[derive(Resource, Default)]
pub struct ControlPanelSlot(pub Option<ControlPanel>);

impl ControlPanelSlot {
    pub fn acquire(&mut self, panel: ControlPanel) {
        if let Some(mut previous) = self.0.replace(panel) {
            previous.destroy();
        }
    }

    /// Destroy the held panel; returns `false` if the slot was already empty
    pub fn release(&mut self) -> bool {
        match self.0.take() {
            Some(mut panel) => panel.destroy(),
            None => false,
        }
    }
}

/// Snippet viewer for the "Get Code" window
#[derive(Resource)]
pub struct CodeWindow(pub SnippetViewer);

/// Active preset and running tweens for the edited object
#[derive(Resource, Default)]
pub struct AnimationDriver {
    pub controller: AnimationController,
    pub registry: TweenRegistry<Entity>,
}

/// Root entity of the object being edited
#[derive(Component)]
pub struct EditTarget;

/// Bookkeeping for when the binder last applied settings to a target
#[derive(Component, Default, Debug)]
pub struct BindState {
    pub applied_revision: Option<u64>,
    pub mesh_count: usize,
}
