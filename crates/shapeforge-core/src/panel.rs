//! Control panel model
//!
//! Holds one widget per settings field plus one toggle per animation preset.
//! Widget edits are turned into [`SettingsPatch`] values for the store; the
//! panel never reads anything back from the renderer.

use crate::animation::{AnimationId, AnimationPreset};
use crate::settings::{FieldKind, HexColor, SettingField, Settings, SettingsPatch, ViewKind};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WidgetKind {
    Slider { min: f64, max: f64 },
    Color,
    AnimationToggle(AnimationId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetValue {
    Number(f64),
    Color(HexColor),
    Toggle(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelWidget {
    pub label: &'static str,
    pub kind: WidgetKind,
    /// Settings field the widget edits; `None` for animation toggles
    pub field: Option<SettingField>,
    pub value: WidgetValue,
}

/// Widget panel for one editing view
#[derive(Debug, Clone)]
pub struct ControlPanel {
    view: ViewKind,
    widgets: Vec<PanelWidget>,
    destroyed: bool,
}

impl ControlPanel {
    /// Build the widget set, seeded from the view's initial settings
    pub fn mount(view: ViewKind, settings: &Settings) -> Self {
        let mut widgets = Vec::with_capacity(SettingField::ALL.len() + 5);

        for field in SettingField::ALL {
            let widget = match field.kind() {
                FieldKind::Number => {
                    let range = field.range(view).unwrap_or(0.0..=1.0);
                    PanelWidget {
                        label: field.key(),
                        kind: WidgetKind::Slider {
                            min: *range.start(),
                            max: *range.end(),
                        },
                        field: Some(field),
                        value: WidgetValue::Number(field.number(settings).unwrap_or_default()),
                    }
                }
                FieldKind::Color => PanelWidget {
                    label: field.key(),
                    kind: WidgetKind::Color,
                    field: Some(field),
                    value: WidgetValue::Color(
                        field
                            .color(settings)
                            .cloned()
                            .unwrap_or_else(|| HexColor::from("#FFFFFF")),
                    ),
                },
            };
            widgets.push(widget);
        }

        for preset in AnimationPreset::all() {
            if let Ok(id) = AnimationId::new(preset.id) {
                widgets.push(PanelWidget {
                    label: preset.name,
                    kind: WidgetKind::AnimationToggle(id),
                    field: None,
                    value: WidgetValue::Toggle(settings.animation == Some(id)),
                });
            }
        }

        tracing::info!(?view, widgets = widgets.len(), "Control panel mounted");
        Self {
            view,
            widgets,
            destroyed: false,
        }
    }

    pub fn view(&self) -> ViewKind {
        self.view
    }

    pub fn widgets(&self) -> &[PanelWidget] {
        &self.widgets
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Preset whose toggle is on
    pub fn active_animation(&self) -> Option<AnimationId> {
        self.widgets.iter().find_map(|widget| match (widget.kind, &widget.value) {
            (WidgetKind::AnimationToggle(id), WidgetValue::Toggle(true)) => Some(id),
            _ => None,
        })
    }

    fn widget_mut(&mut self, field: SettingField) -> Option<&mut PanelWidget> {
        self.widgets.iter_mut().find(|widget| widget.field == Some(field))
    }

    /// Slider moved; `None` after destroy or for a color field
    pub fn set_number(&mut self, field: SettingField, value: f64) -> Option<SettingsPatch> {
        if self.destroyed || field.kind() != FieldKind::Number {
            return None;
        }
        let widget = self.widget_mut(field)?;
        widget.value = WidgetValue::Number(value);
        Some(field.number_patch(value))
    }

    /// Color picked; `None` after destroy or for a numeric field
    pub fn set_color(&mut self, field: SettingField, value: HexColor) -> Option<SettingsPatch> {
        if self.destroyed || field.kind() != FieldKind::Color {
            return None;
        }
        let widget = self.widget_mut(field)?;
        widget.value = WidgetValue::Color(value.clone());
        Some(field.color_patch(value))
    }

    /// Animation toggle clicked.
    ///
    /// Clicking the active preset turns it off; clicking another one turns the
    /// active one off and the new one on.
    pub fn toggle_animation(&mut self, id: AnimationId) -> Option<SettingsPatch> {
        if self.destroyed {
            return None;
        }
        let next = if self.active_animation() == Some(id) {
            None
        } else {
            Some(id)
        };
        for widget in &mut self.widgets {
            if let WidgetKind::AnimationToggle(widget_id) = widget.kind {
                widget.value = WidgetValue::Toggle(next == Some(widget_id));
            }
        }
        Some(SettingsPatch::animation(next))
    }

    /// Tear the panel down; returns `false` if it was already destroyed
    pub fn destroy(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        self.destroyed = true;
        self.widgets.clear();
        tracing::info!(view = ?self.view, "Control panel destroyed");
        true
    }
}
