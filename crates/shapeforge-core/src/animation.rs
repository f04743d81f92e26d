//! Animation presets and the per-object preset state machine
//!
//! The preset table is the one canonical description of every animation.
//! Both the live tween registry and the code generator read from it.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PresetError {
    #[error("Unknown animation preset: {0} (expected 1-5)")]
    UnknownPreset(u8),
}

/// Identifier of one of the five presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct AnimationId(u8);

impl AnimationId {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(id: u8) -> Result<Self, PresetError> {
        if (Self::MIN..=Self::MAX).contains(&id) {
            Ok(Self(id))
        } else {
            Err(PresetError::UnknownPreset(id))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// All preset ids in ascending order
    pub fn all() -> impl Iterator<Item = AnimationId> {
        (Self::MIN..=Self::MAX).map(AnimationId)
    }

    pub fn preset(self) -> &'static AnimationPreset {
        // Construction guarantees 1..=5
        &PRESETS[(self.0 - 1) as usize]
    }
}

impl TryFrom<u8> for AnimationId {
    type Error = PresetError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        AnimationId::new(id)
    }
}

impl From<AnimationId> for u8 {
    fn from(id: AnimationId) -> Self {
        id.0
    }
}

impl fmt::Display for AnimationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Object property a tween drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TweenPath {
    PositionY,
    RotationY,
    RotationZ,
    /// All three scale axes together
    Scale,
    MaterialColor,
}

impl TweenPath {
    /// Property path as written in generated code, relative to the object
    pub fn code_path(&self) -> &'static str {
        match self {
            TweenPath::PositionY => "position",
            TweenPath::RotationY => "rotation",
            TweenPath::RotationZ => "rotation",
            TweenPath::Scale => "scale",
            TweenPath::MaterialColor => "material.color",
        }
    }
}

/// How far a tween moves its property
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenDelta {
    /// Added on top of the property's base value
    Relative(f64),
    /// Blend from the base color toward this hex color
    Color(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatMode {
    /// Restart from the base value each cycle
    Loop,
    /// Alternate direction each cycle
    Yoyo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    None,
    SineInOut,
    Power1InOut,
}

impl Easing {
    /// Name as understood by the GSAP `ease` option
    pub fn name(&self) -> &'static str {
        match self {
            Easing::None => "none",
            Easing::SineInOut => "sine.inOut",
            Easing::Power1InOut => "power1.inOut",
        }
    }

    /// Map linear progress in [0, 1] to eased progress
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::None => t,
            Easing::SineInOut => -((std::f64::consts::PI * t).cos() - 1.0) / 2.0,
            Easing::Power1InOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// One infinite tween
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenSpec {
    pub path: TweenPath,
    pub delta: TweenDelta,
    pub duration_secs: f64,
    pub repeat: RepeatMode,
    pub ease: Easing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationPreset {
    pub id: u8,
    pub name: &'static str,
    pub tweens: &'static [TweenSpec],
}

const PRESETS: [AnimationPreset; 5] = [
    AnimationPreset {
        id: 1,
        name: "Float",
        tweens: &[TweenSpec {
            path: TweenPath::PositionY,
            delta: TweenDelta::Relative(1.0),
            duration_secs: 2.0,
            repeat: RepeatMode::Yoyo,
            ease: Easing::SineInOut,
        }],
    },
    AnimationPreset {
        id: 2,
        name: "Spin",
        tweens: &[TweenSpec {
            path: TweenPath::RotationY,
            delta: TweenDelta::Relative(TAU),
            duration_secs: 4.0,
            repeat: RepeatMode::Loop,
            ease: Easing::None,
        }],
    },
    AnimationPreset {
        id: 3,
        name: "Pulse",
        tweens: &[TweenSpec {
            path: TweenPath::Scale,
            delta: TweenDelta::Relative(0.2),
            duration_secs: 1.0,
            repeat: RepeatMode::Yoyo,
            ease: Easing::Power1InOut,
        }],
    },
    AnimationPreset {
        id: 4,
        name: "Sway",
        tweens: &[TweenSpec {
            path: TweenPath::RotationZ,
            delta: TweenDelta::Relative(0.5),
            duration_secs: 1.5,
            repeat: RepeatMode::Yoyo,
            ease: Easing::SineInOut,
        }],
    },
    AnimationPreset {
        id: 5,
        name: "Glow",
        tweens: &[TweenSpec {
            path: TweenPath::MaterialColor,
            delta: TweenDelta::Color("#FF6347"),
            duration_secs: 3.0,
            repeat: RepeatMode::Yoyo,
            ease: Easing::None,
        }],
    },
];

impl AnimationPreset {
    pub fn all() -> &'static [AnimationPreset] {
        &PRESETS
    }

    pub fn get(id: u8) -> Result<&'static AnimationPreset, PresetError> {
        Ok(AnimationId::new(id)?.preset())
    }
}

/// What happened when a preset selection was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationTransition {
    Unchanged,
    Started(AnimationId),
    Stopped(AnimationId),
    /// The running preset's tweens must be killed before the new ones start
    Switched { from: AnimationId, to: AnimationId },
}

impl AnimationTransition {
    /// Preset whose tweens must be killed, if any
    pub fn stops(&self) -> Option<AnimationId> {
        match *self {
            AnimationTransition::Stopped(id) => Some(id),
            AnimationTransition::Switched { from, .. } => Some(from),
            _ => None,
        }
    }

    /// Preset whose tweens must be started, if any
    pub fn starts(&self) -> Option<AnimationId> {
        match *self {
            AnimationTransition::Started(id) => Some(id),
            AnimationTransition::Switched { to, .. } => Some(to),
            _ => None,
        }
    }
}

/// Tracks the preset running on one object.
///
/// Idle or exactly one preset; there is no state with two.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnimationController {
    active: Option<AnimationId>,
}

impl AnimationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<AnimationId> {
        self.active
    }

    /// Selector semantics: choosing the active preset turns it off
    pub fn toggle(&mut self, id: AnimationId) -> AnimationTransition {
        if self.active == Some(id) {
            self.apply(None)
        } else {
            self.apply(Some(id))
        }
    }

    /// Move to the requested state
    pub fn apply(&mut self, requested: Option<AnimationId>) -> AnimationTransition {
        let transition = match (self.active, requested) {
            (None, None) => AnimationTransition::Unchanged,
            (Some(current), Some(next)) if current == next => AnimationTransition::Unchanged,
            (None, Some(next)) => AnimationTransition::Started(next),
            (Some(current), None) => AnimationTransition::Stopped(current),
            (Some(from), Some(to)) => AnimationTransition::Switched { from, to },
        };
        self.active = requested;
        transition
    }
}
