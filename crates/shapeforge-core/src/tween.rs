//! Registry of running tweens keyed by target object
//!
//! Tweens never write to the object directly. Each frame the registry is
//! advanced and sampled, and the samples are layered over the settings
//! snapshot with [`animated_settings`] before the binder applies them. The
//! base value always comes from the store, so repeated application cannot
//! drift.

use crate::animation::{AnimationId, RepeatMode, TweenDelta, TweenPath, TweenSpec};
use crate::settings::{HexColor, Settings};

/// Current contribution of one tween
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenSample {
    /// Amount added to the property's base value
    Offset { path: TweenPath, amount: f64 },
    /// Blend factor from the base color toward `toward`
    ColorBlend { toward: &'static str, factor: f64 },
}

#[derive(Debug, Clone)]
struct ActiveTween<K> {
    target: K,
    preset: AnimationId,
    spec: &'static TweenSpec,
    elapsed: f64,
}

impl<K> ActiveTween<K> {
    /// Eased progress in [0, 1] for the current cycle
    fn progress(&self) -> f64 {
        if self.spec.duration_secs <= 0.0 {
            return 1.0;
        }
        let cycles = self.elapsed / self.spec.duration_secs;
        let cycle = cycles.floor();
        let frac = cycles - cycle;
        let linear = match self.spec.repeat {
            RepeatMode::Loop => frac,
            RepeatMode::Yoyo if cycle as u64 % 2 == 1 => 1.0 - frac,
            RepeatMode::Yoyo => frac,
        };
        self.spec.ease.apply(linear)
    }

    fn sample(&self) -> TweenSample {
        let progress = self.progress();
        match self.spec.delta {
            TweenDelta::Relative(delta) => TweenSample::Offset {
                path: self.spec.path,
                amount: delta * progress,
            },
            TweenDelta::Color(toward) => TweenSample::ColorBlend {
                toward,
                factor: progress,
            },
        }
    }
}

/// All tweens currently running, across every target
#[derive(Debug, Clone)]
pub struct TweenRegistry<K> {
    tweens: Vec<ActiveTween<K>>,
}

impl<K> Default for TweenRegistry<K> {
    fn default() -> Self {
        Self { tweens: Vec::new() }
    }
}

impl<K: Clone + PartialEq> TweenRegistry<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start every tween of `preset` on `target`; returns how many started
    pub fn start(&mut self, target: K, preset: AnimationId) -> usize {
        let specs = preset.preset().tweens;
        for spec in specs {
            self.tweens.push(ActiveTween {
                target: target.clone(),
                preset,
                spec,
                elapsed: 0.0,
            });
        }
        tracing::debug!(preset = preset.get(), count = specs.len(), "Tweens started");
        specs.len()
    }

    /// Kill every tween driving `target`; returns how many were removed
    pub fn kill_tweens_of(&mut self, target: &K) -> usize {
        let before = self.tweens.len();
        self.tweens.retain(|tween| tween.target != *target);
        let killed = before - self.tweens.len();
        if killed > 0 {
            tracing::debug!(count = killed, "Tweens killed");
        }
        killed
    }

    /// Number of tweens driving `target`
    pub fn active_for(&self, target: &K) -> usize {
        self.tweens.iter().filter(|tween| tween.target == *target).count()
    }

    /// Distinct presets with tweens running on `target`
    pub fn presets_for(&self, target: &K) -> Vec<AnimationId> {
        let mut presets: Vec<AnimationId> = self
            .tweens
            .iter()
            .filter(|tween| tween.target == *target)
            .map(|tween| tween.preset)
            .collect();
        presets.sort();
        presets.dedup();
        presets
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    /// Move every tween forward by `dt` seconds
    pub fn advance(&mut self, dt: f64) {
        for tween in &mut self.tweens {
            tween.elapsed += dt;
        }
    }

    /// Current samples of every tween driving `target`
    pub fn sample(&self, target: &K) -> Vec<TweenSample> {
        self.tweens
            .iter()
            .filter(|tween| tween.target == *target)
            .map(ActiveTween::sample)
            .collect()
    }
}

/// Layer tween samples over a settings snapshot.
///
/// A color blend whose base or target color does not parse leaves the base
/// color untouched.
pub fn animated_settings(base: &Settings, samples: &[TweenSample]) -> Settings {
    let mut animated = base.clone();
    for sample in samples {
        match *sample {
            TweenSample::Offset { path, amount } => match path {
                TweenPath::PositionY => animated.position_y += amount,
                TweenPath::RotationY => animated.rotation_y += amount,
                TweenPath::RotationZ => animated.rotation_z += amount,
                TweenPath::Scale => animated.model_scale += amount,
                TweenPath::MaterialColor => {}
            },
            TweenSample::ColorBlend { toward, factor } => {
                if let (Ok(from), Ok(to)) = (base.model_color.rgb(), HexColor::from(toward).rgb()) {
                    animated.model_color = HexColor::from(from.lerp(to, factor));
                }
            }
        }
    }
    animated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationController;

    fn id(n: u8) -> AnimationId {
        AnimationId::new(n).unwrap()
    }

    #[test]
    fn test_toggle_on_then_off_leaves_no_tweens() {
        let mut controller = AnimationController::new();
        let mut registry: TweenRegistry<u32> = TweenRegistry::new();
        let target = 7;

        for _ in 0..2 {
            let transition = controller.toggle(id(2));
            if let Some(stop) = transition.stops() {
                assert_eq!(registry.presets_for(&target), vec![stop]);
                registry.kill_tweens_of(&target);
            }
            if let Some(start) = transition.starts() {
                registry.start(target, start);
            }
        }

        assert_eq!(registry.active_for(&target), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_switching_presets_keeps_only_latest() {
        let mut controller = AnimationController::new();
        let mut registry: TweenRegistry<u32> = TweenRegistry::new();
        let target = 1;

        for preset in [id(3), id(1)] {
            let transition = controller.toggle(preset);
            if transition.stops().is_some() {
                registry.kill_tweens_of(&target);
            }
            if let Some(start) = transition.starts() {
                registry.start(target, start);
            }
        }

        assert_eq!(registry.presets_for(&target), vec![id(1)]);
        let samples = registry.sample(&target);
        assert_eq!(samples.len(), 1);
        assert!(matches!(
            samples[0],
            TweenSample::Offset {
                path: TweenPath::PositionY,
                ..
            }
        ));
    }

    #[test]
    fn test_kill_only_affects_target() {
        let mut registry: TweenRegistry<&str> = TweenRegistry::new();
        registry.start("a", id(1));
        registry.start("b", id(2));
        assert_eq!(registry.kill_tweens_of(&"a"), 1);
        assert_eq!(registry.active_for(&"b"), 1);
    }

    #[test]
    fn test_yoyo_returns_to_base() {
        let mut registry: TweenRegistry<u8> = TweenRegistry::new();
        registry.start(0, id(1));

        registry.advance(2.0);
        let TweenSample::Offset { amount, .. } = registry.sample(&0)[0] else {
            panic!("expected offset");
        };
        assert!((amount - 1.0).abs() < 1e-9);

        registry.advance(2.0);
        let TweenSample::Offset { amount, .. } = registry.sample(&0)[0] else {
            panic!("expected offset");
        };
        assert!(amount.abs() < 1e-9);
    }

    #[test]
    fn test_loop_restarts() {
        let mut registry: TweenRegistry<u8> = TweenRegistry::new();
        registry.start(0, id(2));
        registry.advance(5.0);
        let TweenSample::Offset { amount, .. } = registry.sample(&0)[0] else {
            panic!("expected offset");
        };
        // One second into the second four-second cycle
        assert!((amount - std::f64::consts::TAU / 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_animated_settings_layers_over_base() {
        let base = Settings::default();
        let animated = animated_settings(
            &base,
            &[
                TweenSample::Offset {
                    path: TweenPath::Scale,
                    amount: 0.2,
                },
                TweenSample::ColorBlend {
                    toward: "#FF6347",
                    factor: 1.0,
                },
            ],
        );
        assert!((animated.model_scale - 1.2).abs() < 1e-12);
        assert_eq!(animated.model_color.as_str(), "#FF6347");
        // Base untouched
        assert_eq!(base.model_scale, 1.0);
        assert_eq!(animated_settings(&base, &[]), base);
    }
}
