//! Centralized layout/animation options with TOML preset support.
//!
//! All tweakable settings (row geometry, per-action animation timing) are
//! consolidated here. Options serialize to/from TOML so hosts can store
//! presets; every sub-struct uses `#[serde(default)]` so partial files
//! (e.g. only overriding `[animation]`) work correctly.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::animation::preferences::{TransitionPrefs, TweenSpec};
use crate::easing::EasingFunction;
use crate::error::StageError;

/// Top-level options container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct StageOptions {
    /// Row geometry: margins, box dimensions, slot spacing.
    pub layout: LayoutOptions,
    /// Animation timing and easing.
    pub animation: AnimationOptions,
}

impl StageOptions {
    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, StageError> {
        let content = std::fs::read_to_string(path).map_err(StageError::Io)?;
        toml::from_str(&content)
            .map_err(|e| StageError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), StageError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| StageError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(StageError::Io)?;
        }
        std::fs::write(path, content).map_err(StageError::Io)
    }
}

/// Row geometry for slot layout.
///
/// Slot x-coordinates follow
/// `margin_left + slot * (element_width + spacing)`; `row_y` is constant
/// within one row, so slots never overlap.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutOptions {
    /// Left margin of slot 0.
    pub margin_left: f32,
    /// Top edge of the node row.
    pub row_y: f32,
    /// Width of one node box.
    pub element_width: f32,
    /// Height of one node box.
    pub element_height: f32,
    /// Horizontal gap between adjacent boxes.
    pub spacing: f32,
    /// Vertical gap between the row and the indicator markers below it.
    pub indicator_gap: f32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            margin_left: 50.0,
            row_y: 120.0,
            element_width: 80.0,
            element_height: 40.0,
            spacing: 20.0,
            indicator_gap: 28.0,
        }
    }
}

/// Animation timing, per motion action, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnimationOptions {
    /// Master switch. When false every tween runs with zero duration, so
    /// choreography (and all emitted events) still executes instantly.
    pub enabled: bool,
    /// Node appearance fade, ms.
    pub appear_ms: u64,
    /// Node exit fade, ms.
    pub exit_ms: u64,
    /// Node/row slide during repositioning, ms.
    pub move_ms: u64,
    /// Connector draw-in, ms.
    pub connect_ms: u64,
    /// Connector fade-out, ms.
    pub disconnect_ms: u64,
    /// Cursor emphasis hold per visited node, ms.
    pub hold_ms: u64,
    /// Indicator slide, ms.
    pub indicator_ms: u64,
    /// Easing curve applied to all tweens.
    pub easing: EasingPreset,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            appear_ms: 300,
            exit_ms: 300,
            move_ms: 300,
            connect_ms: 250,
            disconnect_ms: 200,
            hold_ms: 350,
            indicator_ms: 200,
            easing: EasingPreset::Smooth,
        }
    }
}

impl AnimationOptions {
    /// Resolve these options into per-action transition preferences.
    #[must_use]
    pub fn prefs(&self) -> TransitionPrefs {
        if !self.enabled {
            return TransitionPrefs::disabled();
        }
        let easing = self.easing.to_function();
        let spec = |ms: u64| TweenSpec {
            duration: Duration::from_millis(ms),
            easing,
        };
        TransitionPrefs {
            appear: spec(self.appear_ms),
            exit: spec(self.exit_ms),
            shift: spec(self.move_ms),
            connect: spec(self.connect_ms),
            disconnect: spec(self.disconnect_ms),
            highlight_hold: spec(self.hold_ms),
            indicator: spec(self.indicator_ms),
        }
    }
}

/// Serializable easing selection.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum EasingPreset {
    /// Cubic hermite ease-out (the crate default).
    #[default]
    Smooth,
    /// Linear interpolation.
    Linear,
    /// Quadratic ease-out.
    QuadraticOut,
    /// Square-root ease-out.
    SqrtOut,
}

impl EasingPreset {
    /// The easing function this preset selects.
    #[must_use]
    pub const fn to_function(self) -> EasingFunction {
        match self {
            Self::Smooth => EasingFunction::DEFAULT,
            Self::Linear => EasingFunction::Linear,
            Self::QuadraticOut => EasingFunction::QuadraticOut,
            Self::SqrtOut => EasingFunction::SqrtOut,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = StageOptions::default();
        assert_eq!(opts.layout.margin_left, 50.0);
        assert_eq!(opts.layout.element_width, 80.0);
        assert!(opts.animation.enabled);
        assert_eq!(opts.animation.easing, EasingPreset::Smooth);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let opts: StageOptions = toml::from_str(
            "[layout]\nmargin_left = 10.0\nspacing = 0.0\n",
        )
        .unwrap_or_default();
        assert_eq!(opts.layout.margin_left, 10.0);
        assert_eq!(opts.layout.spacing, 0.0);
        // Untouched sections keep defaults.
        assert_eq!(opts.layout.element_width, 80.0);
        assert!(opts.animation.enabled);
    }

    #[test]
    fn test_toml_round_trip() {
        let opts = StageOptions {
            animation: AnimationOptions {
                easing: EasingPreset::Linear,
                move_ms: 123,
                ..AnimationOptions::default()
            },
            ..StageOptions::default()
        };
        let text = toml::to_string_pretty(&opts)
            .map_err(|e| e.to_string())
            .unwrap_or_default();
        let back: StageOptions =
            toml::from_str(&text).unwrap_or_default();
        assert_eq!(back, opts);
    }

    #[test]
    fn test_disabled_prefs_are_instant() {
        let anim = AnimationOptions {
            enabled: false,
            ..AnimationOptions::default()
        };
        let prefs = anim.prefs();
        assert!(prefs.appear.duration.is_zero());
        assert!(prefs.shift.duration.is_zero());
        assert!(prefs.highlight_hold.duration.is_zero());
    }

    #[test]
    fn test_easing_preset_mapping() {
        assert_eq!(
            EasingPreset::Smooth.to_function(),
            EasingFunction::DEFAULT
        );
        assert_eq!(
            EasingPreset::Linear.to_function(),
            EasingFunction::Linear
        );
    }
}
