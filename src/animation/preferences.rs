//! Transition preferences map motion actions to tween timing.

use std::time::Duration;

use crate::easing::EasingFunction;

/// Duration plus easing for one tween.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenSpec {
    /// Total tween duration. Zero completes on the first tick.
    pub duration: Duration,
    /// Easing curve applied to raw progress.
    pub easing: EasingFunction,
}

impl TweenSpec {
    /// Instant spec (zero duration).
    #[must_use]
    pub const fn instant() -> Self {
        Self { duration: Duration::ZERO, easing: EasingFunction::Linear }
    }
}

/// Motion actions that trigger tweens during a choreography.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionAction {
    /// Node appearance fade-in.
    Appear,
    /// Node exit fade-out.
    Exit,
    /// Node slide during repositioning.
    Shift,
    /// Connector draw-in.
    Connect,
    /// Connector fade-out.
    Disconnect,
    /// Cursor emphasis hold.
    HighlightHold,
    /// Indicator slide.
    Indicator,
}

/// Per-action tween timing for one stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionPrefs {
    /// Appearance fade.
    pub appear: TweenSpec,
    /// Exit fade.
    pub exit: TweenSpec,
    /// Reposition slide.
    pub shift: TweenSpec,
    /// Connector draw-in.
    pub connect: TweenSpec,
    /// Connector fade-out.
    pub disconnect: TweenSpec,
    /// Cursor hold.
    pub highlight_hold: TweenSpec,
    /// Indicator slide.
    pub indicator: TweenSpec,
}

impl TransitionPrefs {
    /// Spec for a motion action.
    #[must_use]
    pub const fn get(&self, action: MotionAction) -> TweenSpec {
        match action {
            MotionAction::Appear => self.appear,
            MotionAction::Exit => self.exit,
            MotionAction::Shift => self.shift,
            MotionAction::Connect => self.connect,
            MotionAction::Disconnect => self.disconnect,
            MotionAction::HighlightHold => self.highlight_hold,
            MotionAction::Indicator => self.indicator,
        }
    }

    /// Preferences with every action instant. Choreography still runs in
    /// full — phases, events, store writes — just without visible motion.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            appear: TweenSpec::instant(),
            exit: TweenSpec::instant(),
            shift: TweenSpec::instant(),
            connect: TweenSpec::instant(),
            disconnect: TweenSpec::instant(),
            highlight_hold: TweenSpec::instant(),
            indicator: TweenSpec::instant(),
        }
    }
}

impl Default for TransitionPrefs {
    fn default() -> Self {
        crate::options::AnimationOptions::default().prefs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_is_instant_everywhere() {
        let prefs = TransitionPrefs::disabled();
        for action in [
            MotionAction::Appear,
            MotionAction::Exit,
            MotionAction::Shift,
            MotionAction::Connect,
            MotionAction::Disconnect,
            MotionAction::HighlightHold,
            MotionAction::Indicator,
        ] {
            assert!(prefs.get(action).duration.is_zero());
        }
    }

    #[test]
    fn test_default_maps_options() {
        let prefs = TransitionPrefs::default();
        assert_eq!(prefs.get(MotionAction::Appear).duration.as_millis(), 300);
        assert_eq!(
            prefs.get(MotionAction::Connect).duration.as_millis(),
            250
        );
    }
}
