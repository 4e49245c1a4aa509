//! Tween-driven animation with completion futures.
//!
//! - [`preferences::TransitionPrefs`]: per-action timing and easing
//! - [`tween::Tween`]: one animated channel write (move, fade, morph, hold)
//! - [`driver::AnimationDriver`]: advances active tweens each tick and
//!   resolves their completion futures

pub mod driver;
pub mod preferences;
pub mod tween;

pub use driver::{AnimationDriver, SharedDriver, TweenHandle};
pub use preferences::{MotionAction, TransitionPrefs, TweenSpec};
pub use tween::{Tween, TweenTarget};
