//! Tween scheduling: tick-advanced animations resolving completion futures.
//!
//! The driver tracks active tweens, performs per-tick updates, and wakes
//! the future handed out for each tween once it completes. A choreography
//! task awaits these handles at its suspension points; several handles
//! joined together form the fan-out/fan-in used by repositioning.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};
use std::time::Instant;

use crate::canvas::Canvas;
use crate::error::StageError;
use crate::animation::tween::Tween;

/// Shared per-stage handle to the driver.
pub type SharedDriver = Rc<RefCell<AnimationDriver>>;

/// Completion state shared between an active tween and its handle.
#[derive(Debug, Default)]
struct TweenState {
    done: Cell<bool>,
    error: RefCell<Option<StageError>>,
    waker: RefCell<Option<Waker>>,
}

/// Future resolving when its tween completes.
///
/// Dropping the handle does not cancel the tween; the driver finishes it
/// regardless (runs are never cancelled mid-flight).
#[derive(Debug)]
pub struct TweenHandle {
    state: Rc<TweenState>,
}

impl Future for TweenHandle {
    type Output = Result<(), StageError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.state.done.get() {
            match self.state.error.borrow_mut().take() {
                Some(e) => Poll::Ready(Err(e)),
                None => Poll::Ready(Ok(())),
            }
        } else {
            *self.state.waker.borrow_mut() = Some(cx.waker().clone());
            Poll::Pending
        }
    }
}

/// One tween being played.
#[derive(Debug)]
struct ActiveTween {
    tween: Tween,
    /// Set on the first tick after spawning.
    started: Option<Instant>,
    state: Rc<TweenState>,
}

impl ActiveTween {
    /// Raw progress in [0, 1]; zero-duration tweens are complete at once.
    fn progress(&self, now: Instant) -> f32 {
        let Some(started) = self.started else {
            return if self.tween.duration.is_zero() { 1.0 } else { 0.0 };
        };
        if self.tween.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(started);
        (elapsed.as_secs_f32() / self.tween.duration.as_secs_f32()).min(1.0)
    }
}

/// Tracks active tweens and advances them each tick.
#[derive(Debug, Default)]
pub struct AnimationDriver {
    active: Vec<ActiveTween>,
}

impl AnimationDriver {
    /// Empty driver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty driver wrapped in a shared handle.
    #[must_use]
    pub fn shared() -> SharedDriver {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Register a tween and hand back its completion future.
    pub fn spawn(&mut self, tween: Tween) -> TweenHandle {
        log::trace!("spawning tween: {:?}", tween.target);
        let state = Rc::new(TweenState::default());
        self.active.push(ActiveTween {
            tween,
            started: None,
            state: Rc::clone(&state),
        });
        TweenHandle { state }
    }

    /// Advance every active tween to `now`, applying interpolated values
    /// through the canvas and waking handles whose tweens completed.
    ///
    /// A failed channel write (missing canvas element) completes the tween
    /// with that error; the awaiting choreography propagates it.
    pub fn tick(&mut self, now: Instant, canvas: &mut dyn Canvas) {
        for active in &mut self.active {
            if active.started.is_none() {
                active.started = Some(now);
            }
            let t = active.progress(now);
            let eased = if t >= 1.0 {
                1.0
            } else {
                active.tween.easing.evaluate(t)
            };

            let result = active.tween.apply(eased, canvas);
            let finished = t >= 1.0 || result.is_err();
            if let Err(e) = result {
                log::warn!("tween failed mid-run: {e}");
                *active.state.error.borrow_mut() = Some(e);
            }
            if finished {
                active.state.done.set(true);
                if let Some(waker) = active.state.waker.borrow_mut().take() {
                    waker.wake();
                }
            }
        }
        self.active.retain(|a| !a.state.done.get());
    }

    /// Whether any tweens are still active.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        !self.active.is_empty()
    }

    /// Number of active tweens.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

#[cfg(test)]
mod tests {
    use std::task::Poll;
    use std::time::Duration;

    use futures::task::noop_waker;
    use glam::Vec2;

    use super::*;
    use crate::animation::tween::TweenTarget;
    use crate::canvas::MemoryCanvas;
    use crate::easing::EasingFunction;
    use crate::model::{NodeEntity, NodeId};

    fn poll_once(
        handle: &mut TweenHandle,
    ) -> Poll<Result<(), StageError>> {
        let waker = noop_waker();
        let mut cx = Context::from_waker(&waker);
        Pin::new(handle).poll(&mut cx)
    }

    fn fade(id: NodeId, duration_ms: u64) -> Tween {
        Tween {
            target: TweenTarget::NodeFade { id, from: 0.0, to: 1.0 },
            duration: Duration::from_millis(duration_ms),
            easing: EasingFunction::Linear,
        }
    }

    #[test]
    fn test_zero_duration_completes_on_first_tick() {
        let mut driver = AnimationDriver::new();
        let mut canvas = MemoryCanvas::new();
        let id = NodeId::new(1);
        canvas.upsert_node(&NodeEntity::new(id, "a"), Vec2::ZERO, 0.0);

        let mut handle = driver.spawn(fade(id, 0));
        assert!(poll_once(&mut handle).is_pending());

        driver.tick(Instant::now(), &mut canvas);
        assert!(!driver.is_animating());
        assert!(matches!(poll_once(&mut handle), Poll::Ready(Ok(()))));
        assert_eq!(canvas.node(id).map(|v| v.opacity), Some(1.0));
    }

    #[test]
    fn test_tween_advances_then_completes() {
        let mut driver = AnimationDriver::new();
        let mut canvas = MemoryCanvas::new();
        let id = NodeId::new(2);
        canvas.upsert_node(&NodeEntity::new(id, "b"), Vec2::ZERO, 0.0);

        let mut handle = driver.spawn(fade(id, 100));
        let start = Instant::now();
        driver.tick(start, &mut canvas);
        assert!(driver.is_animating());
        assert!(poll_once(&mut handle).is_pending());

        driver.tick(start + Duration::from_millis(50), &mut canvas);
        let mid = canvas.node(id).map(|v| v.opacity).unwrap_or_default();
        assert!(mid > 0.0 && mid < 1.0);

        driver.tick(start + Duration::from_millis(200), &mut canvas);
        assert!(!driver.is_animating());
        assert!(matches!(poll_once(&mut handle), Poll::Ready(Ok(()))));
        assert_eq!(canvas.node(id).map(|v| v.opacity), Some(1.0));
    }

    #[test]
    fn test_missing_element_fails_the_handle() {
        let mut driver = AnimationDriver::new();
        let mut canvas = MemoryCanvas::new();

        let mut handle = driver.spawn(fade(NodeId::new(9), 100));
        driver.tick(Instant::now(), &mut canvas);
        assert!(!driver.is_animating());
        assert!(matches!(
            poll_once(&mut handle),
            Poll::Ready(Err(StageError::MissingNode(_)))
        ));
    }

    #[test]
    fn test_concurrent_tweens_fan_out() {
        let mut driver = AnimationDriver::new();
        let mut canvas = MemoryCanvas::new();
        for i in 0..3 {
            let id = NodeId::new(i);
            canvas.upsert_node(
                &NodeEntity::new(id, format!("n{i}")),
                Vec2::ZERO,
                0.0,
            );
            let _ = driver.spawn(fade(id, 50));
        }
        assert_eq!(driver.active_count(), 3);

        let start = Instant::now();
        driver.tick(start, &mut canvas);
        driver.tick(start + Duration::from_millis(100), &mut canvas);
        assert_eq!(driver.active_count(), 0);
    }
}
