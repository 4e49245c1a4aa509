//! Shared handles threaded through every phase of a run.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec2;

use crate::animation::driver::{SharedDriver, TweenHandle};
use crate::animation::preferences::{MotionAction, TransitionPrefs};
use crate::animation::tween::{Tween, TweenTarget};
use crate::canvas::Canvas;
use crate::error::StageError;
use crate::events::{ChoreographyStep, SharedBus, StepEvent, StepEventBus};
use crate::layout::SharedPositions;
use crate::model::NodeId;
use crate::options::StageOptions;

/// Per-run bundle of the shared mutable collaborators.
///
/// One context exists per canvas instance and is cloned (handle-wise) into
/// the choreography task; every phase reads the latest writes — there is
/// no snapshotting.
pub(crate) struct StageContext {
    /// Sole source of truth for current layout.
    pub positions: SharedPositions,
    /// Rendering surface handle.
    pub canvas: Rc<RefCell<dyn Canvas>>,
    /// Tween scheduler.
    pub driver: SharedDriver,
    /// Lifecycle/progress event bus.
    pub bus: SharedBus,
    /// Layout and timing options for this run.
    pub options: StageOptions,
    /// Resolved per-action tween timing.
    pub prefs: TransitionPrefs,
    /// Step counter for progress events, starting at 1.
    steps: Cell<u64>,
}

impl StageContext {
    pub(crate) fn new(
        positions: SharedPositions,
        canvas: Rc<RefCell<dyn Canvas>>,
        driver: SharedDriver,
        bus: SharedBus,
        options: StageOptions,
    ) -> Self {
        let prefs = options.animation.prefs();
        Self {
            positions,
            canvas,
            driver,
            bus,
            options,
            prefs,
            steps: Cell::new(0),
        }
    }

    /// Publish the next `step-progress` event for a pseudocode line.
    pub(crate) fn publish_step(&self, line_index: u32) {
        let step_id = self.steps.get() + 1;
        self.steps.set(step_id);
        let event = StepEvent::StepProgress {
            step: ChoreographyStep { step_id, line_index },
        };
        StepEventBus::publish_shared(&self.bus, &event);
    }

    /// Position of a node, or the integration defect for its absence.
    pub(crate) fn require_position(
        &self,
        id: NodeId,
    ) -> Result<Vec2, StageError> {
        self.positions
            .borrow()
            .get(id)
            .ok_or(StageError::MissingPosition(id))
    }

    /// Spawn a tween using the timing configured for `action`.
    pub(crate) fn spawn(
        &self,
        target: TweenTarget,
        action: MotionAction,
    ) -> TweenHandle {
        self.driver
            .borrow_mut()
            .spawn(Tween::new(target, self.prefs.get(action)))
    }
}
