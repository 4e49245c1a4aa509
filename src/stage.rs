//! Stage façade: owns the shared state, spawns choreography tasks, and
//! drives them with the host's frame clock.
//!
//! One stage holds one canvas, one position store, one driver, and one
//! event bus. At most one run is in flight at a time; the busy flag
//! rejects re-entry and a finalize guard clears it (and invokes the host
//! reset hook) on every exit path, success or failure.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use futures::channel::oneshot;
use futures::executor::{LocalPool, LocalSpawner};
use futures::task::LocalSpawnExt;

use crate::animation::driver::{AnimationDriver, SharedDriver};
use crate::canvas::Canvas;
use crate::context::StageContext;
use crate::error::StageError;
use crate::events::{SharedBus, StepEventBus};
use crate::layout::{PositionStore, SharedPositions};
use crate::options::StageOptions;
use crate::pseudocode::LineMap;
use crate::sequencer::{run_operation, OperationRequest};

/// Frame step used by [`Stage::play`]'s virtual clock.
const VIRTUAL_FRAME: Duration = Duration::from_millis(16);

/// Tick budget for [`Stage::play`] before declaring the run wedged.
const MAX_VIRTUAL_TICKS: u32 = 10_000;

/// Cloneable single-run mutual-exclusion flag.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Rc<Cell<bool>>);

impl BusyFlag {
    /// Whether a run currently holds the flag.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.0.get()
    }

    fn set(&self) {
        self.0.set(true);
    }

    fn clear(&self) {
        self.0.set(false);
    }
}

type FinalizeHook = Rc<RefCell<dyn FnMut()>>;

/// Clears the busy flag and runs the host reset hook when dropped.
///
/// Created inside the choreography task before the run starts, so every
/// exit path of the task releases the stage.
struct FinalizeGuard {
    busy: BusyFlag,
    reset: Option<FinalizeHook>,
}

impl Drop for FinalizeGuard {
    fn drop(&mut self) {
        if let Some(reset) = &self.reset {
            (reset.borrow_mut())();
        }
        self.busy.clear();
        log::debug!("stage released");
    }
}

/// Completion handle for one run.
#[derive(Debug)]
pub struct RunHandle {
    rx: oneshot::Receiver<Result<(), StageError>>,
}

impl RunHandle {
    /// Outcome if the run has finished, `None` while still in flight.
    ///
    /// A dropped task (executor torn down mid-run) reports
    /// [`StageError::Aborted`].
    pub fn try_outcome(&mut self) -> Option<Result<(), StageError>> {
        match self.rx.try_recv() {
            Ok(Some(result)) => Some(result),
            Ok(None) => None,
            Err(oneshot::Canceled) => Some(Err(StageError::Aborted)),
        }
    }

    /// Await the run's outcome.
    pub async fn wait(self) -> Result<(), StageError> {
        self.rx.await.unwrap_or(Err(StageError::Aborted))
    }
}

/// The choreography engine façade.
pub struct Stage<C: Canvas + 'static> {
    options: StageOptions,
    positions: SharedPositions,
    canvas: Rc<RefCell<C>>,
    driver: SharedDriver,
    bus: SharedBus,
    busy: BusyFlag,
    on_finalize: Option<FinalizeHook>,
    pool: LocalPool,
    spawner: LocalSpawner,
}

impl<C: Canvas + 'static> Stage<C> {
    /// Stage over a canvas with explicit options.
    #[must_use]
    pub fn new(canvas: C, options: StageOptions) -> Self {
        let pool = LocalPool::new();
        let spawner = pool.spawner();
        Self {
            options,
            positions: PositionStore::shared(),
            canvas: Rc::new(RefCell::new(canvas)),
            driver: AnimationDriver::shared(),
            bus: StepEventBus::shared(),
            busy: BusyFlag::default(),
            on_finalize: None,
            pool,
            spawner,
        }
    }

    /// Stage over a canvas with default options.
    #[must_use]
    pub fn with_defaults(canvas: C) -> Self {
        Self::new(canvas, StageOptions::default())
    }

    /// Start choreographing one operation.
    ///
    /// Fails with [`StageError::Busy`] while a previous run is in flight.
    /// The task begins executing on the next [`Stage::tick`].
    pub fn begin(
        &mut self,
        request: OperationRequest,
        lines: LineMap,
    ) -> Result<RunHandle, StageError> {
        if self.busy.is_set() {
            return Err(StageError::Busy);
        }
        self.busy.set();

        let (tx, rx) = oneshot::channel();
        let canvas: Rc<RefCell<dyn Canvas>> = self.canvas.clone();
        let cx = StageContext::new(
            Rc::clone(&self.positions),
            canvas,
            Rc::clone(&self.driver),
            Rc::clone(&self.bus),
            self.options.clone(),
        );
        let guard = FinalizeGuard {
            busy: self.busy.clone(),
            reset: self.on_finalize.clone(),
        };

        let task = async move {
            let result = {
                let _finalize = guard;
                run_operation(&request, &lines, &cx).await
            };
            if let Err(e) = &result {
                log::warn!("choreography run failed: {e}");
            }
            // Receiver may have been dropped; the run already finalized.
            let _ = tx.send(result);
        };
        if let Err(e) = self.spawner.spawn_local(task) {
            // Dropping the unspawned task dropped the guard, so the busy
            // flag is already clear again.
            log::warn!("failed to spawn choreography task: {e}");
            return Err(StageError::Aborted);
        }
        Ok(RunHandle { rx })
    }

    /// Advance animations to `now` and resume the choreography task.
    ///
    /// Returns whether anything is still in flight; hosts keep scheduling
    /// frames while this is true.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.driver
            .borrow_mut()
            .tick(now, &mut *self.canvas.borrow_mut());
        self.pool.run_until_stalled();
        self.busy.is_set() || self.driver.borrow().is_animating()
    }

    /// Run one operation to completion on a virtual clock.
    ///
    /// Headless equivalent of `begin` plus a frame loop: ticks in fixed
    /// 16 ms virtual steps until the run settles. A run that fails to
    /// settle within the tick budget reports [`StageError::Aborted`].
    pub fn play(
        &mut self,
        request: OperationRequest,
        lines: LineMap,
    ) -> Result<(), StageError> {
        let mut handle = self.begin(request, lines)?;
        let mut now = Instant::now();
        for _ in 0..MAX_VIRTUAL_TICKS {
            if !self.tick(now) {
                break;
            }
            now += VIRTUAL_FRAME;
        }
        handle.try_outcome().unwrap_or(Err(StageError::Aborted))
    }

    /// Register the host reset hook invoked whenever a run finalizes.
    pub fn on_finalize(&mut self, hook: impl FnMut() + 'static) {
        self.on_finalize = Some(Rc::new(RefCell::new(hook)));
    }

    /// The event bus, for subscribing to run lifecycle and progress.
    #[must_use]
    pub fn events(&self) -> SharedBus {
        Rc::clone(&self.bus)
    }

    /// The shared position store.
    #[must_use]
    pub fn positions(&self) -> SharedPositions {
        Rc::clone(&self.positions)
    }

    /// The canvas, for host rendering and seeding initial elements.
    #[must_use]
    pub fn canvas(&self) -> Rc<RefCell<C>> {
        Rc::clone(&self.canvas)
    }

    /// The single-run mutual-exclusion flag.
    #[must_use]
    pub fn busy_flag(&self) -> BusyFlag {
        self.busy.clone()
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &StageOptions {
        &self.options
    }

    /// Replace the options. Takes effect for the next run.
    pub fn set_options(&mut self, options: StageOptions) {
        self.options = options;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::MemoryCanvas;
    use crate::model::{NodeEntity, NodeId, Operation, Topology};
    use crate::sequencer::script::StepLabel;

    fn insert_first_request() -> OperationRequest {
        let node = NodeEntity::new(NodeId::new(1), "a");
        OperationRequest {
            topology: Topology::SinglyLinked,
            operation: Operation::InsertFirst { node: node.clone() },
            before: Vec::new(),
            after: vec![node],
        }
    }

    fn lines() -> LineMap {
        LineMap::new()
            .with(StepLabel::CheckEmpty, 1)
            .with(StepLabel::CreateNode, 2)
            .with(StepLabel::MoveHead, 3)
    }

    #[test]
    fn test_busy_rejects_second_begin() {
        let mut stage = Stage::with_defaults(MemoryCanvas::new());
        let _handle = stage
            .begin(insert_first_request(), lines())
            .map_err(|e| e.to_string())
            .unwrap();
        assert!(stage.busy_flag().is_set());
        assert!(matches!(
            stage.begin(insert_first_request(), lines()),
            Err(StageError::Busy)
        ));
    }

    #[test]
    fn test_play_settles_and_releases() {
        let mut stage = Stage::with_defaults(MemoryCanvas::new());
        let finalized = Rc::new(Cell::new(0u32));
        let count = Rc::clone(&finalized);
        stage.on_finalize(move || count.set(count.get() + 1));

        assert!(stage.play(insert_first_request(), lines()).is_ok());
        assert!(!stage.busy_flag().is_set());
        assert_eq!(finalized.get(), 1);
        assert_eq!(stage.canvas().borrow().node_count(), 1);
    }

    #[test]
    fn test_failed_run_still_finalizes() {
        let mut stage = Stage::with_defaults(MemoryCanvas::new());
        let finalized = Rc::new(Cell::new(0u32));
        let count = Rc::clone(&finalized);
        stage.on_finalize(move || count.set(count.get() + 1));

        // Missing line table entries make compilation fail.
        let result = stage.play(insert_first_request(), LineMap::new());
        assert!(matches!(result, Err(StageError::MissingLine(_))));
        assert!(!stage.busy_flag().is_set());
        assert_eq!(finalized.get(), 1);
    }
}
