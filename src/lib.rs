// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
// Layout math casts slot indices to f32 on purpose
#![allow(clippy::cast_precision_loss)]
// Animation math compares against 0.0 and 1.0 constantly
#![allow(clippy::float_cmp)]
// Single-threaded cooperative model: every future is !Send on purpose
#![allow(clippy::future_not_send)]
// Error conditions are enumerated on `error::StageError` itself
#![allow(clippy::missing_errors_doc)]

//! Animation choreography engine for node-and-link data structure
//! visualization.
//!
//! Linkstage turns data structure operations (insert, delete, search on
//! linked lists, queues, stacks) into phase-by-phase animation scripts:
//! nodes fade in and out, connectors draw and sever in pointer-safe
//! order, rows glide to make room, and head/tail indicators follow. The
//! crate owns the choreography; rendering is behind the [`canvas::Canvas`]
//! trait and pseudocode display behind [`pseudocode::LineTable`].
//!
//! # Key entry points
//!
//! - [`stage::Stage`] - the engine façade: begin/tick/play one operation
//! - [`sequencer::OperationRequest`] - an operation plus its snapshots
//! - [`canvas::MemoryCanvas`] - headless canvas for tests and tools
//! - [`events::StepEventBus`] - run lifecycle and pseudocode progress
//! - [`options::StageOptions`] - layout geometry and animation timing
//!
//! # Execution model
//!
//! Everything runs single-threaded and cooperatively: one choreography
//! task per run, suspended on tween-completion futures that the host's
//! frame tick resolves. Concurrency (row repositioning, clear-all fades)
//! is fan-out/fan-in over those futures, never threads.

pub mod animation;
pub mod canvas;
pub mod easing;
pub mod error;
pub mod events;
pub mod layout;
pub mod model;
pub mod options;
pub mod path;
pub mod pseudocode;
pub mod reposition;
pub mod sequencer;
pub mod stage;

mod context;
mod traversal;

pub use canvas::{Canvas, MemoryCanvas};
pub use error::StageError;
pub use events::{ChoreographyStep, StepEvent, StepEventBus};
pub use model::{
    derive_links, Indicator, LinkEntity, LinkKind, NodeEntity, NodeId,
    Operation, OperationKind, Topology,
};
pub use options::StageOptions;
pub use pseudocode::{LineMap, LineTable};
pub use sequencer::script::StepLabel;
pub use sequencer::OperationRequest;
pub use stage::{BusyFlag, RunHandle, Stage};
