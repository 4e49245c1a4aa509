//! On-canvas layout state and slot coordinate math.
//!
//! [`store::PositionStore`] is the sole source of truth for current node
//! positions; [`slots`] holds the pure slot-to-coordinate formulas.

pub mod slots;
pub mod store;

pub use slots::{indicator_position, slot_position};
pub use store::{PositionStore, SharedPositions};
