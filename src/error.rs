//! Crate-level error types.
//!
//! Only integration defects live here: a required position, canvas element,
//! or pseudocode line missing when a phase needs it. Domain errors (empty
//! container, out-of-range index) are validated by the logical layer before
//! a choreography is handed to this crate and never re-checked here.

use std::fmt;

use crate::model::{Indicator, LinkEntity, NodeId};
use crate::sequencer::script::StepLabel;

/// Errors produced by the linkstage crate.
#[derive(Debug)]
pub enum StageError {
    /// A run was requested while another run holds the busy flag.
    Busy,
    /// A phase needed a node position that is not in the position store.
    MissingPosition(NodeId),
    /// A phase addressed a node element the canvas does not hold.
    MissingNode(NodeId),
    /// A phase addressed a link element the canvas does not hold.
    MissingLink(LinkEntity),
    /// A phase addressed an indicator the canvas does not show.
    MissingIndicator(Indicator),
    /// The pseudocode line table has no entry for a script label.
    MissingLine(StepLabel),
    /// The operation request and its snapshots disagree structurally.
    Snapshot(String),
    /// The choreography task ended without delivering its outcome.
    Aborted,
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Generic I/O failure.
    Io(std::io::Error),
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busy => write!(f, "a choreography run is already in flight"),
            Self::MissingPosition(id) => {
                write!(f, "no position stored for node {id}")
            }
            Self::MissingNode(id) => {
                write!(f, "canvas has no element for node {id}")
            }
            Self::MissingLink(link) => {
                write!(f, "canvas has no element for link {link}")
            }
            Self::MissingIndicator(which) => {
                write!(f, "canvas shows no {} indicator", which.name())
            }
            Self::MissingLine(label) => {
                write!(f, "line table has no entry for label {}", label.name())
            }
            Self::Snapshot(msg) => {
                write!(f, "inconsistent operation snapshot: {msg}")
            }
            Self::Aborted => {
                write!(f, "choreography task dropped without completing")
            }
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for StageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StageError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
