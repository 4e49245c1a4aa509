//! Phase scripts: operations as data.
//!
//! Script builders compile an operation request into an ordered list of
//! phases; one generic runner interprets them. Each phase carries the
//! pseudocode line it narrates plus the visual action to perform.

use crate::model::{
    Indicator, LinkEntity, NodeEntity, NodeId, Operation,
};
use crate::reposition::RepositionPlan;

/// Semantic pseudocode step a phase narrates.
///
/// Labels name WHAT the algorithm is doing, independent of topology; the
/// host's line table maps them onto its panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepLabel {
    /// Emptiness / precondition check.
    CheckEmpty,
    /// Cursor initialization before a walk.
    InitCursor,
    /// One cursor advance during a walk.
    Advance,
    /// Target-found check after a walk.
    CheckFound,
    /// Shift existing elements to open a gap.
    MakeRoom,
    /// Materialize the new node.
    CreateNode,
    /// Connect predecessor to the new node.
    LinkFromAnchor,
    /// Connect the new node to its successor.
    LinkToSuccessor,
    /// Connect the new node back to its predecessor.
    LinkBackToAnchor,
    /// Connect the successor back to the new node.
    LinkBackFromSuccessor,
    /// Establish the wrap-around next-pointer.
    LinkWrap,
    /// Establish the wrap-around prev-pointer.
    LinkWrapBack,
    /// Sever the predecessor's stale next-pointer.
    UnlinkFromAnchor,
    /// Sever the departing node's next-pointer.
    UnlinkToSuccessor,
    /// Sever the departing node's prev-pointer.
    UnlinkBackToAnchor,
    /// Sever the successor's stale prev-pointer.
    UnlinkBackFromSuccessor,
    /// Sever the stale wrap-around next-pointer.
    UnlinkWrap,
    /// Sever the stale wrap-around prev-pointer.
    UnlinkWrapBack,
    /// Bridge predecessor to successor around a removed node.
    BridgeNext,
    /// Bridge successor back to predecessor.
    BridgeBack,
    /// Re-anchor the head handle.
    MoveHead,
    /// Re-anchor the tail handle.
    MoveTail,
    /// Detach the head handle.
    DetachHead,
    /// Detach the tail handle.
    DetachTail,
    /// Remove the departing node element.
    RemoveNode,
    /// Inspect the front/top element.
    Inspect,
    /// Clear the traversal cursor.
    ResetCursor,
    /// Remove every element.
    ClearAll,
}

impl StepLabel {
    /// Short name for logging.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CheckEmpty => "check-empty",
            Self::InitCursor => "init-cursor",
            Self::Advance => "advance",
            Self::CheckFound => "check-found",
            Self::MakeRoom => "make-room",
            Self::CreateNode => "create-node",
            Self::LinkFromAnchor => "link-from-anchor",
            Self::LinkToSuccessor => "link-to-successor",
            Self::LinkBackToAnchor => "link-back-to-anchor",
            Self::LinkBackFromSuccessor => "link-back-from-successor",
            Self::LinkWrap => "link-wrap",
            Self::LinkWrapBack => "link-wrap-back",
            Self::UnlinkFromAnchor => "unlink-from-anchor",
            Self::UnlinkToSuccessor => "unlink-to-successor",
            Self::UnlinkBackToAnchor => "unlink-back-to-anchor",
            Self::UnlinkBackFromSuccessor => "unlink-back-from-successor",
            Self::UnlinkWrap => "unlink-wrap",
            Self::UnlinkWrapBack => "unlink-wrap-back",
            Self::BridgeNext => "bridge-next",
            Self::BridgeBack => "bridge-back",
            Self::MoveHead => "move-head",
            Self::MoveTail => "move-tail",
            Self::DetachHead => "detach-head",
            Self::DetachTail => "detach-tail",
            Self::RemoveNode => "remove-node",
            Self::Inspect => "inspect",
            Self::ResetCursor => "reset-cursor",
            Self::ClearAll => "clear-all",
        }
    }
}

/// Visual action a phase performs.
#[derive(Debug, Clone)]
pub enum PhaseAction {
    /// Narration only: publish the step, change nothing.
    Note,
    /// Fade a new node in at a slot.
    Appear {
        /// Node to materialize.
        node: NodeEntity,
        /// Destination slot.
        slot: usize,
    },
    /// Fade a node out and remove it.
    Exit {
        /// Node to remove.
        id: NodeId,
    },
    /// Draw a connector in.
    Connect {
        /// Link to add.
        link: LinkEntity,
    },
    /// Fade a connector out and remove it.
    Disconnect {
        /// Link to remove.
        link: LinkEntity,
    },
    /// Cursor walk; publishes one step per visited node.
    Traverse {
        /// Nodes visited, in order.
        path: Vec<NodeId>,
    },
    /// Concurrent slide of nodes, links, and indicators.
    Reposition {
        /// What moves where.
        plan: RepositionPlan,
    },
    /// Show or slide an indicator to a slot.
    ShowIndicator {
        /// Which indicator.
        which: Indicator,
        /// Slot it anchors under.
        slot: usize,
    },
    /// Hide an indicator.
    HideIndicator {
        /// Which indicator.
        which: Indicator,
    },
    /// Flip a node's cursor emphasis; turning it on also holds.
    Emphasize {
        /// Node to (de)emphasize.
        id: NodeId,
        /// Desired emphasis state.
        on: bool,
    },
    /// Fade everything out together and empty the canvas.
    ClearAll {
        /// Every node to remove.
        ids: Vec<NodeId>,
        /// Every link to remove.
        links: Vec<LinkEntity>,
    },
}

/// One choreography phase: the pseudocode line it narrates and the action.
#[derive(Debug, Clone)]
pub struct Phase {
    /// Semantic label the line was resolved from.
    pub label: StepLabel,
    /// 1-based line in the host's pseudocode panel.
    pub line_index: u32,
    /// What this phase does.
    pub action: PhaseAction,
}

/// An ordered phase list compiled for one operation.
#[derive(Debug, Clone, Default)]
pub struct PhaseScript {
    /// Phases in execution order.
    pub phases: Vec<Phase>,
}

impl PhaseScript {
    /// Number of phases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.phases.len()
    }

    /// Whether the script is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }
}

/// Structural boundary case an operation lands in, selecting the script
/// branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryCase {
    /// Operating on an empty structure.
    Empty,
    /// Removing the sole element.
    Single,
    /// Operating at the head position.
    Head,
    /// Operating at the tail position.
    Tail,
    /// Operating strictly between head and tail.
    Interior,
}

impl BoundaryCase {
    /// Classify an operation against the pre-operation length.
    #[must_use]
    pub fn classify(op: &Operation, len_before: usize) -> Self {
        match op {
            Operation::InsertFirst { .. } => {
                if len_before == 0 { Self::Empty } else { Self::Head }
            }
            Operation::InsertLast { .. } => {
                if len_before == 0 { Self::Empty } else { Self::Tail }
            }
            Operation::InsertAt { index, .. } => {
                if len_before == 0 {
                    Self::Empty
                } else if *index == 0 {
                    Self::Head
                } else if *index == len_before {
                    Self::Tail
                } else {
                    Self::Interior
                }
            }
            Operation::DeleteFirst => {
                if len_before == 1 { Self::Single } else { Self::Head }
            }
            Operation::DeleteLast => {
                if len_before == 1 { Self::Single } else { Self::Tail }
            }
            Operation::DeleteAt { index } => {
                if len_before == 1 {
                    Self::Single
                } else if *index == 0 {
                    Self::Head
                } else if *index == len_before - 1 {
                    Self::Tail
                } else {
                    Self::Interior
                }
            }
            Operation::Search { index } => {
                if *index == 0 {
                    Self::Head
                } else if *index == len_before.saturating_sub(1) {
                    Self::Tail
                } else {
                    Self::Interior
                }
            }
            Operation::Peek => Self::Head,
            Operation::Clear => {
                if len_before == 0 { Self::Empty } else { Self::Interior }
            }
        }
    }
}
