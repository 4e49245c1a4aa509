//! Operation choreography: request validation, script compilation, and
//! the generic runner that plays scripts back.
//!
//! An [`OperationRequest`] carries the pre- and post-operation snapshots
//! from the logical layer. Compilation turns it into a phase script for
//! its topology and boundary case; the runner interprets the script,
//! bracketing it with the operation-start / operation-done event pair.

pub mod script;

pub(crate) mod runner;
pub(crate) mod scripts;

use crate::context::StageContext;
use crate::error::StageError;
use crate::events::{StepEvent, StepEventBus};
use crate::model::{NodeEntity, Operation, Topology};
use crate::pseudocode::LineTable;

/// One operation to choreograph, with its surrounding snapshots.
///
/// Snapshots are ordered head-first. The logical layer validates the
/// operation (bounds, emptiness) before building a request; this crate
/// only cross-checks that the snapshots fit the operation.
#[derive(Debug, Clone)]
pub struct OperationRequest {
    /// Structure variant selecting the script family.
    pub topology: Topology,
    /// The operation to animate.
    pub operation: Operation,
    /// Node collection before the operation.
    pub before: Vec<NodeEntity>,
    /// Node collection after the operation.
    pub after: Vec<NodeEntity>,
}

impl OperationRequest {
    /// Cross-check the snapshots against the operation.
    fn validate(&self) -> Result<(), StageError> {
        let (len_before, len_after) = (self.before.len(), self.after.len());
        let expect_after = match &self.operation {
            Operation::InsertFirst { .. } | Operation::InsertLast { .. } => {
                len_before + 1
            }
            Operation::InsertAt { index, .. } => {
                if *index > len_before {
                    return Err(StageError::Snapshot(format!(
                        "insert index {index} out of range 0..={len_before}"
                    )));
                }
                len_before + 1
            }
            Operation::DeleteFirst | Operation::DeleteLast => {
                if len_before == 0 {
                    return Err(StageError::Snapshot(
                        "delete on an empty collection".into(),
                    ));
                }
                len_before - 1
            }
            Operation::DeleteAt { index } => {
                if *index >= len_before {
                    return Err(StageError::Snapshot(format!(
                        "delete index {index} out of range 0..{len_before}"
                    )));
                }
                len_before - 1
            }
            Operation::Search { index } => {
                if *index >= len_before {
                    return Err(StageError::Snapshot(format!(
                        "search index {index} out of range 0..{len_before}"
                    )));
                }
                len_before
            }
            Operation::Peek => {
                if len_before == 0 {
                    return Err(StageError::Snapshot(
                        "peek on an empty collection".into(),
                    ));
                }
                len_before
            }
            Operation::Clear => 0,
        };
        if len_after != expect_after {
            return Err(StageError::Snapshot(format!(
                "after-snapshot has {len_after} nodes, expected \
                 {expect_after} for {}",
                self.operation.kind()
            )));
        }
        Ok(())
    }
}

/// Compile and play one operation, bracketed by its event pair.
///
/// `operation-done` is published whether the run succeeds or fails; the
/// busy flag and host reset are handled by the caller's finalize guard.
pub(crate) async fn run_operation(
    request: &OperationRequest,
    lines: &dyn LineTable,
    cx: &StageContext,
) -> Result<(), StageError> {
    let op = request.operation.kind();
    log::info!("choreographing {op} on {}", request.topology.name());
    StepEventBus::publish_shared(&cx.bus, &StepEvent::OperationStart { op });

    let result = match request.validate().and_then(|()| {
        scripts::build(request, lines)
    }) {
        Ok(choreography) => runner::run_script(&choreography, cx).await,
        Err(e) => Err(e),
    };

    StepEventBus::publish_shared(&cx.bus, &StepEvent::OperationDone { op });
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeId;

    fn nodes(n: usize) -> Vec<NodeEntity> {
        (0..n)
            .map(|i| NodeEntity::new(NodeId::new(i as u64), format!("v{i}")))
            .collect()
    }

    #[test]
    fn test_validate_accepts_matching_snapshots() {
        let req = OperationRequest {
            topology: Topology::SinglyLinked,
            operation: Operation::DeleteAt { index: 1 },
            before: nodes(3),
            after: {
                let mut after = nodes(3);
                let _ = after.remove(1);
                after
            },
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_index() {
        let req = OperationRequest {
            topology: Topology::Queue,
            operation: Operation::DeleteAt { index: 5 },
            before: nodes(3),
            after: nodes(2),
        };
        assert!(matches!(req.validate(), Err(StageError::Snapshot(_))));
    }

    #[test]
    fn test_validate_rejects_length_mismatch() {
        let req = OperationRequest {
            topology: Topology::Stack,
            operation: Operation::Clear,
            before: nodes(3),
            after: nodes(1),
        };
        assert!(matches!(req.validate(), Err(StageError::Snapshot(_))));
    }

    #[test]
    fn test_validate_rejects_empty_delete() {
        let req = OperationRequest {
            topology: Topology::SinglyLinked,
            operation: Operation::DeleteFirst,
            before: Vec::new(),
            after: Vec::new(),
        };
        assert!(matches!(req.validate(), Err(StageError::Snapshot(_))));
    }
}
