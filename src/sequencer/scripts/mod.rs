//! Script builders: one per topology family.
//!
//! [`build`] classifies the request's boundary case and dispatches to the
//! linked-list family (connector choreography) or the sequential family
//! (indicator-centric box rows). Builders share the [`ScriptBuilder`]
//! push interface and the plan helpers below.

mod linked;
mod sequential;

use crate::error::StageError;
use crate::model::{LinkEntity, NodeEntity, NodeId};
use crate::pseudocode::LineTable;
use crate::sequencer::script::{
    BoundaryCase, Phase, PhaseAction, PhaseScript, StepLabel,
};
use crate::sequencer::OperationRequest;

/// Compile a request into its phase script.
pub(crate) fn build(
    request: &OperationRequest,
    lines: &dyn LineTable,
) -> Result<PhaseScript, StageError> {
    let case = BoundaryCase::classify(&request.operation, request.before.len());
    log::debug!(
        "compiling {} on {} ({case:?}, {} -> {} nodes)",
        request.operation.kind(),
        request.topology.name(),
        request.before.len(),
        request.after.len(),
    );
    let mut builder = ScriptBuilder::new(lines);
    if request.topology.has_node_links() {
        linked::compile(request, case, &mut builder)?;
    } else {
        sequential::compile(request, case, &mut builder)?;
    }
    Ok(builder.finish())
}

/// Accumulates phases, resolving each label against the line table.
pub(crate) struct ScriptBuilder<'a> {
    lines: &'a dyn LineTable,
    phases: Vec<Phase>,
}

impl<'a> ScriptBuilder<'a> {
    fn new(lines: &'a dyn LineTable) -> Self {
        Self { lines, phases: Vec::new() }
    }

    /// Append a phase; fails if the host's panel has no line for `label`.
    pub(crate) fn push(
        &mut self,
        label: StepLabel,
        action: PhaseAction,
    ) -> Result<(), StageError> {
        let line_index = self
            .lines
            .line(label)
            .ok_or(StageError::MissingLine(label))?;
        self.phases.push(Phase { label, line_index, action });
        Ok(())
    }

    fn finish(self) -> PhaseScript {
        PhaseScript { phases: self.phases }
    }
}

/// Pair each node with a slot starting at `first_slot`.
pub(crate) fn slots_from(
    nodes: &[NodeEntity],
    first_slot: usize,
) -> Vec<(NodeId, usize)> {
    nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id, first_slot + i))
        .collect()
}

/// Links with at least one endpoint among the moving nodes.
pub(crate) fn links_touching(
    links: &[LinkEntity],
    moving: &[(NodeId, usize)],
) -> Vec<LinkEntity> {
    links
        .iter()
        .filter(|l| {
            moving.iter().any(|(id, _)| *id == l.source || *id == l.target)
        })
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        derive_links, LinkKind, NodeEntity, NodeId, Operation, Topology,
    };
    use crate::pseudocode::LineMap;
    use crate::sequencer::script::{PhaseAction, StepLabel};
    use crate::sequencer::OperationRequest;

    fn nodes(ids: &[u64]) -> Vec<NodeEntity> {
        ids.iter()
            .map(|&i| NodeEntity::new(NodeId::new(i), format!("v{i}")))
            .collect()
    }

    fn full_table() -> LineMap {
        // Every label mapped, each to a distinct line.
        let labels = [
            StepLabel::CheckEmpty,
            StepLabel::InitCursor,
            StepLabel::Advance,
            StepLabel::CheckFound,
            StepLabel::MakeRoom,
            StepLabel::CreateNode,
            StepLabel::LinkFromAnchor,
            StepLabel::LinkToSuccessor,
            StepLabel::LinkBackToAnchor,
            StepLabel::LinkBackFromSuccessor,
            StepLabel::LinkWrap,
            StepLabel::LinkWrapBack,
            StepLabel::UnlinkFromAnchor,
            StepLabel::UnlinkToSuccessor,
            StepLabel::UnlinkBackToAnchor,
            StepLabel::UnlinkBackFromSuccessor,
            StepLabel::UnlinkWrap,
            StepLabel::UnlinkWrapBack,
            StepLabel::BridgeNext,
            StepLabel::BridgeBack,
            StepLabel::MoveHead,
            StepLabel::MoveTail,
            StepLabel::DetachHead,
            StepLabel::DetachTail,
            StepLabel::RemoveNode,
            StepLabel::Inspect,
            StepLabel::ResetCursor,
            StepLabel::ClearAll,
        ];
        let mut table = LineMap::new();
        for (i, label) in labels.into_iter().enumerate() {
            table = table.with(label, u32::try_from(i).unwrap_or(0) + 1);
        }
        table
    }

    fn compile(
        topology: Topology,
        operation: Operation,
        before: Vec<NodeEntity>,
        after: Vec<NodeEntity>,
    ) -> PhaseScript {
        build(
            &OperationRequest { topology, operation, before, after },
            &full_table(),
        )
        .unwrap()
    }

    fn labels(script: &PhaseScript) -> Vec<StepLabel> {
        script.phases.iter().map(|p| p.label).collect()
    }

    #[test]
    fn test_missing_line_is_an_error() {
        let result = build(
            &OperationRequest {
                topology: Topology::SinglyLinked,
                operation: Operation::Clear,
                before: nodes(&[1]),
                after: Vec::new(),
            },
            &LineMap::new(),
        );
        assert!(matches!(result, Err(StageError::MissingLine(_))));
    }

    #[test]
    fn test_empty_insert_singly_linked() {
        let after = nodes(&[1]);
        let script = compile(
            Topology::SinglyLinked,
            Operation::InsertFirst { node: after[0].clone() },
            Vec::new(),
            after,
        );
        assert_eq!(
            labels(&script),
            vec![
                StepLabel::CheckEmpty,
                StepLabel::CreateNode,
                StepLabel::MoveHead,
            ]
        );
    }

    #[test]
    fn test_empty_insert_doubly_circular_self_loops() {
        let after = nodes(&[1]);
        let script = compile(
            Topology::DoublyCircular,
            Operation::InsertFirst { node: after[0].clone() },
            Vec::new(),
            after,
        );
        assert_eq!(
            labels(&script),
            vec![
                StepLabel::CheckEmpty,
                StepLabel::CreateNode,
                StepLabel::LinkWrap,
                StepLabel::LinkWrapBack,
                StepLabel::MoveHead,
                StepLabel::MoveTail,
            ]
        );
        // Both wraps are self-loops on the sole node.
        for phase in &script.phases {
            if let PhaseAction::Connect { link } = &phase.action {
                assert_eq!(link.source, link.target);
            }
        }
    }

    #[test]
    fn test_interior_insert_connects_before_disconnecting() {
        let before = nodes(&[1, 2, 3]);
        let mut after = before.clone();
        let new = NodeEntity::new(NodeId::new(4), "d");
        after.insert(1, new.clone());

        let script = compile(
            Topology::SinglyLinked,
            Operation::InsertAt { node: new, index: 1 },
            before,
            after,
        );
        assert_eq!(
            labels(&script),
            vec![
                StepLabel::InitCursor,
                StepLabel::Advance,
                StepLabel::MakeRoom,
                StepLabel::CreateNode,
                StepLabel::LinkFromAnchor,
                StepLabel::LinkToSuccessor,
                StepLabel::UnlinkFromAnchor,
                StepLabel::ResetCursor,
            ]
        );

        // The stale anchor->successor connector rides the make-room shift.
        let stale = LinkEntity::new(
            NodeId::new(1),
            NodeId::new(2),
            LinkKind::Forward,
        );
        let make_room = script
            .phases
            .iter()
            .find(|p| p.label == StepLabel::MakeRoom)
            .unwrap();
        let PhaseAction::Reposition { plan } = &make_room.action else {
            panic!("make-room must reposition");
        };
        assert!(plan.links.contains(&stale));
        assert_eq!(plan.nodes, vec![(NodeId::new(2), 2), (NodeId::new(3), 3)]);
    }

    #[test]
    fn test_single_delete_circular_unwraps_self_loop() {
        let before = nodes(&[7]);
        let script = compile(
            Topology::SinglyCircular,
            Operation::DeleteFirst,
            before,
            Vec::new(),
        );
        assert_eq!(
            labels(&script),
            vec![
                StepLabel::CheckEmpty,
                StepLabel::UnlinkWrap,
                StepLabel::DetachHead,
                StepLabel::DetachTail,
                StepLabel::RemoveNode,
            ]
        );
        // No connect phases at all: nothing is drawn, only removed.
        assert!(!script
            .phases
            .iter()
            .any(|p| matches!(p.action, PhaseAction::Connect { .. })));
    }

    #[test]
    fn test_interior_delete_bridges_after_removal() {
        let before = nodes(&[1, 2, 3, 4]);
        let mut after = before.clone();
        let removed = after.remove(2);

        let script = compile(
            Topology::DoublyLinked,
            Operation::DeleteAt { index: 2 },
            before,
            after,
        );
        let seq = labels(&script);
        let remove_at =
            seq.iter().position(|l| *l == StepLabel::RemoveNode).unwrap();
        let bridge_at =
            seq.iter().position(|l| *l == StepLabel::BridgeNext).unwrap();
        assert!(remove_at < bridge_at);
        assert!(seq.contains(&StepLabel::BridgeBack));
        assert!(seq.contains(&StepLabel::UnlinkBackToAnchor));

        // The departing node is the one faded out.
        let exit = script
            .phases
            .iter()
            .find_map(|p| match &p.action {
                PhaseAction::Exit { id } => Some(*id),
                _ => None,
            })
            .unwrap();
        assert_eq!(exit, removed.id);
    }

    #[test]
    fn test_search_walks_inclusive_and_resets() {
        let before = nodes(&[1, 2, 3]);
        let script = compile(
            Topology::SinglyLinked,
            Operation::Search { index: 2 },
            before.clone(),
            before,
        );
        let walk = script
            .phases
            .iter()
            .find_map(|p| match &p.action {
                PhaseAction::Traverse { path } => Some(path.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(
            walk,
            vec![NodeId::new(1), NodeId::new(2), NodeId::new(3)]
        );
        assert_eq!(labels(&script).last(), Some(&StepLabel::ResetCursor));
    }

    #[test]
    fn test_clear_fades_everything_together() {
        let before = nodes(&[1, 2, 3]);
        let links = derive_links(&before, Topology::DoublyLinked);
        let script = compile(
            Topology::DoublyLinked,
            Operation::Clear,
            before,
            Vec::new(),
        );
        let all = script
            .phases
            .iter()
            .find_map(|p| match &p.action {
                PhaseAction::ClearAll { ids, links } => {
                    Some((ids.clone(), links.clone()))
                }
                _ => None,
            })
            .unwrap();
        assert_eq!(all.0.len(), 3);
        assert_eq!(all.1.len(), links.len());
    }

    #[test]
    fn test_stack_push_has_no_link_phases() {
        let before = nodes(&[1, 2]);
        let new = NodeEntity::new(NodeId::new(3), "top");
        let mut after = before.clone();
        after.insert(0, new.clone());

        let script = compile(
            Topology::Stack,
            Operation::InsertFirst { node: new },
            before,
            after,
        );
        assert_eq!(
            labels(&script),
            vec![
                StepLabel::MakeRoom,
                StepLabel::CreateNode,
                StepLabel::MoveHead,
            ]
        );
        assert!(!script.phases.iter().any(|p| matches!(
            p.action,
            PhaseAction::Connect { .. } | PhaseAction::Disconnect { .. }
        )));
    }

    #[test]
    fn test_enqueue_appends_without_make_room() {
        let before = nodes(&[1, 2]);
        let new = NodeEntity::new(NodeId::new(3), "rear");
        let mut after = before.clone();
        after.push(new.clone());

        let script = compile(
            Topology::Queue,
            Operation::InsertLast { node: new.clone() },
            before,
            after,
        );
        assert_eq!(
            labels(&script),
            vec![StepLabel::CreateNode, StepLabel::MoveTail]
        );
        let appear = script
            .phases
            .iter()
            .find_map(|p| match &p.action {
                PhaseAction::Appear { node, slot } => Some((node.id, *slot)),
                _ => None,
            })
            .unwrap();
        assert_eq!(appear, (new.id, 2));
    }
}
