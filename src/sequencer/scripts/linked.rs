//! Scripts for the four linked-list topologies.
//!
//! Pointer safety ordering is baked into the phase orders: inserts draw
//! every new connector before severing stale ones, deletes sever the
//! departing node's connectors and remove it before bridging the gap.
//! Deletes deliberately invert the insert rule: bridging while the
//! departing box is still on screen would draw the bypass connector
//! straight through it, so the bridge waits for the exit fade and the
//! row closes up last. Circular wrap connectors are re-established in
//! the same discipline.

use crate::error::StageError;
use crate::model::{
    derive_links, Indicator, LinkEntity, LinkKind, NodeEntity, NodeId,
    Operation, Topology,
};
use crate::reposition::RepositionPlan;
use crate::sequencer::script::{BoundaryCase, PhaseAction, StepLabel};
use crate::sequencer::scripts::{links_touching, slots_from, ScriptBuilder};
use crate::sequencer::OperationRequest;

fn forward(a: NodeId, b: NodeId) -> LinkEntity {
    LinkEntity::new(a, b, LinkKind::Forward)
}

fn backward(a: NodeId, b: NodeId) -> LinkEntity {
    LinkEntity::new(a, b, LinkKind::Backward)
}

fn wrap(a: NodeId, b: NodeId) -> LinkEntity {
    LinkEntity::new(a, b, LinkKind::CircularForward)
}

fn wrap_back(a: NodeId, b: NodeId) -> LinkEntity {
    LinkEntity::new(a, b, LinkKind::CircularBackward)
}

pub(super) fn compile(
    req: &OperationRequest,
    case: BoundaryCase,
    b: &mut ScriptBuilder<'_>,
) -> Result<(), StageError> {
    match (&req.operation, case) {
        (
            Operation::InsertFirst { node }
            | Operation::InsertLast { node }
            | Operation::InsertAt { node, .. },
            BoundaryCase::Empty,
        ) => insert_empty(req.topology, node, b),
        (
            Operation::InsertFirst { node }
            | Operation::InsertAt { node, .. },
            BoundaryCase::Head,
        ) => insert_head(req, node, b),
        (
            Operation::InsertLast { node }
            | Operation::InsertAt { node, .. },
            BoundaryCase::Tail,
        ) => insert_tail(req, node, b),
        (Operation::InsertAt { node, index }, BoundaryCase::Interior) => {
            insert_interior(req, node, *index, b)
        }
        (
            Operation::DeleteFirst
            | Operation::DeleteLast
            | Operation::DeleteAt { .. },
            BoundaryCase::Single,
        ) => delete_single(req, b),
        (
            Operation::DeleteFirst | Operation::DeleteAt { .. },
            BoundaryCase::Head,
        ) => delete_head(req, b),
        (
            Operation::DeleteLast | Operation::DeleteAt { .. },
            BoundaryCase::Tail,
        ) => delete_tail(req, b),
        (Operation::DeleteAt { index }, BoundaryCase::Interior) => {
            delete_interior(req, *index, b)
        }
        (Operation::Search { index }, _) => search(req, *index, b),
        (Operation::Peek, _) => peek(req, b),
        (Operation::Clear, BoundaryCase::Empty) => {
            b.push(StepLabel::CheckEmpty, PhaseAction::Note)
        }
        (Operation::Clear, _) => clear(req, b),
        // Remaining combinations cannot be produced by classification.
        (op, case) => {
            log::warn!(
                "no linked script for {} in {case:?}; skipping",
                op.kind()
            );
            Ok(())
        }
    }
}

fn insert_empty(
    topology: Topology,
    node: &NodeEntity,
    b: &mut ScriptBuilder<'_>,
) -> Result<(), StageError> {
    b.push(StepLabel::CheckEmpty, PhaseAction::Note)?;
    b.push(
        StepLabel::CreateNode,
        PhaseAction::Appear { node: node.clone(), slot: 0 },
    )?;
    if topology.is_circular() {
        b.push(
            StepLabel::LinkWrap,
            PhaseAction::Connect { link: wrap(node.id, node.id) },
        )?;
        if topology.is_doubly() {
            b.push(
                StepLabel::LinkWrapBack,
                PhaseAction::Connect { link: wrap_back(node.id, node.id) },
            )?;
        }
    }
    b.push(
        StepLabel::MoveHead,
        PhaseAction::ShowIndicator { which: Indicator::Head, slot: 0 },
    )?;
    if topology.has_tail() {
        b.push(
            StepLabel::MoveTail,
            PhaseAction::ShowIndicator { which: Indicator::Tail, slot: 0 },
        )?;
    }
    Ok(())
}

fn insert_head(
    req: &OperationRequest,
    node: &NodeEntity,
    b: &mut ScriptBuilder<'_>,
) -> Result<(), StageError> {
    let topology = req.topology;
    let before = &req.before;
    let old_head = before[0].id;
    let old_tail = before[before.len() - 1].id;

    let moving = slots_from(before, 1);
    let mut indicators = vec![(Indicator::Head, 1)];
    if topology.has_tail() {
        indicators.push((Indicator::Tail, before.len()));
    }
    b.push(
        StepLabel::MakeRoom,
        PhaseAction::Reposition {
            plan: RepositionPlan {
                links: links_touching(
                    &derive_links(before, topology),
                    &moving,
                ),
                nodes: moving,
                transient_links: Vec::new(),
                indicators,
            },
        },
    )?;
    b.push(
        StepLabel::CreateNode,
        PhaseAction::Appear { node: node.clone(), slot: 0 },
    )?;
    b.push(
        StepLabel::LinkToSuccessor,
        PhaseAction::Connect { link: forward(node.id, old_head) },
    )?;
    if topology.is_doubly() {
        b.push(
            StepLabel::LinkBackFromSuccessor,
            PhaseAction::Connect { link: backward(old_head, node.id) },
        )?;
    }
    if topology.is_circular() {
        b.push(
            StepLabel::LinkWrap,
            PhaseAction::Connect { link: wrap(old_tail, node.id) },
        )?;
        if topology.is_doubly() {
            b.push(
                StepLabel::LinkWrapBack,
                PhaseAction::Connect { link: wrap_back(node.id, old_tail) },
            )?;
        }
        b.push(
            StepLabel::UnlinkWrap,
            PhaseAction::Disconnect { link: wrap(old_tail, old_head) },
        )?;
        if topology.is_doubly() {
            b.push(
                StepLabel::UnlinkWrapBack,
                PhaseAction::Disconnect {
                    link: wrap_back(old_head, old_tail),
                },
            )?;
        }
    }
    b.push(
        StepLabel::MoveHead,
        PhaseAction::ShowIndicator { which: Indicator::Head, slot: 0 },
    )
}

fn insert_tail(
    req: &OperationRequest,
    node: &NodeEntity,
    b: &mut ScriptBuilder<'_>,
) -> Result<(), StageError> {
    let topology = req.topology;
    let before = &req.before;
    let head = before[0].id;
    let old_tail = before[before.len() - 1].id;

    // Without a tail handle the insertion point must be walked to.
    let walks = !topology.has_tail();
    if walks {
        b.push(StepLabel::InitCursor, PhaseAction::Note)?;
        b.push(
            StepLabel::Advance,
            PhaseAction::Traverse {
                path: before.iter().map(|n| n.id).collect(),
            },
        )?;
    }
    b.push(
        StepLabel::CreateNode,
        PhaseAction::Appear { node: node.clone(), slot: before.len() },
    )?;
    b.push(
        StepLabel::LinkFromAnchor,
        PhaseAction::Connect { link: forward(old_tail, node.id) },
    )?;
    if topology.is_doubly() {
        b.push(
            StepLabel::LinkBackToAnchor,
            PhaseAction::Connect { link: backward(node.id, old_tail) },
        )?;
    }
    if topology.is_circular() {
        b.push(
            StepLabel::LinkWrap,
            PhaseAction::Connect { link: wrap(node.id, head) },
        )?;
        if topology.is_doubly() {
            b.push(
                StepLabel::LinkWrapBack,
                PhaseAction::Connect { link: wrap_back(head, node.id) },
            )?;
        }
        b.push(
            StepLabel::UnlinkWrap,
            PhaseAction::Disconnect { link: wrap(old_tail, head) },
        )?;
        if topology.is_doubly() {
            b.push(
                StepLabel::UnlinkWrapBack,
                PhaseAction::Disconnect { link: wrap_back(head, old_tail) },
            )?;
        }
    }
    if topology.has_tail() {
        b.push(
            StepLabel::MoveTail,
            PhaseAction::ShowIndicator {
                which: Indicator::Tail,
                slot: before.len(),
            },
        )?;
    }
    if walks {
        b.push(
            StepLabel::ResetCursor,
            PhaseAction::Emphasize { id: old_tail, on: false },
        )?;
    }
    Ok(())
}

fn insert_interior(
    req: &OperationRequest,
    node: &NodeEntity,
    index: usize,
    b: &mut ScriptBuilder<'_>,
) -> Result<(), StageError> {
    let topology = req.topology;
    let before = &req.before;
    let anchor = before[index - 1].id;
    let successor = before[index].id;

    b.push(StepLabel::InitCursor, PhaseAction::Note)?;
    b.push(
        StepLabel::Advance,
        PhaseAction::Traverse {
            path: before[..index].iter().map(|n| n.id).collect(),
        },
    )?;

    let moving = slots_from(&before[index..], index + 1);
    let mut indicators = Vec::new();
    if topology.has_tail() {
        indicators.push((Indicator::Tail, before.len()));
    }
    b.push(
        StepLabel::MakeRoom,
        PhaseAction::Reposition {
            plan: RepositionPlan {
                links: links_touching(
                    &derive_links(before, topology),
                    &moving,
                ),
                nodes: moving,
                transient_links: Vec::new(),
                indicators,
            },
        },
    )?;
    b.push(
        StepLabel::CreateNode,
        PhaseAction::Appear { node: node.clone(), slot: index },
    )?;
    b.push(
        StepLabel::LinkFromAnchor,
        PhaseAction::Connect { link: forward(anchor, node.id) },
    )?;
    b.push(
        StepLabel::LinkToSuccessor,
        PhaseAction::Connect { link: forward(node.id, successor) },
    )?;
    if topology.is_doubly() {
        b.push(
            StepLabel::LinkBackToAnchor,
            PhaseAction::Connect { link: backward(node.id, anchor) },
        )?;
        b.push(
            StepLabel::LinkBackFromSuccessor,
            PhaseAction::Connect { link: backward(successor, node.id) },
        )?;
    }
    b.push(
        StepLabel::UnlinkFromAnchor,
        PhaseAction::Disconnect { link: forward(anchor, successor) },
    )?;
    if topology.is_doubly() {
        b.push(
            StepLabel::UnlinkBackFromSuccessor,
            PhaseAction::Disconnect { link: backward(successor, anchor) },
        )?;
    }
    b.push(
        StepLabel::ResetCursor,
        PhaseAction::Emphasize { id: anchor, on: false },
    )
}

fn delete_single(
    req: &OperationRequest,
    b: &mut ScriptBuilder<'_>,
) -> Result<(), StageError> {
    let topology = req.topology;
    let sole = req.before[0].id;

    b.push(StepLabel::CheckEmpty, PhaseAction::Note)?;
    if topology.is_circular() {
        b.push(
            StepLabel::UnlinkWrap,
            PhaseAction::Disconnect { link: wrap(sole, sole) },
        )?;
        if topology.is_doubly() {
            b.push(
                StepLabel::UnlinkWrapBack,
                PhaseAction::Disconnect { link: wrap_back(sole, sole) },
            )?;
        }
    }
    b.push(
        StepLabel::DetachHead,
        PhaseAction::HideIndicator { which: Indicator::Head },
    )?;
    if topology.has_tail() {
        b.push(
            StepLabel::DetachTail,
            PhaseAction::HideIndicator { which: Indicator::Tail },
        )?;
    }
    b.push(StepLabel::RemoveNode, PhaseAction::Exit { id: sole })
}

fn delete_head(
    req: &OperationRequest,
    b: &mut ScriptBuilder<'_>,
) -> Result<(), StageError> {
    let topology = req.topology;
    let before = &req.before;
    let head = before[0].id;
    let second = before[1].id;
    let tail = before[before.len() - 1].id;

    b.push(
        StepLabel::UnlinkToSuccessor,
        PhaseAction::Disconnect { link: forward(head, second) },
    )?;
    if topology.is_doubly() {
        b.push(
            StepLabel::UnlinkBackFromSuccessor,
            PhaseAction::Disconnect { link: backward(second, head) },
        )?;
    }
    if topology.is_circular() {
        b.push(
            StepLabel::UnlinkWrap,
            PhaseAction::Disconnect { link: wrap(tail, head) },
        )?;
        if topology.is_doubly() {
            b.push(
                StepLabel::UnlinkWrapBack,
                PhaseAction::Disconnect { link: wrap_back(head, tail) },
            )?;
        }
    }
    b.push(StepLabel::RemoveNode, PhaseAction::Exit { id: head })?;
    if topology.is_circular() {
        b.push(
            StepLabel::LinkWrap,
            PhaseAction::Connect { link: wrap(tail, second) },
        )?;
        if topology.is_doubly() {
            b.push(
                StepLabel::LinkWrapBack,
                PhaseAction::Connect { link: wrap_back(second, tail) },
            )?;
        }
    }

    let moving = slots_from(&req.after, 0);
    let mut indicators = Vec::new();
    if topology.has_tail() {
        indicators.push((Indicator::Tail, before.len() - 2));
    }
    b.push(
        StepLabel::MakeRoom,
        PhaseAction::Reposition {
            plan: RepositionPlan {
                links: links_touching(
                    &derive_links(&req.after, topology),
                    &moving,
                ),
                nodes: moving,
                transient_links: Vec::new(),
                indicators,
            },
        },
    )?;
    b.push(
        StepLabel::MoveHead,
        PhaseAction::ShowIndicator { which: Indicator::Head, slot: 0 },
    )
}

fn delete_tail(
    req: &OperationRequest,
    b: &mut ScriptBuilder<'_>,
) -> Result<(), StageError> {
    let topology = req.topology;
    let before = &req.before;
    let head = before[0].id;
    let tail = before[before.len() - 1].id;
    let pred = before[before.len() - 2].id;

    let walks = !topology.has_tail();
    if walks {
        b.push(StepLabel::InitCursor, PhaseAction::Note)?;
        b.push(
            StepLabel::Advance,
            PhaseAction::Traverse {
                path: before[..before.len() - 1]
                    .iter()
                    .map(|n| n.id)
                    .collect(),
            },
        )?;
    }
    b.push(
        StepLabel::UnlinkFromAnchor,
        PhaseAction::Disconnect { link: forward(pred, tail) },
    )?;
    if topology.is_doubly() {
        b.push(
            StepLabel::UnlinkBackToAnchor,
            PhaseAction::Disconnect { link: backward(tail, pred) },
        )?;
    }
    if topology.is_circular() {
        b.push(
            StepLabel::UnlinkWrap,
            PhaseAction::Disconnect { link: wrap(tail, head) },
        )?;
        if topology.is_doubly() {
            b.push(
                StepLabel::UnlinkWrapBack,
                PhaseAction::Disconnect { link: wrap_back(head, tail) },
            )?;
        }
    }
    b.push(StepLabel::RemoveNode, PhaseAction::Exit { id: tail })?;
    if topology.is_circular() {
        b.push(
            StepLabel::LinkWrap,
            PhaseAction::Connect { link: wrap(pred, head) },
        )?;
        if topology.is_doubly() {
            b.push(
                StepLabel::LinkWrapBack,
                PhaseAction::Connect { link: wrap_back(head, pred) },
            )?;
        }
    }
    if topology.has_tail() {
        b.push(
            StepLabel::MoveTail,
            PhaseAction::ShowIndicator {
                which: Indicator::Tail,
                slot: before.len() - 2,
            },
        )?;
    }
    if walks {
        b.push(
            StepLabel::ResetCursor,
            PhaseAction::Emphasize { id: pred, on: false },
        )?;
    }
    Ok(())
}

fn delete_interior(
    req: &OperationRequest,
    index: usize,
    b: &mut ScriptBuilder<'_>,
) -> Result<(), StageError> {
    let topology = req.topology;
    let before = &req.before;
    let removed = before[index].id;
    let anchor = before[index - 1].id;
    let successor = before[index + 1].id;

    b.push(StepLabel::InitCursor, PhaseAction::Note)?;
    b.push(
        StepLabel::Advance,
        PhaseAction::Traverse {
            path: before[..index].iter().map(|n| n.id).collect(),
        },
    )?;
    b.push(
        StepLabel::UnlinkFromAnchor,
        PhaseAction::Disconnect { link: forward(anchor, removed) },
    )?;
    b.push(
        StepLabel::UnlinkToSuccessor,
        PhaseAction::Disconnect { link: forward(removed, successor) },
    )?;
    if topology.is_doubly() {
        b.push(
            StepLabel::UnlinkBackToAnchor,
            PhaseAction::Disconnect { link: backward(removed, anchor) },
        )?;
        b.push(
            StepLabel::UnlinkBackFromSuccessor,
            PhaseAction::Disconnect { link: backward(successor, removed) },
        )?;
    }
    b.push(StepLabel::RemoveNode, PhaseAction::Exit { id: removed })?;
    b.push(
        StepLabel::BridgeNext,
        PhaseAction::Connect { link: forward(anchor, successor) },
    )?;
    if topology.is_doubly() {
        b.push(
            StepLabel::BridgeBack,
            PhaseAction::Connect { link: backward(successor, anchor) },
        )?;
    }

    let moving = slots_from(&before[index + 1..], index);
    let mut indicators = Vec::new();
    if topology.has_tail() {
        indicators.push((Indicator::Tail, before.len() - 2));
    }
    b.push(
        StepLabel::MakeRoom,
        PhaseAction::Reposition {
            plan: RepositionPlan {
                links: links_touching(
                    &derive_links(&req.after, topology),
                    &moving,
                ),
                nodes: moving,
                transient_links: Vec::new(),
                indicators,
            },
        },
    )?;
    b.push(
        StepLabel::ResetCursor,
        PhaseAction::Emphasize { id: anchor, on: false },
    )
}

fn search(
    req: &OperationRequest,
    index: usize,
    b: &mut ScriptBuilder<'_>,
) -> Result<(), StageError> {
    let before = &req.before;
    b.push(StepLabel::CheckEmpty, PhaseAction::Note)?;
    b.push(StepLabel::InitCursor, PhaseAction::Note)?;
    b.push(
        StepLabel::Advance,
        PhaseAction::Traverse {
            path: before[..=index].iter().map(|n| n.id).collect(),
        },
    )?;
    b.push(StepLabel::CheckFound, PhaseAction::Note)?;
    b.push(
        StepLabel::ResetCursor,
        PhaseAction::Emphasize { id: before[index].id, on: false },
    )
}

fn peek(
    req: &OperationRequest,
    b: &mut ScriptBuilder<'_>,
) -> Result<(), StageError> {
    let head = req.before[0].id;
    b.push(StepLabel::Inspect, PhaseAction::Emphasize { id: head, on: true })?;
    b.push(
        StepLabel::ResetCursor,
        PhaseAction::Emphasize { id: head, on: false },
    )
}

fn clear(
    req: &OperationRequest,
    b: &mut ScriptBuilder<'_>,
) -> Result<(), StageError> {
    let topology = req.topology;
    b.push(
        StepLabel::DetachHead,
        PhaseAction::HideIndicator { which: Indicator::Head },
    )?;
    if topology.has_tail() {
        b.push(
            StepLabel::DetachTail,
            PhaseAction::HideIndicator { which: Indicator::Tail },
        )?;
    }
    b.push(
        StepLabel::ClearAll,
        PhaseAction::ClearAll {
            ids: req.before.iter().map(|n| n.id).collect(),
            links: derive_links(&req.before, topology),
        },
    )
}
