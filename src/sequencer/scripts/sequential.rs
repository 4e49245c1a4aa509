//! Scripts for the sequential topologies: queue, priority queue, stack.
//!
//! These render as plain box rows with indicator choreography only; no
//! connectors are drawn. Slot 0 is the head end (a stack's top, a
//! queue's front), so pushes open a gap at the left and pops close it.

use crate::error::StageError;
use crate::model::{Indicator, NodeEntity, Operation};
use crate::reposition::RepositionPlan;
use crate::sequencer::script::{BoundaryCase, PhaseAction, StepLabel};
use crate::sequencer::scripts::{slots_from, ScriptBuilder};
use crate::sequencer::OperationRequest;

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
        ) => insert_empty(req, node, b),
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
        (op, case) => {
            log::warn!(
                "no sequential script for {} in {case:?}; skipping",
                op.kind()
            );
            Ok(())
        }
    }
}

fn insert_empty(
    req: &OperationRequest,
    node: &NodeEntity,
    b: &mut ScriptBuilder<'_>,
) -> Result<(), StageError> {
    b.push(StepLabel::CheckEmpty, PhaseAction::Note)?;
    b.push(
        StepLabel::CreateNode,
        PhaseAction::Appear { node: node.clone(), slot: 0 },
    )?;
    b.push(
        StepLabel::MoveHead,
        PhaseAction::ShowIndicator { which: Indicator::Head, slot: 0 },
    )?;
    if req.topology.has_tail() {
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
    let mut indicators = vec![(Indicator::Head, 1)];
    if req.topology.has_tail() {
        indicators.push((Indicator::Tail, req.before.len()));
    }
    b.push(
        StepLabel::MakeRoom,
        PhaseAction::Reposition {
            plan: RepositionPlan {
                nodes: slots_from(&req.before, 1),
                indicators,
                ..RepositionPlan::default()
            },
        },
    )?;
    b.push(
        StepLabel::CreateNode,
        PhaseAction::Appear { node: node.clone(), slot: 0 },
    )?;
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
    b.push(
        StepLabel::CreateNode,
        PhaseAction::Appear { node: node.clone(), slot: req.before.len() },
    )?;
    if req.topology.has_tail() {
        b.push(
            StepLabel::MoveTail,
            PhaseAction::ShowIndicator {
                which: Indicator::Tail,
                slot: req.before.len(),
            },
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
    let before = &req.before;
    b.push(StepLabel::InitCursor, PhaseAction::Note)?;
    b.push(
        StepLabel::Advance,
        PhaseAction::Traverse {
            path: before[..index].iter().map(|n| n.id).collect(),
        },
    )?;

    let mut indicators = Vec::new();
    if req.topology.has_tail() {
        indicators.push((Indicator::Tail, before.len()));
    }
    b.push(
        StepLabel::MakeRoom,
        PhaseAction::Reposition {
            plan: RepositionPlan {
                nodes: slots_from(&before[index..], index + 1),
                indicators,
                ..RepositionPlan::default()
            },
        },
    )?;
    b.push(
        StepLabel::CreateNode,
        PhaseAction::Appear { node: node.clone(), slot: index },
    )?;
    b.push(
        StepLabel::ResetCursor,
        PhaseAction::Emphasize { id: before[index - 1].id, on: false },
    )
}

fn delete_single(
    req: &OperationRequest,
    b: &mut ScriptBuilder<'_>,
) -> Result<(), StageError> {
    b.push(StepLabel::CheckEmpty, PhaseAction::Note)?;
    b.push(
        StepLabel::DetachHead,
        PhaseAction::HideIndicator { which: Indicator::Head },
    )?;
    if req.topology.has_tail() {
        b.push(
            StepLabel::DetachTail,
            PhaseAction::HideIndicator { which: Indicator::Tail },
        )?;
    }
    b.push(StepLabel::RemoveNode, PhaseAction::Exit { id: req.before[0].id })
}

fn delete_head(
    req: &OperationRequest,
    b: &mut ScriptBuilder<'_>,
) -> Result<(), StageError> {
    b.push(
        StepLabel::RemoveNode,
        PhaseAction::Exit { id: req.before[0].id },
    )?;

    let mut indicators = Vec::new();
    if req.topology.has_tail() {
        indicators.push((Indicator::Tail, req.before.len() - 2));
    }
    b.push(
        StepLabel::MakeRoom,
        PhaseAction::Reposition {
            plan: RepositionPlan {
                nodes: slots_from(&req.after, 0),
                indicators,
                ..RepositionPlan::default()
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
    let last = req.before[req.before.len() - 1].id;
    b.push(StepLabel::RemoveNode, PhaseAction::Exit { id: last })?;
    if req.topology.has_tail() {
        b.push(
            StepLabel::MoveTail,
            PhaseAction::ShowIndicator {
                which: Indicator::Tail,
                slot: req.before.len() - 2,
            },
        )?;
    }
    Ok(())
}

fn delete_interior(
    req: &OperationRequest,
    index: usize,
    b: &mut ScriptBuilder<'_>,
) -> Result<(), StageError> {
    let before = &req.before;
    b.push(StepLabel::InitCursor, PhaseAction::Note)?;
    b.push(
        StepLabel::Advance,
        PhaseAction::Traverse {
            path: before[..index].iter().map(|n| n.id).collect(),
        },
    )?;
    b.push(
        StepLabel::RemoveNode,
        PhaseAction::Exit { id: before[index].id },
    )?;

    let mut indicators = Vec::new();
    if req.topology.has_tail() {
        indicators.push((Indicator::Tail, before.len() - 2));
    }
    b.push(
        StepLabel::MakeRoom,
        PhaseAction::Reposition {
            plan: RepositionPlan {
                nodes: slots_from(&before[index + 1..], index),
                indicators,
                ..RepositionPlan::default()
            },
        },
    )?;
    b.push(
        StepLabel::ResetCursor,
        PhaseAction::Emphasize { id: before[index - 1].id, on: false },
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
    b.push(
        StepLabel::DetachHead,
        PhaseAction::HideIndicator { which: Indicator::Head },
    )?;
    if req.topology.has_tail() {
        b.push(
            StepLabel::DetachTail,
            PhaseAction::HideIndicator { which: Indicator::Tail },
        )?;
    }
    b.push(
        StepLabel::ClearAll,
        PhaseAction::ClearAll {
            ids: req.before.iter().map(|n| n.id).collect(),
            links: Vec::new(),
        },
    )
}
