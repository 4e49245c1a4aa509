//! Concurrent repositioning of nodes, links, and indicators.
//!
//! A reposition plan names every element that must glide to a new slot.
//! Running the plan writes all destinations into the position store up
//! front, spawns one tween per element, and awaits them together so the
//! whole group lands in the same frame.

use futures::future::join_all;
use glam::Vec2;

use crate::animation::preferences::MotionAction;
use crate::animation::tween::TweenTarget;
use crate::context::StageContext;
use crate::error::StageError;
use crate::layout::{indicator_position, slot_position};
use crate::model::{Indicator, LinkEntity, NodeId};
use crate::path::build_path;

/// Everything one make-room or close-gap pass moves at once.
#[derive(Debug, Clone, Default)]
pub struct RepositionPlan {
    /// Nodes paired with their destination slots.
    pub nodes: Vec<(NodeId, usize)>,
    /// Links whose geometry must follow the moving endpoints.
    pub links: Vec<LinkEntity>,
    /// Links that ride along visually but are removed once the motion
    /// settles (stale connectors kept on screen during a make-room pass).
    pub transient_links: Vec<LinkEntity>,
    /// Indicators paired with their destination slots.
    pub indicators: Vec<(Indicator, usize)>,
}

impl RepositionPlan {
    /// Whether the plan moves nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
            && self.links.is_empty()
            && self.transient_links.is_empty()
            && self.indicators.is_empty()
    }
}

/// Execute a plan: fan out one tween per element, fan in on all of them.
///
/// Destination positions are committed to the store before any tween
/// starts, so later phases read final layout regardless of visual
/// progress. The first tween error aborts the run after the join.
pub(crate) async fn run(
    plan: &RepositionPlan,
    cx: &StageContext,
) -> Result<(), StageError> {
    if plan.is_empty() {
        return Ok(());
    }
    let layout = &cx.options.layout;
    let box_size = Vec2::new(layout.element_width, layout.element_height);

    // Old geometry first, then commit every destination.
    let mut old_positions = Vec::with_capacity(plan.nodes.len());
    for &(id, _) in &plan.nodes {
        old_positions.push((id, cx.require_position(id)?));
    }
    let old_at = |id: NodeId| -> Result<Vec2, StageError> {
        old_positions
            .iter()
            .find(|(moved, _)| *moved == id)
            .map(|(_, p)| *p)
            .map_or_else(|| cx.require_position(id), Ok)
    };

    let mut link_paths = Vec::new();
    for link in plan.links.iter().chain(&plan.transient_links) {
        let from = build_path(
            link.kind,
            old_at(link.source)?,
            old_at(link.target)?,
            box_size.x,
            box_size.y,
        );
        link_paths.push((*link, from));
    }

    {
        let mut store = cx.positions.borrow_mut();
        for &(id, slot) in &plan.nodes {
            store.set(id, slot_position(slot, layout));
        }
    }

    let mut handles = Vec::new();
    for (id, old) in &old_positions {
        let to = cx.require_position(*id)?;
        handles.push(cx.spawn(
            TweenTarget::NodeMove { id: *id, from: *old, to },
            MotionAction::Shift,
        ));
    }
    for (link, from) in link_paths {
        let to = build_path(
            link.kind,
            cx.require_position(link.source)?,
            cx.require_position(link.target)?,
            box_size.x,
            box_size.y,
        );
        if plan.transient_links.contains(&link) {
            cx.canvas.borrow_mut().upsert_link(link, &from, 1.0);
        }
        handles.push(cx.spawn(
            TweenTarget::LinkMorph { link, from, to },
            MotionAction::Shift,
        ));
    }
    for &(which, slot) in &plan.indicators {
        let to = indicator_position(which, slot, layout);
        let from = cx.canvas.borrow().indicator_position(which);
        match from {
            Some(from) => handles.push(cx.spawn(
                TweenTarget::IndicatorMove { which, from, to },
                MotionAction::Shift,
            )),
            // Not on screen yet: anchor it directly, nothing to glide.
            None => cx.canvas.borrow_mut().show_indicator(which, to),
        }
    }

    let results = join_all(handles).await;

    for link in &plan.transient_links {
        cx.canvas.borrow_mut().remove_link(link);
    }

    results.into_iter().collect::<Result<(), _>>()
}
