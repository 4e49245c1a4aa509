//! Generic phase-script interpreter.
//!
//! One runner executes every script the builders produce. Each phase
//! publishes its pseudocode step, performs its visual action, and awaits
//! whatever tweens the action spawned before the next phase starts;
//! traversal and clear-all are the only phases that fan out internally.

use futures::future::join_all;

use crate::animation::preferences::MotionAction;
use crate::animation::tween::TweenTarget;
use crate::context::StageContext;
use crate::error::StageError;
use crate::layout::{indicator_position, slot_position};
use crate::path::build_path;
use crate::reposition;
use crate::sequencer::script::{Phase, PhaseAction, PhaseScript};
use crate::traversal;

pub(crate) async fn run_script(
    script: &PhaseScript,
    cx: &StageContext,
) -> Result<(), StageError> {
    for phase in &script.phases {
        log::debug!(
            "phase {} (line {})",
            phase.label.name(),
            phase.line_index
        );
        run_phase(phase, cx).await?;
    }
    Ok(())
}

async fn run_phase(
    phase: &Phase,
    cx: &StageContext,
) -> Result<(), StageError> {
    // Traversal publishes one step per visited node itself.
    if let PhaseAction::Traverse { path } = &phase.action {
        return traversal::walk(path, phase.line_index, cx).await;
    }
    cx.publish_step(phase.line_index);

    let layout = &cx.options.layout;
    match &phase.action {
        PhaseAction::Traverse { .. } | PhaseAction::Note => Ok(()),
        PhaseAction::Appear { node, slot } => {
            let at = slot_position(*slot, layout);
            cx.positions.borrow_mut().set(node.id, at);
            cx.canvas.borrow_mut().upsert_node(node, at, 0.0);
            cx.spawn(
                TweenTarget::NodeFade { id: node.id, from: 0.0, to: 1.0 },
                MotionAction::Appear,
            )
            .await
        }
        PhaseAction::Exit { id } => {
            cx.spawn(
                TweenTarget::NodeFade { id: *id, from: 1.0, to: 0.0 },
                MotionAction::Exit,
            )
            .await?;
            cx.canvas.borrow_mut().remove_node(*id);
            let _ = cx.positions.borrow_mut().delete(*id);
            Ok(())
        }
        PhaseAction::Connect { link } => {
            let from = cx.require_position(link.source)?;
            let to = cx.require_position(link.target)?;
            let path = build_path(
                link.kind,
                from,
                to,
                layout.element_width,
                layout.element_height,
            );
            cx.canvas.borrow_mut().upsert_link(*link, &path, 0.0);
            cx.spawn(
                TweenTarget::LinkFade { link: *link, from: 0.0, to: 1.0 },
                MotionAction::Connect,
            )
            .await
        }
        PhaseAction::Disconnect { link } => {
            cx.spawn(
                TweenTarget::LinkFade { link: *link, from: 1.0, to: 0.0 },
                MotionAction::Disconnect,
            )
            .await?;
            cx.canvas.borrow_mut().remove_link(link);
            Ok(())
        }
        PhaseAction::Reposition { plan } => reposition::run(plan, cx).await,
        PhaseAction::ShowIndicator { which, slot } => {
            let to = indicator_position(*which, *slot, layout);
            let from = cx.canvas.borrow().indicator_position(*which);
            match from {
                Some(from) if from != to => {
                    cx.spawn(
                        TweenTarget::IndicatorMove { which: *which, from, to },
                        MotionAction::Indicator,
                    )
                    .await
                }
                Some(_) => Ok(()),
                None => {
                    cx.canvas.borrow_mut().show_indicator(*which, to);
                    Ok(())
                }
            }
        }
        PhaseAction::HideIndicator { which } => {
            cx.canvas.borrow_mut().hide_indicator(*which);
            Ok(())
        }
        PhaseAction::Emphasize { id, on } => {
            cx.canvas.borrow_mut().set_node_emphasis(*id, *on)?;
            if *on {
                cx.spawn(TweenTarget::Hold, MotionAction::HighlightHold)
                    .await?;
            }
            Ok(())
        }
        PhaseAction::ClearAll { ids, links } => {
            let mut handles = Vec::with_capacity(ids.len() + links.len());
            for link in links {
                handles.push(cx.spawn(
                    TweenTarget::LinkFade { link: *link, from: 1.0, to: 0.0 },
                    MotionAction::Disconnect,
                ));
            }
            for id in ids {
                handles.push(cx.spawn(
                    TweenTarget::NodeFade { id: *id, from: 1.0, to: 0.0 },
                    MotionAction::Exit,
                ));
            }
            join_all(handles)
                .await
                .into_iter()
                .collect::<Result<(), _>>()?;

            let mut canvas = cx.canvas.borrow_mut();
            for link in links {
                canvas.remove_link(link);
            }
            for id in ids {
                canvas.remove_node(*id);
            }
            drop(canvas);
            cx.positions.borrow_mut().clear();
            Ok(())
        }
    }
}
