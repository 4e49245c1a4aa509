//! Cursor walk along a node path.

use crate::animation::preferences::MotionAction;
use crate::animation::tween::TweenTarget;
use crate::context::StageContext;
use crate::error::StageError;
use crate::model::NodeId;

/// Emphasize each node of `path` in order, holding on each one.
///
/// Every visited node publishes a step for the traversal pseudocode line.
/// Emphasis is cleared when the cursor leaves a node; the final node stays
/// emphasized so a follow-up phase can act on it (callers reset it
/// explicitly at the end of the script).
pub(crate) async fn walk(
    path: &[NodeId],
    line_index: u32,
    cx: &StageContext,
) -> Result<(), StageError> {
    for (visited, &id) in path.iter().enumerate() {
        cx.publish_step(line_index);
        cx.canvas.borrow_mut().set_node_emphasis(id, true)?;
        cx.spawn(TweenTarget::Hold, MotionAction::HighlightHold).await?;
        if visited + 1 < path.len() {
            cx.canvas.borrow_mut().set_node_emphasis(id, false)?;
        }
    }
    Ok(())
}
