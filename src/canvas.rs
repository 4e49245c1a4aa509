//! Rendering-surface abstraction.
//!
//! The choreography core never draws; it addresses an opaque surface
//! through [`Canvas`], keyed by node id, link triple, and indicator. The
//! crate ships [`MemoryCanvas`], an in-memory implementation that records
//! element state plus an ordered action journal — hosts use it for
//! headless runs and every test drives it.
//!
//! Lookup failures on the `set_*` channels are integration defects: the
//! sequencer assumed an element the host no longer holds. They propagate
//! as [`StageError`] values, never panics.

use glam::Vec2;
use rustc_hash::FxHashMap;

use crate::error::StageError;
use crate::model::{Indicator, LinkEntity, NodeEntity, NodeId};
use crate::path::PathDescriptor;

/// Rendering-surface interface the animation channels write through.
pub trait Canvas {
    /// Add or replace a node element at a position with an opacity.
    fn upsert_node(&mut self, node: &NodeEntity, at: Vec2, opacity: f32);

    /// Remove a node element. Removing an absent node is a no-op.
    fn remove_node(&mut self, id: NodeId);

    /// Whether the canvas holds an element for this node.
    fn has_node(&self, id: NodeId) -> bool;

    /// Move a node element.
    fn set_node_position(&mut self, id: NodeId, at: Vec2)
        -> Result<(), StageError>;

    /// Set a node element's opacity.
    fn set_node_opacity(&mut self, id: NodeId, alpha: f32)
        -> Result<(), StageError>;

    /// Toggle cursor emphasis on a node element.
    fn set_node_emphasis(&mut self, id: NodeId, on: bool)
        -> Result<(), StageError>;

    /// Add or replace a link element with a path and an opacity.
    fn upsert_link(
        &mut self,
        link: LinkEntity,
        path: &PathDescriptor,
        opacity: f32,
    );

    /// Remove a link element. Removing an absent link is a no-op.
    fn remove_link(&mut self, link: &LinkEntity);

    /// Replace a link element's path.
    fn set_link_path(
        &mut self,
        link: &LinkEntity,
        path: &PathDescriptor,
    ) -> Result<(), StageError>;

    /// Set a link element's opacity.
    fn set_link_opacity(
        &mut self,
        link: &LinkEntity,
        alpha: f32,
    ) -> Result<(), StageError>;

    /// Show an indicator marker at a point (instantly).
    fn show_indicator(&mut self, which: Indicator, at: Vec2);

    /// Hide an indicator marker. Hiding an absent one is a no-op.
    fn hide_indicator(&mut self, which: Indicator);

    /// Current anchor of an indicator, if shown.
    fn indicator_position(&self, which: Indicator) -> Option<Vec2>;

    /// Move a shown indicator marker.
    fn set_indicator_position(
        &mut self,
        which: Indicator,
        at: Vec2,
    ) -> Result<(), StageError>;
}

/// Visual state of one node element on a [`MemoryCanvas`].
#[derive(Debug, Clone, PartialEq)]
pub struct NodeVisual {
    /// Display value.
    pub value: String,
    /// Current (possibly mid-tween) position.
    pub position: Vec2,
    /// Current opacity, 0.0..=1.0.
    pub opacity: f32,
    /// Whether the cursor emphasis is on.
    pub emphasized: bool,
}

/// Visual state of one link element on a [`MemoryCanvas`].
#[derive(Debug, Clone, PartialEq)]
pub struct LinkVisual {
    /// Current connector geometry.
    pub path: PathDescriptor,
    /// Current opacity, 0.0..=1.0.
    pub opacity: f32,
}

/// Discrete lifecycle entries recorded by [`MemoryCanvas`].
///
/// Per-tick channel writes (positions, opacities, paths) are state, not
/// journal entries; the journal records only element lifecycle and
/// emphasis flips, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasAction {
    /// A node element was added.
    NodeAdded(NodeId),
    /// A node element was removed.
    NodeRemoved(NodeId),
    /// A node's emphasis flipped.
    EmphasisChanged(NodeId, bool),
    /// A link element was added.
    LinkAdded(LinkEntity),
    /// A link element was removed.
    LinkRemoved(LinkEntity),
    /// An indicator was shown.
    IndicatorShown(Indicator),
    /// An indicator was hidden.
    IndicatorHidden(Indicator),
}

/// In-memory canvas recording element state and a lifecycle journal.
#[derive(Debug, Default)]
pub struct MemoryCanvas {
    nodes: FxHashMap<NodeId, NodeVisual>,
    links: FxHashMap<LinkEntity, LinkVisual>,
    indicators: FxHashMap<Indicator, Vec2>,
    journal: Vec<CanvasAction>,
}

impl MemoryCanvas {
    /// Empty canvas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Visual state of a node element.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&NodeVisual> {
        self.nodes.get(&id)
    }

    /// Visual state of a link element.
    #[must_use]
    pub fn link(&self, link: &LinkEntity) -> Option<&LinkVisual> {
        self.links.get(link)
    }

    /// Number of node elements.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of link elements.
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// All link keys currently on the canvas.
    pub fn link_keys(&self) -> impl Iterator<Item = &LinkEntity> {
        self.links.keys()
    }

    /// The ordered lifecycle journal.
    #[must_use]
    pub fn journal(&self) -> &[CanvasAction] {
        &self.journal
    }

    /// Ids of nodes whose emphasis is currently on.
    #[must_use]
    pub fn emphasized_nodes(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, v)| v.emphasized)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }
}

impl Canvas for MemoryCanvas {
    fn upsert_node(&mut self, node: &NodeEntity, at: Vec2, opacity: f32) {
        if self.nodes.insert(
            node.id,
            NodeVisual {
                value: node.value.clone(),
                position: at,
                opacity,
                emphasized: false,
            },
        )
        .is_none()
        {
            self.journal.push(CanvasAction::NodeAdded(node.id));
        }
    }

    fn remove_node(&mut self, id: NodeId) {
        if self.nodes.remove(&id).is_some() {
            self.journal.push(CanvasAction::NodeRemoved(id));
        }
    }

    fn has_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    fn set_node_position(
        &mut self,
        id: NodeId,
        at: Vec2,
    ) -> Result<(), StageError> {
        let node =
            self.nodes.get_mut(&id).ok_or(StageError::MissingNode(id))?;
        node.position = at;
        Ok(())
    }

    fn set_node_opacity(
        &mut self,
        id: NodeId,
        alpha: f32,
    ) -> Result<(), StageError> {
        let node =
            self.nodes.get_mut(&id).ok_or(StageError::MissingNode(id))?;
        node.opacity = alpha;
        Ok(())
    }

    fn set_node_emphasis(
        &mut self,
        id: NodeId,
        on: bool,
    ) -> Result<(), StageError> {
        let node =
            self.nodes.get_mut(&id).ok_or(StageError::MissingNode(id))?;
        if node.emphasized != on {
            node.emphasized = on;
            self.journal.push(CanvasAction::EmphasisChanged(id, on));
        }
        Ok(())
    }

    fn upsert_link(
        &mut self,
        link: LinkEntity,
        path: &PathDescriptor,
        opacity: f32,
    ) {
        if self
            .links
            .insert(link, LinkVisual { path: path.clone(), opacity })
            .is_none()
        {
            self.journal.push(CanvasAction::LinkAdded(link));
        }
    }

    fn remove_link(&mut self, link: &LinkEntity) {
        if self.links.remove(link).is_some() {
            self.journal.push(CanvasAction::LinkRemoved(*link));
        }
    }

    fn set_link_path(
        &mut self,
        link: &LinkEntity,
        path: &PathDescriptor,
    ) -> Result<(), StageError> {
        let visual = self
            .links
            .get_mut(link)
            .ok_or(StageError::MissingLink(*link))?;
        visual.path = path.clone();
        Ok(())
    }

    fn set_link_opacity(
        &mut self,
        link: &LinkEntity,
        alpha: f32,
    ) -> Result<(), StageError> {
        let visual = self
            .links
            .get_mut(link)
            .ok_or(StageError::MissingLink(*link))?;
        visual.opacity = alpha;
        Ok(())
    }

    fn show_indicator(&mut self, which: Indicator, at: Vec2) {
        if self.indicators.insert(which, at).is_none() {
            self.journal.push(CanvasAction::IndicatorShown(which));
        }
    }

    fn hide_indicator(&mut self, which: Indicator) {
        if self.indicators.remove(&which).is_some() {
            self.journal.push(CanvasAction::IndicatorHidden(which));
        }
    }

    fn indicator_position(&self, which: Indicator) -> Option<Vec2> {
        self.indicators.get(&which).copied()
    }

    fn set_indicator_position(
        &mut self,
        which: Indicator,
        at: Vec2,
    ) -> Result<(), StageError> {
        let slot = self
            .indicators
            .get_mut(&which)
            .ok_or(StageError::MissingIndicator(which))?;
        *slot = at;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LinkKind;
    use crate::path::build_path;

    fn node(id: u64) -> NodeEntity {
        NodeEntity::new(NodeId::new(id), format!("n{id}"))
    }

    #[test]
    fn test_node_lifecycle_journal() {
        let mut canvas = MemoryCanvas::new();
        let n = node(1);
        canvas.upsert_node(&n, Vec2::ZERO, 0.0);
        // Re-upserting the same node is an update, not a second add.
        canvas.upsert_node(&n, Vec2::ONE, 1.0);
        canvas.remove_node(n.id);
        canvas.remove_node(n.id);

        assert_eq!(
            canvas.journal(),
            &[
                CanvasAction::NodeAdded(n.id),
                CanvasAction::NodeRemoved(n.id)
            ]
        );
    }

    #[test]
    fn test_missing_node_is_an_error() {
        let mut canvas = MemoryCanvas::new();
        let err = canvas.set_node_opacity(NodeId::new(9), 1.0);
        assert!(matches!(err, Err(StageError::MissingNode(_))));
    }

    #[test]
    fn test_link_state() {
        let mut canvas = MemoryCanvas::new();
        let link = LinkEntity::new(
            NodeId::new(1),
            NodeId::new(2),
            LinkKind::Forward,
        );
        let path = build_path(
            LinkKind::Forward,
            Vec2::ZERO,
            Vec2::new(100.0, 0.0),
            80.0,
            40.0,
        );
        canvas.upsert_link(link, &path, 0.0);
        assert_eq!(canvas.link_count(), 1);

        assert!(canvas.set_link_opacity(&link, 1.0).is_ok());
        assert_eq!(canvas.link(&link).map(|v| v.opacity), Some(1.0));

        canvas.remove_link(&link);
        assert_eq!(canvas.link_count(), 0);
        assert!(matches!(
            canvas.set_link_path(&link, &path),
            Err(StageError::MissingLink(_))
        ));
    }

    #[test]
    fn test_indicator_show_move_hide() {
        let mut canvas = MemoryCanvas::new();
        assert!(canvas.indicator_position(Indicator::Head).is_none());

        canvas.show_indicator(Indicator::Head, Vec2::new(90.0, 188.0));
        assert!(canvas
            .set_indicator_position(Indicator::Head, Vec2::new(170.0, 188.0))
            .is_ok());
        assert_eq!(
            canvas.indicator_position(Indicator::Head),
            Some(Vec2::new(170.0, 188.0))
        );

        canvas.hide_indicator(Indicator::Head);
        assert!(matches!(
            canvas.set_indicator_position(Indicator::Head, Vec2::ZERO),
            Err(StageError::MissingIndicator(_))
        ));
    }

    #[test]
    fn test_emphasis_journal_records_flips_only() {
        let mut canvas = MemoryCanvas::new();
        let n = node(4);
        canvas.upsert_node(&n, Vec2::ZERO, 1.0);
        assert!(canvas.set_node_emphasis(n.id, true).is_ok());
        assert!(canvas.set_node_emphasis(n.id, true).is_ok());
        assert!(canvas.set_node_emphasis(n.id, false).is_ok());

        let flips: Vec<_> = canvas
            .journal()
            .iter()
            .filter(|a| matches!(a, CanvasAction::EmphasisChanged(..)))
            .collect();
        assert_eq!(flips.len(), 2);
        assert_eq!(canvas.emphasized_nodes(), Vec::<NodeId>::new());
    }
}
