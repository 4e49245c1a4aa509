//! Mutable map of node id to 2D coordinate.
//!
//! The store is passed by shared handle through every phase of a run so
//! concurrent sub-animations observe each other's latest writes immediately;
//! there is no copy-on-write or snapshotting. Lifecycle correctness (one
//! position per live node, removed only after the exit phase resolves) is
//! the caller's responsibility — the store itself validates nothing.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use rustc_hash::FxHashMap;

use crate::model::NodeId;

/// Shared per-canvas handle to the position store.
pub type SharedPositions = Rc<RefCell<PositionStore>>;

/// Sole source of truth for current node layout.
#[derive(Debug, Default)]
pub struct PositionStore {
    positions: FxHashMap<NodeId, Vec2>,
}

impl PositionStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty store wrapped in a shared handle.
    #[must_use]
    pub fn shared() -> SharedPositions {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Current position of a node, if one is stored.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<Vec2> {
        self.positions.get(&id).copied()
    }

    /// Assign (or overwrite) a node's position.
    pub fn set(&mut self, id: NodeId, at: Vec2) {
        let _ = self.positions.insert(id, at);
    }

    /// Remove a node's position. Returns whether an entry existed.
    pub fn delete(&mut self, id: NodeId) -> bool {
        self.positions.remove(&id).is_some()
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.positions.clear();
    }

    /// Number of stored positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Whether a node has a stored position.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.positions.contains_key(&id)
    }
}
