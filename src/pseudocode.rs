//! Pseudocode line tables.
//!
//! The host renders a pseudocode panel per operation; the choreography
//! only knows line numbers. A line table maps the semantic step labels a
//! script uses onto 1-based line indices in the host's panel, so progress
//! events can drive line highlighting without the engine owning any text.

use rustc_hash::FxHashMap;

use crate::sequencer::script::StepLabel;

/// Resolves semantic step labels to 1-based pseudocode line indices.
pub trait LineTable {
    /// Line index for a label, if the panel has one.
    fn line(&self, label: StepLabel) -> Option<u32>;
}

/// Stock [`LineTable`] backed by a hash map.
#[derive(Debug, Clone, Default)]
pub struct LineMap {
    lines: FxHashMap<StepLabel, u32>,
}

impl LineMap {
    /// Empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a label mapping, builder style.
    #[must_use]
    pub fn with(mut self, label: StepLabel, line: u32) -> Self {
        let _ = self.lines.insert(label, line);
        self
    }

    /// Number of mapped labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl LineTable for LineMap {
    fn line(&self, label: StepLabel) -> Option<u32> {
        self.lines.get(&label).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_and_replace() {
        let map = LineMap::new()
            .with(StepLabel::CheckEmpty, 1)
            .with(StepLabel::CreateNode, 2)
            .with(StepLabel::CreateNode, 3);
        assert_eq!(map.line(StepLabel::CheckEmpty), Some(1));
        assert_eq!(map.line(StepLabel::CreateNode), Some(3));
        assert_eq!(map.line(StepLabel::Advance), None);
        assert_eq!(map.len(), 2);
    }
}
