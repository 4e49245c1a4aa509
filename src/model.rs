//! Entities shared between the logical layer, the layout, and the canvas.
//!
//! Node snapshots are owned by the surrounding state layer and treated
//! read-only here. Link sets are never independently maintained state:
//! [`derive_links`] is the sole producer, so the live link set is always
//! re-derivable from the ordered node collection and the topology.

use std::fmt;

/// Stable opaque token identifying a node for its visual lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Wrap a raw id supplied by the logical layer.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One element of a structure snapshot: id plus display value.
///
/// Neighbor structure is implied by snapshot order and topology, not
/// stored per node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeEntity {
    /// Stable visual identity of the node.
    pub id: NodeId,
    /// Display value rendered inside the node box.
    pub value: String,
}

impl NodeEntity {
    /// Create a snapshot element.
    pub fn new(id: NodeId, value: impl Into<String>) -> Self {
        Self { id, value: value.into() }
    }
}

/// Connection kind of a link between two node boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// Next-pointer between adjacent nodes, drawn trailing edge to
    /// leading edge.
    Forward,
    /// Prev-pointer between the same pair, drawn in the offset channel
    /// below so it never coincides with the forward connector.
    Backward,
    /// Wrap-around next-pointer (tail to head), arced over the row.
    CircularForward,
    /// Wrap-around prev-pointer (head to tail), arced under the row.
    CircularBackward,
}

impl LinkKind {
    /// Short name for logging and error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
            Self::CircularForward => "circular-forward",
            Self::CircularBackward => "circular-backward",
        }
    }
}

/// A visual relation between two nodes.
///
/// Equality on the full `(source, target, kind)` triple is the
/// enter/update/exit matching key across renders; links carry no identity
/// beyond it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkEntity {
    /// Node the connector leaves from.
    pub source: NodeId,
    /// Node the connector points at.
    pub target: NodeId,
    /// Connection kind selecting the path shape.
    pub kind: LinkKind,
}

impl LinkEntity {
    /// Create a link of the given kind.
    #[must_use]
    pub const fn new(source: NodeId, target: NodeId, kind: LinkKind) -> Self {
        Self { source, target, kind }
    }
}

impl fmt::Display for LinkEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{} ({})", self.source, self.target, self.kind.name())
    }
}

/// Head/tail handle markers drawn alongside the row.
///
/// A stack's "top" and a queue's "front" map onto [`Indicator::Head`];
/// a queue's "rear" maps onto [`Indicator::Tail`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indicator {
    /// Head / front / top marker.
    Head,
    /// Tail / rear marker.
    Tail,
}

impl Indicator {
    /// Short name for logging and error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Tail => "tail",
        }
    }
}

/// Structural variant selecting which phase scripts apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    /// Singly linked list.
    SinglyLinked,
    /// Doubly linked list.
    DoublyLinked,
    /// Singly linked circular list.
    SinglyCircular,
    /// Doubly linked circular list.
    DoublyCircular,
    /// FIFO queue rendered as an indicator-centric box row.
    Queue,
    /// Priority queue rendered as an ordered box row.
    PriorityQueue,
    /// Stack rendered as a box row with the top at slot 0.
    Stack,
}

impl Topology {
    /// Short name for logging.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SinglyLinked => "singly-linked",
            Self::DoublyLinked => "doubly-linked",
            Self::SinglyCircular => "singly-circular",
            Self::DoublyCircular => "doubly-circular",
            Self::Queue => "queue",
            Self::PriorityQueue => "priority-queue",
            Self::Stack => "stack",
        }
    }

    /// Whether the topology carries prev-pointers.
    #[must_use]
    pub const fn is_doubly(self) -> bool {
        matches!(self, Self::DoublyLinked | Self::DoublyCircular)
    }

    /// Whether the topology wraps tail back to head.
    #[must_use]
    pub const fn is_circular(self) -> bool {
        matches!(self, Self::SinglyCircular | Self::DoublyCircular)
    }

    /// Whether nodes are joined by drawn connectors. The sequential
    /// topologies (queue, priority queue, stack) render as plain box rows.
    #[must_use]
    pub const fn has_node_links(self) -> bool {
        matches!(
            self,
            Self::SinglyLinked
                | Self::DoublyLinked
                | Self::SinglyCircular
                | Self::DoublyCircular
        )
    }

    /// Which indicators this topology shows.
    #[must_use]
    pub const fn indicators(self) -> &'static [Indicator] {
        match self {
            Self::SinglyLinked | Self::Stack => &[Indicator::Head],
            _ => &[Indicator::Head, Indicator::Tail],
        }
    }

    /// Whether this topology shows a tail indicator.
    #[must_use]
    pub fn has_tail(self) -> bool {
        self.indicators().contains(&Indicator::Tail)
    }
}

/// One structure operation, with its logical arguments pre-validated by
/// the logical layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Insert a node at the head (push for stacks).
    InsertFirst {
        /// The node being inserted.
        node: NodeEntity,
    },
    /// Insert a node at the tail (enqueue for queues).
    InsertLast {
        /// The node being inserted.
        node: NodeEntity,
    },
    /// Insert a node before the element currently at `index`.
    InsertAt {
        /// The node being inserted.
        node: NodeEntity,
        /// Pre-validated insertion index, `0..=len`.
        index: usize,
    },
    /// Delete the head node (dequeue / pop).
    DeleteFirst,
    /// Delete the tail node.
    DeleteLast,
    /// Delete the node at `index`.
    DeleteAt {
        /// Pre-validated index, `0..len`.
        index: usize,
    },
    /// Walk the cursor to the element at `index`.
    Search {
        /// Pre-resolved target index.
        index: usize,
    },
    /// Emphasize the front/top element without mutating.
    Peek,
    /// Remove every element.
    Clear,
}

impl Operation {
    /// The data-free kind of this operation, used in event payloads.
    #[must_use]
    pub const fn kind(&self) -> OperationKind {
        match self {
            Self::InsertFirst { .. } => OperationKind::InsertFirst,
            Self::InsertLast { .. } => OperationKind::InsertLast,
            Self::InsertAt { .. } => OperationKind::InsertAt,
            Self::DeleteFirst => OperationKind::DeleteFirst,
            Self::DeleteLast => OperationKind::DeleteLast,
            Self::DeleteAt { .. } => OperationKind::DeleteAt,
            Self::Search { .. } => OperationKind::Search,
            Self::Peek => OperationKind::Peek,
            Self::Clear => OperationKind::Clear,
        }
    }
}

/// Data-free mirror of [`Operation`] for event payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Insert at head.
    InsertFirst,
    /// Insert at tail.
    InsertLast,
    /// Insert at an index.
    InsertAt,
    /// Delete head.
    DeleteFirst,
    /// Delete tail.
    DeleteLast,
    /// Delete at an index.
    DeleteAt,
    /// Cursor walk to an index.
    Search,
    /// Front/top inspection.
    Peek,
    /// Remove everything.
    Clear,
}

impl OperationKind {
    /// Short name for logging and host display.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::InsertFirst => "insert-first",
            Self::InsertLast => "insert-last",
            Self::InsertAt => "insert-at",
            Self::DeleteFirst => "delete-first",
            Self::DeleteLast => "delete-last",
            Self::DeleteAt => "delete-at",
            Self::Search => "search",
            Self::Peek => "peek",
            Self::Clear => "clear",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Derive the live link set for an ordered node collection.
///
/// This is the only producer of link sets; callers never hand-maintain
/// link identity across operations.
#[must_use]
pub fn derive_links(nodes: &[NodeEntity], topology: Topology) -> Vec<LinkEntity> {
    if !topology.has_node_links() || nodes.is_empty() {
        return Vec::new();
    }

    let mut links = Vec::new();
    for pair in nodes.windows(2) {
        links.push(LinkEntity::new(pair[0].id, pair[1].id, LinkKind::Forward));
        if topology.is_doubly() {
            links.push(LinkEntity::new(
                pair[1].id,
                pair[0].id,
                LinkKind::Backward,
            ));
        }
    }

    if topology.is_circular() {
        // A one-node circular container yields self-loops.
        let first = nodes[0].id;
        let last = nodes[nodes.len() - 1].id;
        links.push(LinkEntity::new(last, first, LinkKind::CircularForward));
        if topology.is_doubly() {
            links.push(LinkEntity::new(
                first,
                last,
                LinkKind::CircularBackward,
            ));
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(n: usize) -> Vec<NodeEntity> {
        (0..n)
            .map(|i| NodeEntity::new(NodeId::new(i as u64), format!("v{i}")))
            .collect()
    }

    #[test]
    fn test_singly_links_are_forward_only() {
        let links = derive_links(&nodes(3), Topology::SinglyLinked);
        assert_eq!(links.len(), 2);
        assert!(links.iter().all(|l| l.kind == LinkKind::Forward));
    }

    #[test]
    fn test_doubly_links_pair_up() {
        let links = derive_links(&nodes(3), Topology::DoublyLinked);
        assert_eq!(links.len(), 4);
        let backward =
            links.iter().filter(|l| l.kind == LinkKind::Backward).count();
        assert_eq!(backward, 2);
    }

    #[test]
    fn test_singly_circular_adds_wrap() {
        let links = derive_links(&nodes(3), Topology::SinglyCircular);
        assert_eq!(links.len(), 3);
        let wrap = links
            .iter()
            .find(|l| l.kind == LinkKind::CircularForward)
            .unwrap();
        assert_eq!(wrap.source, NodeId::new(2));
        assert_eq!(wrap.target, NodeId::new(0));
    }

    #[test]
    fn test_one_node_circular_self_loops() {
        let links = derive_links(&nodes(1), Topology::SinglyCircular);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].source, links[0].target);

        let links = derive_links(&nodes(1), Topology::DoublyCircular);
        assert_eq!(links.len(), 2);
        assert!(links.iter().all(|l| l.source == l.target));
    }

    #[test]
    fn test_sequential_topologies_have_no_links() {
        for t in [Topology::Queue, Topology::PriorityQueue, Topology::Stack] {
            assert!(derive_links(&nodes(4), t).is_empty());
        }
    }

    #[test]
    fn test_empty_collection_has_no_links() {
        assert!(derive_links(&[], Topology::DoublyCircular).is_empty());
    }

    #[test]
    fn test_indicator_sets() {
        assert_eq!(Topology::SinglyLinked.indicators(), &[Indicator::Head]);
        assert_eq!(Topology::Stack.indicators(), &[Indicator::Head]);
        assert!(Topology::Queue.has_tail());
        assert!(Topology::DoublyCircular.has_tail());
        assert!(!Topology::SinglyLinked.has_tail());
    }

    #[test]
    fn test_operation_kind_names() {
        let op = Operation::InsertAt {
            node: NodeEntity::new(NodeId::new(9), "x"),
            index: 1,
        };
        assert_eq!(op.kind().name(), "insert-at");
        assert_eq!(Operation::Clear.kind().name(), "clear");
    }
}
