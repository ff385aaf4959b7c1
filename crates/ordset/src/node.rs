//! Node storage for the tree: the color tag, the arena handle, and the
//! node record itself.

/// Color tag carried by every node. A plain field, not a polymorphic type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// A stable handle into the tree's node arena.
///
/// Links between nodes are handles rather than owning pointers, so the
/// parent back-links and the sentinel's self-loops carry no ownership.
/// Slot 0 is the sentinel by convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeId(u32);

impl NodeId {
    /// The sentinel slot: always black, all three links point to itself,
    /// holds no key. Stands in for "no child" / "no parent" everywhere.
    pub(crate) const NIL: NodeId = NodeId(0);

    pub(crate) fn new(index: usize) -> NodeId {
        NodeId(index as u32)
    }

    pub(crate) fn is_nil(self) -> bool {
        self == NodeId::NIL
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node<K> {
    /// `None` only in the sentinel slot.
    pub(crate) key: Option<K>,
    pub(crate) parent: NodeId,
    pub(crate) left: NodeId,
    pub(crate) right: NodeId,
    pub(crate) color: Color,
}

impl<K> Node<K> {
    pub(crate) fn sentinel() -> Node<K> {
        Node {
            key: None,
            parent: NodeId::NIL,
            left: NodeId::NIL,
            right: NodeId::NIL,
            color: Color::Black,
        }
    }

    /// A freshly inserted node: red at birth, both children the sentinel.
    pub(crate) fn new_leaf(key: K, parent: NodeId) -> Node<K> {
        Node {
            key: Some(key),
            parent,
            left: NodeId::NIL,
            right: NodeId::NIL,
            color: Color::Red,
        }
    }

    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    pub(crate) fn is_black(&self) -> bool {
        self.color == Color::Black
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_leaf_is_red_with_nil_children() {
        let node = Node::new_leaf(42, NodeId::NIL);
        assert!(node.is_red());
        assert!(!node.is_black());
        assert_eq!(node.key, Some(42));
        assert!(node.left.is_nil());
        assert!(node.right.is_nil());
    }

    #[test]
    fn sentinel_is_black_and_self_linked() {
        let nil = Node::<i32>::sentinel();
        assert!(nil.is_black());
        assert!(nil.key.is_none());
        assert_eq!(nil.parent, NodeId::NIL);
        assert_eq!(nil.left, NodeId::NIL);
        assert_eq!(nil.right, NodeId::NIL);
    }

    #[test]
    fn nil_handle_identity() {
        assert!(NodeId::NIL.is_nil());
        assert_eq!(NodeId::NIL.index(), 0);
        assert!(!NodeId::new(1).is_nil());
    }
}
