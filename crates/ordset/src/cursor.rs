//! Bidirectional in-order traversal over a borrowed tree.

use crate::node::NodeId;
use crate::tree::{Comparator, NaturalOrder, OrdSet};

/// A position inside an [`OrdSet`]: either a real node or the past-the-end
/// sentinel position.
///
/// Cursors are cheap to copy and restartable: any boundary search yields a
/// fresh, independent cursor. Inserting into the set invalidates every
/// previously obtained cursor (the borrow checker enforces this).
pub struct Cursor<'a, K, C: Comparator<K> = NaturalOrder> {
    tree: &'a OrdSet<K, C>,
    node: NodeId,
}

impl<'a, K, C: Comparator<K>> Clone for Cursor<'a, K, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, K, C: Comparator<K>> Copy for Cursor<'a, K, C> {}

impl<'a, K, C: Comparator<K>> PartialEq for Cursor<'a, K, C> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.node == other.node
    }
}

impl<'a, K, C: Comparator<K>> Eq for Cursor<'a, K, C> {}

impl<'a, K, C: Comparator<K>> Cursor<'a, K, C> {
    pub(crate) fn new(tree: &'a OrdSet<K, C>, node: NodeId) -> Self {
        Cursor { tree, node }
    }

    /// Whether this is the past-the-end position.
    pub fn is_end(&self) -> bool {
        self.node.is_nil()
    }

    /// The key under the cursor.
    ///
    /// # Panics
    /// Panics at the end position; a silently returned default would be
    /// indistinguishable from a real key.
    pub fn key(&self) -> &'a K {
        assert!(!self.node.is_nil(), "invalid dereference of the end position");
        self.tree.key(self.node)
    }

    /// Step to the in-order successor. At the end position this is a no-op,
    /// mirroring the sentinel's self-loops.
    pub fn advance(&mut self) {
        if !self.node.is_nil() {
            self.node = self.tree.successor(self.node);
        }
    }

    /// Step to the in-order predecessor. Stays put at the end position.
    pub fn retreat(&mut self) {
        if !self.node.is_nil() {
            self.node = self.tree.predecessor(self.node);
        }
    }
}

impl<'a, K: std::fmt::Debug, C: Comparator<K>> std::fmt::Debug for Cursor<'a, K, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_end() {
            f.write_str("Cursor(end)")
        } else {
            write!(f, "Cursor({:?})", self.key())
        }
    }
}

/// Ascending iterator over a set's keys, driven by a [`Cursor`].
pub struct Iter<'a, K, C: Comparator<K> = NaturalOrder> {
    cursor: Cursor<'a, K, C>,
}

impl<'a, K, C: Comparator<K>> Iter<'a, K, C> {
    pub(crate) fn new(cursor: Cursor<'a, K, C>) -> Self {
        Iter { cursor }
    }
}

impl<'a, K, C: Comparator<K>> Iterator for Iter<'a, K, C> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        if self.cursor.is_end() {
            return None;
        }
        let key = self.cursor.key();
        self.cursor.advance();
        Some(key)
    }
}
