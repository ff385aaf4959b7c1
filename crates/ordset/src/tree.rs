//! The balanced-tree engine: descent, link-in, color fixup, rotations, and
//! boundary search.

use std::cmp::Ordering;

use crate::cursor::{Cursor, Iter};
use crate::node::{Color, Node, NodeId};

/// A caller-supplied total order over keys.
pub trait Comparator<K> {
    fn cmp(&self, a: &K, b: &K) -> Ordering;
}

/// The default comparator: the key type's own `Ord`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NaturalOrder;

impl<K: Ord> Comparator<K> for NaturalOrder {
    fn cmp(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// An ordered set of distinct keys backed by a red-black tree.
///
/// Nodes live in a flat arena (`Vec`) owned by the set; slot 0 is the shared
/// black sentinel and every "absent" link points at it. Nodes are created by
/// insertion and only released when the whole set is dropped; removal of
/// individual keys is not supported.
///
/// # Examples
/// ```
/// let mut s = ordset::OrdSet::new();
/// assert!(s.insert(5));
/// assert!(s.insert(3));
/// assert!(!s.insert(5)); // duplicate: no-op
/// assert_eq!(s.iter().copied().collect::<Vec<_>>(), vec![3, 5]);
/// assert_eq!(s.range_query(&0, &10), 2);
/// ```
#[derive(Debug, Clone)]
pub struct OrdSet<K, C: Comparator<K> = NaturalOrder> {
    /// Slot 0 is the sentinel; real nodes are never removed.
    nodes: Vec<Node<K>>,
    root: NodeId,
    /// Cached handle of the minimum node, maintained on insert.
    begin: NodeId,
    comp: C,
}

impl<K: Ord> OrdSet<K> {
    /// Construct an empty set ordered by `K`'s natural order.
    pub fn new() -> Self {
        OrdSet::with_comparator(NaturalOrder)
    }
}

impl<K, C: Comparator<K> + Default> Default for OrdSet<K, C> {
    fn default() -> Self {
        OrdSet::with_comparator(C::default())
    }
}

impl<K, C: Comparator<K>> OrdSet<K, C> {
    /// Construct an empty set ordered by the given comparator.
    pub fn with_comparator(comp: C) -> Self {
        OrdSet {
            nodes: vec![Node::sentinel()],
            root: NodeId::NIL,
            begin: NodeId::NIL,
            comp,
        }
    }

    /// Number of keys in the set.
    pub fn len(&self) -> usize {
        // The arena only ever grows, one slot per inserted key.
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_nil()
    }

    pub fn comparator(&self) -> &C {
        &self.comp
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node<K> {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<K> {
        &mut self.nodes[id.index()]
    }

    /// Key of a real node. Panics on the sentinel.
    pub(crate) fn key(&self, id: NodeId) -> &K {
        self.node(id)
            .key
            .as_ref()
            .expect("invalid dereference of the end position")
    }

    pub(crate) fn root_id(&self) -> NodeId {
        self.root
    }

    fn less(&self, a: &K, b: &K) -> bool {
        self.comp.cmp(a, b) == Ordering::Less
    }

    /// Insert `key`, returning `true` if it was absent and `false` (with the
    /// tree untouched and nothing allocated) if it was already present.
    pub fn insert(&mut self, key: K) -> bool {
        let mut parent = NodeId::NIL;
        let mut current = self.root;
        let mut went_left = false;
        while !current.is_nil() {
            parent = current;
            if self.less(&key, self.key(current)) {
                current = self.node(current).left;
                went_left = true;
            } else if self.less(self.key(current), &key) {
                current = self.node(current).right;
                went_left = false;
            } else {
                return false;
            }
        }

        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node::new_leaf(key, parent));

        if parent.is_nil() {
            self.root = id;
        } else if went_left {
            self.node_mut(parent).left = id;
        } else {
            self.node_mut(parent).right = id;
        }

        self.fix_insert(id);

        // Evaluated after the structural insert, with the same comparator.
        if self.begin.is_nil() || self.less(self.key(id), self.key(self.begin)) {
            self.begin = id;
        }
        true
    }

    pub fn contains(&self, key: &K) -> bool {
        let mut current = self.root;
        while !current.is_nil() {
            current = match self.comp.cmp(key, self.key(current)) {
                Ordering::Less => self.node(current).left,
                Ordering::Greater => self.node(current).right,
                Ordering::Equal => return true,
            };
        }
        false
    }

    /// The minimum key, read from the `begin` cache.
    pub fn min(&self) -> Option<&K> {
        if self.begin.is_nil() {
            None
        } else {
            Some(self.key(self.begin))
        }
    }

    /// Restore the red-black invariants after linking in a fresh red node.
    ///
    /// Walks upward while the parent is red. A red uncle means recolor and
    /// push the violation to the grandparent; a black uncle is terminal:
    /// rotate an inner child outward first, then recolor and rotate at the
    /// grandparent. The root is blackened unconditionally afterwards.
    fn fix_insert(&mut self, mut node: NodeId) {
        while self.node(self.node(node).parent).is_red() {
            let parent = self.node(node).parent;
            // The parent is red, hence not the root, hence this is real.
            let grandparent = self.node(parent).parent;

            if parent == self.node(grandparent).left {
                let uncle = self.node(grandparent).right;
                if self.node(uncle).is_red() {
                    self.node_mut(parent).color = Color::Black;
                    self.node_mut(uncle).color = Color::Black;
                    self.node_mut(grandparent).color = Color::Red;
                    node = grandparent;
                } else {
                    if node == self.node(parent).right {
                        node = parent;
                        self.rotate_left(node);
                    }
                    let parent = self.node(node).parent;
                    let grandparent = self.node(parent).parent;
                    self.node_mut(parent).color = Color::Black;
                    self.node_mut(grandparent).color = Color::Red;
                    self.rotate_right(grandparent);
                }
            } else {
                let uncle = self.node(grandparent).left;
                if self.node(uncle).is_red() {
                    self.node_mut(parent).color = Color::Black;
                    self.node_mut(uncle).color = Color::Black;
                    self.node_mut(grandparent).color = Color::Red;
                    node = grandparent;
                } else {
                    if node == self.node(parent).left {
                        node = parent;
                        self.rotate_right(node);
                    }
                    let parent = self.node(node).parent;
                    let grandparent = self.node(parent).parent;
                    self.node_mut(parent).color = Color::Black;
                    self.node_mut(grandparent).color = Color::Red;
                    self.rotate_left(grandparent);
                }
            }
        }

        let root = self.root;
        if !root.is_nil() {
            self.node_mut(root).color = Color::Black;
        }
    }

    /// Rotate `x`'s right child into `x`'s position. Only links move, so the
    /// in-order key sequence is preserved by construction.
    fn rotate_left(&mut self, x: NodeId) {
        let y = self.node(x).right;
        debug_assert!(!y.is_nil(), "rotation requires a real child");

        let y_left = self.node(y).left;
        self.node_mut(x).right = y_left;
        if !y_left.is_nil() {
            self.node_mut(y_left).parent = x;
        }

        let x_parent = self.node(x).parent;
        self.node_mut(y).parent = x_parent;
        if x_parent.is_nil() {
            self.root = y;
        } else if x == self.node(x_parent).left {
            self.node_mut(x_parent).left = y;
        } else {
            self.node_mut(x_parent).right = y;
        }

        self.node_mut(y).left = x;
        self.node_mut(x).parent = y;
    }

    /// Mirror image of [`rotate_left`](Self::rotate_left).
    fn rotate_right(&mut self, x: NodeId) {
        let y = self.node(x).left;
        debug_assert!(!y.is_nil(), "rotation requires a real child");

        let y_right = self.node(y).right;
        self.node_mut(x).left = y_right;
        if !y_right.is_nil() {
            self.node_mut(y_right).parent = x;
        }

        let x_parent = self.node(x).parent;
        self.node_mut(y).parent = x_parent;
        if x_parent.is_nil() {
            self.root = y;
        } else if x == self.node(x_parent).right {
            self.node_mut(x_parent).right = y;
        } else {
            self.node_mut(x_parent).left = y;
        }

        self.node_mut(y).right = x;
        self.node_mut(x).parent = y;
    }

    /// Cursor at the leftmost node whose key is not less than `key`, or
    /// [`end`](Self::end) if every key compares less.
    pub fn lower_bound(&self, key: &K) -> Cursor<'_, K, C> {
        let mut candidate = NodeId::NIL;
        let mut current = self.root;
        while !current.is_nil() {
            if self.less(self.key(current), key) {
                current = self.node(current).right;
            } else {
                candidate = current;
                current = self.node(current).left;
            }
        }
        Cursor::new(self, candidate)
    }

    /// Cursor at the leftmost node whose key is strictly greater than `key`,
    /// or [`end`](Self::end) if none is.
    pub fn upper_bound(&self, key: &K) -> Cursor<'_, K, C> {
        let mut candidate = NodeId::NIL;
        let mut current = self.root;
        while !current.is_nil() {
            if self.less(key, self.key(current)) {
                candidate = current;
                current = self.node(current).left;
            } else {
                current = self.node(current).right;
            }
        }
        Cursor::new(self, candidate)
    }

    /// Cursor at the minimum key; equals [`end`](Self::end) when empty.
    pub fn begin(&self) -> Cursor<'_, K, C> {
        Cursor::new(self, self.begin)
    }

    /// The past-the-end cursor.
    pub fn end(&self) -> Cursor<'_, K, C> {
        Cursor::new(self, NodeId::NIL)
    }

    /// Count the keys in the closed interval `[lo, hi]`.
    ///
    /// By convention the bounds must satisfy `lo < hi` under the comparator;
    /// anything else, including `lo == hi`, counts as an empty range and
    /// yields `0`. A caller that wants a single-point membership count must
    /// special-case it with [`contains`](Self::contains).
    pub fn range_query(&self, lo: &K, hi: &K) -> usize {
        if self.comp.cmp(lo, hi) != Ordering::Less {
            return 0;
        }
        let mut start = self.lower_bound(lo);
        let finish = self.upper_bound(hi);
        let mut count = 0;
        while start != finish {
            count += 1;
            start.advance();
        }
        count
    }

    /// Iterate the keys in ascending comparator order.
    pub fn iter(&self) -> Iter<'_, K, C> {
        Iter::new(self.begin())
    }

    /// In-order successor; the sentinel means "past the maximum".
    pub(crate) fn successor(&self, mut node: NodeId) -> NodeId {
        if !self.node(node).right.is_nil() {
            node = self.node(node).right;
            while !self.node(node).left.is_nil() {
                node = self.node(node).left;
            }
            node
        } else {
            let mut parent = self.node(node).parent;
            while !parent.is_nil() && self.node(parent).right == node {
                node = parent;
                parent = self.node(node).parent;
            }
            parent
        }
    }

    /// In-order predecessor, the mirror of [`successor`](Self::successor).
    pub(crate) fn predecessor(&self, mut node: NodeId) -> NodeId {
        if !self.node(node).left.is_nil() {
            node = self.node(node).left;
            while !self.node(node).right.is_nil() {
                node = self.node(node).right;
            }
            node
        } else {
            let mut parent = self.node(node).parent;
            while !parent.is_nil() && self.node(parent).left == node {
                node = parent;
                parent = self.node(node).parent;
            }
            parent
        }
    }
}

impl<'a, K, C: Comparator<K>> IntoIterator for &'a OrdSet<K, C> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Walks the whole structure checking every red-black invariant: link
    /// symmetry, BST order, no red-red edge, black-height uniformity, root
    /// and sentinel black, and the begin cache. Returns nothing useful;
    /// panics on the first violation.
    pub(crate) fn check_invariants<K: Ord + std::fmt::Debug>(set: &OrdSet<K>) {
        let nil = set.node(NodeId::NIL);
        assert!(nil.is_black(), "sentinel must stay black");
        assert!(nil.parent.is_nil() && nil.left.is_nil() && nil.right.is_nil());

        if set.root_id().is_nil() {
            assert!(set.begin.is_nil());
            return;
        }
        assert!(set.node(set.root_id()).is_black(), "root must be black");
        assert!(set.node(set.root_id()).parent.is_nil());

        check_subtree(set, set.root_id());

        // In-order traversal is strictly ascending.
        let keys: Vec<&K> = set.iter().collect();
        assert!(keys.windows(2).all(|w| w[0] < w[1]), "BST order violated");

        // Begin cache points at the minimum.
        assert_eq!(set.min(), keys.first().copied());
    }

    /// Returns the black-height of the subtree, asserting it is uniform.
    fn check_subtree<K: Ord>(set: &OrdSet<K>, id: NodeId) -> usize {
        if id.is_nil() {
            return 1;
        }
        let node = set.node(id);
        if node.is_red() {
            assert!(
                set.node(node.left).is_black() && set.node(node.right).is_black(),
                "red node with red child"
            );
        }
        if !node.left.is_nil() {
            assert_eq!(set.node(node.left).parent, id, "broken parent link");
            assert!(set.key(node.left) < set.key(id));
        }
        if !node.right.is_nil() {
            assert_eq!(set.node(node.right).parent, id, "broken parent link");
            assert!(set.key(id) < set.key(node.right));
        }
        let left = check_subtree(set, node.left);
        let right = check_subtree(set, node.right);
        assert_eq!(left, right, "black-height mismatch");
        left + if node.is_black() { 1 } else { 0 }
    }

    #[test]
    fn empty_set() {
        let set = OrdSet::<i32>::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert_eq!(set.min(), None);
        assert!(set.begin() == set.end());
        check_invariants(&set);
    }

    #[test]
    fn insert_keeps_invariants_ascending() {
        let mut set = OrdSet::new();
        for i in 0..256 {
            assert!(set.insert(i));
            check_invariants(&set);
        }
        assert_eq!(set.len(), 256);
    }

    #[test]
    fn insert_keeps_invariants_descending() {
        let mut set = OrdSet::new();
        for i in (0..256).rev() {
            assert!(set.insert(i));
            check_invariants(&set);
        }
        assert_eq!(set.min(), Some(&0));
    }

    #[test]
    fn duplicate_insert_is_a_noop() {
        let mut set = OrdSet::new();
        for &k in &[5, 1, 9, 3] {
            assert!(set.insert(k));
        }
        let before: Vec<i32> = set.iter().copied().collect();
        let len = set.len();
        for &k in &[5, 1, 9, 3] {
            assert!(!set.insert(k));
        }
        assert_eq!(set.len(), len);
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), before);
        check_invariants(&set);
    }

    #[test]
    fn contains_after_inserts() {
        let mut set = OrdSet::new();
        for k in [4, 8, 15, 16, 23, 42] {
            set.insert(k);
        }
        for k in [4, 8, 15, 16, 23, 42] {
            assert!(set.contains(&k));
        }
        for k in [0, 5, 17, 100] {
            assert!(!set.contains(&k));
        }
    }

    #[test]
    fn custom_comparator_reverses_order() {
        #[derive(Default)]
        struct Reverse;
        impl Comparator<i32> for Reverse {
            fn cmp(&self, a: &i32, b: &i32) -> Ordering {
                b.cmp(a)
            }
        }

        let mut set = OrdSet::with_comparator(Reverse);
        for k in [1, 5, 3, 2, 4] {
            assert!(set.insert(k));
        }
        let keys: Vec<i32> = set.iter().copied().collect();
        assert_eq!(keys, vec![5, 4, 3, 2, 1]);
        // Minimum under the reversed order is the largest integer.
        assert_eq!(set.min(), Some(&5));
        // Bounds follow the comparator, not the natural order.
        assert_eq!(*set.lower_bound(&4).key(), 4);
        assert_eq!(*set.upper_bound(&4).key(), 3);
    }

    #[test]
    fn range_query_counts_closed_interval() {
        let mut set = OrdSet::new();
        for k in [10, 20, 30, 40, 50] {
            set.insert(k);
        }
        assert_eq!(set.range_query(&10, &50), 5);
        assert_eq!(set.range_query(&11, &49), 3);
        assert_eq!(set.range_query(&15, &35), 2);
        assert_eq!(set.range_query(&51, &100), 0);
        // Empty-by-convention ranges.
        assert_eq!(set.range_query(&20, &20), 0);
        assert_eq!(set.range_query(&30, &10), 0);
    }

    #[test]
    fn fuzz_against_btreeset() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};
        use std::collections::BTreeSet;

        let mut rng = StdRng::seed_from_u64(0x0DD5E7);
        let mut set = OrdSet::new();
        let mut reference = BTreeSet::new();

        for round in 0..2000 {
            let key = rng.gen_range(0..500i64);
            assert_eq!(set.insert(key), reference.insert(key));
            if round % 64 == 0 {
                check_invariants(&set);
            }

            let a = rng.gen_range(0..500i64);
            let b = rng.gen_range(0..500i64);
            let expected = if a < b {
                reference.range(a..=b).count()
            } else {
                0
            };
            assert_eq!(set.range_query(&a, &b), expected);
        }

        check_invariants(&set);
        assert_eq!(
            set.iter().copied().collect::<Vec<_>>(),
            reference.iter().copied().collect::<Vec<_>>()
        );
    }
}
