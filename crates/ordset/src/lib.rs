//! An ordered-key set backed by a [red-black tree].
//!
//! Keys live in a flat node arena owned by the set; parent/child links are
//! plain arena indices, with slot 0 reserved for the shared black sentinel.
//! On top of the balanced tree the crate offers cursor-based bidirectional
//! in-order traversal, `lower_bound`/`upper_bound` boundary search, and
//! closed-interval key counting.
//!
//! [red-black tree]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
#![forbid(unsafe_code)]

mod cursor;
mod dot;
mod node;
mod tree;

pub use cursor::{Cursor, Iter};
pub use dot::write_dot;
pub use tree::{Comparator, NaturalOrder, OrdSet};
