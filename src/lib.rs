//! Persistent map from string keys to values.
//!
//! Every update returns a new version of a map and leaves the old one intact.
//! Versions share all sub-trees that an update does not touch, so only the
//! nodes on the path from a root to a changed entry are copied.
//!
//! Keys are hashed with 64-bit FNV-1a and routed through an 8-way tree by
//! 3-bit digits of their hashes. Sub-trees are reference-counted atomically
//! and can be shared over threads.
//!
//! ```
//! use psmap::Map;
//!
//! let map = Map::new().set("a", 1).set("b", 2);
//! let other = map.delete("a");
//!
//! assert_eq!(map.lookup("a"), Some(&1));
//! assert_eq!(other.lookup("a"), None);
//! assert_eq!(other.len(), 1);
//! ```

mod bucket;
mod hash;
mod key_value;
mod map;
mod tree;

pub use map::{Keys, Map, Values};
pub use tree::TreeIterator as Iter;
