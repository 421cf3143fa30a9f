//! Dense, typed identifiers for graph nodes and edges.
//!
//! Ids are assigned by `RoadGraphBuilder` in insertion order (nodes) and in
//! CSR order (edges), so the inner integer doubles as a `Vec` index.  The
//! upstream identifier a node was acquired with (an OSM id) is kept
//! separately on the graph.

use std::fmt;

/// Generate a typed id wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel for "no id", e.g. the predecessor edge of a search root.
            pub const INVALID: $name = $name(<$inner>::MAX);

            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a street-network node.
    pub struct NodeId(u32);
}

typed_id! {
    /// Index of a directed street-network edge.  Two parallel edges between
    /// the same ordered node pair have distinct `EdgeId`s.
    pub struct EdgeId(u32);
}
