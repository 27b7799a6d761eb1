//! Vertex and half-edge identifiers of the walk network.
//!
//! Both are dense `u32` indices into the network's CSR arrays.

use std::fmt;

macro_rules! graph_index {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub u32);

        impl $name {
            /// Marks an unreached slot in per-node predecessor tables.
            pub const INVALID: $name = $name(u32::MAX);

            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.0)
            }
        }
    };
}

graph_index! {
    /// Walk-network vertex.  Assigned in the order coordinates are first seen
    /// while loading, which also fixes snapping tie-breaks.
    NodeId
}

graph_index! {
    /// Directed half-edge.  Every undirected segment owns two; half-edges
    /// are grouped by source vertex.
    EdgeId
}
