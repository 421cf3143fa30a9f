//! Cache key for one loaded graph.

use std::fmt;

use pf_core::NetworkType;

/// Identifies one graph: a place and the network type acquired for it.
///
/// Renders as `"{place_prefix}_{network}"`, e.g. `marica_drive`; the CSV
/// store uses that form as the graph's directory name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphKey {
    pub place_prefix: String,
    pub network:      NetworkType,
}

impl GraphKey {
    pub fn new(place_prefix: impl Into<String>, network: NetworkType) -> Self {
        Self { place_prefix: place_prefix.into(), network }
    }

    /// `true` if the prefix is non-empty and safe to use as a path
    /// component.
    pub fn is_path_safe(&self) -> bool {
        let p = self.place_prefix.as_str();
        !p.is_empty()
            && p != "."
            && p != ".."
            && !p.contains(['/', '\\'])
    }
}

impl fmt::Display for GraphKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.place_prefix, self.network)
    }
}
