// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Identity types for design entities.
//!
//! Nodes are regenerated from the axis store on every change, so their identity
//! is derived from their rounded plan position rather than from their index in
//! the lattice. Walls and dimension annotations live in slot maps and get
//! generational keys that stay valid when other entries are removed.

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Key for a committed wall segment.
    pub struct WallKey;

    /// Key for a dimension annotation.
    pub struct DimensionKey;
}

/// Stable identity of a lattice node: its plan position rounded to whole centimeters.
///
/// Two lattice points closer than the merge tolerance collapse into one node,
/// and points that survive the merge are at least one unit apart on some axis,
/// so the rounded position is unique within a lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId {
    pub x: i64,
    pub y: i64,
}

impl NodeId {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Derives the id for a plan position.
    pub fn from_position(x: f64, y: f64) -> Self {
        Self {
            x: x.round() as i64,
            y: y.round() as i64,
        }
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_rounds_position() {
        assert_eq!(NodeId::from_position(99.6, 0.4), NodeId::new(100, 0));
        assert_eq!(NodeId::from_position(150.5, 20.0), NodeId::new(151, 20));
    }

    #[test]
    fn node_id_display() {
        assert_eq!(NodeId::new(100, 0).to_string(), "(100, 0)");
    }
}
