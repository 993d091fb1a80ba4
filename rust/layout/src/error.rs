// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error and warning types for layout operations.

use serde::{Deserialize, Serialize};

use crate::axis::Orientation;
use crate::footprint::NodeOrientation;
use crate::keys::NodeId;
use crate::tier::Tier;

/// Result type alias for layout operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while editing or evaluating a design.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The tier identifier is not part of the tier catalog.
    #[error("unknown tier identifier: {0:?}")]
    UnknownTier(String),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The building perimeter has a non-positive or non-finite side.
    #[error("perimeter must be positive, got {width} x {length}")]
    InvalidPerimeter { width: f64, length: f64 },

    /// A secondary axis offset lies outside the open interval `(0, limit)`.
    #[error("{orientation} axis offset {offset} outside (0, {limit})")]
    InvalidAxis {
        orientation: Orientation,
        offset: f64,
        limit: f64,
    },

    /// `undo_axis` was called on an empty axis store.
    #[error("no secondary axis to undo")]
    NoAxisToUndo,

    /// A node id does not exist in the current lattice.
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// A wall was requested between nodes that do not share a row or column.
    #[error("nodes {a} and {b} do not share a row or column")]
    UnalignedNodes { a: NodeId, b: NodeId },

    /// Another lattice node stands between the two wall nodes.
    #[error("nodes {a} and {b} are not adjacent, {between} lies between them")]
    NonAdjacentNodes { a: NodeId, b: NodeId, between: NodeId },

    /// The usable span cannot hold what was requested.
    #[error("insufficient span: {required} cm required, {available} cm available")]
    InsufficientSpan { available: f64, required: f64 },

    /// A lateral displacement was requested for a wall on the perimeter.
    #[error("lateral displacement {displacement} is not allowed on a perimeter wall")]
    UnalignedDisplacement { displacement: f64 },

    /// An opening composition breaks one of the opening rules.
    #[error("invalid opening: {0}")]
    InvalidOpening(String),

    /// Node orientation overrides are only available on the finest tier.
    #[error("tier {0} does not allow node orientation overrides")]
    OrientationUnsupported(Tier),

    /// A wall plan was computed against an older lattice.
    #[error("wall plan computed at revision {planned}, design is at revision {current}")]
    StalePlan { planned: u64, current: u64 },

    /// A wall plan does not match what the current lattice produces for its nodes.
    #[error("wall plan for {a} and {b} does not match the current lattice")]
    PlanMismatch { a: NodeId, b: NodeId },

    /// Wall key not found in the design.
    #[error("wall not found")]
    WallNotFound,

    /// Dimension key not found in the design.
    #[error("dimension not found")]
    DimensionNotFound,

    /// Snapshot encode/decode error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Why an orientation override stopped applying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StaleReason {
    /// The active tier no longer allows overrides.
    TierChanged,
    /// The node the override was keyed to is no longer in the lattice.
    NodeRemoved,
}

/// Non-fatal notice that an orientation override was dropped during regeneration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaleOverride {
    pub node: NodeId,
    pub orientation: NodeOrientation,
    pub reason: StaleReason,
}

impl std::fmt::Display for StaleOverride {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self.reason {
            StaleReason::TierChanged => "tier no longer allows overrides",
            StaleReason::NodeRemoved => "node no longer exists",
        };
        write!(
            f,
            "dropped {} override for node {}: {}",
            self.orientation, self.node, reason
        )
    }
}
