// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Design persistence.
//!
//! A design is saved as its inputs (perimeter, tier, axes in insertion order,
//! overrides, walls, dimensions, config); the lattice is never stored and is
//! regenerated on load. Slot map keys are mapped to sequential integer ids.
//! [`Design::to_key_values`] splits the snapshot into one JSON fragment per
//! concern for flat key-value stores such as browser local storage.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::axis::{Axis, Perimeter};
use crate::config::LayoutConfig;
use crate::design::{Design, Dimension};
use crate::error::{Error, Result};
use crate::footprint::NodeOrientation;
use crate::keys::NodeId;
use crate::tier::Tier;
use crate::wall::WallSegment;

pub const KEY_CONFIG: &str = "config";
pub const KEY_PERIMETER: &str = "perimeter";
pub const KEY_TIER: &str = "tier";
pub const KEY_AXES: &str = "axes";
pub const KEY_OVERRIDES: &str = "overrides";
pub const KEY_WALLS: &str = "walls";
pub const KEY_DIMENSIONS: &str = "dimensions";

/// Serializable representation of a design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignSnapshot {
    #[serde(default)]
    pub config: LayoutConfig,
    pub perimeter: Perimeter,
    pub tier: Tier,
    #[serde(default)]
    pub axes: Vec<Axis>,
    #[serde(default)]
    pub overrides: Vec<OverrideSnapshot>,
    #[serde(default)]
    pub walls: Vec<WallSnapshot>,
    #[serde(default)]
    pub dimensions: Vec<DimensionSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideSnapshot {
    pub node: NodeId,
    pub orientation: NodeOrientation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallSnapshot {
    pub id: usize,
    #[serde(flatten)]
    pub wall: WallSegment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionSnapshot {
    pub id: usize,
    #[serde(flatten)]
    pub dimension: Dimension,
}

impl Design {
    /// Creates a serializable snapshot of the design.
    pub fn to_snapshot(&self) -> DesignSnapshot {
        let mut overrides: Vec<OverrideSnapshot> = self
            .overrides()
            .iter()
            .map(|(&node, &orientation)| OverrideSnapshot { node, orientation })
            .collect();
        overrides.sort_by_key(|o| (o.node.y, o.node.x));

        let walls = self
            .walls()
            .enumerate()
            .map(|(id, (_, wall))| WallSnapshot {
                id,
                wall: wall.clone(),
            })
            .collect();

        let dimensions = self
            .dimensions()
            .enumerate()
            .map(|(id, (_, dimension))| DimensionSnapshot {
                id,
                dimension: *dimension,
            })
            .collect();

        DesignSnapshot {
            config: self.config().clone(),
            perimeter: *self.perimeter(),
            tier: self.tier(),
            axes: self.axes().as_slice().to_vec(),
            overrides,
            walls,
            dimensions,
        }
    }

    /// Rebuilds a design from a snapshot.
    ///
    /// Axes go through the same boundary checks as interactive edits.
    /// Overrides that no longer match a node or the tier are dropped with a
    /// warning. Walls must still satisfy opening conservation; walls whose
    /// geometry disagrees with the restored lattice are kept but reported by
    /// [`Design::detached_walls`], as they would be after a live edit.
    pub fn from_snapshot(snapshot: DesignSnapshot) -> Result<Self> {
        let mut design = Design::new(snapshot.perimeter, snapshot.tier, snapshot.config)?;

        let overrides: FxHashMap<NodeId, NodeOrientation> = snapshot
            .overrides
            .into_iter()
            .map(|o| (o.node, o.orientation))
            .collect();
        design.restore(&snapshot.axes, overrides)?;

        for WallSnapshot { wall, .. } in snapshot.walls {
            design.insert_wall(wall)?;
        }
        for DimensionSnapshot { dimension, .. } in snapshot.dimensions {
            design.insert_dimension(dimension);
        }

        let detached = design.detached_walls().len();
        if detached > 0 {
            tracing::warn!(detached, "restored walls that do not fit the lattice");
        }
        Ok(design)
    }

    /// Serializes the design to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_snapshot())?)
    }

    /// Restores a design from a JSON string produced by [`Design::to_json`].
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: DesignSnapshot = serde_json::from_str(json)?;
        Self::from_snapshot(snapshot)
    }

    /// Splits the snapshot into one JSON value per concern.
    pub fn to_key_values(&self) -> Result<BTreeMap<String, String>> {
        let snapshot = self.to_snapshot();
        let mut map = BTreeMap::new();
        map.insert(KEY_CONFIG.to_string(), serde_json::to_string(&snapshot.config)?);
        map.insert(KEY_PERIMETER.to_string(), serde_json::to_string(&snapshot.perimeter)?);
        map.insert(KEY_TIER.to_string(), serde_json::to_string(&snapshot.tier)?);
        map.insert(KEY_AXES.to_string(), serde_json::to_string(&snapshot.axes)?);
        map.insert(KEY_OVERRIDES.to_string(), serde_json::to_string(&snapshot.overrides)?);
        map.insert(KEY_WALLS.to_string(), serde_json::to_string(&snapshot.walls)?);
        map.insert(KEY_DIMENSIONS.to_string(), serde_json::to_string(&snapshot.dimensions)?);
        Ok(map)
    }

    /// Restores a design from [`Design::to_key_values`] output.
    ///
    /// Perimeter and tier are required; every other key is optional.
    pub fn from_key_values(map: &BTreeMap<String, String>) -> Result<Self> {
        let snapshot = DesignSnapshot {
            config: field(map, KEY_CONFIG)?.unwrap_or_default(),
            perimeter: required(map, KEY_PERIMETER)?,
            tier: required(map, KEY_TIER)?,
            axes: field(map, KEY_AXES)?.unwrap_or_default(),
            overrides: field(map, KEY_OVERRIDES)?.unwrap_or_default(),
            walls: field(map, KEY_WALLS)?.unwrap_or_default(),
            dimensions: field(map, KEY_DIMENSIONS)?.unwrap_or_default(),
        };
        Self::from_snapshot(snapshot)
    }
}

fn field<T: DeserializeOwned>(map: &BTreeMap<String, String>, key: &str) -> Result<Option<T>> {
    map.get(key)
        .map(|value| serde_json::from_str(value))
        .transpose()
        .map_err(|e| Error::Serialization(format!("{key}: {e}")))
}

fn required<T: DeserializeOwned>(map: &BTreeMap<String, String>, key: &str) -> Result<T> {
    field(map, key)?.ok_or_else(|| Error::Serialization(format!("missing key {key:?}")))
}
