// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-wall data handed to the pricing service adapter.

use serde::{Deserialize, Serialize};

use crate::axis::{Orientation, Perimeter};
use crate::design::Design;
use crate::keys::NodeId;
use crate::opening::{OpeningKind, SegmentKind, Segments};
use crate::tier::Tier;
use crate::wall::WallEndpoints;

/// Quotation view of one committed wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallReport {
    /// Position in the design's wall list
    pub id: usize,
    pub node_a: NodeId,
    pub node_b: NodeId,
    pub direction: Orientation,
    pub on_perimeter: bool,
    pub axis_to_axis: f64,
    pub free_span: f64,
    pub endpoints: WallEndpoints,
    pub opening: OpeningKind,
    pub segments: Segments,
    /// True when the wall no longer fits the current lattice
    pub detached: bool,
}

/// Design-level totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignSummary {
    pub tier: Tier,
    pub perimeter: Perimeter,
    pub axis_count: usize,
    pub node_count: usize,
    pub wall_count: usize,
    /// Sum of wall free spans, cm
    pub wall_length: f64,
    pub door_count: usize,
    pub window_count: usize,
}

impl Design {
    pub fn wall_reports(&self) -> Vec<WallReport> {
        let detached = self.detached_walls();
        self.walls()
            .enumerate()
            .map(|(id, (key, wall))| WallReport {
                id,
                node_a: wall.node_a,
                node_b: wall.node_b,
                direction: wall.direction,
                on_perimeter: wall.is_on_perimeter(),
                axis_to_axis: wall.axis_to_axis,
                free_span: wall.free_span,
                endpoints: wall.endpoints,
                opening: wall.opening.kind,
                segments: wall.opening.segments.clone(),
                detached: detached.contains(&key),
            })
            .collect()
    }

    pub fn summary(&self) -> DesignSummary {
        let count = |kind: SegmentKind| {
            self.walls()
                .flat_map(|(_, w)| w.opening.segments.iter())
                .filter(|s| s.kind == kind)
                .count()
        };

        DesignSummary {
            tier: self.tier(),
            perimeter: *self.perimeter(),
            axis_count: self.axes().len(),
            node_count: self.nodes().len(),
            wall_count: self.wall_count(),
            wall_length: self.walls().map(|(_, w)| w.free_span).sum(),
            door_count: count(SegmentKind::Door),
            window_count: count(SegmentKind::Window),
        }
    }
}
