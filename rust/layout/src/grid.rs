// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Node lattice generation.
//!
//! The lattice is a pure function of the perimeter, the axis store, the tier
//! and the orientation overrides. It is rebuilt as a whole whenever any of
//! them change and never edited in place.

use nalgebra::Point2;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::axis::{AxisStore, Orientation, Perimeter};
use crate::config::LayoutConfig;
use crate::error::Result;
use crate::footprint::{classify, resolve_footprint, NodeOrientation, PositionClass};
use crate::keys::NodeId;
use crate::tier::{Footprint, Tier};

/// A plan position in centimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_nalgebra(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }

    /// True if both coordinates differ by less than `tolerance`.
    pub fn coincides(&self, other: &Point2D, tolerance: f64) -> bool {
        (self.x - other.x).abs() < tolerance && (self.y - other.y).abs() < tolerance
    }
}

/// A lattice node with its resolved footprint and class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub position: Point2D,
    pub footprint: Footprint,
    pub class: PositionClass,
    /// Orientation applied to this node, on tiers that allow it
    pub orientation: Option<NodeOrientation>,
}

/// Generates the deduplicated lattice positions, sorted by row then column.
///
/// Candidates are merged in three passes: the four perimeter corners, then
/// the perimeter points of every axis, then every vertical/horizontal axis
/// crossing. A point that coincides with one already kept is dropped, so an
/// axis within the merge tolerance of the perimeter collapses onto the
/// perimeter rather than the other way round. Each pass is sorted first, which
/// keeps the result independent of axis insertion order.
pub fn generate_points(
    perimeter: &Perimeter,
    axes: &AxisStore,
    merge_tolerance: f64,
) -> Result<Vec<Point2D>> {
    axes.check_all(perimeter)?;

    let verticals: Vec<f64> = axes.offsets(Orientation::Vertical).collect();
    let horizontals: Vec<f64> = axes.offsets(Orientation::Horizontal).collect();

    let corners: Vec<Point2D> = perimeter
        .corners()
        .into_iter()
        .map(|(x, y)| Point2D::new(x, y))
        .collect();

    let mut edge_points = Vec::with_capacity(2 * (verticals.len() + horizontals.len()));
    for &x in &verticals {
        edge_points.push(Point2D::new(x, 0.0));
        edge_points.push(Point2D::new(x, perimeter.length));
    }
    for &y in &horizontals {
        edge_points.push(Point2D::new(0.0, y));
        edge_points.push(Point2D::new(perimeter.width, y));
    }

    let mut crossings = Vec::with_capacity(verticals.len() * horizontals.len());
    for &x in &verticals {
        for &y in &horizontals {
            crossings.push(Point2D::new(x, y));
        }
    }

    let mut points: Vec<Point2D> = Vec::with_capacity(4 + edge_points.len() + crossings.len());
    for mut pass in [corners, edge_points, crossings] {
        pass.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
        for candidate in pass {
            if !points
                .iter()
                .any(|p| p.coincides(&candidate, merge_tolerance))
            {
                points.push(candidate);
            }
        }
    }

    points.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));
    Ok(points)
}

/// A fully resolved node lattice.
#[derive(Debug, Clone, Default)]
pub struct Lattice {
    nodes: Vec<Node>,
    index: FxHashMap<NodeId, usize>,
}

impl Lattice {
    /// Generates positions and resolves each node's footprint and class.
    pub fn build(
        perimeter: &Perimeter,
        axes: &AxisStore,
        tier: Tier,
        overrides: &FxHashMap<NodeId, NodeOrientation>,
        config: &LayoutConfig,
    ) -> Result<Self> {
        let points = generate_points(perimeter, axes, config.merge_tolerance)?;

        let mut nodes = Vec::with_capacity(points.len());
        let mut index = FxHashMap::default();
        for position in points {
            let id = NodeId::from_position(position.x, position.y);
            let orientation = tier
                .allows_orientation()
                .then(|| overrides.get(&id).copied().unwrap_or_default());
            let node = Node {
                id,
                position,
                footprint: resolve_footprint(tier, orientation),
                class: classify(position, perimeter, axes, config.classification_tolerance),
                orientation,
            };
            index.insert(id, nodes.len());
            nodes.push(node);
        }

        Ok(Self { nodes, index })
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
