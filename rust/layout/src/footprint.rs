// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Node footprint resolution.
//!
//! Every lattice node carries a structural element (column or pier). Its size
//! comes from the active tier, and on the finest tier from a per-node
//! orientation override. Its position class decides how much of a span the
//! element consumes (see [`crate::span`]).

use serde::{Deserialize, Serialize};

use crate::axis::{AxisStore, Orientation, Perimeter};
use crate::grid::Point2D;
use crate::tier::{Footprint, Tier};

/// Which way a rectangular pier is turned on the finest tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NodeOrientation {
    /// Long side along `x`
    #[default]
    Horizontal,
    /// Long side along `y`
    Vertical,
}

impl std::fmt::Display for NodeOrientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeOrientation::Horizontal => f.write_str("horizontal"),
            NodeOrientation::Vertical => f.write_str("vertical"),
        }
    }
}

/// Perimeter edge a non-corner boundary node sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PerimeterSide {
    Top,
    Bottom,
    Left,
    Right,
}

impl PerimeterSide {
    /// Orientation of the secondary axis that ends at a node on this side.
    ///
    /// Nodes on the top and bottom edges are where vertical axes meet the
    /// perimeter; nodes on the left and right edges are where horizontal ones do.
    pub fn terminating_axis(&self) -> Orientation {
        match self {
            PerimeterSide::Top | PerimeterSide::Bottom => Orientation::Vertical,
            PerimeterSide::Left | PerimeterSide::Right => Orientation::Horizontal,
        }
    }
}

/// Classification of a node by the lines it touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionClass {
    /// On a horizontal and a vertical perimeter edge
    Corner,
    /// On exactly one perimeter edge
    PerimeterEdge(PerimeterSide),
    /// Interior crossing of a vertical and a horizontal secondary axis
    SecondaryIntersection,
    /// Interior point on a single secondary axis
    PureSecondary,
}

/// Classifies a plan position against the perimeter and axis store.
pub fn classify(
    position: Point2D,
    perimeter: &Perimeter,
    axes: &AxisStore,
    tolerance: f64,
) -> PositionClass {
    let near = |a: f64, b: f64| (a - b).abs() < tolerance;

    let side_x = if near(position.y, 0.0) {
        Some(PerimeterSide::Top)
    } else if near(position.y, perimeter.length) {
        Some(PerimeterSide::Bottom)
    } else {
        None
    };
    let side_y = if near(position.x, 0.0) {
        Some(PerimeterSide::Left)
    } else if near(position.x, perimeter.width) {
        Some(PerimeterSide::Right)
    } else {
        None
    };

    match (side_x, side_y) {
        (Some(_), Some(_)) => PositionClass::Corner,
        (Some(side), None) | (None, Some(side)) => PositionClass::PerimeterEdge(side),
        (None, None) => {
            let on_vertical = axes
                .offsets(Orientation::Vertical)
                .any(|offset| near(position.x, offset));
            let on_horizontal = axes
                .offsets(Orientation::Horizontal)
                .any(|offset| near(position.y, offset));
            if on_vertical && on_horizontal {
                PositionClass::SecondaryIntersection
            } else {
                PositionClass::PureSecondary
            }
        }
    }
}

/// Resolves the footprint for a node.
///
/// On tiers that allow orientation the override (horizontal by default)
/// picks between the tier footprint and its rotation. Other tiers always
/// use the fixed tier footprint.
pub fn resolve_footprint(tier: Tier, orientation: Option<NodeOrientation>) -> Footprint {
    let base = tier.footprint();
    if !tier.allows_orientation() {
        return base;
    }
    match orientation.unwrap_or_default() {
        NodeOrientation::Horizontal => base,
        NodeOrientation::Vertical => base.rotated(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::Axis;

    fn setup() -> (Perimeter, AxisStore) {
        let perimeter = Perimeter::new(200.0, 150.0).unwrap();
        let mut axes = AxisStore::new();
        axes.add(&perimeter, Axis::vertical(100.0)).unwrap();
        axes.add(&perimeter, Axis::horizontal(60.0)).unwrap();
        (perimeter, axes)
    }

    #[test]
    fn corners() {
        let (p, axes) = setup();
        for (x, y) in p.corners() {
            assert_eq!(
                classify(Point2D::new(x, y), &p, &axes, 0.1),
                PositionClass::Corner
            );
        }
    }

    #[test]
    fn perimeter_edges_report_side() {
        let (p, axes) = setup();
        let cases = [
            ((100.0, 0.0), PerimeterSide::Top),
            ((100.0, 150.0), PerimeterSide::Bottom),
            ((0.0, 60.0), PerimeterSide::Left),
            ((200.0, 60.0), PerimeterSide::Right),
        ];
        for ((x, y), side) in cases {
            assert_eq!(
                classify(Point2D::new(x, y), &p, &axes, 0.1),
                PositionClass::PerimeterEdge(side)
            );
        }
    }

    #[test]
    fn interior_points() {
        let (p, axes) = setup();
        assert_eq!(
            classify(Point2D::new(100.0, 60.0), &p, &axes, 0.1),
            PositionClass::SecondaryIntersection
        );
        assert_eq!(
            classify(Point2D::new(100.0, 100.0), &p, &axes, 0.1),
            PositionClass::PureSecondary
        );
    }

    #[test]
    fn classification_tolerance_is_strict() {
        let (p, axes) = setup();
        assert_eq!(
            classify(Point2D::new(100.0, 0.05), &p, &axes, 0.1),
            PositionClass::PerimeterEdge(PerimeterSide::Top)
        );
        assert_eq!(
            classify(Point2D::new(100.0, 0.2), &p, &axes, 0.1),
            PositionClass::PureSecondary
        );
    }

    #[test]
    fn finest_tier_follows_override() {
        assert_eq!(
            resolve_footprint(Tier::OneOfOne, None),
            Footprint::new(20.0, 12.0)
        );
        assert_eq!(
            resolve_footprint(Tier::OneOfOne, Some(NodeOrientation::Vertical)),
            Footprint::new(12.0, 20.0)
        );
    }

    #[test]
    fn coarser_tiers_ignore_override() {
        assert_eq!(
            resolve_footprint(Tier::OneOfTwo, Some(NodeOrientation::Vertical)),
            Tier::OneOfTwo.footprint()
        );
    }
}
