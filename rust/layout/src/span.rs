// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Span calculation between two lattice nodes.
//!
//! The axis-to-axis span is the center-to-center distance along the dominant
//! direction. The free span subtracts the part of each node's footprint that
//! stands in the way. Dimension annotations and wall placement both go through
//! [`clearance`], so the two never disagree.

use serde::{Deserialize, Serialize};

use crate::axis::Orientation;
use crate::config::{CornerClearance, LayoutConfig};
use crate::footprint::PositionClass;
use crate::grid::Node;

/// Which span to measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpanMode {
    /// Center-to-center distance, no clearance subtracted
    AxisToAxis,
    /// Usable length between the node footprints
    #[default]
    Free,
}

/// Both spans between a pair of nodes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub direction: Orientation,
    pub axis_to_axis: f64,
    /// May be negative when the footprints overlap
    pub free: f64,
}

impl Span {
    pub fn get(&self, mode: SpanMode) -> f64 {
        match mode {
            SpanMode::AxisToAxis => self.axis_to_axis,
            SpanMode::Free => self.free,
        }
    }
}

/// Horizontal if `|dx| >= |dy|`, vertical otherwise.
pub fn dominant_direction(a: &Node, b: &Node) -> Orientation {
    let delta = b.position.to_nalgebra() - a.position.to_nalgebra();
    if delta.x.abs() >= delta.y.abs() {
        Orientation::Horizontal
    } else {
        Orientation::Vertical
    }
}

/// Unrounded center-to-center distance along a direction.
fn raw_distance(a: &Node, b: &Node, direction: Orientation) -> f64 {
    let delta = b.position.to_nalgebra() - a.position.to_nalgebra();
    match direction {
        Orientation::Horizontal => delta.x.abs(),
        Orientation::Vertical => delta.y.abs(),
    }
}

/// Length of a span along `direction` that a node's footprint takes up.
///
/// - Corner: the footprint dimension along the span (twice that under
///   [`CornerClearance::Double`]).
/// - Perimeter edge: the full dimension when the secondary axis ending at the
///   node is perpendicular to the span, half of it otherwise.
/// - Interior nodes: half the dimension.
pub fn clearance(node: &Node, direction: Orientation, corner: CornerClearance) -> f64 {
    let dimension = node.footprint.along(direction);
    match node.class {
        PositionClass::Corner => match corner {
            CornerClearance::Single => dimension,
            CornerClearance::Double => 2.0 * dimension,
        },
        PositionClass::PerimeterEdge(side) => {
            if side.terminating_axis() != direction {
                dimension
            } else {
                dimension / 2.0
            }
        }
        PositionClass::SecondaryIntersection | PositionClass::PureSecondary => dimension / 2.0,
    }
}

/// Measures both spans between two nodes, rounded to whole centimeters.
pub fn measure(a: &Node, b: &Node, config: &LayoutConfig) -> Span {
    let direction = dominant_direction(a, b);
    let raw = raw_distance(a, b, direction);
    let clearances = clearance(a, direction, config.corner_clearance)
        + clearance(b, direction, config.corner_clearance);

    Span {
        direction,
        axis_to_axis: raw.round(),
        free: (raw - clearances).round(),
    }
}

/// Measures one span between two nodes.
pub fn span(a: &Node, b: &Node, mode: SpanMode, config: &LayoutConfig) -> f64 {
    measure(a, b, config).get(mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::footprint::{NodeOrientation, PerimeterSide};
    use crate::grid::Point2D;
    use crate::keys::NodeId;
    use crate::tier::Footprint;

    fn node(x: f64, y: f64, class: PositionClass) -> Node {
        Node {
            id: NodeId::from_position(x, y),
            position: Point2D::new(x, y),
            footprint: Footprint::new(20.0, 12.0),
            class,
            orientation: Some(NodeOrientation::Horizontal),
        }
    }

    #[test]
    fn dominant_direction_prefers_horizontal_on_tie() {
        let a = node(0.0, 0.0, PositionClass::Corner);
        let b = node(50.0, 50.0, PositionClass::PureSecondary);
        assert_eq!(dominant_direction(&a, &b), Orientation::Horizontal);

        let c = node(10.0, 80.0, PositionClass::PureSecondary);
        assert_eq!(dominant_direction(&a, &c), Orientation::Vertical);
    }

    #[test]
    fn corner_to_corner() {
        let a = node(0.0, 0.0, PositionClass::Corner);
        let b = node(200.0, 0.0, PositionClass::Corner);
        let span = measure(&a, &b, &LayoutConfig::default());
        assert_eq!(span.direction, Orientation::Horizontal);
        assert_eq!(span.axis_to_axis, 200.0);
        assert_eq!(span.free, 160.0);
    }

    #[test]
    fn double_corner_rule() {
        let config = LayoutConfig {
            corner_clearance: CornerClearance::Double,
            ..LayoutConfig::default()
        };
        let a = node(0.0, 0.0, PositionClass::Corner);
        let b = node(200.0, 0.0, PositionClass::Corner);
        assert_eq!(span(&a, &b, SpanMode::Free, &config), 120.0);
    }

    #[test]
    fn edge_node_clearance_depends_on_direction() {
        let top = node(100.0, 0.0, PositionClass::PerimeterEdge(PerimeterSide::Top));
        assert_eq!(clearance(&top, Orientation::Horizontal, CornerClearance::Single), 20.0);
        assert_eq!(clearance(&top, Orientation::Vertical, CornerClearance::Single), 6.0);

        let left = node(0.0, 60.0, PositionClass::PerimeterEdge(PerimeterSide::Left));
        assert_eq!(clearance(&left, Orientation::Vertical, CornerClearance::Single), 12.0);
        assert_eq!(clearance(&left, Orientation::Horizontal, CornerClearance::Single), 10.0);
    }

    #[test]
    fn interior_nodes_take_half() {
        let a = node(50.0, 60.0, PositionClass::SecondaryIntersection);
        let b = node(150.0, 60.0, PositionClass::SecondaryIntersection);
        let span = measure(&a, &b, &LayoutConfig::default());
        assert_eq!(span.axis_to_axis, 100.0);
        assert_eq!(span.free, 80.0);
    }

    #[test]
    fn negative_free_span_is_not_clamped() {
        let a = node(0.0, 0.0, PositionClass::Corner);
        let b = node(30.0, 0.0, PositionClass::PerimeterEdge(PerimeterSide::Top));
        assert_eq!(span(&a, &b, SpanMode::Free, &LayoutConfig::default()), -10.0);
    }

    #[test]
    fn spans_are_rounded() {
        let a = node(0.0, 60.0, PositionClass::SecondaryIntersection);
        let b = node(100.4, 60.0, PositionClass::SecondaryIntersection);
        let span = measure(&a, &b, &LayoutConfig::default());
        assert_eq!(span.axis_to_axis, 100.0);
        assert_eq!(span.free, 80.0);
    }

    #[test]
    fn span_is_symmetric() {
        let config = LayoutConfig::default();
        let a = node(0.0, 0.0, PositionClass::Corner);
        let b = node(100.0, 0.0, PositionClass::PerimeterEdge(PerimeterSide::Top));
        for mode in [SpanMode::AxisToAxis, SpanMode::Free] {
            assert_eq!(span(&a, &b, mode, &config), span(&b, &a, mode, &config));
        }
    }
}
