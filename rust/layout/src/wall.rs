// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall endpoint resolution and committed wall segments.

use serde::{Deserialize, Serialize};

use crate::axis::{Orientation, Perimeter};
use crate::config::LayoutConfig;
use crate::error::{Error, Result};
use crate::footprint::PerimeterSide;
use crate::grid::Node;
use crate::keys::NodeId;
use crate::opening::{OpeningKind, OpeningLayout};
use crate::span::clearance;

/// Wall centerline endpoints in plan coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallEndpoints {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl WallEndpoints {
    pub fn length(&self) -> f64 {
        let dx = self.x2 - self.x1;
        let dy = self.y2 - self.y1;
        (dx * dx + dy * dy).sqrt()
    }

    /// Moves both endpoints across a wall running in `direction`.
    fn shifted(&self, direction: Orientation, delta: f64) -> Self {
        match direction {
            Orientation::Horizontal => Self {
                y1: self.y1 + delta,
                y2: self.y2 + delta,
                ..*self
            },
            Orientation::Vertical => Self {
                x1: self.x1 + delta,
                x2: self.x2 + delta,
                ..*self
            },
        }
    }
}

/// Resolved placement of a wall between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallGeometry {
    pub direction: Orientation,
    /// Perimeter edge the wall runs along, if any
    pub perimeter_side: Option<PerimeterSide>,
    pub endpoints: WallEndpoints,
}

/// Direction of a wall between two nodes that share a row or a column.
pub fn wall_direction(a: &Node, b: &Node, tolerance: f64) -> Result<Orientation> {
    let same_row = (a.position.y - b.position.y).abs() < tolerance;
    let same_column = (a.position.x - b.position.x).abs() < tolerance;
    match (same_row, same_column) {
        (true, false) => Ok(Orientation::Horizontal),
        (false, true) => Ok(Orientation::Vertical),
        _ => Err(Error::UnalignedNodes { a: a.id, b: b.id }),
    }
}

/// First lattice node lying strictly between `a` and `b` on their shared line.
pub fn node_between<'a>(
    a: &Node,
    b: &Node,
    direction: Orientation,
    nodes: &'a [Node],
    tolerance: f64,
) -> Option<&'a Node> {
    let (along, across): (fn(&Node) -> f64, fn(&Node) -> f64) = match direction {
        Orientation::Horizontal => (|n: &Node| n.position.x, |n: &Node| n.position.y),
        Orientation::Vertical => (|n: &Node| n.position.y, |n: &Node| n.position.x),
    };
    let lo = along(a).min(along(b));
    let hi = along(a).max(along(b));
    nodes.iter().find(|n| {
        (across(n) - across(a)).abs() < tolerance
            && along(n) > lo + tolerance
            && along(n) < hi - tolerance
    })
}

/// Perimeter edge under a wall line, tested like node classification.
pub fn perimeter_side(
    a: &Node,
    direction: Orientation,
    perimeter: &Perimeter,
    tolerance: f64,
) -> Option<PerimeterSide> {
    let near = |v: f64, edge: f64| (v - edge).abs() < tolerance;
    match direction {
        Orientation::Horizontal if near(a.position.y, 0.0) => Some(PerimeterSide::Top),
        Orientation::Horizontal if near(a.position.y, perimeter.length) => {
            Some(PerimeterSide::Bottom)
        }
        Orientation::Vertical if near(a.position.x, 0.0) => Some(PerimeterSide::Left),
        Orientation::Vertical if near(a.position.x, perimeter.width) => Some(PerimeterSide::Right),
        _ => None,
    }
}

/// Inward shift for a wall lying on a perimeter edge.
fn inset_toward_interior(side: PerimeterSide, inset: f64) -> f64 {
    match side {
        PerimeterSide::Top | PerimeterSide::Left => inset,
        PerimeterSide::Bottom | PerimeterSide::Right => -inset,
    }
}

/// Converts a node pair and its free span into wall endpoints.
///
/// The start point is pulled in from the lower node by its clearance and the
/// end point sits `free_span` further along, so the endpoints are exactly as
/// far apart as the free span. Walls on a perimeter edge are moved inward by
/// `perimeter_inset` and reject any lateral displacement; other walls shift
/// by `displacement` across their direction.
pub fn resolve_endpoints(
    a: &Node,
    b: &Node,
    free_span: f64,
    displacement: f64,
    perimeter: &Perimeter,
    config: &LayoutConfig,
) -> Result<WallGeometry> {
    let tolerance = config.classification_tolerance;
    let direction = wall_direction(a, b, tolerance)?;

    let (lo, hi) = match direction {
        Orientation::Horizontal if a.position.x <= b.position.x => (a, b),
        Orientation::Vertical if a.position.y <= b.position.y => (a, b),
        _ => (b, a),
    };
    let lo_clearance = clearance(lo, direction, config.corner_clearance);

    if !free_span.is_finite() || free_span <= 0.0 {
        let hi_clearance = clearance(hi, direction, config.corner_clearance);
        let available = match direction {
            Orientation::Horizontal => hi.position.x - lo.position.x,
            Orientation::Vertical => hi.position.y - lo.position.y,
        };
        return Err(Error::InsufficientSpan {
            available: available.round(),
            required: lo_clearance + hi_clearance,
        });
    }
    if !displacement.is_finite() {
        return Err(Error::UnalignedDisplacement { displacement });
    }

    let side = perimeter_side(a, direction, perimeter, tolerance);
    let transverse_shift = match side {
        Some(_) if displacement != 0.0 => {
            return Err(Error::UnalignedDisplacement { displacement });
        }
        Some(side) => inset_toward_interior(side, config.perimeter_inset),
        None => displacement,
    };

    let endpoints = match direction {
        Orientation::Horizontal => {
            let x1 = lo.position.x + lo_clearance;
            let y = (a.position.y + b.position.y) / 2.0 + transverse_shift;
            WallEndpoints {
                x1,
                y1: y,
                x2: x1 + free_span,
                y2: y,
            }
        }
        Orientation::Vertical => {
            let y1 = lo.position.y + lo_clearance;
            let x = (a.position.x + b.position.x) / 2.0 + transverse_shift;
            WallEndpoints {
                x1: x,
                y1,
                x2: x,
                y2: y1 + free_span,
            }
        }
    };

    Ok(WallGeometry {
        direction,
        perimeter_side: side,
        endpoints,
    })
}

/// A wall committed to the design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallSegment {
    pub node_a: NodeId,
    pub node_b: NodeId,
    pub direction: Orientation,
    pub perimeter_side: Option<PerimeterSide>,
    pub axis_to_axis: f64,
    pub free_span: f64,
    pub opening: OpeningLayout,
    pub lateral_displacement: f64,
    pub endpoints: WallEndpoints,
}

impl WallSegment {
    pub fn opening_kind(&self) -> OpeningKind {
        self.opening.kind
    }

    pub fn is_on_perimeter(&self) -> bool {
        self.perimeter_side.is_some()
    }

    /// Replaces the lateral displacement and moves the endpoints with it.
    pub(crate) fn set_lateral_displacement(&mut self, displacement: f64) -> Result<()> {
        if !displacement.is_finite() || (self.is_on_perimeter() && displacement != 0.0) {
            return Err(Error::UnalignedDisplacement { displacement });
        }
        let delta = displacement - self.lateral_displacement;
        self.endpoints = self.endpoints.shifted(self.direction, delta);
        self.lateral_displacement = displacement;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::footprint::{NodeOrientation, PositionClass};
    use crate::grid::Point2D;
    use crate::tier::Footprint;
    use approx::assert_relative_eq;

    fn node(x: f64, y: f64, class: PositionClass) -> Node {
        Node {
            id: NodeId::from_position(x, y),
            position: Point2D::new(x, y),
            footprint: Footprint::new(20.0, 12.0),
            class,
            orientation: Some(NodeOrientation::Horizontal),
        }
    }

    fn perimeter() -> Perimeter {
        Perimeter::new(200.0, 150.0).unwrap()
    }

    #[test]
    fn top_perimeter_wall_is_inset() {
        let a = node(0.0, 0.0, PositionClass::Corner);
        let b = node(200.0, 0.0, PositionClass::Corner);
        let wall = resolve_endpoints(&b, &a, 160.0, 0.0, &perimeter(), &LayoutConfig::default())
            .unwrap();

        assert_eq!(wall.direction, Orientation::Horizontal);
        assert_eq!(wall.perimeter_side, Some(PerimeterSide::Top));
        assert_eq!(
            wall.endpoints,
            WallEndpoints {
                x1: 20.0,
                y1: 12.0,
                x2: 180.0,
                y2: 12.0
            }
        );
    }

    #[test]
    fn right_perimeter_wall_moves_left() {
        let a = node(200.0, 0.0, PositionClass::Corner);
        let b = node(200.0, 150.0, PositionClass::Corner);
        let wall = resolve_endpoints(&a, &b, 126.0, 0.0, &perimeter(), &LayoutConfig::default())
            .unwrap();

        assert_eq!(wall.perimeter_side, Some(PerimeterSide::Right));
        assert_relative_eq!(wall.endpoints.x1, 188.0);
        assert_relative_eq!(wall.endpoints.y1, 12.0);
        assert_relative_eq!(wall.endpoints.y2, 138.0);
    }

    #[test]
    fn interior_wall_takes_displacement() {
        let a = node(100.0, 0.0, PositionClass::PerimeterEdge(PerimeterSide::Top));
        let b = node(100.0, 150.0, PositionClass::PerimeterEdge(PerimeterSide::Bottom));
        let wall = resolve_endpoints(&a, &b, 138.0, -5.0, &perimeter(), &LayoutConfig::default())
            .unwrap();

        assert_eq!(wall.perimeter_side, None);
        assert_relative_eq!(wall.endpoints.x1, 95.0);
        assert_relative_eq!(wall.endpoints.x2, 95.0);
        assert_relative_eq!(wall.endpoints.y1, 6.0);
        assert_relative_eq!(wall.endpoints.length(), 138.0);
    }

    #[test]
    fn perimeter_wall_rejects_displacement() {
        let a = node(0.0, 0.0, PositionClass::Corner);
        let b = node(200.0, 0.0, PositionClass::Corner);
        let err = resolve_endpoints(&a, &b, 160.0, 8.0, &perimeter(), &LayoutConfig::default())
            .unwrap_err();
        assert_eq!(err, Error::UnalignedDisplacement { displacement: 8.0 });
    }

    #[test]
    fn diagonal_pair_is_unaligned() {
        let a = node(0.0, 0.0, PositionClass::Corner);
        let b = node(100.0, 60.0, PositionClass::SecondaryIntersection);
        assert!(matches!(
            resolve_endpoints(&a, &b, 50.0, 0.0, &perimeter(), &LayoutConfig::default()),
            Err(Error::UnalignedNodes { .. })
        ));
    }

    #[test]
    fn same_node_is_unaligned() {
        let a = node(0.0, 0.0, PositionClass::Corner);
        assert!(matches!(
            wall_direction(&a, &a, 0.1),
            Err(Error::UnalignedNodes { .. })
        ));
    }

    #[test]
    fn finds_node_between_on_shared_line() {
        let a = node(0.0, 0.0, PositionClass::Corner);
        let mid = node(100.0, 0.0, PositionClass::PerimeterEdge(PerimeterSide::Top));
        let b = node(200.0, 0.0, PositionClass::Corner);
        let off_line = node(100.0, 60.0, PositionClass::SecondaryIntersection);
        let nodes = vec![a.clone(), mid.clone(), b.clone(), off_line];

        let between = node_between(&a, &b, Orientation::Horizontal, &nodes, 0.1);
        assert_eq!(between.map(|n| n.id), Some(mid.id));
        assert!(node_between(&a, &mid, Orientation::Horizontal, &nodes, 0.1).is_none());
        assert!(node_between(&mid, &b, Orientation::Horizontal, &nodes, 0.1).is_none());
    }

    #[test]
    fn non_positive_span_is_insufficient() {
        let a = node(0.0, 0.0, PositionClass::Corner);
        let b = node(30.0, 0.0, PositionClass::PerimeterEdge(PerimeterSide::Top));
        let err = resolve_endpoints(&a, &b, -10.0, 0.0, &perimeter(), &LayoutConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            Error::InsufficientSpan {
                available: 30.0,
                required: 40.0
            }
        );
    }

    #[test]
    fn displacement_edit_moves_endpoints() {
        let a = node(100.0, 0.0, PositionClass::PerimeterEdge(PerimeterSide::Top));
        let b = node(100.0, 150.0, PositionClass::PerimeterEdge(PerimeterSide::Bottom));
        let geometry =
            resolve_endpoints(&a, &b, 138.0, 0.0, &perimeter(), &LayoutConfig::default()).unwrap();
        let mut wall = WallSegment {
            node_a: a.id,
            node_b: b.id,
            direction: geometry.direction,
            perimeter_side: geometry.perimeter_side,
            axis_to_axis: 150.0,
            free_span: 138.0,
            opening: OpeningLayout::plain(138.0),
            lateral_displacement: 0.0,
            endpoints: geometry.endpoints,
        };

        wall.set_lateral_displacement(10.0).unwrap();
        assert_relative_eq!(wall.endpoints.x1, 110.0);
        wall.set_lateral_displacement(-4.0).unwrap();
        assert_relative_eq!(wall.endpoints.x2, 96.0);
        assert_relative_eq!(wall.lateral_displacement, -4.0);
    }
}
