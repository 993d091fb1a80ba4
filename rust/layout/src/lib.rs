// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # PlanLite Layout
//!
//! Parametric grid and wall-layout geometry kernel.
//!
//! A rectangular building perimeter is subdivided by secondary axes into a
//! lattice of structural nodes. Walls are placed between nodes that share a
//! row or column, and doors and windows are cut into the usable ("free") span
//! between the node footprints.
//!
//! Pipeline:
//! 1. [`axis`] - perimeter and secondary axis store
//! 2. [`grid`] - deduplicated node lattice
//! 3. [`footprint`] - node footprint and position class
//! 4. [`span`] - axis-to-axis and free spans
//! 5. [`wall`] - wall endpoints
//! 6. [`opening`] - opening layout validation
//!
//! [`Design`] ties them together as one editable value.
//!
//! ```
//! use planlite_layout::{Axis, Design, LayoutConfig, NodeId, OpeningRequest, Perimeter, Tier};
//!
//! let mut design = Design::new(
//!     Perimeter::new(200.0, 150.0).unwrap(),
//!     Tier::OneOfOne,
//!     LayoutConfig::default(),
//! )
//! .unwrap();
//! design.add_axis(Axis::vertical(100.0)).unwrap();
//! assert_eq!(design.nodes().len(), 6);
//!
//! let span = design.measure(NodeId::new(0, 0), NodeId::new(200, 0)).unwrap();
//! assert_eq!(span.free, 160.0);
//!
//! // Walls join neighbouring nodes; (100, 0) splits the top edge.
//! let span = design.measure(NodeId::new(0, 0), NodeId::new(100, 0)).unwrap();
//! assert_eq!(span.free, 60.0);
//! design
//!     .add_wall(NodeId::new(0, 0), NodeId::new(100, 0), 0.0, OpeningRequest::door(10.0, 40.0, 10.0))
//!     .unwrap();
//! ```

pub mod axis;
pub mod config;
pub mod design;
pub mod error;
pub mod footprint;
pub mod grid;
pub mod keys;
pub mod opening;
pub mod report;
pub mod serialization;
pub mod span;
pub mod tier;
pub mod wall;

pub use axis::{Axis, AxisStore, Orientation, Perimeter};
pub use config::{CornerClearance, LayoutConfig};
pub use design::{Design, Dimension, Regeneration, WallPlan};
pub use error::{Error, Result, StaleOverride, StaleReason};
pub use footprint::{NodeOrientation, PerimeterSide, PositionClass};
pub use grid::{Node, Point2D};
pub use keys::{DimensionKey, NodeId, WallKey};
pub use opening::{
    DoorSide, EditorState, OpeningEditor, OpeningKind, OpeningLayout, OpeningRequest,
    SegmentKind, SubSegment, WindowSpec,
};
pub use report::{DesignSummary, WallReport};
pub use serialization::DesignSnapshot;
pub use span::{Span, SpanMode};
pub use tier::{Footprint, Tier};
pub use wall::{WallEndpoints, WallSegment};
