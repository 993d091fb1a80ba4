// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The design state and its transitions.
//!
//! A [`Design`] owns everything the user edits: perimeter, tier, secondary
//! axes, orientation overrides, committed walls and dimension annotations,
//! plus the node lattice derived from them. Every transition validates its
//! input and builds the new lattice before touching any field, so a failed
//! call leaves the design unchanged and a successful one replaces the lattice
//! in the same step as the inputs it was computed from.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::axis::{Axis, AxisStore, Perimeter};
use crate::config::LayoutConfig;
use crate::error::{Error, Result, StaleOverride, StaleReason};
use crate::footprint::{NodeOrientation, PerimeterSide};
use crate::grid::{Lattice, Node};
use crate::keys::{DimensionKey, NodeId, WallKey};
use crate::opening::{OpeningEditor, OpeningLayout, OpeningRequest};
use crate::span::{self, Span, SpanMode};
use crate::tier::Tier;
use crate::wall::{node_between, resolve_endpoints, wall_direction, WallEndpoints, WallSegment};

/// Allowed gap between a committed layout's segment sum and the wall's free span.
const CONSERVATION_TOLERANCE: f64 = 1.0;

/// Float slack when comparing stored wall geometry with a fresh plan.
const GEOMETRY_EPSILON: f64 = 1e-6;

/// Outcome of a lattice regeneration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Regeneration {
    pub revision: u64,
    pub node_count: usize,
    /// Overrides dropped because they no longer apply
    pub stale_overrides: Vec<StaleOverride>,
}

/// A measured dimension annotation between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub node_a: NodeId,
    pub node_b: NodeId,
    pub mode: SpanMode,
}

/// Everything needed to commit a wall, computed against one lattice revision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallPlan {
    pub node_a: NodeId,
    pub node_b: NodeId,
    pub span: Span,
    pub perimeter_side: Option<PerimeterSide>,
    pub lateral_displacement: f64,
    pub endpoints: WallEndpoints,
    pub revision: u64,
}

impl WallPlan {
    pub fn free_span(&self) -> f64 {
        self.span.free
    }

    /// True if a committed wall still has the geometry this plan describes.
    fn describes(&self, wall: &WallSegment) -> bool {
        let close = |a: f64, b: f64| (a - b).abs() <= GEOMETRY_EPSILON;
        let (p, w) = (&self.endpoints, &wall.endpoints);
        self.node_a == wall.node_a
            && self.node_b == wall.node_b
            && self.span.direction == wall.direction
            && self.perimeter_side == wall.perimeter_side
            && close(self.span.axis_to_axis, wall.axis_to_axis)
            && close(self.span.free, wall.free_span)
            && close(self.lateral_displacement, wall.lateral_displacement)
            && close(p.x1, w.x1)
            && close(p.y1, w.y1)
            && close(p.x2, w.x2)
            && close(p.y2, w.y2)
    }
}

/// Editable building design.
#[derive(Debug, Clone)]
pub struct Design {
    config: LayoutConfig,
    perimeter: Perimeter,
    tier: Tier,
    axes: AxisStore,
    overrides: FxHashMap<NodeId, NodeOrientation>,
    lattice: Lattice,
    walls: SlotMap<WallKey, WallSegment>,
    dimensions: SlotMap<DimensionKey, Dimension>,
    revision: u64,
}

impl Design {
    /// Creates a design with no secondary axes.
    pub fn new(perimeter: Perimeter, tier: Tier, config: LayoutConfig) -> Result<Self> {
        config.validate()?;
        perimeter.validate()?;
        let axes = AxisStore::new();
        let overrides = FxHashMap::default();
        let lattice = Lattice::build(&perimeter, &axes, tier, &overrides, &config)?;

        tracing::debug!(
            width = perimeter.width,
            length = perimeter.length,
            tier = %tier,
            nodes = lattice.len(),
            "created design"
        );

        Ok(Self {
            config,
            perimeter,
            tier,
            axes,
            overrides,
            lattice,
            walls: SlotMap::with_key(),
            dimensions: SlotMap::with_key(),
            revision: 0,
        })
    }

    // --- Accessors ---

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn perimeter(&self) -> &Perimeter {
        &self.perimeter
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn axes(&self) -> &AxisStore {
        &self.axes
    }

    /// Lattice nodes sorted by row, then column.
    pub fn nodes(&self) -> &[Node] {
        self.lattice.nodes()
    }

    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.lattice.get(id).ok_or(Error::NodeNotFound(id))
    }

    /// Orientation overrides currently in force.
    pub fn overrides(&self) -> &FxHashMap<NodeId, NodeOrientation> {
        &self.overrides
    }

    /// Incremented on every lattice regeneration.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn walls(&self) -> impl Iterator<Item = (WallKey, &WallSegment)> {
        self.walls.iter()
    }

    pub fn wall(&self, key: WallKey) -> Result<&WallSegment> {
        self.walls.get(key).ok_or(Error::WallNotFound)
    }

    pub fn wall_count(&self) -> usize {
        self.walls.len()
    }

    pub fn dimensions(&self) -> impl Iterator<Item = (DimensionKey, &Dimension)> {
        self.dimensions.iter()
    }

    // --- Lattice transitions ---

    /// Builds the lattice for candidate inputs and swaps everything in at once.
    fn apply(
        &mut self,
        perimeter: Perimeter,
        tier: Tier,
        axes: AxisStore,
        config: LayoutConfig,
        mut overrides: FxHashMap<NodeId, NodeOrientation>,
    ) -> Result<Regeneration> {
        let lattice = Lattice::build(&perimeter, &axes, tier, &overrides, &config)?;

        let mut stale_overrides: Vec<StaleOverride> = overrides
            .iter()
            .filter_map(|(&node, &orientation)| {
                let reason = if !tier.allows_orientation() {
                    StaleReason::TierChanged
                } else if !lattice.contains(node) {
                    StaleReason::NodeRemoved
                } else {
                    return None;
                };
                Some(StaleOverride {
                    node,
                    orientation,
                    reason,
                })
            })
            .collect();
        stale_overrides.sort_by_key(|s| (s.node.y, s.node.x));
        for stale in &stale_overrides {
            overrides.remove(&stale.node);
            tracing::warn!(node = %stale.node, reason = ?stale.reason, "{}", stale);
        }

        self.perimeter = perimeter;
        self.tier = tier;
        self.axes = axes;
        self.config = config;
        self.overrides = overrides;
        self.lattice = lattice;
        self.revision += 1;

        tracing::debug!(
            revision = self.revision,
            nodes = self.lattice.len(),
            axes = self.axes.len(),
            "regenerated lattice"
        );

        Ok(Regeneration {
            revision: self.revision,
            node_count: self.lattice.len(),
            stale_overrides,
        })
    }

    /// Adds a secondary axis. Offsets outside the perimeter are rejected
    /// before anything is regenerated.
    pub fn add_axis(&mut self, axis: Axis) -> Result<Regeneration> {
        let mut axes = self.axes.clone();
        axes.add(&self.perimeter, axis)?;
        self.apply(
            self.perimeter,
            self.tier,
            axes,
            self.config.clone(),
            self.overrides.clone(),
        )
    }

    /// Removes the most recently added axis.
    pub fn undo_axis(&mut self) -> Result<Regeneration> {
        let mut axes = self.axes.clone();
        axes.undo()?;
        self.apply(
            self.perimeter,
            self.tier,
            axes,
            self.config.clone(),
            self.overrides.clone(),
        )
    }

    pub fn clear_axes(&mut self) -> Result<Regeneration> {
        self.apply(
            self.perimeter,
            self.tier,
            AxisStore::new(),
            self.config.clone(),
            self.overrides.clone(),
        )
    }

    /// Resizes the perimeter. Rejected if an existing axis would fall outside.
    pub fn set_perimeter(&mut self, perimeter: Perimeter) -> Result<Regeneration> {
        perimeter.validate()?;
        self.axes.check_all(&perimeter)?;
        self.apply(
            perimeter,
            self.tier,
            self.axes.clone(),
            self.config.clone(),
            self.overrides.clone(),
        )
    }

    /// Switches tier. Overrides are dropped when the new tier does not allow them.
    pub fn set_tier(&mut self, tier: Tier) -> Result<Regeneration> {
        self.apply(
            self.perimeter,
            tier,
            self.axes.clone(),
            self.config.clone(),
            self.overrides.clone(),
        )
    }

    pub fn set_config(&mut self, config: LayoutConfig) -> Result<Regeneration> {
        config.validate()?;
        self.apply(
            self.perimeter,
            self.tier,
            self.axes.clone(),
            config,
            self.overrides.clone(),
        )
    }

    /// Turns the pier at one node. Only the finest tier allows this.
    pub fn set_orientation(
        &mut self,
        node: NodeId,
        orientation: NodeOrientation,
    ) -> Result<Regeneration> {
        if !self.tier.allows_orientation() {
            return Err(Error::OrientationUnsupported(self.tier));
        }
        if !self.lattice.contains(node) {
            return Err(Error::NodeNotFound(node));
        }
        let mut overrides = self.overrides.clone();
        overrides.insert(node, orientation);
        self.apply(
            self.perimeter,
            self.tier,
            self.axes.clone(),
            self.config.clone(),
            overrides,
        )
    }

    /// Restores a node to the default orientation.
    pub fn clear_orientation(&mut self, node: NodeId) -> Result<Regeneration> {
        if !self.lattice.contains(node) {
            return Err(Error::NodeNotFound(node));
        }
        let mut overrides = self.overrides.clone();
        overrides.remove(&node);
        self.apply(
            self.perimeter,
            self.tier,
            self.axes.clone(),
            self.config.clone(),
            overrides,
        )
    }

    /// Replaces tier, axes and overrides in one regeneration. Used when
    /// restoring a persisted design; overrides that no longer apply are
    /// reported as stale.
    pub(crate) fn restore(
        &mut self,
        axes: &[Axis],
        overrides: FxHashMap<NodeId, NodeOrientation>,
    ) -> Result<Regeneration> {
        let mut store = AxisStore::new();
        for &axis in axes {
            store.add(&self.perimeter, axis)?;
        }
        self.apply(self.perimeter, self.tier, store, self.config.clone(), overrides)
    }

    // --- Measurement ---

    /// Measures the span between two nodes, as the dimension tool does.
    pub fn measure(&self, a: NodeId, b: NodeId) -> Result<Span> {
        let na = self.node(a)?;
        let nb = self.node(b)?;
        Ok(span::measure(na, nb, &self.config))
    }

    pub fn add_dimension(&mut self, a: NodeId, b: NodeId, mode: SpanMode) -> Result<DimensionKey> {
        self.measure(a, b)?;
        Ok(self.dimensions.insert(Dimension {
            node_a: a,
            node_b: b,
            mode,
        }))
    }

    pub fn remove_dimension(&mut self, key: DimensionKey) -> Result<Dimension> {
        self.dimensions.remove(key).ok_or(Error::DimensionNotFound)
    }

    /// Current value of a dimension annotation.
    ///
    /// Fails with [`Error::NodeNotFound`] when an axis change removed one of its nodes.
    pub fn dimension_value(&self, key: DimensionKey) -> Result<f64> {
        let dimension = self.dimensions.get(key).ok_or(Error::DimensionNotFound)?;
        Ok(self
            .measure(dimension.node_a, dimension.node_b)?
            .get(dimension.mode))
    }

    pub(crate) fn insert_dimension(&mut self, dimension: Dimension) -> DimensionKey {
        self.dimensions.insert(dimension)
    }

    // --- Walls ---

    /// Computes spans and endpoints for a wall between two nodes.
    ///
    /// Fails when the nodes do not share a row or column, when another node
    /// stands between them, when their footprints leave no free span, or when
    /// a displacement is requested for a perimeter wall.
    pub fn plan_wall(&self, a: NodeId, b: NodeId, lateral_displacement: f64) -> Result<WallPlan> {
        let na = self.node(a)?;
        let nb = self.node(b)?;
        let tolerance = self.config.classification_tolerance;
        let direction = wall_direction(na, nb, tolerance)?;
        if let Some(between) = node_between(na, nb, direction, self.lattice.nodes(), tolerance) {
            return Err(Error::NonAdjacentNodes {
                a,
                b,
                between: between.id,
            });
        }
        let span = span::measure(na, nb, &self.config);
        let geometry = resolve_endpoints(
            na,
            nb,
            span.free,
            lateral_displacement,
            &self.perimeter,
            &self.config,
        )?;

        Ok(WallPlan {
            node_a: a,
            node_b: b,
            span,
            perimeter_side: geometry.perimeter_side,
            lateral_displacement,
            endpoints: geometry.endpoints,
            revision: self.revision,
        })
    }

    /// Opens an editing session sized to a planned wall.
    pub fn opening_editor(&self, plan: &WallPlan, request: OpeningRequest) -> OpeningEditor {
        OpeningEditor::from_request(plan.span.free, self.config.wall_height, request)
    }

    /// Commits a planned wall with its opening layout.
    ///
    /// The plan must come from the current lattice revision and match what
    /// [`Design::plan_wall`] computes for its nodes and displacement now. The
    /// layout must fit, and add up to, the plan's free span. Nothing is stored
    /// if any check fails.
    pub fn commit_wall(&mut self, plan: &WallPlan, layout: OpeningLayout) -> Result<WallKey> {
        if plan.revision != self.revision {
            return Err(Error::StalePlan {
                planned: plan.revision,
                current: self.revision,
            });
        }
        let fresh = self.plan_wall(plan.node_a, plan.node_b, plan.lateral_displacement)?;
        if fresh != *plan {
            return Err(Error::PlanMismatch {
                a: plan.node_a,
                b: plan.node_b,
            });
        }
        layout.check_against(plan.span.free, CONSERVATION_TOLERANCE)?;

        let wall = WallSegment {
            node_a: plan.node_a,
            node_b: plan.node_b,
            direction: plan.span.direction,
            perimeter_side: plan.perimeter_side,
            axis_to_axis: plan.span.axis_to_axis,
            free_span: plan.span.free,
            opening: layout,
            lateral_displacement: plan.lateral_displacement,
            endpoints: plan.endpoints,
        };
        let kind = wall.opening.kind;
        let key = self.walls.insert(wall);
        tracing::info!(
            a = %plan.node_a,
            b = %plan.node_b,
            free_span = plan.span.free,
            opening = ?kind,
            "committed wall"
        );
        Ok(key)
    }

    /// Plans, validates and commits a wall in one call.
    pub fn add_wall(
        &mut self,
        a: NodeId,
        b: NodeId,
        lateral_displacement: f64,
        request: OpeningRequest,
    ) -> Result<WallKey> {
        let plan = self.plan_wall(a, b, lateral_displacement)?;
        let layout = self.opening_editor(&plan, request).commit()?;
        self.commit_wall(&plan, layout)
    }

    pub(crate) fn insert_wall(&mut self, wall: WallSegment) -> Result<WallKey> {
        wall.opening
            .check_against(wall.free_span, CONSERVATION_TOLERANCE)?;
        Ok(self.walls.insert(wall))
    }

    /// Removes a wall. Nodes and axes are left alone.
    pub fn delete_wall(&mut self, key: WallKey) -> Result<WallSegment> {
        let wall = self.walls.remove(key).ok_or(Error::WallNotFound)?;
        tracing::info!(a = %wall.node_a, b = %wall.node_b, "deleted wall");
        Ok(wall)
    }

    /// Moves a committed interior wall sideways. Perimeter walls reject any
    /// non-zero displacement.
    pub fn set_lateral_displacement(&mut self, key: WallKey, displacement: f64) -> Result<()> {
        self.walls
            .get_mut(key)
            .ok_or(Error::WallNotFound)?
            .set_lateral_displacement(displacement)
    }

    /// True if the wall has the geometry the current lattice gives its nodes.
    pub fn wall_matches_lattice(&self, wall: &WallSegment) -> bool {
        self.plan_wall(wall.node_a, wall.node_b, wall.lateral_displacement)
            .map(|plan| plan.describes(wall))
            .unwrap_or(false)
    }

    /// Walls that no longer fit the lattice: an end node is gone, another node
    /// now stands between them, or their spans or endpoints have changed.
    pub fn detached_walls(&self) -> Vec<WallKey> {
        self.walls
            .iter()
            .filter(|(_, w)| !self.wall_matches_lattice(w))
            .map(|(k, _)| k)
            .collect()
    }
}
