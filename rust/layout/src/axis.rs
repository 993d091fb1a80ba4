// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Building perimeter and secondary axis store.
//!
//! Plan coordinates put the origin at the top-left perimeter corner, with `x`
//! growing to the right up to `width` and `y` growing down up to `length`.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Orientation of an axis, or direction of a span.
///
/// A vertical axis is the line `x = offset`; a horizontal axis is `y = offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

impl Orientation {
    /// Returns the other orientation.
    pub fn perpendicular(&self) -> Self {
        match self {
            Orientation::Vertical => Orientation::Horizontal,
            Orientation::Horizontal => Orientation::Vertical,
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Orientation::Vertical => f.write_str("vertical"),
            Orientation::Horizontal => f.write_str("horizontal"),
        }
    }
}

/// A secondary structural axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub orientation: Orientation,
    /// Distance from the left (vertical) or top (horizontal) perimeter edge, cm
    pub offset: f64,
}

impl Axis {
    pub fn vertical(offset: f64) -> Self {
        Self {
            orientation: Orientation::Vertical,
            offset,
        }
    }

    pub fn horizontal(offset: f64) -> Self {
        Self {
            orientation: Orientation::Horizontal,
            offset,
        }
    }
}

/// Rectangular building perimeter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Perimeter {
    /// Extent along `x`, cm
    pub width: f64,
    /// Extent along `y`, cm
    pub length: f64,
}

impl Perimeter {
    /// Creates a perimeter, rejecting non-positive or non-finite sides.
    pub fn new(width: f64, length: f64) -> Result<Self> {
        let perimeter = Self { width, length };
        perimeter.validate()?;
        Ok(perimeter)
    }

    pub fn validate(&self) -> Result<()> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if valid(self.width) && valid(self.length) {
            Ok(())
        } else {
            Err(Error::InvalidPerimeter {
                width: self.width,
                length: self.length,
            })
        }
    }

    /// Exclusive upper bound for an axis offset of the given orientation.
    pub fn limit(&self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Vertical => self.width,
            Orientation::Horizontal => self.length,
        }
    }

    /// Checks `0 < offset < limit` for the axis orientation.
    pub fn check_axis(&self, axis: &Axis) -> Result<()> {
        let limit = self.limit(axis.orientation);
        if axis.offset.is_finite() && axis.offset > 0.0 && axis.offset < limit {
            Ok(())
        } else {
            Err(Error::InvalidAxis {
                orientation: axis.orientation,
                offset: axis.offset,
                limit,
            })
        }
    }

    /// The four corners, clockwise from the origin.
    pub fn corners(&self) -> [(f64, f64); 4] {
        [
            (0.0, 0.0),
            (self.width, 0.0),
            (self.width, self.length),
            (0.0, self.length),
        ]
    }
}

/// Secondary axes in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AxisStore {
    axes: Vec<Axis>,
}

impl AxisStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an axis after checking it against the perimeter.
    pub fn add(&mut self, perimeter: &Perimeter, axis: Axis) -> Result<()> {
        perimeter.check_axis(&axis)?;
        self.axes.push(axis);
        Ok(())
    }

    /// Removes the most recently added axis.
    pub fn undo(&mut self) -> Result<Axis> {
        self.axes.pop().ok_or(Error::NoAxisToUndo)
    }

    pub fn clear(&mut self) {
        self.axes.clear();
    }

    /// Checks every stored axis against a perimeter.
    pub fn check_all(&self, perimeter: &Perimeter) -> Result<()> {
        self.axes.iter().try_for_each(|axis| perimeter.check_axis(axis))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Axis> {
        self.axes.iter()
    }

    /// Offsets of all axes with the given orientation, in insertion order.
    pub fn offsets(&self, orientation: Orientation) -> impl Iterator<Item = f64> + '_ {
        self.axes
            .iter()
            .filter(move |a| a.orientation == orientation)
            .map(|a| a.offset)
    }

    pub fn len(&self) -> usize {
        self.axes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }

    pub fn as_slice(&self) -> &[Axis] {
        &self.axes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perimeter() -> Perimeter {
        Perimeter::new(200.0, 150.0).unwrap()
    }

    #[test]
    fn rejects_degenerate_perimeter() {
        assert!(Perimeter::new(0.0, 100.0).is_err());
        assert!(Perimeter::new(100.0, -1.0).is_err());
        assert!(Perimeter::new(f64::NAN, 100.0).is_err());
    }

    #[test]
    fn axis_offset_must_be_strictly_inside() {
        let p = perimeter();
        let mut store = AxisStore::new();
        assert!(store.add(&p, Axis::vertical(100.0)).is_ok());
        assert!(store.add(&p, Axis::horizontal(149.0)).is_ok());

        for bad in [Axis::vertical(0.0), Axis::vertical(200.0), Axis::horizontal(150.0)] {
            assert!(matches!(
                store.add(&p, bad),
                Err(Error::InvalidAxis { .. })
            ));
        }
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn out_of_range_axis_reports_limit() {
        let err = perimeter().check_axis(&Axis::vertical(250.0)).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidAxis {
                orientation: Orientation::Vertical,
                offset: 250.0,
                limit: 200.0,
            }
        );
    }

    #[test]
    fn undo_removes_last_added() {
        let p = perimeter();
        let mut store = AxisStore::new();
        store.add(&p, Axis::vertical(50.0)).unwrap();
        store.add(&p, Axis::horizontal(75.0)).unwrap();

        assert_eq!(store.undo().unwrap(), Axis::horizontal(75.0));
        assert_eq!(store.undo().unwrap(), Axis::vertical(50.0));
        assert_eq!(store.undo(), Err(Error::NoAxisToUndo));
    }

    #[test]
    fn offsets_filter_by_orientation() {
        let p = perimeter();
        let mut store = AxisStore::new();
        store.add(&p, Axis::vertical(50.0)).unwrap();
        store.add(&p, Axis::horizontal(75.0)).unwrap();
        store.add(&p, Axis::vertical(120.0)).unwrap();

        let verticals: Vec<f64> = store.offsets(Orientation::Vertical).collect();
        assert_eq!(verticals, vec![50.0, 120.0]);
    }
}
