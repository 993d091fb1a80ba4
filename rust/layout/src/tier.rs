// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structural tier catalog.
//!
//! A tier identifies which storey of how many the design describes ("1 of 2"
//! is the ground floor of a two-storey building) and fixes the default node
//! footprint. Lower storeys of taller buildings carry heavier columns.

use serde::{Deserialize, Serialize};

use crate::axis::Orientation;
use crate::error::{Error, Result};

/// Physical size of the structural element at a node, in centimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    /// Extent along the plan x axis
    pub width: f64,
    /// Extent along the plan y axis
    pub height: f64,
}

impl Footprint {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns the footprint turned by 90 degrees.
    pub fn rotated(&self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    /// Extent of the footprint along a direction.
    pub fn along(&self, direction: Orientation) -> f64 {
        match direction {
            Orientation::Horizontal => self.width,
            Orientation::Vertical => self.height,
        }
    }
}

/// A structural tier ("level").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    #[serde(rename = "1 of 1")]
    OneOfOne,
    #[serde(rename = "1 of 2")]
    OneOfTwo,
    #[serde(rename = "2 of 2")]
    TwoOfTwo,
    #[serde(rename = "1 of 3")]
    OneOfThree,
    #[serde(rename = "2 of 3")]
    TwoOfThree,
    #[serde(rename = "3 of 3")]
    ThreeOfThree,
}

impl Tier {
    /// Every tier in catalog order.
    pub const ALL: [Tier; 6] = [
        Tier::OneOfOne,
        Tier::OneOfTwo,
        Tier::TwoOfTwo,
        Tier::OneOfThree,
        Tier::TwoOfThree,
        Tier::ThreeOfThree,
    ];

    /// Looks a tier up by its identifier, e.g. `"2 of 3"`.
    pub fn from_id(id: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.id() == id.trim())
            .ok_or_else(|| Error::UnknownTier(id.to_string()))
    }

    /// Returns the tier identifier.
    pub fn id(&self) -> &'static str {
        match self {
            Tier::OneOfOne => "1 of 1",
            Tier::OneOfTwo => "1 of 2",
            Tier::TwoOfTwo => "2 of 2",
            Tier::OneOfThree => "1 of 3",
            Tier::TwoOfThree => "2 of 3",
            Tier::ThreeOfThree => "3 of 3",
        }
    }

    /// Storey this tier describes, counted from the ground (1-based).
    pub fn level(&self) -> u8 {
        match self {
            Tier::OneOfOne | Tier::OneOfTwo | Tier::OneOfThree => 1,
            Tier::TwoOfTwo | Tier::TwoOfThree => 2,
            Tier::ThreeOfThree => 3,
        }
    }

    /// Total number of storeys of the building.
    pub fn storeys(&self) -> u8 {
        match self {
            Tier::OneOfOne => 1,
            Tier::OneOfTwo | Tier::TwoOfTwo => 2,
            Tier::OneOfThree | Tier::TwoOfThree | Tier::ThreeOfThree => 3,
        }
    }

    /// Default node footprint. On the finest tier this is the horizontal
    /// orientation; see [`Tier::allows_orientation`].
    pub fn footprint(&self) -> Footprint {
        match self {
            Tier::OneOfOne => Footprint::new(20.0, 12.0),
            Tier::OneOfTwo => Footprint::new(25.0, 25.0),
            Tier::TwoOfTwo => Footprint::new(20.0, 20.0),
            Tier::OneOfThree => Footprint::new(30.0, 30.0),
            Tier::TwoOfThree => Footprint::new(25.0, 25.0),
            Tier::ThreeOfThree => Footprint::new(20.0, 20.0),
        }
    }

    /// Only the single-storey tier has rectangular piers that can be turned per node.
    pub fn allows_orientation(&self) -> bool {
        matches!(self, Tier::OneOfOne)
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for Tier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Tier::from_id(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_lookup() {
        for tier in Tier::ALL {
            assert_eq!(Tier::from_id(tier.id()).unwrap(), tier);
        }
    }

    #[test]
    fn unknown_tier_is_configuration_error() {
        assert_eq!(
            Tier::from_id("4 of 3"),
            Err(Error::UnknownTier("4 of 3".to_string()))
        );
    }

    #[test]
    fn level_never_exceeds_storeys() {
        for tier in Tier::ALL {
            assert!(tier.level() >= 1);
            assert!(tier.level() <= tier.storeys());
        }
    }

    #[test]
    fn only_finest_tier_allows_orientation() {
        let allowing: Vec<_> = Tier::ALL
            .into_iter()
            .filter(|t| t.allows_orientation())
            .collect();
        assert_eq!(allowing, vec![Tier::OneOfOne]);
    }

    #[test]
    fn serde_uses_tier_id() {
        let json = serde_json::to_string(&Tier::TwoOfThree).unwrap();
        assert_eq!(json, "\"2 of 3\"");
        let back: Tier = serde_json::from_str("\"1 of 2\"").unwrap();
        assert_eq!(back, Tier::OneOfTwo);
    }

    #[test]
    fn footprint_rotation_and_extent() {
        let fp = Tier::OneOfOne.footprint();
        assert_eq!(fp.along(Orientation::Horizontal), 20.0);
        assert_eq!(fp.along(Orientation::Vertical), 12.0);
        assert_eq!(fp.rotated(), Footprint::new(12.0, 20.0));
    }
}
