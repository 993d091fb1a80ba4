// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Kernel configuration.
//!
//! All lengths are centimeters. The kernel never converts units; any pixel
//! scale used for drawing belongs to the caller.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How much of a corner node's footprint a free span gives up.
///
/// Dimension annotations and wall placement share this rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CornerClearance {
    /// The full footprint dimension along the span.
    #[default]
    Single,
    /// Twice the footprint dimension along the span (thick corner pier).
    Double,
}

/// Tunable constants of the layout kernel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Two generated lattice points closer than this on both axes are one node
    pub merge_tolerance: f64,
    /// Tolerance for "lies on the perimeter / on an axis" tests
    pub classification_tolerance: f64,
    /// Inward shift applied to walls drawn on the perimeter line
    pub perimeter_inset: f64,
    /// Wall height; upper bound for window heights
    pub wall_height: f64,
    /// Corner clearance rule for free spans
    pub corner_clearance: CornerClearance,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            merge_tolerance: 1.0,
            classification_tolerance: 0.1,
            perimeter_inset: 12.0,
            wall_height: 240.0,
            corner_clearance: CornerClearance::Single,
        }
    }
}

impl LayoutConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LayoutConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Checks that every constant is finite and in range.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("merge_tolerance", self.merge_tolerance),
            ("classification_tolerance", self.classification_tolerance),
            ("wall_height", self.wall_height),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if !self.perimeter_inset.is_finite() || self.perimeter_inset < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "perimeter_inset must be non-negative, got {}",
                self.perimeter_inset
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = LayoutConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.corner_clearance, CornerClearance::Single);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = LayoutConfig::from_json(r#"{"wall_height": 260.0}"#).unwrap();
        assert_eq!(config.wall_height, 260.0);
        assert_eq!(config.merge_tolerance, 1.0);
        assert_eq!(config.perimeter_inset, 12.0);
    }

    #[test]
    fn corner_rule_from_json() {
        let config = LayoutConfig::from_json(r#"{"corner_clearance": "Double"}"#).unwrap();
        assert_eq!(config.corner_clearance, CornerClearance::Double);
    }

    #[test]
    fn rejects_non_positive_tolerance() {
        let err = LayoutConfig::from_json(r#"{"merge_tolerance": 0.0}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = LayoutConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
