//! Pathfinder configuration.
//!
//! Every struct here deserialises with `#[serde(default)]`, so hosts can
//! supply only the fields they want to change.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Upper bound on probes per node. Together with the node's link this keeps
/// a neighbour list at nine entries or fewer.
pub const MAX_PROBES: usize = 8;

/// Bit set of surface categories. A probe only registers surfaces whose
/// layers intersect its mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const ALL: LayerMask = LayerMask(u32::MAX);
    /// Layer used for walkable tiles unless configured otherwise.
    pub const TILES: LayerMask = LayerMask(1);

    /// Mask containing the single layer `index`, or `None` past layer 31.
    pub const fn layer(index: u32) -> Option<Self> {
        match 1u32.checked_shl(index) {
            Some(bits) => Some(LayerMask(bits)),
            None => None,
        }
    }

    pub fn intersects(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }

    pub fn union(self, other: LayerMask) -> Self {
        LayerMask(self.0 | other.0)
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::TILES
    }
}

/// Geometry of the neighbour probes cast around each node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Number of probes per node, spread evenly by `angle_step_degrees`.
    pub probe_count: usize,
    /// Rotation between consecutive probes around the vertical axis.
    pub angle_step_degrees: f64,
    /// Maximum distance a probe travels downward.
    pub probe_length: f64,
    /// Height above the node at which probes start.
    pub height_margin: f64,
    /// Surface categories a probe may hit.
    pub surface_mask: LayerMask,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            probe_count: 8,
            angle_step_degrees: 45.0,
            probe_length: 4.0,
            height_margin: 1.0,
            surface_mask: LayerMask::TILES,
        }
    }
}

/// Whether linked neighbours go through the same occupancy filter as
/// spatially probed ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkOccupancy {
    /// Offer a linked node even while a mover stands on it.
    #[default]
    Ignore,
    /// Drop a linked node while it is occupied.
    Respect,
}

/// Supported search strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchStrategy {
    /// Heuristic-guided best-first search; closed nodes are never reopened.
    BestFirst,
    /// Uniform-cost relaxation; optimal for non-negative costs.
    #[default]
    Dijkstra,
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            SearchStrategy::BestFirst => "best-first",
            SearchStrategy::Dijkstra => "dijkstra",
        };
        f.write_str(value)
    }
}

/// Full configuration consumed by [`crate::Pathfinder`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathfinderConfig {
    pub probe: ProbeConfig,
    pub strategy: SearchStrategy,
    pub link_occupancy: LinkOccupancy,
}

impl PathfinderConfig {
    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_link_occupancy(mut self, policy: LinkOccupancy) -> Self {
        self.link_occupancy = policy;
        self
    }

    /// Reject configurations that would make probing meaningless.
    pub fn validate(&self) -> Result<()> {
        let probe = &self.probe;
        if probe.probe_count == 0 || probe.probe_count > MAX_PROBES {
            return Err(invalid("probe_count must be between 1 and 8"));
        }
        if !(probe.angle_step_degrees.is_finite() && probe.angle_step_degrees > 0.0) {
            return Err(invalid("angle_step_degrees must be a finite value > 0"));
        }
        // Probes past a full turn would revisit headings already cast.
        if probe.probe_count as f64 * probe.angle_step_degrees > 360.0 + 1e-9 {
            return Err(invalid("probe_count * angle_step_degrees must not exceed 360"));
        }
        if !(probe.probe_length.is_finite() && probe.probe_length >= 0.0) {
            return Err(invalid("probe_length must be a finite value >= 0"));
        }
        if !probe.height_margin.is_finite() {
            return Err(invalid("height_margin must be finite"));
        }
        if probe.surface_mask == LayerMask::NONE {
            return Err(invalid("surface_mask selects no layers"));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> Error {
    Error::InvalidConfig {
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_eight_way_probing() {
        let config = PathfinderConfig::default();
        assert_eq!(config.probe.probe_count, 8);
        assert_eq!(config.probe.angle_step_degrees, 45.0);
        assert_eq!(config.strategy, SearchStrategy::Dijkstra);
        assert_eq!(config.link_occupancy, LinkOccupancy::Ignore);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: PathfinderConfig = serde_json::from_str(
            r#"{ "strategy": "best-first", "probe": { "probe_length": 6.0 } }"#,
        )
        .expect("config parses");

        assert_eq!(config.strategy, SearchStrategy::BestFirst);
        assert_eq!(config.probe.probe_length, 6.0);
        assert_eq!(config.probe.probe_count, 8);
    }

    #[test]
    fn validate_rejects_degenerate_probes() {
        let mut config = PathfinderConfig::default();
        config.probe.probe_count = 0;
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfig { .. })
        ));

        let mut config = PathfinderConfig::default();
        config.probe.surface_mask = LayerMask::NONE;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_bounds_the_probe_ring() {
        let mut config = PathfinderConfig::default();
        config.probe.probe_count = 16;
        config.probe.angle_step_degrees = 22.5;
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfig { message }) if message.contains("probe_count")
        ));

        let mut config = PathfinderConfig::default();
        config.probe.angle_step_degrees = 0.0;
        assert!(config.validate().is_err());

        let mut config = PathfinderConfig::default();
        config.probe.angle_step_degrees = 60.0;
        assert!(config.validate().is_err());

        let mut config = PathfinderConfig::default();
        config.probe.probe_count = 4;
        config.probe.angle_step_degrees = 90.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn layer_masks_combine() {
        let ladders = LayerMask::layer(3).unwrap();
        let both = LayerMask::TILES.union(ladders);
        assert!(both.intersects(ladders));
        assert!(!LayerMask::TILES.intersects(ladders));
        assert_eq!(LayerMask::layer(0), Some(LayerMask::TILES));
    }

    #[test]
    fn layer_index_past_the_mask_width_is_none() {
        assert_eq!(LayerMask::layer(31), Some(LayerMask(1 << 31)));
        assert_eq!(LayerMask::layer(32), None);
        assert_eq!(LayerMask::layer(u32::MAX), None);
    }
}
