//! Generation and agent parameters.
//!
//! Defaults reproduce the 30×30 demo map: six mountains, one large village,
//! five drought patches, four smoothing passes, two big and eight small
//! houses. Every struct deserializes with `#[serde(default)]` so a config
//! file only needs the fields it overrides.

use serde::{Deserialize, Serialize};

use crate::agents::TieBreakPolicy;
use crate::error::ConfigError;

/// Parameters for one family of grown regions (mountains, droughts).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionParams {
    /// Number of independently seeded regions.
    pub count: usize,
    /// Inclusive bounds on each region's target cell count.
    pub min_cells: usize,
    pub max_cells: usize,
    /// Chance that a Transition neighbour is painted when proposed.
    pub bias: f64,
}

impl Default for RegionParams {
    fn default() -> Self {
        Self { count: 6, min_cells: 15, max_cells: 40, bias: 0.70 }
    }
}

impl RegionParams {
    pub fn mountains() -> Self {
        Self::default()
    }

    pub fn droughts() -> Self {
        Self { count: 5, min_cells: 10, max_cells: 25, bias: 0.60 }
    }

    fn validate(&self, name: &'static str, cells: usize) -> Result<(), ConfigError> {
        if self.min_cells > self.max_cells {
            return Err(ConfigError::InvalidRange { name, min: self.min_cells, max: self.max_cells });
        }
        check_target(name, self.max_cells, cells)?;
        check_probability(name, self.bias)
    }
}

/// Parameters for the single main village.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VillageParams {
    pub target_cells: usize,
    pub bias: f64,
    /// Seeds are drawn from `[inset, dim - 1 - inset]` on both axes.
    pub inset: usize,
    /// Required clearance from every mountain centroid.
    pub min_mountain_distance: f64,
    /// Seed attempts before falling back to the grid center.
    pub attempts: usize,
}

impl Default for VillageParams {
    fn default() -> Self {
        Self {
            target_cells: 110,
            bias: 0.85,
            inset: 5,
            min_mountain_distance: 8.0,
            attempts: 50,
        }
    }
}

/// House counts and spacing rules for the settlement planner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementParams {
    pub max_big: usize,
    pub max_small: usize,
    /// Minimum distance between two big-house anchors.
    pub min_big_spacing: f64,
    /// Minimum distance from a small house to any big-house anchor.
    pub min_small_to_big: f64,
    /// Minimum distance between two small houses.
    pub min_small_spacing: f64,
    /// Cells whose coordinate hash falls below this are small-house candidates.
    pub small_house_threshold: f64,
}

impl Default for SettlementParams {
    fn default() -> Self {
        Self {
            max_big: 2,
            max_small: 8,
            min_big_spacing: 8.0,
            min_small_to_big: 5.0,
            min_small_spacing: 3.0,
            small_house_threshold: 0.3,
        }
    }
}

/// Everything `generate_layout` needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    pub rows: usize,
    pub cols: usize,
    /// `None` draws fresh entropy for every layout.
    pub seed: Option<u64>,
    /// Width of the border ring that region growth never paints.
    pub margin: usize,
    /// Side of the top-left square kept clear for UI and start anchoring.
    pub safe_corner: usize,
    pub mountains: RegionParams,
    pub village: VillageParams,
    pub droughts: RegionParams,
    pub smoothing_iterations: usize,
    pub settlements: SettlementParams,
    /// Mountain centroids closer than this to the village are not used as traps.
    pub trap_min_distance: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            rows: 30,
            cols: 30,
            seed: None,
            margin: 2,
            safe_corner: 6,
            mountains: RegionParams::mountains(),
            village: VillageParams::default(),
            droughts: RegionParams::droughts(),
            smoothing_iterations: 4,
            settlements: SettlementParams::default(),
            trap_min_distance: 10.0,
        }
    }
}

impl LayoutParams {
    /// Smallest side length for which every seed range is non-empty.
    pub fn min_dimension(&self) -> usize {
        (2 * self.village.inset + 1).max(2 * self.margin + 1).max(3)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let min = self.min_dimension();
        if self.rows < min || self.cols < min {
            return Err(ConfigError::GridTooSmall { rows: self.rows, cols: self.cols, min });
        }
        let cells = self.rows * self.cols;
        self.mountains.validate("mountains", cells)?;
        self.droughts.validate("droughts", cells)?;
        check_target("village.target_cells", self.village.target_cells, cells)?;
        check_probability("village.bias", self.village.bias)?;
        check_probability("settlements.small_house_threshold", self.settlements.small_house_threshold)?;
        check_distance("village.min_mountain_distance", self.village.min_mountain_distance)?;
        check_distance("settlements.min_big_spacing", self.settlements.min_big_spacing)?;
        check_distance("settlements.min_small_to_big", self.settlements.min_small_to_big)?;
        check_distance("settlements.min_small_spacing", self.settlements.min_small_spacing)?;
        check_distance("trap_min_distance", self.trap_min_distance)
    }
}

/// Simulated-annealing schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnealingParams {
    pub initial_temperature: f64,
    /// Per-tick geometric decay factor.
    pub cooling_rate: f64,
    /// Temperature at or below which it clamps to exactly zero.
    pub min_temperature: f64,
}

impl Default for AnnealingParams {
    fn default() -> Self {
        Self { initial_temperature: 100.0, cooling_rate: 0.99, min_temperature: 0.1 }
    }
}

impl AnnealingParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(ConfigError::InvalidCoolingRate(self.cooling_rate));
        }
        check_temperature("initial_temperature", self.initial_temperature)?;
        check_temperature("min_temperature", self.min_temperature)
    }
}

/// Agent behaviour knobs.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub tie_break: TieBreakPolicy,
    pub annealing: AnnealingParams,
}

impl AgentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.annealing.validate()
    }
}

/// Full configuration of an interactive session.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub layout: LayoutParams,
    pub agents: AgentConfig,
}

impl SessionConfig {
    /// Parse and validate a JSON config; missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout.validate()?;
        self.agents.validate()
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidProbability { name, value })
    }
}

fn check_target(name: &'static str, target: usize, cells: usize) -> Result<(), ConfigError> {
    if target <= cells {
        Ok(())
    } else {
        Err(ConfigError::TargetTooLarge { name, target, cells })
    }
}

fn check_temperature(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidTemperature { name, value })
    }
}

fn check_distance(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidDistance { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert_eq!(SessionConfig::default().validate(), Ok(()));
    }

    #[test]
    fn tiny_grid_rejected() {
        let params = LayoutParams { rows: 8, cols: 30, ..LayoutParams::default() };
        assert!(matches!(params.validate(), Err(ConfigError::GridTooSmall { min: 11, .. })));
    }

    #[test]
    fn inverted_region_range_rejected() {
        let mut params = LayoutParams::default();
        params.droughts.min_cells = 30;
        assert!(matches!(params.validate(), Err(ConfigError::InvalidRange { name: "droughts", .. })));
    }

    #[test]
    fn region_targets_larger_than_grid_rejected() {
        let config = SessionConfig::from_json(
            r#"{"layout":{"seed":1,"village":{"target_cells":18446744073709551615}}}"#,
        );
        assert!(matches!(
            config,
            Err(ConfigError::TargetTooLarge { name: "village.target_cells", cells: 900, .. })
        ));

        let mut params = LayoutParams::default();
        params.mountains.max_cells = 901;
        assert!(matches!(params.validate(), Err(ConfigError::TargetTooLarge { name: "mountains", .. })));
        params.mountains.max_cells = 900;
        assert_eq!(params.validate(), Ok(()));
    }

    #[test]
    fn bias_outside_unit_interval_rejected() {
        let mut params = LayoutParams::default();
        params.village.bias = 1.5;
        assert!(matches!(params.validate(), Err(ConfigError::InvalidProbability { .. })));
    }

    #[test]
    fn cooling_rate_must_decay() {
        for rate in [0.0, 1.0, 1.2, f64::NAN] {
            let params = AnnealingParams { cooling_rate: rate, ..AnnealingParams::default() };
            assert!(
                matches!(params.validate(), Err(ConfigError::InvalidCoolingRate(_))),
                "rate {rate} should be rejected"
            );
        }
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = SessionConfig::from_json(
            r#"{ "layout": { "seed": 7, "rows": 20 }, "agents": { "tie_break": "StrictImprovementOnly" } }"#,
        )
        .unwrap();
        assert_eq!(config.layout.seed, Some(7));
        assert_eq!(config.layout.rows, 20);
        assert_eq!(config.layout.cols, 30);
        assert_eq!(config.agents.tie_break, TieBreakPolicy::StrictImprovementOnly);
        assert_eq!(config.agents.annealing, AnnealingParams::default());
    }

    #[test]
    fn malformed_json_reports_parse_error() {
        assert!(matches!(SessionConfig::from_json("{ nope"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn invalid_json_values_fail_validation() {
        let err = SessionConfig::from_json(r#"{ "agents": { "annealing": { "cooling_rate": 2.0 } } }"#);
        assert_eq!(err, Err(ConfigError::InvalidCoolingRate(2.0)));
    }
}
