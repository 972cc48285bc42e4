//! Engine configuration and strategy selection.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Which heuristic variant drives the pipeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    /// Probe proven-safe cells first, deduce bombs by local counting.
    #[default]
    RiskFirstWithSafetyBias,
    /// Rank every unknown cell by raw risk, never deduce bombs.
    UniformRiskRanking,
}

impl Strategy {
    /// Whether the bomb-deduction stage runs.
    pub fn deduces_bombs(self) -> bool {
        matches!(self, Strategy::RiskFirstWithSafetyBias)
    }

    /// Whether the sparse fallback scan order is consulted.
    pub fn uses_scan_order(self) -> bool {
        matches!(self, Strategy::UniformRiskRanking)
    }

    pub fn tracks_risk_gain(self) -> bool {
        matches!(self, Strategy::RiskFirstWithSafetyBias)
    }
}

/// Everything an engine needs before its first probe.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    pub rows: usize,
    pub cols: usize,
    /// Known-safe starting cell as `(x, y)`.
    pub safe: (usize, usize),
    /// Mines on the board; identifying that many ends the game.
    pub num_bombs: usize,
    /// Stop at the first mine hit instead of recording it and playing on.
    #[serde(default)]
    pub end_game_on_bomb: bool,
    /// Defaults to the risk-first variant.
    #[serde(default)]
    pub strategy: Strategy,
    /// Tie-break seed; system entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl EngineConfig {
    pub fn new(cols: usize, rows: usize, safe: (usize, usize), num_bombs: usize) -> Self {
        Self {
            rows,
            cols,
            safe,
            num_bombs,
            end_game_on_bomb: false,
            strategy: Strategy::default(),
            seed: None,
        }
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_end_game_on_bomb(mut self, end_game_on_bomb: bool) -> Self {
        self.end_game_on_bomb = end_game_on_bomb;
        self
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(EngineError::InvalidConfig(format!(
                "grid must be non-empty, got {}x{}",
                self.cols, self.rows
            )));
        }
        let (sx, sy) = self.safe;
        if sx >= self.cols || sy >= self.rows {
            return Err(EngineError::InvalidConfig(format!(
                "safe cell ({sx}, {sy}) is outside the {}x{} grid",
                self.cols, self.rows
            )));
        }
        if self.num_bombs >= self.rows * self.cols {
            return Err(EngineError::InvalidConfig(format!(
                "{} mines do not fit a {}x{} grid with a safe start",
                self.num_bombs, self.cols, self.rows
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_stages() {
        let a = Strategy::RiskFirstWithSafetyBias;
        let b = Strategy::UniformRiskRanking;
        assert!(a.deduces_bombs() && !a.uses_scan_order());
        assert!(!b.deduces_bombs() && b.uses_scan_order());
    }

    #[test]
    fn test_validate() {
        assert!(EngineConfig::new(3, 3, (0, 0), 1).validate().is_ok());
        assert!(EngineConfig::new(0, 3, (0, 0), 1).validate().is_err());
        assert!(EngineConfig::new(3, 3, (3, 0), 1).validate().is_err());
        assert!(EngineConfig::new(3, 3, (0, 0), 9).validate().is_err());
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{"rows": 4, "cols": 5, "safe": [1, 2], "numBombs": 3}"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config, EngineConfig::new(5, 4, (1, 2), 3));
    }

    #[test]
    fn test_deserialize_strategy() {
        let json = r#"{"rows": 4, "cols": 5, "safe": [0, 0], "numBombs": 3,
                       "strategy": "UniformRiskRanking", "endGameOnBomb": true, "seed": 9}"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.strategy, Strategy::UniformRiskRanking);
        assert!(config.end_game_on_bomb);
        assert_eq!(config.seed, Some(9));
    }
}
