use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{EngineError, Result};

/// Search parameters. Noise is off by default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MctsConfig {
    /// Simulations per search; must be at least 1.
    pub num_simulations: u32,
    /// Exploration constant in the selection score.
    pub c_puct: f32,
    /// Root Dirichlet noise concentration; 0 disables noise.
    pub dirichlet_alpha: f32,
    /// Weight of the noise when mixed into root priors.
    pub dirichlet_epsilon: f32,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            num_simulations: 100,
            c_puct: 1.0,
            dirichlet_alpha: 0.0,
            dirichlet_epsilon: 0.25,
        }
    }
}

impl MctsConfig {
    pub fn with_simulations(mut self, n: u32) -> Self {
        self.num_simulations = n;
        self
    }

    pub fn with_c_puct(mut self, c: f32) -> Self {
        self.c_puct = c;
        self
    }

    pub fn with_dirichlet(mut self, alpha: f32, epsilon: f32) -> Self {
        self.dirichlet_alpha = alpha;
        self.dirichlet_epsilon = epsilon;
        self
    }

    pub fn noise_enabled(&self) -> bool {
        self.dirichlet_alpha > 0.0 && self.dirichlet_epsilon > 0.0
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_simulations == 0 {
            return Err(EngineError::InvalidConfig("num_simulations must be at least 1".into()));
        }
        if !self.c_puct.is_finite() || self.c_puct < 0.0 {
            return Err(EngineError::InvalidConfig(format!("c_puct must be finite and >= 0, got {}", self.c_puct)));
        }
        if !self.dirichlet_alpha.is_finite() || self.dirichlet_alpha < 0.0 {
            return Err(EngineError::InvalidConfig(format!("dirichlet_alpha must be >= 0, got {}", self.dirichlet_alpha)));
        }
        if !(0.0..=1.0).contains(&self.dirichlet_epsilon) {
            return Err(EngineError::InvalidConfig(format!(
                "dirichlet_epsilon must be in [0, 1], got {}",
                self.dirichlet_epsilon
            )));
        }
        Ok(())
    }

    /// Load from a JSON file; missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("read search config: {}", path.as_ref().display()))?;
        let cfg: MctsConfig = serde_json::from_str(&text).context("parse search config")?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = MctsConfig::default();
        assert_eq!(cfg.num_simulations, 100);
        assert!((cfg.c_puct - 1.0).abs() < 1e-6);
        assert!(!cfg.noise_enabled());
        cfg.validate().unwrap();
    }

    #[test]
    fn test_builder_pattern() {
        let cfg = MctsConfig::default().with_simulations(10).with_c_puct(1.5).with_dirichlet(0.3, 0.25);
        assert_eq!(cfg.num_simulations, 10);
        assert!(cfg.noise_enabled());
        cfg.validate().unwrap();
    }

    #[test]
    fn test_rejects_degenerate() {
        assert!(matches!(MctsConfig::default().with_simulations(0).validate(), Err(EngineError::InvalidConfig(_))));
        assert!(MctsConfig::default().with_c_puct(f32::NAN).validate().is_err());
        assert!(MctsConfig::default().with_dirichlet(0.3, 1.5).validate().is_err());
        assert!(MctsConfig::default().with_dirichlet(-1.0, 0.25).validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg: MctsConfig = serde_json::from_str(r#"{ "num_simulations": 400 }"#).unwrap();
        assert_eq!(cfg.num_simulations, 400);
        assert_eq!(cfg.c_puct, MctsConfig::default().c_puct);
    }
}
