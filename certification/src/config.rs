//! Configuration for training-time estimation.

use serde::{Deserialize, Serialize};

use crate::character::Attributes;
use crate::error::{CertificationError, Result};

/// Training estimator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Skill points for level 1 of a rank 1 skill
    pub base_skill_points: f64,
    /// Include untrained prerequisites of required skills in estimates
    pub expand_prerequisites: bool,
    /// Attributes given to characters created without explicit ones
    pub default_attributes: Attributes,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            base_skill_points: 250.0,
            expand_prerequisites: true,
            default_attributes: Attributes::default(),
        }
    }
}

impl TrainingConfig {
    /// Load and validate config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check that every skill costs a positive number of points and that
    /// default attributes give a positive training rate.
    pub fn validate(&self) -> Result<()> {
        if !self.base_skill_points.is_finite() || self.base_skill_points <= 0.0 {
            return Err(CertificationError::InvalidConfig(format!(
                "base_skill_points must be a positive number, got {}",
                self.base_skill_points
            )));
        }
        self.default_attributes.validate()
    }
}
