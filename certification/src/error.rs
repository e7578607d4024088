//! Error types for the certification crate.

use skill_catalog::{CatalogError, SkillId, SkillLevel};

/// Error types for character and certificate operations.
///
/// Certificate queries themselves are total; these errors come from loading
/// inputs and from mutating a character's trained skills.
#[derive(Debug, thiserror::Error)]
pub enum CertificationError {
    /// Reference data failed to load or validate
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Configuration could not be parsed
    #[error("Configuration error: {0}")]
    Config(#[from] serde_yaml::Error),

    /// Configuration parsed but holds unusable values
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Skill is not part of the catalog
    #[error("Unknown skill: {0}")]
    UnknownSkill(SkillId),

    /// Skill level outside 0..=5
    #[error("Invalid level {level} for skill {skill_id}")]
    InvalidLevel { skill_id: SkillId, level: SkillLevel },
}

pub type Result<T> = std::result::Result<T, CertificationError>;
