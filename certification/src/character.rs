//! Characters and training-time estimation.
//!
//! A character is the actor whose progress certificates report on. The
//! certificate layer only sees the [`SkillOwner`] trait; [`Character`] is the
//! catalog-backed implementation.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Duration;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use skill_catalog::{
    Attribute, Catalog, SkillId, SkillLevel, SkillRequirement, StaticSkill, MAX_SKILL_LEVEL,
};

use crate::config::TrainingConfig;
use crate::error::{CertificationError, Result};

/// Actor contract consumed by certificates.
pub trait SkillOwner: Send + Sync {
    /// Display name, used in log fields
    fn name(&self) -> &str;

    /// Currently trained level of a skill (0 if untrained or unknown).
    fn skill_level(&self, skill_id: SkillId) -> SkillLevel;

    /// Bind a generic requirement to this owner's trained level.
    fn resolve(&self, requirement: &SkillRequirement) -> CharacterSkillRequirement {
        CharacterSkillRequirement {
            requirement: *requirement,
            trained_level: self.skill_level(requirement.skill_id),
        }
    }

    /// Total time to train every requirement from the current state.
    fn training_time(&self, requirements: &[CharacterSkillRequirement]) -> Duration;
}

/// A skill requirement as seen by one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterSkillRequirement {
    pub requirement: SkillRequirement,
    pub trained_level: SkillLevel,
}

impl CharacterSkillRequirement {
    pub fn skill_id(&self) -> SkillId {
        self.requirement.skill_id
    }

    pub fn is_trained(&self) -> bool {
        self.trained_level >= self.requirement.level
    }

    /// Levels still to train, 0 once met.
    pub fn missing_levels(&self) -> SkillLevel {
        self.requirement.level.saturating_sub(self.trained_level)
    }
}

/// Base attribute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub intelligence: u32,
    pub memory: u32,
    pub perception: u32,
    pub willpower: u32,
    pub charisma: u32,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            intelligence: 20,
            memory: 20,
            perception: 20,
            willpower: 20,
            charisma: 19,
        }
    }
}

impl Attributes {
    pub fn get(&self, attribute: Attribute) -> u32 {
        match attribute {
            Attribute::Intelligence => self.intelligence,
            Attribute::Memory => self.memory,
            Attribute::Perception => self.perception,
            Attribute::Willpower => self.willpower,
            Attribute::Charisma => self.charisma,
        }
    }

    /// Reject attribute sets with a zero value, which would stall training.
    pub fn validate(&self) -> Result<()> {
        let all = [
            Attribute::Intelligence,
            Attribute::Memory,
            Attribute::Perception,
            Attribute::Willpower,
            Attribute::Charisma,
        ];
        match all.into_iter().find(|attr| self.get(*attr) == 0) {
            Some(attr) => Err(CertificationError::InvalidConfig(format!(
                "attribute {} must be greater than zero",
                attr.as_str()
            ))),
            None => Ok(()),
        }
    }

    /// Skill points gained per minute for a skill trained on these attributes.
    pub fn skill_points_per_minute(&self, primary: Attribute, secondary: Attribute) -> f64 {
        f64::from(self.get(primary)) + f64::from(self.get(secondary)) / 2.0
    }
}

/// Trained state of one skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrainedSkill {
    pub level: SkillLevel,
    pub skill_points: u64,
}

/// A character backed by the shared catalog.
///
/// Trained skills live in a concurrent map so certificates can hold the
/// character behind an `Arc` while training keeps progressing.
pub struct Character {
    id: u64,
    name: String,
    attributes: Attributes,
    catalog: Arc<Catalog>,
    config: TrainingConfig,
    skills: DashMap<SkillId, TrainedSkill>,
}

impl Character {
    /// Create a character with no trained skills and default attributes.
    pub fn new(id: u64, name: impl Into<String>, catalog: Arc<Catalog>) -> Self {
        Self {
            id,
            name: name.into(),
            attributes: Attributes::default(),
            catalog,
            config: TrainingConfig::default(),
            skills: DashMap::new(),
        }
    }

    /// Create a character with custom training settings.
    pub fn with_config(
        id: u64,
        name: impl Into<String>,
        catalog: Arc<Catalog>,
        config: TrainingConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            id,
            name: name.into(),
            attributes: config.default_attributes,
            catalog,
            config,
            skills: DashMap::new(),
        })
    }

    /// Builder: set attributes. Every attribute must be non-zero.
    pub fn with_attributes(mut self, attributes: Attributes) -> Result<Self> {
        attributes.validate()?;
        self.attributes = attributes;
        Ok(self)
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn skill_points(&self, skill_id: SkillId) -> u64 {
        self.skills
            .get(&skill_id)
            .map(|s| s.skill_points)
            .unwrap_or(0)
    }

    /// Set a skill to exactly `level`, with the skill points that level requires.
    pub fn set_skill(&self, skill_id: SkillId, level: SkillLevel) -> Result<()> {
        let skill = self.lookup(skill_id)?;
        if level > MAX_SKILL_LEVEL {
            return Err(CertificationError::InvalidLevel { skill_id, level });
        }
        let skill_points = self.skill_points_for_level(skill, level);
        debug!(character = %self.name, skill_id, level, "Set skill level");
        self.skills.insert(
            skill_id,
            TrainedSkill {
                level,
                skill_points,
            },
        );
        Ok(())
    }

    /// Set raw skill points; the level becomes the highest one they cover.
    pub fn set_skill_points(&self, skill_id: SkillId, skill_points: u64) -> Result<()> {
        let skill = self.lookup(skill_id)?;
        let level = (1..=MAX_SKILL_LEVEL)
            .rev()
            .find(|lvl| self.skill_points_for_level(skill, *lvl) <= skill_points)
            .unwrap_or(0);
        self.skills.insert(
            skill_id,
            TrainedSkill {
                level,
                skill_points,
            },
        );
        Ok(())
    }

    /// Skill points needed to reach `level` of `skill` from zero.
    pub fn skill_points_for_level(&self, skill: &StaticSkill, level: SkillLevel) -> u64 {
        if level == 0 {
            return 0;
        }
        let exponent = 2.5 * f64::from(level - 1);
        let points = self.config.base_skill_points * f64::from(skill.rank) * exponent.exp2();
        points.ceil() as u64
    }

    fn lookup(&self, skill_id: SkillId) -> Result<&StaticSkill> {
        self.catalog
            .skill(skill_id)
            .ok_or(CertificationError::UnknownSkill(skill_id))
    }

    /// Highest target level per skill, with prerequisites folded in when enabled.
    fn training_targets(
        &self,
        requirements: &[CharacterSkillRequirement],
    ) -> BTreeMap<SkillId, SkillLevel> {
        let mut targets: BTreeMap<SkillId, SkillLevel> = BTreeMap::new();
        let mut pending: Vec<SkillRequirement> =
            requirements.iter().map(|r| r.requirement).collect();

        while let Some(req) = pending.pop() {
            let seen = targets.get(&req.skill_id).copied();
            if seen.is_some_and(|lvl| lvl >= req.level) {
                continue;
            }
            // Met requirements cost nothing and pull in no prerequisites,
            // even if those prerequisites were never trained.
            if self.skill_level(req.skill_id) >= req.level {
                continue;
            }
            targets.insert(req.skill_id, req.level);

            // First visit of this skill: queue its own prerequisites once.
            if seen.is_none() && self.config.expand_prerequisites {
                if let Some(skill) = self.catalog.skill(req.skill_id) {
                    pending.extend(skill.prerequisites.iter().copied());
                }
            }
        }

        targets
    }
}

impl SkillOwner for Character {
    fn name(&self) -> &str {
        &self.name
    }

    fn skill_level(&self, skill_id: SkillId) -> SkillLevel {
        self.skills.get(&skill_id).map(|s| s.level).unwrap_or(0)
    }

    fn training_time(&self, requirements: &[CharacterSkillRequirement]) -> Duration {
        let mut minutes = 0.0_f64;

        for (skill_id, target) in self.training_targets(requirements) {
            let Some(skill) = self.catalog.skill(skill_id) else {
                warn!(character = %self.name, skill_id, "Skipping unknown skill in estimate");
                continue;
            };
            let needed = self.skill_points_for_level(skill, target);
            let current = self.skill_points(skill_id);
            if needed <= current {
                continue;
            }
            // Attributes are validated non-zero, so the rate is positive.
            let rate = self
                .attributes
                .skill_points_per_minute(skill.primary, skill.secondary);
            minutes += (needed - current) as f64 / rate;
        }

        Duration::milliseconds((minutes * 60_000.0).round() as i64)
    }
}
