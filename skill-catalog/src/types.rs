//! Core reference-data types.
//!
//! These records are loaded once from the catalog document and shared
//! read-only by every character. Nothing in this module carries
//! per-character state.
//!
//! With the `typescript` feature enabled, these types can be exported to
//! TypeScript using ts-rs.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

use crate::grade::Grade;

pub type SkillId = u32;
pub type CertificateId = u32;
pub type ClassId = u32;

/// Trained level of a skill, 0 (untrained) to [`MAX_SKILL_LEVEL`].
pub type SkillLevel = u8;

pub const MAX_SKILL_LEVEL: SkillLevel = 5;

/// Character attribute driving training speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Intelligence,
    Memory,
    Perception,
    Willpower,
    Charisma,
}

impl Attribute {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Intelligence => "intelligence",
            Self::Memory => "memory",
            Self::Perception => "perception",
            Self::Willpower => "willpower",
            Self::Charisma => "charisma",
        }
    }
}

/// A skill that must be trained to at least `level`.
///
/// Generic: it says nothing about whether any particular character meets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct SkillRequirement {
    pub skill_id: SkillId,
    pub level: SkillLevel,
}

impl SkillRequirement {
    pub fn new(skill_id: SkillId, level: SkillLevel) -> Self {
        Self { skill_id, level }
    }

    /// True if `other` asks for the same skill at this level or higher.
    pub fn is_covered_by(&self, other: &SkillRequirement) -> bool {
        self.skill_id == other.skill_id && self.level <= other.level
    }
}

/// A trainable skill.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct StaticSkill {
    pub id: SkillId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Skill group name (e.g. "Gunnery")
    #[serde(default)]
    pub group: String,
    /// Training time multiplier
    pub rank: u32,
    pub primary: Attribute,
    pub secondary: Attribute,
    /// Skills that must be trained before this one can be
    #[serde(default)]
    pub prerequisites: Vec<SkillRequirement>,
}

/// Grouping tag for certificates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct CertificateClass {
    pub id: ClassId,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl fmt::Display for CertificateClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Global definition of a certificate.
///
/// `prerequisites` is keyed by grade; a grade missing from the map (or
/// mapped to an empty list) has no level for this certificate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct StaticCertificate {
    pub id: CertificateId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub class_id: ClassId,
    /// Names of the ships this certificate is recommended for
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub prerequisites: BTreeMap<Grade, Vec<SkillRequirement>>,
}

impl StaticCertificate {
    /// Requirements defined for `grade`, or `None` if the grade has none.
    pub fn prerequisites_for(&self, grade: Grade) -> Option<&[SkillRequirement]> {
        self.prerequisites
            .get(&grade)
            .map(|reqs| reqs.as_slice())
            .filter(|reqs| !reqs.is_empty())
    }

    /// Grades that have at least one requirement, ascending.
    pub fn defined_grades(&self) -> impl Iterator<Item = Grade> + '_ {
        Grade::ALL
            .into_iter()
            .filter(move |grade| self.prerequisites_for(*grade).is_some())
    }
}

impl fmt::Display for StaticCertificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
