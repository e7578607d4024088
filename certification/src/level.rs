//! Per-character state for one grade of one certificate.

use std::sync::Arc;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use skill_catalog::{Grade, SkillRequirement};

use crate::character::{CharacterSkillRequirement, SkillOwner};

/// How far a character is through one certificate level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificateStatus {
    /// No requirement met
    Untrained,
    /// Some but not all requirements met
    PartiallyTrained,
    /// Every requirement met
    Trained,
}

/// One populated grade slot of a certificate, bound to its owner.
///
/// `is_trained` is a cached flag. It starts out `false` and only changes
/// through [`CertificateLevel::refresh_status`].
pub struct CertificateLevel {
    grade: Grade,
    prerequisites: Vec<SkillRequirement>,
    top_prerequisites: Vec<SkillRequirement>,
    owner: Arc<dyn SkillOwner>,
    is_trained: bool,
}

impl CertificateLevel {
    /// Build the slot for `grade`.
    ///
    /// `lower` holds the requirements of every lower grade of the same
    /// certificate; requirements already met or exceeded there are left out
    /// of the top-level set.
    pub fn new(
        grade: Grade,
        prerequisites: &[SkillRequirement],
        lower: &[SkillRequirement],
        owner: Arc<dyn SkillOwner>,
    ) -> Self {
        let top_prerequisites = top_level(prerequisites, lower);
        Self {
            grade,
            prerequisites: prerequisites.to_vec(),
            top_prerequisites,
            owner,
            is_trained: false,
        }
    }

    pub fn grade(&self) -> Grade {
        self.grade
    }

    /// Requirements exactly as the reference data lists them.
    pub fn prerequisite_skills(&self) -> &[SkillRequirement] {
        &self.prerequisites
    }

    /// Requirements not already implied by a lower grade, one per skill.
    pub fn top_prerequisite_skills(&self) -> &[SkillRequirement] {
        &self.top_prerequisites
    }

    /// Cached result of the last refresh.
    pub fn is_trained(&self) -> bool {
        self.is_trained
    }

    /// Live status computed from the owner's current skills.
    pub fn status(&self) -> CertificateStatus {
        let met = self
            .prerequisites
            .iter()
            .filter(|req| self.owner.resolve(req).is_trained())
            .count();

        if met == self.prerequisites.len() {
            CertificateStatus::Trained
        } else if met == 0 {
            CertificateStatus::Untrained
        } else {
            CertificateStatus::PartiallyTrained
        }
    }

    /// Re-evaluate the trained flag. Returns true if it flipped.
    pub fn refresh_status(&mut self) -> bool {
        let trained = self
            .prerequisites
            .iter()
            .all(|req| self.owner.resolve(req).is_trained());
        let changed = trained != self.is_trained;
        self.is_trained = trained;
        changed
    }

    /// Top-level requirements bound to the owner's trained levels.
    pub fn resolved_top_prerequisite_skills(
        &self,
    ) -> impl Iterator<Item = CharacterSkillRequirement> + '_ {
        self.top_prerequisites
            .iter()
            .map(|req| self.owner.resolve(req))
    }

    /// Time to train this grade alone.
    pub fn training_time(&self) -> Duration {
        let resolved: Vec<_> = self.resolved_top_prerequisite_skills().collect();
        self.owner.training_time(&resolved)
    }
}

impl std::fmt::Debug for CertificateLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CertificateLevel")
            .field("grade", &self.grade)
            .field("owner", &self.owner.name())
            .field("prerequisites", &self.prerequisites)
            .field("is_trained", &self.is_trained)
            .finish()
    }
}

/// Own requirements minus those covered by `lower`, keeping the highest
/// level per skill in first-appearance order.
fn top_level(own: &[SkillRequirement], lower: &[SkillRequirement]) -> Vec<SkillRequirement> {
    let mut top: Vec<SkillRequirement> = Vec::with_capacity(own.len());
    for req in own {
        if lower.iter().any(|l| req.is_covered_by(l)) {
            continue;
        }
        match top.iter_mut().find(|t| t.skill_id == req.skill_id) {
            Some(existing) => existing.level = existing.level.max(req.level),
            None => top.push(*req),
        }
    }
    top
}
