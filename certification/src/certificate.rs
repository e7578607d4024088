//! A certificate as seen by one character.
//!
//! Wraps the shared [`StaticCertificate`] definition with one
//! [`CertificateLevel`] slot per grade that the definition populates. The
//! slot array is fixed at construction; only each slot's cached trained flag
//! changes afterwards, through [`Certificate::refresh_status`].
//!
//! Trained flags are reported per slot exactly as the levels compute them.
//! Nothing forces them to be monotonic across grades, so a higher grade can
//! be trained while a lower one is not.

use std::fmt;
use std::sync::Arc;

use chrono::Duration;
use tracing::debug;

use skill_catalog::{CertificateClass, CertificateId, Grade, StaticCertificate};

use crate::character::{CharacterSkillRequirement, SkillOwner};
use crate::level::CertificateLevel;

/// Per-character view of one certificate definition.
///
/// `refresh_status` takes `&mut self`, so refreshes are serialized with every
/// read of the same certificate by the borrow checker.
pub struct Certificate {
    definition: Arc<StaticCertificate>,
    class: Arc<CertificateClass>,
    owner: Arc<dyn SkillOwner>,
    levels: [Option<CertificateLevel>; Grade::COUNT],
}

impl Certificate {
    /// Bind `definition` to `owner`, creating a slot for every grade the
    /// definition lists requirements for.
    pub fn new(
        owner: Arc<dyn SkillOwner>,
        definition: Arc<StaticCertificate>,
        class: Arc<CertificateClass>,
    ) -> Self {
        let mut lower = Vec::new();
        let levels = Grade::ALL.map(|grade| {
            let prerequisites = definition.prerequisites_for(grade)?;
            let level = CertificateLevel::new(grade, prerequisites, &lower, owner.clone());
            lower.extend_from_slice(prerequisites);
            Some(level)
        });

        Self {
            definition,
            class,
            owner,
            levels,
        }
    }

    pub fn id(&self) -> CertificateId {
        self.definition.id
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn description(&self) -> &str {
        &self.definition.description
    }

    pub fn class(&self) -> &Arc<CertificateClass> {
        &self.class
    }

    pub fn recommendations(&self) -> &[String] {
        &self.definition.recommendations
    }

    pub fn definition(&self) -> &Arc<StaticCertificate> {
        &self.definition
    }

    pub fn owner(&self) -> &Arc<dyn SkillOwner> {
        &self.owner
    }

    /// Slot for `grade`, if the definition populates it.
    pub fn level(&self, grade: Grade) -> Option<&CertificateLevel> {
        self.levels[grade.index()].as_ref()
    }

    pub fn basic(&self) -> Option<&CertificateLevel> {
        self.level(Grade::Basic)
    }

    pub fn standard(&self) -> Option<&CertificateLevel> {
        self.level(Grade::Standard)
    }

    pub fn improved(&self) -> Option<&CertificateLevel> {
        self.level(Grade::Improved)
    }

    pub fn advanced(&self) -> Option<&CertificateLevel> {
        self.level(Grade::Advanced)
    }

    pub fn elite(&self) -> Option<&CertificateLevel> {
        self.level(Grade::Elite)
    }

    /// Populated slots in ascending grade order.
    ///
    /// Walks the slot array on every call; nothing is cached.
    pub fn all_levels(&self) -> impl Iterator<Item = &CertificateLevel> + '_ {
        self.levels.iter().flatten()
    }

    /// Refresh every populated slot. Returns true if any slot's trained
    /// flag flipped.
    pub fn refresh_status(&mut self) -> bool {
        let mut changed = false;
        for level in self.levels.iter_mut().flatten() {
            if level.refresh_status() {
                debug!(
                    certificate = %self.definition.name,
                    grade = %level.grade(),
                    trained = level.is_trained(),
                    character = %self.owner.name(),
                    "Certificate level status changed"
                );
                changed = true;
            }
        }
        changed
    }

    /// Top-level requirements of every populated slot, grade order then slot
    /// order, resolved against the owner. Duplicates across slots are kept.
    pub fn all_top_prerequisite_skills(
        &self,
    ) -> impl Iterator<Item = CharacterSkillRequirement> + '_ {
        self.all_levels()
            .flat_map(|level| level.resolved_top_prerequisite_skills())
    }

    /// Time for the owner to train every grade of this certificate.
    pub fn training_time(&self) -> Duration {
        let requirements: Vec<_> = self.all_top_prerequisite_skills().collect();
        self.owner.training_time(&requirements)
    }

    /// Lowest populated slot whose trained flag is false.
    pub fn lowest_untrained_level(&self) -> Option<&CertificateLevel> {
        self.all_levels().find(|level| !level.is_trained())
    }

    /// Highest populated slot whose trained flag is true.
    pub fn highest_trained_level(&self) -> Option<&CertificateLevel> {
        self.levels
            .iter()
            .rev()
            .flatten()
            .find(|level| level.is_trained())
    }
}

impl fmt::Display for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.definition, f)
    }
}

impl fmt::Debug for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Certificate")
            .field("id", &self.definition.id)
            .field("name", &self.definition.name)
            .field("owner", &self.owner.name())
            .field("levels", &self.levels)
            .finish()
    }
}

/// Reference data behind a certificate, if there is one.
pub fn definition_of(certificate: Option<&Certificate>) -> Option<&StaticCertificate> {
    certificate.map(|cert| cert.definition.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, HashMap};
    use std::sync::Mutex;

    use skill_catalog::{SkillId, SkillRequirement};

    #[derive(Default)]
    struct FixedOwner {
        levels: Mutex<HashMap<SkillId, u8>>,
    }

    impl FixedOwner {
        fn set(&self, skill_id: SkillId, level: u8) {
            self.levels.lock().unwrap().insert(skill_id, level);
        }
    }

    impl SkillOwner for FixedOwner {
        fn name(&self) -> &str {
            "fixed"
        }

        fn skill_level(&self, skill_id: SkillId) -> u8 {
            self.levels.lock().unwrap().get(&skill_id).copied().unwrap_or(0)
        }

        fn training_time(&self, requirements: &[CharacterSkillRequirement]) -> Duration {
            Duration::minutes(requirements.iter().map(|r| i64::from(r.missing_levels())).sum())
        }
    }

    fn make_certificate(
        grades: &[(Grade, Vec<SkillRequirement>)],
        owner: Arc<FixedOwner>,
    ) -> Certificate {
        let prerequisites: BTreeMap<_, _> = grades.iter().cloned().collect();
        let definition = StaticCertificate {
            id: 7,
            name: "Armor Tanking".to_string(),
            description: "Keep plates on.".to_string(),
            class_id: 3,
            recommendations: vec!["Punisher".to_string()],
            prerequisites,
        };
        let class = CertificateClass {
            id: 3,
            name: "Defense".to_string(),
            description: String::new(),
        };
        Certificate::new(owner, Arc::new(definition), Arc::new(class))
    }

    fn req(skill_id: SkillId, level: u8) -> SkillRequirement {
        SkillRequirement::new(skill_id, level)
    }

    #[test]
    fn test_slots_for_every_grade_subset() {
        for mask in 0u32..(1 << Grade::COUNT) {
            let defined: Vec<Grade> = Grade::ALL
                .into_iter()
                .filter(|grade| mask & (1 << grade.index()) != 0)
                .collect();
            let grades: Vec<_> = defined
                .iter()
                .map(|grade| (*grade, vec![req(grade.index() as SkillId + 1, 1)]))
                .collect();
            let cert = make_certificate(&grades, Arc::new(FixedOwner::default()));

            assert_eq!(cert.all_levels().count(), defined.len(), "mask {:05b}", mask);
            let listed: Vec<Grade> = cert.all_levels().map(|level| level.grade()).collect();
            assert_eq!(listed, defined, "mask {:05b}", mask);
            for grade in Grade::ALL {
                let slot = cert.level(grade);
                assert_eq!(slot.is_some(), defined.contains(&grade), "mask {:05b}", mask);
                if let Some(level) = slot {
                    assert_eq!(level.grade(), grade);
                }
            }
        }
    }

    #[test]
    fn test_slots_match_defined_grades() {
        let owner = Arc::new(FixedOwner::default());
        let cert = make_certificate(
            &[
                (Grade::Standard, vec![req(1, 2)]),
                (Grade::Advanced, vec![req(1, 4)]),
                (Grade::Elite, Vec::new()),
            ],
            owner,
        );

        assert!(cert.basic().is_none());
        assert_eq!(cert.standard().map(|l| l.grade()), Some(Grade::Standard));
        assert!(cert.improved().is_none());
        assert_eq!(cert.advanced().map(|l| l.grade()), Some(Grade::Advanced));
        assert!(cert.elite().is_none());
        assert_eq!(cert.all_levels().count(), 2);
    }

    #[test]
    fn test_descriptive_fields_forward_to_definition() {
        let owner = Arc::new(FixedOwner::default());
        let cert = make_certificate(&[(Grade::Basic, vec![req(1, 1)])], owner);

        assert_eq!(cert.id(), 7);
        assert_eq!(cert.name(), "Armor Tanking");
        assert_eq!(cert.description(), "Keep plates on.");
        assert_eq!(cert.class().name, "Defense");
        assert_eq!(cert.recommendations(), &["Punisher".to_string()]);
        assert_eq!(cert.to_string(), "Armor Tanking");
        assert_eq!(cert.owner().name(), "fixed");
    }

    #[test]
    fn test_refresh_with_no_slots_is_false() {
        let owner = Arc::new(FixedOwner::default());
        let mut cert = make_certificate(&[], owner);
        assert!(!cert.refresh_status());
        assert!(cert.lowest_untrained_level().is_none());
        assert!(cert.highest_trained_level().is_none());
    }

    #[test]
    fn test_refresh_visits_every_slot() {
        let owner = Arc::new(FixedOwner::default());
        let mut cert = make_certificate(
            &[
                (Grade::Basic, vec![req(1, 1)]),
                (Grade::Improved, vec![req(2, 1)]),
            ],
            owner.clone(),
        );

        owner.set(1, 1);
        owner.set(2, 1);
        assert!(cert.refresh_status());
        // Both flags flipped in the same pass, not just the first
        assert!(cert.basic().unwrap().is_trained());
        assert!(cert.improved().unwrap().is_trained());
        assert!(!cert.refresh_status());
    }

    #[test]
    fn test_top_prerequisites_follow_grade_order() {
        let owner = Arc::new(FixedOwner::default());
        owner.set(2, 1);
        let cert = make_certificate(
            &[
                (Grade::Elite, vec![req(1, 5), req(3, 1)]),
                (Grade::Basic, vec![req(1, 1), req(2, 3)]),
            ],
            owner,
        );

        let skills: Vec<_> = cert
            .all_top_prerequisite_skills()
            .map(|r| (r.requirement, r.trained_level))
            .collect();
        assert_eq!(
            skills,
            vec![
                (req(1, 1), 0),
                (req(2, 3), 1),
                (req(1, 5), 0),
                (req(3, 1), 0),
            ]
        );
        // 1 + 2 + 5 + 1 missing levels at one minute each
        assert_eq!(cert.training_time(), Duration::minutes(9));
    }

    #[test]
    fn test_definition_of() {
        let owner = Arc::new(FixedOwner::default());
        let cert = make_certificate(&[(Grade::Basic, vec![req(1, 1)])], owner);

        assert_eq!(definition_of(Some(&cert)).map(|d| d.id), Some(7));
        assert!(definition_of(None).is_none());
    }
}
