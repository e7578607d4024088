//! Catalog loading and lookup.
//!
//! A [`Catalog`] is built once from a [`CatalogDocument`] and never mutated.
//! Reloading reference data means building a new catalog; callers compare
//! [`Catalog::content_hash`] to find out whether anything changed.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::types::*;

/// Error types for catalog loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid YAML catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid JSON catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: u32 },

    #[error("{owner} references unknown skill {skill_id}")]
    UnknownSkill { owner: String, skill_id: SkillId },

    #[error("Certificate {certificate_id} references unknown class {class_id}")]
    UnknownClass {
        certificate_id: CertificateId,
        class_id: ClassId,
    },

    #[error("{owner} requires skill {skill_id} at invalid level {level}")]
    InvalidLevel {
        owner: String,
        skill_id: SkillId,
        level: SkillLevel,
    },

    #[error("Skill {0} has rank 0")]
    InvalidRank(SkillId),

    #[error("Skill prerequisites form a cycle through skill {0}")]
    PrerequisiteCycle(SkillId),

    #[error("Unknown grade: {0}")]
    UnknownGrade(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Serialized form of the reference data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub skills: Vec<StaticSkill>,
    #[serde(default)]
    pub classes: Vec<CertificateClass>,
    #[serde(default)]
    pub certificates: Vec<StaticCertificate>,
}

/// Validated, indexed reference data.
#[derive(Debug)]
pub struct Catalog {
    skills: HashMap<SkillId, StaticSkill>,
    classes: BTreeMap<ClassId, Arc<CertificateClass>>,
    certificates: BTreeMap<CertificateId, Arc<StaticCertificate>>,
    content_hash: String,
}

impl Catalog {
    /// Validate and index a document.
    pub fn from_document(document: CatalogDocument) -> Result<Self> {
        let content_hash = Self::compute_content_hash(&document)?;

        let mut skills = HashMap::with_capacity(document.skills.len());
        for skill in document.skills {
            if skill.rank == 0 {
                return Err(CatalogError::InvalidRank(skill.id));
            }
            let id = skill.id;
            if skills.insert(id, skill).is_some() {
                return Err(CatalogError::DuplicateId { kind: "skill", id });
            }
        }

        for skill in skills.values() {
            let owner = format!("Skill {}", skill.id);
            for req in &skill.prerequisites {
                check_requirement(&skills, &owner, req)?;
            }
        }
        check_acyclic(&skills)?;

        let mut classes = BTreeMap::new();
        for class in document.classes {
            let id = class.id;
            if classes.insert(id, Arc::new(class)).is_some() {
                return Err(CatalogError::DuplicateId { kind: "class", id });
            }
        }

        let mut certificates = BTreeMap::new();
        for cert in document.certificates {
            if !classes.contains_key(&cert.class_id) {
                return Err(CatalogError::UnknownClass {
                    certificate_id: cert.id,
                    class_id: cert.class_id,
                });
            }
            for (grade, reqs) in &cert.prerequisites {
                let owner = format!("Certificate {} ({})", cert.id, grade);
                for req in reqs {
                    check_requirement(&skills, &owner, req)?;
                }
            }
            let id = cert.id;
            if certificates.insert(id, Arc::new(cert)).is_some() {
                return Err(CatalogError::DuplicateId {
                    kind: "certificate",
                    id,
                });
            }
        }

        info!(
            skills = skills.len(),
            classes = classes.len(),
            certificates = certificates.len(),
            hash = %content_hash,
            "Loaded skill catalog"
        );

        Ok(Self {
            skills,
            classes,
            certificates,
            content_hash,
        })
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Self::from_document(serde_yaml::from_str(yaml)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_document(serde_json::from_str(json)?)
    }

    /// Load a catalog file. `.json` files are parsed as JSON, anything else as YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), bytes = raw.len(), "Read catalog file");

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json(&raw)
        } else {
            Self::from_yaml(&raw)
        }
    }

    pub fn skill(&self, id: SkillId) -> Option<&StaticSkill> {
        self.skills.get(&id)
    }

    pub fn class(&self, id: ClassId) -> Option<Arc<CertificateClass>> {
        self.classes.get(&id).cloned()
    }

    pub fn certificate(&self, id: CertificateId) -> Option<Arc<StaticCertificate>> {
        self.certificates.get(&id).cloned()
    }

    /// All classes in ascending id order.
    pub fn classes(&self) -> impl Iterator<Item = &Arc<CertificateClass>> {
        self.classes.values()
    }

    /// All certificates in ascending id order.
    pub fn certificates(&self) -> impl Iterator<Item = &Arc<StaticCertificate>> {
        self.certificates.values()
    }

    pub fn certificates_in_class(
        &self,
        class_id: ClassId,
    ) -> impl Iterator<Item = &Arc<StaticCertificate>> {
        self.certificates
            .values()
            .filter(move |cert| cert.class_id == class_id)
    }

    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }

    pub fn certificate_count(&self) -> usize {
        self.certificates.len()
    }

    /// Hex SHA-256 of the source document.
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    fn compute_content_hash(document: &CatalogDocument) -> Result<String> {
        let canonical = serde_json::to_vec(document)?;
        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        Ok(hex::encode(hasher.finalize()))
    }
}

fn check_requirement(
    skills: &HashMap<SkillId, StaticSkill>,
    owner: &str,
    req: &SkillRequirement,
) -> Result<()> {
    if !skills.contains_key(&req.skill_id) {
        return Err(CatalogError::UnknownSkill {
            owner: owner.to_string(),
            skill_id: req.skill_id,
        });
    }
    if req.level == 0 || req.level > MAX_SKILL_LEVEL {
        return Err(CatalogError::InvalidLevel {
            owner: owner.to_string(),
            skill_id: req.skill_id,
            level: req.level,
        });
    }
    Ok(())
}

/// Reject prerequisite graphs with cycles (depth-first, three-colour marking).
fn check_acyclic(skills: &HashMap<SkillId, StaticSkill>) -> Result<()> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Visiting,
        Done,
    }

    fn visit(
        id: SkillId,
        skills: &HashMap<SkillId, StaticSkill>,
        marks: &mut HashMap<SkillId, Mark>,
    ) -> Result<()> {
        match marks.get(&id) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Visiting) => return Err(CatalogError::PrerequisiteCycle(id)),
            None => {}
        }
        marks.insert(id, Mark::Visiting);
        if let Some(skill) = skills.get(&id) {
            for req in &skill.prerequisites {
                visit(req.skill_id, skills, marks)?;
            }
        }
        marks.insert(id, Mark::Done);
        Ok(())
    }

    let mut marks = HashMap::with_capacity(skills.len());
    let mut ids: Vec<_> = skills.keys().copied().collect();
    ids.sort_unstable();
    for id in ids {
        visit(id, skills, &mut marks)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grade::Grade;

    const CATALOG_YAML: &str = r#"
skills:
  - id: 3300
    name: Gunnery
    rank: 1
    primary: perception
    secondary: willpower
  - id: 3301
    name: Small Hybrid Turret
    rank: 1
    primary: perception
    secondary: willpower
    prerequisites:
      - { skill_id: 3300, level: 1 }
classes:
  - id: 1
    name: Core
certificates:
  - id: 10
    name: Core Gunnery
    class_id: 1
    recommendations: [Merlin]
    prerequisites:
      basic:
        - { skill_id: 3300, level: 2 }
      elite:
        - { skill_id: 3301, level: 5 }
"#;

    #[test]
    fn test_from_yaml_indexes_everything() {
        let catalog = Catalog::from_yaml(CATALOG_YAML).unwrap();

        assert_eq!(catalog.skill_count(), 2);
        assert_eq!(catalog.certificate_count(), 1);
        assert_eq!(catalog.skill(3301).unwrap().name, "Small Hybrid Turret");

        let cert = catalog.certificate(10).unwrap();
        assert_eq!(cert.recommendations, vec!["Merlin".to_string()]);
        assert_eq!(
            cert.defined_grades().collect::<Vec<_>>(),
            vec![Grade::Basic, Grade::Elite]
        );
        assert_eq!(catalog.class(cert.class_id).unwrap().name, "Core");
        assert_eq!(catalog.certificates_in_class(1).count(), 1);
        assert_eq!(catalog.certificates_in_class(2).count(), 0);
    }

    #[test]
    fn test_content_hash_is_deterministic() {
        let a = Catalog::from_yaml(CATALOG_YAML).unwrap();
        let b = Catalog::from_yaml(CATALOG_YAML).unwrap();
        assert_eq!(a.content_hash(), b.content_hash());
        assert_eq!(a.content_hash().len(), 64);

        let changed = CATALOG_YAML.replace("Core Gunnery", "Gunnery Core");
        let c = Catalog::from_yaml(&changed).unwrap();
        assert_ne!(a.content_hash(), c.content_hash());
    }

    #[test]
    fn test_rejects_unknown_skill_reference() {
        let yaml = CATALOG_YAML.replace("skill_id: 3301, level: 5", "skill_id: 9999, level: 5");
        let err = Catalog::from_yaml(&yaml).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownSkill { skill_id: 9999, .. }));
    }

    #[test]
    fn test_rejects_invalid_level() {
        let yaml = CATALOG_YAML.replace("skill_id: 3300, level: 2", "skill_id: 3300, level: 6");
        let err = Catalog::from_yaml(&yaml).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidLevel { level: 6, .. }));
    }

    #[test]
    fn test_rejects_unknown_class() {
        let yaml = CATALOG_YAML.replace("class_id: 1", "class_id: 7");
        let err = Catalog::from_yaml(&yaml).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownClass { class_id: 7, .. }));
    }

    #[test]
    fn test_rejects_duplicate_skill() {
        let doc = CatalogDocument {
            skills: vec![make_skill(1, vec![]), make_skill(1, vec![])],
            ..Default::default()
        };
        let err = Catalog::from_document(doc).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId { kind: "skill", id: 1 }));
    }

    #[test]
    fn test_rejects_prerequisite_cycle() {
        let doc = CatalogDocument {
            skills: vec![
                make_skill(1, vec![SkillRequirement::new(2, 1)]),
                make_skill(2, vec![SkillRequirement::new(1, 1)]),
            ],
            ..Default::default()
        };
        let err = Catalog::from_document(doc).unwrap_err();
        assert!(matches!(err, CatalogError::PrerequisiteCycle(_)));
    }

    #[test]
    fn test_rejects_zero_rank() {
        let mut skill = make_skill(1, vec![]);
        skill.rank = 0;
        let doc = CatalogDocument {
            skills: vec![skill],
            ..Default::default()
        };
        assert!(matches!(
            Catalog::from_document(doc),
            Err(CatalogError::InvalidRank(1))
        ));
    }

    fn make_skill(id: SkillId, prerequisites: Vec<SkillRequirement>) -> StaticSkill {
        StaticSkill {
            id,
            name: format!("Skill {}", id),
            description: String::new(),
            group: String::new(),
            rank: 1,
            primary: Attribute::Intelligence,
            secondary: Attribute::Memory,
            prerequisites,
        }
    }
}
