//! Every certificate in the catalog, wrapped for one character.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{info, warn};

use skill_catalog::{Catalog, CertificateId, ClassId, Grade};

use crate::certificate::Certificate;
use crate::character::SkillOwner;

/// A character's certificates, built once per catalog snapshot.
pub struct CharacterCertificates {
    certificates: BTreeMap<CertificateId, Certificate>,
    catalog_hash: String,
}

impl CharacterCertificates {
    /// Wrap every catalog certificate for `owner` and run the initial refresh.
    pub fn new(owner: Arc<dyn SkillOwner>, catalog: &Catalog) -> Self {
        let mut certificates = BTreeMap::new();
        for definition in catalog.certificates() {
            let Some(class) = catalog.class(definition.class_id) else {
                warn!(
                    certificate_id = definition.id,
                    class_id = definition.class_id,
                    "Certificate class missing from catalog"
                );
                continue;
            };
            let cert = Certificate::new(owner.clone(), definition.clone(), class);
            certificates.insert(definition.id, cert);
        }

        let mut collection = Self {
            certificates,
            catalog_hash: catalog.content_hash().to_string(),
        };
        let changed = collection.refresh_status();

        info!(
            character = %owner.name(),
            certificates = collection.len(),
            changed = changed.len(),
            "Built character certificates"
        );

        collection
    }

    pub fn get(&self, id: CertificateId) -> Option<&Certificate> {
        self.certificates.get(&id)
    }

    /// All certificates in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Certificate> {
        self.certificates.values()
    }

    pub fn in_class(&self, class_id: ClassId) -> impl Iterator<Item = &Certificate> {
        self.certificates
            .values()
            .filter(move |cert| cert.class().id == class_id)
    }

    /// Refresh every certificate. Returns the ids whose status changed.
    pub fn refresh_status(&mut self) -> Vec<CertificateId> {
        self.certificates
            .iter_mut()
            .filter_map(|(id, cert)| cert.refresh_status().then_some(*id))
            .collect()
    }

    /// True if `catalog` is not the snapshot this collection was built from.
    pub fn is_stale(&self, catalog: &Catalog) -> bool {
        catalog.content_hash() != self.catalog_hash
    }

    /// Certificates whose `grade` slot is currently trained.
    pub fn trained_count(&self, grade: Grade) -> usize {
        self.iter()
            .filter(|cert| cert.level(grade).is_some_and(|level| level.is_trained()))
            .count()
    }

    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }
}
