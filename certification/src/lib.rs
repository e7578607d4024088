//! Character Certificate Progress
//!
//! Per-character state layered over the shared [`skill_catalog`] reference
//! data:
//!
//! - [`Character`]: trained skills and training-time estimation, exposed to
//!   certificates through the [`SkillOwner`] trait
//! - [`CertificateLevel`]: one grade of one certificate, with a cached
//!   trained flag
//! - [`Certificate`]: the five grade slots of a certificate and the queries
//!   over them (training time, lowest untrained, highest trained)
//! - [`CharacterCertificates`]: every catalog certificate for one character
//!
//! # Concurrency
//!
//! Certificates are single-writer. `refresh_status` takes `&mut self`, so a
//! refresh can never overlap a read of the same certificate. The character's
//! skill table is concurrent and may be updated from elsewhere; changes show
//! up in cached flags on the next refresh.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use certification::{Character, CharacterCertificates};
//! use skill_catalog::Catalog;
//!
//! let catalog = Arc::new(Catalog::load("catalog.yaml")?);
//! let pilot = Arc::new(Character::new(90000001, "Pilot", catalog.clone()));
//! let mut certs = CharacterCertificates::new(pilot.clone(), &catalog);
//!
//! pilot.set_skill(3300, 3)?;
//! for id in certs.refresh_status() {
//!     let cert = certs.get(id).unwrap();
//!     println!("{} now at {:?}", cert, cert.highest_trained_level().map(|l| l.grade()));
//! }
//! ```

pub mod certificate;
pub mod character;
pub mod collection;
pub mod config;
pub mod error;
pub mod level;

// Re-export main types
pub use certificate::{definition_of, Certificate};
pub use character::{Attributes, Character, CharacterSkillRequirement, SkillOwner, TrainedSkill};
pub use collection::CharacterCertificates;
pub use config::TrainingConfig;
pub use error::{CertificationError, Result};
pub use level::{CertificateLevel, CertificateStatus};
