//! Skill and Certificate Reference Data
//!
//! Immutable, globally shared definitions that every character's progress
//! is measured against:
//!
//! - **Skills**: trainable skills with a rank, training attributes and their
//!   own prerequisite skills
//! - **Certificate classes**: grouping tags for certificates
//! - **Certificates**: named competency groupings with up to five
//!   [`Grade`]s, each requiring a list of skills at minimum levels
//!
//! # Example
//!
//! ```ignore
//! use skill_catalog::{Catalog, Grade};
//!
//! let catalog = Catalog::load("catalog.yaml")?;
//! let cert = catalog.certificate(10).expect("known certificate");
//! for grade in cert.defined_grades() {
//!     println!("{}: {:?}", grade, cert.prerequisites_for(grade));
//! }
//! ```

pub mod catalog;
pub mod grade;
pub mod types;

// Re-export main types
pub use catalog::{Catalog, CatalogDocument, CatalogError};
pub use grade::Grade;
pub use types::*;
