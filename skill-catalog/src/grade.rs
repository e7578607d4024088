//! Certificate grades.
//!
//! A certificate is split into five grades with a fixed total order. The
//! grade doubles as a dense index (0..=4) into per-grade slot arrays, so the
//! discriminants must stay contiguous and ascending.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

use crate::catalog::CatalogError;

/// Competency grade of a certificate, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Grade {
    Basic = 0,
    Standard = 1,
    Improved = 2,
    Advanced = 3,
    Elite = 4,
}

impl Grade {
    /// Number of grades.
    pub const COUNT: usize = 5;

    /// All grades in ascending order.
    pub const ALL: [Grade; Grade::COUNT] = [
        Grade::Basic,
        Grade::Standard,
        Grade::Improved,
        Grade::Advanced,
        Grade::Elite,
    ];

    /// Slot index of this grade (Basic = 0, Elite = 4).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Grade stored at the given slot index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The grade directly above this one.
    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    /// The grade directly below this one.
    pub fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Standard => "standard",
            Self::Improved => "improved",
            Self::Advanced => "advanced",
            Self::Elite => "elite",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Basic => "Basic",
            Self::Standard => "Standard",
            Self::Improved => "Improved",
            Self::Advanced => "Advanced",
            Self::Elite => "Elite",
        };
        f.write_str(name)
    }
}

impl FromStr for Grade {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|grade| grade.as_str() == lower)
            .ok_or_else(|| CatalogError::UnknownGrade(s.to_string()))
    }
}
