//! Framework release boundaries
//!
//! Each variant is one upgrade step. Crates key their own rule tables
//! (dependency rules, property renames, rewrite presets) by this enum, so a
//! pipeline for one step is assembled from variant-specific strategies
//! rather than from a class hierarchy.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::version::Version;

/// One framework release boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReleaseBoundary {
    /// 2.2.x -> 2.3.x
    Boot2_3,
    /// 2.3.x -> 2.4.x
    Boot2_4,
    /// 2.4.x -> 2.5.x
    Boot2_5,
}

impl ReleaseBoundary {
    /// All boundaries in upgrade order
    pub const ALL: [ReleaseBoundary; 3] = [
        ReleaseBoundary::Boot2_3,
        ReleaseBoundary::Boot2_4,
        ReleaseBoundary::Boot2_5,
    ];

    /// `(major, minor)` line this boundary upgrades to
    #[inline]
    #[must_use]
    pub fn target_line(&self) -> (u64, u64) {
        match self {
            ReleaseBoundary::Boot2_3 => (2, 3),
            ReleaseBoundary::Boot2_4 => (2, 4),
            ReleaseBoundary::Boot2_5 => (2, 5),
        }
    }

    /// `(major, minor)` line this boundary upgrades from
    #[inline]
    #[must_use]
    pub fn source_line(&self) -> (u64, u64) {
        let (major, minor) = self.target_line();
        (major, minor - 1)
    }

    /// Boundary whose target line matches `version`
    #[must_use]
    pub fn for_target(version: &str) -> Option<Self> {
        let line = Version::parse(version).major_minor()?;
        Self::ALL.into_iter().find(|b| b.target_line() == line)
    }

    /// Short label, e.g. `2.2 -> 2.3`
    #[must_use]
    pub fn label(&self) -> String {
        let (from_major, from_minor) = self.source_line();
        let (to_major, to_minor) = self.target_line();
        format!("{from_major}.{from_minor} -> {to_major}.{to_minor}")
    }
}

impl fmt::Display for ReleaseBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
