//! Version ordering for dotted, optionally prefixed and qualified strings
//!
//! Handles the shapes found in build manifests: `2.3.12.RELEASE`, `2.4.0`,
//! `2.5.0-M1`, `v1.2`, as well as release-train names such as `Hoxton.SR8`
//! which are compared as opaque strings.

use std::cmp::Ordering;
use std::fmt;

/// Parsed version string
///
/// Numeric components are compared left to right; a version that is a strict
/// numeric prefix of another is smaller; a trailing qualifier is compared as a
/// string suffix. Inputs whose leading component is not numeric are kept
/// opaque and ordered by plain string comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Version {
    /// Dotted numeric components with optional qualifier
    Dotted {
        /// Numeric components, saturated at `u64::MAX`
        components: Vec<u64>,
        /// Text after the numeric part
        qualifier: Option<String>,
    },
    /// Anything without a numeric leading component
    Opaque(String),
}

impl Version {
    /// Parse a version string; never fails
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let body = trimmed
            .strip_prefix(['v', 'V'])
            .filter(|rest| rest.starts_with(|c: char| c.is_ascii_digit()))
            .unwrap_or(trimmed);

        let mut components = Vec::new();
        let mut qualifier = None;
        let mut rest = body;

        loop {
            let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
            if digits == 0 {
                if !rest.is_empty() {
                    qualifier = Some(rest.to_string());
                }
                break;
            }
            // Oversized components saturate so the version stays numeric
            components.push(rest[..digits].parse::<u64>().unwrap_or(u64::MAX));
            rest = &rest[digits..];

            match rest.chars().next() {
                None => break,
                Some('.') if rest[1..].starts_with(|c: char| c.is_ascii_digit()) => {
                    rest = &rest[1..];
                }
                Some('.' | '-' | '_' | '+') => {
                    let tail = &rest[1..];
                    if !tail.is_empty() {
                        qualifier = Some(tail.to_string());
                    }
                    break;
                }
                Some(_) => {
                    qualifier = Some(rest.to_string());
                    break;
                }
            }
        }

        if components.is_empty() {
            Self::Opaque(trimmed.to_string())
        } else {
            Self::Dotted {
                components,
                qualifier,
            }
        }
    }

    /// Numeric components (empty for opaque versions)
    #[inline]
    #[must_use]
    pub fn components(&self) -> &[u64] {
        match self {
            Version::Dotted { components, .. } => components,
            Version::Opaque(_) => &[],
        }
    }

    /// Trailing qualifier, if any
    #[inline]
    #[must_use]
    pub fn qualifier(&self) -> Option<&str> {
        match self {
            Version::Dotted { qualifier, .. } => qualifier.as_deref(),
            Version::Opaque(_) => None,
        }
    }

    /// Major and minor components, when both are present
    #[inline]
    #[must_use]
    pub fn major_minor(&self) -> Option<(u64, u64)> {
        match self.components() {
            [major, minor, ..] => Some((*major, *minor)),
            _ => None,
        }
    }

    /// Check if this version is opaque
    #[inline]
    #[must_use]
    pub fn is_opaque(&self) -> bool {
        matches!(self, Version::Opaque(_))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Version::Dotted {
                components,
                qualifier,
            } => {
                let numbers: Vec<String> = components.iter().map(u64::to_string).collect();
                write!(f, "{}", numbers.join("."))?;
                if let Some(q) = qualifier {
                    write!(f, ".{q}")?;
                }
                Ok(())
            }
            Version::Opaque(raw) => write!(f, "{raw}"),
        }
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (
                Version::Dotted {
                    components: a,
                    qualifier: qa,
                },
                Version::Dotted {
                    components: b,
                    qualifier: qb,
                },
            ) => a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| x.cmp(y))
                .find(|o| o.is_ne())
                .unwrap_or_else(|| a.len().cmp(&b.len()))
                .then_with(|| {
                    qa.as_deref()
                        .unwrap_or_default()
                        .cmp(qb.as_deref().unwrap_or_default())
                }),
            _ => self.to_string().cmp(&other.to_string()),
        }
    }
}

/// Compare two version strings
#[inline]
#[must_use]
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    Version::parse(a).cmp(&Version::parse(b))
}

/// Check if `current` is at least `minimum`
#[inline]
#[must_use]
pub fn is_at_least(current: &str, minimum: &str) -> bool {
    compare_versions(current, minimum).is_ge()
}

/// `major.minor` prefix of a version string, if it has one
#[must_use]
pub fn major_minor_prefix(raw: &str) -> Option<String> {
    Version::parse(raw)
        .major_minor()
        .map(|(major, minor)| format!("{major}.{minor}"))
}

/// Check whether two versions belong to the same `major.minor` line
///
/// Patch and qualifier are ignored. Versions without a `major.minor` prefix
/// fall back to exact string equality.
#[must_use]
pub fn same_minor_line(a: &str, b: &str) -> bool {
    match (major_minor_prefix(a), major_minor_prefix(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a.trim() == b.trim(),
    }
}
