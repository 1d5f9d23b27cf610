//! Key rename and removal tables per release boundary

use stepwise_core::ReleaseBoundary;

/// Key rename
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyRename {
    /// Key (or key prefix) being replaced
    pub old: &'static str,
    /// Replacement
    pub new: &'static str,
    /// Also rename keys below `old`
    pub prefix: bool,
}

impl PropertyRename {
    /// Exact key rename
    #[must_use]
    pub const fn exact(old: &'static str, new: &'static str) -> Self {
        Self { old, new, prefix: false }
    }

    /// Rename of a whole key namespace
    #[must_use]
    pub const fn namespace(old: &'static str, new: &'static str) -> Self {
        Self { old, new, prefix: true }
    }

    /// Renamed key, if this rule applies
    #[must_use]
    pub fn apply(&self, key: &str) -> Option<String> {
        if key == self.old {
            return Some(self.new.to_string());
        }
        if !self.prefix {
            return None;
        }
        key.strip_prefix(self.old)
            .filter(|rest| rest.starts_with('.'))
            .map(|rest| format!("{}{rest}", self.new))
    }
}

/// Key without a replacement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyRemoval {
    /// Removed key
    pub key: &'static str,
    /// What to do instead
    pub note: &'static str,
}

const BOOT_2_3_RENAMES: &[PropertyRename] = &[
    PropertyRename::namespace("spring.http.encoding", "server.servlet.encoding"),
    PropertyRename::exact(
        "spring.http.converters.preferred-json-mapper",
        "spring.mvc.converters.preferred-json-mapper",
    ),
    PropertyRename::exact("spring.http.log-request-details", "spring.mvc.log-request-details"),
];

const BOOT_2_4_RENAMES: &[PropertyRename] = &[
    PropertyRename::exact("spring.profiles", "spring.config.activate.on-profile"),
    PropertyRename::namespace("spring.data.neo4j", "spring.neo4j"),
];

const BOOT_2_4_REMOVALS: &[PropertyRemoval] = &[PropertyRemoval {
    key: "spring.data.neo4j.use-native-types",
    note: "Spring Data Neo4j 6 always uses native types; delete the key",
}];

const BOOT_2_5_RENAMES: &[PropertyRename] = &[
    PropertyRename::exact("spring.datasource.initialization-mode", "spring.sql.init.mode"),
    PropertyRename::exact("spring.datasource.schema", "spring.sql.init.schema-locations"),
    PropertyRename::exact("spring.datasource.data", "spring.sql.init.data-locations"),
];

/// Renames shipped for a boundary
#[must_use]
pub fn renames(boundary: ReleaseBoundary) -> &'static [PropertyRename] {
    match boundary {
        ReleaseBoundary::Boot2_3 => BOOT_2_3_RENAMES,
        ReleaseBoundary::Boot2_4 => BOOT_2_4_RENAMES,
        ReleaseBoundary::Boot2_5 => BOOT_2_5_RENAMES,
    }
}

/// Removals shipped for a boundary
#[must_use]
pub fn removals(boundary: ReleaseBoundary) -> &'static [PropertyRemoval] {
    match boundary {
        ReleaseBoundary::Boot2_4 => BOOT_2_4_REMOVALS,
        ReleaseBoundary::Boot2_3 | ReleaseBoundary::Boot2_5 => &[],
    }
}
