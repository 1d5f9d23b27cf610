//! Spring Boot 2.4 -> 2.5

use stepwise_core::MigrationResult;

use super::{check_integrations, CompatibilityRule, Detect, IntegrationCheck};
use crate::editor::ManifestEditor;

pub(super) const INTEGRATIONS: &[IntegrationCheck] = &[
    IntegrationCheck {
        name: "Liquibase",
        detect: Detect::Group("org.liquibase"),
        warning: "Liquibase 4.3 is required and spring.liquibase.* now sits alongside \
                  spring.sql.init.*; verify changelog locations",
        review_item: None,
    },
    IntegrationCheck {
        name: "Cassandra",
        detect: Detect::ArtifactContains("cassandra"),
        warning: "request throttling defaults changed; review \
                  spring.data.cassandra.request.throttler.* settings",
        review_item: None,
    },
];

pub(super) const COMPATIBILITY: &[CompatibilityRule] = &[CompatibilityRule {
    name: "Spring Cloud release train",
    group_id: "org.springframework.cloud",
    artifact_id: "spring-cloud-dependencies",
    compatible: &["2020.0.3", "2020.0.4", "2020.0.5", "2020.0.6"],
    marginal: &["2020.0."],
    minimum: "2020.0.3",
}];

pub(super) fn apply_dependency_rules(editor: &mut ManifestEditor<'_>, result: &mut MigrationResult) {
    check_integrations(INTEGRATIONS, editor.model(), result);
}
