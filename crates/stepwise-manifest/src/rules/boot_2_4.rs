//! Spring Boot 2.3 -> 2.4

use stepwise_core::MigrationResult;

use super::{check_integrations, CompatibilityRule, Detect, IntegrationCheck};
use crate::editor::ManifestEditor;
use crate::model::DependencyDescriptor;

pub(super) const INTEGRATIONS: &[IntegrationCheck] = &[
    IntegrationCheck {
        name: "Neo4j",
        detect: Detect::ArtifactContains("neo4j"),
        warning: "Spring Data Neo4j 6 replaces Neo4j-OGM and moves configuration to \
                  spring.neo4j.*; manual code review required",
        review_item: Some(
            "Port Neo4j-OGM entities and SessionFactory usage to Spring Data Neo4j 6 \
             (Neo4jTemplate, @Node)",
        ),
    },
    IntegrationCheck {
        name: "Hazelcast",
        detect: Detect::Group("com.hazelcast"),
        warning: "Hazelcast 4 changes configuration classes and package names",
        review_item: None,
    },
    IntegrationCheck {
        name: "Flyway",
        detect: Detect::Group("org.flywaydb"),
        warning: "Flyway 7 changes callback ordering and removes deprecated callback APIs",
        review_item: None,
    },
    IntegrationCheck {
        name: "Elasticsearch transport client",
        detect: Detect::Coordinate("org.elasticsearch.client", "transport"),
        warning: "the transport client is deprecated; migrate to the RestHighLevelClient",
        review_item: None,
    },
];

pub(super) const COMPATIBILITY: &[CompatibilityRule] = &[CompatibilityRule {
    name: "Spring Cloud release train",
    group_id: "org.springframework.cloud",
    artifact_id: "spring-cloud-dependencies",
    compatible: &["2020.0."],
    marginal: &["Hoxton.SR9", "Hoxton.SR10", "Hoxton.SR11", "Hoxton.SR12"],
    minimum: "2020.0.0",
}];

pub(super) fn apply_dependency_rules(editor: &mut ManifestEditor<'_>, result: &mut MigrationResult) {
    // The vintage engine left spring-boot-starter-test
    if editor.has_dependency("junit", "junit") {
        editor.add_if_absent(
            DependencyDescriptor::new("org.junit.vintage", "junit-vintage-engine").with_scope("test"),
            result,
        );
    }
    check_integrations(INTEGRATIONS, editor.model(), result);
}
