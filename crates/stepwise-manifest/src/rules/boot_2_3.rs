//! Spring Boot 2.2 -> 2.3

use stepwise_core::MigrationResult;

use super::{check_integrations, CompatibilityRule, Detect, IntegrationCheck};
use crate::editor::ManifestEditor;
use crate::model::DependencyDescriptor;

const BOOT_GROUP: &str = "org.springframework.boot";

pub(super) const INTEGRATIONS: &[IntegrationCheck] = &[
    IntegrationCheck {
        name: "Cassandra",
        detect: Detect::ArtifactContains("cassandra"),
        warning: "Cassandra driver 4 changes package names and the session API; \
                  manual code review required",
        review_item: Some(
            "Migrate Cassandra driver 3 usage (Cluster, Session, QueryBuilder) to driver 4 \
             (CqlSession) and move contact points to spring.data.cassandra.local-datacenter",
        ),
    },
    IntegrationCheck {
        name: "Jest",
        detect: Detect::Group("io.searchbox"),
        warning: "Jest client support was removed; migrate to the Elasticsearch RestHighLevelClient",
        review_item: None,
    },
    IntegrationCheck {
        name: "Kafka",
        detect: Detect::Coordinate("org.springframework.kafka", "spring-kafka"),
        warning: "Spring Kafka 2.5 deprecates ErrorHandler variants and the \
                  transaction-id-prefix behaviour; review listener container configuration",
        review_item: None,
    },
    IntegrationCheck {
        name: "Docker build plugin",
        detect: Detect::Plugin("com.spotify", "dockerfile-maven-plugin"),
        warning: "consider replacing it with the built-in spring-boot:build-image goal",
        review_item: None,
    },
];

pub(super) const COMPATIBILITY: &[CompatibilityRule] = &[CompatibilityRule {
    name: "Spring Cloud release train",
    group_id: "org.springframework.cloud",
    artifact_id: "spring-cloud-dependencies",
    compatible: &[
        "Hoxton.SR5",
        "Hoxton.SR6",
        "Hoxton.SR7",
        "Hoxton.SR8",
        "Hoxton.SR9",
        "Hoxton.SR10",
        "Hoxton.SR11",
        "Hoxton.SR12",
    ],
    marginal: &["Hoxton."],
    minimum: "Hoxton.SR5",
}];

pub(super) fn apply_dependency_rules(editor: &mut ManifestEditor<'_>, result: &mut MigrationResult) {
    // Validation is no longer pulled in by the web starter
    if editor.has_dependency(BOOT_GROUP, "spring-boot-starter-web") {
        editor.add_if_absent(
            DependencyDescriptor::new(BOOT_GROUP, "spring-boot-starter-validation"),
            result,
        );
    }
    check_integrations(INTEGRATIONS, editor.model(), result);
}
