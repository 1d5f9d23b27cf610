//! Manifest phase scenarios against the in-memory store

use std::path::Path;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use stepwise_core::{MigrationPhase, ReleaseBoundary};
use stepwise_manifest::{
    parse_pom, DependencyDescriptor, InMemoryManifestStore, ManifestEditor, ManifestMigrator,
    ManifestModel, ParentReference, PomStore,
};

fn pom(parent_version: &str, dependencies: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
    <modelVersion>4.0.0</modelVersion>
    <parent>
        <groupId>org.springframework.boot</groupId>
        <artifactId>spring-boot-starter-parent</artifactId>
        <version>{parent_version}</version>
    </parent>
    <groupId>com.example</groupId>
    <artifactId>demo</artifactId>
    <dependencies>
{dependencies}    </dependencies>
</project>
"#
    )
}

fn dependency(group: &str, artifact: &str) -> String {
    format!(
        "        <dependency>\n            <groupId>{group}</groupId>\n            <artifactId>{artifact}</artifactId>\n        </dependency>\n"
    )
}

fn run(store: &Arc<InMemoryManifestStore>, target: &str, boundary: ReleaseBoundary, dry_run: bool) -> stepwise_core::MigrationResult {
    ManifestMigrator::new(store.clone(), "pom.xml", target, Box::new(boundary))
        .with_dry_run(dry_run)
        .migrate()
        .unwrap()
}

#[test]
fn parent_2_2_13_moves_to_2_3_12() {
    let store = Arc::new(InMemoryManifestStore::with_document("pom.xml", pom("2.2.13.RELEASE", "")));
    let result = run(&store, "2.3.12.RELEASE", ReleaseBoundary::Boot2_3, false);

    let written = parse_pom(&store.document(Path::new("pom.xml")).unwrap(), Path::new("pom.xml")).unwrap();
    assert_eq!(written.parent.unwrap().version, "2.3.12.RELEASE");

    let version_changes: Vec<_> = result
        .changes()
        .iter()
        .filter(|c| c.contains("2.2.13.RELEASE") && c.contains("2.3.12.RELEASE"))
        .collect();
    assert_eq!(version_changes.len(), 1);
    assert_eq!(store.write_count(), 1);
    assert!(result.modified_units().contains("pom.xml"));
}

#[test]
fn cassandra_driver_warns_without_error() {
    for group in ["com.datastax.cassandra", "com.example"] {
        let deps = dependency(group, "cassandra-driver-core");
        let store = Arc::new(InMemoryManifestStore::with_document("pom.xml", pom("2.2.13.RELEASE", &deps)));
        let result = run(&store, "2.3.12.RELEASE", ReleaseBoundary::Boot2_3, false);

        assert!(
            result.warnings().iter().any(|w| w.contains("manual code review")),
            "{group}: {:?}",
            result.warnings()
        );
        assert!(result.errors().is_empty(), "{group}: {:?}", result.errors());
    }
}

#[test]
fn web_starter_gets_validation_starter_written() {
    let deps = dependency("org.springframework.boot", "spring-boot-starter-web");
    let store = Arc::new(InMemoryManifestStore::with_document("pom.xml", pom("2.2.13.RELEASE", &deps)));
    run(&store, "2.3.12.RELEASE", ReleaseBoundary::Boot2_3, false);

    let text = store.document(Path::new("pom.xml")).unwrap();
    assert!(text.contains("<artifactId>spring-boot-starter-validation</artifactId>"));

    // Second run is a no-op on the dependency list
    let again = run(&store, "2.3.12.RELEASE", ReleaseBoundary::Boot2_3, false);
    assert!(again.changes().iter().any(|c| c.contains("already present")));
    assert_eq!(store.write_count(), 1);
}

#[test]
fn dry_run_never_writes() {
    let deps = dependency("org.springframework.boot", "spring-boot-starter-web");
    let original = pom("2.2.13.RELEASE", &deps);
    let store = Arc::new(InMemoryManifestStore::with_document("pom.xml", original.clone()));
    let result = run(&store, "2.3.12.RELEASE", ReleaseBoundary::Boot2_3, true);

    assert_eq!(store.write_count(), 0);
    assert_eq!(store.document(Path::new("pom.xml")).unwrap(), original);
    assert!(result.changes().iter().all(|c| c.starts_with("Would ")));
    assert_eq!(result.changes().len(), 2);
}

#[test]
fn junit4_gets_vintage_engine_for_2_4() {
    let deps = dependency("junit", "junit");
    let store = Arc::new(InMemoryManifestStore::with_document("pom.xml", pom("2.3.12.RELEASE", &deps)));
    run(&store, "2.4.13", ReleaseBoundary::Boot2_4, false);

    let written = parse_pom(&store.document(Path::new("pom.xml")).unwrap(), Path::new("pom.xml")).unwrap();
    let vintage = written
        .find_dependency("org.junit.vintage", "junit-vintage-engine")
        .unwrap();
    assert_eq!(vintage.scope.as_deref(), Some("test"));
    assert_eq!(written.parent.unwrap().version, "2.4.13");
}

#[test]
fn incompatible_release_train_is_error() {
    let text = pom("2.2.13.RELEASE", "").replace(
        "</project>",
        "    <dependencyManagement>\n        <dependencies>\n            <dependency>\n                <groupId>org.springframework.cloud</groupId>\n                <artifactId>spring-cloud-dependencies</artifactId>\n                <version>Greenwich.SR6</version>\n                <type>pom</type>\n                <scope>import</scope>\n            </dependency>\n        </dependencies>\n    </dependencyManagement>\n</project>",
    );
    let store = Arc::new(InMemoryManifestStore::with_document("pom.xml", text));
    let result = run(&store, "2.3.12.RELEASE", ReleaseBoundary::Boot2_3, false);

    assert_eq!(result.errors().len(), 1);
    assert!(result.errors()[0].contains("Hoxton.SR5"));
}

#[test]
fn pom_store_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pom.xml");
    std::fs::write(&path, pom("2.2.13.RELEASE", "")).unwrap();

    let result = ManifestMigrator::new(
        Arc::new(PomStore::new()),
        &path,
        "2.3.12.RELEASE",
        Box::new(ReleaseBoundary::Boot2_3),
    )
    .migrate()
    .unwrap();

    assert!(result.is_success());
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("<version>2.3.12.RELEASE</version>"));
    assert!(text.contains("xmlns=\"http://maven.apache.org/POM/4.0.0\""));
}

fn version() -> impl Strategy<Value = String> {
    (1u64..4, 0u64..8, 0u64..20, prop_oneof![Just(""), Just(".RELEASE")])
        .prop_map(|(major, minor, patch, suffix)| format!("{major}.{minor}.{patch}{suffix}"))
}

proptest! {
    #[test]
    fn parent_update_respects_mode(current in version(), target in version(), dry_run in any::<bool>()) {
        let mut model = ManifestModel::new().with_parent(ParentReference::new(
            "org.springframework.boot",
            "spring-boot-starter-parent",
            current.clone(),
        ));
        let store = Arc::new(InMemoryManifestStore::new());
        store.insert("pom.xml", stepwise_manifest::render_pom(&model, Path::new("pom.xml")).unwrap());

        let result = run(&store, &target, ReleaseBoundary::Boot2_3, dry_run);
        let parent_changes = result.changes().iter().filter(|c| c.contains("parent version")).count();

        if stepwise_core::same_minor_line(&current, &target) {
            prop_assert_eq!(parent_changes, 0);
            prop_assert_eq!(store.write_count(), 0);
        } else {
            prop_assert_eq!(parent_changes, 1);
            let written = parse_pom(&store.document(Path::new("pom.xml")).unwrap(), Path::new("pom.xml")).unwrap();
            let expected = if dry_run { &current } else { &target };
            prop_assert_eq!(&written.parent.unwrap().version, expected);
        }

        // The editor itself never touches the model in dry-run mode
        let mut scratch = stepwise_core::MigrationResult::new();
        ManifestEditor::new(&mut model, true).set_parent_version(&target, &mut scratch);
        prop_assert_eq!(&model.parent.as_ref().unwrap().version, &current);
    }

    #[test]
    fn add_if_absent_is_idempotent(artifact in "[a-z]{1,12}") {
        let mut model = ManifestModel::new();
        let mut result = stepwise_core::MigrationResult::new();
        let mut editor = ManifestEditor::new(&mut model, false);
        editor.add_if_absent(DependencyDescriptor::new("com.example", artifact.clone()), &mut result);
        editor.add_if_absent(DependencyDescriptor::new("com.example", artifact), &mut result);
        prop_assert_eq!(model.dependencies.len(), 1);
        prop_assert!(result.changes()[1].contains("already present"));
    }
}
