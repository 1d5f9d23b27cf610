//! Rewrite phases against in-memory and on-disk stores

use std::sync::Arc;

use proptest::prelude::*;
use stepwise_ast::{
    presets, FsSourceStore, ImportRemapMigrator, InMemorySourceStore, PackageMapping,
    SetOperationMigrator, SourceStore, SourceUnit,
};
use stepwise_core::{MigrationPhase, ReleaseBoundary};

const CASSANDRA_REPO: &str = "package com.acme.data;

import com.datastax.driver.core.Cluster;
import com.datastax.driver.core.Session;
import com.datastax.driver.core.querybuilder.QueryBuilder;
import java.util.List;

public class UserRepository {
    private final Session session;

    public UserRepository(Cluster cluster) {
        this.session = cluster.connect(\"users\");
    }
}
";

const REDIS_SERVICE: &str = "package com.acme.cache;

import java.util.Set;
import org.springframework.data.redis.core.SetOperations;

public class TagService {
    private final SetOperations<String, String> ops;

    public TagService(SetOperations<String, String> ops) {
        this.ops = ops;
    }

    public Set<String> shared(String key, java.util.Collection<String> others) {
        return ops.intersect(key, others);
    }

    public Set<String> all(String key, java.util.Collection<String> others) {
        return ops.union(key, /* every tag */ others);
    }
}
";

#[test]
fn a_b_cluster_becomes_x_y_cluster() {
    let store = Arc::new(InMemorySourceStore::new());
    store
        .add_source("Repo", "import a.b.Cluster;\n\nclass Repo { Cluster c; }\n")
        .unwrap();

    let result = ImportRemapMigrator::new(store.clone(), vec![PackageMapping::new("a.b", "x.y")])
        .migrate()
        .unwrap();

    let unit = store.load_all().unwrap().remove("Repo").unwrap();
    let names: Vec<String> = unit.imports().into_iter().map(|d| d.name).collect();
    assert_eq!(names, ["x.y.Cluster"]);
    assert!(result.modified_units().contains("Repo"));
    assert!(result.requires_manual_review());
    assert_eq!(store.write_count(), 1);
}

#[test]
fn no_matching_imports_single_informational_change() {
    let store = Arc::new(InMemorySourceStore::new());
    store.add_source("A", "import java.util.List;\nclass A {}\n").unwrap();
    store.add_source("B", "class B {}\n").unwrap();

    let result = ImportRemapMigrator::new(store.clone(), vec![PackageMapping::new("a.b", "x.y")])
        .migrate()
        .unwrap();

    assert_eq!(result.changes().len(), 1);
    assert!(!result.requires_manual_review());
    assert!(result.modified_units().is_empty());
    assert_eq!(store.write_count(), 0);
}

#[test]
fn cassandra_preset_remaps_with_guide() {
    let store = Arc::new(InMemorySourceStore::new());
    store.add_source("com.acme.data.UserRepository", CASSANDRA_REPO).unwrap();

    let boundary = ReleaseBoundary::Boot2_3;
    let result = ImportRemapMigrator::new(store.clone(), presets::package_mappings(boundary))
        .with_guide(presets::review_guide(boundary))
        .migrate()
        .unwrap();

    let text = store.text_of("com.acme.data.UserRepository").unwrap();
    assert!(text.contains("import com.datastax.oss.driver.api.core.Cluster;"));
    assert!(text.contains("import com.datastax.oss.driver.api.querybuilder.QueryBuilder;"));
    assert!(!text.contains("com.datastax.driver.core"));
    assert!(text.contains("import java.util.List;"));

    assert_eq!(result.changes().len(), 3);
    // Automatic part plus three manual patterns
    assert_eq!(result.manual_review_items().len(), 4);
}

#[test]
fn dry_run_reports_without_writing() {
    let store = Arc::new(InMemorySourceStore::new());
    store.add_source("Repo", "import a.b.Cluster;\nclass Repo {}\n").unwrap();

    let result = ImportRemapMigrator::new(store.clone(), vec![PackageMapping::new("a.b", "x.y")])
        .with_dry_run(true)
        .migrate()
        .unwrap();

    assert_eq!(store.write_count(), 0);
    assert_eq!(store.text_of("Repo").unwrap(), "import a.b.Cluster;\nclass Repo {}\n");
    assert!(result.changes()[0].starts_with("Would rename import in Repo"));
    assert!(result.requires_manual_review());
}

#[test]
fn write_failure_is_reported_with_change_count() {
    let store = Arc::new(InMemorySourceStore::new());
    store.add_source("Repo", "import a.b.Cluster;\nclass Repo {}\n").unwrap();
    store.fail_writes(true);

    let result = ImportRemapMigrator::new(store, vec![PackageMapping::new("a.b", "x.y")])
        .migrate()
        .unwrap();

    assert_eq!(result.errors().len(), 1);
    assert!(result.errors()[0].starts_with("Failed to write 1 unit(s) after 1 change(s)"));
}

#[test]
fn set_operations_rewritten_for_2_5() {
    let store = Arc::new(InMemorySourceStore::new());
    store.add_source("com.acme.cache.TagService", REDIS_SERVICE).unwrap();

    let result = SetOperationMigrator::new(store.clone(), presets::set_operation_rules(ReleaseBoundary::Boot2_5))
        .migrate()
        .unwrap();

    let text = store.text_of("com.acme.cache.TagService").unwrap();
    let unit = SourceUnit::parse("check", text.clone()).unwrap();
    for call in unit.method_calls() {
        if call.method == "union" || call.method == "intersect" {
            assert_eq!(call.arguments.len(), 1, "{}", call.method);
        }
    }
    assert!(text.contains("import java.util.stream.Stream;"));
    assert!(text.contains("import java.util.stream.Collectors;"));

    assert!(result.requires_manual_review());
    assert_eq!(result.manual_review_items().len(), 1);
    assert!(result.manual_review_items()[0].starts_with("2 set-operation call site(s)"));
    assert!(result
        .changes()
        .iter()
        .any(|c| c.contains("union() call in com.acme.cache.TagService")));
}

#[test]
fn zero_set_operation_calls_no_migrations_needed() {
    let store = Arc::new(InMemorySourceStore::new());
    store.add_source("com.acme.data.UserRepository", CASSANDRA_REPO).unwrap();

    let result = SetOperationMigrator::new(store.clone(), presets::set_operation_rules(ReleaseBoundary::Boot2_5))
        .migrate()
        .unwrap();

    assert_eq!(result.changes(), ["No set-operation calls found; no migrations needed"]);
    assert!(!result.requires_manual_review());
    assert_eq!(store.write_count(), 0);
}

#[test]
fn unmergeable_call_rolls_unit_back() {
    let source = "class T { Object f(Object a) { return ops.union(a, 1); } }\n";
    let store = Arc::new(InMemorySourceStore::new());
    store.add_source("T", source).unwrap();

    let result = SetOperationMigrator::new(store.clone(), presets::set_operation_rules(ReleaseBoundary::Boot2_5))
        .migrate()
        .unwrap();

    assert_eq!(store.text_of("T").unwrap(), source);
    assert_eq!(store.write_count(), 0);
    assert!(result.modified_units().is_empty());
    assert!(result.errors().is_empty());
    assert!(result.changes().is_empty());
    assert_eq!(result.warnings().len(), 1);
    assert!(result.warnings()[0].starts_with("Set-operation calls in T left unchanged"));
    assert!(result.requires_manual_review());
}

#[test]
fn rejected_import_rename_rolls_unit_back() {
    let source = "import a.b.Cluster;\n\nclass Repo { Cluster c; }\n";
    let store = Arc::new(InMemorySourceStore::new());
    store.add_source("Repo", source).unwrap();

    let result = ImportRemapMigrator::new(store.clone(), vec![PackageMapping::new("a.b", "x..y")])
        .migrate()
        .unwrap();

    assert_eq!(store.text_of("Repo").unwrap(), source);
    assert_eq!(store.write_count(), 0);
    assert!(result.modified_units().is_empty());
    assert!(result.errors().is_empty());
    assert!(result.changes().is_empty());
    assert_eq!(result.warnings().len(), 1);
    assert!(result.warnings()[0].starts_with("Imports of Repo left unchanged"));
    assert_eq!(result.manual_review_items(), ["Update imports of Repo by hand"]);
    assert!(result.requires_manual_review());
}

#[test]
fn missing_source_root_is_locator_error() {
    let phase = ImportRemapMigrator::new(
        Arc::new(FsSourceStore::new("/no/such/project")),
        vec![PackageMapping::new("a.b", "x.y")],
    );
    let err = phase.migrate().unwrap_err();
    assert!(err.is_locator());
}

#[test]
fn on_disk_project_rewrite() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("src/main/java/com/acme/cache/TagService.java");
    std::fs::create_dir_all(file.parent().unwrap()).unwrap();
    std::fs::write(&file, REDIS_SERVICE).unwrap();

    let store = Arc::new(FsSourceStore::new(dir.path()));
    let result = SetOperationMigrator::new(store, presets::set_operation_rules(ReleaseBoundary::Boot2_5))
        .migrate()
        .unwrap();

    assert!(result.modified_units().contains("com.acme.cache.TagService"));
    let text = std::fs::read_to_string(&file).unwrap();
    assert!(text.contains("ops.union(Stream.concat(Stream.of(key), others.stream()).collect(Collectors.toList()))"));
}

fn identifier() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z0-9]{0,8}".prop_filter("java keyword", |s| {
        !matches!(
            s.as_str(),
            "do" | "if" | "for" | "int" | "new" | "try" | "case" | "char" | "else" | "enum"
                | "goto" | "long" | "null" | "this" | "true" | "void" | "byte" | "false"
                | "final" | "float" | "short" | "super" | "throw" | "while" | "break" | "catch"
                | "class" | "const" | "double" | "import" | "native" | "public" | "return"
                | "static" | "switch" | "throws" | "assert" | "boolean" | "default" | "extends"
                | "finally" | "package" | "private" | "abstract" | "continue" | "strictfp"
                | "volatile" | "interface" | "protected" | "transient" | "implements"
                | "instanceof" | "synchronized" | "var" | "record" | "yield"
        )
    })
}

fn argument() -> impl Strategy<Value = String> {
    prop_oneof![
        identifier(),
        identifier().prop_map(|s| format!("\"{s}\"")),
        (identifier(), identifier()).prop_map(|(a, b)| format!("{a}.{b}()")),
        (identifier(), identifier()).prop_map(|(a, b)| format!("{a} == null ? {b} : {a}")),
    ]
}

proptest! {
    #[test]
    fn merged_calls_have_one_argument_and_reparse(
        method in prop_oneof![Just("union"), Just("intersect"), Just("difference")],
        first in argument(),
        second in argument(),
    ) {
        let text = format!("class T {{ Object f() {{ return ops.{method}({first}, {second}); }} }}\n");
        let store = Arc::new(InMemorySourceStore::new());
        store.add_source("T", &text).unwrap();

        let result = SetOperationMigrator::new(store.clone(), presets::set_operation_rules(ReleaseBoundary::Boot2_5))
            .migrate()
            .unwrap();
        prop_assert!(result.requires_manual_review());

        let rewritten = store.text_of("T").unwrap();
        let unit = SourceUnit::parse("T", rewritten).unwrap();
        let call = unit.method_calls().into_iter().find(|c| c.method == method).unwrap();
        prop_assert_eq!(call.arguments.len(), 1);
        prop_assert!(call.arguments[0].contains(&first));
        prop_assert!(call.arguments[0].contains(&second));
    }
}
