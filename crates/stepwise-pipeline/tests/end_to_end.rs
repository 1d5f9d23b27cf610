//! Full pipeline runs over temporary Maven projects

use std::path::Path;
use std::sync::Arc;

use mockall::mock;
use pretty_assertions::assert_eq;
use stepwise_pipeline::{build_pipeline, build_pipeline_with, CommandError, CommandOutput, CommandRunner};
use stepwise_test_utils::{
    boot_2_2_cassandra_pom, pom, ProjectFixture, CASSANDRA_REPOSITORY, LEGACY_DATASOURCE_PROPERTIES,
    LEGACY_PROPERTIES, PLAIN_SERVICE, REDIS_SET_OPERATIONS,
};

mock! {
    Runner {}

    impl CommandRunner for Runner {
        fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<CommandOutput, CommandError>;
    }
}

fn boot_2_2_project() -> ProjectFixture {
    ProjectFixture::new()
        .with_pom(&boot_2_2_cassandra_pom())
        .with_java("com.example.orders", "OrderRepository", CASSANDRA_REPOSITORY)
        .with_java("com.example.orders", "OrderService", PLAIN_SERVICE)
        .with_resource("application.properties", LEGACY_PROPERTIES)
}

#[test]
fn boot_2_3_step_rewrites_project() {
    let project = boot_2_2_project();
    let report = build_pipeline(&project.config("2.3.12.RELEASE")).unwrap().run();

    let pom = project.read("pom.xml");
    assert!(pom.contains("<version>2.3.12.RELEASE</version>"));
    assert!(pom.contains("<artifactId>spring-boot-starter-validation</artifactId>"));

    let repository = project.read("src/main/java/com/example/orders/OrderRepository.java");
    assert!(repository.contains("import com.datastax.oss.driver.api.core.Cluster;"));
    assert!(!repository.contains("import com.datastax.driver.core."));
    assert_eq!(
        project.read("src/main/java/com/example/orders/OrderService.java"),
        PLAIN_SERVICE
    );

    assert_eq!(
        project.read("src/main/resources/application.properties"),
        "# HTTP\nserver.servlet.encoding.charset=UTF-8\nserver.servlet.encoding.enabled=true\nserver.port=8080\n"
    );

    let merged = report.merged();
    assert!(merged.is_success(), "errors: {:?}", merged.errors());
    assert!(merged.modified_units().contains("com.example.orders.OrderRepository"));
    assert!(merged
        .warnings()
        .iter()
        .any(|w| w.contains("manual code review")));
    assert_eq!(report.exit_code(), 2);
    assert!(report.validation().is_none());
}

#[test]
fn dry_run_touches_nothing() {
    let project = boot_2_2_project();
    let mut runner = MockRunner::new();
    runner.expect_run().never();

    let config = project
        .config("2.3.12.RELEASE")
        .with_dry_run(true)
        .with_validation(true);
    let report = build_pipeline_with(&config, Arc::new(runner)).unwrap().run();

    assert_eq!(project.read("pom.xml"), boot_2_2_cassandra_pom());
    assert_eq!(
        project.read("src/main/java/com/example/orders/OrderRepository.java"),
        CASSANDRA_REPOSITORY
    );
    assert_eq!(
        project.read("src/main/resources/application.properties"),
        LEGACY_PROPERTIES
    );

    assert!(report.is_dry_run());
    assert!(report
        .merged()
        .changes()
        .iter()
        .any(|c| c.starts_with("Would update parent version")));
    assert_eq!(
        report.validation().unwrap().changes(),
        ["Validation skipped: dry run"]
    );
}

#[test]
fn boot_2_5_step_merges_set_operations() {
    let project = ProjectFixture::new()
        .with_pom(&pom("2.4.13", &[("org.springframework.boot", "spring-boot-starter-data-redis")]))
        .with_java("com.example.cache", "TagIndex", REDIS_SET_OPERATIONS)
        .with_resource("application.properties", LEGACY_DATASOURCE_PROPERTIES);

    let report = build_pipeline(&project.config("2.5.15")).unwrap().run();

    let source = project.read("src/main/java/com/example/cache/TagIndex.java");
    assert!(source.contains(
        "ops.intersect(Stream.concat(Stream.of(key), otherKeys.stream()).collect(Collectors.toList()))"
    ));
    assert!(source.contains(
        "ops.union(Stream.concat(Stream.of(key), otherKeys.stream()).collect(Collectors.toList()))"
    ));
    assert!(source.contains("import java.util.stream.Stream;"));
    assert!(source.contains("import java.util.stream.Collectors;"));

    assert_eq!(
        project.read("src/main/resources/application.properties"),
        "spring.datasource.url=jdbc:h2:mem:orders\nspring.sql.init.mode=always\n"
    );

    let set_ops = report
        .phases()
        .iter()
        .find(|p| p.name == "Set-operation call merging")
        .unwrap();
    assert!(set_ops.result.requires_manual_review());
    assert!(set_ops.result.manual_review_items()[0].starts_with("2 set-operation call site(s)"));
    assert_eq!(report.exit_code(), 2);
}

#[test]
fn validation_runs_in_project_root() {
    let project = ProjectFixture::new().with_pom(&pom("2.3.12.RELEASE", &[]));
    let root = project.root().to_path_buf();

    let mut runner = MockRunner::new();
    runner
        .expect_run()
        .withf(move |program, args, cwd| program == "mvn" && args == ["-B", "compile"] && cwd == root)
        .times(1)
        .returning(|_, _, _| {
            Ok(CommandOutput {
                exit_code: Some(0),
                output: "BUILD SUCCESS\n".into(),
            })
        });

    let config = project.config("2.4.13").with_validation(true);
    let report = build_pipeline_with(&config, Arc::new(runner)).unwrap().run();

    assert_eq!(report.validation().unwrap().changes(), ["Compile passed"]);
    assert_eq!(report.exit_code(), 0, "{}", report.render_text());
}

#[test]
fn missing_manifest_is_isolated() {
    let project = ProjectFixture::new().with_resource("application.properties", LEGACY_PROPERTIES);
    let report = build_pipeline(&project.config("2.3.12.RELEASE")).unwrap().run();

    let manifest = &report.phases()[0];
    assert!(manifest.name.starts_with("Manifest rules"));
    assert!(manifest.result.errors()[0].starts_with("Cannot load manifest"));

    let properties = &report.phases()[1];
    assert!(properties.result.is_success());
    assert_eq!(properties.result.changes().len(), 2);
    assert_eq!(report.exit_code(), 1);
}

#[test]
fn json_report_round_trips_through_serde() {
    let project = boot_2_2_project();
    let report = build_pipeline(&project.config("2.3.12.RELEASE").with_dry_run(true))
        .unwrap()
        .run();

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["dry_run"], true);
    assert_eq!(json["phases"].as_array().unwrap().len(), report.phases().len());
    assert!(json["started_at"].is_string());
}
