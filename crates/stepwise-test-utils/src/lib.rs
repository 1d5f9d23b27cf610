//! Testing utilities for the stepwise workspace
//!
//! Sample manifests, Java sources and configuration files, plus helpers that
//! put them into in-memory stores or a temporary project directory.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use stepwise_ast::InMemorySourceStore;
use stepwise_core::MigrationConfig;
use stepwise_manifest::InMemoryManifestStore;
use stepwise_properties::InMemoryConfigFileStore;
use tempfile::TempDir;

pub const BOOT_PARENT_GROUP: &str = "org.springframework.boot";
pub const BOOT_PARENT_ARTIFACT: &str = "spring-boot-starter-parent";

/// `pom.xml` with the Boot parent at `parent_version` and the given
/// `(group, artifact)` dependencies
pub fn pom(parent_version: &str, dependencies: &[(&str, &str)]) -> String {
    let mut deps = String::new();
    for (group, artifact) in dependencies {
        deps.push_str(&format!(
            "        <dependency>\n            <groupId>{group}</groupId>\n            <artifactId>{artifact}</artifactId>\n        </dependency>\n"
        ));
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
    <modelVersion>4.0.0</modelVersion>
    <parent>
        <groupId>{BOOT_PARENT_GROUP}</groupId>
        <artifactId>{BOOT_PARENT_ARTIFACT}</artifactId>
        <version>{parent_version}</version>
    </parent>
    <groupId>com.example</groupId>
    <artifactId>orders</artifactId>
    <dependencies>
{deps}    </dependencies>
</project>
"#
    )
}

/// Web + Cassandra service on Boot 2.2
pub fn boot_2_2_cassandra_pom() -> String {
    pom(
        "2.2.13.RELEASE",
        &[
            ("org.springframework.boot", "spring-boot-starter-web"),
            ("com.datastax.cassandra", "cassandra-driver-core"),
        ],
    )
}

pub const CASSANDRA_REPOSITORY: &str = r#"package com.example.orders;

import com.datastax.driver.core.Cluster;
import com.datastax.driver.core.ResultSet;
import com.datastax.driver.core.Session;
import java.util.List;

public class OrderRepository {
    private final Session session;

    public OrderRepository(Cluster cluster) {
        this.session = cluster.connect("orders");
    }

    public ResultSet findAll() {
        return session.execute("SELECT * FROM orders");
    }
}
"#;

pub const PLAIN_SERVICE: &str = r#"package com.example.orders;

import java.util.List;

public class OrderService {
    public int count(List<String> ids) {
        return ids.size();
    }
}
"#;

pub const REDIS_SET_OPERATIONS: &str = r#"package com.example.cache;

import java.util.Collection;
import java.util.Set;
import org.springframework.data.redis.core.SetOperations;

public class TagIndex {
    private final SetOperations<String, String> ops;

    public TagIndex(SetOperations<String, String> ops) {
        this.ops = ops;
    }

    public Set<String> shared(String key, Collection<String> otherKeys) {
        return ops.intersect(key, otherKeys);
    }

    public Set<String> all(String key, Collection<String> otherKeys) {
        return ops.union(key, otherKeys);
    }
}
"#;

pub const LEGACY_PROPERTIES: &str = "# HTTP\nspring.http.encoding.charset=UTF-8\nspring.http.encoding.enabled=true\nserver.port=8080\n";

pub const LEGACY_DATASOURCE_PROPERTIES: &str =
    "spring.datasource.url=jdbc:h2:mem:orders\nspring.datasource.initialization-mode=always\n";

/// Manifest store holding one `pom.xml`
pub fn manifest_store(text: &str) -> Arc<InMemoryManifestStore> {
    Arc::new(InMemoryManifestStore::with_document("pom.xml", text))
}

/// Source store holding the given `(unit name, source)` pairs
///
/// # Panics
/// If a source does not parse.
pub fn source_store(units: &[(&str, &str)]) -> Arc<InMemorySourceStore> {
    let store = Arc::new(InMemorySourceStore::new());
    for (name, text) in units {
        if let Err(err) = store.add_source(name, text) {
            panic!("fixture {name} does not parse: {err}");
        }
    }
    store
}

/// Config-file store holding the given `(path, contents)` pairs
pub fn config_store(files: &[(&str, &str)]) -> Arc<InMemoryConfigFileStore> {
    let store = Arc::new(InMemoryConfigFileStore::new());
    for (path, text) in files {
        store.insert(*path, *text);
    }
    store
}

/// Maven-layout project in a temporary directory
pub struct ProjectFixture {
    dir: TempDir,
}

impl ProjectFixture {
    /// Empty project
    ///
    /// # Panics
    /// If the temporary directory cannot be created.
    pub fn new() -> Self {
        match tempfile::tempdir() {
            Ok(dir) => Self { dir },
            Err(err) => panic!("cannot create temp project: {err}"),
        }
    }

    /// Project root
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file relative to the root, creating parent directories
    ///
    /// # Panics
    /// On any IO error.
    pub fn write(&self, relative: impl AsRef<Path>, contents: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            if let Err(err) = std::fs::create_dir_all(parent) {
                panic!("cannot create {}: {err}", parent.display());
            }
        }
        if let Err(err) = std::fs::write(&path, contents) {
            panic!("cannot write {}: {err}", path.display());
        }
        path
    }

    /// With `pom.xml`
    pub fn with_pom(self, text: &str) -> Self {
        self.write("pom.xml", text);
        self
    }

    /// With a main source file for `package.Class`
    pub fn with_java(self, package: &str, class: &str, text: &str) -> Self {
        let dir = package.replace('.', "/");
        self.write(format!("src/main/java/{dir}/{class}.java"), text);
        self
    }

    /// With a main resource file
    pub fn with_resource(self, name: &str, text: &str) -> Self {
        self.write(format!("src/main/resources/{name}"), text);
        self
    }

    /// Read a file relative to the root
    ///
    /// # Panics
    /// If the file cannot be read.
    pub fn read(&self, relative: impl AsRef<Path>) -> String {
        let path = self.dir.path().join(relative);
        match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) => panic!("cannot read {}: {err}", path.display()),
        }
    }

    /// Config for this project, validation disabled
    pub fn config(&self, target_version: &str) -> MigrationConfig {
        MigrationConfig::new()
            .with_project_root(self.root())
            .with_target_version(target_version)
            .with_validation(false)
    }
}

impl Default for ProjectFixture {
    fn default() -> Self {
        Self::new()
    }
}
