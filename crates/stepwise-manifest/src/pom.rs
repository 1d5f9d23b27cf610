//! Maven `pom.xml` collaborator
//!
//! Reading walks the document once with `quick-xml`, collecting the elements
//! the rule engine cares about and remembering their byte offsets. Writing
//! splices only what changed (parent version, appended dependencies) into
//! the original text, so comments, ordering and formatting survive.

use std::collections::HashMap;
use std::ops::Range;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::ManifestError;
use crate::model::{
    DependencyDescriptor, ManifestModel, ParentReference, PluginDescriptor, SourceLayout,
};

/// One level of indentation for generated elements
const INDENT_UNIT: &str = "    ";

/// Default group of Maven plugins declared without one
const DEFAULT_PLUGIN_GROUP: &str = "org.apache.maven.plugins";

/// Manifest reader/writer collaborator
pub trait ManifestStore: Send + Sync {
    /// Read and parse a manifest
    ///
    /// # Errors
    /// [`ManifestError::NotFound`] if absent, [`ManifestError::Parse`] if malformed.
    fn read(&self, path: &Path) -> Result<ManifestModel, ManifestError>;

    /// Persist a manifest
    ///
    /// # Errors
    /// [`ManifestError::Io`] or [`ManifestError::Render`] when the write fails.
    fn write(&self, path: &Path, model: &ManifestModel) -> Result<(), ManifestError>;
}

/// Filesystem-backed `pom.xml` store
#[derive(Debug, Clone, Copy, Default)]
pub struct PomStore;

impl PomStore {
    /// Create store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ManifestStore for PomStore {
    fn read(&self, path: &Path) -> Result<ManifestModel, ManifestError> {
        if !path.is_file() {
            return Err(ManifestError::NotFound(path.to_path_buf()));
        }
        let text =
            std::fs::read_to_string(path).map_err(|e| ManifestError::io_error(path, e))?;
        parse_pom(&text, path)
    }

    fn write(&self, path: &Path, model: &ManifestModel) -> Result<(), ManifestError> {
        let rendered = render_pom(model, path)?;
        std::fs::write(path, rendered).map_err(|e| ManifestError::io_error(path, e))?;
        tracing::info!("Wrote manifest {}", path.display());
        Ok(())
    }
}

#[derive(Debug, Default)]
struct InMemoryState {
    documents: HashMap<PathBuf, String>,
    writes: usize,
    fail_writes: bool,
}

/// In-memory store, mainly for tests and previews
#[derive(Debug, Default)]
pub struct InMemoryManifestStore {
    state: Mutex<InMemoryState>,
}

impl InMemoryManifestStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with one document
    #[must_use]
    pub fn with_document(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let store = Self::new();
        store.insert(path, text);
        store
    }

    /// Insert or replace a document
    pub fn insert(&self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.state.lock().documents.insert(path.into(), text.into());
    }

    /// Current document text
    #[must_use]
    pub fn document(&self, path: &Path) -> Option<String> {
        self.state.lock().documents.get(path).cloned()
    }

    /// Number of successful writes
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.state.lock().writes
    }

    /// Make every subsequent write fail with an IO error
    pub fn fail_writes(&self, fail: bool) {
        self.state.lock().fail_writes = fail;
    }
}

impl ManifestStore for InMemoryManifestStore {
    fn read(&self, path: &Path) -> Result<ManifestModel, ManifestError> {
        let text = self
            .document(path)
            .ok_or_else(|| ManifestError::NotFound(path.to_path_buf()))?;
        parse_pom(&text, path)
    }

    fn write(&self, path: &Path, model: &ManifestModel) -> Result<(), ManifestError> {
        let rendered = render_pom(model, path)?;
        let mut state = self.state.lock();
        if state.fail_writes {
            return Err(ManifestError::io_error(
                path,
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only store"),
            ));
        }
        state.documents.insert(path.to_path_buf(), rendered);
        state.writes += 1;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Coordinates {
    group_id: Option<String>,
    artifact_id: Option<String>,
    version: Option<String>,
    scope: Option<String>,
}

impl Coordinates {
    fn set(&mut self, field: &str, value: String) {
        match field {
            "groupId" => self.group_id = Some(value),
            "artifactId" => self.artifact_id = Some(value),
            "version" => self.version = Some(value),
            "scope" => self.scope = Some(value),
            _ => {}
        }
    }

    fn into_dependency(self, path: &Path) -> Result<DependencyDescriptor, ManifestError> {
        match (self.group_id, self.artifact_id) {
            (Some(group_id), Some(artifact_id)) => Ok(DependencyDescriptor {
                group_id,
                artifact_id,
                version: self.version,
                scope: self.scope,
            }),
            _ => Err(ManifestError::parse(
                path,
                "dependency without groupId/artifactId",
            )),
        }
    }
}

const PARENT: &[&str] = &["project", "parent"];
const DEPENDENCIES: &[&str] = &["project", "dependencies"];
const DEPENDENCY: &[&str] = &["project", "dependencies", "dependency"];
const MANAGEMENT: &[&str] = &["project", "dependencyManagement", "dependencies"];
const MANAGED_DEPENDENCY: &[&str] = &["project", "dependencyManagement", "dependencies", "dependency"];
const PLUGINS: &[&str] = &["project", "build", "plugins"];
const PLUGIN: &[&str] = &["project", "build", "plugins", "plugin"];

fn at(stack: &[String], path: &[&str]) -> bool {
    stack.len() == path.len() && stack.iter().zip(path).all(|(a, b)| a == b)
}

/// Leaf element directly below `path`
fn leaf_of<'s>(stack: &'s [String], path: &[&str]) -> Option<&'s str> {
    match stack.split_last() {
        Some((leaf, parent)) if at(parent, path) => Some(leaf.as_str()),
        _ => None,
    }
}

fn position(reader: &Reader<&[u8]>) -> usize {
    usize::try_from(reader.buffer_position()).unwrap_or(usize::MAX)
}

/// Parse a `pom.xml` document
///
/// # Errors
/// Returns [`ManifestError::Parse`] for malformed XML, a document whose root
/// is not `<project>`, or dependencies missing their coordinates.
pub fn parse_pom(text: &str, path: &Path) -> Result<ManifestModel, ManifestError> {
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<String> = Vec::new();
    let mut model = ManifestModel::new();
    let mut layout = SourceLayout {
        text: text.to_string(),
        ..SourceLayout::default()
    };

    let mut parent: Option<Coordinates> = None;
    let mut dependency: Option<Coordinates> = None;
    let mut managed: Option<Coordinates> = None;
    let mut plugin: Option<Coordinates> = None;
    let mut saw_project = false;

    loop {
        let start = position(&reader);
        let event = reader
            .read_event()
            .map_err(|e| ManifestError::parse(path, format!("{e} (near byte {start})")))?;
        let end = position(&reader);

        match event {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if stack.is_empty() {
                    if name != "project" {
                        return Err(ManifestError::parse(
                            path,
                            format!("root element is <{name}>, expected <project>"),
                        ));
                    }
                    saw_project = true;
                }
                stack.push(name);

                if at(&stack, PARENT) {
                    parent = Some(Coordinates::default());
                } else if at(&stack, DEPENDENCY) {
                    dependency = Some(Coordinates::default());
                } else if at(&stack, MANAGED_DEPENDENCY) {
                    managed = Some(Coordinates::default());
                } else if at(&stack, PLUGIN) {
                    plugin = Some(Coordinates::default());
                } else if at(&stack, MANAGEMENT) {
                    model.dependency_management.get_or_insert_with(Vec::new);
                } else if at(&stack, PLUGINS) {
                    model.plugins.get_or_insert_with(Vec::new);
                }
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if at(&stack, &["project"]) && name == "dependencies" {
                    layout.dependencies_empty = Some(tag_start(text, start, end)..end);
                }
            }
            Event::Text(t) => {
                let raw = t
                    .unescape()
                    .map_err(|e| ManifestError::parse(path, e.to_string()))?;
                let value = raw.trim();
                if value.is_empty() {
                    continue;
                }

                if let Some(field) = leaf_of(&stack, PARENT) {
                    if field == "version" {
                        layout.parent_version = Some(trimmed_span(text, start..end));
                    }
                    if let Some(c) = parent.as_mut() {
                        c.set(field, value.to_string());
                    }
                } else if let Some(field) = leaf_of(&stack, DEPENDENCY) {
                    if let Some(c) = dependency.as_mut() {
                        c.set(field, value.to_string());
                    }
                } else if let Some(field) = leaf_of(&stack, MANAGED_DEPENDENCY) {
                    if let Some(c) = managed.as_mut() {
                        c.set(field, value.to_string());
                    }
                } else if let Some(field) = leaf_of(&stack, PLUGIN) {
                    if let Some(c) = plugin.as_mut() {
                        c.set(field, value.to_string());
                    }
                }
            }
            Event::End(_) => {
                if at(&stack, PARENT) {
                    if let Some(c) = parent.take() {
                        model.parent = Some(finish_parent(c, path)?);
                    }
                } else if at(&stack, DEPENDENCY) {
                    if let Some(c) = dependency.take() {
                        model.dependencies.push(c.into_dependency(path)?);
                    }
                } else if at(&stack, MANAGED_DEPENDENCY) {
                    if let Some(c) = managed.take() {
                        model
                            .dependency_management
                            .get_or_insert_with(Vec::new)
                            .push(c.into_dependency(path)?);
                    }
                } else if at(&stack, PLUGIN) {
                    if let Some(c) = plugin.take() {
                        model.plugins.get_or_insert_with(Vec::new).push(PluginDescriptor {
                            group_id: c
                                .group_id
                                .unwrap_or_else(|| DEFAULT_PLUGIN_GROUP.to_string()),
                            artifact_id: c.artifact_id.ok_or_else(|| {
                                ManifestError::parse(path, "plugin without artifactId")
                            })?,
                        });
                    }
                } else if at(&stack, DEPENDENCIES) {
                    layout.dependencies_close = Some(tag_start(text, start, end));
                } else if at(&stack, &["project"]) {
                    layout.project_close = Some(tag_start(text, start, end));
                }
                stack.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_project {
        return Err(ManifestError::parse(path, "no <project> element"));
    }

    layout.original_dependency_count = model.dependencies.len();
    model.layout = Some(layout);
    tracing::debug!(
        "Parsed manifest {} ({} dependencies)",
        path.display(),
        model.dependencies.len()
    );
    Ok(model)
}

fn finish_parent(c: Coordinates, path: &Path) -> Result<ParentReference, ManifestError> {
    match (c.group_id, c.artifact_id, c.version) {
        (Some(group_id), Some(artifact_id), Some(version)) => Ok(ParentReference {
            group_id,
            artifact_id,
            version,
        }),
        _ => Err(ManifestError::parse(
            path,
            "parent requires groupId, artifactId and version",
        )),
    }
}

/// Offset of the `<` opening the markup event that ended at `end`
fn tag_start(text: &str, fallback: usize, end: usize) -> usize {
    text.get(..end)
        .and_then(|head| head.rfind('<'))
        .unwrap_or(fallback)
}

/// Narrow a text event span to its non-whitespace content
fn trimmed_span(text: &str, span: Range<usize>) -> Range<usize> {
    let end = span.end.min(text.len());
    let start = span.start.min(end);
    let slice = &text[start..end];
    let body = slice.trim_start();
    let leading = slice.len() - body.len();
    let body = body.trim_end_matches(|c: char| c == '<' || c.is_whitespace());
    (start + leading)..(start + leading + body.len())
}

/// Indentation of the line containing `offset`, if only whitespace precedes it
fn line_indent(text: &str, offset: usize) -> Option<(usize, &str)> {
    let line_start = text[..offset].rfind('\n').map_or(0, |i| i + 1);
    let prefix = &text[line_start..offset];
    prefix
        .chars()
        .all(|c| c == ' ' || c == '\t')
        .then_some((line_start, prefix))
}

fn element(indent: &str, name: &str, value: &str) -> String {
    format!("{indent}<{name}>{}</{name}>\n", escape(value))
}

fn render_dependency(dep: &DependencyDescriptor, indent: &str) -> String {
    let inner = format!("{indent}{INDENT_UNIT}");
    let mut out = format!("{indent}<dependency>\n");
    out.push_str(&element(&inner, "groupId", &dep.group_id));
    out.push_str(&element(&inner, "artifactId", &dep.artifact_id));
    if let Some(version) = &dep.version {
        out.push_str(&element(&inner, "version", version));
    }
    if let Some(scope) = &dep.scope {
        out.push_str(&element(&inner, "scope", scope));
    }
    out.push_str(&format!("{indent}</dependency>\n"));
    out
}

fn render_dependencies(deps: &[DependencyDescriptor], indent: &str) -> String {
    deps.iter().map(|d| render_dependency(d, indent)).collect()
}

/// Render a manifest back to text
///
/// Models read from a document are rendered by splicing edits into the
/// original text; models built in memory get a fresh document.
///
/// # Errors
/// Returns [`ManifestError::Render`] if the model contains an edit the
/// splicer cannot express (removed dependencies, added or removed parent).
pub fn render_pom(model: &ManifestModel, path: &Path) -> Result<String, ManifestError> {
    let Some(layout) = &model.layout else {
        return Ok(render_fresh(model));
    };
    let text = layout.text.as_str();
    let mut edits: Vec<(Range<usize>, String)> = Vec::new();

    match (&model.parent, &layout.parent_version) {
        (Some(parent), Some(span)) => {
            if text[span.clone()] != *escape(&parent.version) {
                edits.push((span.clone(), escape(&parent.version).into_owned()));
            }
        }
        (None, None) => {}
        (Some(_), None) => {
            return Err(ManifestError::render(path, "cannot add a parent reference"));
        }
        (None, Some(_)) => {
            return Err(ManifestError::render(path, "cannot remove the parent reference"));
        }
    }

    let original = layout.original_dependency_count;
    if model.dependencies.len() < original {
        return Err(ManifestError::render(path, "dependencies cannot be removed"));
    }
    let added = &model.dependencies[original..];

    if !added.is_empty() {
        if let Some(close) = layout.dependencies_close {
            match line_indent(text, close) {
                Some((line_start, indent)) => {
                    let child = format!("{indent}{INDENT_UNIT}");
                    edits.push((line_start..line_start, render_dependencies(added, &child)));
                }
                None => {
                    let block = render_dependencies(added, INDENT_UNIT);
                    edits.push((close..close, format!("\n{block}")));
                }
            }
        } else if let Some(span) = &layout.dependencies_empty {
            let indent = line_indent(text, span.start).map_or("", |(_, i)| i);
            let child = format!("{indent}{INDENT_UNIT}");
            let block = format!(
                "<dependencies>\n{}{indent}</dependencies>",
                render_dependencies(added, &child)
            );
            edits.push((span.clone(), block));
        } else if let Some(close) = layout.project_close {
            let (line_start, indent) = line_indent(text, close).unwrap_or((close, ""));
            let section = format!("{indent}{INDENT_UNIT}");
            let child = format!("{section}{INDENT_UNIT}");
            let block = format!(
                "{section}<dependencies>\n{}{section}</dependencies>\n",
                render_dependencies(added, &child)
            );
            edits.push((line_start..line_start, block));
        } else {
            return Err(ManifestError::render(path, "no place to insert dependencies"));
        }
    }

    let mut out = text.to_string();
    edits.sort_by_key(|(range, _)| std::cmp::Reverse(range.start));
    for (range, replacement) in edits {
        out.replace_range(range, &replacement);
    }
    Ok(out)
}

fn render_fresh(model: &ManifestModel) -> String {
    let one = INDENT_UNIT;
    let two = format!("{one}{one}");
    let three = format!("{two}{one}");

    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<project xmlns=\"http://maven.apache.org/POM/4.0.0\">\n");
    out.push_str(&element(one, "modelVersion", "4.0.0"));

    if let Some(parent) = &model.parent {
        out.push_str(&format!("{one}<parent>\n"));
        out.push_str(&element(&two, "groupId", &parent.group_id));
        out.push_str(&element(&two, "artifactId", &parent.artifact_id));
        out.push_str(&element(&two, "version", &parent.version));
        out.push_str(&format!("{one}</parent>\n"));
    }

    if let Some(managed) = &model.dependency_management {
        out.push_str(&format!("{one}<dependencyManagement>\n{two}<dependencies>\n"));
        out.push_str(&render_dependencies(managed, &three));
        out.push_str(&format!("{two}</dependencies>\n{one}</dependencyManagement>\n"));
    }

    if !model.dependencies.is_empty() {
        out.push_str(&format!("{one}<dependencies>\n"));
        out.push_str(&render_dependencies(&model.dependencies, &two));
        out.push_str(&format!("{one}</dependencies>\n"));
    }

    if let Some(plugins) = &model.plugins {
        out.push_str(&format!("{one}<build>\n{two}<plugins>\n"));
        for plugin in plugins {
            out.push_str(&format!("{three}<plugin>\n"));
            out.push_str(&element(&format!("{three}{one}"), "groupId", &plugin.group_id));
            out.push_str(&element(&format!("{three}{one}"), "artifactId", &plugin.artifact_id));
            out.push_str(&format!("{three}</plugin>\n"));
        }
        out.push_str(&format!("{two}</plugins>\n{one}</build>\n"));
    }

    out.push_str("</project>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
    <modelVersion>4.0.0</modelVersion>
    <parent>
        <groupId>org.springframework.boot</groupId>
        <artifactId>spring-boot-starter-parent</artifactId>
        <version>2.2.13.RELEASE</version>
        <relativePath/> <!-- lookup parent from repository -->
    </parent>
    <dependencyManagement>
        <dependencies>
            <dependency>
                <groupId>org.springframework.cloud</groupId>
                <artifactId>spring-cloud-dependencies</artifactId>
                <version>Hoxton.SR8</version>
                <type>pom</type>
                <scope>import</scope>
            </dependency>
        </dependencies>
    </dependencyManagement>
    <dependencies>
        <dependency>
            <groupId>org.springframework.boot</groupId>
            <artifactId>spring-boot-starter-web</artifactId>
        </dependency>
        <dependency>
            <groupId>junit</groupId>
            <artifactId>junit</artifactId>
            <scope>test</scope>
        </dependency>
    </dependencies>
    <build>
        <plugins>
            <plugin>
                <groupId>org.springframework.boot</groupId>
                <artifactId>spring-boot-maven-plugin</artifactId>
            </plugin>
            <plugin>
                <artifactId>maven-surefire-plugin</artifactId>
            </plugin>
        </plugins>
    </build>
</project>
"#;

    fn path() -> &'static Path {
        Path::new("pom.xml")
    }

    #[test]
    fn parse_reads_all_sections() {
        let model = parse_pom(POM, path()).unwrap();

        let parent = model.parent.as_ref().unwrap();
        assert_eq!(parent.version, "2.2.13.RELEASE");
        assert!(parent.is("org.springframework.boot", "spring-boot-starter-parent"));

        assert_eq!(model.dependencies.len(), 2);
        assert_eq!(model.dependencies[1].scope.as_deref(), Some("test"));

        let managed = model
            .find_managed_dependency("org.springframework.cloud", "spring-cloud-dependencies")
            .unwrap();
        assert_eq!(managed.version.as_deref(), Some("Hoxton.SR8"));

        assert!(model.has_plugin("org.apache.maven.plugins", "maven-surefire-plugin"));
        assert!(model.has_source());
    }

    #[test]
    fn unchanged_model_renders_identically() {
        let model = parse_pom(POM, path()).unwrap();
        assert_eq!(render_pom(&model, path()).unwrap(), POM);
    }

    #[test]
    fn parent_version_is_spliced() {
        let mut model = parse_pom(POM, path()).unwrap();
        if let Some(parent) = model.parent.as_mut() {
            parent.version = "2.3.12.RELEASE".to_string();
        }

        let rendered = render_pom(&model, path()).unwrap();
        assert_eq!(rendered, POM.replace("2.2.13.RELEASE", "2.3.12.RELEASE"));
    }

    #[test]
    fn appended_dependency_matches_indentation() {
        let mut model = parse_pom(POM, path()).unwrap();
        model.dependencies.push(DependencyDescriptor::new(
            "org.springframework.boot",
            "spring-boot-starter-validation",
        ));

        let rendered = render_pom(&model, path()).unwrap();
        let expected_block = "        <dependency>\n            <groupId>org.springframework.boot</groupId>\n            <artifactId>spring-boot-starter-validation</artifactId>\n        </dependency>\n    </dependencies>";
        assert!(rendered.contains(expected_block));

        let reparsed = parse_pom(&rendered, path()).unwrap();
        assert_eq!(reparsed.dependencies.len(), 3);
    }

    #[test]
    fn dependencies_section_created_when_missing() {
        let text = "<project>\n    <modelVersion>4.0.0</modelVersion>\n</project>\n";
        let mut model = parse_pom(text, path()).unwrap();
        model
            .dependencies
            .push(DependencyDescriptor::new("junit", "junit").with_scope("test"));

        let rendered = render_pom(&model, path()).unwrap();
        let reparsed = parse_pom(&rendered, path()).unwrap();
        assert!(reparsed.has_dependency("junit", "junit"));
        assert!(rendered.contains("    <dependencies>\n        <dependency>"));
    }

    #[test]
    fn empty_dependencies_element_is_expanded() {
        let text = "<project>\n    <dependencies/>\n</project>\n";
        let mut model = parse_pom(text, path()).unwrap();
        model.dependencies.push(DependencyDescriptor::new("a", "b"));

        let rendered = render_pom(&model, path()).unwrap();
        let reparsed = parse_pom(&rendered, path()).unwrap();
        assert_eq!(reparsed.dependencies.len(), 1);
        assert!(!rendered.contains("<dependencies/>"));
    }

    #[test]
    fn malformed_xml_is_parse_error() {
        let err = parse_pom("<project><parent></project>", path()).unwrap_err();
        assert!(matches!(err, ManifestError::Parse { .. }));
    }

    #[test]
    fn wrong_root_is_parse_error() {
        let err = parse_pom("<settings></settings>", path()).unwrap_err();
        assert!(err.to_string().contains("expected <project>"));
    }

    #[test]
    fn dependency_without_artifact_is_parse_error() {
        let text = "<project><dependencies><dependency><groupId>a</groupId></dependency></dependencies></project>";
        assert!(parse_pom(text, path()).is_err());
    }

    #[test]
    fn removing_dependencies_is_rejected() {
        let mut model = parse_pom(POM, path()).unwrap();
        model.dependencies.pop();
        assert!(matches!(
            render_pom(&model, path()),
            Err(ManifestError::Render { .. })
        ));
    }

    #[test]
    fn fresh_model_renders_parseable_document() {
        let model = ManifestModel::new()
            .with_parent(ParentReference::new("g", "p", "1.0"))
            .with_dependency(DependencyDescriptor::new("a", "b").with_version("1 & 2"))
            .with_managed_dependency(DependencyDescriptor::new("c", "d").with_version("3"))
            .with_plugin(PluginDescriptor::new("e", "f"));

        let rendered = render_pom(&model, path()).unwrap();
        assert!(rendered.contains("1 &amp; 2"));

        let reparsed = parse_pom(&rendered, path()).unwrap();
        assert_eq!(reparsed.parent, model.parent);
        assert_eq!(reparsed.dependencies, model.dependencies);
        assert_eq!(reparsed.dependency_management, model.dependency_management);
        assert_eq!(reparsed.plugins, model.plugins);
    }

    #[test]
    fn pom_store_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("pom.xml");
        std::fs::write(&file, POM).unwrap();

        let store = PomStore::new();
        let mut model = store.read(&file).unwrap();
        if let Some(parent) = model.parent.as_mut() {
            parent.version = "2.3.12.RELEASE".to_string();
        }
        store.write(&file, &model).unwrap();

        let reread = store.read(&file).unwrap();
        assert_eq!(reread.parent.unwrap().version, "2.3.12.RELEASE");
    }

    #[test]
    fn pom_store_missing_file() {
        let err = PomStore::new().read(Path::new("/no/such/pom.xml")).unwrap_err();
        assert!(matches!(err, ManifestError::NotFound(_)));
    }

    #[test]
    fn in_memory_store_counts_and_fails_writes() {
        let store = InMemoryManifestStore::with_document("pom.xml", POM);
        let model = store.read(path()).unwrap();

        store.write(path(), &model).unwrap();
        assert_eq!(store.write_count(), 1);

        store.fail_writes(true);
        assert!(store.write(path(), &model).is_err());
        assert_eq!(store.write_count(), 1);
    }
}
