//! Parsed Java source unit
//!
//! A [`SourceUnit`] owns its text and a tree-sitter tree. The tree is never
//! edited directly: every change goes through [`SourceUnit::splice`], which
//! re-parses incrementally and refuses any edit that leaves error nodes
//! behind. A unit is therefore always parseable and printable.

use std::ops::Range;
use std::path::{Path, PathBuf};

use tree_sitter::{InputEdit, Node, Parser, Point, Tree};

use crate::error::SourceError;

/// Import declaration as written in the unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    /// Qualified name without `static` or the trailing `.*`
    pub name: String,
    /// `import static ...`
    pub is_static: bool,
    /// `import a.b.*;`
    pub is_wildcard: bool,
    /// Whole declaration, `import` through `;`
    pub span: Range<usize>,
    /// The qualified name only
    pub name_span: Range<usize>,
}

/// Method invocation found in the unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    /// Invoked method name
    pub method: String,
    /// Receiver expression text, if any
    pub receiver: Option<String>,
    /// Argument expression texts, comments excluded
    pub arguments: Vec<String>,
    /// Argument list including parentheses
    pub arguments_span: Range<usize>,
    /// Whole invocation
    pub span: Range<usize>,
}

/// Dotted type name used outside import and package declarations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    /// Name text
    pub text: String,
    /// Byte range
    pub span: Range<usize>,
}

/// One compilation unit
#[derive(Clone)]
pub struct SourceUnit {
    name: String,
    path: Option<PathBuf>,
    text: String,
    tree: Tree,
}

impl std::fmt::Debug for SourceUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceUnit")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("len", &self.text.len())
            .finish()
    }
}

fn java_parser() -> Result<Parser, SourceError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_java::LANGUAGE.into())
        .map_err(|e| SourceError::Parser(e.to_string()))?;
    Ok(parser)
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find_map(first_error);
    found.or(Some(node))
}

/// Row/column of a byte offset
fn point_at(text: &str, offset: usize) -> Point {
    let before = &text.as_bytes()[..offset];
    let row = before.iter().filter(|b| **b == b'\n').count();
    let column = before
        .iter()
        .rposition(|b| *b == b'\n')
        .map_or(offset, |nl| offset - nl - 1);
    Point { row, column }
}

fn is_name_node(node: &Node<'_>) -> bool {
    matches!(node.kind(), "identifier" | "scoped_identifier")
}

impl SourceUnit {
    /// Parse a unit
    ///
    /// # Errors
    /// [`SourceError::Syntax`] if the text does not parse without error nodes.
    pub fn parse(name: impl Into<String>, text: impl Into<String>) -> Result<Self, SourceError> {
        let name = name.into();
        let text = text.into();
        let tree = java_parser()?
            .parse(&text, None)
            .ok_or_else(|| SourceError::Parser("parser returned no tree".to_string()))?;

        if let Some(node) = first_error(tree.root_node()) {
            let position = node.start_position();
            return Err(SourceError::Syntax {
                unit: name,
                line: position.row + 1,
                column: position.column + 1,
            });
        }

        Ok(Self {
            name,
            path: None,
            text,
            tree,
        })
    }

    /// With a different unit name
    #[inline]
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// With backing file
    #[inline]
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Unit name (package + type name)
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Backing file, if any
    #[inline]
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Current text
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    fn node_text(&self, node: &Node<'_>) -> &str {
        &self.text[node.byte_range()]
    }

    /// Declared package
    #[must_use]
    pub fn package_name(&self) -> Option<String> {
        let root = self.tree.root_node();
        let mut cursor = root.walk();
        let package = root
            .named_children(&mut cursor)
            .find(|n| n.kind() == "package_declaration")?;
        let mut inner = package.walk();
        let name = package.named_children(&mut inner).find(is_name_node)?;
        Some(self.node_text(&name).to_string())
    }

    /// Import declarations in document order
    #[must_use]
    pub fn imports(&self) -> Vec<ImportDecl> {
        let root = self.tree.root_node();
        let mut cursor = root.walk();
        root.named_children(&mut cursor)
            .filter(|n| n.kind() == "import_declaration")
            .filter_map(|decl| {
                let mut inner = decl.walk();
                let children: Vec<Node<'_>> = decl.children(&mut inner).collect();
                let name = children.iter().find(|c| is_name_node(c))?;
                Some(ImportDecl {
                    name: self.node_text(name).to_string(),
                    is_static: children.iter().any(|c| c.kind() == "static"),
                    is_wildcard: children.iter().any(|c| c.kind() == "asterisk"),
                    span: decl.byte_range(),
                    name_span: name.byte_range(),
                })
            })
            .collect()
    }

    /// Whether `name` is imported, exactly or through a wildcard
    #[must_use]
    pub fn has_import(&self, name: &str) -> bool {
        let package = name.rsplit_once('.').map(|(p, _)| p);
        self.imports().iter().any(|decl| {
            !decl.is_static
                && ((!decl.is_wildcard && decl.name == name)
                    || (decl.is_wildcard && Some(decl.name.as_str()) == package))
        })
    }

    /// Every method invocation, outer calls before the calls nested in them
    #[must_use]
    pub fn method_calls(&self) -> Vec<MethodCall> {
        let mut calls = Vec::new();
        self.collect_calls(self.tree.root_node(), &mut calls);
        calls
    }

    fn collect_calls(&self, node: Node<'_>, calls: &mut Vec<MethodCall>) {
        if node.kind() == "method_invocation" {
            if let (Some(name), Some(args)) = (
                node.child_by_field_name("name"),
                node.child_by_field_name("arguments"),
            ) {
                let mut cursor = args.walk();
                let arguments = args
                    .named_children(&mut cursor)
                    .filter(|a| !a.is_extra())
                    .map(|a| self.node_text(&a).to_string())
                    .collect();
                calls.push(MethodCall {
                    method: self.node_text(&name).to_string(),
                    receiver: node
                        .child_by_field_name("object")
                        .map(|o| self.node_text(&o).to_string()),
                    arguments,
                    arguments_span: args.byte_range(),
                    span: node.byte_range(),
                });
            }
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.collect_calls(child, calls);
        }
    }

    /// Outermost dotted type names in declarations and expressions
    #[must_use]
    pub fn qualified_type_names(&self) -> Vec<QualifiedName> {
        let mut names = Vec::new();
        self.collect_qualified(self.tree.root_node(), &mut names);
        names
    }

    fn collect_qualified(&self, node: Node<'_>, names: &mut Vec<QualifiedName>) {
        match node.kind() {
            "import_declaration" | "package_declaration" => return,
            "scoped_type_identifier" => {
                names.push(QualifiedName {
                    text: self.node_text(&node).to_string(),
                    span: node.byte_range(),
                });
                return;
            }
            _ => {}
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.collect_qualified(child, names);
        }
    }

    /// Replace `range` with `replacement`
    ///
    /// # Errors
    /// [`SourceError::InvalidEdit`] if the range is out of bounds or the
    /// result would not parse cleanly; the unit is unchanged in that case.
    pub fn splice(&mut self, range: Range<usize>, replacement: &str) -> Result<(), SourceError> {
        if range.start > range.end
            || range.end > self.text.len()
            || !self.text.is_char_boundary(range.start)
            || !self.text.is_char_boundary(range.end)
        {
            return Err(SourceError::invalid_edit(
                &self.name,
                format!("range {range:?} outside of text"),
            ));
        }

        let mut text = self.text.clone();
        text.replace_range(range.clone(), replacement);
        let new_end = range.start + replacement.len();
        let edit = InputEdit {
            start_byte: range.start,
            old_end_byte: range.end,
            new_end_byte: new_end,
            start_position: point_at(&self.text, range.start),
            old_end_position: point_at(&self.text, range.end),
            new_end_position: point_at(&text, new_end),
        };

        let mut old_tree = self.tree.clone();
        old_tree.edit(&edit);
        let tree = java_parser()?
            .parse(&text, Some(&old_tree))
            .ok_or_else(|| SourceError::invalid_edit(&self.name, "parser returned no tree"))?;

        if let Some(node) = first_error(tree.root_node()) {
            let position = node.start_position();
            return Err(SourceError::invalid_edit(
                &self.name,
                format!(
                    "edit would break syntax at {}:{}",
                    position.row + 1,
                    position.column + 1
                ),
            ));
        }

        self.text = text;
        self.tree = tree;
        Ok(())
    }

    /// Add `import name;` unless already covered
    ///
    /// Returns whether a declaration was inserted.
    ///
    /// # Errors
    /// Propagates a rejected [`SourceUnit::splice`].
    pub fn add_import(&mut self, name: &str) -> Result<bool, SourceError> {
        if self.has_import(name) {
            return Ok(false);
        }
        let declaration = format!("import {name};");

        if let Some(last) = self.imports().last() {
            let at = last.span.end;
            self.splice(at..at, &format!("\n{declaration}"))?;
            return Ok(true);
        }

        let package_end = {
            let root = self.tree.root_node();
            let mut cursor = root.walk();
            let end = root
                .named_children(&mut cursor)
                .find(|n| n.kind() == "package_declaration")
                .map(|n| n.end_byte());
            end
        };
        match package_end {
            Some(at) => self.splice(at..at, &format!("\n\n{declaration}"))?,
            None => self.splice(0..0, &format!("{declaration}\n\n"))?,
        }
        Ok(true)
    }

    /// Remove a declaration together with its line break
    ///
    /// # Errors
    /// Propagates a rejected [`SourceUnit::splice`].
    pub fn remove_import(&mut self, decl: &ImportDecl) -> Result<(), SourceError> {
        let rest = &self.text[decl.span.end.min(self.text.len())..];
        let trailing = if rest.starts_with("\r\n") {
            2
        } else {
            usize::from(rest.starts_with('\n'))
        };
        self.splice(decl.span.start..decl.span.end + trailing, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SOURCE: &str = "package com.acme.data;

import com.datastax.driver.core.Cluster;
import static org.junit.Assert.assertEquals;
import java.util.*;

public class Repo {
    private com.datastax.driver.core.Session session;

    void run(RedisTemplate<String, String> redis) {
        redis.opsForSet().union(\"a\", /* other keys */ keys());
    }
}
";

    fn unit() -> SourceUnit {
        SourceUnit::parse("com.acme.data.Repo", SOURCE).unwrap()
    }

    #[test]
    fn package_and_imports() {
        let unit = unit();
        assert_eq!(unit.package_name().as_deref(), Some("com.acme.data"));

        let imports = unit.imports();
        assert_eq!(imports.len(), 3);
        assert_eq!(imports[0].name, "com.datastax.driver.core.Cluster");
        assert!(imports[1].is_static);
        assert_eq!(imports[2].name, "java.util");
        assert!(imports[2].is_wildcard);
        assert_eq!(&SOURCE[imports[0].name_span.clone()], "com.datastax.driver.core.Cluster");
    }

    #[test]
    fn has_import_through_wildcard() {
        let unit = unit();
        assert!(unit.has_import("java.util.List"));
        assert!(unit.has_import("com.datastax.driver.core.Cluster"));
        assert!(!unit.has_import("org.junit.Assert.assertEquals"));
        assert!(!unit.has_import("java.util.stream.Stream"));
    }

    #[test]
    fn method_calls_skip_comments() {
        let calls = unit().method_calls();
        let union = calls.iter().find(|c| c.method == "union").unwrap();
        assert_eq!(union.arguments, ["\"a\"", "keys()"]);
        assert_eq!(union.receiver.as_deref(), Some("redis.opsForSet()"));
        assert!(calls.iter().any(|c| c.method == "keys" && c.arguments.is_empty()));
    }

    #[test]
    fn qualified_type_names_outside_imports() {
        let names = unit().qualified_type_names();
        assert_eq!(names.len(), 1);
        assert_eq!(names[0].text, "com.datastax.driver.core.Session");
    }

    #[test]
    fn syntax_error_rejected_on_parse() {
        let err = SourceUnit::parse("Broken", "class Broken { void f( }").unwrap_err();
        assert!(matches!(err, SourceError::Syntax { .. }));
    }

    #[test]
    fn invalid_splice_leaves_unit_untouched() {
        let mut unit = unit();
        let decl = unit.imports()[0].clone();
        let err = unit.splice(decl.name_span, "not a name!").unwrap_err();
        assert!(matches!(err, SourceError::InvalidEdit { .. }));
        assert_eq!(unit.text(), SOURCE);
    }

    #[test]
    fn out_of_bounds_splice_rejected() {
        let mut unit = unit();
        assert!(unit.splice(0..SOURCE.len() + 1, "").is_err());
    }

    #[test]
    fn add_import_is_idempotent() {
        let mut unit = unit();
        assert!(unit.add_import("java.util.stream.Stream").unwrap());
        assert!(!unit.add_import("java.util.stream.Stream").unwrap());
        assert!(!unit.add_import("java.util.Map").unwrap());
        assert!(unit
            .text()
            .contains("import java.util.*;\nimport java.util.stream.Stream;\n"));
    }

    #[test]
    fn add_import_after_package_when_none() {
        let mut unit = SourceUnit::parse("a.B", "package a;\n\nclass B {}\n").unwrap();
        unit.add_import("java.util.List").unwrap();
        assert_eq!(unit.text(), "package a;\n\nimport java.util.List;\n\nclass B {}\n");

        let mut bare = SourceUnit::parse("B", "class B {}\n").unwrap();
        bare.add_import("java.util.List").unwrap();
        assert_eq!(bare.text(), "import java.util.List;\n\nclass B {}\n");
    }

    #[test]
    fn remove_import_takes_line() {
        let mut unit = unit();
        let decl = unit.imports()[1].clone();
        unit.remove_import(&decl).unwrap();
        assert!(!unit.text().contains("assertEquals"));
        assert!(unit
            .text()
            .contains("import com.datastax.driver.core.Cluster;\nimport java.util.*;"));
        assert_eq!(unit.imports().len(), 2);
    }

    #[test]
    fn point_at_counts_lines() {
        assert_eq!(point_at("ab\ncd", 4), Point { row: 1, column: 1 });
        assert_eq!(point_at("abc", 2), Point { row: 0, column: 2 });
    }
}
