//! Configuration documents
//!
//! [`PropertiesDocument`] keeps every byte of the original `.properties`
//! text (comments, blank lines, separators, continuation lines, line
//! endings) and only lets keys be replaced. [`flatten_yaml`] turns YAML
//! documents into dotted keys for reporting.

use std::path::Path;

use serde::Deserialize;
use serde_yaml::Value;

use crate::error::ConfigFileError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Blank or comment line, verbatim
    Verbatim(String),
    /// Key/value entry: `leading` + `key` + `rest` reproduces the text
    Entry {
        leading: String,
        key: String,
        rest: String,
    },
}

/// Lossless `.properties` document
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PropertiesDocument {
    segments: Vec<Segment>,
}

/// Content of a physical line without its line terminator
fn content(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

/// Odd number of trailing backslashes continues the entry
fn continues(line: &str) -> bool {
    content(line).chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

/// Byte length of the key at the start of `text`
fn key_len(text: &str) -> usize {
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' | ' ' | '\t' | '\x0c' | '\n' | '\r' => return i,
            _ => {}
        }
    }
    text.len()
}

impl PropertiesDocument {
    /// Parse text; never fails, unparseable lines are kept verbatim
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut segments = Vec::new();
        let mut lines = text.split_inclusive('\n');

        while let Some(line) = lines.next() {
            let trimmed = line.trim_start_matches([' ', '\t', '\x0c']);
            if content(trimmed).is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                segments.push(Segment::Verbatim(line.to_string()));
                continue;
            }

            let leading = line[..line.len() - trimmed.len()].to_string();
            let split = key_len(trimmed);
            let key = trimmed[..split].to_string();
            let mut rest = trimmed[split..].to_string();

            let mut current = line;
            while continues(current) {
                match lines.next() {
                    Some(next) => {
                        rest.push_str(next);
                        current = next;
                    }
                    None => break,
                }
            }
            segments.push(Segment::Entry { leading, key, rest });
        }

        Self { segments }
    }

    /// Keys in document order
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Entry { key, .. } => Some(key.as_str()),
                Segment::Verbatim(_) => None,
            })
            .collect()
    }

    /// Whether `key` is present
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.keys().contains(&key)
    }

    /// Rename every occurrence of `old`; returns how many were renamed
    pub fn rename_key(&mut self, old: &str, new: &str) -> usize {
        let mut renamed = 0;
        for segment in &mut self.segments {
            if let Segment::Entry { key, .. } = segment {
                if key == old {
                    *key = new.to_string();
                    renamed += 1;
                }
            }
        }
        renamed
    }

    /// Render back to text
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Verbatim(line) => out.push_str(line),
                Segment::Entry { leading, key, rest } => {
                    out.push_str(leading);
                    out.push_str(key);
                    out.push_str(rest);
                }
            }
        }
        out
    }
}

/// Dotted keys of every document in a YAML stream, in document order
///
/// # Errors
/// [`ConfigFileError::Yaml`] if any document is malformed.
pub fn flatten_yaml(text: &str, path: &Path) -> Result<Vec<String>, ConfigFileError> {
    let mut keys = Vec::new();
    for document in serde_yaml::Deserializer::from_str(text) {
        let value = Value::deserialize(document).map_err(|source| ConfigFileError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        flatten_value(&value, String::new(), &mut keys);
    }
    Ok(keys)
}

fn flatten_value(value: &Value, prefix: String, keys: &mut Vec<String>) {
    match value {
        Value::Mapping(map) => {
            for (k, v) in map {
                let segment = match k {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    _ => continue,
                };
                let key = if prefix.is_empty() {
                    segment
                } else {
                    format!("{prefix}.{segment}")
                };
                flatten_value(v, key, keys);
            }
        }
        Value::Tagged(tagged) => flatten_value(&tagged.value, prefix, keys),
        _ if !prefix.is_empty() => keys.push(prefix),
        _ => {}
    }
}
