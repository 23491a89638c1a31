//! Manifest parsing (`config.yml`).
//!
//! ```yaml
//! version: "1"
//! global:
//!   fields:
//!     - className: '{{ cpp(call="class_name", name=qArgName) }}'
//!   header: |
//!     {{ license }}
//! files:
//!   - in: class.h.tera
//!     out: '{{ fileBase }}.h'
//!     when: '{{ qArgHeader }}'
//!     fields:
//!       - fileName: '{{ fileBase }}.h'
//! ```
//!
//! `fields` takes either one mapping or a sequence of mappings; either way the
//! definitions keep the order they were written in. String values are template
//! expressions, everything else is a literal.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

use crate::source::{SourceError, TemplateSource};
use crate::value::FieldValue;

/// A parsed manifest. Read-only once loaded.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub version: String,

    /// Files to generate, in order.
    #[serde(default)]
    pub files: Vec<FileEntry>,

    #[serde(default)]
    pub global: GlobalSection,
}

/// Fields shared by every file, and text prepended to every template body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GlobalSection {
    #[serde(default)]
    pub fields: FieldList,

    #[serde(default)]
    pub header: String,
}

/// One template to render.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileEntry {
    /// Template path relative to the manifest's directory.
    #[serde(default, rename = "in")]
    pub input: String,

    /// Output path expression, relative to the output directory.
    #[serde(default, rename = "out")]
    pub output: String,

    /// Fields resolved for this file only, on top of the global ones.
    #[serde(default)]
    pub fields: FieldList,

    /// Guard expression; the file is generated only if it renders to `true`.
    #[serde(default)]
    pub when: String,
}

/// How a field gets its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSource {
    /// Copied through unchanged.
    Literal(FieldValue),
    /// Rendered against the fields resolved before it.
    Expression(String),
}

/// A named field definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    pub name: String,
    pub source: FieldSource,
}

impl FieldDefinition {
    pub fn literal(name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            name: name.into(),
            source: FieldSource::Literal(value.into()),
        }
    }

    pub fn expression(name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: FieldSource::Expression(expression.into()),
        }
    }
}

/// Ordered field definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldList(pub Vec<FieldDefinition>);

impl FieldList {
    pub fn iter(&self) -> std::slice::Iter<'_, FieldDefinition> {
        self.0.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|d| d.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<FieldDefinition> for FieldList {
    fn from_iter<I: IntoIterator<Item = FieldDefinition>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for FieldList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_yaml::Value::deserialize(deserializer)?;
        let mut definitions = Vec::new();
        match raw {
            serde_yaml::Value::Null => {}
            serde_yaml::Value::Mapping(mapping) => push_mapping(&mut definitions, &mapping),
            serde_yaml::Value::Sequence(items) => {
                for item in items {
                    match item {
                        serde_yaml::Value::Mapping(mapping) => {
                            push_mapping(&mut definitions, &mapping)
                        }
                        serde_yaml::Value::Null => {}
                        _ => {
                            return Err(serde::de::Error::custom(
                                "each entry of `fields` must be a mapping",
                            ))
                        }
                    }
                }
            }
            _ => {
                return Err(serde::de::Error::custom(
                    "`fields` must be a mapping or a sequence of mappings",
                ))
            }
        }
        Ok(Self(definitions))
    }
}

fn push_mapping(out: &mut Vec<FieldDefinition>, mapping: &serde_yaml::Mapping) {
    for (key, value) in mapping {
        let name = match key {
            serde_yaml::Value::String(s) => s.clone(),
            other => match FieldValue::from_yaml(other) {
                FieldValue::Scalar(s) => s,
                _ => continue,
            },
        };
        let source = match value {
            serde_yaml::Value::String(expr) => FieldSource::Expression(expr.clone()),
            literal => FieldSource::Literal(FieldValue::from_yaml(literal)),
        };
        out.push(FieldDefinition { name, source });
    }
}

impl Manifest {
    /// Parse manifest text.
    pub fn parse(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }
}

/// Read and parse a manifest through a template source.
pub fn load_manifest(source: &dyn TemplateSource, path: &Path) -> Result<Manifest, ManifestError> {
    let text = source
        .read_to_string(path)
        .map_err(|e| ManifestError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
    Manifest::parse(&text).map_err(|e| ManifestError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Errors that can occur during manifest loading.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to read manifest {path}: {source}")]
    Read { path: PathBuf, source: SourceError },
    #[error("failed to parse manifest {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}
