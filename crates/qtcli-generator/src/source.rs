//! Read-only template sources.
//!
//! The generator reads manifests and template bodies through a
//! [`TemplateSource`] chosen once per request: the assets compiled into the
//! crate by default, or a caller-supplied directory that mirrors the same
//! `templates/classes/<family>/` layout.

use std::fmt;
use std::path::{Path, PathBuf};

/// Capability to read a file by its path relative to the source root.
pub trait TemplateSource: fmt::Debug + Send + Sync {
    /// Read the full contents of a regular file.
    fn read(&self, path: &Path) -> Result<Vec<u8>, SourceError>;

    /// Read a file and decode it as UTF-8.
    fn read_to_string(&self, path: &Path) -> Result<String, SourceError> {
        let raw = self.read(path)?;
        String::from_utf8(raw).map_err(|_| SourceError::NotUtf8 {
            path: path.to_path_buf(),
        })
    }
}

/// Templates shipped inside the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledTemplates;

const BUNDLED: &[(&str, &str)] = &[
    (
        "templates/classes/cpp/config.yml",
        include_str!("../templates/classes/cpp/config.yml"),
    ),
    (
        "templates/classes/cpp/class.h.tera",
        include_str!("../templates/classes/cpp/class.h.tera"),
    ),
    (
        "templates/classes/cpp/class.cpp.tera",
        include_str!("../templates/classes/cpp/class.cpp.tera"),
    ),
    (
        "templates/classes/python/config.yml",
        include_str!("../templates/classes/python/config.yml"),
    ),
    (
        "templates/classes/python/class.py.tera",
        include_str!("../templates/classes/python/class.py.tera"),
    ),
];

impl TemplateSource for BundledTemplates {
    fn read(&self, path: &Path) -> Result<Vec<u8>, SourceError> {
        BUNDLED
            .iter()
            .find(|(bundled, _)| Path::new(bundled) == path)
            .map(|(_, body)| body.as_bytes().to_vec())
            .ok_or_else(|| SourceError::NotFound {
                path: path.to_path_buf(),
            })
    }
}

/// Templates read from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Serve files relative to `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Serve paths exactly as given (absolute, or relative to the working directory).
    pub fn filesystem() -> Self {
        Self::new(PathBuf::new())
    }
}

impl TemplateSource for DirectorySource {
    fn read(&self, path: &Path) -> Result<Vec<u8>, SourceError> {
        let full = self.root.join(path);
        let metadata = std::fs::metadata(&full).map_err(|_| SourceError::NotFound {
            path: full.clone(),
        })?;
        if !metadata.is_file() {
            return Err(SourceError::NotRegular { path: full });
        }
        std::fs::read(&full).map_err(|e| SourceError::Io {
            path: full,
            source: e,
        })
    }
}

/// Failure to read from a [`TemplateSource`].
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("cannot read file info, given {path}")]
    NotFound { path: PathBuf },
    #[error("cannot read non-regular file, given {path}")]
    NotRegular { path: PathBuf },
    #[error("file is not valid UTF-8: {path}")]
    NotUtf8 { path: PathBuf },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
