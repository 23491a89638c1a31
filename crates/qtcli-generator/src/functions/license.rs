//! License header generation.
//!
//! The license template is a separate file named by the caller and rendered in
//! its own expansion pass. That pass sees the date and user fields below plus
//! whatever the caller passes, and only `qEnv` as a function.
//!
//! | Field   | Example      |
//! |---------|--------------|
//! | `Year`  | `2026`       |
//! | `Month` | `03`         |
//! | `Day`   | `07`         |
//! | `Date`  | `2026-03-07` |
//! | `User`  | `$USER`      |

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use super::general;
use crate::expander::{ExpandError, FunctionRegistry, TemplateExpander};
use crate::source::DirectorySource;
use crate::value::ValueContainer;

/// Render the license template at `path`, or return empty text when no path is given.
pub fn generate_license(path: &Path, fields: &ValueContainer) -> Result<String, LicenseError> {
    generate_license_at(path, fields, Local::now())
}

pub(crate) fn generate_license_at(
    path: &Path,
    fields: &ValueContainer,
    now: DateTime<Local>,
) -> Result<String, LicenseError> {
    if path.as_os_str().is_empty() {
        return Ok(String::new());
    }

    let mut data = date_fields(now);
    data.insert("User", current_user());
    data.merge(fields);

    let functions = FunctionRegistry::new().with("qEnv", general::env);
    let source = DirectorySource::filesystem();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    tracing::debug!(?path, "rendering license header");
    TemplateExpander::new(&functions, &source)
        .render_path(&name, path, &data)
        .map_err(|e| LicenseError {
            path: path.to_path_buf(),
            source: e,
        })
}

fn date_fields(now: DateTime<Local>) -> ValueContainer {
    let mut data = ValueContainer::new();
    data.insert("Year", now.format("%Y").to_string());
    data.insert("Month", now.format("%m").to_string());
    data.insert("Day", now.format("%d").to_string());
    data.insert("Date", now.format("%Y-%m-%d").to_string());
    data
}

fn current_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_default()
}

#[derive(Debug, thiserror::Error)]
#[error("failed to generate license from {path}: {source}")]
pub struct LicenseError {
    path: PathBuf,
    source: ExpandError,
}
