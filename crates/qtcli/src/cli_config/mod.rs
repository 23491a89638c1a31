//! CLI configuration for default paths and binding preferences.
//!
//! Values here are defaults only; any matching command-line flag wins.

pub(crate) mod loader;

pub(crate) use loader::{expand_path, load_cli_config};

use serde::Deserialize;

/// Contents of `.qtcli.toml`.
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct CliConfig {
    /// License template rendered into every generated header.
    pub license_file: Option<String>,

    /// Template root used instead of the bundled templates.
    pub template_dir: Option<String>,

    /// Default output directory for generated files.
    pub output_dir: Option<String>,

    /// Python binding module (e.g. "PySide6", "PyQt6").
    pub python_module: Option<String>,
}
