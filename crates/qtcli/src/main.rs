//! qtcli
//!
//! Scaffolds Qt classes (C++ header/source pairs, Python modules) from
//! manifest-driven templates. Files are written under `--output-dir`, or
//! echoed to stdout when no output directory is configured.

mod cli_config;
mod commands;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use qtcli_generator::TargetCategory;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "qtcli", version, about = "Scaffold Qt classes from templates")]
#[command(styles = output::clap_styles())]
pub(crate) struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Generate a new project, class or file
    New(NewArgs),
}

/// What `qtcli new` should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Category {
    Project,
    Class,
    File,
}

impl From<Category> for TargetCategory {
    fn from(category: Category) -> Self {
        match category {
            Category::Project => TargetCategory::Project,
            Category::Class => TargetCategory::Class,
            Category::File => TargetCategory::File,
        }
    }
}

#[derive(Debug, Args)]
pub(crate) struct NewArgs {
    /// Kind of artifact to generate
    #[arg(value_enum)]
    pub category: Category,

    /// Name, optionally scope-qualified (e.g. App::MainWindow)
    pub name: String,

    /// Target type (cpp, c++, python, py)
    #[arg(short = 't', long = "type", default_value = "cpp")]
    pub type_name: String,

    /// Base class
    #[arg(short, long, default_value = "")]
    pub base: String,

    /// Macro to add to the class body (repeatable)
    #[arg(short, long = "add", value_name = "MACRO")]
    pub add: Vec<String>,

    /// Class to include in a C++ header (repeatable)
    #[arg(short, long = "include", value_name = "CLASS")]
    pub include: Vec<String>,

    /// Class to import in a Python module (repeatable)
    #[arg(long = "import", value_name = "CLASS")]
    pub import: Vec<String>,

    /// Generate a QObject-derived class
    #[arg(long)]
    pub qobject: bool,

    /// Use `#pragma once` instead of include guards
    #[arg(long)]
    pub pragma: bool,

    /// Python binding module [default: PySide6]
    #[arg(long)]
    pub module: Option<String>,

    /// Directory to write files to; omit to echo to stdout
    #[arg(short, long, env = "QTCLI_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// License template rendered into file headers
    #[arg(short, long, env = "QTCLI_LICENSE_FILE")]
    pub license: Option<PathBuf>,

    /// Template root overriding the bundled templates
    #[arg(long, env = "QTCLI_TEMPLATE_DIR")]
    pub template_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cli_config = cli_config::load_cli_config();

    let result = match cli.command {
        Commands::New(args) => commands::handle_new_command(args, &cli_config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let mut filter = EnvFilter::from_default_env();
    for target in ["qtcli", "qtcli_generator"] {
        if let Ok(directive) = format!("{target}={level}").parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_new_class() {
        let cli = Cli::try_parse_from([
            "qtcli",
            "new",
            "class",
            "App::MainWindow",
            "--type",
            "c++",
            "--base",
            "QMainWindow",
            "--add",
            "Q_OBJECT",
            "--add",
            "QML_ELEMENT",
            "-i",
            "QTimer",
            "--qobject",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        let Commands::New(args) = cli.command;
        assert_eq!(args.category, Category::Class);
        assert_eq!(args.name, "App::MainWindow");
        assert_eq!(args.type_name, "c++");
        assert_eq!(args.add, vec!["Q_OBJECT", "QML_ELEMENT"]);
        assert_eq!(args.include, vec!["QTimer"]);
        assert!(args.qobject);
        assert!(!args.pragma);
    }

    #[test]
    fn test_parse_rejects_unknown_category() {
        assert!(Cli::try_parse_from(["qtcli", "new", "widget", "Foo"]).is_err());
    }
}
