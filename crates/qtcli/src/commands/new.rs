//! `qtcli new`: build a generation request from flags and config, then run it.

use std::path::PathBuf;

use qtcli_generator::{GenerationRequest, Generator, GeneratorResult};

use crate::cli_config::{expand_path, CliConfig};
use crate::output;
use crate::NewArgs;

const DEFAULT_PYTHON_MODULE: &str = "PySide6";

pub(crate) fn handle_new_command(args: NewArgs, cli_config: &CliConfig) -> GeneratorResult<()> {
    let request = build_request(args, cli_config);
    let output_dir = request.output_dir.clone();

    tracing::debug!(?request, "running generator");
    let result = Generator::new(request).run()?;

    if result.files.is_empty() {
        output::warning("No files generated.");
        output::hint("Every file entry was skipped by its 'when' condition.");
        return Ok(());
    }

    if let Some(dir) = output_dir {
        for file in &result.files {
            output::success(format!("Created: {}", dir.join(file).display()));
        }
    }

    Ok(())
}

/// Merge command-line flags over config defaults.
fn build_request(args: NewArgs, cli_config: &CliConfig) -> GenerationRequest {
    // An empty value from either source counts as unset.
    let pick = |flag: Option<PathBuf>, configured: &Option<String>| {
        flag.filter(|p| !p.as_os_str().is_empty()).or_else(|| {
            configured
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(expand_path)
        })
    };

    GenerationRequest {
        category: args.category.into(),
        type_name: args.type_name,
        name: args.name,
        output_dir: pick(args.output_dir, &cli_config.output_dir),
        license_file: pick(args.license, &cli_config.license_file),
        template_dir: pick(args.template_dir, &cli_config.template_dir),
        base_class: args.base,
        macros: args.add,
        includes: args.include,
        qobject: args.qobject,
        use_pragma: args.pragma,
        module: args
            .module
            .or_else(|| cli_config.python_module.clone())
            .unwrap_or_else(|| DEFAULT_PYTHON_MODULE.to_string()),
        imports: args.import,
    }
}
