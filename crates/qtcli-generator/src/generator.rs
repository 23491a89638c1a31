//! The generation pipeline.
//!
//! A run moves through validation (target lookup and manifest load), context
//! preparation (request parameters plus global fields), and then one pass per
//! file entry in manifest order: guard, local fields, output path, body,
//! write-or-echo. The first error ends the run; earlier outputs are kept.

use std::io::Write;
use std::path::{Component, Path, PathBuf};

use crate::error::{GeneratorError, GeneratorResult};
use crate::expander::{ExpandError, FunctionRegistry, TemplateExpander};
use crate::fields::expand_fields;
use crate::functions::standard_library;
use crate::manifest::{load_manifest, FileEntry, Manifest};
use crate::source::{BundledTemplates, DirectorySource, TemplateSource};
use crate::target::{TargetCategory, TargetType};
use crate::value::ValueContainer;

const GUARD_TRUE: &str = "true";

/// Caller-supplied parameters for one generation run.
///
/// Not every field applies to every target type; templates read the ones they need.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub category: TargetCategory,
    /// Type string, e.g. `cpp` or `python`. Matched case-insensitively.
    pub type_name: String,
    /// Entity name, possibly scope-qualified (`App::MainWindow`).
    pub name: String,
    /// Where to write files. `None` or an empty path echoes to the console instead.
    pub output_dir: Option<PathBuf>,
    /// License template rendered into generated headers.
    pub license_file: Option<PathBuf>,
    /// Replaces the bundled templates as the template root; empty means bundled.
    pub template_dir: Option<PathBuf>,

    pub base_class: String,
    /// Macros to add to the class body (`Q_OBJECT`, `QML_ELEMENT`, ...).
    pub macros: Vec<String>,
    /// Classes to include in a C++ header.
    pub includes: Vec<String>,
    pub qobject: bool,
    /// Prefer `#pragma once` over include guards.
    pub use_pragma: bool,
    /// Python binding module, e.g. `PySide6`.
    pub module: String,
    /// Classes to import in a Python module.
    pub imports: Vec<String>,
}

impl GenerationRequest {
    /// A class request with everything else left at its default.
    pub fn class(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            category: TargetCategory::Class,
            type_name: type_name.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Request parameters under their reserved `qArg*` names.
    pub fn to_fields(&self) -> ValueContainer {
        let path_text = |p: &Option<PathBuf>| {
            given_path(p)
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        };

        let mut fields = ValueContainer::new();
        fields.insert("qArgName", self.name.as_str());
        fields.insert("qArgType", self.type_name.as_str());
        fields.insert("qArgOutputDir", path_text(&self.output_dir));
        fields.insert("qArgLicenseFile", path_text(&self.license_file));
        fields.insert("qArgTemplateDir", path_text(&self.template_dir));
        fields.insert("qArgBase", self.base_class.as_str());
        fields.insert("qArgAdd", self.macros.clone());
        fields.insert("qArgInclude", self.includes.clone());
        fields.insert("qArgQObject", self.qobject);
        fields.insert("qArgPragma", self.use_pragma);
        fields.insert("qArgModule", self.module.as_str());
        fields.insert("qArgImport", self.imports.clone());
        fields
    }
}

/// Output names produced by a run, in manifest order. Skipped entries are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationOutput {
    pub files: Vec<String>,
}

/// A validated request: target resolved, manifest loaded, template root chosen.
#[derive(Debug)]
struct Plan {
    target: TargetType,
    manifest: Manifest,
    base_dir: PathBuf,
    source: Box<dyn TemplateSource>,
}

/// Fields and header shared by every file entry.
#[derive(Debug)]
struct GlobalContext {
    data: ValueContainer,
    header: String,
}

/// Runs one [`GenerationRequest`].
#[derive(Debug)]
pub struct Generator {
    request: GenerationRequest,
    functions: FunctionRegistry,
}

impl Generator {
    pub fn new(request: GenerationRequest) -> Self {
        Self {
            request,
            functions: standard_library(),
        }
    }

    /// Run the pipeline, echoing to stdout when no output directory is set.
    pub fn run(&self) -> GeneratorResult<GenerationOutput> {
        let stdout = std::io::stdout();
        let mut console = stdout.lock();
        self.run_with_console(&mut console)
    }

    /// Run the pipeline, echoing to `console` when no output directory is set.
    pub fn run_with_console(&self, console: &mut dyn Write) -> GeneratorResult<GenerationOutput> {
        let plan = self.validate()?;
        let expander = TemplateExpander::new(&self.functions, plan.source.as_ref());
        let global = self.prepare_context(&plan, &expander)?;

        let total = plan.manifest.files.len();
        let mut files = Vec::new();

        for (index, entry) in plan.manifest.files.iter().enumerate() {
            tracing::debug!(
                "processing a file ({}/{}), in = {}",
                index + 1,
                total,
                entry.input
            );

            if !self.evaluate_guard(&expander, &global, entry)? {
                tracing::debug!(input = %entry.input, "'when' condition not satisfied, skipping");
                continue;
            }

            let name = self.render_entry(&plan, &expander, &global, entry, console)?;
            files.push(name);
        }

        tracing::debug!(target = %plan.target, count = files.len(), "generation done");
        Ok(GenerationOutput { files })
    }

    fn validate(&self) -> GeneratorResult<Plan> {
        let request = &self.request;
        tracing::debug!(
            category = %request.category,
            type_name = %request.type_name,
            name = %request.name,
            "validating input data"
        );

        let target = TargetType::lookup(request.category, &request.type_name).ok_or_else(|| {
            GeneratorError::InvalidTarget {
                category: request.category,
                type_name: request.type_name.clone(),
            }
        })?;

        let manifest_path = PathBuf::from(target.manifest_path());
        let base_dir = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let source: Box<dyn TemplateSource> = match given_path(&request.template_dir) {
            Some(dir) => Box::new(DirectorySource::new(dir)),
            None => Box::new(BundledTemplates),
        };

        tracing::debug!(path = %manifest_path.display(), "reading config");
        let manifest = load_manifest(source.as_ref(), &manifest_path)?;

        Ok(Plan {
            target,
            manifest,
            base_dir,
            source,
        })
    }

    fn prepare_context(
        &self,
        plan: &Plan,
        expander: &TemplateExpander<'_>,
    ) -> GeneratorResult<GlobalContext> {
        tracing::debug!("preparing global context");

        let params = self.request.to_fields();
        let data = expand_fields(expander, &plan.manifest.global.fields, &params)?;
        tracing::debug!(fields = data.len(), "processing fields, done");

        Ok(GlobalContext {
            data,
            header: plan.manifest.global.header.clone(),
        })
    }

    fn evaluate_guard(
        &self,
        expander: &TemplateExpander<'_>,
        global: &GlobalContext,
        entry: &FileEntry,
    ) -> GeneratorResult<bool> {
        if entry.when.is_empty() {
            return Ok(true);
        }

        let out = expander
            .render_str(&entry.input, &entry.when, &global.data)
            .map_err(|e| GeneratorError::GuardEvaluation {
                entry: entry.input.clone(),
                source: e,
            })?;
        Ok(out == GUARD_TRUE)
    }

    fn render_entry(
        &self,
        plan: &Plan,
        expander: &TemplateExpander<'_>,
        global: &GlobalContext,
        entry: &FileEntry,
        console: &mut dyn Write,
    ) -> GeneratorResult<String> {
        let local = expand_fields(expander, &entry.fields, &global.data)?;

        let render_error = |e: ExpandError| GeneratorError::Render {
            entry: entry.input.clone(),
            source: e,
        };

        let output_name = expander
            .render_str(&entry.input, &entry.output, &local)
            .map_err(render_error)?;

        let input_path = plan.base_dir.join(&entry.input);
        let body = plan
            .source
            .read_to_string(&input_path)
            .map_err(|e| ExpandError::Read {
                path: input_path.clone(),
                source: e,
            })
            .map_err(render_error)?;

        let template = format!("{}{}", global.header, body);
        let rendered = expander
            .render_str(&output_name, &template, &local)
            .map_err(render_error)?;
        let rendered = rendered.trim_start_matches([' ', '\t', '\r', '\n']);

        match given_path(&self.request.output_dir) {
            Some(dir) => write_output(&output_path(dir, &output_name), rendered)?,
            None => echo_output(console, &output_name, rendered)?,
        }

        Ok(output_name)
    }
}

/// A configured path, with an empty one treated as not configured.
fn given_path(path: &Option<PathBuf>) -> Option<&Path> {
    path.as_deref().filter(|p| !p.as_os_str().is_empty())
}

/// Place a rendered output name under `dir`.
///
/// Only normal segments are kept: an absolute name or one with `..` still
/// lands inside `dir`.
fn output_path(dir: &Path, rendered: &str) -> PathBuf {
    Path::new(rendered)
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .fold(dir.to_path_buf(), |path, c| path.join(c))
}

fn write_output(path: &Path, contents: &str) -> GeneratorResult<()> {
    let write_error = |e| GeneratorError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }
    std::fs::write(path, contents).map_err(write_error)?;
    tracing::info!(path = %path.display(), "created file");
    Ok(())
}

fn echo_output(console: &mut dyn Write, name: &str, contents: &str) -> GeneratorResult<()> {
    let echo = |console: &mut dyn Write| -> std::io::Result<()> {
        writeln!(console, ">>>>>>> {name}")?;
        console.write_all(contents.as_bytes())?;
        if !contents.is_empty() && !contents.ends_with('\n') {
            writeln!(console)?;
        }
        writeln!(console, "<<<<<<< {name}")?;
        console.flush()
    };
    echo(console).map_err(|e| GeneratorError::OutputWrite {
        path: PathBuf::from(name),
        source: e,
    })
}
