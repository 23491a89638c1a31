//! # qtcli-generator
//!
//! Manifest-driven scaffolding for Qt classes.
//!
//! A target family (C++ class, Python class) is described by a `config.yml`
//! manifest listing global fields, a shared header and the files to render.
//! [`Generator`] resolves the family, expands fields in two phases (global,
//! then per file), evaluates each file's `when` guard, renders templates with
//! the [`functions`] library installed, and either writes the result under an
//! output directory or echoes it to the console.
//!
//! ```no_run
//! use qtcli_generator::{GenerationRequest, Generator};
//!
//! let mut request = GenerationRequest::class("cpp", "App::MainWindow");
//! request.base_class = "QMainWindow".into();
//! request.qobject = true;
//! request.output_dir = Some("src".into());
//!
//! let output = Generator::new(request).run()?;
//! for file in &output.files {
//!     println!("{file}");
//! }
//! # Ok::<(), qtcli_generator::GeneratorError>(())
//! ```

pub mod error;
pub mod expander;
pub mod fields;
pub mod functions;
pub mod generator;
pub mod manifest;
pub mod source;
pub mod target;
pub mod value;

pub use error::{GeneratorError, GeneratorResult};
pub use expander::{ExpandError, FunctionRegistry, RenderSource, TemplateExpander};
pub use fields::{expand_fields, FieldError};
pub use functions::standard_library;
pub use generator::{GenerationOutput, GenerationRequest, Generator};
pub use manifest::{load_manifest, FieldDefinition, FieldList, FieldSource, FileEntry, Manifest};
pub use source::{BundledTemplates, DirectorySource, SourceError, TemplateSource};
pub use target::{resolve_manifest_path, TargetCategory, TargetType};
pub use value::{FieldValue, ValueContainer};
