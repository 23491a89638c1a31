//! Single-pass template expansion.
//!
//! A [`TemplateExpander`] evaluates one template body against a
//! [`ValueContainer`] with the generator's [`FunctionRegistry`] and the case
//! filters installed. Nothing is cached: every call parses its template anew
//! into a throwaway Tera instance, so functions cannot call back into the
//! expander that invoked them.
//!
//! Variables missing from the context render as empty text. Tera rejects
//! them, so a render that fails on an undefined plain identifier is retried
//! with that identifier bound to `""`.

mod filters;
mod registry;

use std::path::{Path, PathBuf};

use tera::Tera;

pub use registry::FunctionRegistry;

use crate::source::{SourceError, TemplateSource};
use crate::value::ValueContainer;

const INLINE_TEMPLATE_NAME: &str = "__inline__";

/// Upper bound on undefined identifiers filled in for one render.
const MAX_UNDEFINED: usize = 64;

/// Where a template body comes from.
#[derive(Debug, Clone, Copy)]
pub enum RenderSource<'a> {
    /// Literal template text.
    Text(&'a str),
    /// A path read through the expander's [`TemplateSource`].
    Path(&'a Path),
}

/// Renders templates with a fixed function set and template source.
#[derive(Debug, Clone, Copy)]
pub struct TemplateExpander<'a> {
    functions: &'a FunctionRegistry,
    source: &'a dyn TemplateSource,
}

impl<'a> TemplateExpander<'a> {
    pub fn new(functions: &'a FunctionRegistry, source: &'a dyn TemplateSource) -> Self {
        Self { functions, source }
    }

    /// Render a template from text or a path.
    ///
    /// `name` identifies the template in error messages.
    pub fn render(
        &self,
        name: &str,
        template: RenderSource<'_>,
        data: &ValueContainer,
    ) -> Result<String, ExpandError> {
        match template {
            RenderSource::Text(text) => self.render_str(name, text, data),
            RenderSource::Path(path) => self.render_path(name, path, data),
        }
    }

    /// Render literal template text.
    pub fn render_str(
        &self,
        name: &str,
        text: &str,
        data: &ValueContainer,
    ) -> Result<String, ExpandError> {
        let name = if name.is_empty() {
            INLINE_TEMPLATE_NAME
        } else {
            name
        };

        let mut tera = Tera::default();
        tera.autoescape_on(Vec::new());
        filters::register(&mut tera);
        self.functions.install(&mut tera);

        tera.add_raw_template(name, text)
            .map_err(|e| ExpandError::Parse {
                name: name.to_string(),
                source: e,
            })?;

        let mut context = data.to_context();
        let mut filled: Vec<String> = Vec::new();
        loop {
            let error = match tera.render(name, &context) {
                Ok(out) => return Ok(out),
                Err(e) => e,
            };
            match undefined_variable(&error) {
                Some(variable) if !filled.contains(&variable) && filled.len() < MAX_UNDEFINED => {
                    tracing::trace!(template = name, %variable, "undefined variable renders empty");
                    context.insert(variable.as_str(), "");
                    filled.push(variable);
                }
                _ => {
                    return Err(ExpandError::Render {
                        name: name.to_string(),
                        source: error,
                    })
                }
            }
        }
    }

    /// Read a template body through the source, then render it.
    pub fn render_path(
        &self,
        name: &str,
        path: &Path,
        data: &ValueContainer,
    ) -> Result<String, ExpandError> {
        let body = self
            .source
            .read_to_string(path)
            .map_err(|e| ExpandError::Read {
                path: path.to_path_buf(),
                source: e,
            })?;
        self.render_str(name, &body, data)
    }
}

/// Failure while expanding a single template.
#[derive(Debug, thiserror::Error)]
pub enum ExpandError {
    #[error("failed to parse template '{name}': {}", error_chain(source))]
    Parse { name: String, source: tera::Error },
    #[error("failed to render template '{name}': {}", error_chain(source))]
    Render { name: String, source: tera::Error },
    #[error("failed to read template {path}: {source}")]
    Read { path: PathBuf, source: SourceError },
}

/// Name of the plain identifier Tera could not find, if that is why rendering failed.
fn undefined_variable(error: &tera::Error) -> Option<String> {
    const MARKER: &str = "Variable `";

    let mut current: Option<&dyn std::error::Error> = Some(error);
    while let Some(cause) = current {
        let message = cause.to_string();
        if let Some(start) = message.find(MARKER) {
            let rest = &message[start + MARKER.len()..];
            let variable = &rest[..rest.find('`')?];
            let plain = !variable.is_empty()
                && variable.chars().all(|c| c.is_alphanumeric() || c == '_');
            return plain.then(|| variable.to_string());
        }
        current = cause.source();
    }
    None
}

/// Tera keeps the useful detail (e.g. which variable is missing) in nested
/// sources; flatten them into one line.
fn error_chain(error: &tera::Error) -> String {
    let mut out = error.to_string();
    let mut current: Option<&dyn std::error::Error> = std::error::Error::source(error);
    while let Some(cause) = current {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        current = cause.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{BundledTemplates, DirectorySource};
    use std::collections::HashMap;
    use std::fs;
    use tera::Value;

    fn data() -> ValueContainer {
        let mut data = ValueContainer::new();
        data.insert("name", "MainWindow");
        data.insert("qobject", true);
        data.insert("includes", vec!["QWidget".to_string(), "QObject".to_string()]);
        data
    }

    #[test]
    fn test_render_text_with_conditionals_and_loops() {
        let functions = FunctionRegistry::new();
        let expander = TemplateExpander::new(&functions, &BundledTemplates);

        let template = concat!(
            "class {{ name }}{% if qobject %} : QObject{% endif %}\n",
            "{% for i in includes %}<{{ i }}>{% endfor %}",
        );
        let out = expander.render_str("header", template, &data()).unwrap();
        assert_eq!(out, "class MainWindow : QObject\n<QWidget><QObject>");
    }

    #[test]
    fn test_filters_are_installed() {
        let functions = FunctionRegistry::new();
        let expander = TemplateExpander::new(&functions, &BundledTemplates);
        let out = expander
            .render_str("f", "{{ name | snake_case }}.h", &data())
            .unwrap();
        assert_eq!(out, "main_window.h");
    }

    #[test]
    fn test_registered_functions_are_callable() {
        let functions = FunctionRegistry::new().with(
            "shout",
            |args: &HashMap<String, Value>| -> tera::Result<Value> {
                let s = args.get("text").and_then(Value::as_str).unwrap_or_default();
                Ok(Value::String(s.to_uppercase()))
            },
        );
        let expander = TemplateExpander::new(&functions, &BundledTemplates);
        let out = expander
            .render_str("f", r#"{{ shout(text=name) }}"#, &data())
            .unwrap();
        assert_eq!(out, "MAINWINDOW");
    }

    #[test]
    fn test_no_autoescape_for_markup_names() {
        let functions = FunctionRegistry::new();
        let expander = TemplateExpander::new(&functions, &BundledTemplates);
        let mut data = ValueContainer::new();
        data.insert("inc", "<QObject>");
        let out = expander.render_str("page.html", "{{ inc }}", &data).unwrap();
        assert_eq!(out, "<QObject>");
    }

    #[test]
    fn test_undefined_variables_render_empty() {
        let functions = crate::functions::standard_library();
        let expander = TemplateExpander::new(&functions, &BundledTemplates);
        let template = concat!(
            "[{{ missing }}]{% if other %}x{% endif %}",
            r#"[{{ qJoin(items=absent, sep=",") }}]{{ name }}"#,
        );
        let out = expander.render_str("f", template, &data()).unwrap();
        assert_eq!(out, "[][]MainWindow");
    }

    #[test]
    fn test_undefined_attribute_still_fails() {
        let functions = FunctionRegistry::new();
        let expander = TemplateExpander::new(&functions, &BundledTemplates);
        let err = expander
            .render_str("f", "{{ name.first }}", &data())
            .unwrap_err();
        assert!(matches!(err, ExpandError::Render { .. }));
    }

    #[test]
    fn test_malformed_template_is_parse_error() {
        let functions = FunctionRegistry::new();
        let expander = TemplateExpander::new(&functions, &BundledTemplates);
        let err = expander
            .render_str("broken", "{% if name %}unterminated", &data())
            .unwrap_err();
        assert!(matches!(err, ExpandError::Parse { .. }));
    }

    #[test]
    fn test_function_failure_is_render_error() {
        let functions = FunctionRegistry::new().with(
            "fail",
            |_: &HashMap<String, Value>| -> tera::Result<Value> {
                Err(tera::Error::msg("lookup failed"))
            },
        );
        let expander = TemplateExpander::new(&functions, &BundledTemplates);
        let err = expander.render_str("f", "{{ fail() }}", &data()).unwrap_err();
        assert!(matches!(err, ExpandError::Render { .. }));
        assert!(err.to_string().contains("lookup failed"));
    }

    #[test]
    fn test_render_from_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("t.tera"), "// {{ name }}").unwrap();
        let source = DirectorySource::new(dir.path());
        let functions = FunctionRegistry::new();
        let expander = TemplateExpander::new(&functions, &source);

        let out = expander
            .render("t", RenderSource::Path(Path::new("t.tera")), &data())
            .unwrap();
        assert_eq!(out, "// MainWindow");

        let err = expander
            .render("t", RenderSource::Path(Path::new("missing.tera")), &data())
            .unwrap_err();
        assert!(matches!(err, ExpandError::Read { .. }));
    }
}
