//! The function catalog injected into every expansion.
//!
//! | Name               | Arguments                      |
//! |--------------------|--------------------------------|
//! | `qEnv`             | `name`                         |
//! | `qJoin`            | `items`, `sep`                 |
//! | `qContains`        | `haystack`, `needle`           |
//! | `qUnpack`          | `input`                        |
//! | `qEnsureExtension` | `filename`, `ext`              |
//! | `cpp`              | `call`, then per-call arguments |
//!
//! See [`cpp`] for the calls the C++ namespace understands.

pub mod cpp;
mod general;
pub mod license;

use std::collections::HashMap;

use tera::Value;

use crate::expander::FunctionRegistry;

pub use general::{ensure_extension_of, unpack_list};

/// Build the registry used by the generator: generic helpers plus the C++ namespace.
pub fn standard_library() -> FunctionRegistry {
    FunctionRegistry::new()
        .with("qEnv", general::env)
        .with("qJoin", general::join)
        .with("qContains", general::contains)
        .with("qUnpack", general::unpack)
        .with("qEnsureExtension", general::ensure_extension)
        .with("cpp", cpp::CppFunctions)
}

pub(crate) fn str_arg<'a>(
    function: &str,
    args: &'a HashMap<String, Value>,
    name: &str,
) -> tera::Result<&'a str> {
    optional_str_arg(function, args, name)?.ok_or_else(|| {
        tera::Error::msg(format!("{function} requires a `{name}` argument"))
    })
}

/// A missing or null argument is `None`; any non-string value is an error.
pub(crate) fn optional_str_arg<'a>(
    function: &str,
    args: &'a HashMap<String, Value>,
    name: &str,
) -> tera::Result<Option<&'a str>> {
    match args.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(tera::Error::msg(format!(
            "{function} expects `{name}` to be a string, got {other}"
        ))),
    }
}

/// Accept either a list of strings or a bracketed list token.
pub(crate) fn string_list(function: &str, value: &Value) -> tera::Result<Vec<String>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(s) => Ok(unpack_list(s)),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    tera::Error::msg(format!("{function} expects a list of strings"))
                })
            })
            .collect(),
        _ => Err(tera::Error::msg(format!(
            "{function} expects a list of strings"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::BundledTemplates;
    use crate::value::ValueContainer;
    use crate::TemplateExpander;

    #[test]
    fn test_standard_library_names() {
        let registry = standard_library();
        for name in ["qEnv", "qJoin", "qContains", "qUnpack", "qEnsureExtension", "cpp"] {
            assert!(registry.contains(name), "missing {name}");
        }
    }

    #[test]
    fn test_functions_compose_in_templates() {
        let registry = standard_library();
        let expander = TemplateExpander::new(&registry, &BundledTemplates);
        let mut data = ValueContainer::new();
        data.insert("qArgAdd", vec!["Q_OBJECT".to_string()]);
        data.insert("includes", "[QObject QWidget]");

        let template = concat!(
            r#"{% if qContains(haystack=qArgAdd, needle="Q_OBJECT") == "true" %}yes{% endif %}|"#,
            r#"{{ qJoin(items=qUnpack(input=includes), sep=",") }}|"#,
            r#"{{ qEnsureExtension(filename="main", ext=".qml") }}"#,
        );
        let out = expander.render_str("t", template, &data).unwrap();
        assert_eq!(out, "yes|QObject,QWidget|main.qml");
    }

    #[test]
    fn test_string_list_conversions() {
        assert_eq!(
            string_list("t", &Value::from("[A B]")).unwrap(),
            vec!["A", "B"]
        );
        assert!(string_list("t", &Value::Null).unwrap().is_empty());
        assert!(string_list("t", &Value::from(3)).is_err());
    }
}
