//! C++ naming, include and license helpers, reachable in templates through
//! the single `cpp` function:
//!
//! ```text
//! {{ cpp(call="class_name", name="App::MainWindow") }}       -> MainWindow
//! {{ cpp(call="namespace_open", name="App::MainWindow") }}   -> namespace App {
//! {{ cpp(call="namespace_close", name="App::MainWindow") }}  -> } // namespace App
//! {{ cpp(call="header_guard", file="main-window.h") }}       -> MAIN_WINDOW_H
//! {{ cpp(call="includes", names=["QWidget", "Foo"]) }}       -> ["QtWidgets/QWidget"]
//! {{ cpp(call="license", path=..., class_name=..., file_name=...) }}
//! ```

use std::collections::HashMap;
use std::path::Path;

use tera::{Function, Value};

use super::license::generate_license;
use super::{optional_str_arg, str_arg, string_list};
use crate::value::ValueContainer;

const SCOPE_SEPARATOR: &str = "::";

/// Qt classes with a known module, used to qualify includes.
const MODULE_TABLE: &[(&str, &str)] = &[
    ("QObject", "QtCore"),
    ("QSharedData", "QtCore"),
    ("QWidget", "QtWidgets"),
    ("QMainWindow", "QtWidgets"),
    ("QQuickItem", "QtQuick"),
    ("QQmlEngine", "QtQml"),
];

/// The `cpp` template function.
#[derive(Debug, Clone, Copy, Default)]
pub struct CppFunctions;

impl Function for CppFunctions {
    fn call(&self, args: &HashMap<String, Value>) -> tera::Result<Value> {
        let call = str_arg("cpp", args, "call")?;
        match call {
            "class_name" => Ok(Value::String(
                class_name(str_arg("cpp.class_name", args, "name")?).to_string(),
            )),
            "namespace_open" => Ok(Value::String(namespace_openings(str_arg(
                "cpp.namespace_open",
                args,
                "name",
            )?))),
            "namespace_close" => Ok(Value::String(namespace_closings(str_arg(
                "cpp.namespace_close",
                args,
                "name",
            )?))),
            "header_guard" => Ok(Value::String(header_guard(str_arg(
                "cpp.header_guard",
                args,
                "file",
            )?))),
            "includes" => {
                let names = match args.get("names") {
                    Some(value) => string_list("cpp.includes", value)?,
                    None => Vec::new(),
                };
                Ok(Value::from(includes(&names)))
            }
            "license" => {
                let path = optional_str_arg("cpp.license", args, "path")?.unwrap_or_default();
                let mut fields = ValueContainer::new();
                fields.insert(
                    "ClassName",
                    optional_str_arg("cpp.license", args, "class_name")?.unwrap_or_default(),
                );
                fields.insert(
                    "FileName",
                    optional_str_arg("cpp.license", args, "file_name")?.unwrap_or_default(),
                );
                let text = generate_license(Path::new(path), &fields)
                    .map_err(|e| tera::Error::chain("cpp.license failed", e))?;
                Ok(Value::String(text))
            }
            other => Err(tera::Error::msg(format!("unknown cpp call `{other}`"))),
        }
    }
}

/// Innermost segment of a scope-qualified name.
pub fn class_name(qualified: &str) -> &str {
    qualified
        .rsplit(SCOPE_SEPARATOR)
        .next()
        .unwrap_or(qualified)
}

fn outer_scopes(qualified: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = qualified.split(SCOPE_SEPARATOR).collect();
    segments.pop();
    segments
}

/// `namespace X {` for every enclosing scope, outermost first.
pub fn namespace_openings(qualified: &str) -> String {
    outer_scopes(qualified)
        .iter()
        .map(|scope| format!("namespace {scope} {{"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `} // namespace X` for every enclosing scope, innermost first.
pub fn namespace_closings(qualified: &str) -> String {
    outer_scopes(qualified)
        .iter()
        .rev()
        .map(|scope| format!("}} // namespace {scope}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Upper-cased file name with every non-alphanumeric character replaced by `_`.
pub fn header_guard(file_name: &str) -> String {
    file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Sorted, de-duplicated Qt includes, module-qualified where the module is known.
///
/// Names that do not look like Qt classes (`Q` followed by an upper-case letter)
/// are dropped.
pub fn includes(names: &[String]) -> Vec<String> {
    let mut sorted: Vec<&str> = names
        .iter()
        .map(String::as_str)
        .filter(|name| looks_like_qt_class(name))
        .collect();
    sorted.sort_unstable();
    sorted.dedup();

    sorted
        .into_iter()
        .map(|name| match module_for(name) {
            Some(module) => format!("{module}/{name}"),
            None => name.to_string(),
        })
        .collect()
}

/// Module providing a Qt class, if it is in the lookup table.
pub fn module_for(class: &str) -> Option<&'static str> {
    MODULE_TABLE
        .iter()
        .find(|(name, _)| *name == class)
        .map(|(_, module)| *module)
}

fn looks_like_qt_class(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some('Q'), Some(second)) if second.is_uppercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(pairs: &[(&str, Value)]) -> tera::Result<Value> {
        let args = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        CppFunctions.call(&args)
    }

    #[test]
    fn test_class_name() {
        assert_eq!(class_name("App::Ui::MainWindow"), "MainWindow");
        assert_eq!(class_name("MainWindow"), "MainWindow");
    }

    #[test]
    fn test_namespaces() {
        assert_eq!(
            namespace_openings("App::Ui::MainWindow"),
            "namespace App {\nnamespace Ui {"
        );
        assert_eq!(
            namespace_closings("App::Ui::MainWindow"),
            "} // namespace Ui\n} // namespace App"
        );
        assert_eq!(namespace_openings("MainWindow"), "");
        assert_eq!(namespace_closings("MainWindow"), "");
    }

    #[test]
    fn test_header_guard() {
        assert_eq!(header_guard("my-class.h"), "MY_CLASS_H");
        assert_eq!(header_guard("mainwindow.h"), "MAINWINDOW_H");
    }

    #[test]
    fn test_includes_filter_sort_and_qualify() {
        let names: Vec<String> = ["QObject", "Foo", "QWidget"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(includes(&names), vec!["QtCore/QObject", "QtWidgets/QWidget"]);
    }

    #[test]
    fn test_includes_unknown_module_and_duplicates() {
        let names: Vec<String> = ["QTimer", "QObject", "QTimer", "Qt", "Q"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(includes(&names), vec!["QtCore/QObject", "QTimer"]);
    }

    #[test]
    fn test_dispatch() {
        let out = call(&[
            ("call", "namespace_open".into()),
            ("name", "App::MainWindow".into()),
        ])
        .unwrap();
        assert_eq!(out, Value::String("namespace App {".into()));

        let out = call(&[
            ("call", "includes".into()),
            ("names", "[QWidget QMainWindow]".into()),
        ])
        .unwrap();
        assert_eq!(
            out,
            Value::from(vec!["QtWidgets/QMainWindow", "QtWidgets/QWidget"])
        );
    }

    #[test]
    fn test_license_without_path_is_empty() {
        let out = call(&[("call", "license".into()), ("path", "".into())]).unwrap();
        assert_eq!(out, Value::String(String::new()));
    }

    #[test]
    fn test_unknown_call() {
        let err = call(&[("call", "nope".into())]).unwrap_err();
        assert!(err.to_string().contains("nope"));
    }
}
