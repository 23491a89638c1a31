//! Generic helpers available to every manifest and template.

use std::collections::HashMap;
use std::path::is_separator;

use tera::{Result, Value};

use super::{optional_str_arg, str_arg, string_list};

/// `qEnv(name)`: environment variable, or empty text when unset.
pub(crate) fn env(args: &HashMap<String, Value>) -> Result<Value> {
    let name = str_arg("qEnv", args, "name")?;
    Ok(Value::String(std::env::var(name).unwrap_or_default()))
}

/// `qJoin(items, sep)`: join a list of strings.
pub(crate) fn join(args: &HashMap<String, Value>) -> Result<Value> {
    let items = args
        .get("items")
        .ok_or_else(|| tera::Error::msg("qJoin requires an `items` argument"))?;
    let items = string_list("qJoin", items)?;
    let sep = optional_str_arg("qJoin", args, "sep")?.unwrap_or_default();
    Ok(Value::String(items.join(sep)))
}

/// `qContains(haystack, needle)`: substring or membership test.
///
/// Returns the text `true` or empty text so templates compare with `== "true"`.
pub(crate) fn contains(args: &HashMap<String, Value>) -> Result<Value> {
    let needle = str_arg("qContains", args, "needle")?;
    let contained = match args.get("haystack") {
        Some(Value::String(s)) => s.contains(needle),
        Some(Value::Array(items)) => items.iter().any(|item| item.as_str() == Some(needle)),
        Some(Value::Null) | None => false,
        Some(_) => {
            return Err(tera::Error::msg(
                "qContains expects `haystack` to be a string or a list of strings",
            ))
        }
    };
    Ok(Value::String(if contained { "true" } else { "" }.to_string()))
}

/// `qUnpack(input)`: `"[A B]"` becomes `["A", "B"]`.
pub(crate) fn unpack(args: &HashMap<String, Value>) -> Result<Value> {
    let input = str_arg("qUnpack", args, "input")?;
    Ok(Value::from(unpack_list(input)))
}

/// `qEnsureExtension(filename, ext)`: append `ext` unless the name already has one.
pub(crate) fn ensure_extension(args: &HashMap<String, Value>) -> Result<Value> {
    let filename = str_arg("qEnsureExtension", args, "filename")?;
    let ext = str_arg("qEnsureExtension", args, "ext")?;
    Ok(Value::String(ensure_extension_of(filename, ext)))
}

/// Split a bracketed list token into its items.
///
/// Empty input and `[]` yield no items; a bare token yields itself. Items may be
/// separated by whitespace or commas, which covers both the `[A B]` shape and the
/// way lists print inside templates (`[A, B]`).
pub fn unpack_list(input: &str) -> Vec<String> {
    let input = input.trim();
    if input.is_empty() {
        return Vec::new();
    }

    match input.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        Some(inner) => inner
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        None => vec![input.to_string()],
    }
}

/// Append `ext` to `filename` when it has no extension.
///
/// Any dot in the last path segment counts, so `.gitignore` and `notes.` are
/// left alone.
pub fn ensure_extension_of(filename: &str, ext: &str) -> String {
    let last = filename.rsplit(is_separator).next().unwrap_or(filename);
    if last.contains('.') {
        filename.to_string()
    } else {
        format!("{filename}{ext}")
    }
}
