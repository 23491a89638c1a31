//! Case-conversion filters available in every expansion.

use std::collections::HashMap;

use heck::{ToKebabCase, ToLowerCamelCase, ToPascalCase, ToShoutySnakeCase, ToSnakeCase};
use tera::{Result, Tera, Value};

/// Register every case filter on a Tera instance.
pub(crate) fn register(tera: &mut Tera) {
    tera.register_filter("snake_case", snake_case);
    tera.register_filter("pascal_case", pascal_case);
    tera.register_filter("camel_case", camel_case);
    tera.register_filter("kebab_case", kebab_case);
    tera.register_filter("shouty_snake_case", shouty_snake_case);
}

fn convert(name: &str, value: &Value, f: impl Fn(&str) -> String) -> Result<Value> {
    let s = value
        .as_str()
        .ok_or_else(|| tera::Error::msg(format!("{name} filter expects a string")))?;
    Ok(Value::String(f(s)))
}

pub(crate) fn snake_case(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    convert("snake_case", value, |s| s.to_snake_case())
}

pub(crate) fn pascal_case(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    convert("pascal_case", value, |s| s.to_pascal_case())
}

pub(crate) fn camel_case(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    convert("camel_case", value, |s| s.to_lower_camel_case())
}

pub(crate) fn kebab_case(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    convert("kebab_case", value, |s| s.to_kebab_case())
}

pub(crate) fn shouty_snake_case(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    convert("shouty_snake_case", value, |s| s.to_shouty_snake_case())
}
