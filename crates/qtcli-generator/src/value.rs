//! Field values and the insertion-ordered container they live in.
//!
//! A [`ValueContainer`] is the context handed to every expansion. Containers are
//! never shared mutably between expansion steps: field expansion starts from a
//! clone of its base, so a file's local fields land in their own snapshot and
//! the global one is left untouched.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// A dynamically-typed field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Plain text. Expression results are always scalars.
    Scalar(String),
    /// A flag, e.g. `qArgQObject`.
    Boolean(bool),
    /// A list of names, e.g. the include list.
    List(Vec<String>),
    /// A nested mapping of further values.
    Nested(ValueContainer),
}

impl FieldValue {
    /// Returns the text of a scalar, or `None` for any other variant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Convert a YAML literal into a field value.
    ///
    /// Numbers and null become text, sequence items are stringified and
    /// mappings nest recursively.
    pub fn from_yaml(value: &serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Bool(b) => Self::Boolean(*b),
            serde_yaml::Value::Sequence(items) => {
                Self::List(items.iter().map(yaml_scalar_text).collect())
            }
            serde_yaml::Value::Mapping(mapping) => {
                let mut nested = ValueContainer::new();
                for (key, value) in mapping {
                    nested.insert(yaml_scalar_text(key), Self::from_yaml(value));
                }
                Self::Nested(nested)
            }
            serde_yaml::Value::Tagged(tagged) => Self::from_yaml(&tagged.value),
            other => Self::Scalar(yaml_scalar_text(other)),
        }
    }
}

fn yaml_scalar_text(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::Null => String::new(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Tagged(tagged) => yaml_scalar_text(&tagged.value),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<ValueContainer> for FieldValue {
    fn from(value: ValueContainer) -> Self {
        Self::Nested(value)
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Scalar(s) => serializer.serialize_str(s),
            Self::Boolean(b) => serializer.serialize_bool(*b),
            Self::List(items) => items.serialize(serializer),
            Self::Nested(nested) => nested.serialize(serializer),
        }
    }
}

/// String-keyed, insertion-ordered mapping of field values.
///
/// Keys are case-sensitive and unique. Inserting an existing key replaces its
/// value in place, so a later merge always wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueContainer {
    entries: Vec<(String, FieldValue)>,
}

impl ValueContainer {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a single field.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Look up a field by exact name.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Whether a field with this exact name exists.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Merge `other` into `self`; entries from `other` win.
    pub fn merge(&mut self, other: &ValueContainer) {
        for (key, value) in &other.entries {
            self.insert(key.clone(), value.clone());
        }
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build a Tera rendering context from every entry.
    pub fn to_context(&self) -> tera::Context {
        let mut context = tera::Context::new();
        for (key, value) in &self.entries {
            context.insert(key.as_str(), value);
        }
        context
    }
}

impl Serialize for ValueContainer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for ValueContainer {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut container = Self::new();
        for (key, value) in iter {
            container.insert(key, value);
        }
        container
    }
}
