//! What can be generated, and where each kind's manifest lives.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Broad kind of artifact requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TargetCategory {
    Project,
    #[default]
    Class,
    File,
}

impl fmt::Display for TargetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Project => "project",
            Self::Class => "class",
            Self::File => "file",
        };
        f.write_str(s)
    }
}

impl FromStr for TargetCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "project" => Ok(Self::Project),
            "class" => Ok(Self::Class),
            "file" => Ok(Self::File),
            other => Err(format!("unknown target category '{other}'")),
        }
    }
}

/// Concrete artifact kind, resolved from a category and a type string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetType {
    CppClass,
    PythonClass,
}

/// Accepted type strings per category.
const TYPE_NAMES: &[(TargetCategory, TargetType, &[&str])] = &[
    (TargetCategory::Class, TargetType::CppClass, &["cpp", "c++"]),
    (TargetCategory::Class, TargetType::PythonClass, &["python", "py"]),
];

impl TargetType {
    /// Look up a target type; the type string is matched case-insensitively.
    pub fn lookup(category: TargetCategory, type_name: &str) -> Option<Self> {
        let key = type_name.to_lowercase();
        TYPE_NAMES
            .iter()
            .find(|(cat, _, names)| *cat == category && names.contains(&key.as_str()))
            .map(|(_, target, _)| *target)
    }

    /// Manifest path relative to the template root.
    pub fn manifest_path(self) -> &'static str {
        match self {
            Self::CppClass => "templates/classes/cpp/config.yml",
            Self::PythonClass => "templates/classes/python/config.yml",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::CppClass => "C++ class",
            Self::PythonClass => "Python class",
        };
        f.write_str(s)
    }
}

/// Manifest path for a category and type string, if the combination is known.
pub fn resolve_manifest_path(category: TargetCategory, type_name: &str) -> Option<PathBuf> {
    TargetType::lookup(category, type_name).map(|t| PathBuf::from(t.manifest_path()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(
            TargetType::lookup(TargetCategory::Class, "CPP"),
            Some(TargetType::CppClass)
        );
        assert_eq!(
            TargetType::lookup(TargetCategory::Class, "Python"),
            Some(TargetType::PythonClass)
        );
    }

    #[test]
    fn test_only_class_category_has_types() {
        assert_eq!(TargetType::lookup(TargetCategory::Project, "cpp"), None);
        assert_eq!(TargetType::lookup(TargetCategory::File, "cpp"), None);
        assert_eq!(TargetType::lookup(TargetCategory::Class, "rust"), None);
    }

    #[test]
    fn test_resolve_manifest_path() {
        assert_eq!(
            resolve_manifest_path(TargetCategory::Class, "cpp"),
            Some(PathBuf::from("templates/classes/cpp/config.yml"))
        );
        assert_eq!(resolve_manifest_path(TargetCategory::File, "qml"), None);
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("Class".parse::<TargetCategory>(), Ok(TargetCategory::Class));
        assert!("widget".parse::<TargetCategory>().is_err());
    }
}
