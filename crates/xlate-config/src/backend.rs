//! Vocabulary shared by backend policies: targets, reference kinds,
//! declaration sites, and grouping buckets.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use xlate_ast::AccessLevel;

/// A target language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Shared-ownership C++ split into header and source.
    Cpp,
    /// Managed single-inheritance C#.
    CSharp,
    /// Protocol-oriented Swift.
    Swift,
}

impl Backend {
    pub const ALL: [Backend; 3] = [Backend::Cpp, Backend::CSharp, Backend::Swift];

    pub fn name(self) -> &'static str {
        match self {
            Backend::Cpp => "cpp",
            Backend::CSharp => "csharp",
            Backend::Swift => "swift",
        }
    }

    /// Whether this backend splits a type into a declaration and a definition artifact.
    pub fn splits_declarations(self) -> bool {
        matches!(self, Backend::Cpp)
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cpp" | "c++" => Ok(Backend::Cpp),
            "csharp" | "c#" | "cs" => Ok(Backend::CSharp),
            "swift" => Ok(Backend::Swift),
            _ => Err(ConfigError::UnknownBackend(s.to_string())),
        }
    }
}

/// Ownership representation chosen for one reference-type usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    /// Bare type name: a stack value, or a backend where references are implicit.
    Value,
    /// Non-owning raw pointer.
    RawPointer,
    /// Owning, reference-counted handle.
    SharedOwning,
    /// Lookup-only back-pointer that never keeps its target alive.
    WeakBackReference,
}

/// Where a type usage occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationSite {
    Field,
    Parameter,
    LocalVariable,
    ReturnType,
    GenericBound,
    ArrayElement,
    /// An argument of a parameterized type, `List<Foo>`.
    TypeArgument,
}

impl DeclarationSite {
    pub const ALL: [DeclarationSite; 7] = [
        DeclarationSite::Field,
        DeclarationSite::Parameter,
        DeclarationSite::LocalVariable,
        DeclarationSite::ReturnType,
        DeclarationSite::GenericBound,
        DeclarationSite::ArrayElement,
        DeclarationSite::TypeArgument,
    ];
}

/// Source-side category of a type usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeCategory {
    Primitive,
    /// Class, interface, or array type.
    Reference,
    /// A generic type parameter.
    Generic,
}

/// One `(category, site) -> kind` entry of a reference policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRule {
    pub category: TypeCategory,
    pub site: DeclarationSite,
    pub kind: ReferenceKind,
}

/// Kind of a type member, for grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    Method,
    /// Synthesized type-local aliases such as `typedef Base super;`.
    TypeAlias,
    Field,
    NestedType,
}

/// One `(kind, access)` bucket of a grouping policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupingBucket {
    pub kind: DeclarationKind,
    pub access: AccessLevel,
}

impl GroupingBucket {
    pub fn new(kind: DeclarationKind, access: AccessLevel) -> Self {
        Self { kind, access }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_str() {
        assert_eq!("cpp".parse::<Backend>().unwrap(), Backend::Cpp);
        assert_eq!("C#".parse::<Backend>().unwrap(), Backend::CSharp);
        assert_eq!("Swift".parse::<Backend>().unwrap(), Backend::Swift);
        assert!(matches!(
            "cobol".parse::<Backend>(),
            Err(ConfigError::UnknownBackend(name)) if name == "cobol"
        ));
    }

    #[test]
    fn test_only_cpp_splits_declarations() {
        let split: Vec<_> = Backend::ALL
            .into_iter()
            .filter(|b| b.splits_declarations())
            .collect();
        assert_eq!(split, vec![Backend::Cpp]);
    }
}
