use smol_str::SmolStr;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fully qualified name of a declared type.
///
/// `names` holds the nesting chain from the outermost type inwards, so
/// `a.b.Map.Entry` is `package = [a, b]`, `names = [Map, Entry]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeName {
    #[serde(default)]
    pub package: Vec<SmolStr>,
    pub names: Vec<SmolStr>,
}

impl TypeName {
    pub fn new(package: &[&str], names: &[&str]) -> Self {
        Self {
            package: package.iter().map(|s| SmolStr::new(s)).collect(),
            names: names.iter().map(|s| SmolStr::new(s)).collect(),
        }
    }

    /// Parse a dotted name, treating lowercase-initial segments as package segments.
    pub fn parse(qualified: &str) -> Self {
        let mut package = Vec::new();
        let mut names = Vec::new();
        for segment in qualified.split('.').filter(|s| !s.is_empty()) {
            let is_type = segment.chars().next().is_some_and(|c| c.is_uppercase());
            if names.is_empty() && !is_type {
                package.push(SmolStr::new(segment));
            } else {
                names.push(SmolStr::new(segment));
            }
        }
        Self { package, names }
    }

    /// The innermost simple name.
    pub fn simple_name(&self) -> &str {
        self.names.last().map(SmolStr::as_str).unwrap_or("")
    }

    /// The top-level type enclosing this one (itself when not nested).
    pub fn outermost(&self) -> TypeName {
        TypeName {
            package: self.package.clone(),
            names: self.names.iter().take(1).cloned().collect(),
        }
    }

    pub fn is_nested(&self) -> bool {
        self.names.len() > 1
    }

    /// Dotted form, `a.b.Map.Entry`.
    pub fn qualified(&self) -> String {
        self.join(".")
    }

    /// Join package and type segments with an arbitrary separator.
    pub fn join(&self, separator: &str) -> String {
        self.package
            .iter()
            .chain(self.names.iter())
            .map(SmolStr::as_str)
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified())
    }
}
