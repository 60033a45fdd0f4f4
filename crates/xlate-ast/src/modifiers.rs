use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use xlate_common::Span;

/// Declared visibility of a member or type.
///
/// Ordered for grouping: `Public < Protected < PackagePrivate < Private`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    Public,
    Protected,
    PackagePrivate,
    Private,
}

impl AccessLevel {
    /// Narrow to the three levels most targets have; package-private folds into public.
    pub fn fold_package(self) -> AccessLevel {
        match self {
            AccessLevel::PackagePrivate => AccessLevel::Public,
            other => other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierKind {
    Public,
    Protected,
    Private,
    Static,
    Final,
    Abstract,
    Native,
    Synchronized,
    Transient,
    Volatile,
    Strictfp,
    Default,
    /// `@Name` or `@Name(...)`; the span covers the arguments.
    Annotation(SmolStr),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifier {
    pub kind: ModifierKind,
    pub span: Span,
}

/// Modifiers and annotations in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Modifiers(pub Vec<Modifier>);

impl Modifiers {
    pub fn new(modifiers: Vec<Modifier>) -> Self {
        Self(modifiers)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Modifier> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has(&self, kind: &ModifierKind) -> bool {
        self.0.iter().any(|m| &m.kind == kind)
    }

    pub fn access(&self) -> AccessLevel {
        for m in &self.0 {
            match m.kind {
                ModifierKind::Public => return AccessLevel::Public,
                ModifierKind::Protected => return AccessLevel::Protected,
                ModifierKind::Private => return AccessLevel::Private,
                _ => {}
            }
        }
        AccessLevel::PackagePrivate
    }

    pub fn is_static(&self) -> bool {
        self.has(&ModifierKind::Static)
    }

    pub fn is_final(&self) -> bool {
        self.has(&ModifierKind::Final)
    }

    pub fn is_abstract(&self) -> bool {
        self.has(&ModifierKind::Abstract)
    }

    pub fn has_annotation(&self, name: &str) -> bool {
        self.0
            .iter()
            .any(|m| matches!(&m.kind, ModifierKind::Annotation(a) if a == name))
    }

    /// Span from the first modifier to the last, if any.
    pub fn span(&self) -> Option<Span> {
        let first = self.0.first()?;
        let last = self.0.last()?;
        Some(first.span.merge(last.span))
    }
}
