use crate::bindings::Bindings;
use crate::item::TypeDecl;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use xlate_common::{LineIndex, Span};

/// `package a.b;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageDecl {
    pub segments: Vec<SmolStr>,
    pub span: Span,
}

/// `import a.b.C;`; imports are re-derived from usage, so only the span matters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportDecl {
    pub span: Span,
}

/// One parsed source file as handed over by the front end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceUnit {
    /// Display name, usually the file path.
    pub name: String,
    pub text: String,
    #[serde(default)]
    pub package: Option<PackageDecl>,
    #[serde(default)]
    pub imports: Vec<ImportDecl>,
    pub types: Vec<TypeDecl>,
    #[serde(default)]
    pub bindings: Bindings,
}

impl SourceUnit {
    pub fn line_index(&self) -> LineIndex {
        LineIndex::new(&self.text)
    }

    pub fn span(&self) -> Span {
        Span::new(0, self.text.len() as u32)
    }

    /// The first top-level type, whose name drives output naming.
    pub fn primary_type(&self) -> Option<&TypeDecl> {
        self.types.first()
    }
}
