use crate::bindings::{MethodId, TypeId};
use crate::expr::Ident;
use crate::modifiers::{AccessLevel, Modifiers};
use crate::stmt::{Block, VarFragment};
use crate::types::{TypeNode, TypeParam};
use serde::{Deserialize, Serialize};
use xlate_common::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeDeclKind {
    Class,
    Interface,
}

/// A formal parameter, `final T... name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    #[serde(default)]
    pub modifiers: Modifiers,
    pub ty: TypeNode,
    #[serde(default)]
    pub is_varargs: bool,
    pub name: Ident,
    pub span: Span,
}

/// A field declaration, `private static T a = 1, b;`; the span includes the semicolon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    #[serde(default)]
    pub modifiers: Modifiers,
    pub ty: TypeNode,
    pub fragments: Vec<VarFragment>,
    pub span: Span,
}

/// A method or constructor declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDecl {
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub type_params: Vec<TypeParam>,
    /// `None` for constructors.
    #[serde(default)]
    pub return_type: Option<TypeNode>,
    pub name: Ident,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub throws: Vec<TypeNode>,
    #[serde(default)]
    pub body: Option<Block>,
    #[serde(default)]
    pub binding: Option<MethodId>,
    pub span: Span,
}

impl MethodDecl {
    pub fn is_constructor(&self) -> bool {
        self.return_type.is_none()
    }

    /// A method taking no parameters with the given name.
    pub fn is_nullary(&self, name: &str) -> bool {
        self.name.as_str() == name && self.params.is_empty()
    }
}

/// A class or interface declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDecl {
    #[serde(default)]
    pub modifiers: Modifiers,
    pub kind: TypeDeclKind,
    pub name: Ident,
    #[serde(default)]
    pub type_params: Vec<TypeParam>,
    #[serde(default)]
    pub superclass: Option<TypeNode>,
    #[serde(default)]
    pub interfaces: Vec<TypeNode>,
    #[serde(default)]
    pub members: Vec<Member>,
    pub binding: TypeId,
    /// From the first modifier through the closing brace.
    pub span: Span,
}

impl TypeDecl {
    pub fn is_interface(&self) -> bool {
        self.kind == TypeDeclKind::Interface
    }

    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.members.iter().filter_map(|m| match m {
            Member::Method(method) => Some(method),
            _ => None,
        })
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDecl> {
        self.members.iter().filter_map(|m| match m {
            Member::Field(field) => Some(field),
            _ => None,
        })
    }

    pub fn nested_types(&self) -> impl Iterator<Item = &TypeDecl> {
        self.members.iter().filter_map(|m| match m {
            Member::Type(ty) => Some(ty),
            _ => None,
        })
    }
}

/// A member of a type body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Member {
    Field(FieldDecl),
    Method(MethodDecl),
    Type(TypeDecl),
}

impl Member {
    pub fn span(&self) -> Span {
        match self {
            Member::Field(f) => f.span,
            Member::Method(m) => m.span,
            Member::Type(t) => t.span,
        }
    }

    pub fn modifiers(&self) -> &Modifiers {
        match self {
            Member::Field(f) => &f.modifiers,
            Member::Method(m) => &m.modifiers,
            Member::Type(t) => &t.modifiers,
        }
    }

    pub fn access(&self) -> AccessLevel {
        self.modifiers().access()
    }
}
