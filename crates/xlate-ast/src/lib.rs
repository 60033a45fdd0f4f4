//! Annotated syntax tree handed over by the front end.
//!
//! Every node owns its subtree and carries the byte span it was parsed from.
//! Semantic facts the translator needs (declared supertypes, override
//! candidates, expression categories) are resolved up front and stored either
//! on the node or in the unit's [`Bindings`] table.

mod names;
mod bindings;
mod modifiers;
mod types;
mod expr;
mod stmt;
mod item;
mod unit;
pub mod locate;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixture;

pub use names::TypeName;
pub use bindings::{Bindings, MethodId, MethodInfo, TypeId, TypeInfo, TypeKind};
pub use modifiers::{AccessLevel, Modifier, ModifierKind, Modifiers};
pub use types::{BoundKind, PrimitiveKind, TypeNode, TypeNodeKind, TypeParam, WildcardBound};
pub use expr::{
    AnonymousClass, ArrayInit, AssignOp, Expr, ExprKind, ExprType, Ident, InfixOp, Literal,
    LiteralKind, NameBinding, NewArray, NewObject, PostfixOp, PrefixOp,
};
pub use stmt::{Block, CatchClause, ForInit, LocalVar, Stmt, StmtKind, SwitchGroup, SwitchLabel, VarFragment};
pub use item::{FieldDecl, Member, MethodDecl, Param, TypeDecl, TypeDeclKind};
pub use unit::{ImportDecl, PackageDecl, SourceUnit};

pub use xlate_common::Span;
