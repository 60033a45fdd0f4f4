//! Per-backend routing of syntax nodes to their rewriting rules.
//!
//! Every `(Backend, node kind)` pair has exactly one rule; the matches below
//! and inside each backend module are exhaustive, so a node kind without a
//! rule does not compile. Constructs a backend cannot express are rejected by
//! the rule itself with [`TranslateError::Unsupported`](crate::TranslateError).

use crate::context::UnitContext;
use crate::error::Result;
use crate::writers::{cpp, csharp, swift};
use xlate_ast::{Expr, Stmt, TypeDecl};
use xlate_config::Backend;

/// Write `expr`; the cursor must be at its first token.
pub fn write_expr(ctx: &mut UnitContext<'_>, expr: &Expr) -> Result<()> {
    match ctx.backend() {
        Backend::Cpp => cpp::expr::write_expr(ctx, expr),
        Backend::CSharp => csharp::expr::write_expr(ctx, expr),
        Backend::Swift => swift::expr::write_expr(ctx, expr),
    }
}

/// Write `stmt`; the cursor must be at its first token.
pub fn write_stmt(ctx: &mut UnitContext<'_>, stmt: &Stmt) -> Result<()> {
    match ctx.backend() {
        Backend::Cpp => cpp::stmt::write_stmt(ctx, stmt),
        Backend::CSharp => csharp::stmt::write_stmt(ctx, stmt),
        Backend::Swift => swift::stmt::write_stmt(ctx, stmt),
    }
}

/// Write a top-level type declaration (the declaration artifact for C++).
pub fn write_type_decl(ctx: &mut UnitContext<'_>, decl: &TypeDecl) -> Result<()> {
    match ctx.backend() {
        Backend::Cpp => cpp::header::write_class(ctx, decl, 0),
        Backend::CSharp => csharp::decl::write_type_decl(ctx, decl),
        Backend::Swift => swift::decl::write_type_decl(ctx, decl),
    }
}
