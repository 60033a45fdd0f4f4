//! Rewriting rules shared by the backends.
//!
//! These cover the constructs whose shape is the same in the source and in
//! at least two targets. Each rule expects the cursor at the node's first
//! token and leaves it just past the node's last token.

use crate::context::UnitContext;
use crate::dispatch::{write_expr, write_stmt};
use crate::error::{Result, TranslateError};
use xlate_ast::{
    AnonymousClass, AssignOp, Block, CatchClause, Expr, FieldDecl, ForInit, Ident, InfixOp, LocalVar,
    Member, MethodDecl, NameBinding, NewArray, NewObject, Param, PostfixOp, PrefixOp, Stmt,
    SwitchGroup, SwitchLabel, TypeDecl, TypeNode, TypeNodeKind, VarFragment,
};
use xlate_common::Span;
use xlate_config::{DeclarationSite, ReferenceKind};

// Expressions

/// A simple name; type names go through the resolver so they are spelled
/// (and recorded) like any other type usage.
pub fn name(ctx: &mut UnitContext<'_>, ident: &Ident, binding: NameBinding) -> Result<()> {
    match binding {
        NameBinding::Type(id) => {
            let text = ctx.types.render_type_id(id)?;
            ctx.replace_span(ident.span, &text)
        }
        _ => ctx.match_and_write(&ident.name),
    }
}

/// `target.`, with the dot replaced by `separator`.
pub fn qualifier(ctx: &mut UnitContext<'_>, target: &Expr, separator: &str) -> Result<()> {
    write_expr(ctx, target)?;
    ctx.copy_space()?;
    ctx.match_and_write_as(".", separator)?;
    ctx.copy_space()
}

pub fn paren(ctx: &mut UnitContext<'_>, inner: &Expr) -> Result<()> {
    ctx.match_and_write("(")?;
    ctx.copy_space()?;
    write_expr(ctx, inner)?;
    ctx.copy_space()?;
    ctx.match_and_write(")")
}

pub fn infix(
    ctx: &mut UnitContext<'_>,
    op: InfixOp,
    left: &Expr,
    right: &Expr,
    extended: &[Expr],
) -> Result<()> {
    if op == InfixOp::RightShiftUnsigned {
        return unsigned_shift(ctx, left, right, extended);
    }
    write_expr(ctx, left)?;
    for operand in std::iter::once(right).chain(extended) {
        ctx.copy_space()?;
        ctx.match_and_write(op.token())?;
        ctx.copy_space()?;
        write_expr(ctx, operand)?;
    }
    Ok(())
}

/// `a >>> b >>> c` becomes `helper(helper(a, b), c)`.
fn unsigned_shift(ctx: &mut UnitContext<'_>, left: &Expr, right: &Expr, extended: &[Expr]) -> Result<()> {
    let helper = format!("{}(", ctx.policy.unsigned_shift_helper);
    for _ in 0..=extended.len() {
        ctx.write(&helper);
    }
    write_expr(ctx, left)?;
    for operand in std::iter::once(right).chain(extended) {
        comments_before_operator(ctx)?;
        ctx.match_and_write_as(">>>", ",")?;
        ctx.copy_space()?;
        write_expr(ctx, operand)?;
        ctx.write(")");
    }
    Ok(())
}

/// Drop the whitespace before an operator that becomes a separator, keeping
/// any comments in it.
fn comments_before_operator(ctx: &mut UnitContext<'_>) -> Result<()> {
    let start = ctx.cursor.position();
    ctx.skip_space()?;
    let gap = ctx.source(Span::new(start, ctx.cursor.position())).trim();
    if !gap.is_empty() {
        ctx.write(" ");
        ctx.write(gap);
        if gap.rsplit('\n').next().is_some_and(|line| line.contains("//")) {
            ctx.write("\n");
        }
    }
    Ok(())
}

pub fn prefix(ctx: &mut UnitContext<'_>, op: PrefixOp, operand: &Expr) -> Result<()> {
    ctx.match_and_write(op.token())?;
    ctx.copy_space()?;
    write_expr(ctx, operand)
}

pub fn postfix(ctx: &mut UnitContext<'_>, op: PostfixOp, operand: &Expr) -> Result<()> {
    write_expr(ctx, operand)?;
    ctx.copy_space()?;
    ctx.match_and_write(op.token())
}

pub fn assign(ctx: &mut UnitContext<'_>, op: AssignOp, lhs: &Expr, rhs: &Expr, span: Span) -> Result<()> {
    if op == AssignOp::RightShiftUnsigned {
        return Err(TranslateError::unsupported(
            "compound unsigned right shift assignment (`>>>=`)",
            span,
        ));
    }
    write_expr(ctx, lhs)?;
    ctx.copy_space()?;
    ctx.match_and_write(op.token())?;
    ctx.copy_space()?;
    write_expr(ctx, rhs)
}

pub fn conditional(ctx: &mut UnitContext<'_>, cond: &Expr, then_expr: &Expr, else_expr: &Expr) -> Result<()> {
    write_expr(ctx, cond)?;
    ctx.copy_space()?;
    ctx.match_and_write("?")?;
    ctx.copy_space()?;
    write_expr(ctx, then_expr)?;
    ctx.copy_space()?;
    ctx.match_and_write(":")?;
    ctx.copy_space()?;
    write_expr(ctx, else_expr)
}

/// `array[index]`; with `deref` the array is wrapped as `(*array)`.
pub fn index(ctx: &mut UnitContext<'_>, array: &Expr, index: &Expr, deref: bool) -> Result<()> {
    if deref {
        ctx.write("(*");
    }
    write_expr(ctx, array)?;
    if deref {
        ctx.write(")");
    }
    ctx.copy_space()?;
    ctx.match_and_write("[")?;
    ctx.copy_space()?;
    write_expr(ctx, index)?;
    ctx.copy_space()?;
    ctx.match_and_write("]")
}

/// The element type and length of a one-dimensional `new T[n]`.
pub fn single_dimension(array: &NewArray, span: Span) -> Result<(&TypeNode, &Expr)> {
    if array.initializer.is_some() {
        return Err(TranslateError::unsupported(
            "array creation with an initializer list",
            span,
        ));
    }
    let TypeNodeKind::Array { element, dimensions } = &array.ty.kind else {
        return Err(TranslateError::Internal(
            "array creation whose type is not an array".to_string(),
        ));
    };
    match array.dimensions.as_slice() {
        [length] if *dimensions == 1 => Ok((element.as_ref(), length)),
        _ => Err(TranslateError::unsupported(
            "multi-dimensional array creation",
            span,
        )),
    }
}

/// `(a, b, c)`
pub fn args(ctx: &mut UnitContext<'_>, args: &[Expr]) -> Result<()> {
    ctx.copy_space()?;
    ctx.match_and_write("(")?;
    list(ctx, args)?;
    ctx.copy_space()?;
    ctx.match_and_write(")")
}

/// Comma-separated expressions.
pub fn list(ctx: &mut UnitContext<'_>, items: &[Expr]) -> Result<()> {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            ctx.copy_space()?;
            ctx.match_and_write(",")?;
        }
        ctx.copy_space()?;
        write_expr(ctx, item)?;
    }
    Ok(())
}

// Statements

/// `{ ... }`. A leading `super(...)`/`this(...)` is dropped when
/// `skip_constructor_call` is set; the caller has already emitted it elsewhere.
pub fn block(ctx: &mut UnitContext<'_>, block: &Block, skip_constructor_call: bool) -> Result<()> {
    ctx.match_and_write("{")?;
    for (i, stmt) in block.statements.iter().enumerate() {
        if i == 0 && skip_constructor_call && stmt.is_constructor_call() {
            ctx.skip_to(stmt.span.end)?;
            continue;
        }
        ctx.copy_space()?;
        write_stmt(ctx, stmt)?;
    }
    ctx.copy_space()?;
    ctx.match_and_write("}")
}

pub fn end_statement(ctx: &mut UnitContext<'_>) -> Result<()> {
    ctx.copy_space()?;
    ctx.match_and_write(";")
}

pub fn expr_stmt(ctx: &mut UnitContext<'_>, expr: &Expr) -> Result<()> {
    write_expr(ctx, expr)?;
    end_statement(ctx)
}

pub fn return_stmt(ctx: &mut UnitContext<'_>, value: Option<&Expr>) -> Result<()> {
    ctx.match_and_write("return")?;
    if let Some(value) = value {
        ctx.copy_space()?;
        write_expr(ctx, value)?;
    }
    end_statement(ctx)
}

/// `break;` / `continue;`
pub fn jump(ctx: &mut UnitContext<'_>, keyword: &str) -> Result<()> {
    ctx.match_and_write(keyword)?;
    end_statement(ctx)
}

pub fn throw_stmt(ctx: &mut UnitContext<'_>, value: &Expr) -> Result<()> {
    ctx.match_and_write("throw")?;
    ctx.copy_space()?;
    write_expr(ctx, value)?;
    end_statement(ctx)
}

/// `(cond)` after a statement keyword.
pub fn paren_condition(ctx: &mut UnitContext<'_>, cond: &Expr) -> Result<()> {
    ctx.copy_space()?;
    ctx.match_and_write("(")?;
    ctx.copy_space()?;
    write_expr(ctx, cond)?;
    ctx.copy_space()?;
    ctx.match_and_write(")")
}

pub fn if_stmt(ctx: &mut UnitContext<'_>, cond: &Expr, then_stmt: &Stmt, else_stmt: Option<&Stmt>) -> Result<()> {
    ctx.match_and_write("if")?;
    paren_condition(ctx, cond)?;
    ctx.copy_space()?;
    write_stmt(ctx, then_stmt)?;
    if let Some(else_stmt) = else_stmt {
        ctx.copy_space()?;
        ctx.match_and_write("else")?;
        ctx.copy_space()?;
        write_stmt(ctx, else_stmt)?;
    }
    Ok(())
}

pub fn while_stmt(ctx: &mut UnitContext<'_>, cond: &Expr, body: &Stmt) -> Result<()> {
    ctx.match_and_write("while")?;
    paren_condition(ctx, cond)?;
    ctx.copy_space()?;
    write_stmt(ctx, body)
}

pub fn do_while(ctx: &mut UnitContext<'_>, body: &Stmt, cond: &Expr) -> Result<()> {
    ctx.match_and_write("do")?;
    ctx.copy_space()?;
    write_stmt(ctx, body)?;
    ctx.copy_space()?;
    ctx.match_and_write("while")?;
    paren_condition(ctx, cond)?;
    end_statement(ctx)
}

pub fn for_stmt(
    ctx: &mut UnitContext<'_>,
    init: Option<&ForInit>,
    cond: Option<&Expr>,
    updates: &[Expr],
    body: &Stmt,
) -> Result<()> {
    ctx.match_and_write("for")?;
    ctx.copy_space()?;
    ctx.match_and_write("(")?;
    match init {
        Some(ForInit::Local(local)) => {
            ctx.copy_space()?;
            local_var(ctx, local)?;
        }
        Some(ForInit::Exprs(exprs)) => list(ctx, exprs)?,
        None => {}
    }
    ctx.copy_space()?;
    ctx.match_and_write(";")?;
    if let Some(cond) = cond {
        ctx.copy_space()?;
        write_expr(ctx, cond)?;
    }
    ctx.copy_space()?;
    ctx.match_and_write(";")?;
    list(ctx, updates)?;
    ctx.copy_space()?;
    ctx.match_and_write(")")?;
    ctx.copy_space()?;
    write_stmt(ctx, body)
}

/// Enhanced `for`, keeping the parenthesized form: `keyword (T x separator prefix iterable)`.
#[allow(clippy::too_many_arguments)]
pub fn for_each(
    ctx: &mut UnitContext<'_>,
    keyword: &str,
    var: &Param,
    site: DeclarationSite,
    separator: &str,
    iterable_prefix: &str,
    iterable: &Expr,
    body: &Stmt,
) -> Result<()> {
    ctx.match_and_write_as("for", keyword)?;
    ctx.copy_space()?;
    ctx.match_and_write("(")?;
    ctx.copy_space()?;
    ctx.skip_modifiers(&var.modifiers)?;
    ctx.write_type(&var.ty, site)?;
    ctx.copy_space()?;
    ctx.match_and_write(&var.name.name)?;
    ctx.copy_space()?;
    ctx.match_and_write_as(":", separator)?;
    ctx.copy_space()?;
    ctx.write(iterable_prefix);
    write_expr(ctx, iterable)?;
    ctx.copy_space()?;
    ctx.match_and_write(")")?;
    ctx.copy_space()?;
    write_stmt(ctx, body)
}

/// `T a = 1, b` without the semicolon; modifiers such as `final` are dropped.
pub fn local_var(ctx: &mut UnitContext<'_>, local: &LocalVar) -> Result<()> {
    ctx.skip_modifiers(&local.modifiers)?;
    ctx.write_type(&local.ty, DeclarationSite::LocalVariable)?;
    fragments(ctx, &local.fragments)
}

pub fn fragments(ctx: &mut UnitContext<'_>, fragments: &[VarFragment]) -> Result<()> {
    for (i, fragment) in fragments.iter().enumerate() {
        if i > 0 {
            ctx.copy_space()?;
            ctx.match_and_write(",")?;
        }
        ctx.copy_space()?;
        check_dimensions(fragment)?;
        ctx.match_and_write(&fragment.name.name)?;
        if let Some(init) = &fragment.init {
            initializer(ctx, init)?;
        }
    }
    Ok(())
}

/// ` = init`
pub fn initializer(ctx: &mut UnitContext<'_>, init: &Expr) -> Result<()> {
    ctx.copy_space()?;
    ctx.match_and_write("=")?;
    ctx.copy_space()?;
    write_expr(ctx, init)
}

pub fn check_dimensions(fragment: &VarFragment) -> Result<()> {
    if fragment.extra_dimensions > 0 {
        return Err(TranslateError::unsupported(
            "array dimensions after the declarator name (`int a[]`); declare them on the type",
            fragment.span,
        ));
    }
    Ok(())
}

pub fn switch_head(ctx: &mut UnitContext<'_>, selector: &Expr) -> Result<()> {
    ctx.match_and_write("switch")?;
    paren_condition(ctx, selector)?;
    ctx.copy_space()?;
    ctx.match_and_write("{")
}

pub fn switch_label(ctx: &mut UnitContext<'_>, label: &SwitchLabel) -> Result<()> {
    match &label.value {
        Some(value) => {
            ctx.match_and_write("case")?;
            ctx.copy_space()?;
            write_expr(ctx, value)?;
        }
        None => ctx.match_and_write("default")?,
    }
    ctx.copy_space()?;
    ctx.match_and_write(":")
}

pub fn switch_group(ctx: &mut UnitContext<'_>, group: &SwitchGroup) -> Result<()> {
    for label in &group.labels {
        ctx.copy_space()?;
        switch_label(ctx, label)?;
    }
    for stmt in &group.statements {
        ctx.copy_space()?;
        write_stmt(ctx, stmt)?;
    }
    Ok(())
}

pub fn misplaced_constructor_call(stmt: &Stmt) -> TranslateError {
    TranslateError::unsupported(
        "`super(...)`/`this(...)` call that is not the first statement of a constructor",
        stmt.span,
    )
}

/// `try { } catch (T e) { }`; `finally` is left to the caller.
pub fn try_catches(ctx: &mut UnitContext<'_>, body: &Block, catches: &[CatchClause]) -> Result<()> {
    ctx.match_and_write("try")?;
    ctx.copy_space()?;
    block(ctx, body, false)?;
    for clause in catches {
        ctx.copy_space()?;
        ctx.match_and_write("catch")?;
        ctx.copy_space()?;
        ctx.match_and_write("(")?;
        ctx.copy_space()?;
        ctx.skip_modifiers(&clause.param.modifiers)?;
        ctx.write_type(&clause.param.ty, DeclarationSite::Parameter)?;
        ctx.copy_space()?;
        ctx.match_and_write(&clause.param.name.name)?;
        ctx.copy_space()?;
        ctx.match_and_write(")")?;
        ctx.copy_space()?;
        block(ctx, &clause.body, false)?;
    }
    Ok(())
}

// Declarations

/// `(T a, U b)` for the C-family targets; varargs are written as an array
/// parameter preceded by `varargs_prefix`.
pub fn params(ctx: &mut UnitContext<'_>, params: &[Param], varargs_prefix: &str) -> Result<()> {
    ctx.match_and_write("(")?;
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            ctx.copy_space()?;
            ctx.match_and_write(",")?;
        }
        ctx.copy_space()?;
        ctx.skip_modifiers(&param.modifiers)?;
        if param.is_varargs {
            ctx.write(varargs_prefix);
            let rendered = ctx
                .types
                .resolve_array(&param.ty, 1, DeclarationSite::Parameter, None)?;
            ctx.replace_span(param.ty.span, &rendered.text)?;
            ctx.skip_space()?;
            ctx.match_token("...")?;
            ctx.skip_space()?;
            ctx.write(" ");
        } else {
            ctx.write_type(&param.ty, DeclarationSite::Parameter)?;
            ctx.copy_space()?;
        }
        ctx.match_and_write(&param.name.name)?;
    }
    ctx.copy_space()?;
    ctx.match_and_write(")")
}

/// Skip a `throws A, B` clause (and the space before it), returning the
/// thrown types as written.
pub fn skip_throws(ctx: &mut UnitContext<'_>, throws: &[TypeNode]) -> Result<Vec<String>> {
    let Some(last) = throws.last() else {
        return Ok(Vec::new());
    };
    ctx.skip_space()?;
    ctx.match_token("throws")?;
    ctx.skip_to(last.span.end)?;
    Ok(throws.iter().map(|t| ctx.source(t.span).to_string()).collect())
}

/// Replay the arguments of a leading `super(...)`/`this(...)` statement at
/// the current output position, e.g. into an initializer list.
pub fn replay_constructor_args(ctx: &mut UnitContext<'_>, call: &Stmt, keyword: &str, args: &[Expr]) -> Result<()> {
    ctx.replay(call.span.start, |ctx| {
        ctx.match_token(keyword)?;
        ctx.skip_space()?;
        self::args(ctx, args)
    })
}

/// Leading `super(...)`/`this(...)` call of a constructor body.
pub fn constructor_call(body: Option<&Block>) -> Option<&Stmt> {
    body.and_then(|b| b.statements.first())
        .filter(|stmt| stmt.is_constructor_call())
}

/// Fields carrying the weak annotation become weak back-references whatever
/// the policy table says.
pub fn field_reference_kind(ctx: &UnitContext<'_>, field: &FieldDecl) -> Option<ReferenceKind> {
    (!field.ty.is_primitive() && field.modifiers.has_annotation(&ctx.policy.weak_annotation))
        .then_some(ReferenceKind::WeakBackReference)
}

/// ` : Base, Iface` in place of `extends Base implements Iface`.
pub fn supertypes(ctx: &mut UnitContext<'_>, decl: &TypeDecl) -> Result<()> {
    let mut wrote_any = false;
    if let Some(superclass) = &decl.superclass {
        ctx.copy_space()?;
        ctx.match_and_write_as("extends", ":")?;
        ctx.copy_space()?;
        ctx.write_type_name(superclass)?;
        wrote_any = true;
    }
    let keyword = if decl.is_interface() { "extends" } else { "implements" };
    for (i, interface) in decl.interfaces.iter().enumerate() {
        if i > 0 {
            ctx.copy_space()?;
            ctx.match_and_write(",")?;
        } else if wrote_any {
            ctx.skip_space()?;
            ctx.match_and_write_as(keyword, ",")?;
        } else {
            ctx.copy_space()?;
            ctx.match_and_write_as(keyword, ":")?;
        }
        ctx.copy_space()?;
        ctx.write_type_name(interface)?;
    }
    Ok(())
}

/// The single method of an anonymous class standing in for a lambda.
pub fn functional_method<'a>(
    ctx: &UnitContext<'_>,
    new: &NewObject,
    body: &'a AnonymousClass,
) -> Result<&'a MethodDecl> {
    let functional = new
        .ty
        .binding()
        .and_then(|id| ctx.bindings().type_info(id))
        .is_some_and(|info| info.is_functional_interface);
    match body.members.as_slice() {
        [Member::Method(method)] if functional && method.body.is_some() => Ok(method),
        _ => Err(TranslateError::unsupported(
            "anonymous class that is not an implementation of a single-method interface",
            body.span,
        )),
    }
}
