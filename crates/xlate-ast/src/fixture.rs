//! Span-locating node builders for tests.
//!
//! Builders locate their tokens in the fixture text in call order, so a tree
//! must be built in the order its tokens appear in source. Arguments are
//! evaluated left to right, which makes nested builder calls line up with
//! the text naturally; tokens that precede a child (`if`, `new`, `?`) are
//! passed in explicitly via [`Fixture::tok`].

use crate::bindings::{Bindings, MethodId, TypeId};
use crate::expr::*;
use crate::item::*;
use crate::locate::Locator;
use crate::modifiers::{Modifier, ModifierKind, Modifiers};
use crate::stmt::*;
use crate::types::*;
use crate::unit::{PackageDecl, SourceUnit};
use smol_str::SmolStr;
use xlate_common::Span;

pub struct Fixture<'a> {
    loc: Locator<'a>,
}

impl<'a> Fixture<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            loc: Locator::new(text),
        }
    }

    /// Span of the next occurrence of `token`.
    pub fn tok(&self, token: &str) -> Span {
        self.loc
            .next(token)
            .unwrap_or_else(|| panic!("token {token:?} not found after offset {}", self.loc.position()))
    }

    pub fn ident(&self, name: &str) -> Ident {
        Ident::new(name, self.tok(name))
    }

    // Types

    pub fn prim(&self, keyword: &str) -> TypeNode {
        let kind = PrimitiveKind::from_keyword(keyword)
            .unwrap_or_else(|| panic!("{keyword:?} is not a primitive type"));
        TypeNode::new(TypeNodeKind::Primitive(kind), self.tok(keyword))
    }

    pub fn named(&self, name: &str, binding: Option<TypeId>) -> TypeNode {
        TypeNode::new(
            TypeNodeKind::Named {
                name: SmolStr::new(name),
                binding,
            },
            self.tok(name),
        )
    }

    pub fn tvar(&self, name: &str) -> TypeNode {
        TypeNode::new(
            TypeNodeKind::Variable {
                name: SmolStr::new(name),
            },
            self.tok(name),
        )
    }

    pub fn generic(&self, base: TypeNode, args: Vec<TypeNode>) -> TypeNode {
        let span = base.span.merge(self.tok(">"));
        TypeNode::new(
            TypeNodeKind::Parameterized {
                base: Box::new(base),
                args,
            },
            span,
        )
    }

    pub fn array(&self, element: TypeNode, dimensions: u32) -> TypeNode {
        let mut span = element.span;
        for _ in 0..dimensions {
            span = span.merge(self.tok("]"));
        }
        TypeNode::new(
            TypeNodeKind::Array {
                element: Box::new(element),
                dimensions,
            },
            span,
        )
    }

    /// `?`, `? extends T`, or `? super T`; `question` is the `?` token.
    pub fn wildcard(&self, question: Span, bound: Option<(BoundKind, TypeNode)>) -> TypeNode {
        let span = match &bound {
            Some((_, ty)) => question.merge(ty.span),
            None => question,
        };
        TypeNode::new(
            TypeNodeKind::Wildcard {
                bound: bound.map(|(kind, ty)| WildcardBound {
                    kind,
                    ty: Box::new(ty),
                }),
            },
            span,
        )
    }

    pub fn type_param(&self, name: Ident, bounds: Vec<TypeNode>) -> TypeParam {
        let span = bounds.iter().fold(name.span, |s, b| s.merge(b.span));
        TypeParam { name, bounds, span }
    }

    // Expressions

    pub fn lit(&self, text: &str, kind: LiteralKind) -> Expr {
        let ty = match kind {
            LiteralKind::Int => Some(ExprType::Primitive(PrimitiveKind::Int)),
            LiteralKind::Long => Some(ExprType::Primitive(PrimitiveKind::Long)),
            LiteralKind::Float => Some(ExprType::Primitive(PrimitiveKind::Float)),
            LiteralKind::Double => Some(ExprType::Primitive(PrimitiveKind::Double)),
            LiteralKind::Char => Some(ExprType::Primitive(PrimitiveKind::Char)),
            LiteralKind::Boolean => Some(ExprType::Primitive(PrimitiveKind::Boolean)),
            LiteralKind::String => Some(ExprType::Reference { binding: None }),
            LiteralKind::Null => Some(ExprType::Null),
        };
        Expr {
            kind: ExprKind::Literal(Literal { kind }),
            span: self.tok(text),
            ty,
        }
    }

    pub fn int(&self, text: &str) -> Expr {
        self.lit(text, LiteralKind::Int)
    }

    pub fn name(&self, name: &str, binding: NameBinding) -> Expr {
        let ident = self.ident(name);
        let span = ident.span;
        Expr::new(ExprKind::Name { ident, binding }, span)
    }

    /// A local of primitive type.
    pub fn local(&self, name: &str, kind: PrimitiveKind) -> Expr {
        self.name(name, NameBinding::Local)
            .with_type(ExprType::Primitive(kind))
    }

    /// A local of reference type.
    pub fn local_ref(&self, name: &str) -> Expr {
        self.name(name, NameBinding::Local)
            .with_type(ExprType::Reference { binding: None })
    }

    pub fn type_name(&self, name: &str, id: TypeId) -> Expr {
        self.name(name, NameBinding::Type(id))
    }

    pub fn this(&self) -> Expr {
        Expr::new(ExprKind::This, self.tok("this")).with_type(ExprType::Reference { binding: None })
    }

    pub fn field_access(&self, target: Expr, name: &str) -> Expr {
        let name = self.ident(name);
        let span = target.span.merge(name.span);
        Expr::new(
            ExprKind::FieldAccess {
                target: Box::new(target),
                name,
            },
            span,
        )
    }

    pub fn infix(&self, left: Expr, op: InfixOp, right: Expr) -> Expr {
        let span = left.span.merge(right.span);
        Expr::new(
            ExprKind::Infix {
                op,
                left: Box::new(left),
                right: Box::new(right),
                extended: Vec::new(),
            },
            span,
        )
    }

    pub fn prefix(&self, op: Span, kind: PrefixOp, operand: Expr) -> Expr {
        let span = op.merge(operand.span);
        Expr::new(
            ExprKind::Prefix {
                op: kind,
                operand: Box::new(operand),
            },
            span,
        )
    }

    pub fn postfix(&self, operand: Expr, op: PostfixOp) -> Expr {
        let span = operand.span.merge(self.tok(op.token()));
        Expr::new(
            ExprKind::Postfix {
                op,
                operand: Box::new(operand),
            },
            span,
        )
    }

    pub fn assign(&self, lhs: Expr, op: AssignOp, rhs: Expr) -> Expr {
        let span = lhs.span.merge(rhs.span);
        Expr::new(
            ExprKind::Assign {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            span,
        )
    }

    pub fn call(&self, receiver: Option<Expr>, name: Ident, args: Vec<Expr>, binding: Option<MethodId>) -> Expr {
        let start = receiver.as_ref().map(|r| r.span).unwrap_or(name.span);
        let span = start.merge(self.tok(")"));
        Expr::new(
            ExprKind::Call {
                receiver: receiver.map(Box::new),
                name,
                args,
                binding,
            },
            span,
        )
    }

    pub fn super_call(&self, super_kw: Span, name: Ident, args: Vec<Expr>) -> Expr {
        let span = super_kw.merge(self.tok(")"));
        Expr::new(
            ExprKind::SuperCall {
                name,
                args,
                binding: None,
            },
            span,
        )
    }

    /// `new T(args)`; `close` is the `)` token, located before any anonymous body.
    pub fn new_object(
        &self,
        new_kw: Span,
        ty: TypeNode,
        args: Vec<Expr>,
        close: Span,
        body: Option<AnonymousClass>,
    ) -> Expr {
        let end = body.as_ref().map(|b| b.span).unwrap_or(close);
        Expr::new(
            ExprKind::New(NewObject {
                outer: None,
                ty,
                args,
                body,
            }),
            new_kw.merge(end),
        )
        .with_type(ExprType::Reference { binding: None })
    }

    pub fn anonymous(&self, open: Span, members: Vec<Member>) -> AnonymousClass {
        AnonymousClass {
            members,
            span: open.merge(self.tok("}")),
        }
    }

    /// `new T[n]`; the `]` closing the last dimension ends the expression.
    pub fn new_array(&self, new_kw: Span, element: TypeNode, dimensions: Vec<Expr>) -> Expr {
        let close = self.tok("]");
        let ty = TypeNode::new(
            TypeNodeKind::Array {
                dimensions: dimensions.len() as u32,
                element: Box::new(element.clone()),
            },
            element.span.merge(close),
        );
        Expr::new(
            ExprKind::NewArray(NewArray {
                ty,
                dimensions,
                initializer: None,
            }),
            new_kw.merge(close),
        )
        .with_type(ExprType::Array)
    }

    /// `new T[] { ... }`; `ty` is the array type built with [`Fixture::array`].
    pub fn new_array_init(&self, new_kw: Span, ty: TypeNode, initializer: ArrayInit) -> Expr {
        let span = new_kw.merge(initializer.span);
        Expr::new(
            ExprKind::NewArray(NewArray {
                ty,
                dimensions: Vec::new(),
                initializer: Some(initializer),
            }),
            span,
        )
        .with_type(ExprType::Array)
    }

    pub fn array_init(&self, open: Span, elements: Vec<Expr>) -> ArrayInit {
        ArrayInit {
            elements,
            span: open.merge(self.tok("}")),
        }
    }

    /// A bare `{ ... }` initializer used as a declarator's value.
    pub fn array_init_expr(&self, open: Span, elements: Vec<Expr>) -> Expr {
        let init = self.array_init(open, elements);
        let span = init.span;
        Expr::new(ExprKind::ArrayInit(init), span).with_type(ExprType::Array)
    }

    pub fn index(&self, array: Expr, index: Expr) -> Expr {
        let span = array.span.merge(self.tok("]"));
        Expr::new(
            ExprKind::Index {
                array: Box::new(array),
                index: Box::new(index),
            },
            span,
        )
    }

    pub fn cast(&self, open: Span, ty: TypeNode, expr: Expr) -> Expr {
        let span = open.merge(expr.span);
        Expr::new(
            ExprKind::Cast {
                ty,
                expr: Box::new(expr),
            },
            span,
        )
    }

    pub fn conditional(&self, cond: Expr, then_expr: Expr, else_expr: Expr) -> Expr {
        let span = cond.span.merge(else_expr.span);
        Expr::new(
            ExprKind::Conditional {
                cond: Box::new(cond),
                then_expr: Box::new(then_expr),
                else_expr: Box::new(else_expr),
            },
            span,
        )
    }

    pub fn paren(&self, open: Span, inner: Expr) -> Expr {
        let span = open.merge(self.tok(")"));
        let ty = inner.ty;
        Expr {
            kind: ExprKind::Paren(Box::new(inner)),
            span,
            ty,
        }
    }

    pub fn instance_of(&self, expr: Expr, ty: TypeNode) -> Expr {
        let span = expr.span.merge(ty.span);
        Expr::new(
            ExprKind::InstanceOf {
                expr: Box::new(expr),
                ty,
            },
            span,
        )
        .with_type(ExprType::Primitive(PrimitiveKind::Boolean))
    }

    // Statements

    pub fn expr_stmt(&self, expr: Expr) -> Stmt {
        let span = expr.span.merge(self.tok(";"));
        Stmt::new(StmtKind::Expr(expr), span)
    }

    pub fn frag(&self, name: Ident, init: Option<Expr>) -> VarFragment {
        let span = init.as_ref().map(|i| name.span.merge(i.span)).unwrap_or(name.span);
        VarFragment {
            name,
            extra_dimensions: 0,
            init,
            span,
        }
    }

    pub fn local_var(&self, modifiers: Modifiers, ty: TypeNode, fragments: Vec<VarFragment>) -> LocalVar {
        let start = modifiers.span().unwrap_or(ty.span);
        let span = fragments.iter().fold(start.merge(ty.span), |s, f| s.merge(f.span));
        LocalVar {
            modifiers,
            ty,
            fragments,
            span,
        }
    }

    pub fn local_stmt(&self, local: LocalVar) -> Stmt {
        let span = local.span.merge(self.tok(";"));
        Stmt::new(StmtKind::Local(local), span)
    }

    pub fn block(&self, open: Span, statements: Vec<Stmt>) -> Block {
        Block::new(statements, open.merge(self.tok("}")))
    }

    pub fn block_stmt(&self, block: Block) -> Stmt {
        let span = block.span;
        Stmt::new(StmtKind::Block(block), span)
    }

    pub fn ret(&self, kw: Span, value: Option<Expr>) -> Stmt {
        Stmt::new(StmtKind::Return(value), kw.merge(self.tok(";")))
    }

    pub fn throw(&self, kw: Span, value: Expr) -> Stmt {
        Stmt::new(StmtKind::Throw(value), kw.merge(self.tok(";")))
    }

    pub fn brk(&self) -> Stmt {
        let kw = self.tok("break");
        Stmt::new(StmtKind::Break, kw.merge(self.tok(";")))
    }

    pub fn cont(&self) -> Stmt {
        let kw = self.tok("continue");
        Stmt::new(StmtKind::Continue, kw.merge(self.tok(";")))
    }

    pub fn empty(&self) -> Stmt {
        Stmt::new(StmtKind::Empty, self.tok(";"))
    }

    pub fn group(&self, labels: Vec<SwitchLabel>, statements: Vec<Stmt>) -> SwitchGroup {
        SwitchGroup { labels, statements }
    }

    pub fn if_stmt(&self, kw: Span, cond: Expr, then_stmt: Stmt, else_stmt: Option<Stmt>) -> Stmt {
        let end = else_stmt.as_ref().map(|s| s.span).unwrap_or(then_stmt.span);
        Stmt::new(
            StmtKind::If {
                cond,
                then_stmt: Box::new(then_stmt),
                else_stmt: else_stmt.map(Box::new),
            },
            kw.merge(end),
        )
    }

    pub fn while_stmt(&self, kw: Span, cond: Expr, body: Stmt) -> Stmt {
        let span = kw.merge(body.span);
        Stmt::new(
            StmtKind::While {
                cond,
                body: Box::new(body),
            },
            span,
        )
    }

    pub fn do_while(&self, kw: Span, body: Stmt, cond: Expr) -> Stmt {
        let span = kw.merge(self.tok(";"));
        Stmt::new(
            StmtKind::DoWhile {
                body: Box::new(body),
                cond,
            },
            span,
        )
    }

    pub fn for_stmt(&self, kw: Span, init: Option<ForInit>, cond: Option<Expr>, updates: Vec<Expr>, body: Stmt) -> Stmt {
        let span = kw.merge(body.span);
        Stmt::new(
            StmtKind::For {
                init,
                cond,
                updates,
                body: Box::new(body),
            },
            span,
        )
    }

    pub fn for_each(&self, kw: Span, var: Param, iterable: Expr, body: Stmt) -> Stmt {
        let span = kw.merge(body.span);
        Stmt::new(
            StmtKind::ForEach {
                var,
                iterable,
                body: Box::new(body),
            },
            span,
        )
    }

    pub fn catch(&self, kw: Span, param: Param, body: Block) -> CatchClause {
        let span = kw.merge(body.span);
        CatchClause { param, body, span }
    }

    pub fn try_stmt(&self, kw: Span, body: Block, catches: Vec<CatchClause>, finally: Option<Block>) -> Stmt {
        let end = finally
            .as_ref()
            .map(|f| f.span)
            .or_else(|| catches.last().map(|c| c.span))
            .unwrap_or(body.span);
        Stmt::new(
            StmtKind::Try {
                body,
                catches,
                finally,
            },
            kw.merge(end),
        )
    }

    pub fn case(&self, kw: Span, value: Option<Expr>) -> SwitchLabel {
        SwitchLabel {
            value,
            span: kw.merge(self.tok(":")),
        }
    }

    pub fn switch_stmt(&self, kw: Span, selector: Expr, groups: Vec<SwitchGroup>) -> Stmt {
        let span = kw.merge(self.tok("}"));
        Stmt::new(StmtKind::Switch { selector, groups }, span)
    }

    pub fn synchronized(&self, kw: Span, lock: Expr, body: Block) -> Stmt {
        let span = kw.merge(body.span);
        Stmt::new(StmtKind::Synchronized { lock, body }, span)
    }

    pub fn super_ctor(&self, kw: Span, args: Vec<Expr>) -> Stmt {
        Stmt::new(StmtKind::SuperConstructorCall { args }, kw.merge(self.tok(";")))
    }

    pub fn this_ctor(&self, kw: Span, args: Vec<Expr>) -> Stmt {
        Stmt::new(StmtKind::ThisConstructorCall { args }, kw.merge(self.tok(";")))
    }

    // Declarations

    /// Modifiers by keyword; `@Name` entries become annotations.
    pub fn mods(&self, keywords: &[&str]) -> Modifiers {
        let modifiers = keywords
            .iter()
            .map(|kw| {
                let span = self.tok(kw);
                let kind = match *kw {
                    "public" => ModifierKind::Public,
                    "protected" => ModifierKind::Protected,
                    "private" => ModifierKind::Private,
                    "static" => ModifierKind::Static,
                    "final" => ModifierKind::Final,
                    "abstract" => ModifierKind::Abstract,
                    "native" => ModifierKind::Native,
                    "synchronized" => ModifierKind::Synchronized,
                    "transient" => ModifierKind::Transient,
                    "volatile" => ModifierKind::Volatile,
                    "strictfp" => ModifierKind::Strictfp,
                    "default" => ModifierKind::Default,
                    other => match other.strip_prefix('@') {
                        Some(name) => ModifierKind::Annotation(SmolStr::new(name)),
                        None => panic!("unknown modifier {other:?}"),
                    },
                };
                Modifier { kind, span }
            })
            .collect();
        Modifiers::new(modifiers)
    }

    pub fn param(&self, modifiers: Modifiers, ty: TypeNode, name: Ident) -> Param {
        let start = modifiers.span().unwrap_or(ty.span);
        let span = start.merge(name.span);
        Param {
            modifiers,
            ty,
            is_varargs: false,
            name,
            span,
        }
    }

    /// `T... name`
    pub fn varargs_param(&self, modifiers: Modifiers, ty: TypeNode, name: Ident) -> Param {
        Param {
            is_varargs: true,
            ..self.param(modifiers, ty, name)
        }
    }

    pub fn field(&self, modifiers: Modifiers, ty: TypeNode, fragments: Vec<VarFragment>) -> Member {
        let start = modifiers.span().unwrap_or(ty.span);
        let span = start.merge(self.tok(";"));
        Member::Field(FieldDecl {
            modifiers,
            ty,
            fragments,
            span,
        })
    }

    /// A method; `return_type: None` declares a constructor. Body-less methods end at `;`.
    #[allow(clippy::too_many_arguments)]
    pub fn method(
        &self,
        modifiers: Modifiers,
        type_params: Vec<TypeParam>,
        return_type: Option<TypeNode>,
        name: Ident,
        params: Vec<Param>,
        throws: Vec<TypeNode>,
        body: Option<Block>,
        binding: Option<MethodId>,
    ) -> Member {
        let start = modifiers
            .span()
            .or_else(|| type_params.first().map(|t| t.span))
            .or_else(|| return_type.as_ref().map(|t| t.span))
            .unwrap_or(name.span);
        let end = match &body {
            Some(block) => block.span,
            None => self.tok(";"),
        };
        Member::Method(MethodDecl {
            modifiers,
            type_params,
            return_type,
            name,
            params,
            throws,
            body,
            binding,
            span: start.merge(end),
        })
    }

    /// A class or interface; `keyword` is the `class`/`interface` token.
    #[allow(clippy::too_many_arguments)]
    pub fn type_decl(
        &self,
        modifiers: Modifiers,
        keyword: Span,
        name: Ident,
        type_params: Vec<TypeParam>,
        superclass: Option<TypeNode>,
        interfaces: Vec<TypeNode>,
        members: Vec<Member>,
        binding: TypeId,
    ) -> TypeDecl {
        let kind = if &self.loc.text()[keyword.range()] == "interface" {
            TypeDeclKind::Interface
        } else {
            TypeDeclKind::Class
        };
        let start = modifiers.span().unwrap_or(keyword);
        let span = start.merge(self.tok("}"));
        TypeDecl {
            modifiers,
            kind,
            name,
            type_params,
            superclass,
            interfaces,
            members,
            binding,
            span,
        }
    }

    pub fn package(&self, segments: &[&str]) -> PackageDecl {
        let kw = self.tok("package");
        PackageDecl {
            segments: segments.iter().map(|s| SmolStr::new(s)).collect(),
            span: kw.merge(self.tok(";")),
        }
    }

    pub fn unit(&self, package: Option<PackageDecl>, types: Vec<TypeDecl>, bindings: Bindings) -> SourceUnit {
        SourceUnit {
            name: "fixture".to_string(),
            text: self.loc.text().to_string(),
            package,
            imports: Vec::new(),
            types,
            bindings,
        }
    }
}
