//! Per-unit translation state.
//!
//! One [`UnitContext`] exists per unit and pass. It owns the cursor, the
//! output stack, and the resolver's referenced-type set; nothing in it is
//! shared with other units. Policy and bindings are borrowed read-only.

use crate::cursor::{Coverage, Cursor};
use crate::error::{Result, TranslateError};
use crate::output::OutputStack;
use crate::resolve::{RenderedType, TypeResolver};
use smol_str::SmolStr;
use xlate_ast::{Bindings, Modifiers, SourceUnit, TypeDecl, TypeId, TypeName, TypeNode};
use xlate_common::Span;
use xlate_config::{Backend, BackendPolicy, DeclarationSite, ReferenceKind};

/// An enclosing type declaration.
#[derive(Debug, Clone)]
pub struct TypeScope {
    pub name: SmolStr,
    pub binding: TypeId,
    pub is_interface: bool,
    pub type_params: Vec<SmolStr>,
}

pub struct UnitContext<'u> {
    pub unit: &'u SourceUnit,
    pub policy: &'u BackendPolicy,
    pub cursor: Cursor<'u>,
    pub out: OutputStack,
    pub types: TypeResolver<'u>,
    scopes: Vec<TypeScope>,
}

impl<'u> UnitContext<'u> {
    pub fn new(unit: &'u SourceUnit, policy: &'u BackendPolicy) -> Self {
        let package = unit
            .package
            .as_ref()
            .map(|p| p.segments.clone())
            .unwrap_or_default();
        Self {
            unit,
            policy,
            cursor: Cursor::new(&unit.text, policy.tab_width),
            out: OutputStack::new(),
            types: TypeResolver::new(policy, &unit.bindings, &package),
            scopes: Vec::new(),
        }
    }

    /// Close the unit: the text written so far, the consumed spans, and the
    /// referenced outermost types in discovery order.
    pub fn finish(self) -> Result<(String, Coverage, Vec<TypeName>)> {
        let referenced = self.types.referenced().iter().cloned().collect();
        let text = self.out.finish()?;
        Ok((text, self.cursor.into_coverage(), referenced))
    }

    pub fn backend(&self) -> Backend {
        self.policy.backend
    }

    pub fn bindings(&self) -> &'u Bindings {
        &self.unit.bindings
    }

    pub fn source(&self, span: Span) -> &'u str {
        self.unit.text.get(span.range()).unwrap_or("")
    }

    pub fn package(&self) -> &'u [SmolStr] {
        self.unit
            .package
            .as_ref()
            .map(|p| p.segments.as_slice())
            .unwrap_or(&[])
    }

    // Output

    pub fn write(&mut self, text: &str) {
        self.out.write(text);
    }

    /// Spaces for `depth` indent levels.
    pub fn indent(&self, depth: usize) -> String {
        " ".repeat(depth * self.policy.indent_width)
    }

    /// Start a synthesized line at `depth`.
    pub fn newline(&mut self, depth: usize) {
        let indent = self.indent(depth);
        self.out.write("\n");
        self.out.write(&indent);
    }

    // Cursor

    pub fn match_and_write(&mut self, token: &str) -> Result<()> {
        self.cursor.match_and_write(&mut self.out, token, None)
    }

    pub fn match_and_write_as(&mut self, token: &str, replacement: &str) -> Result<()> {
        self.cursor.match_and_write(&mut self.out, token, Some(replacement))
    }

    pub fn match_token(&mut self, token: &str) -> Result<()> {
        self.cursor.match_token(token)
    }

    pub fn copy_space(&mut self) -> Result<()> {
        self.cursor.copy_space_and_comments(&mut self.out)
    }

    pub fn skip_space(&mut self) -> Result<()> {
        self.cursor.skip_space_and_comments()
    }

    pub fn copy_to(&mut self, end: u32) -> Result<()> {
        self.cursor.copy_through(&mut self.out, end)
    }

    pub fn skip_to(&mut self, end: u32) -> Result<()> {
        self.cursor.skip_through(end)
    }

    pub fn seek(&mut self, offset: u32) {
        self.cursor.seek(offset);
    }

    pub fn looking_at(&self, token: &str) -> bool {
        self.cursor.looking_at(token)
    }

    /// Consume `span` and write `text` in its place.
    pub fn replace_span(&mut self, span: Span, text: &str) -> Result<()> {
        if self.cursor.position() > span.start {
            return Err(TranslateError::Internal(format!(
                "cursor at {} is past the start of span {}..{}",
                self.cursor.position(),
                span.start,
                span.end
            )));
        }
        self.cursor.skip_through(span.end)?;
        self.out.write(text);
        Ok(())
    }

    /// Skip a modifier list and the trivia after it.
    pub fn skip_modifiers(&mut self, modifiers: &Modifiers) -> Result<()> {
        if let Some(span) = modifiers.span() {
            self.skip_to(span.end)?;
            self.skip_space()?;
        }
        Ok(())
    }

    /// Run `f` with the cursor at `offset`, then return. Nothing read inside
    /// counts towards coverage.
    pub fn replay<T>(&mut self, offset: u32, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let mark = self.cursor.save();
        self.cursor.seek(offset);
        self.cursor.begin_replay();
        let result = f(self);
        self.cursor.end_replay();
        self.cursor.restore(mark);
        result
    }

    /// Run `f` with copied lines shifted so `source_column` lands on `target_column`.
    pub fn with_reindent<T>(
        &mut self,
        source_column: usize,
        target_column: usize,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let previous = self
            .cursor
            .set_reindent(target_column as isize - source_column as isize);
        let result = f(self);
        self.cursor.set_reindent(previous);
        result
    }

    // Types

    /// Resolve `ty` and write it in place of its span.
    pub fn write_type(&mut self, ty: &TypeNode, site: DeclarationSite) -> Result<RenderedType> {
        self.write_type_as(ty, site, None)
    }

    pub fn write_type_as(
        &mut self,
        ty: &TypeNode,
        site: DeclarationSite,
        forced: Option<ReferenceKind>,
    ) -> Result<RenderedType> {
        let rendered = self.types.resolve_as(ty, site, forced)?;
        self.replace_span(ty.span, &rendered.text)?;
        Ok(rendered)
    }

    /// Write the bare type name in place of its span.
    pub fn write_type_name(&mut self, ty: &TypeNode) -> Result<String> {
        let name = self.types.render_name(ty)?;
        self.replace_span(ty.span, &name)?;
        Ok(name)
    }

    // Scopes

    pub fn enter_type(&mut self, decl: &TypeDecl) {
        self.scopes.push(TypeScope {
            name: decl.name.name.clone(),
            binding: decl.binding,
            is_interface: decl.is_interface(),
            type_params: decl.type_params.iter().map(|p| p.name.name.clone()).collect(),
        });
    }

    pub fn exit_type(&mut self) {
        self.scopes.pop();
    }

    pub fn current_type(&self) -> Option<&TypeScope> {
        self.scopes.last()
    }

    pub fn in_interface(&self) -> bool {
        self.current_type().is_some_and(|s| s.is_interface)
    }

    /// Names of the enclosing types, outermost first.
    pub fn scope_names(&self) -> Vec<SmolStr> {
        self.scopes.iter().map(|s| s.name.clone()).collect()
    }

    pub fn scopes(&self) -> &[TypeScope] {
        &self.scopes
    }

    pub fn is_root_object(&self, id: TypeId) -> bool {
        self.bindings()
            .type_name(id)
            .is_some_and(|n| n.qualified() == self.policy.root_object_type.as_str())
    }
}
