//! Type reference resolution.
//!
//! Turns a source type usage into its target spelling. The ownership wrapper
//! depends on where the usage occurs: the policy table maps
//! `(category, site)` to a [`ReferenceKind`], and the kind decides the
//! target syntax. Every named type seen is recorded (by its outermost
//! enclosing type) so the compilation-unit writer can emit includes.

use crate::error::{Result, TranslateError};
use indexmap::IndexSet;
use smol_str::SmolStr;
use xlate_ast::{BoundKind, Bindings, TypeId, TypeName, TypeNode, TypeNodeKind};
use xlate_common::Span;
use xlate_config::{Backend, BackendPolicy, DeclarationSite, ReferenceKind, TypeCategory};

/// A type usage rendered for the active backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedType {
    pub text: String,
    pub kind: ReferenceKind,
    pub category: TypeCategory,
    /// Declaration keyword the kind needs in front of the name (`weak` in Swift).
    pub decl_prefix: Option<&'static str>,
}

impl RenderedType {
    fn value(text: String, category: TypeCategory) -> Self {
        Self {
            text,
            kind: ReferenceKind::Value,
            category,
            decl_prefix: None,
        }
    }

    pub fn is_primitive(&self) -> bool {
        self.category == TypeCategory::Primitive
    }
}

pub struct TypeResolver<'u> {
    policy: &'u BackendPolicy,
    bindings: &'u Bindings,
    package: Vec<SmolStr>,
    referenced: IndexSet<TypeName>,
    sealed: bool,
    /// Synthetic names standing in for wildcards, keyed by the wildcard's span.
    wildcard_names: Vec<(Span, SmolStr)>,
}

impl<'u> TypeResolver<'u> {
    pub fn new(policy: &'u BackendPolicy, bindings: &'u Bindings, package: &[SmolStr]) -> Self {
        Self {
            policy,
            bindings,
            package: package.to_vec(),
            referenced: IndexSet::new(),
            sealed: false,
            wildcard_names: Vec::new(),
        }
    }

    pub fn resolve(&mut self, ty: &TypeNode, site: DeclarationSite) -> Result<RenderedType> {
        self.resolve_as(ty, site, None)
    }

    /// Resolve with an explicit reference kind overriding the policy table.
    pub fn resolve_as(
        &mut self,
        ty: &TypeNode,
        site: DeclarationSite,
        forced: Option<ReferenceKind>,
    ) -> Result<RenderedType> {
        match &ty.kind {
            TypeNodeKind::Primitive(kind) => Ok(RenderedType::value(
                self.policy.primitive(*kind).to_string(),
                TypeCategory::Primitive,
            )),

            TypeNodeKind::Named { name, binding } => {
                if self.is_string(name, *binding) {
                    return Ok(RenderedType::value(
                        self.policy.string_type.to_string(),
                        TypeCategory::Reference,
                    ));
                }
                let text = self.named(name, *binding)?;
                Ok(self.wrap(text, TypeCategory::Reference, site, forced))
            }

            TypeNodeKind::Variable { name } => {
                Ok(self.wrap(name.to_string(), TypeCategory::Generic, site, forced))
            }

            TypeNodeKind::Parameterized { .. } => {
                let text = self.render_name(ty)?;
                Ok(self.wrap(text, TypeCategory::Reference, site, forced))
            }

            TypeNodeKind::Array { element, dimensions } => {
                self.resolve_array(element, *dimensions, site, forced)
            }

            TypeNodeKind::Wildcard { bound } => {
                if let Some(name) = self.wildcard_name(ty.span) {
                    return Ok(self.wrap(name, TypeCategory::Generic, site, forced));
                }
                match bound {
                    Some(bound) if bound.kind == BoundKind::Lower => Err(TranslateError::unsupported(
                        "generic wildcard with a lower bound (`? super T`)",
                        ty.span,
                    )),
                    Some(bound) => self.resolve_as(&bound.ty, site, forced),
                    None => {
                        let text = self.policy.object_type.to_string();
                        Ok(self.wrap(text, TypeCategory::Reference, site, forced))
                    }
                }
            }
        }
    }

    /// `element[]...` with `dimensions` levels.
    pub fn resolve_array(
        &mut self,
        element: &TypeNode,
        dimensions: u32,
        site: DeclarationSite,
        forced: Option<ReferenceKind>,
    ) -> Result<RenderedType> {
        let element = self.resolve(element, DeclarationSite::ArrayElement)?;
        let mut text = element.text;
        for level in 0..dimensions.max(1) {
            let outermost = level + 1 == dimensions.max(1);
            text = match self.policy.backend {
                Backend::Cpp => {
                    let container = format!("{}<{}>", self.policy.array_type, text);
                    if outermost {
                        return Ok(self.wrap(container, TypeCategory::Reference, site, forced));
                    }
                    self.wrap(container, TypeCategory::Reference, DeclarationSite::ArrayElement, None)
                        .text
                }
                Backend::CSharp => format!("{text}[]"),
                Backend::Swift => format!("[{text}]"),
            };
        }
        Ok(self.wrap(text, TypeCategory::Reference, site, forced))
    }

    /// The type's name without any ownership wrapper, for base clauses,
    /// constructor calls, casts and static qualifiers.
    pub fn render_name(&mut self, ty: &TypeNode) -> Result<String> {
        match &ty.kind {
            TypeNodeKind::Named { name, binding } => {
                if self.is_string(name, *binding) {
                    return Ok(self.policy.string_type.to_string());
                }
                self.named(name, *binding)
            }
            TypeNodeKind::Parameterized { base, args } => {
                let base = self.render_name(base)?;
                let mut rendered = Vec::with_capacity(args.len());
                for arg in args {
                    rendered.push(self.resolve(arg, DeclarationSite::TypeArgument)?.text);
                }
                Ok(format!("{}<{}>", base, rendered.join(", ")))
            }
            _ => Ok(self.resolve_as(ty, DeclarationSite::GenericBound, Some(ReferenceKind::Value))?.text),
        }
    }

    /// Bare name of a bound type, recording it as referenced.
    pub fn render_type_id(&mut self, id: TypeId) -> Result<String> {
        let name = self
            .bindings
            .type_name(id)
            .ok_or_else(|| TranslateError::Internal(format!("no type with id {}", id.0)))?;
        let qualified = name.qualified();
        if qualified == self.policy.root_string_type.as_str() {
            return Ok(self.policy.string_type.to_string());
        }
        if qualified == self.policy.root_object_type.as_str() {
            return Ok(self.policy.object_type.to_string());
        }
        let name = name.clone();
        self.record(&name)?;
        Ok(self.spell(&name))
    }

    /// Outermost types referenced so far, in discovery order.
    pub fn referenced(&self) -> &IndexSet<TypeName> {
        &self.referenced
    }

    /// Stop accepting new references; the preamble is about to be written.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn set_wildcard_names(&mut self, names: Vec<(Span, SmolStr)>) {
        self.wildcard_names = names;
    }

    pub fn clear_wildcard_names(&mut self) {
        self.wildcard_names.clear();
    }

    fn wildcard_name(&self, span: Span) -> Option<String> {
        self.wildcard_names
            .iter()
            .find(|(s, _)| *s == span)
            .map(|(_, name)| name.to_string())
    }

    fn named(&mut self, name: &str, binding: Option<TypeId>) -> Result<String> {
        match binding {
            Some(id) => self.render_type_id(id),
            None if name == simple_name(&self.policy.root_object_type) => {
                Ok(self.policy.object_type.to_string())
            }
            None => Ok(match self.policy.backend {
                Backend::Cpp => name.replace('.', "::"),
                Backend::CSharp | Backend::Swift => name.to_string(),
            }),
        }
    }

    fn is_string(&self, name: &str, binding: Option<TypeId>) -> bool {
        match binding.and_then(|id| self.bindings.type_name(id)) {
            Some(type_name) => type_name.qualified() == self.policy.root_string_type.as_str(),
            None => binding.is_none() && name == simple_name(&self.policy.root_string_type),
        }
    }

    fn spell(&self, name: &TypeName) -> String {
        match self.policy.backend {
            Backend::Cpp if name.package == self.package => name.names.join("::"),
            Backend::Cpp => name.join("::"),
            Backend::CSharp if name.package == self.package => name.names.join("."),
            Backend::CSharp => name.join("."),
            Backend::Swift => name.names.join("."),
        }
    }

    fn record(&mut self, name: &TypeName) -> Result<()> {
        let outermost = name.outermost();
        if self.referenced.contains(&outermost) {
            return Ok(());
        }
        if self.sealed {
            return Err(TranslateError::BufferDiscipline(format!(
                "type `{}` referenced after the preamble was written",
                name.qualified()
            )));
        }
        tracing::trace!(ty = %outermost, "referenced type");
        self.referenced.insert(outermost);
        Ok(())
    }

    fn wrap(
        &self,
        text: String,
        category: TypeCategory,
        site: DeclarationSite,
        forced: Option<ReferenceKind>,
    ) -> RenderedType {
        let kind = forced.unwrap_or_else(|| self.policy.reference_kind(category, site));
        let (text, decl_prefix) = match (self.policy.backend, kind) {
            (_, ReferenceKind::Value) => (text, None),
            (Backend::Cpp, ReferenceKind::RawPointer) => (format!("{text}*"), None),
            (Backend::Cpp, ReferenceKind::SharedOwning) => (format!("std::shared_ptr<{text}>"), None),
            (Backend::Cpp, ReferenceKind::WeakBackReference) => (format!("std::weak_ptr<{text}>"), None),
            (Backend::CSharp, ReferenceKind::WeakBackReference) => (format!("WeakReference<{text}>"), None),
            (Backend::CSharp, _) => (text, None),
            (Backend::Swift, ReferenceKind::WeakBackReference) => (format!("{text}?"), Some("weak")),
            (Backend::Swift, ReferenceKind::RawPointer) => (text, Some("unowned(unsafe)")),
            (Backend::Swift, ReferenceKind::SharedOwning) => (text, None),
        };
        RenderedType {
            text,
            kind,
            category,
            decl_prefix,
        }
    }
}

fn simple_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use xlate_ast::{PrimitiveKind, TypeInfo, WildcardBound};

    struct Env {
        bindings: Bindings,
        foo: TypeId,
        inner: TypeId,
        list: TypeId,
        string: TypeId,
    }

    fn env() -> Env {
        let mut bindings = Bindings::new();
        let foo = bindings.add_type(TypeInfo::class(TypeName::parse("app.model.Foo")));
        let inner = bindings.add_type(TypeInfo::class(TypeName::new(&["app", "model"], &["Foo", "Node"])));
        let list = bindings.add_type(TypeInfo::interface(TypeName::parse("java.util.List")));
        let string = bindings.add_type(TypeInfo::class(TypeName::parse("java.lang.String")));
        Env {
            bindings,
            foo,
            inner,
            list,
            string,
        }
    }

    fn named(name: &str, binding: TypeId) -> TypeNode {
        TypeNode::new(
            TypeNodeKind::Named {
                name: name.into(),
                binding: Some(binding),
            },
            Span::default(),
        )
    }

    fn package() -> Vec<SmolStr> {
        vec!["app".into(), "model".into()]
    }

    #[test]
    fn test_site_decides_wrapper() {
        let env = env();
        let mut policy = BackendPolicy::cpp();
        policy.set_reference_kind(TypeCategory::Reference, DeclarationSite::LocalVariable, ReferenceKind::Value);
        let mut resolver = TypeResolver::new(&policy, &env.bindings, &package());
        let foo = named("Foo", env.foo);

        let local = resolver.resolve(&foo, DeclarationSite::LocalVariable).unwrap();
        assert_eq!(local.text, "Foo");
        assert_eq!(local.kind, ReferenceKind::Value);

        let field = resolver.resolve(&foo, DeclarationSite::Field).unwrap();
        assert_eq!(field.text, "std::shared_ptr<Foo>");
        assert_eq!(field.kind, ReferenceKind::SharedOwning);

        let weak = resolver
            .resolve_as(&foo, DeclarationSite::Field, Some(ReferenceKind::WeakBackReference))
            .unwrap();
        assert_eq!(weak.text, "std::weak_ptr<Foo>");
    }

    #[test]
    fn test_referenced_types_record_outermost() {
        let env = env();
        let policy = BackendPolicy::cpp();
        let mut resolver = TypeResolver::new(&policy, &env.bindings, &package());

        let node = resolver.resolve(&named("Node", env.inner), DeclarationSite::Parameter).unwrap();
        assert_eq!(node.text, "std::shared_ptr<Foo::Node>");
        let list = TypeNode::new(
            TypeNodeKind::Parameterized {
                base: Box::new(named("List", env.list)),
                args: vec![named("String", env.string)],
            },
            Span::default(),
        );
        let rendered = resolver.resolve(&list, DeclarationSite::ReturnType).unwrap();
        assert_eq!(rendered.text, "std::shared_ptr<java::util::List<std::u16string>>");

        let referenced: Vec<String> = resolver.referenced().iter().map(TypeName::qualified).collect();
        assert_eq!(referenced, vec!["app.model.Foo", "java.util.List"]);
    }

    #[test]
    fn test_arrays_per_backend() {
        let env = env();
        let int_array = |dims| TypeNode::new(
            TypeNodeKind::Array {
                element: Box::new(TypeNode::new(TypeNodeKind::Primitive(PrimitiveKind::Int), Span::default())),
                dimensions: dims,
            },
            Span::default(),
        );

        let cpp = BackendPolicy::cpp();
        let mut resolver = TypeResolver::new(&cpp, &env.bindings, &package());
        assert_eq!(
            resolver.resolve(&int_array(1), DeclarationSite::Field).unwrap().text,
            "std::shared_ptr<xuniv::Array<int32_t>>"
        );
        assert_eq!(
            resolver.resolve(&int_array(2), DeclarationSite::LocalVariable).unwrap().text,
            "std::shared_ptr<xuniv::Array<std::shared_ptr<xuniv::Array<int32_t>>>>"
        );

        let csharp = BackendPolicy::csharp();
        let mut resolver = TypeResolver::new(&csharp, &env.bindings, &package());
        assert_eq!(resolver.resolve(&int_array(2), DeclarationSite::Field).unwrap().text, "int[][]");

        let swift = BackendPolicy::swift();
        let mut resolver = TypeResolver::new(&swift, &env.bindings, &package());
        assert_eq!(resolver.resolve(&int_array(1), DeclarationSite::Field).unwrap().text, "[Int32]");
    }

    #[test]
    fn test_lower_bounded_wildcard_is_unsupported() {
        let env = env();
        let policy = BackendPolicy::csharp();
        let mut resolver = TypeResolver::new(&policy, &env.bindings, &package());
        let wildcard = TypeNode::new(
            TypeNodeKind::Wildcard {
                bound: Some(WildcardBound {
                    kind: BoundKind::Lower,
                    ty: Box::new(named("Foo", env.foo)),
                }),
            },
            Span::new(5, 18),
        );
        let err = resolver.resolve(&wildcard, DeclarationSite::TypeArgument).unwrap_err();
        assert!(!err.is_fatal());
        assert_eq!(err.span(), Some(Span::new(5, 18)));

        let upper = TypeNode::new(
            TypeNodeKind::Wildcard {
                bound: Some(WildcardBound {
                    kind: BoundKind::Upper,
                    ty: Box::new(named("Foo", env.foo)),
                }),
            },
            Span::new(5, 20),
        );
        assert_eq!(resolver.resolve(&upper, DeclarationSite::TypeArgument).unwrap().text, "Foo");
    }

    #[test]
    fn test_swift_weak_reference_is_optional() {
        let env = env();
        let policy = BackendPolicy::swift();
        let mut resolver = TypeResolver::new(&policy, &env.bindings, &package());
        let weak = resolver
            .resolve_as(&named("Foo", env.foo), DeclarationSite::Field, Some(ReferenceKind::WeakBackReference))
            .unwrap();
        assert_eq!(weak.text, "Foo?");
        assert_eq!(weak.decl_prefix, Some("weak"));
    }

    #[test]
    fn test_reference_after_seal_is_rejected() {
        let env = env();
        let policy = BackendPolicy::cpp();
        let mut resolver = TypeResolver::new(&policy, &env.bindings, &package());
        resolver.resolve(&named("Foo", env.foo), DeclarationSite::Field).unwrap();
        resolver.seal();
        assert!(resolver.resolve(&named("Foo", env.foo), DeclarationSite::Field).is_ok());
        assert!(matches!(
            resolver.resolve(&named("List", env.list), DeclarationSite::Field),
            Err(TranslateError::BufferDiscipline(_))
        ));
    }
}
