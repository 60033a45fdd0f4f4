//! Built-in backend profiles.

use crate::backend::{
    Backend, DeclarationKind, DeclarationSite, GroupingBucket, PolicyRule, ReferenceKind,
    TypeCategory,
};
use crate::error::{ConfigError, Result};
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;
use xlate_ast::{AccessLevel, PrimitiveKind};

/// Rendering policy for one backend.
///
/// Built once, then shared read-only by every unit translated with it.
#[derive(Debug, Clone)]
pub struct BackendPolicy {
    pub backend: Backend,

    /// Spaces per indent level in synthesized lines.
    pub indent_width: usize,

    /// Tab stop used when computing source columns.
    pub tab_width: usize,

    /// Spelling of each primitive type.
    primitive_types: FxHashMap<PrimitiveKind, SmolStr>,

    /// Target spelling of the source string type.
    pub string_type: SmolStr,

    /// Target spelling of the source root object type.
    pub object_type: SmolStr,

    /// Array container template; empty for backends with native array syntax.
    pub array_type: SmolStr,

    /// Header every declaration artifact includes first.
    pub runtime_include: Option<SmolStr>,

    /// Two-argument function emulating `>>>`.
    pub unsigned_shift_helper: SmolStr,

    /// Annotation marking a field as a weak back-reference.
    pub weak_annotation: SmolStr,

    /// Qualified source name of the root object type.
    pub root_object_type: SmolStr,

    /// Qualified source name of the string type.
    pub root_string_type: SmolStr,

    /// Wrap output in the unit's package namespace.
    pub namespaces: bool,

    /// Modules imported by every unit.
    pub imports: Vec<SmolStr>,

    reference_policy: FxHashMap<(TypeCategory, DeclarationSite), ReferenceKind>,

    /// Member buckets in emission order; empty keeps source order.
    grouping: Vec<GroupingBucket>,
}

impl BackendPolicy {
    /// Built-in profile for `backend`.
    pub fn for_backend(backend: Backend) -> Self {
        match backend {
            Backend::Cpp => Self::cpp(),
            Backend::CSharp => Self::csharp(),
            Backend::Swift => Self::swift(),
        }
    }

    /// C++ with shared-pointer ownership and fixed-width integers.
    pub fn cpp() -> Self {
        let mut policy = Self::base(
            Backend::Cpp,
            [
                (PrimitiveKind::Boolean, "bool"),
                (PrimitiveKind::Byte, "int8_t"),
                (PrimitiveKind::Short, "int16_t"),
                (PrimitiveKind::Int, "int32_t"),
                (PrimitiveKind::Long, "int64_t"),
                (PrimitiveKind::Char, "char16_t"),
                (PrimitiveKind::Float, "float"),
                (PrimitiveKind::Double, "double"),
                (PrimitiveKind::Void, "void"),
            ],
        );
        policy.string_type = "std::u16string".into();
        policy.object_type = "xuniv::Object".into();
        policy.array_type = "xuniv::Array".into();
        policy.runtime_include = Some("xuniv/xuniv.h".into());
        policy.unsigned_shift_helper = "xuniv::rightShiftUnsigned".into();

        for site in DeclarationSite::ALL {
            let kind = match site {
                DeclarationSite::GenericBound => ReferenceKind::Value,
                _ => ReferenceKind::SharedOwning,
            };
            policy.set_reference_kind(TypeCategory::Reference, site, kind);
        }

        let mut grouping = Vec::new();
        for kind in [DeclarationKind::Method, DeclarationKind::TypeAlias, DeclarationKind::Field, DeclarationKind::NestedType] {
            for access in [AccessLevel::Public, AccessLevel::Protected, AccessLevel::Private] {
                grouping.push(GroupingBucket::new(kind, access));
            }
        }
        policy.grouping = grouping;
        policy
    }

    /// C# keeps source order and bare reference names.
    pub fn csharp() -> Self {
        let mut policy = Self::base(
            Backend::CSharp,
            [
                (PrimitiveKind::Boolean, "bool"),
                (PrimitiveKind::Byte, "sbyte"),
                (PrimitiveKind::Short, "short"),
                (PrimitiveKind::Int, "int"),
                (PrimitiveKind::Long, "long"),
                (PrimitiveKind::Char, "char"),
                (PrimitiveKind::Float, "float"),
                (PrimitiveKind::Double, "double"),
                (PrimitiveKind::Void, "void"),
            ],
        );
        policy.string_type = "string".into();
        policy.object_type = "object".into();
        policy.unsigned_shift_helper = "Xuniv.Ops.RightShiftUnsigned".into();
        policy
    }

    /// Swift keeps source order; weak back-references become `weak` optionals.
    pub fn swift() -> Self {
        let mut policy = Self::base(
            Backend::Swift,
            [
                (PrimitiveKind::Boolean, "Bool"),
                (PrimitiveKind::Byte, "Int8"),
                (PrimitiveKind::Short, "Int16"),
                (PrimitiveKind::Int, "Int32"),
                (PrimitiveKind::Long, "Int64"),
                (PrimitiveKind::Char, "UInt16"),
                (PrimitiveKind::Float, "Float"),
                (PrimitiveKind::Double, "Double"),
                (PrimitiveKind::Void, "Void"),
            ],
        );
        policy.string_type = "String".into();
        policy.object_type = "AnyObject".into();
        policy.unsigned_shift_helper = "rightShiftUnsigned".into();
        policy.namespaces = false;
        policy.imports = vec!["Foundation".into()];
        policy
    }

    /// Shared defaults: every category renders as a bare value, source order kept.
    fn base<const N: usize>(backend: Backend, primitives: [(PrimitiveKind, &str); N]) -> Self {
        let mut reference_policy = FxHashMap::default();
        for category in [TypeCategory::Primitive, TypeCategory::Reference, TypeCategory::Generic] {
            for site in DeclarationSite::ALL {
                reference_policy.insert((category, site), ReferenceKind::Value);
            }
        }

        Self {
            backend,
            indent_width: 4,
            tab_width: 4,
            primitive_types: primitives
                .into_iter()
                .map(|(kind, spelling)| (kind, SmolStr::new(spelling)))
                .collect(),
            string_type: SmolStr::default(),
            object_type: SmolStr::default(),
            array_type: SmolStr::default(),
            runtime_include: None,
            unsigned_shift_helper: SmolStr::default(),
            weak_annotation: "Weak".into(),
            root_object_type: "java.lang.Object".into(),
            root_string_type: "java.lang.String".into(),
            namespaces: true,
            imports: Vec::new(),
            reference_policy,
            grouping: Vec::new(),
        }
    }

    /// Target spelling of a primitive type.
    pub fn primitive(&self, kind: PrimitiveKind) -> &str {
        self.primitive_types
            .get(&kind)
            .map(SmolStr::as_str)
            .unwrap_or_else(|| kind.keyword())
    }

    pub fn set_primitive(&mut self, kind: PrimitiveKind, spelling: &str) {
        self.primitive_types.insert(kind, SmolStr::new(spelling));
    }

    /// Reference kind for a `(category, site)` pair.
    pub fn reference_kind(&self, category: TypeCategory, site: DeclarationSite) -> ReferenceKind {
        self.reference_policy
            .get(&(category, site))
            .copied()
            .unwrap_or(ReferenceKind::Value)
    }

    pub fn set_reference_kind(&mut self, category: TypeCategory, site: DeclarationSite, kind: ReferenceKind) {
        self.reference_policy.insert((category, site), kind);
    }

    pub fn apply_rule(&mut self, rule: PolicyRule) {
        self.set_reference_kind(rule.category, rule.site, rule.kind);
    }

    pub fn grouping(&self) -> &[GroupingBucket] {
        &self.grouping
    }

    pub fn set_grouping(&mut self, grouping: Vec<GroupingBucket>) {
        self.grouping = grouping;
    }

    /// Check the invariants the engine relies on.
    pub fn validate(&self) -> Result<()> {
        if self.indent_width == 0 {
            return Err(ConfigError::Validation(format!(
                "{}: indent_width must be positive",
                self.backend
            )));
        }
        if self.tab_width == 0 {
            return Err(ConfigError::Validation(format!(
                "{}: tab_width must be positive",
                self.backend
            )));
        }

        let mut seen = FxHashSet::default();
        for bucket in &self.grouping {
            if !seen.insert(*bucket) {
                return Err(ConfigError::Validation(format!(
                    "{}: grouping bucket ({:?}, {:?}) listed twice",
                    self.backend, bucket.kind, bucket.access
                )));
            }
        }
        Ok(())
    }
}
