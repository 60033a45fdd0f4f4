//! C# backend: one artifact per unit, members in source order.

pub mod decl;
pub mod expr;
pub mod stmt;

use crate::classify::{find_overridden, Overridability};
use crate::context::UnitContext;
use crate::unit::Frame;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use xlate_ast::{AccessLevel, MethodId};

pub(crate) fn frame(package: &[SmolStr]) -> Frame {
    if package.is_empty() {
        return Frame::default();
    }
    Frame {
        preamble: format!("namespace {} {{\n", package.join(".")),
        postamble: "}\n".to_string(),
    }
}

pub(crate) fn access_keyword(access: AccessLevel) -> &'static str {
    match access {
        AccessLevel::Public => "public",
        AccessLevel::Protected => "protected",
        AccessLevel::PackagePrivate => "internal",
        AccessLevel::Private => "private",
    }
}

pub(crate) fn overridability_keyword(class: Overridability) -> &'static str {
    match class {
        Overridability::Static => "static ",
        Overridability::Abstract => "abstract ",
        Overridability::AbstractOverriding => "abstract override ",
        Overridability::Overriding => "override ",
        Overridability::SealedOverriding => "sealed override ",
        Overridability::VirtualByDefault => "virtual ",
        Overridability::NonVirtual | Overridability::Introducing => "",
    }
}

/// The framework spelling of a root object method (`equals` → `Equals`).
///
/// With a binding, only methods that are, or ultimately override, the root
/// object's declaration are renamed.
pub(crate) fn root_method_name(
    ctx: &UnitContext<'_>,
    name: &str,
    arity: usize,
    binding: Option<MethodId>,
) -> Option<&'static str> {
    let renamed = match (name, arity) {
        ("equals", 1) => "Equals",
        ("hashCode", 0) => "GetHashCode",
        ("toString", 0) => "ToString",
        _ => return None,
    };
    let Some(mut id) = binding else {
        return Some(renamed);
    };
    let bindings = ctx.bindings();
    let mut visited = FxHashSet::default();
    while visited.insert(id) {
        let info = bindings.method(id)?;
        if ctx.is_root_object(info.declaring_type) {
            return Some(renamed);
        }
        id = find_overridden(bindings, info)?;
    }
    None
}
