//! C++ backend: each unit becomes a header (class declaration) and a source
//! file (out-of-line member definitions).

pub mod expr;
pub mod header;
pub mod source;
pub mod stmt;

use crate::classify::Overridability;
use crate::unit::Frame;
use smol_str::SmolStr;
use xlate_ast::{TypeName, TypeParam};

/// `a/b/Foo.h`
pub fn header_path(name: &TypeName) -> String {
    format!("{}.h", name.outermost().join("/"))
}

/// `A_B_FOO_H`
pub fn include_guard(name: &TypeName) -> String {
    format!("{}_H", name.outermost().join("_").to_uppercase())
}

/// Guard, runtime include, one include per referenced type, then the
/// namespace blocks.
pub(crate) fn header_frame(
    guard: &str,
    runtime_include: Option<&str>,
    package: &[SmolStr],
    includes: &[String],
) -> Frame {
    let mut preamble = format!("#ifndef {guard}\n#define {guard}\n\n");
    if let Some(runtime) = runtime_include {
        preamble.push_str(&format!("#include \"{runtime}\"\n"));
    }
    for include in includes {
        preamble.push_str(&format!("#include \"{include}\"\n"));
    }
    preamble.push('\n');
    if !package.is_empty() {
        preamble.push_str(&open_namespaces(package));
        preamble.push('\n');
    }

    let mut postamble = close_namespaces(package);
    postamble.push_str(&format!("\n#endif // {guard}\n"));
    Frame {
        preamble,
        postamble,
    }
}

pub(crate) fn source_frame(own_header: &str, package: &[SmolStr], includes: &[String]) -> Frame {
    let mut preamble = format!("#include \"{own_header}\"\n");
    for include in includes {
        preamble.push_str(&format!("#include \"{include}\"\n"));
    }
    if !package.is_empty() {
        preamble.push('\n');
        preamble.push_str(&open_namespaces(package));
    }
    Frame {
        preamble,
        postamble: close_namespaces(package),
    }
}

/// Header paths for `referenced`, minus `exclude`, sorted.
pub(crate) fn includes(referenced: &[TypeName], exclude: &[TypeName]) -> Vec<String> {
    let mut paths: Vec<String> = referenced
        .iter()
        .filter(|name| !exclude.contains(&name.outermost()))
        .map(header_path)
        .collect();
    paths.sort();
    paths.dedup();
    paths
}

fn open_namespaces(package: &[SmolStr]) -> String {
    package
        .iter()
        .map(|segment| format!("namespace {segment} {{\n"))
        .collect()
}

fn close_namespaces(package: &[SmolStr]) -> String {
    if package.is_empty() {
        return String::new();
    }
    let closing: String = package
        .iter()
        .rev()
        .map(|segment| format!("}} // namespace {segment}\n"))
        .collect();
    format!("\n{closing}")
}

/// `template <typename T, typename U>`
pub(crate) fn template_line(params: &[TypeParam]) -> String {
    let names: Vec<String> = params
        .iter()
        .map(|p| format!("typename {}", p.name.name))
        .collect();
    format!("template <{}>", names.join(", "))
}

/// Keyword before and suffix after a member function declaration.
pub(crate) fn overridability_keywords(class: Overridability) -> (&'static str, &'static str) {
    match class {
        Overridability::Static => ("static ", ""),
        Overridability::Abstract => ("virtual ", " = 0"),
        Overridability::AbstractOverriding => ("virtual ", " override = 0"),
        Overridability::Overriding => ("virtual ", " override"),
        Overridability::SealedOverriding => ("virtual ", " override final"),
        Overridability::VirtualByDefault => ("virtual ", ""),
        Overridability::NonVirtual | Overridability::Introducing => ("", ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_and_guards_use_the_outermost_type() {
        let name = TypeName::parse("org.sample.Map.Entry");
        assert_eq!(header_path(&name), "org/sample/Map.h");
        assert_eq!(include_guard(&name), "ORG_SAMPLE_MAP_H");
    }

    #[test]
    fn test_includes_are_sorted_and_exclude_own_types() {
        let own = TypeName::parse("a.Foo");
        let referenced = vec![
            TypeName::parse("b.Zed"),
            TypeName::parse("a.Foo"),
            TypeName::parse("a.Bar"),
        ];
        assert_eq!(includes(&referenced, &[own]), vec!["a/Bar.h", "b/Zed.h"]);
    }

    #[test]
    fn test_header_frame_nests_namespaces() {
        let package = vec![SmolStr::new("a"), SmolStr::new("b")];
        let frame = header_frame("A_B_FOO_H", Some("xuniv/xuniv.h"), &package, &["a/b/Bar.h".to_string()]);
        assert_eq!(
            frame.preamble,
            "#ifndef A_B_FOO_H\n#define A_B_FOO_H\n\n#include \"xuniv/xuniv.h\"\n#include \"a/b/Bar.h\"\n\nnamespace a {\nnamespace b {\n\n"
        );
        assert_eq!(
            frame.postamble,
            "\n} // namespace b\n} // namespace a\n\n#endif // A_B_FOO_H\n"
        );
    }
}
