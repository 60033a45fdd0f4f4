//! End-to-end translation of small units to C#.

use pretty_assertions::assert_eq;
use xlate_ast::fixture::Fixture;
use xlate_ast::{AssignOp, Bindings, MethodInfo, NameBinding, PrimitiveKind, TypeInfo, TypeName};
use xlate_config::BackendPolicy;
use xlate_engine::{translate, ArtifactKind, TranslateError};

const COUNTER: &str = "package demo;

public class Counter extends Base {
    private int count = 0;

    /** Bumps the count. */
    public void bump(int by) {
        count += by;
    }
}
";

#[test]
fn test_class_translates_in_source_order() {
    let fx = Fixture::new(COUNTER);
    let mut bindings = Bindings::new();
    let base = bindings.add_type(TypeInfo::class(TypeName::parse("demo.Base")));
    let counter = bindings.add_type(TypeInfo {
        superclass: Some(base),
        ..TypeInfo::class(TypeName::parse("demo.Counter"))
    });
    let bump = bindings.add_method(MethodInfo::new("bump", counter, &["int"]));

    let package = fx.package(&["demo"]);
    let decl = fx.type_decl(
        fx.mods(&["public"]),
        fx.tok("class"),
        fx.ident("Counter"),
        vec![],
        Some(fx.named("Base", Some(base))),
        vec![],
        vec![
            fx.field(
                fx.mods(&["private"]),
                fx.prim("int"),
                vec![fx.frag(fx.ident("count"), Some(fx.int("0")))],
            ),
            fx.method(
                fx.mods(&["public"]),
                vec![],
                Some(fx.prim("void")),
                fx.ident("bump"),
                vec![fx.param(fx.mods(&[]), fx.prim("int"), fx.ident("by"))],
                vec![],
                Some(fx.block(
                    fx.tok("{"),
                    vec![fx.expr_stmt(fx.assign(
                        fx.name("count", NameBinding::Field { is_static: false }),
                        AssignOp::Plus,
                        fx.local("by", PrimitiveKind::Int),
                    ))],
                )),
                Some(bump),
            ),
        ],
        counter,
    );
    let unit = fx.unit(Some(package), vec![decl], bindings);

    let translated = translate(&unit, &BackendPolicy::csharp()).unwrap();
    assert_eq!(translated.artifacts.len(), 1);
    let artifact = translated.artifact(ArtifactKind::Single).unwrap();
    assert_eq!(artifact.path, "demo/Counter.cs");
    assert_eq!(
        artifact.text,
        "namespace demo {
public class Counter : Base {
    private int count = 0;

    /** Bumps the count. */
    public virtual void bump(int by) {
        count += by;
    }
}
}
"
    );
    assert!(artifact.coverage.is_exact(unit.span()));
    assert_eq!(translated.referenced_types, vec![TypeName::parse("demo.Base")]);
}

const HOST: &str = "package demo;

public class Host {
    public Runnable task() {
        return new Runnable() {
            public void run() {
                tick();
            }
        };
    }
}
";

fn host_unit(functional: bool) -> xlate_ast::SourceUnit {
    let fx = Fixture::new(HOST);
    let mut bindings = Bindings::new();
    let runnable = bindings.add_type(TypeInfo {
        is_functional_interface: functional,
        ..TypeInfo::interface(TypeName::parse("demo.Runnable"))
    });
    let host = bindings.add_type(TypeInfo::class(TypeName::parse("demo.Host")));

    let package = fx.package(&["demo"]);
    let decl = fx.type_decl(
        fx.mods(&["public"]),
        fx.tok("class"),
        fx.ident("Host"),
        vec![],
        None,
        vec![],
        vec![fx.method(
            fx.mods(&["public"]),
            vec![],
            Some(fx.named("Runnable", Some(runnable))),
            fx.ident("task"),
            vec![],
            vec![],
            Some(fx.block(
                fx.tok("{"),
                vec![fx.ret(
                    fx.tok("return"),
                    Some(fx.new_object(
                        fx.tok("new"),
                        fx.named("Runnable", Some(runnable)),
                        vec![],
                        fx.tok(")"),
                        Some(fx.anonymous(
                            fx.tok("{"),
                            vec![fx.method(
                                fx.mods(&["public"]),
                                vec![],
                                Some(fx.prim("void")),
                                fx.ident("run"),
                                vec![],
                                vec![],
                                Some(fx.block(
                                    fx.tok("{"),
                                    vec![fx.expr_stmt(fx.call(None, fx.ident("tick"), vec![], None))],
                                )),
                                None,
                            )],
                        )),
                    )),
                )],
            )),
            None,
        )],
        host,
    );
    fx.unit(Some(package), vec![decl], bindings)
}

#[test]
fn test_functional_anonymous_class_becomes_lambda() {
    let unit = host_unit(true);
    let translated = translate(&unit, &BackendPolicy::csharp()).unwrap();
    let text = &translated.artifacts[0].text;

    assert!(text.contains("public Runnable task() {"), "{text}");
    assert!(text.contains("return () => {\n                tick();\n            };"), "{text}");
    assert!(!text.contains("new Runnable"));
    assert!(!text.contains("void run"));
    assert!(translated.artifacts[0].coverage.is_exact(unit.span()));
}

#[test]
fn test_non_functional_anonymous_class_aborts_the_unit() {
    let unit = host_unit(false);
    let err = translate(&unit, &BackendPolicy::csharp()).unwrap_err();
    assert!(matches!(err, TranslateError::Unsupported { .. }));
    assert!(!err.is_fatal());
    let span = err.span().unwrap();
    assert!(unit.text[span.range()].starts_with("{\n            public void run()"));
}

#[test]
fn test_interface_field_is_unsupported() {
    let text = "interface Limits {\n    int MAX = 10;\n}\n";
    let fx = Fixture::new(text);
    let mut bindings = Bindings::new();
    let limits = bindings.add_type(TypeInfo::interface(TypeName::parse("Limits")));
    let decl = fx.type_decl(
        fx.mods(&[]),
        fx.tok("interface"),
        fx.ident("Limits"),
        vec![],
        None,
        vec![],
        vec![fx.field(
            fx.mods(&[]),
            fx.prim("int"),
            vec![fx.frag(fx.ident("MAX"), Some(fx.int("10")))],
        )],
        limits,
    );
    let unit = fx.unit(None, vec![decl], bindings);

    let err = translate(&unit, &BackendPolicy::csharp()).unwrap_err();
    assert!(matches!(err, TranslateError::Unsupported { .. }));
    assert_eq!(err.span().map(|s| &text[s.range()]), Some("int MAX = 10;"));
}

const OVERRIDE: &str = "package demo;

public class Derived extends Base {
    public <T extends Shape> void f(T t) {
    }
}
";

#[test]
fn test_override_does_not_restate_constraints() {
    let fx = Fixture::new(OVERRIDE);
    let mut bindings = Bindings::new();
    let shape = bindings.add_type(TypeInfo::class(TypeName::parse("demo.Shape")));
    let base = bindings.add_type(TypeInfo::class(TypeName::parse("demo.Base")));
    let derived = bindings.add_type(TypeInfo {
        superclass: Some(base),
        ..TypeInfo::class(TypeName::parse("demo.Derived"))
    });
    bindings.add_method(MethodInfo::new("f", base, &["demo.Shape"]));
    let f = bindings.add_method(MethodInfo::new("f", derived, &["demo.Shape"]));

    let package = fx.package(&["demo"]);
    let decl = fx.type_decl(
        fx.mods(&["public"]),
        fx.tok("class"),
        fx.ident("Derived"),
        vec![],
        Some(fx.named("Base", Some(base))),
        vec![],
        vec![fx.method(
            fx.mods(&["public"]),
            vec![fx.type_param(fx.ident("T"), vec![fx.named("Shape", Some(shape))])],
            Some(fx.prim("void")),
            fx.ident("f"),
            vec![fx.param(fx.mods(&[]), fx.tvar("T"), fx.ident("t"))],
            vec![],
            Some(fx.block(fx.tok("{"), vec![])),
            Some(f),
        )],
        derived,
    );
    let unit = fx.unit(Some(package), vec![decl], bindings);

    let translated = translate(&unit, &BackendPolicy::csharp()).unwrap();
    let text = &translated.artifact(ArtifactKind::Single).unwrap().text;
    assert!(text.contains("    public override void f<T>(T t) {\n"), "{text}");
    assert!(!text.contains("where"), "{text}");
}

#[test]
fn test_empty_last_switch_section_gets_a_break() {
    let text = "class Picker {
    void pick(int k) {
        switch (k) {
            case 1:
                return;
            default:
        }
    }
}
";
    let fx = Fixture::new(text);
    let mut bindings = Bindings::new();
    let picker = bindings.add_type(TypeInfo::class(TypeName::parse("Picker")));
    let decl = fx.type_decl(
        fx.mods(&[]),
        fx.tok("class"),
        fx.ident("Picker"),
        vec![],
        None,
        vec![],
        vec![fx.method(
            fx.mods(&[]),
            vec![],
            Some(fx.prim("void")),
            fx.ident("pick"),
            vec![fx.param(fx.mods(&[]), fx.prim("int"), fx.ident("k"))],
            vec![],
            Some(fx.block(
                fx.tok("{"),
                vec![fx.switch_stmt(
                    fx.tok("switch"),
                    fx.local("k", PrimitiveKind::Int),
                    vec![
                        fx.group(
                            vec![fx.case(fx.tok("case"), Some(fx.int("1")))],
                            vec![fx.ret(fx.tok("return"), None)],
                        ),
                        fx.group(vec![fx.case(fx.tok("default"), None)], vec![]),
                    ],
                )],
            )),
            None,
        )],
        picker,
    );
    let unit = fx.unit(None, vec![decl], bindings);

    let translated = translate(&unit, &BackendPolicy::csharp()).unwrap();
    let text = &translated.artifact(ArtifactKind::Single).unwrap().text;
    assert!(
        text.contains("            case 1:\n                return;\n            default: break;\n        }"),
        "{text}"
    );
}

#[test]
fn test_root_method_rename_follows_a_deep_override_chain() {
    let text = "package demo;

class Leaf extends Level99 {
    public int hashCode() {
        return 0;
    }
}
";
    let fx = Fixture::new(text);
    let mut bindings = Bindings::new();
    let mut parent = bindings.add_type(TypeInfo::class(TypeName::parse("java.lang.Object")));
    bindings.add_method(MethodInfo::new("hashCode", parent, &[]));
    for level in 0..100 {
        parent = bindings.add_type(TypeInfo {
            superclass: Some(parent),
            ..TypeInfo::class(TypeName::parse(&format!("demo.Level{level}")))
        });
        bindings.add_method(MethodInfo::new("hashCode", parent, &[]));
    }
    let leaf = bindings.add_type(TypeInfo {
        superclass: Some(parent),
        ..TypeInfo::class(TypeName::parse("demo.Leaf"))
    });
    let hash_code = bindings.add_method(MethodInfo::new("hashCode", leaf, &[]));

    let package = fx.package(&["demo"]);
    let decl = fx.type_decl(
        fx.mods(&[]),
        fx.tok("class"),
        fx.ident("Leaf"),
        vec![],
        Some(fx.named("Level99", Some(parent))),
        vec![],
        vec![fx.method(
            fx.mods(&["public"]),
            vec![],
            Some(fx.prim("int")),
            fx.ident("hashCode"),
            vec![],
            vec![],
            Some(fx.block(fx.tok("{"), vec![fx.ret(fx.tok("return"), Some(fx.int("0")))])),
            Some(hash_code),
        )],
        leaf,
    );
    let unit = fx.unit(Some(package), vec![decl], bindings);

    let translated = translate(&unit, &BackendPolicy::csharp()).unwrap();
    let text = &translated.artifact(ArtifactKind::Single).unwrap().text;
    assert!(text.contains("    public override int GetHashCode() {\n"), "{text}");
}
