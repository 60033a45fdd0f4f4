//! End-to-end translation of small units to Swift.

use pretty_assertions::assert_eq;
use xlate_ast::fixture::Fixture;
use xlate_ast::{AssignOp, Bindings, MethodInfo, NameBinding, PrimitiveKind, TypeInfo, TypeName};
use xlate_config::BackendPolicy;
use xlate_engine::{translate, ArtifactKind, TranslateError};

const COUNTER: &str = "package demo;

public class Counter {
    private int count;

    public int next(int step) {
        count += step;
        return count;
    }
}
";

#[test]
fn test_declarations_are_rewritten_name_first() {
    let fx = Fixture::new(COUNTER);
    let mut bindings = Bindings::new();
    let counter = bindings.add_type(TypeInfo::class(TypeName::parse("demo.Counter")));
    let next = bindings.add_method(MethodInfo::new("next", counter, &["int"]));
    let field = NameBinding::Field { is_static: false };

    let package = fx.package(&["demo"]);
    let decl = fx.type_decl(
        fx.mods(&["public"]),
        fx.tok("class"),
        fx.ident("Counter"),
        vec![],
        None,
        vec![],
        vec![
            fx.field(fx.mods(&["private"]), fx.prim("int"), vec![fx.frag(fx.ident("count"), None)]),
            fx.method(
                fx.mods(&["public"]),
                vec![],
                Some(fx.prim("int")),
                fx.ident("next"),
                vec![fx.param(fx.mods(&[]), fx.prim("int"), fx.ident("step"))],
                vec![],
                Some(fx.block(
                    fx.tok("{"),
                    vec![
                        fx.expr_stmt(fx.assign(fx.name("count", field), AssignOp::Plus, fx.local("step", PrimitiveKind::Int))),
                        fx.ret(fx.tok("return"), Some(fx.name("count", field))),
                    ],
                )),
                Some(next),
            ),
        ],
        counter,
    );
    let unit = fx.unit(Some(package), vec![decl], bindings);

    let translated = translate(&unit, &BackendPolicy::swift()).unwrap();
    let artifact = translated.artifact(ArtifactKind::Single).unwrap();
    assert_eq!(artifact.path, "demo/Counter.swift");
    assert_eq!(
        artifact.text,
        "import Foundation

public class Counter {
    private var count: Int32 = 0

    public func next(_ step: Int32) -> Int32 {
        count += step
        return count
    }
}
"
    );
    assert!(artifact.coverage.is_exact(unit.span()));
}

const NODE: &str = "class Node {
    final int value;
    Node next;

    Node(int value) {
        super();
        this.value = value;
    }
}
";

#[test]
fn test_constructor_becomes_init() {
    let fx = Fixture::new(NODE);
    let mut bindings = Bindings::new();
    let node = bindings.add_type(TypeInfo::class(TypeName::parse("Node")));

    let decl = fx.type_decl(
        fx.mods(&[]),
        fx.tok("class"),
        fx.ident("Node"),
        vec![],
        None,
        vec![],
        vec![
            fx.field(fx.mods(&["final"]), fx.prim("int"), vec![fx.frag(fx.ident("value"), None)]),
            fx.field(fx.mods(&[]), fx.named("Node", Some(node)), vec![fx.frag(fx.ident("next"), None)]),
            fx.method(
                fx.mods(&[]),
                vec![],
                None,
                fx.ident("Node"),
                vec![fx.param(fx.mods(&[]), fx.prim("int"), fx.ident("value"))],
                vec![],
                Some(fx.block(
                    fx.tok("{"),
                    vec![
                        fx.super_ctor(fx.tok("super"), vec![]),
                        fx.expr_stmt(fx.assign(
                            fx.field_access(fx.this(), "value"),
                            AssignOp::Assign,
                            fx.local("value", PrimitiveKind::Int),
                        )),
                    ],
                )),
                None,
            ),
        ],
        node,
    );
    let unit = fx.unit(None, vec![decl], bindings);

    let translated = translate(&unit, &BackendPolicy::swift()).unwrap();
    let text = &translated.artifacts[0].text;
    assert!(text.starts_with("import Foundation\n\nclass Node {\n"), "{text}");
    assert!(text.contains("\n    let value: Int32\n"), "{text}");
    assert!(text.contains("\n    var next: Node!\n"), "{text}");
    assert!(text.contains("\n    init(_ value: Int32) {\n"), "{text}");
    assert!(text.contains("\n        super.init()\n        self.value = value\n    }\n"), "{text}");
    assert!(translated.artifacts[0].coverage.is_exact(unit.span()));
}

#[test]
fn test_c_style_for_is_unsupported() {
    let text = "class Loop {\n    void f() {\n        for (;;) {\n        }\n    }\n}\n";
    let fx = Fixture::new(text);
    let mut bindings = Bindings::new();
    let id = bindings.add_type(TypeInfo::class(TypeName::parse("Loop")));
    let decl = fx.type_decl(
        fx.mods(&[]),
        fx.tok("class"),
        fx.ident("Loop"),
        vec![],
        None,
        vec![],
        vec![fx.method(
            fx.mods(&[]),
            vec![],
            Some(fx.prim("void")),
            fx.ident("f"),
            vec![],
            vec![],
            Some(fx.block(
                fx.tok("{"),
                vec![fx.for_stmt(
                    fx.tok("for"),
                    None,
                    None,
                    vec![],
                    fx.block_stmt(fx.block(fx.tok("{"), vec![])),
                )],
            )),
            None,
        )],
        id,
    );
    let unit = fx.unit(None, vec![decl], bindings);

    let err = translate(&unit, &BackendPolicy::swift()).unwrap_err();
    assert!(matches!(err, TranslateError::Unsupported { .. }));
    assert!(text[err.span().unwrap().range()].starts_with("for (;;)"));
}
