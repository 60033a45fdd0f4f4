//! End-to-end translation of small units to a C++ header and source pair.

use pretty_assertions::assert_eq;
use xlate_ast::fixture::Fixture;
use xlate_ast::{AssignOp, Bindings, InfixOp, MethodInfo, NameBinding, PrimitiveKind, SourceUnit, TypeInfo, TypeName};
use xlate_config::{BackendPolicy, DeclarationSite, ReferenceKind, TypeCategory};
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

fn counter_unit() -> SourceUnit {
    let fx = Fixture::new(COUNTER);
    let mut bindings = Bindings::new();
    let counter = bindings.add_type(TypeInfo::class(TypeName::parse("demo.Counter")));
    let next = bindings.add_method(MethodInfo::new("next", counter, &["int"]));

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
                        fx.expr_stmt(fx.assign(
                            fx.name("count", NameBinding::Field { is_static: false }),
                            AssignOp::Plus,
                            fx.local("step", PrimitiveKind::Int),
                        )),
                        fx.ret(
                            fx.tok("return"),
                            Some(fx.name("count", NameBinding::Field { is_static: false })),
                        ),
                    ],
                )),
                Some(next),
            ),
        ],
        counter,
    );
    fx.unit(Some(package), vec![decl], bindings)
}

#[test]
fn test_header_groups_members_by_bucket() {
    let unit = counter_unit();
    let translated = translate(&unit, &BackendPolicy::cpp()).unwrap();
    assert_eq!(translated.artifacts.len(), 2);

    let header = translated.artifact(ArtifactKind::Header).unwrap();
    assert_eq!(header.path, "demo/Counter.h");
    assert_eq!(
        header.text,
        "#ifndef DEMO_COUNTER_H
#define DEMO_COUNTER_H

#include \"xuniv/xuniv.h\"

namespace demo {

class Counter : public xuniv::Object {
public:
    virtual int32_t next(int32_t step);

public: // Typedefs
    typedef xuniv::Object super;

private: // Data
    int32_t count;
};

} // namespace demo

#endif // DEMO_COUNTER_H
"
    );
}

#[test]
fn test_source_defines_members_out_of_line() {
    let unit = counter_unit();
    let translated = translate(&unit, &BackendPolicy::cpp()).unwrap();

    let source = translated.artifact(ArtifactKind::Source).unwrap();
    assert_eq!(source.path, "demo/Counter.cpp");
    assert_eq!(
        source.text,
        "#include \"demo/Counter.h\"

namespace demo {

int32_t Counter::next(int32_t step) {
    count += step;
    return count;
}

} // namespace demo
"
    );
}

#[test]
fn test_final_method_in_final_class_is_not_virtual() {
    let unit = {
        let mut unit = counter_unit();
        let counter = unit.bindings.find_type("demo.Counter").unwrap();
        unit.bindings.type_info_mut(counter).unwrap().is_final = true;
        unit
    };
    let translated = translate(&unit, &BackendPolicy::cpp()).unwrap();
    let header = translated.artifact(ArtifactKind::Header).unwrap();
    assert!(header.text.contains("\n    int32_t next(int32_t step);\n"), "{}", header.text);
}

const STACK: &str = "package demo;

public class Stack {
    private Node head;

    public void push(Node node) {
        Node top = head;
        head = node;
    }
}
";

fn stack_unit() -> SourceUnit {
    let fx = Fixture::new(STACK);
    let mut bindings = Bindings::new();
    let node = bindings.add_type(TypeInfo::class(TypeName::parse("demo.Node")));
    let stack = bindings.add_type(TypeInfo::class(TypeName::parse("demo.Stack")));
    let push = bindings.add_method(MethodInfo::new("push", stack, &["demo.Node"]));
    let field = NameBinding::Field { is_static: false };

    let package = fx.package(&["demo"]);
    let decl = fx.type_decl(
        fx.mods(&["public"]),
        fx.tok("class"),
        fx.ident("Stack"),
        vec![],
        None,
        vec![],
        vec![
            fx.field(
                fx.mods(&["private"]),
                fx.named("Node", Some(node)),
                vec![fx.frag(fx.ident("head"), None)],
            ),
            fx.method(
                fx.mods(&["public"]),
                vec![],
                Some(fx.prim("void")),
                fx.ident("push"),
                vec![fx.param(fx.mods(&[]), fx.named("Node", Some(node)), fx.ident("node"))],
                vec![],
                Some(fx.block(
                    fx.tok("{"),
                    vec![
                        fx.local_stmt(fx.local_var(
                            fx.mods(&[]),
                            fx.named("Node", Some(node)),
                            vec![fx.frag(fx.ident("top"), Some(fx.name("head", field)))],
                        )),
                        fx.expr_stmt(fx.assign(fx.name("head", field), AssignOp::Assign, fx.local_ref("node"))),
                    ],
                )),
                Some(push),
            ),
        ],
        stack,
    );
    fx.unit(Some(package), vec![decl], bindings)
}

#[test]
fn test_reference_kind_follows_declaration_site() {
    let unit = stack_unit();
    let mut policy = BackendPolicy::cpp();
    policy.set_reference_kind(TypeCategory::Reference, DeclarationSite::LocalVariable, ReferenceKind::Value);
    let translated = translate(&unit, &policy).unwrap();

    let header = &translated.artifact(ArtifactKind::Header).unwrap().text;
    assert!(header.contains("#include \"demo/Node.h\"\n"), "{header}");
    assert!(header.contains("    virtual void push(std::shared_ptr<Node> node);"), "{header}");
    assert!(header.contains("    std::shared_ptr<Node> head;"), "{header}");

    let source = &translated.artifact(ArtifactKind::Source).unwrap().text;
    assert!(source.contains("void Stack::push(std::shared_ptr<Node> node) {\n"), "{source}");
    assert!(source.contains("\n    Node top = head;\n    head = node;\n}"), "{source}");
    // The header already pulls in Node.
    assert!(!source.contains("demo/Node.h"), "{source}");

    assert_eq!(translated.referenced_types, vec![TypeName::parse("demo.Node")]);
}

#[test]
fn test_private_data_comes_after_public_methods() {
    let unit = stack_unit();
    let translated = translate(&unit, &BackendPolicy::cpp()).unwrap();
    let header = &translated.artifact(ArtifactKind::Header).unwrap().text;

    let methods = header.find("public:\n").unwrap();
    let data = header.find("private: // Data").unwrap();
    assert!(methods < data);
    assert!(header.find("std::shared_ptr<Node> head;").unwrap() > data);
}

#[test]
fn test_synchronized_block_aborts_without_output() {
    let text = "class Lock {\n    void f() {\n        synchronized (this) {\n        }\n    }\n}\n";
    let fx = Fixture::new(text);
    let mut bindings = Bindings::new();
    let lock = bindings.add_type(TypeInfo::class(TypeName::parse("Lock")));
    let decl = fx.type_decl(
        fx.mods(&[]),
        fx.tok("class"),
        fx.ident("Lock"),
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
                vec![fx.synchronized(fx.tok("synchronized"), fx.this(), fx.block(fx.tok("{"), vec![]))],
            )),
            None,
        )],
        lock,
    );
    let unit = fx.unit(None, vec![decl], bindings);

    let err = translate(&unit, &BackendPolicy::cpp()).unwrap_err();
    assert!(matches!(err, TranslateError::Unsupported { .. }));
    let span = err.span().unwrap();
    assert!(text[span.range()].starts_with("synchronized (this)"));
}

const BITS: &str = "package demo;

public class Bits {
    // the held value
    private int value; // trailing note

    /** Low bits. */
    public int low(int shift) {
        return value >>> /* masked */ shift;
    }
}
";

fn bits_unit() -> SourceUnit {
    let fx = Fixture::new(BITS);
    let mut bindings = Bindings::new();
    let bits = bindings.add_type(TypeInfo::class(TypeName::parse("demo.Bits")));
    let low = bindings.add_method(MethodInfo::new("low", bits, &["int"]));
    let field = NameBinding::Field { is_static: false };

    let package = fx.package(&["demo"]);
    let decl = fx.type_decl(
        fx.mods(&["public"]),
        fx.tok("class"),
        fx.ident("Bits"),
        vec![],
        None,
        vec![],
        vec![
            fx.field(fx.mods(&["private"]), fx.prim("int"), vec![fx.frag(fx.ident("value"), None)]),
            fx.method(
                fx.mods(&["public"]),
                vec![],
                Some(fx.prim("int")),
                fx.ident("low"),
                vec![fx.param(fx.mods(&[]), fx.prim("int"), fx.ident("shift"))],
                vec![],
                Some(fx.block(
                    fx.tok("{"),
                    vec![fx.ret(
                        fx.tok("return"),
                        Some(fx.infix(
                            fx.name("value", field),
                            InfixOp::RightShiftUnsigned,
                            fx.local("shift", PrimitiveKind::Int),
                        )),
                    )],
                )),
                Some(low),
            ),
        ],
        bits,
    );
    fx.unit(Some(package), vec![decl], bindings)
}

#[test]
fn test_header_keeps_member_comments() {
    let translated = translate(&bits_unit(), &BackendPolicy::cpp()).unwrap();
    let header = &translated.artifact(ArtifactKind::Header).unwrap().text;
    assert!(
        header.contains("private: // Data\n    // the held value\n    int32_t value; // trailing note\n};"),
        "{header}"
    );
    assert!(header.contains("\n    virtual int32_t low(int32_t shift);\n"), "{header}");
    // Method docs go with the definition.
    assert!(!header.contains("Low bits"), "{header}");
}

#[test]
fn test_unsigned_shift_keeps_operand_comments() {
    let translated = translate(&bits_unit(), &BackendPolicy::cpp()).unwrap();
    let source = &translated.artifact(ArtifactKind::Source).unwrap().text;
    assert!(source.contains("/** Low bits. */\nint32_t Bits::low(int32_t shift) {\n"), "{source}");
    assert!(
        source.contains("    return xuniv::rightShiftUnsigned(value, /* masked */ shift);\n"),
        "{source}"
    );
}
