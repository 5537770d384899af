mod common;

use common::{node_at, node_at_last, setup_workspace, uri};
use phpscope::model::fqn::Fqn;
use phpscope::model::types::Type;

#[test]
fn given_assignment_chain_when_typing_use_then_integer_flows_through() {
    let ws = setup_workspace(&[(
        "chain.php",
        "<?php\n$a = 5;\n$b = $a;\n$c = $b;\n$d = $c;\n",
    )]);
    let doc = ws.document(&uri("chain.php")).unwrap();

    let use_node = node_at_last(&doc, "$c", 0);
    assert_eq!(ws.type_of_expression(&doc, use_node), Type::Integer);
}

#[test]
fn given_return_hint_when_typing_method_call_then_hint_type_wins() {
    let ws = setup_workspace(&[(
        "foo.php",
        "<?php\nclass Foo {\n    public function bar(): string\n    {\n        return \"x\";\n    }\n}\n$r = (new Foo)->bar();\n",
    )]);
    let doc = ws.document(&uri("foo.php")).unwrap();

    let call = node_at(&doc, "->bar", 2);
    assert_eq!(ws.type_of_expression(&doc, call), Type::String);
}

#[test]
fn given_receiver_from_variable_when_typing_method_call_then_class_resolves() {
    let ws = setup_workspace(&[(
        "foo.php",
        "<?php\nclass Foo {\n    public function bar(): int { return 1; }\n}\n$f = new Foo();\n$r = $f->bar();\n",
    )]);
    let doc = ws.document(&uri("foo.php")).unwrap();

    let call = node_at(&doc, "->bar", 2);
    assert_eq!(ws.type_of_expression(&doc, call), Type::Integer);
}

#[test]
fn given_undefined_receiver_when_typing_method_call_then_mixed() {
    let ws = setup_workspace(&[("dyn.php", "<?php\n$y = $x->bar();\n")]);
    let doc = ws.document(&uri("dyn.php")).unwrap();

    let call = node_at(&doc, "->bar", 2);
    assert_eq!(ws.type_of_expression(&doc, call), Type::Mixed);
}

#[test]
fn given_ternary_with_two_arms_when_typing_then_union_of_arms() {
    let ws = setup_workspace(&[(
        "tern.php",
        "<?php\nfunction cond(): bool { return true; }\n$x = cond() ? 1 : \"a\";\n$y = $x;\n",
    )]);
    let doc = ws.document(&uri("tern.php")).unwrap();

    let use_node = node_at_last(&doc, "$x", 0);
    assert_eq!(
        ws.type_of_expression(&doc, use_node),
        Type::compound([Type::Integer, Type::String])
    );
}

#[test]
fn given_short_ternary_when_typing_then_condition_joins_the_union() {
    let ws = setup_workspace(&[(
        "elvis.php",
        "<?php\nfunction cond(): bool { return true; }\n$x = cond() ?: \"a\";\n$y = $x;\n",
    )]);
    let doc = ws.document(&uri("elvis.php")).unwrap();

    let use_node = node_at_last(&doc, "$x", 0);
    assert_eq!(
        ws.type_of_expression(&doc, use_node),
        Type::compound([Type::Boolean, Type::String])
    );
}

#[test]
fn given_null_coalesce_when_typing_then_both_sides_union() {
    let ws = setup_workspace(&[(
        "coalesce.php",
        "<?php\n$m = \"s\";\n$z = $m ?? 0;\n$w = $z;\n",
    )]);
    let doc = ws.document(&uri("coalesce.php")).unwrap();

    let use_node = node_at_last(&doc, "$z", 0);
    assert_eq!(
        ws.type_of_expression(&doc, use_node),
        Type::compound([Type::String, Type::Integer])
    );
}

#[test]
fn given_array_literal_when_typing_then_value_and_key_types_are_independent() {
    let ws = setup_workspace(&[(
        "arr.php",
        "<?php\n$arr = [1, \"two\" => \"b\"];\n$use = $arr;\n",
    )]);
    let doc = ws.document(&uri("arr.php")).unwrap();

    let use_node = node_at_last(&doc, "$arr", 0);
    assert_eq!(
        ws.type_of_expression(&doc, use_node),
        Type::array(
            Type::compound([Type::Integer, Type::String]),
            Type::compound([Type::Integer, Type::String]),
        )
    );
}

#[test]
fn given_array_index_when_typing_then_value_type_comes_back() {
    let ws = setup_workspace(&[(
        "idx.php",
        "<?php\n$items = [1, 2];\n$first = $items[0];\n$next = $first;\n",
    )]);
    let doc = ws.document(&uri("idx.php")).unwrap();

    let use_node = node_at_last(&doc, "$first", 0);
    assert_eq!(ws.type_of_expression(&doc, use_node), Type::Integer);
}

#[test]
fn given_arithmetic_on_mixed_operands_when_typing_then_integer() {
    let ws = setup_workspace(&[("arith.php", "<?php\n$n = 1 + 2.5;\n")]);
    let doc = ws.document(&uri("arith.php")).unwrap();

    let add = node_at(&doc, "+ 2.5", 0);
    assert_eq!(ws.type_of_expression(&doc, add), Type::Integer);
}

#[test]
fn given_concat_and_comparison_when_typing_then_string_and_bool() {
    let ws = setup_workspace(&[(
        "ops.php",
        "<?php\n$s = \"a\" . \"b\";\n$t = 1 < 2;\n",
    )]);
    let doc = ws.document(&uri("ops.php")).unwrap();

    let concat = node_at(&doc, " . ", 1);
    assert_eq!(ws.type_of_expression(&doc, concat), Type::String);
    let cmp = node_at(&doc, "< 2", 0);
    assert_eq!(ws.type_of_expression(&doc, cmp), Type::Boolean);
}

#[test]
fn given_docblock_return_when_typing_function_call_then_tag_type_wins() {
    let ws = setup_workspace(&[(
        "doc.php",
        "<?php\n/** @return string */\nfunction title() { return \"t\"; }\n$t = title();\n$u = $t;\n",
    )]);
    let doc = ws.document(&uri("doc.php")).unwrap();

    let use_node = node_at_last(&doc, "$t", 0);
    assert_eq!(ws.type_of_expression(&doc, use_node), Type::String);
}

#[test]
fn given_parameter_hint_when_typing_use_then_hint_type_wins() {
    let ws = setup_workspace(&[(
        "param.php",
        "<?php\nfunction f(int $n) { $m = $n; $o = $m; }\n",
    )]);
    let doc = ws.document(&uri("param.php")).unwrap();

    let use_node = node_at_last(&doc, "$m", 0);
    assert_eq!(ws.type_of_expression(&doc, use_node), Type::Integer);
}

#[test]
fn given_docblock_param_when_typing_use_then_tag_type_wins() {
    let ws = setup_workspace(&[(
        "docparam.php",
        "<?php\n/** @param string $s */\nfunction g($s) { $r = $s; $q = $r; }\n",
    )]);
    let doc = ws.document(&uri("docparam.php")).unwrap();

    let use_node = node_at_last(&doc, "$r", 0);
    assert_eq!(ws.type_of_expression(&doc, use_node), Type::String);
}

#[test]
fn given_closure_capture_when_typing_then_outer_binding_type_flows_in() {
    let ws = setup_workspace(&[(
        "capture.php",
        "<?php\n$count = 5;\n$fn = function () use ($count) { $inner = $count; $out = $inner; };\n",
    )]);
    let doc = ws.document(&uri("capture.php")).unwrap();

    let use_node = node_at_last(&doc, "$inner", 0);
    assert_eq!(ws.type_of_expression(&doc, use_node), Type::Integer);
}

#[test]
fn given_outer_variable_without_capture_when_typing_then_mixed() {
    let ws = setup_workspace(&[(
        "boundary.php",
        "<?php\n$outside = 1;\nfunction h() { $v = $outside; $w = $v; }\n",
    )]);
    let doc = ws.document(&uri("boundary.php")).unwrap();

    let use_node = node_at_last(&doc, "$v", 0);
    assert_eq!(ws.type_of_expression(&doc, use_node), Type::Mixed);
}

#[test]
fn given_self_assignment_when_typing_then_mixed_not_a_hang() {
    let ws = setup_workspace(&[("cycle.php", "<?php\n$a = $a;\n")]);
    let doc = ws.document(&uri("cycle.php")).unwrap();

    let use_node = node_at_last(&doc, "$a", 0);
    assert_eq!(ws.type_of_expression(&doc, use_node), Type::Mixed);
}

#[test]
fn given_class_constant_literal_when_typing_fetch_then_literal_type() {
    let ws = setup_workspace(&[(
        "conf.php",
        "<?php\nclass Conf {\n    public const LIMIT = 10;\n}\n$l = Conf::LIMIT;\n$m = $l;\n",
    )]);
    let doc = ws.document(&uri("conf.php")).unwrap();

    let use_node = node_at_last(&doc, "$l", 0);
    assert_eq!(ws.type_of_expression(&doc, use_node), Type::Integer);
}

#[test]
fn given_new_anonymous_class_when_typing_then_object_without_fqn() {
    let ws = setup_workspace(&[(
        "anon.php",
        "<?php\n$obj = new class { public function run(): int { return 1; } };\n$use = $obj;\n",
    )]);
    let doc = ws.document(&uri("anon.php")).unwrap();

    let use_node = node_at_last(&doc, "$obj", 0);
    assert_eq!(ws.type_of_expression(&doc, use_node), Type::Object(None));
}

#[test]
fn given_new_with_static_name_when_typing_then_object_of_that_class() {
    let ws = setup_workspace(&[(
        "obj.php",
        "<?php\nnamespace App;\nclass Widget {}\n$w = new Widget();\n$use = $w;\n",
    )]);
    let doc = ws.document(&uri("obj.php")).unwrap();

    let use_node = node_at_last(&doc, "$w", 0);
    assert_eq!(
        ws.type_of_expression(&doc, use_node),
        Type::object(Fqn::from_qualified("App\\Widget"))
    );
}

#[test]
fn given_instanceof_and_cast_when_typing_then_bool_and_target_type() {
    let ws = setup_workspace(&[(
        "misc.php",
        "<?php\nclass Foo {}\n$obj = new Foo();\n$ok = $obj instanceof Foo;\n$s = (string) 5;\n$use = $ok;\n",
    )]);
    let doc = ws.document(&uri("misc.php")).unwrap();

    let ok_use = node_at_last(&doc, "$ok", 0);
    assert_eq!(ws.type_of_expression(&doc, ok_use), Type::Boolean);
    let cast = node_at(&doc, "(string) 5", 0);
    assert_eq!(ws.type_of_expression(&doc, cast), Type::String);
}

#[test]
fn given_clone_when_typing_then_operand_type_passes_through() {
    let ws = setup_workspace(&[(
        "clone.php",
        "<?php\nclass Foo {}\n$a = new Foo();\n$b = clone $a;\n$use = $b;\n",
    )]);
    let doc = ws.document(&uri("clone.php")).unwrap();

    let use_node = node_at_last(&doc, "$b", 0);
    assert_eq!(
        ws.type_of_expression(&doc, use_node),
        Type::object(Fqn::from_qualified("Foo"))
    );
}

#[test]
fn given_include_expression_when_typing_then_mixed() {
    let ws = setup_workspace(&[(
        "inc.php",
        "<?php\n$config = include \"config.php\";\n$use = $config;\n",
    )]);
    let doc = ws.document(&uri("inc.php")).unwrap();

    let use_node = node_at_last(&doc, "$config", 0);
    assert_eq!(ws.type_of_expression(&doc, use_node), Type::Mixed);
}
