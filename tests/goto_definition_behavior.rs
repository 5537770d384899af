mod common;

use common::{node_at, node_at_last, setup_workspace, uri};
use phpscope::error::PhpscopeError;
use phpscope::scope::{self, VariableDefinition};

#[test]
fn given_unqualified_function_call_when_lookup_misses_then_global_namespace_wins() {
    let ws = setup_workspace(&[
        (
            "global.php",
            "<?php\nfunction strlen_compat($s): int { return 1; }\n",
        ),
        (
            "app.php",
            "<?php\nnamespace App;\n$n = strlen_compat(\"x\");\n",
        ),
    ]);
    let doc = ws.document(&uri("app.php")).unwrap();

    let callee = node_at(&doc, "strlen_compat(\"x\")", 0);
    let definition = ws
        .definition_for_node(&doc, callee)
        .expect("not a variable")
        .expect("fallback finds the global function");
    assert_eq!(definition.fqn().as_str(), "\\strlen_compat");
    assert_eq!(definition.uri(), &uri("global.php"));
}

#[test]
fn given_namespaced_static_call_when_lookup_misses_then_no_global_fallback() {
    let ws = setup_workspace(&[
        (
            "thing.php",
            "<?php\nclass Thing { public static function method(): void {} }\n",
        ),
        ("app.php", "<?php\nnamespace App;\nThing::method();\n"),
    ]);
    let doc = ws.document(&uri("app.php")).unwrap();

    // `Thing` resolves to \App\Thing inside the namespace; member lookups
    // never strip namespaces.
    let call = node_at(&doc, "Thing::method()", 7);
    let definition = ws.definition_for_node(&doc, call).expect("not a variable");
    assert!(definition.is_none());
}

#[test]
fn given_same_namespace_files_when_resolving_new_then_definition_found() {
    let ws = setup_workspace(&[
        ("a.php", "<?php\nnamespace App;\nclass Thing {}\n"),
        ("b.php", "<?php\nnamespace App;\n$t = new Thing();\n"),
    ]);
    let doc = ws.document(&uri("b.php")).unwrap();

    let name = node_at(&doc, "Thing()", 0);
    let definition = ws
        .definition_for_node(&doc, name)
        .expect("not a variable")
        .expect("class resolves inside the namespace");
    assert_eq!(definition.fqn().as_str(), "\\App\\Thing");
    assert_eq!(definition.uri(), &uri("a.php"));
}

#[test]
fn given_use_import_when_resolving_new_then_imported_class_wins() {
    let ws = setup_workspace(&[
        ("a.php", "<?php\nnamespace App;\nclass Thing {}\n"),
        (
            "b.php",
            "<?php\nuse App\\Thing;\n$t = new Thing();\n",
        ),
    ]);
    let doc = ws.document(&uri("b.php")).unwrap();

    let name = node_at(&doc, "Thing()", 0);
    let definition = ws
        .definition_for_node(&doc, name)
        .expect("not a variable")
        .expect("use import resolves");
    assert_eq!(definition.fqn().as_str(), "\\App\\Thing");
}

#[test]
fn given_variable_node_when_asking_the_facade_then_contract_violation() {
    let ws = setup_workspace(&[("v.php", "<?php\n$v = 1;\n$w = $v;\n")]);
    let doc = ws.document(&uri("v.php")).unwrap();

    let use_node = node_at_last(&doc, "$v", 0);
    let err = ws.definition_for_node(&doc, use_node).unwrap_err();
    assert!(matches!(err, PhpscopeError::Contract(_)));
}

#[test]
fn given_inferred_receiver_when_resolving_method_then_cross_file_definition() {
    let ws = setup_workspace(&[
        (
            "repo.php",
            "<?php\nnamespace App;\nclass Repo {\n    public function find(): string { return \"\"; }\n}\n",
        ),
        (
            "caller.php",
            "<?php\nnamespace App;\n$r = new Repo();\n$x = $r->find();\n",
        ),
    ]);
    let doc = ws.document(&uri("caller.php")).unwrap();

    let call = node_at(&doc, "->find", 2);
    let definition = ws
        .definition_for_node(&doc, call)
        .expect("not a variable")
        .expect("receiver type leads to the method");
    assert_eq!(definition.fqn().as_str(), "\\App\\Repo::find()");
    assert_eq!(definition.uri(), &uri("repo.php"));
}

#[test]
fn given_variable_use_when_resolving_through_scope_then_nearest_assignment() {
    let ws = setup_workspace(&[(
        "scope.php",
        "<?php\n$a = 1;\n$a = \"two\";\n$b = $a;\n",
    )]);
    let doc = ws.document(&uri("scope.php")).unwrap();

    let use_node = node_at_last(&doc, "$a", 0);
    let definition = scope::find_definition(&doc.ast, use_node).expect("assignment found");
    let VariableDefinition::Assignment(assign) = definition else {
        panic!("expected an assignment definition");
    };
    let span = doc.ast.span(assign);
    let expected = doc.text.find("$a = \"two\"").unwrap();
    assert_eq!(span.start, expected);
}

#[test]
fn given_self_call_inside_class_when_resolving_then_enclosing_class_member() {
    let ws = setup_workspace(&[(
        "selfref.php",
        "<?php\nnamespace App;\nclass Builder {\n    public static function make(): int { return 1; }\n    public function build() {\n        return self::make();\n    }\n}\n",
    )]);
    let doc = ws.document(&uri("selfref.php")).unwrap();

    let call = node_at(&doc, "self::make", 6);
    let definition = ws
        .definition_for_node(&doc, call)
        .expect("not a variable")
        .expect("self resolves to the enclosing class");
    assert_eq!(definition.fqn().as_str(), "\\App\\Builder::make()");
}
