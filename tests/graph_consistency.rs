mod common;

use common::{node_at, setup_workspace, uri, NullProvider};
use phpscope::document::Document;
use phpscope::model::fqn::Fqn;
use phpscope::parser::PhpParser;
use phpscope::workspace::Workspace;
use std::sync::Arc;

#[test]
fn given_open_documents_when_inspecting_graph_then_every_local_definition_is_owned() {
    let ws = setup_workspace(&[
        (
            "a.php",
            "<?php\nnamespace App;\nclass A { public function go(): void {} }\n",
        ),
        ("b.php", "<?php\nfunction helper(): int { return 1; }\n"),
    ]);

    for doc in ws.open_documents() {
        for fqn in doc.definitions.keys() {
            assert_eq!(
                ws.graph().owner_of(fqn),
                Some(&doc.uri),
                "definition {} should be owned by {}",
                fqn,
                doc.uri
            );
        }
    }
}

#[test]
fn given_close_when_querying_call_site_then_definition_is_gone() {
    let mut ws = setup_workspace(&[
        ("a.php", "<?php\n$x = B::m();\n"),
        (
            "b.php",
            "<?php\nclass B { public static function m(): int { return 1; } }\n",
        ),
    ]);

    let doc_a = ws.document(&uri("a.php")).unwrap();
    let call = node_at(&doc_a, "B::m()", 3);
    assert!(ws
        .definition_for_node(&doc_a, call)
        .unwrap()
        .is_some());

    ws.close_document(&uri("b.php"));

    assert!(ws
        .definition_for_node(&doc_a, call)
        .unwrap()
        .is_none());
    let method = Fqn::method(&Fqn::from_qualified("B"), "m");
    assert!(!ws.graph().is_defined(&method));
    assert!(!ws.graph().is_defined(&Fqn::from_qualified("B")));
}

#[test]
fn given_closed_document_when_scanning_referrers_then_its_uri_is_gone() {
    let mut ws = setup_workspace(&[
        ("def.php", "<?php\nfunction target(): void {}\n"),
        ("ref.php", "<?php\ntarget();\n"),
    ]);

    let fqn = Fqn::from_qualified("target");
    assert!(ws.graph().referrers(&fqn).any(|u| u == &uri("ref.php")));

    ws.close_document(&uri("ref.php"));
    assert!(ws.graph().referrers(&fqn).count() == 0);
}

#[test]
fn given_content_update_when_symbols_change_then_stale_entries_retire() {
    let mut ws = setup_workspace(&[(
        "a.php",
        "<?php\nfunction old_name(): void {}\n",
    )]);
    assert!(ws.graph().is_defined(&Fqn::from_qualified("old_name")));

    ws.update_document(
        &uri("a.php"),
        "<?php\nfunction new_name(): void {}\n".to_string(),
    )
    .unwrap();

    assert!(!ws.graph().is_defined(&Fqn::from_qualified("old_name")));
    assert!(ws.graph().is_defined(&Fqn::from_qualified("new_name")));
}

#[test]
fn given_same_text_when_reparsing_then_local_maps_are_identical() {
    let parser = PhpParser::new();
    let text = "<?php\nnamespace App;\nclass C {\n    public const K = 1;\n    public function m(): string { return \"\"; }\n}\nfunction f(): int { return C::K; }\n";
    let first = Document::parse(uri("c.php"), text.to_string(), &parser).unwrap();
    let second = Document::parse(uri("c.php"), text.to_string(), &parser).unwrap();

    let mut first_defs: Vec<&Fqn> = first.definitions.keys().collect();
    let mut second_defs: Vec<&Fqn> = second.definitions.keys().collect();
    first_defs.sort();
    second_defs.sort();
    assert_eq!(first_defs, second_defs);
    assert_eq!(first.references, second.references);
}

#[test]
fn given_referencing_document_when_updated_away_then_referrer_set_shrinks() {
    let mut ws = setup_workspace(&[
        ("def.php", "<?php\nfunction target(): void {}\n"),
        ("ref.php", "<?php\ntarget();\n"),
    ]);
    let fqn = Fqn::from_qualified("target");
    assert_eq!(ws.graph().referrers(&fqn).count(), 1);

    ws.update_document(&uri("ref.php"), "<?php\n$x = 1;\n".to_string())
        .unwrap();
    assert_eq!(ws.graph().referrers(&fqn).count(), 0);
}

#[test]
fn given_unavailable_uri_when_fetching_document_then_none_without_error() {
    let ws = Workspace::new(Arc::new(NullProvider));
    assert!(ws.document(&uri("missing.php")).is_none());
}

#[test]
fn given_tolerated_syntax_error_when_opening_then_diagnostics_but_index_survives() {
    let ws = setup_workspace(&[(
        "broken.php",
        "<?php\nfunction ok(): int { return 1; }\nfunction broken( { }\n",
    )]);
    let doc = ws.document(&uri("broken.php")).unwrap();

    assert!(!doc.diagnostics.is_empty(), "parse problems are reported");
    assert!(
        ws.graph().is_defined(&Fqn::from_qualified("ok")),
        "healthy definitions still index"
    );
}
