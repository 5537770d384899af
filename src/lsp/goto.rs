use crate::lsp::util::{position_to_offset, span_to_range};
use crate::lsp::Backend;
use crate::model::ast::NodeKind;
use crate::model::fqn::Fqn;
use crate::naming;
use crate::scope;
use crate::typing::TypeResolver;
use tower_lsp::jsonrpc::{Error, Result};
use tower_lsp::lsp_types::*;

pub async fn definition(
    backend: &Backend,
    params: GotoDefinitionParams,
) -> Result<Option<GotoDefinitionResponse>> {
    let uri = params.text_document_position_params.text_document.uri;
    let position = params.text_document_position_params.position;

    let ws = backend.workspace.read().await;
    let doc = match ws.document(&uri) {
        Some(d) => d,
        None => return Ok(None),
    };
    let offset = position_to_offset(&doc.text, position);
    let node = match doc.ast.node_at_offset(offset) {
        Some(n) => n,
        None => return Ok(None),
    };

    // Variables are local: resolve through the scope walk, inside this
    // document, and never against the symbol graph.
    if matches!(doc.ast.kind(node), NodeKind::Variable { .. }) {
        if let Some(def) = scope::find_definition(&doc.ast, node) {
            let span = doc.ast.span(def.node());
            return Ok(Some(GotoDefinitionResponse::Scalar(Location {
                uri,
                range: span_to_range(&doc.text, span),
            })));
        }
        return Ok(None);
    }

    let definition = ws
        .definition_for_node(&doc, node)
        .map_err(|e| Error::invalid_params(e.to_string()))?;
    let Some(definition) = definition else {
        return Ok(None);
    };

    // The graph hands back a URI and byte range; render the range against
    // the owning document's current text.
    let Some(target_doc) = ws.definition_document(definition.fqn()) else {
        return Ok(None);
    };
    Ok(Some(GotoDefinitionResponse::Scalar(Location {
        uri: definition.uri().clone(),
        range: span_to_range(&target_doc.text, definition.symbol.location.span),
    })))
}

pub async fn references(
    backend: &Backend,
    params: ReferenceParams,
) -> Result<Option<Vec<Location>>> {
    let uri = params.text_document_position.text_document.uri;
    let position = params.text_document_position.position;

    let ws = backend.workspace.read().await;
    let doc = match ws.document(&uri) {
        Some(d) => d,
        None => return Ok(None),
    };
    let offset = position_to_offset(&doc.text, position);
    let node = match doc.ast.node_at_offset(offset) {
        Some(n) => n,
        None => return Ok(None),
    };

    // On a declaration the FQN comes from the definition itself; elsewhere
    // from the reference resolution.
    let fqn: Option<Fqn> = naming::definition_fqn(&doc.ast, node).or_else(|| {
        let mut types = TypeResolver::new(ws.graph());
        naming::reference_fqn(&doc, node, &mut types)
    });
    let Some(fqn) = fqn else {
        return Ok(None);
    };

    let mut locations = Vec::new();
    if params.context.include_declaration {
        if let Some(definition) = ws.graph().definition(&fqn) {
            if let Some(target_doc) = ws.document(definition.uri()) {
                locations.push(Location {
                    uri: definition.uri().clone(),
                    range: span_to_range(&target_doc.text, definition.symbol.location.span),
                });
            }
        }
    }
    for referrer in ws.references_to(&fqn) {
        for span in referrer.reference_spans.get(&fqn).into_iter().flatten() {
            let location = Location {
                uri: referrer.uri.clone(),
                range: span_to_range(&referrer.text, *span),
            };
            if !locations.contains(&location) {
                locations.push(location);
            }
        }
    }

    if locations.is_empty() {
        return Ok(None);
    }
    Ok(Some(locations))
}
