use crate::lsp::util::position_to_offset;
use crate::lsp::Backend;
use crate::model::ast::NodeKind;
use crate::model::types::Type;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;

pub async fn hover(backend: &Backend, params: HoverParams) -> Result<Option<Hover>> {
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

    if let NodeKind::Variable { name } = doc.ast.kind(node) {
        let ty = ws.type_of_expression(&doc, node);
        return Ok(Some(Hover {
            contents: HoverContents::Scalar(MarkedString::String(format!(
                "**${}**\n\nType: `{}`",
                name, ty
            ))),
            range: None,
        }));
    }

    if let Ok(Some(definition)) = ws.definition_for_node(&doc, node) {
        let symbol = &definition.symbol;
        let mut text = format!(
            "**{}** ({})\n\nFQN: `{}`",
            symbol.fqn.short_name(),
            symbol.kind.describe(),
            symbol.fqn
        );
        if let Some(declared) = &symbol.declared_type {
            text.push_str(&format!("\n\nType: `{}`", declared));
        }
        return Ok(Some(Hover {
            contents: HoverContents::Scalar(MarkedString::String(text)),
            range: None,
        }));
    }

    // No definition: an inferred expression type is still worth showing.
    let ty = ws.type_of_expression(&doc, node);
    if ty != Type::Mixed {
        return Ok(Some(Hover {
            contents: HoverContents::Scalar(MarkedString::String(format!("Type: `{}`", ty))),
            range: None,
        }));
    }

    Ok(None)
}
