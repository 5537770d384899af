use crate::lsp::util::span_to_range;
use crate::lsp::Backend;
use crate::model::symbol::SymbolKind as CoreSymbolKind;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;

fn lsp_symbol_kind(kind: CoreSymbolKind) -> SymbolKind {
    match kind {
        CoreSymbolKind::Class => SymbolKind::CLASS,
        CoreSymbolKind::Interface => SymbolKind::INTERFACE,
        CoreSymbolKind::Function => SymbolKind::FUNCTION,
        CoreSymbolKind::Method => SymbolKind::METHOD,
        CoreSymbolKind::Property => SymbolKind::PROPERTY,
        CoreSymbolKind::Constant => SymbolKind::CONSTANT,
    }
}

pub async fn document_symbol(
    backend: &Backend,
    params: DocumentSymbolParams,
) -> Result<Option<DocumentSymbolResponse>> {
    let uri = params.text_document.uri;

    let ws = backend.workspace.read().await;
    let doc = match ws.document(&uri) {
        Some(d) => d,
        None => return Ok(None),
    };

    let mut symbols: Vec<DocumentSymbol> = doc
        .definitions
        .values()
        .map(|definition| {
            let symbol = &definition.symbol;
            let range = span_to_range(&doc.text, symbol.location.span);
            #[allow(deprecated)]
            DocumentSymbol {
                name: symbol.fqn.short_name().to_string(),
                detail: symbol.declared_type.as_ref().map(|t| t.to_string()),
                kind: lsp_symbol_kind(symbol.kind),
                tags: None,
                deprecated: None,
                range,
                selection_range: range,
                children: None,
            }
        })
        .collect();
    symbols.sort_by_key(|s| (s.range.start.line, s.range.start.character));

    if symbols.is_empty() {
        return Ok(None);
    }
    Ok(Some(DocumentSymbolResponse::Nested(symbols)))
}
