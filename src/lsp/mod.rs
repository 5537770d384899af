pub mod capabilities;
pub mod goto;
pub mod hover;
pub mod indexer;
pub mod symbols;
pub mod util;

use crate::document::Document;
use crate::parser::PhpParser;
use crate::workspace::{FsContentProvider, Workspace};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

pub struct Backend {
    client: Client,
    /// Parsing runs against this handle without taking the workspace lock;
    /// only the parsed document's publication needs the writer.
    parser: PhpParser,
    pub workspace: Arc<RwLock<Workspace>>,
}

impl Backend {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            parser: PhpParser::new(),
            workspace: Arc::new(RwLock::new(Workspace::new(Arc::new(FsContentProvider)))),
        }
    }

    async fn publish_diagnostics(&self, doc: &crate::document::Document) {
        let diagnostics = doc
            .diagnostics
            .iter()
            .map(|d| Diagnostic {
                range: util::span_to_range(&doc.text, d.span),
                severity: Some(DiagnosticSeverity::ERROR),
                source: Some("phpscope".to_string()),
                message: d.message.clone(),
                ..Default::default()
            })
            .collect();
        self.client
            .publish_diagnostics(doc.uri.clone(), diagnostics, None)
            .await;
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        let root_path = params.root_uri.and_then(|uri| uri.to_file_path().ok());

        if let Some(path) = root_path {
            indexer::spawn_preload(path, self.client.clone(), self.workspace.clone());
        }

        Ok(InitializeResult {
            server_info: Some(ServerInfo {
                name: "phpscope".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
            capabilities: capabilities::server_capabilities(),
        })
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        self.client
            .log_message(MessageType::LOG, format!("LSP Event: did_open uri={}", uri))
            .await;

        match Document::parse(uri.clone(), params.text_document.text, &self.parser) {
            Ok(doc) => {
                let doc = Arc::new(doc);
                {
                    let mut ws = self.workspace.write().await;
                    ws.publish_open(doc.clone());
                }
                self.publish_diagnostics(&doc).await;
            }
            Err(e) => {
                self.client
                    .log_message(MessageType::ERROR, format!("open failed for {}: {}", uri, e))
                    .await
            }
        }
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        self.client
            .log_message(
                MessageType::LOG,
                format!("LSP Event: did_change uri={}", uri),
            )
            .await;

        // Full-document sync: the last change carries the entire text.
        let Some(text) = params.content_changes.into_iter().last().map(|c| c.text) else {
            return;
        };
        match Document::parse(uri.clone(), text, &self.parser) {
            Ok(doc) => {
                let doc = Arc::new(doc);
                {
                    let mut ws = self.workspace.write().await;
                    ws.publish_update(doc.clone());
                }
                self.publish_diagnostics(&doc).await;
            }
            Err(e) => {
                self.client
                    .log_message(
                        MessageType::ERROR,
                        format!("update failed for {}: {}", uri, e),
                    )
                    .await
            }
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.client
            .log_message(
                MessageType::LOG,
                format!("LSP Event: did_close uri={}", uri),
            )
            .await;
        {
            let mut ws = self.workspace.write().await;
            ws.close_document(&uri);
        }
        self.client.publish_diagnostics(uri, Vec::new(), None).await;
    }

    async fn goto_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        self.client
            .log_message(MessageType::LOG, "LSP Request: textDocument/definition")
            .await;
        goto::definition(self, params).await
    }

    async fn references(&self, params: ReferenceParams) -> Result<Option<Vec<Location>>> {
        self.client
            .log_message(MessageType::LOG, "LSP Request: textDocument/references")
            .await;
        goto::references(self, params).await
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        self.client
            .log_message(MessageType::LOG, "LSP Request: textDocument/hover")
            .await;
        hover::hover(self, params).await
    }

    async fn document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> Result<Option<DocumentSymbolResponse>> {
        self.client
            .log_message(MessageType::LOG, "LSP Request: textDocument/documentSymbol")
            .await;
        symbols::document_symbol(self, params).await
    }
}

pub async fn run_server() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = tower_lsp::LspService::new(Backend::new);
    tower_lsp::Server::new(stdin, stdout, socket)
        .serve(service)
        .await;

    Ok(())
}
