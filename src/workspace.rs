//! Project state and the query facade.
//!
//! The workspace owns the open-document map, the cache of documents loaded
//! from disk by the background indexer, and the symbol graph. The whole
//! structure is mutated under one writer (the LSP event pipeline); queries
//! read a consistent snapshot. Parsing happens before the write lock is
//! taken; a cancelled parse never touches the graph.

use crate::document::Document;
use crate::error::{PhpscopeError, Result};
use crate::graph::SymbolGraph;
use crate::model::ast::NodeId;
use crate::model::fqn::Fqn;
use crate::model::symbol::Definition;
use crate::model::types::Type;
use crate::naming;
use crate::parser::PhpParser;
use crate::typing::TypeResolver;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tower_lsp::lsp_types::Url;

/// Source-of-truth for document text outside the open set.
pub trait ContentProvider: Send + Sync {
    fn read(&self, uri: &Url) -> Result<String>;
    fn uri_to_path(&self, uri: &Url) -> Option<PathBuf>;
}

/// Reads through the filesystem.
pub struct FsContentProvider;

impl ContentProvider for FsContentProvider {
    fn read(&self, uri: &Url) -> Result<String> {
        let path = self
            .uri_to_path(uri)
            .ok_or_else(|| PhpscopeError::Unavailable(uri.to_string()))?;
        std::fs::read_to_string(path).map_err(|_| PhpscopeError::Unavailable(uri.to_string()))
    }

    fn uri_to_path(&self, uri: &Url) -> Option<PathBuf> {
        uri.to_file_path().ok()
    }
}

pub struct Workspace {
    parser: PhpParser,
    provider: Arc<dyn ContentProvider>,
    /// Documents the editor has open; their text is authoritative.
    open: HashMap<Url, Arc<Document>>,
    /// Documents loaded and indexed from disk (workspace preload); evicted
    /// when the editor takes them over or the file disappears.
    indexed: HashMap<Url, Arc<Document>>,
    graph: SymbolGraph,
}

impl Workspace {
    pub fn new(provider: Arc<dyn ContentProvider>) -> Self {
        Self {
            parser: PhpParser::new(),
            provider,
            open: HashMap::new(),
            indexed: HashMap::new(),
            graph: SymbolGraph::new(),
        }
    }

    pub fn graph(&self) -> &SymbolGraph {
        &self.graph
    }

    // ---- document lifecycle -------------------------------------------------

    /// Editor opened `uri`; its text becomes authoritative and the document
    /// joins the open set.
    pub fn open_document(&mut self, uri: Url, text: String) -> Result<Arc<Document>> {
        let next = Arc::new(Document::parse(uri, text, &self.parser)?);
        self.publish_open(next.clone());
        Ok(next)
    }

    /// Replace an open document's content: re-parse, then republish the
    /// graph delta for this URI in one step.
    pub fn update_document(&mut self, uri: &Url, text: String) -> Result<Arc<Document>> {
        let next = Arc::new(Document::parse(uri.clone(), text, &self.parser)?);
        self.publish_update(next.clone());
        Ok(next)
    }

    /// Publish a freshly parsed open document. Parsing happens before the
    /// writer takes over; an abandoned parse never reaches this point, so
    /// the graph stays unchanged.
    pub fn publish_open(&mut self, next: Arc<Document>) {
        let previous = self
            .open
            .remove(&next.uri)
            .or_else(|| self.indexed.remove(&next.uri));
        self.graph.apply_document(previous.as_deref(), &next);
        self.open.insert(next.uri.clone(), next);
    }

    /// Publish a re-parse of an already open document.
    pub fn publish_update(&mut self, next: Arc<Document>) {
        let previous = self.open.get(&next.uri).cloned();
        self.graph.apply_document(previous.as_deref(), &next);
        self.open.insert(next.uri.clone(), next);
    }

    /// Editor closed `uri`: definitions leave the graph and the URI leaves
    /// every referrer set. In-flight readers holding the Arc may finish
    /// against the stale copy.
    pub fn close_document(&mut self, uri: &Url) {
        if let Some(document) = self.open.remove(uri) {
            self.graph.remove_document(&document);
        }
    }

    /// Background indexing path: load `uri` from the content provider and
    /// publish its symbols without promoting it into the open set.
    pub fn load_and_index(&mut self, uri: Url) -> Result<Arc<Document>> {
        if let Some(open) = self.open.get(&uri) {
            return Ok(open.clone());
        }
        let text = self.provider.read(&uri)?;
        let next = Arc::new(Document::parse(uri.clone(), text, &self.parser)?);
        let previous = self.indexed.remove(&uri);
        self.graph.apply_document(previous.as_deref(), &next);
        self.indexed.insert(uri, next.clone());
        Ok(next)
    }

    /// Evict a loaded-but-not-open document, retiring its graph entries.
    pub fn evict(&mut self, uri: &Url) {
        if let Some(document) = self.indexed.remove(uri) {
            self.graph.remove_document(&document);
        }
    }

    /// Fetch a document for a query: open set first, then the indexed
    /// cache, then a read through the content provider scoped to this call
    /// (no promotion, no graph publication). `None` when the document is
    /// unavailable.
    pub fn document(&self, uri: &Url) -> Option<Arc<Document>> {
        if let Some(doc) = self.open.get(uri) {
            return Some(doc.clone());
        }
        if let Some(doc) = self.indexed.get(uri) {
            return Some(doc.clone());
        }
        let text = self.provider.read(uri).ok()?;
        Document::parse(uri.clone(), text, &self.parser)
            .ok()
            .map(Arc::new)
    }

    pub fn open_documents(&self) -> impl Iterator<Item = &Arc<Document>> {
        self.open.values()
    }

    // ---- queries ------------------------------------------------------------

    /// Definition a reference node points at.
    ///
    /// Variables are a programmer error here: local scope is the scope
    /// resolver's job, and conflating it with the global graph would hide
    /// shadowing bugs. Unresolved names and graph misses are `Ok(None)`.
    pub fn definition_for_node(&self, doc: &Document, node: NodeId) -> Result<Option<Definition>> {
        use crate::model::ast::NodeKind;

        if matches!(doc.ast.kind(node), NodeKind::Variable { .. }) {
            return Err(PhpscopeError::Contract(
                "variable definitions resolve through the scope resolver, not the symbol graph",
            ));
        }

        let mut types = TypeResolver::new(&self.graph);
        let Some(fqn) = naming::reference_fqn(doc, node, &mut types) else {
            return Ok(None);
        };
        if let Some(definition) = self.graph.definition(&fqn) {
            return Ok(Some(definition.clone()));
        }

        // Unqualified function and constant references fall back to the
        // global namespace. Nothing else does.
        let name_node = match doc.ast.kind(node) {
            NodeKind::Call { callee, .. } => *callee,
            NodeKind::ConstFetch { name } => *name,
            _ => node,
        };
        let fallback_applies = doc
            .ast
            .parent(name_node)
            .map(|p| {
                matches!(
                    doc.ast.kind(p),
                    NodeKind::Call { .. } | NodeKind::ConstFetch { .. }
                )
            })
            .unwrap_or(false);
        if fallback_applies {
            if let Some(global) = fqn.global_fallback() {
                if let Some(definition) = self.graph.definition(&global) {
                    return Ok(Some(definition.clone()));
                }
            }
        }
        Ok(None)
    }

    /// Best-effort static type of any expression node.
    pub fn type_of_expression(&self, doc: &Document, node: NodeId) -> Type {
        TypeResolver::new(&self.graph).type_of(doc, node)
    }

    /// The document owning the definition registered under `fqn`.
    pub fn definition_document(&self, fqn: &Fqn) -> Option<Arc<Document>> {
        let uri = self.graph.owner_of(fqn)?.clone();
        self.document(&uri)
    }

    /// Documents whose last published build references `fqn`.
    pub fn references_to(&self, fqn: &Fqn) -> Vec<Arc<Document>> {
        let uris: Vec<Url> = self.graph.referrers(fqn).cloned().collect();
        uris.iter().filter_map(|uri| self.document(uri)).collect()
    }
}
