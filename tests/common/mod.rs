use phpscope::document::Document;
use phpscope::error::{PhpscopeError, Result};
use phpscope::model::ast::NodeId;
use phpscope::model::symbol::Url;
use phpscope::workspace::{ContentProvider, Workspace};
use std::path::PathBuf;
use std::sync::Arc;

/// A provider for fixtures that live purely in memory; every read misses.
#[allow(dead_code)]
pub struct NullProvider;

impl ContentProvider for NullProvider {
    fn read(&self, uri: &Url) -> Result<String> {
        Err(PhpscopeError::Unavailable(uri.to_string()))
    }

    fn uri_to_path(&self, _uri: &Url) -> Option<PathBuf> {
        None
    }
}

#[allow(dead_code)]
pub fn uri(name: &str) -> Url {
    Url::parse(&format!("file:///project/{}", name)).expect("fixture uri")
}

/// Open every fixture file into a fresh workspace, as the editor would.
#[allow(dead_code)]
pub fn setup_workspace(files: &[(&str, &str)]) -> Workspace {
    let mut ws = Workspace::new(Arc::new(NullProvider));
    for (name, text) in files {
        ws.open_document(uri(name), text.to_string())
            .expect("fixture parses");
    }
    ws
}

/// The innermost AST node at the first occurrence of `needle` in the
/// document text, offset by `skip` bytes into the needle.
#[allow(dead_code)]
pub fn node_at(doc: &Document, needle: &str, skip: usize) -> NodeId {
    let offset = doc.text.find(needle).expect("needle present") + skip;
    doc.ast.node_at_offset(offset).expect("node at offset")
}

/// Same as [`node_at`] but anchored on the last occurrence.
#[allow(dead_code)]
pub fn node_at_last(doc: &Document, needle: &str, skip: usize) -> NodeId {
    let offset = doc.text.rfind(needle).expect("needle present") + skip;
    doc.ast.node_at_offset(offset).expect("node at offset")
}
