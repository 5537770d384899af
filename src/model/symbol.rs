//! Symbol descriptors published into the project-wide graph.

use super::ast::{NodeId, Span};
use super::fqn::Fqn;
use super::types::Type;
use serde::{Deserialize, Serialize};
pub use tower_lsp::lsp_types::Url;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Class,
    Interface,
    Function,
    Method,
    Property,
    Constant,
}

impl SymbolKind {
    pub fn describe(self) -> &'static str {
        match self {
            SymbolKind::Class => "class",
            SymbolKind::Interface => "interface",
            SymbolKind::Function => "function",
            SymbolKind::Method => "method",
            SymbolKind::Property => "property",
            SymbolKind::Constant => "constant",
        }
    }
}

/// Where a symbol lives: owning document plus byte range within it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub uri: Url,
    pub span: Span,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SymbolInformation {
    pub kind: SymbolKind,
    pub fqn: Fqn,
    pub location: Location,
    /// Declared return type (functions, methods) or value type (properties,
    /// constants) from signature hints or docblock tags.
    pub declared_type: Option<Type>,
}

/// A symbol plus the AST node that declares it. The owning document is
/// reachable through `symbol.location.uri`; the node id is only meaningful
/// against that document's current AST.
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    pub symbol: SymbolInformation,
    pub node: NodeId,
}

impl Definition {
    pub fn uri(&self) -> &Url {
        &self.symbol.location.uri
    }

    pub fn fqn(&self) -> &Fqn {
        &self.symbol.fqn
    }
}
