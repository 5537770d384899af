//! Per-document index: the parsed AST plus the local maps the symbol graph
//! is fed from.
//!
//! A document is built in one pass over the arena: definition nodes become
//! FQN-keyed [`Definition`]s (with declared types pulled from signature
//! hints and docblocks), statically resolvable reference nodes become the
//! referenced-FQN set. Rebuilding from the same text is deterministic, so
//! updates can diff old against new maps.

use crate::error::Result;
use crate::model::ast::{Ast, NodeId, NodeKind, Span};
use crate::model::fqn::Fqn;
use crate::model::symbol::{Definition, Location, SymbolInformation, SymbolKind};
use crate::model::types::Type;
use crate::naming;
use crate::parser::{docblock, Diagnostic, PhpParser};
use std::collections::{HashMap, HashSet};
use tower_lsp::lsp_types::Url;

#[derive(Debug, Clone)]
pub struct Document {
    pub uri: Url,
    pub text: String,
    pub ast: Ast,
    pub definitions: HashMap<Fqn, Definition>,
    pub references: HashSet<Fqn>,
    /// Where each referenced FQN occurs, for the references response.
    pub reference_spans: HashMap<Fqn, Vec<Span>>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Document {
    pub fn parse(uri: Url, text: String, parser: &PhpParser) -> Result<Document> {
        let result = parser.parse(&text)?;
        let mut doc = Document {
            uri,
            text,
            ast: result.ast,
            definitions: HashMap::new(),
            references: HashSet::new(),
            reference_spans: HashMap::new(),
            diagnostics: result.diagnostics,
        };
        doc.index_definitions();
        doc.index_references();
        Ok(doc)
    }

    pub fn definition_by_fqn(&self, fqn: &Fqn) -> Option<&Definition> {
        self.definitions.get(fqn)
    }

    pub fn definition_node_by_fqn(&self, fqn: &Fqn) -> Option<NodeId> {
        self.definitions.get(fqn).map(|d| d.node)
    }

    fn index_definitions(&mut self) {
        let mut definitions = HashMap::new();
        for id in self.ast.ids() {
            let Some(fqn) = naming::definition_fqn(&self.ast, id) else {
                continue;
            };
            let Some(kind) = symbol_kind(self.ast.kind(id)) else {
                continue;
            };
            let symbol = SymbolInformation {
                kind,
                fqn: fqn.clone(),
                location: Location {
                    uri: self.uri.clone(),
                    span: self.ast.span(id),
                },
                declared_type: self.declared_type_of(id),
            };
            definitions.insert(fqn, Definition { symbol, node: id });
        }
        self.definitions = definitions;
    }

    /// Declared (not inferred) type of a definition node: signature hint
    /// first, then the docblock tag; for constants, the literal initializer.
    fn declared_type_of(&self, id: NodeId) -> Option<Type> {
        let ast = &self.ast;
        let namespace = ast.namespace_of(id);
        let from_text =
            |text: &str| docblock::type_from_text(text, namespace.as_deref(), &ast.uses);
        match ast.kind(id) {
            NodeKind::Function {
                return_hint, doc, ..
            }
            | NodeKind::Method {
                return_hint, doc, ..
            } => {
                if let Some(hint) = return_hint {
                    return Some(from_text(hint));
                }
                let tags = docblock::parse(doc.as_deref()?);
                tags.return_type.as_deref().map(from_text)
            }
            NodeKind::Property {
                type_hint, doc, ..
            } => {
                if let Some(hint) = type_hint {
                    return Some(from_text(hint));
                }
                let tags = docblock::parse(doc.as_deref()?);
                tags.var_type.as_deref().map(from_text)
            }
            NodeKind::ClassConst { value, doc, .. } | NodeKind::Const { value, doc, .. } => {
                if let Some(doc) = doc {
                    if let Some(text) = docblock::parse(doc).var_type {
                        return Some(from_text(&text));
                    }
                }
                value.as_ref().and_then(|v| literal_type(ast, *v))
            }
            _ => None,
        }
    }

    fn index_references(&mut self) {
        let mut references = HashSet::new();
        let mut spans: HashMap<Fqn, Vec<Span>> = HashMap::new();
        let mut record = |fqn: Fqn, span: Span| {
            spans.entry(fqn.clone()).or_default().push(span);
            references.insert(fqn);
        };

        let ast = &self.ast;
        for id in ast.ids() {
            match ast.kind(id) {
                NodeKind::Call { callee, .. } => {
                    if let Some(fqn) = class_name_ref(ast, *callee) {
                        record(fqn, ast.span(*callee));
                    }
                }
                NodeKind::ConstFetch { name } => {
                    if let NodeKind::Name { text, .. } = ast.kind(*name) {
                        if matches!(text.as_str(), "true" | "false" | "null") {
                            continue;
                        }
                    }
                    if let Some(fqn) = class_name_ref(ast, *name) {
                        record(fqn, ast.span(*name));
                    }
                }
                NodeKind::New { class, .. } | NodeKind::Instanceof { class, .. } => {
                    if let Some(fqn) = class_name_ref(ast, *class) {
                        record(fqn, ast.span(*class));
                    }
                }
                NodeKind::Class {
                    extends,
                    implements,
                    ..
                } => {
                    for &name in extends.iter().chain(implements.iter()) {
                        if let Some(fqn) = class_name_ref(ast, name) {
                            record(fqn, ast.span(name));
                        }
                    }
                }
                NodeKind::Interface { extends, .. } => {
                    for &name in extends {
                        if let Some(fqn) = class_name_ref(ast, name) {
                            record(fqn, ast.span(name));
                        }
                    }
                }
                NodeKind::StaticCall {
                    class,
                    name: Some(member),
                    ..
                } => {
                    if let Some(owner) = class_name_ref(ast, *class) {
                        record(owner.clone(), ast.span(*class));
                        record(Fqn::method(&owner, member), ast.span(id));
                    }
                }
                NodeKind::StaticPropertyFetch {
                    class,
                    name: Some(member),
                } => {
                    if let Some(owner) = class_name_ref(ast, *class) {
                        record(owner.clone(), ast.span(*class));
                        record(Fqn::static_property(&owner, member), ast.span(id));
                    }
                }
                NodeKind::ClassConstFetch {
                    class,
                    name: Some(member),
                } => {
                    if let Some(owner) = class_name_ref(ast, *class) {
                        record(owner.clone(), ast.span(*class));
                        if member != "class" {
                            record(Fqn::member(&owner, member), ast.span(id));
                        }
                    }
                }
                _ => {}
            }
        }
        self.references = references;
        self.reference_spans = spans;
    }
}

fn symbol_kind(kind: &NodeKind) -> Option<SymbolKind> {
    Some(match kind {
        NodeKind::Class { .. } => SymbolKind::Class,
        NodeKind::Interface { .. } => SymbolKind::Interface,
        NodeKind::Function { .. } => SymbolKind::Function,
        NodeKind::Method { .. } => SymbolKind::Method,
        NodeKind::Property { .. } => SymbolKind::Property,
        NodeKind::ClassConst { .. } | NodeKind::Const { .. } => SymbolKind::Constant,
        _ => return None,
    })
}

fn class_name_ref(ast: &Ast, id: NodeId) -> Option<Fqn> {
    match ast.kind(id) {
        NodeKind::Name { .. } => naming::class_fqn_for_name(ast, id),
        _ => None,
    }
}

/// Shallow literal glance used for constant value types; anything beyond a
/// scalar stays undeclared.
fn literal_type(ast: &Ast, id: NodeId) -> Option<Type> {
    match ast.kind(id) {
        NodeKind::Int(_) => Some(Type::Integer),
        NodeKind::Float(_) => Some(Type::Float),
        NodeKind::Str(_) => Some(Type::String),
        NodeKind::ConstFetch { name } => match ast.kind(*name) {
            NodeKind::Name { text, .. } if text == "true" || text == "false" => {
                Some(Type::Boolean)
            }
            NodeKind::Name { text, .. } if text == "null" => Some(Type::Null),
            _ => None,
        },
        _ => None,
    }
}
