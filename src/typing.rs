//! Expression type inference.
//!
//! `type_of` is total: every node kind produces a type, and every path the
//! resolver cannot narrow produces `mixed`. It never fails. Recursion is
//! confined to the current document — cross-document knowledge flows
//! through declared types in the symbol graph — and an in-progress set cuts
//! cyclic variable definitions off at `mixed`.

use crate::document::Document;
use crate::graph::SymbolGraph;
use crate::model::ast::{CastKind, NodeId, NodeKind, UnaryOp};
use crate::model::fqn::Fqn;
use crate::model::types::Type;
use crate::naming;
use crate::parser::docblock;
use crate::scope::{self, VariableDefinition};
use std::collections::HashSet;

pub struct TypeResolver<'a> {
    graph: &'a SymbolGraph,
    in_progress: HashSet<NodeId>,
}

impl<'a> TypeResolver<'a> {
    pub fn new(graph: &'a SymbolGraph) -> Self {
        Self {
            graph,
            in_progress: HashSet::new(),
        }
    }

    pub fn type_of(&mut self, doc: &Document, node: NodeId) -> Type {
        if !self.in_progress.insert(node) {
            return Type::Mixed;
        }
        let ty = self.compute(doc, node);
        self.in_progress.remove(&node);
        ty
    }

    fn compute(&mut self, doc: &Document, node: NodeId) -> Type {
        let ast = &doc.ast;
        match ast.kind(node) {
            NodeKind::Variable { name } => {
                if name == "this" {
                    return match naming::enclosing_class_fqn(ast, node) {
                        Some(fqn) => Type::object(fqn),
                        None => Type::Mixed,
                    };
                }
                match scope::find_definition(ast, node) {
                    Some(def) => self.type_of_variable_definition(doc, def),
                    None => Type::Mixed,
                }
            }
            NodeKind::Assign { value, .. } => self.type_of(doc, *value),
            NodeKind::Param { .. } => self.param_type(doc, node),
            NodeKind::Call { callee, .. } => match ast.kind(*callee) {
                NodeKind::Name { .. } => match naming::class_fqn_for_name(ast, *callee) {
                    Some(fqn) => self.declared_type(&fqn, true),
                    None => Type::Mixed,
                },
                _ => Type::Mixed,
            },
            NodeKind::MethodCall {
                receiver,
                name: Some(name),
                ..
            } => {
                let receiver_ty = self.type_of(doc, *receiver);
                match receiver_ty.object_fqn() {
                    Some(owner) => {
                        let fqn = Fqn::method(owner, name);
                        self.declared_type(&fqn, false)
                    }
                    None => Type::Mixed,
                }
            }
            NodeKind::MethodCall { .. } => Type::Mixed,
            NodeKind::PropertyFetch {
                receiver,
                name: Some(name),
            } => {
                let receiver_ty = self.type_of(doc, *receiver);
                match receiver_ty.object_fqn() {
                    Some(owner) => {
                        let fqn = Fqn::member(owner, name);
                        self.declared_type(&fqn, false)
                    }
                    None => Type::Mixed,
                }
            }
            NodeKind::PropertyFetch { .. } => Type::Mixed,
            NodeKind::StaticCall {
                class,
                name: Some(name),
                ..
            } => match self.static_owner(ast, *class) {
                Some(owner) => self.declared_type(&Fqn::method(&owner, name), false),
                None => Type::Mixed,
            },
            NodeKind::StaticCall { .. } => Type::Mixed,
            NodeKind::StaticPropertyFetch {
                class,
                name: Some(name),
            } => match self.static_owner(ast, *class) {
                Some(owner) => self.declared_type(&Fqn::static_property(&owner, name), false),
                None => Type::Mixed,
            },
            NodeKind::StaticPropertyFetch { .. } => Type::Mixed,
            NodeKind::ClassConstFetch {
                class,
                name: Some(name),
            } => {
                // `Foo::class` is the class-string literal form.
                if name == "class" {
                    return Type::String;
                }
                match self.static_owner(ast, *class) {
                    Some(owner) => self.declared_type(&Fqn::member(&owner, name), false),
                    None => Type::Mixed,
                }
            }
            NodeKind::ClassConstFetch { .. } => Type::Mixed,
            NodeKind::New { class, .. } => match ast.kind(*class) {
                NodeKind::Name { .. } => match naming::class_fqn_for_name(ast, *class) {
                    Some(fqn) => Type::object(fqn),
                    None => Type::Mixed,
                },
                NodeKind::Class { name: None, .. } => Type::Object(None),
                _ => Type::Mixed,
            },
            NodeKind::Clone { operand } => self.type_of(doc, *operand),
            NodeKind::Ternary {
                cond,
                then,
                otherwise,
            } => {
                let first = match then {
                    Some(then) => self.type_of(doc, *then),
                    // Short form: the condition value is the first alternative.
                    None => self.type_of(doc, *cond),
                };
                let second = self.type_of(doc, *otherwise);
                Type::compound([first, second])
            }
            NodeKind::Coalesce { lhs, rhs } => {
                let lhs = self.type_of(doc, *lhs);
                let rhs = self.type_of(doc, *rhs);
                Type::compound([lhs, rhs])
            }
            NodeKind::Binary { op, .. } => {
                if op.is_boolean() {
                    Type::Boolean
                } else {
                    match op {
                        crate::model::ast::BinaryOp::Concat => Type::String,
                        // Arithmetic stays integer-typed; no float promotion.
                        _ => Type::Integer,
                    }
                }
            }
            NodeKind::Unary { op, .. } => match op {
                UnaryOp::Not => Type::Boolean,
                UnaryOp::Neg | UnaryOp::Plus | UnaryOp::BitNot => Type::Integer,
            },
            NodeKind::Cast { target, .. } => match target {
                CastKind::Int => Type::Integer,
                CastKind::Float => Type::Float,
                CastKind::String => Type::String,
                CastKind::Bool => Type::Boolean,
                CastKind::Array => Type::array(Type::Mixed, Type::Mixed),
                CastKind::Object => Type::Object(None),
            },
            NodeKind::Array { items } => {
                let mut value_types = Vec::new();
                let mut key_types = Vec::new();
                for &item in items {
                    let NodeKind::ArrayItem { key, value } = ast.kind(item) else {
                        continue;
                    };
                    value_types.push(self.type_of(doc, *value));
                    key_types.push(match key {
                        Some(key) => self.type_of(doc, *key),
                        None => Type::Integer,
                    });
                }
                Type::array(Type::compound(value_types), Type::compound(key_types))
            }
            NodeKind::ArrayItem { value, .. } => self.type_of(doc, *value),
            NodeKind::Index { target, .. } => match self.type_of(doc, *target) {
                Type::Array { value, .. } => *value,
                _ => Type::Mixed,
            },
            NodeKind::Instanceof { .. }
            | NodeKind::Isset { .. }
            | NodeKind::Empty { .. } => Type::Boolean,
            NodeKind::ConstFetch { name } => {
                let NodeKind::Name { text, .. } = ast.kind(*name) else {
                    return Type::Mixed;
                };
                match text.as_str() {
                    "true" | "false" => Type::Boolean,
                    "null" => Type::Null,
                    _ => match naming::class_fqn_for_name(ast, *name) {
                        Some(fqn) => self.declared_type(&fqn, true),
                        None => Type::Mixed,
                    },
                }
            }
            NodeKind::Int(_) => Type::Integer,
            NodeKind::Float(_) => Type::Float,
            NodeKind::Str(_) => Type::String,
            NodeKind::Closure { .. } => Type::Callable,
            NodeKind::Include { .. } => Type::Mixed,
            // Declarations, statements and unmodeled subtrees are not
            // expressions; widen.
            NodeKind::Program { .. }
            | NodeKind::Namespace { .. }
            | NodeKind::Class { .. }
            | NodeKind::Interface { .. }
            | NodeKind::Function { .. }
            | NodeKind::Method { .. }
            | NodeKind::Property { .. }
            | NodeKind::ClassConst { .. }
            | NodeKind::Const { .. }
            | NodeKind::Return { .. }
            | NodeKind::Name { .. }
            | NodeKind::Unknown => Type::Mixed,
        }
    }

    fn type_of_variable_definition(&mut self, doc: &Document, def: VariableDefinition) -> Type {
        match def {
            VariableDefinition::Parameter(param) => self.type_of(doc, param),
            VariableDefinition::Assignment(assign) => self.type_of(doc, assign),
            // A capture imports the outer binding; resume the walk from the
            // closure node in the enclosing scope.
            VariableDefinition::Capture { closure, name } => {
                match scope::find_from(&doc.ast, closure, &name) {
                    Some(outer) => self.type_of_variable_definition(doc, outer),
                    None => Type::Mixed,
                }
            }
        }
    }

    fn param_type(&mut self, doc: &Document, param: NodeId) -> Type {
        let ast = &doc.ast;
        let NodeKind::Param {
            name, type_hint, ..
        } = ast.kind(param)
        else {
            return Type::Mixed;
        };
        let namespace = ast.namespace_of(param);
        if let Some(hint) = type_hint {
            return docblock::type_from_text(hint, namespace.as_deref(), &ast.uses);
        }
        // No signature hint: look for an `@param` tag on the enclosing
        // function or method.
        let mut current = ast.parent(param);
        while let Some(parent) = current {
            match ast.kind(parent) {
                NodeKind::Function { doc: Some(doc), .. }
                | NodeKind::Method { doc: Some(doc), .. } => {
                    let tags = docblock::parse(doc);
                    if let Some(text) = tags.params.get(name) {
                        return docblock::type_from_text(text, namespace.as_deref(), &ast.uses);
                    }
                    return Type::Mixed;
                }
                kind if kind.is_function_like() => return Type::Mixed,
                _ => current = ast.parent(parent),
            }
        }
        Type::Mixed
    }

    /// Owner class of a static member access: a static class token,
    /// possibly the contextual `self`/`static`/`parent`.
    fn static_owner(&self, ast: &crate::model::ast::Ast, class: NodeId) -> Option<Fqn> {
        match ast.kind(class) {
            NodeKind::Name { .. } => naming::class_fqn_for_name(ast, class),
            _ => None,
        }
    }

    /// Declared type of the definition registered under `fqn`, widened to
    /// `mixed` when the symbol or its type is unknown. `global_fallback`
    /// re-tries under the bare global name, which applies to unqualified
    /// function and constant references only.
    fn declared_type(&self, fqn: &Fqn, global_fallback: bool) -> Type {
        if let Some(def) = self.graph.definition(fqn) {
            return def.symbol.declared_type.clone().unwrap_or(Type::Mixed);
        }
        if global_fallback {
            if let Some(global) = fqn.global_fallback() {
                if let Some(def) = self.graph.definition(&global) {
                    return def.symbol.declared_type.clone().unwrap_or(Type::Mixed);
                }
            }
        }
        Type::Mixed
    }
}
