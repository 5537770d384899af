//! Fully-qualified-name building (definitions and references).
//!
//! Definition names come from the declared identifier plus the enclosing
//! namespace/class. Reference names come from the parse-time resolved name
//! attribute, or — for member accesses on dynamic receivers — from the
//! receiver's inferred class. Dynamic names have no FQN.

use crate::document::Document;
use crate::model::ast::{Ast, NodeId, NodeKind};
use crate::model::fqn::Fqn;
use crate::typing::TypeResolver;
use std::collections::HashMap;

/// Resolve a source-level name against a namespace and `use` map, following
/// the language's compile-time rules: `\`-prefixed names are absolute,
/// qualified names map their first segment through the imports, unqualified
/// names map whole or fall into the current namespace. `self`, `static` and
/// `parent` are contextual and stay unresolved here.
pub fn resolve_in_context(
    text: &str,
    namespace: Option<&str>,
    uses: &HashMap<String, String>,
) -> Option<String> {
    if matches!(text, "self" | "static" | "parent") {
        return None;
    }
    if let Some(absolute) = text.strip_prefix('\\') {
        return Some(absolute.to_string());
    }
    if let Some((first, rest)) = text.split_once('\\') {
        if let Some(mapped) = uses.get(first) {
            return Some(format!("{}\\{}", mapped, rest));
        }
        return Some(match namespace {
            Some(ns) => format!("{}\\{}", ns, text),
            None => text.to_string(),
        });
    }
    if let Some(mapped) = uses.get(text) {
        return Some(mapped.clone());
    }
    Some(match namespace {
        Some(ns) => format!("{}\\{}", ns, text),
        None => text.to_string(),
    })
}

/// FQN of the innermost named class or interface enclosing `id`.
pub fn enclosing_class_fqn(ast: &Ast, id: NodeId) -> Option<Fqn> {
    let class = ast.enclosing_class(id)?;
    let name = match ast.kind(class) {
        NodeKind::Class { name, .. } => name.clone()?,
        NodeKind::Interface { name, .. } => name.clone(),
        _ => return None,
    };
    Some(Fqn::in_namespace(ast.namespace_of(class).as_deref(), &name))
}

/// The class a `Name` node in class position denotes. Handles the
/// contextual keywords through the enclosing class declaration.
pub fn class_fqn_for_name(ast: &Ast, id: NodeId) -> Option<Fqn> {
    let NodeKind::Name { text, resolved } = ast.kind(id) else {
        return None;
    };
    if let Some(resolved) = resolved {
        return Some(Fqn::from_qualified(resolved));
    }
    match text.as_str() {
        "self" | "static" => enclosing_class_fqn(ast, id),
        "parent" => {
            let class = ast.enclosing_class(id)?;
            let NodeKind::Class {
                extends: Some(extends),
                ..
            } = ast.kind(class)
            else {
                return None;
            };
            class_fqn_for_name(ast, *extends)
        }
        _ => None,
    }
}

/// FQN declared by a definition node, or `None` for non-definition kinds
/// and anonymous classes.
pub fn definition_fqn(ast: &Ast, id: NodeId) -> Option<Fqn> {
    let plain = |name: &str| Fqn::in_namespace(ast.namespace_of(id).as_deref(), name);
    match ast.kind(id) {
        NodeKind::Class {
            name: Some(name), ..
        } => Some(plain(name)),
        NodeKind::Interface { name, .. } => Some(plain(name)),
        NodeKind::Function { name, .. } => Some(plain(name)),
        NodeKind::Const { name, .. } => Some(plain(name)),
        NodeKind::Method { name, .. } => {
            Some(Fqn::method(&enclosing_class_fqn(ast, id)?, name))
        }
        NodeKind::Property {
            name, is_static, ..
        } => {
            let owner = enclosing_class_fqn(ast, id)?;
            Some(if *is_static {
                Fqn::static_property(&owner, name)
            } else {
                Fqn::member(&owner, name)
            })
        }
        NodeKind::ClassConst { name, .. } => {
            Some(Fqn::member(&enclosing_class_fqn(ast, id)?, name))
        }
        _ => None,
    }
}

/// A class-position child: its FQN when it is a static name, `None` when it
/// is a dynamic expression.
fn static_class_fqn(ast: &Ast, class: NodeId) -> Option<Fqn> {
    match ast.kind(class) {
        NodeKind::Name { .. } => class_fqn_for_name(ast, class),
        _ => None,
    }
}

/// FQN a reference node points at. `types` supplies receiver classes for
/// instance member accesses; every dynamic name yields `None`.
pub fn reference_fqn(doc: &Document, node: NodeId, types: &mut TypeResolver) -> Option<Fqn> {
    let ast = &doc.ast;
    match ast.kind(node) {
        NodeKind::Name { .. } => class_fqn_for_name(ast, node),
        NodeKind::ConstFetch { name } => class_fqn_for_name(ast, *name),
        NodeKind::Call { callee, .. } => match ast.kind(*callee) {
            NodeKind::Name { .. } => class_fqn_for_name(ast, *callee),
            _ => None,
        },
        NodeKind::MethodCall {
            receiver,
            name: Some(name),
            ..
        } => {
            let owner = types.type_of(doc, *receiver).object_fqn()?.clone();
            Some(Fqn::method(&owner, name))
        }
        NodeKind::PropertyFetch {
            receiver,
            name: Some(name),
        } => {
            let owner = types.type_of(doc, *receiver).object_fqn()?.clone();
            Some(Fqn::member(&owner, name))
        }
        NodeKind::StaticCall {
            class,
            name: Some(name),
            ..
        } => Some(Fqn::method(&static_class_fqn(ast, *class)?, name)),
        NodeKind::StaticPropertyFetch {
            class,
            name: Some(name),
        } => Some(Fqn::static_property(&static_class_fqn(ast, *class)?, name)),
        NodeKind::ClassConstFetch {
            class,
            name: Some(name),
        } => Some(Fqn::member(&static_class_fqn(ast, *class)?, name)),
        NodeKind::New { class, .. } => static_class_fqn(ast, *class),
        NodeKind::Instanceof { class, .. } => static_class_fqn(ast, *class),
        _ => None,
    }
}
