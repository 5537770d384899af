//! Variable definition lookup.
//!
//! A variable use resolves to a parameter, a capture of the nearest
//! enclosing closure, or the nearest preceding assignment in the same
//! function body. The walk ascends parent links and scans previous siblings
//! backward at each level (nearest first), and never crosses a
//! function-like boundary.

use crate::model::ast::{Ast, NodeId, NodeKind};

/// What established a variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariableDefinition {
    /// The `Param` node of the enclosing function-like.
    Parameter(NodeId),
    /// A `use (..)` binding of the enclosing closure.
    Capture { closure: NodeId, name: String },
    /// The nearest preceding `Assign` node whose target is the variable.
    Assignment(NodeId),
}

impl VariableDefinition {
    /// The node to present as the definition site.
    pub fn node(&self) -> NodeId {
        match self {
            VariableDefinition::Parameter(id) => *id,
            VariableDefinition::Capture { closure, .. } => *closure,
            VariableDefinition::Assignment(id) => *id,
        }
    }
}

/// Resolve a `Variable` use node. Returns `None` for other node kinds and
/// for unresolved variables.
pub fn find_definition(ast: &Ast, use_node: NodeId) -> Option<VariableDefinition> {
    let NodeKind::Variable { name } = ast.kind(use_node) else {
        return None;
    };
    find_from(ast, use_node, name)
}

/// Walk upward from `start` looking for a definition of `name`. Used
/// directly when typing closure captures, where the search begins at the
/// closure node in the enclosing scope.
pub fn find_from(ast: &Ast, start: NodeId, name: &str) -> Option<VariableDefinition> {
    let mut current = start;
    loop {
        let mut sibling = ast.prev_sibling(current);
        while let Some(s) = sibling {
            if let NodeKind::Assign { target, .. } = ast.kind(s) {
                if let NodeKind::Variable { name: target_name } = ast.kind(*target) {
                    if target_name == name {
                        return Some(VariableDefinition::Assignment(s));
                    }
                }
            }
            sibling = ast.prev_sibling(s);
        }

        let parent = ast.parent(current)?;
        let kind = ast.kind(parent);
        if !kind.is_function_like() {
            current = parent;
            continue;
        }

        let params = match kind {
            NodeKind::Function { params, .. }
            | NodeKind::Method { params, .. }
            | NodeKind::Closure { params, .. } => params,
            _ => unreachable!("function-like kinds carry params"),
        };
        for &param in params {
            if let NodeKind::Param { name: param_name, .. } = ast.kind(param) {
                if param_name == name {
                    return Some(VariableDefinition::Parameter(param));
                }
            }
        }
        if let NodeKind::Closure { captures, .. } = kind {
            if captures.iter().any(|c| c == name) {
                return Some(VariableDefinition::Capture {
                    closure: parent,
                    name: name.to_string(),
                });
            }
        }
        // The scope ends here; an outer binding is not visible.
        return None;
    }
}
