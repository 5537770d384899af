//! CST -> AST lowering.
//!
//! Walks the tree-sitter concrete tree and produces arena nodes. Name nodes
//! get their namespaced form resolved here, against the file's `use` map and
//! the namespace in effect at the declaration point. Subtrees the semantic
//! core does not model become `NodeKind::Unknown`.

use super::Diagnostic;
use crate::model::ast::{Ast, AstBuilder, BinaryOp, CastKind, NodeId, NodeKind, Span, UnaryOp};
use tree_sitter::{Node, Tree};

pub(crate) fn lower(tree: &Tree, source: &str) -> (Ast, Vec<Diagnostic>) {
    let mut lowering = Lowering {
        source,
        builder: AstBuilder::new(),
        diagnostics: Vec::new(),
        namespace: None,
    };

    let root = tree.root_node();
    lowering.collect_uses(root);
    lowering.collect_diagnostics(root);

    let stmts = lowering.lower_statements(&named_children(root));
    let program = lowering
        .builder
        .push(NodeKind::Program { stmts }, node_span(root));
    let ast = lowering.builder.finish(program);
    (ast, lowering.diagnostics)
}

fn node_span(node: Node) -> Span {
    Span::new(node.start_byte(), node.end_byte())
}

fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

struct Lowering<'s> {
    source: &'s str,
    builder: AstBuilder,
    diagnostics: Vec<Diagnostic>,
    namespace: Option<String>,
}

impl<'s> Lowering<'s> {
    fn text(&self, node: Node) -> &'s str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    /// Pre-pass: gather every `use` import so resolution does not depend on
    /// declaration order.
    fn collect_uses(&mut self, node: Node) {
        if node.kind() == "namespace_use_declaration" {
            self.collect_use_declaration(node);
            return;
        }
        for child in named_children(node) {
            self.collect_uses(child);
        }
    }

    fn collect_use_declaration(&mut self, node: Node) {
        let mut group_prefix: Option<String> = None;
        for child in named_children(node) {
            match child.kind() {
                "namespace_name" | "name" | "qualified_name" => {
                    group_prefix = Some(self.text(child).trim_start_matches('\\').to_string());
                }
                "namespace_use_clause" => self.collect_use_clause(child, None),
                "namespace_use_group" => {
                    for clause in named_children(child) {
                        if clause.kind() == "namespace_use_clause" {
                            self.collect_use_clause(clause, group_prefix.as_deref());
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn collect_use_clause(&mut self, clause: Node, prefix: Option<&str>) {
        let mut target: Option<String> = None;
        let mut alias: Option<String> = None;
        for part in named_children(clause) {
            match part.kind() {
                "name" | "qualified_name" => {
                    target = Some(self.text(part).trim_start_matches('\\').to_string())
                }
                "namespace_aliasing_clause" => {
                    alias = named_children(part)
                        .first()
                        .map(|n| self.text(*n).to_string());
                }
                _ => {}
            }
        }
        let Some(mut target) = target else { return };
        if let Some(prefix) = prefix {
            target = format!("{}\\{}", prefix, target);
        }
        let alias = alias.unwrap_or_else(|| {
            target
                .rsplit('\\')
                .next()
                .unwrap_or(target.as_str())
                .to_string()
        });
        self.builder.add_use(alias, target);
    }

    fn collect_diagnostics(&mut self, node: Node) {
        if node.is_error() {
            self.diagnostics.push(Diagnostic {
                span: node_span(node),
                message: "syntax error".to_string(),
            });
        } else if node.is_missing() {
            self.diagnostics.push(Diagnostic {
                span: node_span(node),
                message: format!("missing {}", node.kind()),
            });
        }
        for child in named_children(node) {
            self.collect_diagnostics(child);
        }
    }

    /// Resolve a source name to its namespaced form (no leading backslash).
    /// `self`, `static` and `parent` stay unresolved; they are contextual.
    fn resolve_name(&self, text: &str) -> Option<String> {
        crate::naming::resolve_in_context(text, self.namespace.as_deref(), self.builder.uses())
    }

    fn lower_statements(&mut self, stmts: &[Node]) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut i = 0;
        while i < stmts.len() {
            let node = stmts[i];
            if node.kind() == "namespace_definition" {
                let name = node
                    .child_by_field_name("name")
                    .map(|n| self.text(n).to_string());
                let saved = self.namespace.clone();
                self.namespace = name.clone();
                let (inner, consumed_rest) = match node.child_by_field_name("body") {
                    Some(body) => (self.lower_statements(&named_children(body)), false),
                    // Unbraced form: the namespace covers the rest of the file.
                    None => (self.lower_statements(&stmts[i + 1..]), true),
                };
                self.namespace = saved;
                let id = self
                    .builder
                    .push(NodeKind::Namespace { name, stmts: inner }, node_span(node));
                out.push(id);
                if consumed_rest {
                    return out;
                }
                i += 1;
                continue;
            }
            out.extend(self.lower_statement(node));
            i += 1;
        }
        out
    }

    fn lower_statement(&mut self, node: Node) -> Vec<NodeId> {
        match node.kind() {
            "php_tag" | "comment" | "text" | "text_interpolation" | "namespace_use_declaration" => {
                vec![]
            }
            "expression_statement" => named_children(node)
                .first()
                .map(|e| vec![self.lower_expr(*e)])
                .unwrap_or_default(),
            "compound_statement" => self.lower_statements(&named_children(node)),
            "return_statement" => {
                let value = named_children(node).first().map(|e| self.lower_expr(*e));
                vec![self
                    .builder
                    .push(NodeKind::Return { value }, node_span(node))]
            }
            "class_declaration" => vec![self.lower_class(node)],
            "interface_declaration" => vec![self.lower_interface(node)],
            "function_definition" => vec![self.lower_function(node)],
            "const_declaration" => self.lower_const_declaration(node, false),
            _ => vec![self.builder.push(NodeKind::Unknown, node_span(node))],
        }
    }

    fn docblock_before(&self, node: Node) -> Option<String> {
        let sibling = node.prev_named_sibling()?;
        if sibling.kind() == "comment" {
            let text = self.text(sibling);
            if text.starts_with("/**") {
                return Some(text.to_string());
            }
        }
        None
    }

    fn type_hint_text(&self, node: Node, field: &str) -> Option<String> {
        node.child_by_field_name(field)
            .map(|t| self.text(t).trim_start_matches(':').trim().to_string())
            .filter(|t| !t.is_empty())
    }

    fn lower_class(&mut self, node: Node) -> NodeId {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string());
        let doc = self.docblock_before(node);
        let mut extends = None;
        let mut implements = Vec::new();
        let mut members = Vec::new();
        for child in named_children(node) {
            match child.kind() {
                "base_clause" => {
                    extends = named_children(child).first().map(|n| self.lower_name(*n));
                }
                "class_interface_clause" => {
                    implements = named_children(child)
                        .iter()
                        .filter(|n| matches!(n.kind(), "name" | "qualified_name"))
                        .map(|n| self.lower_name(*n))
                        .collect();
                }
                "declaration_list" => {
                    for member in named_children(child) {
                        members.extend(self.lower_class_member(member));
                    }
                }
                _ => {}
            }
        }
        self.builder.push(
            NodeKind::Class {
                name,
                extends,
                implements,
                members,
                doc,
            },
            node_span(node),
        )
    }

    fn lower_interface(&mut self, node: Node) -> NodeId {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string())
            .unwrap_or_default();
        let doc = self.docblock_before(node);
        let mut extends = Vec::new();
        let mut members = Vec::new();
        for child in named_children(node) {
            match child.kind() {
                "base_clause" => {
                    extends = named_children(child)
                        .iter()
                        .filter(|n| matches!(n.kind(), "name" | "qualified_name"))
                        .map(|n| self.lower_name(*n))
                        .collect();
                }
                "declaration_list" => {
                    for member in named_children(child) {
                        members.extend(self.lower_class_member(member));
                    }
                }
                _ => {}
            }
        }
        self.builder.push(
            NodeKind::Interface {
                name,
                extends,
                members,
                doc,
            },
            node_span(node),
        )
    }

    fn lower_class_member(&mut self, node: Node) -> Vec<NodeId> {
        match node.kind() {
            "method_declaration" => vec![self.lower_method(node)],
            "property_declaration" => self.lower_property_declaration(node),
            "const_declaration" => self.lower_const_declaration(node, true),
            "comment" | "use_declaration" => vec![],
            _ => vec![self.builder.push(NodeKind::Unknown, node_span(node))],
        }
    }

    fn lower_function(&mut self, node: Node) -> NodeId {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string())
            .unwrap_or_default();
        let doc = self.docblock_before(node);
        let params = self.lower_params(node.child_by_field_name("parameters"));
        let return_hint = self.type_hint_text(node, "return_type");
        let body = node
            .child_by_field_name("body")
            .map(|b| self.lower_statements(&named_children(b)))
            .unwrap_or_default();
        self.builder.push(
            NodeKind::Function {
                name,
                params,
                return_hint,
                body,
                doc,
            },
            node_span(node),
        )
    }

    fn lower_method(&mut self, node: Node) -> NodeId {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string())
            .unwrap_or_default();
        let doc = self.docblock_before(node);
        let is_static = named_children(node)
            .iter()
            .any(|c| c.kind() == "static_modifier");
        let params = self.lower_params(node.child_by_field_name("parameters"));
        let return_hint = self.type_hint_text(node, "return_type");
        let body = node
            .child_by_field_name("body")
            .map(|b| self.lower_statements(&named_children(b)))
            .unwrap_or_default();
        self.builder.push(
            NodeKind::Method {
                name,
                params,
                return_hint,
                body,
                is_static,
                doc,
            },
            node_span(node),
        )
    }

    fn lower_params(&mut self, params: Option<Node>) -> Vec<NodeId> {
        let Some(params) = params else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for param in named_children(params) {
            if !matches!(
                param.kind(),
                "simple_parameter" | "variadic_parameter" | "property_promotion_parameter"
            ) {
                continue;
            }
            let name = param
                .child_by_field_name("name")
                .map(|n| self.text(n).trim_start_matches('$').to_string())
                .unwrap_or_default();
            let type_hint = self.type_hint_text(param, "type");
            let default = param
                .child_by_field_name("default_value")
                .map(|d| self.lower_expr(d));
            out.push(self.builder.push(
                NodeKind::Param {
                    name,
                    type_hint,
                    default,
                },
                node_span(param),
            ));
        }
        out
    }

    fn lower_property_declaration(&mut self, node: Node) -> Vec<NodeId> {
        let doc = self.docblock_before(node);
        let is_static = named_children(node)
            .iter()
            .any(|c| c.kind() == "static_modifier");
        let type_hint = self.type_hint_text(node, "type");
        let mut out = Vec::new();
        for element in named_children(node) {
            if element.kind() != "property_element" {
                continue;
            }
            let mut name = String::new();
            let mut default = None;
            for part in named_children(element) {
                match part.kind() {
                    "variable_name" => name = self.text(part).trim_start_matches('$').to_string(),
                    "property_initializer" => {
                        default = named_children(part).first().map(|e| self.lower_expr(*e));
                    }
                    _ => default = Some(self.lower_expr(part)),
                }
            }
            out.push(self.builder.push(
                NodeKind::Property {
                    name,
                    type_hint: type_hint.clone(),
                    is_static,
                    default,
                    doc: doc.clone(),
                },
                node_span(element),
            ));
        }
        out
    }

    fn lower_const_declaration(&mut self, node: Node, in_class: bool) -> Vec<NodeId> {
        let doc = self.docblock_before(node);
        let mut out = Vec::new();
        for element in named_children(node) {
            if element.kind() != "const_element" {
                continue;
            }
            let parts = named_children(element);
            let name = parts
                .first()
                .map(|n| self.text(*n).to_string())
                .unwrap_or_default();
            let value = parts.get(1).map(|e| self.lower_expr(*e));
            let kind = if in_class {
                NodeKind::ClassConst {
                    name,
                    value,
                    doc: doc.clone(),
                }
            } else {
                NodeKind::Const {
                    name,
                    value,
                    doc: doc.clone(),
                }
            };
            out.push(self.builder.push(kind, node_span(element)));
        }
        out
    }

    fn lower_name(&mut self, node: Node) -> NodeId {
        let text = self.text(node).to_string();
        let resolved = self.resolve_name(&text);
        self.builder
            .push(NodeKind::Name { text, resolved }, node_span(node))
    }

    /// A class position: a static name, a dynamic expression, or an
    /// anonymous class body (under `new`).
    fn lower_class_ref(&mut self, node: Node) -> NodeId {
        match node.kind() {
            "name" | "qualified_name" => self.lower_name(node),
            _ => self.lower_expr(node),
        }
    }

    fn lower_args(&mut self, node: Node) -> Vec<NodeId> {
        // `new` carries its argument list as a plain child, not a field.
        let args = node.child_by_field_name("arguments").or_else(|| {
            named_children(node)
                .into_iter()
                .find(|c| c.kind() == "arguments")
        });
        let Some(args) = args else {
            return Vec::new();
        };
        named_children(args)
            .iter()
            .filter(|a| a.kind() == "argument")
            .filter_map(|a| named_children(*a).last().map(|e| self.lower_expr(*e)))
            .collect()
    }

    /// Static member name to the right of `->` / `::`, `None` when dynamic.
    fn member_name(&self, node: Node) -> Option<String> {
        let name = node.child_by_field_name("name")?;
        match name.kind() {
            "name" => Some(self.text(name).to_string()),
            "variable_name" => None,
            _ => None,
        }
    }

    fn lower_expr(&mut self, node: Node) -> NodeId {
        let span = node_span(node);
        match node.kind() {
            "parenthesized_expression" => match named_children(node).first() {
                Some(inner) => self.lower_expr(*inner),
                None => self.builder.push(NodeKind::Unknown, span),
            },
            "variable_name" => {
                let name = self.text(node).trim_start_matches('$').to_string();
                self.builder.push(NodeKind::Variable { name }, span)
            }
            "assignment_expression" => {
                let target = node
                    .child_by_field_name("left")
                    .map(|n| self.lower_expr(n))
                    .unwrap_or_else(|| self.builder.push(NodeKind::Unknown, span));
                let value = node
                    .child_by_field_name("right")
                    .map(|n| self.lower_expr(n))
                    .unwrap_or_else(|| self.builder.push(NodeKind::Unknown, span));
                self.builder.push(NodeKind::Assign { target, value }, span)
            }
            "function_call_expression" => {
                let Some(function) = node.child_by_field_name("function") else {
                    return self.builder.push(NodeKind::Unknown, span);
                };
                if matches!(function.kind(), "name" | "qualified_name") {
                    match self.text(function) {
                        "isset" => {
                            let operands = self.lower_args(node);
                            return self.builder.push(NodeKind::Isset { operands }, span);
                        }
                        "empty" => {
                            let operand = self
                                .lower_args(node)
                                .into_iter()
                                .next()
                                .unwrap_or_else(|| self.builder.push(NodeKind::Unknown, span));
                            return self.builder.push(NodeKind::Empty { operand }, span);
                        }
                        _ => {}
                    }
                }
                let callee = self.lower_class_ref(function);
                let args = self.lower_args(node);
                self.builder.push(NodeKind::Call { callee, args }, span)
            }
            "member_call_expression" | "nullsafe_member_call_expression" => {
                let receiver = node
                    .child_by_field_name("object")
                    .map(|n| self.lower_expr(n))
                    .unwrap_or_else(|| self.builder.push(NodeKind::Unknown, span));
                let name = self.member_name(node);
                let args = self.lower_args(node);
                self.builder.push(
                    NodeKind::MethodCall {
                        receiver,
                        name,
                        args,
                    },
                    span,
                )
            }
            "member_access_expression" | "nullsafe_member_access_expression" => {
                let receiver = node
                    .child_by_field_name("object")
                    .map(|n| self.lower_expr(n))
                    .unwrap_or_else(|| self.builder.push(NodeKind::Unknown, span));
                let name = self.member_name(node);
                self.builder
                    .push(NodeKind::PropertyFetch { receiver, name }, span)
            }
            "scoped_call_expression" => {
                let class = node
                    .child_by_field_name("scope")
                    .map(|n| self.lower_class_ref(n))
                    .unwrap_or_else(|| self.builder.push(NodeKind::Unknown, span));
                let name = self.member_name(node);
                let args = self.lower_args(node);
                self.builder
                    .push(NodeKind::StaticCall { class, name, args }, span)
            }
            "scoped_property_access_expression" => {
                let class = node
                    .child_by_field_name("scope")
                    .map(|n| self.lower_class_ref(n))
                    .unwrap_or_else(|| self.builder.push(NodeKind::Unknown, span));
                let name = node
                    .child_by_field_name("name")
                    .filter(|n| n.kind() == "variable_name")
                    .map(|n| self.text(n).trim_start_matches('$').to_string());
                self.builder
                    .push(NodeKind::StaticPropertyFetch { class, name }, span)
            }
            "class_constant_access_expression" => {
                let children = named_children(node);
                let class = children
                    .first()
                    .map(|n| self.lower_class_ref(*n))
                    .unwrap_or_else(|| self.builder.push(NodeKind::Unknown, span));
                let name = children
                    .get(1)
                    .filter(|n| n.kind() == "name")
                    .map(|n| self.text(*n).to_string());
                self.builder
                    .push(NodeKind::ClassConstFetch { class, name }, span)
            }
            "object_creation_expression" => {
                let mut class = None;
                let mut anonymous_body = None;
                for child in named_children(node) {
                    match child.kind() {
                        "name" | "qualified_name" => class = Some(self.lower_name(child)),
                        "declaration_list" => anonymous_body = Some(child),
                        "variable_name"
                        | "member_access_expression"
                        | "subscript_expression"
                        | "parenthesized_expression" => class = Some(self.lower_expr(child)),
                        _ => {}
                    }
                }
                let class = match (class, anonymous_body) {
                    (_, Some(body)) => {
                        let members = named_children(body)
                            .into_iter()
                            .flat_map(|m| self.lower_class_member(m))
                            .collect();
                        self.builder.push(
                            NodeKind::Class {
                                name: None,
                                extends: None,
                                implements: Vec::new(),
                                members,
                                doc: None,
                            },
                            node_span(body),
                        )
                    }
                    (Some(class), None) => class,
                    (None, None) => self.builder.push(NodeKind::Unknown, span),
                };
                let args = self.lower_args(node);
                self.builder.push(NodeKind::New { class, args }, span)
            }
            "clone_expression" => {
                let operand = named_children(node)
                    .last()
                    .map(|n| self.lower_expr(*n))
                    .unwrap_or_else(|| self.builder.push(NodeKind::Unknown, span));
                self.builder.push(NodeKind::Clone { operand }, span)
            }
            "conditional_expression" => {
                let cond = node
                    .child_by_field_name("condition")
                    .map(|n| self.lower_expr(n))
                    .unwrap_or_else(|| self.builder.push(NodeKind::Unknown, span));
                let then = node.child_by_field_name("body").map(|n| self.lower_expr(n));
                let otherwise = node
                    .child_by_field_name("alternative")
                    .map(|n| self.lower_expr(n))
                    .unwrap_or_else(|| self.builder.push(NodeKind::Unknown, span));
                self.builder.push(
                    NodeKind::Ternary {
                        cond,
                        then,
                        otherwise,
                    },
                    span,
                )
            }
            "binary_expression" => self.lower_binary(node),
            "exponentiation_expression" => {
                let children = named_children(node);
                let lhs = children
                    .first()
                    .map(|n| self.lower_expr(*n))
                    .unwrap_or_else(|| self.builder.push(NodeKind::Unknown, span));
                let rhs = children
                    .last()
                    .map(|n| self.lower_expr(*n))
                    .unwrap_or_else(|| self.builder.push(NodeKind::Unknown, span));
                self.builder.push(
                    NodeKind::Binary {
                        op: BinaryOp::Pow,
                        lhs,
                        rhs,
                    },
                    span,
                )
            }
            "unary_op_expression" => {
                let op = match node.child(0).map(|c| c.kind()) {
                    Some("!") => UnaryOp::Not,
                    Some("-") => UnaryOp::Neg,
                    Some("+") => UnaryOp::Plus,
                    Some("~") => UnaryOp::BitNot,
                    _ => {
                        return self.builder.push(NodeKind::Unknown, span);
                    }
                };
                let operand = named_children(node)
                    .last()
                    .map(|n| self.lower_expr(*n))
                    .unwrap_or_else(|| self.builder.push(NodeKind::Unknown, span));
                self.builder.push(NodeKind::Unary { op, operand }, span)
            }
            "cast_expression" => {
                let target = match node
                    .child_by_field_name("type")
                    .map(|t| self.text(t).to_string())
                    .unwrap_or_default()
                    .as_str()
                {
                    "int" | "integer" => CastKind::Int,
                    "float" | "double" | "real" => CastKind::Float,
                    "string" | "binary" => CastKind::String,
                    "bool" | "boolean" => CastKind::Bool,
                    "array" => CastKind::Array,
                    "object" => CastKind::Object,
                    _ => {
                        return self.builder.push(NodeKind::Unknown, span);
                    }
                };
                let operand = node
                    .child_by_field_name("value")
                    .map(|n| self.lower_expr(n))
                    .unwrap_or_else(|| self.builder.push(NodeKind::Unknown, span));
                self.builder.push(NodeKind::Cast { target, operand }, span)
            }
            "array_creation_expression" => {
                let mut items = Vec::new();
                for element in named_children(node) {
                    if element.kind() != "array_element_initializer" {
                        continue;
                    }
                    let parts = named_children(element);
                    let (key, value) = match parts.as_slice() {
                        [value] => (None, self.lower_expr(*value)),
                        [key, value] => (Some(self.lower_expr(*key)), self.lower_expr(*value)),
                        _ => continue,
                    };
                    items.push(
                        self.builder
                            .push(NodeKind::ArrayItem { key, value }, node_span(element)),
                    );
                }
                self.builder.push(NodeKind::Array { items }, span)
            }
            "subscript_expression" => {
                let children = named_children(node);
                let target = children
                    .first()
                    .map(|n| self.lower_expr(*n))
                    .unwrap_or_else(|| self.builder.push(NodeKind::Unknown, span));
                let index = children.get(1).map(|n| self.lower_expr(*n));
                self.builder.push(NodeKind::Index { target, index }, span)
            }
            "include_expression" | "include_once_expression" | "require_expression"
            | "require_once_expression" => {
                let operand = named_children(node)
                    .last()
                    .map(|n| self.lower_expr(*n))
                    .unwrap_or_else(|| self.builder.push(NodeKind::Unknown, span));
                self.builder.push(NodeKind::Include { operand }, span)
            }
            "integer" => self.builder.push(NodeKind::Int(parse_int(self.text(node))), span),
            "float" => {
                let value = self.text(node).replace('_', "").parse().unwrap_or(0.0);
                self.builder.push(NodeKind::Float(value), span)
            }
            "string" | "encapsed_string" | "heredoc" | "nowdoc" | "shell_command_expression" => {
                self.builder
                    .push(NodeKind::Str(self.text(node).to_string()), span)
            }
            "boolean" | "null" => {
                let text = self.text(node).to_lowercase();
                let name = self.builder.push(
                    NodeKind::Name {
                        resolved: Some(text.clone()),
                        text,
                    },
                    span,
                );
                self.builder.push(NodeKind::ConstFetch { name }, span)
            }
            "name" | "qualified_name" => {
                let name = self.lower_name(node);
                self.builder.push(NodeKind::ConstFetch { name }, span)
            }
            "anonymous_function_creation_expression" | "anonymous_function" => {
                let params = self.lower_params(node.child_by_field_name("parameters"));
                let mut captures = Vec::new();
                for child in named_children(node) {
                    if child.kind() == "anonymous_function_use_clause" {
                        for var in named_children(child) {
                            if var.kind() == "variable_name" {
                                captures.push(self.text(var).trim_start_matches('$').to_string());
                            }
                        }
                    }
                }
                let return_hint = self.type_hint_text(node, "return_type");
                let body = node
                    .child_by_field_name("body")
                    .map(|b| self.lower_statements(&named_children(b)))
                    .unwrap_or_default();
                self.builder.push(
                    NodeKind::Closure {
                        params,
                        captures,
                        return_hint,
                        body,
                    },
                    span,
                )
            }
            "arrow_function" => {
                let params = self.lower_params(node.child_by_field_name("parameters"));
                let return_hint = self.type_hint_text(node, "return_type");
                let body = match node.child_by_field_name("body") {
                    Some(expr) => {
                        let value = self.lower_expr(expr);
                        vec![self.builder.push(
                            NodeKind::Return { value: Some(value) },
                            node_span(expr),
                        )]
                    }
                    None => Vec::new(),
                };
                self.builder.push(
                    NodeKind::Closure {
                        params,
                        captures: Vec::new(),
                        return_hint,
                        body,
                    },
                    span,
                )
            }
            _ => self.builder.push(NodeKind::Unknown, span),
        }
    }

    fn lower_binary(&mut self, node: Node) -> NodeId {
        let span = node_span(node);
        let lhs_node = node.child_by_field_name("left");
        let rhs_node = node.child_by_field_name("right");
        let operator = node
            .child_by_field_name("operator")
            .map(|o| self.text(o).to_string())
            .unwrap_or_default();

        let (Some(lhs_node), Some(rhs_node)) = (lhs_node, rhs_node) else {
            return self.builder.push(NodeKind::Unknown, span);
        };

        if operator == "instanceof" {
            let operand = self.lower_expr(lhs_node);
            let class = self.lower_class_ref(rhs_node);
            return self
                .builder
                .push(NodeKind::Instanceof { operand, class }, span);
        }
        if operator == "??" {
            let lhs = self.lower_expr(lhs_node);
            let rhs = self.lower_expr(rhs_node);
            return self.builder.push(NodeKind::Coalesce { lhs, rhs }, span);
        }

        let op = match operator.as_str() {
            "==" => BinaryOp::Eq,
            "!=" | "<>" => BinaryOp::NotEq,
            "===" => BinaryOp::Identical,
            "!==" => BinaryOp::NotIdentical,
            "<" => BinaryOp::Lt,
            ">" => BinaryOp::Gt,
            "<=" => BinaryOp::Le,
            ">=" => BinaryOp::Ge,
            "&&" | "and" => BinaryOp::And,
            "||" | "or" => BinaryOp::Or,
            "xor" => BinaryOp::Xor,
            "." => BinaryOp::Concat,
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            "*" => BinaryOp::Mul,
            "/" => BinaryOp::Div,
            "%" => BinaryOp::Mod,
            "**" => BinaryOp::Pow,
            _ => {
                return self.builder.push(NodeKind::Unknown, span);
            }
        };
        let lhs = self.lower_expr(lhs_node);
        let rhs = self.lower_expr(rhs_node);
        self.builder.push(NodeKind::Binary { op, lhs, rhs }, span)
    }
}

fn parse_int(text: &str) -> i64 {
    let t = text.replace('_', "");
    let parsed = if let Some(hex) = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16)
    } else if let Some(bin) = t.strip_prefix("0b").or_else(|| t.strip_prefix("0B")) {
        i64::from_str_radix(bin, 2)
    } else if let Some(oct) = t.strip_prefix("0o").or_else(|| t.strip_prefix("0O")) {
        i64::from_str_radix(oct, 8)
    } else {
        t.parse()
    };
    parsed.unwrap_or(0)
}
