//! Arena-backed PHP AST.
//!
//! The parser lowers a tolerant tree-sitter CST into this representation.
//! Nodes live in a flat `Vec` and point at each other through [`NodeId`]
//! indices; child access is by role (the fields of each [`NodeKind`]
//! variant). The back-reference attributes `parent` and `prev_sibling` are
//! populated in a single post-parse walk ([`Ast::link`]) so that scope and
//! name resolution can walk upward and backward without re-traversing.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Byte range of a node in the source document.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

/// Index of a node inside its owning [`Ast`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // comparison
    Eq,
    NotEq,
    Identical,
    NotIdentical,
    Lt,
    Gt,
    Le,
    Ge,
    // logical
    And,
    Or,
    Xor,
    // string
    Concat,
    // arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

impl BinaryOp {
    /// Comparison and logical operators always produce a boolean.
    pub fn is_boolean(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::NotEq
                | BinaryOp::Identical
                | BinaryOp::NotIdentical
                | BinaryOp::Lt
                | BinaryOp::Gt
                | BinaryOp::Le
                | BinaryOp::Ge
                | BinaryOp::And
                | BinaryOp::Or
                | BinaryOp::Xor
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
    Plus,
    BitNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastKind {
    Int,
    Float,
    String,
    Bool,
    Array,
    Object,
}

/// The node variants the semantic core understands.
///
/// Children are stored by role. Anything the lowering pass cannot represent
/// becomes [`NodeKind::Unknown`], which the type resolver widens to `mixed`
/// and every other consumer skips.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Program {
        stmts: Vec<NodeId>,
    },
    /// `namespace Foo\Bar;` — `name` is `None` for the global namespace form.
    Namespace {
        name: Option<String>,
        stmts: Vec<NodeId>,
    },
    /// `name` is `None` for anonymous classes (`new class { .. }`).
    Class {
        name: Option<String>,
        extends: Option<NodeId>,
        implements: Vec<NodeId>,
        members: Vec<NodeId>,
        doc: Option<String>,
    },
    Interface {
        name: String,
        extends: Vec<NodeId>,
        members: Vec<NodeId>,
        doc: Option<String>,
    },
    Function {
        name: String,
        params: Vec<NodeId>,
        return_hint: Option<String>,
        body: Vec<NodeId>,
        doc: Option<String>,
    },
    Method {
        name: String,
        params: Vec<NodeId>,
        return_hint: Option<String>,
        body: Vec<NodeId>,
        is_static: bool,
        doc: Option<String>,
    },
    Property {
        name: String,
        type_hint: Option<String>,
        is_static: bool,
        default: Option<NodeId>,
        doc: Option<String>,
    },
    ClassConst {
        name: String,
        value: Option<NodeId>,
        doc: Option<String>,
    },
    /// Top-level `const NAME = ..;`
    Const {
        name: String,
        value: Option<NodeId>,
        doc: Option<String>,
    },
    Param {
        name: String,
        type_hint: Option<String>,
        default: Option<NodeId>,
    },
    Closure {
        params: Vec<NodeId>,
        captures: Vec<String>,
        return_hint: Option<String>,
        body: Vec<NodeId>,
    },
    Return {
        value: Option<NodeId>,
    },

    /// `$name` — stored without the `$` sigil.
    Variable {
        name: String,
    },
    Assign {
        target: NodeId,
        value: NodeId,
    },
    /// An identifier in name or class position. `resolved` carries the
    /// parse-time namespaced form computed from the file's `use` map.
    Name {
        text: String,
        resolved: Option<String>,
    },
    /// `foo(..)` — `callee` is a `Name` for static names, any other
    /// expression for dynamic calls (`$f(..)`).
    Call {
        callee: NodeId,
        args: Vec<NodeId>,
    },
    /// `$x->m(..)` — `name` is `None` when the method name is dynamic.
    MethodCall {
        receiver: NodeId,
        name: Option<String>,
        args: Vec<NodeId>,
    },
    PropertyFetch {
        receiver: NodeId,
        name: Option<String>,
    },
    /// `Foo::m(..)` — `class` is a `Name` or a dynamic expression.
    StaticCall {
        class: NodeId,
        name: Option<String>,
        args: Vec<NodeId>,
    },
    StaticPropertyFetch {
        class: NodeId,
        name: Option<String>,
    },
    ClassConstFetch {
        class: NodeId,
        name: Option<String>,
    },
    /// `new Foo(..)`, `new $cls(..)`, or `new class { .. }` (the anonymous
    /// form points `class` at a `Class` node with `name: None`).
    New {
        class: NodeId,
        args: Vec<NodeId>,
    },
    Clone {
        operand: NodeId,
    },
    /// `cond ? a : b`; `then` is `None` for the short form `cond ?: b`.
    Ternary {
        cond: NodeId,
        then: Option<NodeId>,
        otherwise: NodeId,
    },
    Coalesce {
        lhs: NodeId,
        rhs: NodeId,
    },
    Binary {
        op: BinaryOp,
        lhs: NodeId,
        rhs: NodeId,
    },
    Unary {
        op: UnaryOp,
        operand: NodeId,
    },
    Cast {
        target: CastKind,
        operand: NodeId,
    },
    Array {
        items: Vec<NodeId>,
    },
    ArrayItem {
        key: Option<NodeId>,
        value: NodeId,
    },
    Index {
        target: NodeId,
        index: Option<NodeId>,
    },
    Include {
        operand: NodeId,
    },
    Instanceof {
        operand: NodeId,
        class: NodeId,
    },
    Isset {
        operands: Vec<NodeId>,
    },
    Empty {
        operand: NodeId,
    },
    /// Bare name in expression position: `true`, `MY_CONST`, `SomeClass`.
    ConstFetch {
        name: NodeId,
    },
    Int(i64),
    Float(f64),
    Str(String),

    /// Unrepresentable or error subtree from the tolerant parse.
    Unknown,
}

impl NodeKind {
    /// Function-like nodes introduce a new variable scope.
    pub fn is_function_like(&self) -> bool {
        matches!(
            self,
            NodeKind::Function { .. } | NodeKind::Method { .. } | NodeKind::Closure { .. }
        )
    }

    /// Child node ids in lexical order, across all roles.
    pub fn children(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut push = |id: &NodeId| out.push(*id);
        match self {
            NodeKind::Program { stmts } | NodeKind::Namespace { stmts, .. } => {
                stmts.iter().for_each(push)
            }
            NodeKind::Class {
                extends,
                implements,
                members,
                ..
            } => {
                extends.iter().for_each(&mut push);
                implements.iter().for_each(&mut push);
                members.iter().for_each(push);
            }
            NodeKind::Interface {
                extends, members, ..
            } => {
                extends.iter().for_each(&mut push);
                members.iter().for_each(push);
            }
            NodeKind::Function { params, body, .. } | NodeKind::Method { params, body, .. } => {
                params.iter().for_each(&mut push);
                body.iter().for_each(push);
            }
            NodeKind::Closure { params, body, .. } => {
                params.iter().for_each(&mut push);
                body.iter().for_each(push);
            }
            NodeKind::Property { default, .. }
            | NodeKind::ClassConst { value: default, .. }
            | NodeKind::Const { value: default, .. }
            | NodeKind::Param { default, .. }
            | NodeKind::Return { value: default } => default.iter().for_each(push),
            NodeKind::Variable { .. }
            | NodeKind::Name { .. }
            | NodeKind::Int(_)
            | NodeKind::Float(_)
            | NodeKind::Str(_)
            | NodeKind::Unknown => {}
            NodeKind::Assign { target, value } => {
                push(target);
                push(value);
            }
            NodeKind::Call { callee, args } => {
                push(callee);
                args.iter().for_each(push);
            }
            NodeKind::MethodCall { receiver, args, .. } => {
                push(receiver);
                args.iter().for_each(push);
            }
            NodeKind::PropertyFetch { receiver, .. } => push(receiver),
            NodeKind::StaticCall { class, args, .. } => {
                push(class);
                args.iter().for_each(push);
            }
            NodeKind::StaticPropertyFetch { class, .. }
            | NodeKind::ClassConstFetch { class, .. } => push(class),
            NodeKind::New { class, args } => {
                push(class);
                args.iter().for_each(push);
            }
            NodeKind::Clone { operand }
            | NodeKind::Unary { operand, .. }
            | NodeKind::Cast { operand, .. }
            | NodeKind::Include { operand }
            | NodeKind::Empty { operand } => push(operand),
            NodeKind::Ternary {
                cond,
                then,
                otherwise,
            } => {
                push(cond);
                then.iter().for_each(&mut push);
                push(otherwise);
            }
            NodeKind::Coalesce { lhs, rhs } | NodeKind::Binary { lhs, rhs, .. } => {
                push(lhs);
                push(rhs);
            }
            NodeKind::Array { items } => items.iter().for_each(push),
            NodeKind::ArrayItem { key, value } => {
                key.iter().for_each(&mut push);
                push(value);
            }
            NodeKind::Index { target, index } => {
                push(target);
                index.iter().for_each(push);
            }
            NodeKind::Instanceof { operand, class } => {
                push(operand);
                push(class);
            }
            NodeKind::Isset { operands } => operands.iter().for_each(push),
            NodeKind::ConstFetch { name } => push(name),
        }
        out
    }
}

#[derive(Debug, Clone)]
pub struct NodeData {
    pub kind: NodeKind,
    pub span: Span,
    pub parent: Option<NodeId>,
    pub prev_sibling: Option<NodeId>,
}

/// One parsed document's syntax tree plus its `use` import map
/// (alias or short name -> fully qualified name, no leading backslash).
#[derive(Debug, Clone)]
pub struct Ast {
    nodes: Vec<NodeData>,
    root: NodeId,
    pub uses: HashMap<String, String>,
}

impl Ast {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.nodes[id.index()].span
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].prev_sibling
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// The enclosing namespace of `id`, or `None` in the global namespace.
    pub fn namespace_of(&self, id: NodeId) -> Option<String> {
        let mut current = self.parent(id);
        while let Some(p) = current {
            if let NodeKind::Namespace { name, .. } = self.kind(p) {
                return name.clone();
            }
            current = self.parent(p);
        }
        None
    }

    /// The innermost enclosing class or interface declaration of `id`.
    pub fn enclosing_class(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.parent(id);
        while let Some(p) = current {
            if matches!(
                self.kind(p),
                NodeKind::Class { .. } | NodeKind::Interface { .. }
            ) {
                return Some(p);
            }
            current = self.parent(p);
        }
        None
    }

    /// The smallest node whose span contains `offset`, used to map editor
    /// positions onto the tree.
    pub fn node_at_offset(&self, offset: usize) -> Option<NodeId> {
        let mut best: Option<NodeId> = None;
        for id in self.ids() {
            let span = self.span(id);
            if !span.contains(offset) {
                continue;
            }
            match best {
                Some(b) => {
                    let bs = self.span(b);
                    if span.end - span.start <= bs.end - bs.start {
                        best = Some(id);
                    }
                }
                None => best = Some(id),
            }
        }
        best
    }
}

/// Incremental arena construction used by the lowering pass and by tests.
///
/// The builder hands out ids as nodes are pushed; `finish` runs the link
/// walk that fills in `parent` and `prev_sibling`.
pub struct AstBuilder {
    nodes: Vec<NodeData>,
    uses: HashMap<String, String>,
}

impl AstBuilder {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            uses: HashMap::new(),
        }
    }

    pub fn push(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            kind,
            span,
            parent: None,
            prev_sibling: None,
        });
        id
    }

    pub fn add_use(&mut self, alias: String, target: String) {
        self.uses.insert(alias, target);
    }

    pub fn uses(&self) -> &HashMap<String, String> {
        &self.uses
    }

    pub fn finish(self, root: NodeId) -> Ast {
        let mut ast = Ast {
            nodes: self.nodes,
            root,
            uses: self.uses,
        };
        ast.link();
        ast
    }
}

impl Default for AstBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Ast {
    /// Single walk attaching `parent` and `prev_sibling` to every node.
    fn link(&mut self) {
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let children = self.kind(id).children();
            let mut prev: Option<NodeId> = None;
            for child in children {
                self.nodes[child.index()].parent = Some(id);
                self.nodes[child.index()].prev_sibling = prev;
                prev = Some(child);
                stack.push(child);
            }
        }
    }
}
