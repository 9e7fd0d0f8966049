//! Read-only traversal of parsed trees.
//!
//! Implement [`Visit`] and override the hooks you care about; each default
//! hook calls the matching `walk_*` function, which visits the children.
//! An override that still wants the children must call `walk_*` itself.
//!
//! ```rust
//! use tmplparse::visit::{self, Visit};
//! use tmplparse::ast::Node;
//!
//! #[derive(Default)]
//! struct Fields(Vec<String>);
//!
//! impl<'ast> Visit<'ast> for Fields {
//!     fn visit_node(&mut self, node: &'ast Node) {
//!         if let Node::Field(field) = node {
//!             self.0.push(field.ident.join("."));
//!         }
//!         visit::walk_node(self, node);
//!     }
//! }
//!
//! let registry = tmplparse::parse("t", "{{ .A.B }}{{ if .C }}x{{ end }}", "", "", &[])?;
//! let mut fields = Fields::default();
//! fields.visit_list(registry.get("t").unwrap().root());
//! assert_eq!(fields.0, vec!["A.B", "C"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::Serialize;

use crate::ast::{BranchNode, CommandNode, ListNode, Node, NodeKind, PipeNode, VariableNode};
use crate::location::Location;
use crate::registry::Tree;

pub trait Visit<'ast> {
    fn visit_list(&mut self, list: &'ast ListNode) {
        walk_list(self, list);
    }

    fn visit_node(&mut self, node: &'ast Node) {
        walk_node(self, node);
    }

    fn visit_pipe(&mut self, pipe: &'ast PipeNode) {
        walk_pipe(self, pipe);
    }

    fn visit_command(&mut self, command: &'ast CommandNode) {
        walk_command(self, command);
    }

    /// A variable declared at the head of a pipeline. Variables used as
    /// operands arrive through [`Visit::visit_node`].
    fn visit_declaration(&mut self, _variable: &'ast VariableNode) {}
}

pub fn walk_list<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, list: &'ast ListNode) {
    for node in &list.nodes {
        v.visit_node(node);
    }
}

pub fn walk_node<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, node: &'ast Node) {
    match node {
        Node::List(list) => walk_list(v, list),
        Node::Action(action) => v.visit_pipe(&action.pipe),
        Node::Pipe(pipe) => walk_pipe(v, pipe),
        Node::Command(command) => walk_command(v, command),
        Node::Chain(chain) => v.visit_node(&chain.node),
        Node::If(branch) | Node::Range(branch) | Node::With(branch) => walk_branch(v, branch),
        Node::Template(template) => {
            if let Some(pipe) = &template.pipe {
                v.visit_pipe(pipe);
            }
        }
        Node::Text(_)
        | Node::Comment(_)
        | Node::Identifier(_)
        | Node::Variable(_)
        | Node::Dot(_)
        | Node::Nil(_)
        | Node::Field(_)
        | Node::Bool(_)
        | Node::Number(_)
        | Node::String(_)
        | Node::Break(_)
        | Node::Continue(_) => {}
    }
}

pub fn walk_pipe<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, pipe: &'ast PipeNode) {
    for variable in &pipe.decl {
        v.visit_declaration(variable);
    }
    for command in &pipe.cmds {
        v.visit_command(command);
    }
}

pub fn walk_command<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, command: &'ast CommandNode) {
    for arg in &command.args {
        v.visit_node(arg);
    }
}

pub fn walk_branch<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, branch: &'ast BranchNode) {
    v.visit_pipe(&branch.pipe);
    v.visit_list(&branch.list);
    if let Some(else_list) = &branch.else_list {
        v.visit_list(else_list);
    }
}

/// One node's kind and span, with its nesting depth below the root list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub kind: NodeKind,
    pub location: Location,
    pub depth: usize,
}

/// Records every node in pre-order.
#[derive(Debug, Default)]
pub struct SpanCollector {
    pub spans: Vec<Span>,
    depth: usize,
}

impl SpanCollector {
    pub fn new() -> Self {
        Self::default()
    }

    fn enter(&mut self, kind: NodeKind, location: Location) {
        self.spans.push(Span {
            kind,
            location,
            depth: self.depth,
        });
        self.depth += 1;
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }
}

impl<'ast> Visit<'ast> for SpanCollector {
    fn visit_list(&mut self, list: &'ast ListNode) {
        self.enter(NodeKind::List, list.location);
        walk_list(self, list);
        self.leave();
    }

    fn visit_node(&mut self, node: &'ast Node) {
        use crate::location::Located;
        self.enter(node.kind(), node.location());
        walk_node(self, node);
        self.leave();
    }

    fn visit_pipe(&mut self, pipe: &'ast PipeNode) {
        self.enter(NodeKind::Pipe, pipe.location);
        walk_pipe(self, pipe);
        self.leave();
    }

    fn visit_command(&mut self, command: &'ast CommandNode) {
        self.enter(NodeKind::Command, command.location);
        walk_command(self, command);
        self.leave();
    }

    fn visit_declaration(&mut self, variable: &'ast VariableNode) {
        self.enter(NodeKind::Variable, variable.location);
        self.leave();
    }
}

/// Every node of `tree` in pre-order, root list first.
pub fn collect_spans(tree: &Tree) -> Vec<Span> {
    let mut collector = SpanCollector::new();
    collector.visit_list(tree.root());
    collector.spans
}

struct CallFinder<'ast, 'n> {
    name: &'n str,
    found: Vec<&'ast CommandNode>,
}

impl<'ast> Visit<'ast> for CallFinder<'ast, '_> {
    fn visit_command(&mut self, command: &'ast CommandNode) {
        if command.function_name() == Some(self.name) {
            self.found.push(command);
        }
        walk_command(self, command);
    }
}

/// Commands in `tree` that call the function `name`, in source order.
pub fn find_calls<'ast>(tree: &'ast Tree, name: &str) -> Vec<&'ast CommandNode> {
    let mut finder = CallFinder {
        name,
        found: Vec::new(),
    };
    finder.visit_list(tree.root());
    finder.found
}
