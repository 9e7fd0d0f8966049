//! Abstract syntax tree.
//!
//! [`Node`] is the closed set of node variants that can appear in a list or
//! as a command argument. Pipes, commands and variables also have their own
//! structs so the places that always hold one can say so in their types.
//! Every node type implements [`Located`].

use std::fmt;

use serde::Serialize;

use crate::location::{Located, Location};
use crate::parse::number::NumberValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    List,
    Text,
    Comment,
    Action,
    Pipe,
    Command,
    Identifier,
    Variable,
    Dot,
    Nil,
    Field,
    Chain,
    Bool,
    Number,
    String,
    If,
    Range,
    With,
    Template,
    Break,
    Continue,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Node {
    List(ListNode),
    Text(TextNode),
    Comment(CommentNode),
    Action(ActionNode),
    Pipe(PipeNode),
    Command(CommandNode),
    Identifier(IdentifierNode),
    Variable(VariableNode),
    Dot(DotNode),
    Nil(NilNode),
    Field(FieldNode),
    Chain(ChainNode),
    Bool(BoolNode),
    Number(NumberNode),
    String(StringNode),
    If(BranchNode),
    Range(BranchNode),
    With(BranchNode),
    Template(TemplateNode),
    Break(BreakNode),
    Continue(ContinueNode),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::List(_) => NodeKind::List,
            Node::Text(_) => NodeKind::Text,
            Node::Comment(_) => NodeKind::Comment,
            Node::Action(_) => NodeKind::Action,
            Node::Pipe(_) => NodeKind::Pipe,
            Node::Command(_) => NodeKind::Command,
            Node::Identifier(_) => NodeKind::Identifier,
            Node::Variable(_) => NodeKind::Variable,
            Node::Dot(_) => NodeKind::Dot,
            Node::Nil(_) => NodeKind::Nil,
            Node::Field(_) => NodeKind::Field,
            Node::Chain(_) => NodeKind::Chain,
            Node::Bool(_) => NodeKind::Bool,
            Node::Number(_) => NodeKind::Number,
            Node::String(_) => NodeKind::String,
            Node::If(_) => NodeKind::If,
            Node::Range(_) => NodeKind::Range,
            Node::With(_) => NodeKind::With,
            Node::Template(_) => NodeKind::Template,
            Node::Break(_) => NodeKind::Break,
            Node::Continue(_) => NodeKind::Continue,
        }
    }

    /// Whether the node is a placeholder body: whitespace-only text,
    /// comments, and lists made only of those. Any action counts as content.
    pub fn is_empty_tree(&self) -> bool {
        match self {
            Node::Text(text) => text.text.trim().is_empty(),
            Node::Comment(_) => true,
            Node::List(list) => list.is_empty_tree(),
            _ => false,
        }
    }
}

impl Located for Node {
    fn location(&self) -> Location {
        match self {
            Node::List(n) => n.location,
            Node::Text(n) => n.location,
            Node::Comment(n) => n.location,
            Node::Action(n) => n.location,
            Node::Pipe(n) => n.location,
            Node::Command(n) => n.location,
            Node::Identifier(n) => n.location,
            Node::Variable(n) => n.location,
            Node::Dot(n) => n.location,
            Node::Nil(n) => n.location,
            Node::Field(n) => n.location,
            Node::Chain(n) => n.location,
            Node::Bool(n) => n.location,
            Node::Number(n) => n.location,
            Node::String(n) => n.location,
            Node::If(n) | Node::Range(n) | Node::With(n) => n.location,
            Node::Template(n) => n.location,
            Node::Break(n) => n.location,
            Node::Continue(n) => n.location,
        }
    }
}

/// A sequence of nodes: a template body, a branch body, or an else branch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListNode {
    pub location: Location,
    pub nodes: Vec<Node>,
}

impl ListNode {
    pub fn is_empty_tree(&self) -> bool {
        self.nodes.iter().all(Node::is_empty_tree)
    }
}

/// Literal text outside actions, after trim markers have been applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextNode {
    pub location: Location,
    pub text: String,
}

/// `/* ... */`, including the comment markers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentNode {
    pub location: Location,
    pub text: String,
}

/// A non-control action such as `{{ .Values.name | quote }}`.
///
/// The location covers only the first token of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionNode {
    pub location: Location,
    pub pipe: PipeNode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipeNode {
    pub location: Location,
    /// The declarations were made with `=` rather than `:=`.
    pub is_assign: bool,
    pub decl: Vec<VariableNode>,
    pub cmds: Vec<CommandNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandNode {
    pub location: Location,
    pub args: Vec<Node>,
}

impl CommandNode {
    /// Name of the function this command calls, if it calls one.
    pub fn function_name(&self) -> Option<&str> {
        match self.args.first() {
            Some(Node::Identifier(ident)) => Some(&ident.ident),
            _ => None,
        }
    }
}

/// A function name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdentifierNode {
    pub location: Location,
    pub ident: String,
}

/// `$x`, possibly followed by fields: `$x.Spec.Name` has ident
/// `["$x", "Spec", "Name"]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableNode {
    pub location: Location,
    pub ident: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DotNode {
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NilNode {
    pub location: Location,
}

/// `.Values.foobar`: ident `["Values", "foobar"]`, span from the leading dot
/// through the last segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldNode {
    pub location: Location,
    pub ident: Vec<String>,
}

/// Field access on a term that is neither `.` nor a variable, e.g.
/// `(index . 0).Name`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainNode {
    pub location: Location,
    pub node: Box<Node>,
    pub field: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoolNode {
    pub location: Location,
    pub value: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberNode {
    pub location: Location,
    /// The literal as written.
    pub text: String,
    #[serde(flatten)]
    pub value: NumberValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StringNode {
    pub location: Location,
    /// The literal as written, quotes included.
    pub quoted: String,
    /// Decoded value. Byte escapes that do not form valid UTF-8 (`"\xff"`)
    /// decode to U+FFFD; `quoted` keeps the exact bytes.
    pub text: String,
}

/// Shared shape of `if`, `range` and `with`.
///
/// The location runs from the start of the pipeline to the end of the
/// closing `end` keyword; the opening keyword and the closing delimiter are
/// not part of it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchNode {
    pub location: Location,
    pub pipe: PipeNode,
    pub list: ListNode,
    pub else_list: Option<ListNode>,
}

/// `{{template "name" pipeline}}`, also produced for `{{block}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateNode {
    pub location: Location,
    pub name: String,
    pub pipe: Option<PipeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakNode {
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContinueNode {
    pub location: Location,
}

macro_rules! impl_located {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Located for $ty {
                fn location(&self) -> Location {
                    self.location
                }
            }
        )*
    };
}

impl_located!(
    ListNode,
    TextNode,
    CommentNode,
    ActionNode,
    PipeNode,
    CommandNode,
    IdentifierNode,
    VariableNode,
    DotNode,
    NilNode,
    FieldNode,
    ChainNode,
    BoolNode,
    NumberNode,
    StringNode,
    BranchNode,
    TemplateNode,
    BreakNode,
    ContinueNode,
);

// Display renders nodes back into normalized template source.

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::List(n) => n.fmt(f),
            Node::Text(n) => f.write_str(&n.text),
            Node::Comment(n) => write!(f, "{{{{{}}}}}", n.text),
            Node::Action(n) => write!(f, "{{{{{}}}}}", n.pipe),
            Node::Pipe(n) => write!(f, "({n})"),
            Node::Command(n) => n.fmt(f),
            Node::Identifier(n) => f.write_str(&n.ident),
            Node::Variable(n) => f.write_str(&n.ident.join(".")),
            Node::Dot(_) => f.write_str("."),
            Node::Nil(_) => f.write_str("nil"),
            Node::Field(n) => {
                for ident in &n.ident {
                    write!(f, ".{ident}")?;
                }
                Ok(())
            }
            Node::Chain(n) => {
                match n.node.as_ref() {
                    Node::Pipe(pipe) => write!(f, "({pipe})")?,
                    other => write!(f, "{other}")?,
                }
                for field in &n.field {
                    write!(f, ".{field}")?;
                }
                Ok(())
            }
            Node::Bool(n) => write!(f, "{}", n.value),
            Node::Number(n) => f.write_str(&n.text),
            Node::String(n) => f.write_str(&n.quoted),
            Node::If(n) => fmt_branch(f, "if", n),
            Node::Range(n) => fmt_branch(f, "range", n),
            Node::With(n) => fmt_branch(f, "with", n),
            Node::Template(n) => match &n.pipe {
                Some(pipe) => write!(f, "{{{{template {:?} {pipe}}}}}", n.name),
                None => write!(f, "{{{{template {:?}}}}}", n.name),
            },
            Node::Break(_) => f.write_str("{{break}}"),
            Node::Continue(_) => f.write_str("{{continue}}"),
        }
    }
}

fn fmt_branch(f: &mut fmt::Formatter<'_>, keyword: &str, branch: &BranchNode) -> fmt::Result {
    write!(f, "{{{{{keyword} {}}}}}{}", branch.pipe, branch.list)?;
    if let Some(else_list) = &branch.else_list {
        write!(f, "{{{{else}}}}{else_list}")?;
    }
    f.write_str("{{end}}")
}

impl fmt::Display for ListNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            write!(f, "{node}")?;
        }
        Ok(())
    }
}

impl fmt::Display for PipeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.decl.is_empty() {
            let names: Vec<String> = self.decl.iter().map(|v| v.ident.join(".")).collect();
            let op = if self.is_assign { "=" } else { ":=" };
            write!(f, "{} {op} ", names.join(", "))?;
        }
        for (i, cmd) in self.cmds.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{cmd}")?;
        }
        Ok(())
    }
}

impl fmt::Display for CommandNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{arg}")?;
        }
        Ok(())
    }
}
