//! Recursive-descent template parser.
//!
//! The parser pulls tokens from [`lexer`] and builds nodes depth-first,
//! stamping each node with its [`Location`] before handing it to the caller.
//! Span rules that are not simply "first token to last token":
//!
//! - An action's location is the first token of its pipeline.
//! - `if`, `range` and `with` run from the start of their pipeline to the end
//!   of the `end` keyword.
//! - A nested list runs from its first token to the end of the keyword that
//!   closes it (`end` or `else`); the root list runs to end of input.
//! - A parenthesized pipeline used as an argument includes its parentheses,
//!   so the command and pipeline around it end at the `)`.

pub mod lexer;
pub mod literal;
pub mod number;
pub mod token;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::ast::{
    ActionNode, BoolNode, BranchNode, BreakNode, ChainNode, CommandNode, CommentNode,
    ContinueNode, DotNode, FieldNode, IdentifierNode, ListNode, NilNode, Node, NumberNode,
    PipeNode, StringNode, TemplateNode, TextNode, VariableNode,
};
use crate::error::{ErrorKind, ParseError};
use crate::location::{Located, Location};
use crate::options::ParseOptions;
use crate::registry::Tree;
use lexer::LexOptions;
use token::{Keyword, Token, TokenKind};

/// What [`Parser::text_or_action`] found.
enum Item {
    Node(Node),
    /// `{{end}}`, located at the keyword.
    End(Location),
    /// `{{else}}`, located at the keyword.
    Else(Location),
}

/// Scope state that `define` and `block` bodies start afresh.
struct Scope {
    vars: Vec<String>,
    range_depth: usize,
}

impl Default for Scope {
    fn default() -> Self {
        Self {
            vars: vec!["$".to_string()],
            range_depth: 0,
        }
    }
}

pub(crate) struct Parser<'a> {
    /// Name of the template being parsed, used in error messages.
    name: String,
    source: &'a str,
    shared_source: Arc<str>,
    options: &'a ParseOptions,
    tokens: Vec<Token<'a>>,
    cursor: usize,
    scope: Scope,
    depth: usize,
    trees: HashMap<String, Tree>,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(name: &str, source: &'a str, options: &'a ParseOptions) -> Self {
        let lex_options = LexOptions {
            emit_comment: options.parse_comments,
            break_ok: !options.has_function("break"),
            continue_ok: !options.has_function("continue"),
        };
        let tokens = lexer::lex(
            source,
            options.left_delim(),
            options.right_delim(),
            lex_options,
        );
        trace!("lexed {} tokens for template {:?}", tokens.len(), name);
        Self {
            name: name.to_string(),
            source,
            shared_source: Arc::from(source),
            options,
            tokens,
            cursor: 0,
            scope: Scope::default(),
            depth: 0,
            trees: HashMap::new(),
        }
    }

    /// Trees completed so far: the main template on success, plus every
    /// `define` and `block` finished before any error.
    pub(crate) fn into_trees(self) -> impl Iterator<Item = Tree> {
        self.trees.into_values()
    }

    /// Parse the whole input as the template named at construction.
    pub(crate) fn parse(&mut self) -> Result<(), ParseError> {
        let start = self.peek().location.position;
        let mut nodes = Vec::new();
        while !self.peek().is(TokenKind::Eof) {
            if self.peek().is(TokenKind::LeftDelim) {
                let mark = self.cursor;
                self.next();
                let keyword = self.next_non_space();
                if keyword.is(TokenKind::Keyword(Keyword::Define)) {
                    self.parse_definition(&keyword)?;
                    continue;
                }
                self.cursor = mark;
            }
            match self.text_or_action()? {
                Item::Node(node) => nodes.push(node),
                Item::End(location) => return Err(self.syntax(location, "unexpected {{end}}")),
                Item::Else(location) => return Err(self.syntax(location, "unexpected {{else}}")),
            }
        }
        let root = ListNode {
            location: Location::span(start, self.peek().location.position),
            nodes,
        };
        let name = self.name.clone();
        self.add_tree(name, root)
    }

    // Token stream.

    fn peek(&self) -> &Token<'a> {
        let last = self.tokens.len() - 1;
        &self.tokens[self.cursor.min(last)]
    }

    fn next(&mut self) -> Token<'a> {
        let token = self.peek().clone();
        if self.cursor < self.tokens.len() {
            self.cursor += 1;
        }
        token
    }

    /// Location of the most recently consumed token.
    fn previous(&self) -> Location {
        self.tokens[self.cursor.saturating_sub(1)].location
    }

    fn backup(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    fn skip_spaces(&mut self) {
        while self.peek().is(TokenKind::Space) {
            self.cursor += 1;
        }
    }

    fn next_non_space(&mut self) -> Token<'a> {
        self.skip_spaces();
        self.next()
    }

    fn peek_non_space(&mut self) -> Token<'a> {
        self.skip_spaces();
        self.peek().clone()
    }

    fn expect(&mut self, kind: TokenKind, context: &str) -> Result<Token<'a>, ParseError> {
        let token = self.next_non_space();
        if !token.is(kind) {
            return Err(self.unexpected(&token, context));
        }
        Ok(token)
    }

    // Errors.

    fn error(&self, kind: ErrorKind, location: Location, message: String) -> ParseError {
        let line = line_of(self.source, location.position);
        debug!(
            "parse of {:?} failed at {}: {}",
            self.name, location, message
        );
        ParseError {
            kind,
            name: self.name.clone(),
            location,
            line,
            message,
        }
    }

    fn syntax(&self, location: Location, message: impl Into<String>) -> ParseError {
        self.error(ErrorKind::Syntax, location, message.into())
    }

    fn unexpected(&self, token: &Token<'_>, context: &str) -> ParseError {
        if token.is(TokenKind::Error) {
            return self.error(ErrorKind::Lex, token.location, token.text.to_string());
        }
        self.syntax(token.location, format!("unexpected {token} in {context}"))
    }

    fn descend(&mut self, at: Location) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.options.max_depth {
            return Err(self.error(
                ErrorKind::InternalLimit,
                at,
                format!("max nesting depth {} exceeded", self.options.max_depth),
            ));
        }
        Ok(())
    }

    fn ascend(&mut self) {
        self.depth -= 1;
    }

    // Trees.

    fn add_tree(&mut self, name: String, root: ListNode) -> Result<(), ParseError> {
        if let Some(existing) = self.trees.get(&name)
            && !existing.root.is_empty_tree()
        {
            if root.is_empty_tree() {
                return Ok(());
            }
            return Err(self.syntax(
                root.location,
                format!("multiple definition of template {name:?}"),
            ));
        }
        debug!("completed template {:?} spanning {}", name, root.location);
        let tree = Tree::new(
            name.clone(),
            self.name.clone(),
            root,
            Arc::clone(&self.shared_source),
        );
        self.trees.insert(name, tree);
        Ok(())
    }

    /// `{{define "name"}} ... {{end}}`; the `define` keyword is consumed.
    fn parse_definition(&mut self, keyword: &Token<'a>) -> Result<(), ParseError> {
        const CONTEXT: &str = "define clause";
        let name_token = self.next_non_space();
        let name = self.template_name(&name_token, CONTEXT)?;
        self.expect(TokenKind::RightDelim, CONTEXT)?;
        let root = self.isolated_body(keyword, CONTEXT)?;
        self.add_tree(name, root)
    }

    /// Parse a `define` or `block` body with its own variable scope.
    fn isolated_body(&mut self, keyword: &Token<'a>, context: &str) -> Result<ListNode, ParseError> {
        self.descend(keyword.location)?;
        let outer = std::mem::take(&mut self.scope);
        let result = self.item_list(keyword, context);
        self.scope = outer;
        let (list, terminator) = result?;
        if let Item::Else(location) = terminator {
            return Err(self.syntax(location, format!("unexpected {{{{else}}}} in {context}")));
        }
        self.ascend();
        Ok(list)
    }

    fn template_name(&self, token: &Token<'a>, context: &str) -> Result<String, ParseError> {
        match token.kind {
            TokenKind::String | TokenKind::RawString => literal::unquote(&token.text)
                .map_err(|message| self.syntax(token.location, message)),
            _ => Err(self.unexpected(token, context)),
        }
    }

    // Grammar.

    /// Nodes up to the `end` or `else` that closes `opener`.
    fn item_list(
        &mut self,
        opener: &Token<'a>,
        context: &str,
    ) -> Result<(ListNode, Item), ParseError> {
        let start = self.peek_non_space().location.position;
        let mut nodes = Vec::new();
        while !self.peek_non_space().is(TokenKind::Eof) {
            match self.text_or_action()? {
                Item::Node(node) => nodes.push(node),
                terminator @ (Item::End(keyword) | Item::Else(keyword)) => {
                    let list = ListNode {
                        location: Location::span(start, keyword.end()),
                        nodes,
                    };
                    return Ok((list, terminator));
                }
            }
        }
        Err(self.syntax(
            opener.location,
            format!("unexpected EOF: unclosed {context}"),
        ))
    }

    fn text_or_action(&mut self) -> Result<Item, ParseError> {
        let token = self.next_non_space();
        match token.kind {
            TokenKind::Text => Ok(Item::Node(Node::Text(TextNode {
                location: token.location,
                text: token.text.into_owned(),
            }))),
            TokenKind::LeftDelim => self.action(),
            TokenKind::Comment => Ok(Item::Node(Node::Comment(CommentNode {
                location: token.location,
                text: token.text.into_owned(),
            }))),
            _ => Err(self.unexpected(&token, "input")),
        }
    }

    /// Everything after a left delimiter.
    fn action(&mut self) -> Result<Item, ParseError> {
        let token = self.next_non_space();
        let node = match token.kind {
            TokenKind::Keyword(Keyword::Block) => self.block_control(&token)?,
            TokenKind::Keyword(Keyword::Break) => self.break_control(&token)?,
            TokenKind::Keyword(Keyword::Continue) => self.continue_control(&token)?,
            TokenKind::Keyword(Keyword::Else) => return self.else_control(&token),
            TokenKind::Keyword(Keyword::End) => return self.end_control(&token),
            TokenKind::Keyword(Keyword::If) => Node::If(self.parse_control(&token, "if")?),
            TokenKind::Keyword(Keyword::Range) => Node::Range(self.parse_control(&token, "range")?),
            TokenKind::Keyword(Keyword::Template) => self.template_control()?,
            TokenKind::Keyword(Keyword::With) => Node::With(self.parse_control(&token, "with")?),
            _ => {
                self.backup();
                let pipe = self.pipeline("command", TokenKind::RightDelim)?;
                Node::Action(ActionNode {
                    location: token.location,
                    pipe,
                })
            }
        };
        Ok(Item::Node(node))
    }

    fn break_control(&mut self, keyword: &Token<'a>) -> Result<Node, ParseError> {
        let token = self.next_non_space();
        if !token.is(TokenKind::RightDelim) {
            return Err(self.unexpected(&token, "{{break}}"));
        }
        if self.scope.range_depth == 0 {
            return Err(self.syntax(keyword.location, "{{break}} outside {{range}}"));
        }
        Ok(Node::Break(BreakNode {
            location: keyword.location,
        }))
    }

    fn continue_control(&mut self, keyword: &Token<'a>) -> Result<Node, ParseError> {
        let token = self.next_non_space();
        if !token.is(TokenKind::RightDelim) {
            return Err(self.unexpected(&token, "{{continue}}"));
        }
        if self.scope.range_depth == 0 {
            return Err(self.syntax(keyword.location, "{{continue}} outside {{range}}"));
        }
        Ok(Node::Continue(ContinueNode {
            location: keyword.location,
        }))
    }

    fn end_control(&mut self, keyword: &Token<'a>) -> Result<Item, ParseError> {
        self.expect(TokenKind::RightDelim, "end")?;
        Ok(Item::End(keyword.location))
    }

    /// `{{else}}`, or the `else` of `{{else if ...}}` / `{{else with ...}}`,
    /// whose `if`/`with` is left in the stream for [`Self::parse_control`].
    fn else_control(&mut self, keyword: &Token<'a>) -> Result<Item, ParseError> {
        let peek = self.peek_non_space();
        if !matches!(
            peek.kind,
            TokenKind::Keyword(Keyword::If) | TokenKind::Keyword(Keyword::With)
        ) {
            self.expect(TokenKind::RightDelim, "else")?;
        }
        Ok(Item::Else(keyword.location))
    }

    /// Body of `if`, `range` or `with`; the keyword is consumed.
    fn parse_control(&mut self, keyword: &Token<'a>, context: &str) -> Result<BranchNode, ParseError> {
        self.descend(keyword.location)?;
        let scope_len = self.scope.vars.len();
        let pipe = self.pipeline(context, TokenKind::RightDelim)?;
        let is_range = context == "range";
        if is_range {
            self.scope.range_depth += 1;
        }
        let (list, terminator) = self.item_list(keyword, context)?;
        if is_range {
            self.scope.range_depth -= 1;
        }

        let else_list = match terminator {
            Item::Else(_) => Some(self.else_branch(keyword, context)?),
            _ => None,
        };

        self.scope.vars.truncate(scope_len);
        self.ascend();

        let end = else_list.as_ref().unwrap_or(&list).location.end();
        trace!("{} spans {}..{}", context, pipe.location.position, end);
        Ok(BranchNode {
            location: Location::span(pipe.location.position, end),
            pipe,
            list,
            else_list,
        })
    }

    fn else_branch(&mut self, opener: &Token<'a>, context: &str) -> Result<ListNode, ParseError> {
        let chained = match (context, self.peek().kind) {
            ("if", TokenKind::Keyword(Keyword::If)) => Some("if"),
            ("with", TokenKind::Keyword(Keyword::With)) => Some("with"),
            _ => None,
        };
        if let Some(chained) = chained {
            // `{{else if x}}` reads as `{{else}}{{if x}}...{{end}}` sharing one `{{end}}`.
            let keyword = self.next();
            let branch = self.parse_control(&keyword, chained)?;
            let location = Location::span(keyword.location.position, branch.location.end());
            let node = match chained {
                "if" => Node::If(branch),
                _ => Node::With(branch),
            };
            return Ok(ListNode {
                location,
                nodes: vec![node],
            });
        }

        let (list, terminator) = self.item_list(opener, context)?;
        if let Item::Else(location) = terminator {
            return Err(self.syntax(location, "expected end; found {{else}}"));
        }
        Ok(list)
    }

    /// `{{template "name" [pipeline]}}`
    fn template_control(&mut self) -> Result<Node, ParseError> {
        const CONTEXT: &str = "template clause";
        let name_token = self.next_non_space();
        let name = self.template_name(&name_token, CONTEXT)?;
        let pipe = if self.next_non_space().is(TokenKind::RightDelim) {
            None
        } else {
            self.backup();
            Some(self.pipeline(CONTEXT, TokenKind::RightDelim)?)
        };
        let end = pipe
            .as_ref()
            .map_or(name_token.location.end(), |p| p.location.end());
        Ok(Node::Template(TemplateNode {
            location: Location::span(name_token.location.position, end),
            name,
            pipe,
        }))
    }

    /// `{{block "name" pipeline}} ... {{end}}` defines a template and
    /// invokes it in place.
    fn block_control(&mut self, keyword: &Token<'a>) -> Result<Node, ParseError> {
        const CONTEXT: &str = "block clause";
        let name_token = self.next_non_space();
        let name = self.template_name(&name_token, CONTEXT)?;
        let pipe = self.pipeline(CONTEXT, TokenKind::RightDelim)?;
        let root = self.isolated_body(keyword, CONTEXT)?;
        self.add_tree(name.clone(), root)?;
        Ok(Node::Template(TemplateNode {
            location: Location::span(name_token.location.position, pipe.location.end()),
            name,
            pipe: Some(pipe),
        }))
    }

    /// `[decl :=] command [| command]...` up to `end`.
    fn pipeline(&mut self, context: &str, end: TokenKind) -> Result<PipeNode, ParseError> {
        let start = self.peek_non_space().location.position;
        let mut decl = Vec::new();
        let mut is_assign = false;

        while self.peek_non_space().is(TokenKind::Variable) {
            let mark = self.cursor;
            let variable = self.next();
            let next = self.peek_non_space();
            match next.kind {
                TokenKind::Assign | TokenKind::Declare => {
                    is_assign = next.is(TokenKind::Assign);
                    self.next_non_space();
                    decl.push(self.declare(&variable));
                    break;
                }
                TokenKind::Char if next.text == "," => {
                    self.next_non_space();
                    decl.push(self.declare(&variable));
                    if context == "range" && decl.len() < 2 {
                        let following = self.peek_non_space();
                        match following.kind {
                            TokenKind::Variable | TokenKind::RightDelim | TokenKind::RightParen => {
                                continue;
                            }
                            _ => {
                                return Err(self.syntax(
                                    following.location,
                                    "range can only initialize variables",
                                ));
                            }
                        }
                    }
                    return Err(self.syntax(
                        next.location,
                        format!("too many declarations in {context}"),
                    ));
                }
                _ => {
                    self.cursor = mark;
                    break;
                }
            }
        }

        let mut cmds = Vec::new();
        loop {
            let token = self.next_non_space();
            if token.is(end) {
                self.check_pipeline(&cmds, &token, context)?;
                let end = cmds.last().map_or(start, |c: &CommandNode| c.location.end());
                return Ok(PipeNode {
                    location: Location::span(start, end),
                    is_assign,
                    decl,
                    cmds,
                });
            }
            match token.kind {
                TokenKind::Bool
                | TokenKind::CharConstant
                | TokenKind::Complex
                | TokenKind::Keyword(Keyword::Dot)
                | TokenKind::Field
                | TokenKind::Identifier
                | TokenKind::Number
                | TokenKind::Keyword(Keyword::Nil)
                | TokenKind::RawString
                | TokenKind::String
                | TokenKind::Variable
                | TokenKind::LeftParen => {
                    self.backup();
                    cmds.push(self.command()?);
                }
                _ => return Err(self.unexpected(&token, context)),
            }
        }
    }

    fn declare(&mut self, variable: &Token<'a>) -> VariableNode {
        self.scope.vars.push(variable.text.to_string());
        VariableNode {
            location: variable.location,
            ident: vec![variable.text.to_string()],
        }
    }

    fn check_pipeline(
        &self,
        cmds: &[CommandNode],
        end: &Token<'a>,
        context: &str,
    ) -> Result<(), ParseError> {
        if cmds.is_empty() {
            return Err(self.syntax(end.location, format!("missing value for {context}")));
        }
        for (i, cmd) in cmds.iter().enumerate().skip(1) {
            if let Some(
                Node::Bool(_) | Node::Dot(_) | Node::Nil(_) | Node::Number(_) | Node::String(_),
            ) = cmd.args.first()
            {
                return Err(self.syntax(
                    cmd.location,
                    format!("non executable command in pipeline stage {}", i + 1),
                ));
            }
        }
        Ok(())
    }

    /// Space-separated operands up to `|`, `)` or the right delimiter.
    fn command(&mut self) -> Result<CommandNode, ParseError> {
        let start = self.peek_non_space().location.position;
        let mut args = Vec::new();
        loop {
            self.skip_spaces();
            if let Some(operand) = self.operand()? {
                args.push(operand);
            }
            let token = self.next();
            match token.kind {
                TokenKind::Space => continue,
                TokenKind::RightDelim | TokenKind::RightParen => self.backup(),
                TokenKind::Pipe => {
                    let following = self.peek_non_space();
                    if matches!(following.kind, TokenKind::RightDelim | TokenKind::RightParen) {
                        return Err(self.syntax(token.location, "missing command after '|'"));
                    }
                }
                _ => return Err(self.unexpected(&token, "operand")),
            }
            break;
        }
        let Some(end) = args.last().map(|arg| arg.location().end()) else {
            return Err(self.syntax(Location::new(start, 0), "empty command"));
        };
        Ok(CommandNode {
            location: Location::span(start, end),
            args,
        })
    }

    /// A term optionally followed by `.Field` accesses.
    fn operand(&mut self) -> Result<Option<Node>, ParseError> {
        let start = self.peek_non_space().location.position;
        let Some(node) = self.term()? else {
            return Ok(None);
        };
        if !self.peek().is(TokenKind::Field) {
            return Ok(Some(node));
        }

        let mut fields = Vec::new();
        let mut end = node.location().end();
        while self.peek().is(TokenKind::Field) {
            let field = self.next();
            fields.push(field.text[1..].to_string());
            end = field.location.end();
        }
        let location = Location::span(start, end);
        if matches!(
            node,
            Node::Bool(_) | Node::String(_) | Node::Number(_) | Node::Nil(_) | Node::Dot(_)
        ) {
            return Err(self.syntax(
                location,
                format!("unexpected . after term {:?}", node.to_string()),
            ));
        }
        let node = match node {
            Node::Field(mut field) => {
                field.ident.extend(fields);
                field.location = location;
                Node::Field(field)
            }
            Node::Variable(mut variable) => {
                variable.ident.extend(fields);
                variable.location = location;
                Node::Variable(variable)
            }
            other => Node::Chain(ChainNode {
                location,
                node: Box::new(other),
                field: fields,
            }),
        };
        Ok(Some(node))
    }

    fn term(&mut self) -> Result<Option<Node>, ParseError> {
        let token = self.next_non_space();
        let location = token.location;
        let node = match token.kind {
            TokenKind::Identifier => {
                if !self.options.skip_func_check && !self.options.has_function(&token.text) {
                    return Err(
                        self.syntax(location, format!("function {:?} not defined", token.text))
                    );
                }
                Node::Identifier(IdentifierNode {
                    location,
                    ident: token.text.into_owned(),
                })
            }
            TokenKind::Keyword(Keyword::Dot) => Node::Dot(DotNode { location }),
            TokenKind::Keyword(Keyword::Nil) => Node::Nil(NilNode { location }),
            TokenKind::Variable => Node::Variable(self.use_var(&token)?),
            TokenKind::Field => Node::Field(FieldNode {
                location,
                ident: vec![token.text[1..].to_string()],
            }),
            TokenKind::Bool => Node::Bool(BoolNode {
                location,
                value: token.text == "true",
            }),
            TokenKind::Number | TokenKind::Complex | TokenKind::CharConstant => {
                let value = match token.kind {
                    TokenKind::Complex => number::parse_complex(&token.text),
                    TokenKind::CharConstant => number::parse_char_constant(&token.text),
                    _ => number::parse_number(&token.text),
                }
                .map_err(|message| self.syntax(location, message))?;
                Node::Number(NumberNode {
                    location,
                    text: token.text.into_owned(),
                    value,
                })
            }
            TokenKind::LeftParen => {
                self.descend(location)?;
                let mut pipe = self.pipeline("parenthesized pipeline", TokenKind::RightParen)?;
                self.ascend();
                pipe.location = Location::span(location.position, self.previous().end());
                Node::Pipe(pipe)
            }
            TokenKind::String | TokenKind::RawString => {
                let text = literal::unquote(&token.text)
                    .map_err(|message| self.syntax(location, message))?;
                Node::String(StringNode {
                    location,
                    quoted: token.text.into_owned(),
                    text,
                })
            }
            _ => {
                self.backup();
                return Ok(None);
            }
        };
        Ok(Some(node))
    }

    fn use_var(&self, token: &Token<'a>) -> Result<VariableNode, ParseError> {
        let name = token.text.as_ref();
        if !self.scope.vars.iter().any(|v| v == name) {
            return Err(self.syntax(token.location, format!("undefined variable {name:?}")));
        }
        Ok(VariableNode {
            location: token.location,
            ident: vec![name.to_string()],
        })
    }
}

/// 1-based line number of byte offset `position`.
pub(crate) fn line_of(source: &str, position: usize) -> usize {
    let end = position.min(source.len());
    source.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(source: &str, options: &ParseOptions) -> Result<ListNode, ParseError> {
        let mut parser = Parser::new("test", source, options);
        parser.parse()?;
        let tree = parser
            .into_trees()
            .find(|t| t.name() == "test")
            .expect("main tree");
        Ok(tree.root().clone())
    }

    #[test]
    fn test_line_of() {
        assert_eq!(line_of("a\nb\nc", 0), 1);
        assert_eq!(line_of("a\nb\nc", 2), 2);
        assert_eq!(line_of("a\nb\nc", 4), 3);
        assert_eq!(line_of("a", 10), 1);
    }

    #[test]
    fn test_action_spans_first_token() {
        let root = parse_one("{{ .Values.foobar }}", &ParseOptions::default()).unwrap();
        match &root.nodes[0] {
            Node::Action(action) => {
                assert_eq!(action.location, Location::new(3, 7));
                assert_eq!(action.pipe.location, Location::new(3, 14));
            }
            other => panic!("Expected action, got {other:?}"),
        }
    }

    #[test]
    fn test_variable_scope_ends_with_construct() {
        let options = ParseOptions::default();
        assert!(parse_one("{{if .}}{{$x := 1}}{{$x}}{{end}}", &options).is_ok());
        let err = parse_one("{{if .}}{{$x := 1}}{{end}}{{$x}}", &options).unwrap_err();
        assert_eq!(err.message, "undefined variable \"$x\"");
    }

    #[test]
    fn test_define_body_has_fresh_scope() {
        let options = ParseOptions::default();
        let err = parse_one("{{$x := 1}}{{define \"a\"}}{{$x}}{{end}}", &options).unwrap_err();
        assert_eq!(err.message, "undefined variable \"$x\"");
    }

    #[test]
    fn test_range_depth_is_not_inherited_by_block() {
        let options = ParseOptions::default();
        let err =
            parse_one("{{range .}}{{block \"b\" .}}{{break}}{{end}}{{end}}", &options).unwrap_err();
        assert_eq!(err.message, "{{break}} outside {{range}}");
    }

    #[test]
    fn test_depth_counter_unwinds() {
        let options = ParseOptions::default().max_depth(2);
        let source = "{{if .}}{{if .}}{{end}}{{end}}{{if .}}{{if .}}{{end}}{{end}}";
        assert!(parse_one(source, &options).is_ok());
        let err = parse_one("{{if .}}{{if .}}{{if .}}{{end}}{{end}}{{end}}", &options).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InternalLimit);
    }
}
