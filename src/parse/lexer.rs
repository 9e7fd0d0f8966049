//! Template lexer.
//!
//! A small state machine that alternates between literal text and the inside
//! of actions. Every token records the exact byte range it was cut from, so
//! the parser can derive node locations without looking at the source again.
//!
//! Two rules shape those ranges:
//!
//! - Trim markers (`{{- ` and ` -}}`) remove adjacent whitespace from the
//!   neighbouring text token; the removed bytes belong to no token.
//! - A left delimiter directly followed by `/*` produces no delimiter token:
//!   the comment token starts at `/*` and stops after `*/`.

use tracing::trace;

use super::token::{Keyword, Token, TokenKind};
use crate::location::Location;

const LEFT_COMMENT: &str = "/*";
const RIGHT_COMMENT: &str = "*/";
const TRIM_MARKER: u8 = b'-';
const TRIM_MARKER_LEN: usize = 2;
const SPACE_CHARS: &[char] = &[' ', '\t', '\r', '\n'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexOptions {
    pub emit_comment: bool,
    /// `break` lexes as a keyword rather than an identifier.
    pub break_ok: bool,
    /// `continue` lexes as a keyword rather than an identifier.
    pub continue_ok: bool,
}

impl Default for LexOptions {
    fn default() -> Self {
        Self {
            emit_comment: true,
            break_ok: true,
            continue_ok: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Text,
    LeftDelim,
    Comment,
    InsideAction,
    Eof,
    Done,
}

pub struct Lexer<'a> {
    input: &'a str,
    left_delim: &'a str,
    right_delim: &'a str,
    options: LexOptions,
    start: usize,
    pos: usize,
    paren_depth: usize,
    action_start: usize,
    state: State,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str, left_delim: &'a str, right_delim: &'a str) -> Self {
        Self::with_options(input, left_delim, right_delim, LexOptions::default())
    }

    pub fn with_options(
        input: &'a str,
        left_delim: &'a str,
        right_delim: &'a str,
        options: LexOptions,
    ) -> Self {
        Self {
            input,
            left_delim,
            right_delim,
            options,
            start: 0,
            pos: 0,
            paren_depth: 0,
            action_start: 0,
            state: State::Text,
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn backup(&mut self, c: char) {
        self.pos -= c.len_utf8();
    }

    fn accept(&mut self, valid: &str) -> bool {
        match self.peek_char() {
            Some(c) if valid.contains(c) => {
                self.pos += c.len_utf8();
                true
            }
            _ => false,
        }
    }

    fn accept_run(&mut self, valid: &str) {
        while self.accept(valid) {}
    }

    fn ignore(&mut self) {
        self.start = self.pos;
    }

    fn emit(&mut self, kind: TokenKind) -> Token<'a> {
        let token = Token::new(
            kind,
            &self.input[self.start..self.pos],
            Location::span(self.start, self.pos),
        );
        trace!("lexed {:?} {} {:?}", kind, token.location, token.text);
        self.start = self.pos;
        token
    }

    fn error(&mut self, message: String) -> Token<'a> {
        self.error_at(Location::span(self.start, self.pos), message)
    }

    fn error_at(&mut self, location: Location, message: String) -> Token<'a> {
        trace!("lex error at {}: {}", location, message);
        self.state = State::Done;
        Token::error(message, location)
    }

    /// Scan literal text up to the next left delimiter.
    fn lex_text(&mut self) -> Option<Token<'a>> {
        match self.input[self.pos..].find(self.left_delim) {
            Some(offset) => {
                self.state = State::LeftDelim;
                if offset == 0 {
                    return None;
                }
                self.pos += offset;
                let delim_end = self.pos + self.left_delim.len();
                let trim = if has_left_trim_marker(&self.input[delim_end..]) {
                    right_trim_length(&self.input[self.start..self.pos])
                } else {
                    0
                };
                let text_end = self.pos - trim;
                let token = (text_end > self.start).then(|| {
                    Token::new(
                        TokenKind::Text,
                        &self.input[self.start..text_end],
                        Location::span(self.start, text_end),
                    )
                });
                self.ignore();
                token
            }
            None => {
                self.pos = self.input.len();
                self.state = State::Eof;
                (self.pos > self.start).then(|| self.emit(TokenKind::Text))
            }
        }
    }

    fn lex_left_delim(&mut self) -> Option<Token<'a>> {
        self.pos += self.left_delim.len();
        let trim = has_left_trim_marker(&self.input[self.pos..]);
        let after_marker = if trim { TRIM_MARKER_LEN } else { 0 };
        if self.input[self.pos + after_marker..].starts_with(LEFT_COMMENT) {
            self.pos += after_marker;
            self.ignore();
            self.state = State::Comment;
            return None;
        }
        let token = self.emit(TokenKind::LeftDelim);
        self.pos += after_marker;
        self.ignore();
        self.paren_depth = 0;
        self.action_start = token.location.position;
        self.state = State::InsideAction;
        Some(token)
    }

    fn lex_comment(&mut self) -> Option<Token<'a>> {
        self.pos += LEFT_COMMENT.len();
        let Some(offset) = self.input[self.pos..].find(RIGHT_COMMENT) else {
            self.pos = self.input.len();
            return Some(self.error("unclosed comment".to_string()));
        };
        self.pos += offset + RIGHT_COMMENT.len();
        let (delim, trim) = self.at_right_delim();
        if !delim {
            return Some(self.error("comment ends before closing delimiter".to_string()));
        }
        let token = Token::new(
            TokenKind::Comment,
            &self.input[self.start..self.pos],
            Location::span(self.start, self.pos),
        );
        if trim {
            self.pos += TRIM_MARKER_LEN;
        }
        self.pos += self.right_delim.len();
        if trim {
            self.pos += left_trim_length(&self.input[self.pos..]);
        }
        self.ignore();
        self.state = State::Text;
        if self.options.emit_comment {
            trace!("lexed Comment {} {:?}", token.location, token.text);
            Some(token)
        } else {
            None
        }
    }

    /// Reports whether the input continues with the right delimiter, and
    /// whether that delimiter is preceded by a trim marker.
    fn at_right_delim(&self) -> (bool, bool) {
        let rest = &self.input[self.pos..];
        if has_right_trim_marker(rest) && rest[TRIM_MARKER_LEN..].starts_with(self.right_delim) {
            return (true, true);
        }
        (rest.starts_with(self.right_delim), false)
    }

    fn lex_right_delim(&mut self) -> Option<Token<'a>> {
        let (_, trim) = self.at_right_delim();
        if trim {
            self.pos += TRIM_MARKER_LEN;
            self.ignore();
        }
        self.pos += self.right_delim.len();
        let token = self.emit(TokenKind::RightDelim);
        if trim {
            self.pos += left_trim_length(&self.input[self.pos..]);
            self.ignore();
        }
        self.state = State::Text;
        Some(token)
    }

    fn lex_inside_action(&mut self) -> Option<Token<'a>> {
        let (delim, _) = self.at_right_delim();
        if delim {
            if self.paren_depth == 0 {
                return self.lex_right_delim();
            }
            return Some(self.error("unclosed left paren".to_string()));
        }
        let Some(c) = self.next_char() else {
            let location = Location::span(self.action_start, self.input.len());
            return Some(self.error_at(location, "unclosed action".to_string()));
        };
        let token = match c {
            c if is_space(c) => {
                self.backup(c);
                return self.lex_space();
            }
            '=' => self.emit(TokenKind::Assign),
            ':' => {
                if self.next_char() != Some('=') {
                    return Some(self.error("expected :=".to_string()));
                }
                self.emit(TokenKind::Declare)
            }
            '|' => self.emit(TokenKind::Pipe),
            '"' => self.lex_quote(),
            '`' => self.lex_raw_quote(),
            '$' => self.lex_field_or_variable(TokenKind::Variable),
            '\'' => self.lex_char(),
            '.' if !self.peek_char().is_some_and(|next| next.is_ascii_digit()) => {
                self.lex_field_or_variable(TokenKind::Field)
            }
            '.' | '+' | '-' | '0'..='9' => {
                self.backup(c);
                self.lex_number()
            }
            c if is_alphanumeric(c) => {
                self.backup(c);
                self.lex_identifier()
            }
            '(' => {
                self.paren_depth += 1;
                self.emit(TokenKind::LeftParen)
            }
            ')' => {
                if self.paren_depth == 0 {
                    return Some(self.error("unexpected right paren".to_string()));
                }
                self.paren_depth -= 1;
                self.emit(TokenKind::RightParen)
            }
            c if c.is_ascii() && !c.is_ascii_control() => self.emit(TokenKind::Char),
            c => self.error(format!("unrecognized character in action: {}", describe(c))),
        };
        Some(token)
    }

    /// Scan a run of spaces. A trim marker right before the closing
    /// delimiter is left for [`Self::lex_right_delim`].
    fn lex_space(&mut self) -> Option<Token<'a>> {
        let mut spaces = 0;
        while let Some(c) = self.peek_char() {
            if !is_space(c) {
                break;
            }
            self.pos += 1;
            spaces += 1;
        }
        if has_right_trim_marker(&self.input[self.pos - 1..])
            && self.input[self.pos - 1 + TRIM_MARKER_LEN..].starts_with(self.right_delim)
        {
            self.pos -= 1;
            if spaces == 1 {
                return self.lex_right_delim();
            }
        }
        Some(self.emit(TokenKind::Space))
    }

    fn lex_identifier(&mut self) -> Token<'a> {
        while let Some(c) = self.peek_char() {
            if !is_alphanumeric(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        if !self.at_terminator() {
            return self.bad_character();
        }
        let word = &self.input[self.start..self.pos];
        let kind = match Keyword::from_word(word) {
            Some(Keyword::Break) if !self.options.break_ok => TokenKind::Identifier,
            Some(Keyword::Continue) if !self.options.continue_ok => TokenKind::Identifier,
            Some(keyword) => TokenKind::Keyword(keyword),
            None if word == "true" || word == "false" => TokenKind::Bool,
            None => TokenKind::Identifier,
        };
        self.emit(kind)
    }

    /// Scan `$name` or `.Name`; the sigil has already been consumed.
    fn lex_field_or_variable(&mut self, kind: TokenKind) -> Token<'a> {
        if self.at_terminator() {
            return match kind {
                TokenKind::Variable => self.emit(TokenKind::Variable),
                _ => self.emit(TokenKind::Keyword(Keyword::Dot)),
            };
        }
        while let Some(c) = self.peek_char() {
            if !is_alphanumeric(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        if !self.at_terminator() {
            return self.bad_character();
        }
        self.emit(kind)
    }

    fn bad_character(&mut self) -> Token<'a> {
        let c = self.peek_char().unwrap_or(char::REPLACEMENT_CHARACTER);
        self.error(format!("bad character {}", describe(c)))
    }

    /// Whether the next character may legally end a word.
    fn at_terminator(&self) -> bool {
        match self.peek_char() {
            None => true,
            Some(c) if is_space(c) => true,
            Some('.' | ',' | '|' | ':' | ')' | '(') => true,
            Some(_) => self.input[self.pos..].starts_with(self.right_delim),
        }
    }

    fn lex_quote(&mut self) -> Token<'a> {
        loop {
            match self.next_char() {
                Some('\\') => match self.next_char() {
                    Some(c) if c != '\n' => {}
                    _ => return self.error("unterminated quoted string".to_string()),
                },
                None | Some('\n') => return self.error("unterminated quoted string".to_string()),
                Some('"') => break,
                Some(_) => {}
            }
        }
        self.emit(TokenKind::String)
    }

    fn lex_raw_quote(&mut self) -> Token<'a> {
        loop {
            match self.next_char() {
                None => return self.error("unterminated raw quoted string".to_string()),
                Some('`') => break,
                Some(_) => {}
            }
        }
        self.emit(TokenKind::RawString)
    }

    fn lex_char(&mut self) -> Token<'a> {
        loop {
            match self.next_char() {
                Some('\\') => match self.next_char() {
                    Some(c) if c != '\n' => {}
                    _ => return self.error("unterminated character constant".to_string()),
                },
                None | Some('\n') => {
                    return self.error("unterminated character constant".to_string());
                }
                Some('\'') => break,
                Some(_) => {}
            }
        }
        self.emit(TokenKind::CharConstant)
    }

    /// Numbers are only checked for shape here; the parser decides what
    /// value, if any, they denote.
    fn lex_number(&mut self) -> Token<'a> {
        if !self.scan_number() {
            return self.bad_number();
        }
        if matches!(self.peek_char(), Some('+' | '-')) {
            if !self.scan_number() || !self.input[..self.pos].ends_with('i') {
                return self.bad_number();
            }
            return self.emit(TokenKind::Complex);
        }
        self.emit(TokenKind::Number)
    }

    fn bad_number(&mut self) -> Token<'a> {
        let text = self.input[self.start..self.pos].to_string();
        self.error(format!("bad number syntax: {text:?}"))
    }

    fn scan_number(&mut self) -> bool {
        self.accept("+-");
        let mut digits = "0123456789_";
        if self.accept("0") {
            if self.accept("xX") {
                digits = "0123456789abcdefABCDEF_";
            } else if self.accept("oO") {
                digits = "01234567_";
            } else if self.accept("bB") {
                digits = "01_";
            }
        }
        self.accept_run(digits);
        if self.accept(".") {
            self.accept_run(digits);
        }
        if digits.len() == 10 + 1 && self.accept("eE") {
            self.accept("+-");
            self.accept_run("0123456789_");
        }
        if digits.len() == 16 + 6 + 1 && self.accept("pP") {
            self.accept("+-");
            self.accept_run("0123456789_");
        }
        self.accept("i");
        if let Some(c) = self.peek_char()
            && is_alphanumeric(c)
        {
            self.pos += c.len_utf8();
            return false;
        }
        true
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        loop {
            let token = match self.state {
                State::Done => return None,
                State::Eof => {
                    self.state = State::Done;
                    self.start = self.input.len();
                    self.pos = self.input.len();
                    return Some(self.emit(TokenKind::Eof));
                }
                State::Text => self.lex_text(),
                State::LeftDelim => self.lex_left_delim(),
                State::Comment => self.lex_comment(),
                State::InsideAction => self.lex_inside_action(),
            };
            if token.is_some() {
                return token;
            }
        }
    }
}

/// Tokenize `input` in one pass. The result always ends with an Eof or an
/// Error token.
pub fn lex<'a>(
    input: &'a str,
    left_delim: &'a str,
    right_delim: &'a str,
    options: LexOptions,
) -> Vec<Token<'a>> {
    Lexer::with_options(input, left_delim, right_delim, options).collect()
}

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

fn is_alphanumeric(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

fn has_left_trim_marker(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 2 && bytes[0] == TRIM_MARKER && is_space(bytes[1] as char)
}

fn has_right_trim_marker(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 2 && is_space(bytes[0] as char) && bytes[1] == TRIM_MARKER
}

fn left_trim_length(s: &str) -> usize {
    s.len() - s.trim_start_matches(SPACE_CHARS).len()
}

fn right_trim_length(s: &str) -> usize {
    s.len() - s.trim_end_matches(SPACE_CHARS).len()
}

fn describe(c: char) -> String {
    format!("U+{:04X} {c:?}", c as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input, "{{", "}}").map(|t| t.kind).collect()
    }

    fn spans(input: &str) -> Vec<(TokenKind, usize, usize)> {
        Lexer::new(input, "{{", "}}")
            .map(|t| (t.kind, t.location.position, t.location.length))
            .collect()
    }

    #[test]
    fn test_text_only() {
        assert_eq!(
            spans("hello"),
            vec![(TokenKind::Text, 0, 5), (TokenKind::Eof, 5, 0)]
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(spans(""), vec![(TokenKind::Eof, 0, 0)]);
    }

    #[test]
    fn test_simple_action() {
        assert_eq!(
            spans("{{ . }}"),
            vec![
                (TokenKind::LeftDelim, 0, 2),
                (TokenKind::Space, 2, 1),
                (TokenKind::Keyword(Keyword::Dot), 3, 1),
                (TokenKind::Space, 4, 1),
                (TokenKind::RightDelim, 5, 2),
                (TokenKind::Eof, 7, 0),
            ]
        );
    }

    #[test]
    fn test_field_path_is_split_into_segments() {
        let tokens: Vec<_> = Lexer::new("{{ .Values.foobar }}", "{{", "}}").collect();
        let fields: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Field)
            .map(|t| (t.text.as_ref(), t.location))
            .collect();
        assert_eq!(
            fields,
            vec![
                (".Values", Location::new(3, 7)),
                (".foobar", Location::new(10, 7))
            ]
        );
    }

    #[test]
    fn test_comment_skips_left_delimiter() {
        assert_eq!(
            spans("{{/* comment */}}"),
            vec![(TokenKind::Comment, 2, 13), (TokenKind::Eof, 17, 0)]
        );
    }

    #[test]
    fn test_comment_with_trim_markers() {
        let tokens: Vec<_> = Lexer::new("a {{- /* c */ -}} b", "{{", "}}").collect();
        assert_eq!(tokens[0].text, "a");
        assert_eq!(tokens[1].kind, TokenKind::Comment);
        assert_eq!(tokens[1].location, Location::new(6, 7));
        assert_eq!(tokens[2].text, "b");
        assert_eq!(tokens[2].location, Location::new(18, 1));
    }

    #[test]
    fn test_comments_can_be_dropped() {
        let options = LexOptions {
            emit_comment: false,
            ..LexOptions::default()
        };
        let tokens = lex("{{/* c */}}x", "{{", "}}", options);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::Text);
        assert_eq!(tokens[0].location, Location::new(11, 1));
    }

    #[test]
    fn test_trim_markers() {
        assert_eq!(
            spans("a  {{- . -}}  b"),
            vec![
                (TokenKind::Text, 0, 1),
                (TokenKind::LeftDelim, 3, 2),
                (TokenKind::Keyword(Keyword::Dot), 7, 1),
                (TokenKind::RightDelim, 10, 2),
                (TokenKind::Text, 14, 1),
                (TokenKind::Eof, 15, 0),
            ]
        );
    }

    #[test]
    fn test_trim_marker_after_several_spaces() {
        assert_eq!(
            kinds("{{ .   -}}"),
            vec![
                TokenKind::LeftDelim,
                TokenKind::Space,
                TokenKind::Keyword(Keyword::Dot),
                TokenKind::Space,
                TokenKind::RightDelim,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_negative_number_is_not_a_trim_marker() {
        let tokens: Vec<_> = Lexer::new("{{-3}}", "{{", "}}").collect();
        assert_eq!(tokens[1].kind, TokenKind::Number);
        assert_eq!(tokens[1].text, "-3");
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("{{range $k, $v := .}}{{end}}"),
            vec![
                TokenKind::LeftDelim,
                TokenKind::Keyword(Keyword::Range),
                TokenKind::Space,
                TokenKind::Variable,
                TokenKind::Char,
                TokenKind::Space,
                TokenKind::Variable,
                TokenKind::Space,
                TokenKind::Declare,
                TokenKind::Space,
                TokenKind::Keyword(Keyword::Dot),
                TokenKind::RightDelim,
                TokenKind::LeftDelim,
                TokenKind::Keyword(Keyword::End),
                TokenKind::RightDelim,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_break_as_identifier_when_registered() {
        let options = LexOptions {
            break_ok: false,
            ..LexOptions::default()
        };
        let tokens = lex("{{break}}", "{{", "}}", options);
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            kinds(r#"{{"a\"b" `raw` 'x' true 0x1F 1.5e3 1+2i nil}}"#),
            vec![
                TokenKind::LeftDelim,
                TokenKind::String,
                TokenKind::Space,
                TokenKind::RawString,
                TokenKind::Space,
                TokenKind::CharConstant,
                TokenKind::Space,
                TokenKind::Bool,
                TokenKind::Space,
                TokenKind::Number,
                TokenKind::Space,
                TokenKind::Number,
                TokenKind::Space,
                TokenKind::Complex,
                TokenKind::Space,
                TokenKind::Keyword(Keyword::Nil),
                TokenKind::RightDelim,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_parens_and_pipes() {
        assert_eq!(
            kinds("{{(len .) | print}}"),
            vec![
                TokenKind::LeftDelim,
                TokenKind::LeftParen,
                TokenKind::Identifier,
                TokenKind::Space,
                TokenKind::Keyword(Keyword::Dot),
                TokenKind::RightParen,
                TokenKind::Space,
                TokenKind::Pipe,
                TokenKind::Space,
                TokenKind::Identifier,
                TokenKind::RightDelim,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_custom_delimiters() {
        let tokens: Vec<_> = Lexer::new("x[[ .A ]]{{y}}", "[[", "]]").collect();
        assert_eq!(tokens[0].location, Location::new(0, 1));
        assert_eq!(tokens[1].kind, TokenKind::LeftDelim);
        assert_eq!(tokens[3].text, ".A");
        assert_eq!(tokens[5].kind, TokenKind::RightDelim);
        assert_eq!(tokens[6].text, "{{y}}");
    }

    #[test]
    fn test_unclosed_action() {
        let tokens: Vec<_> = Lexer::new("ab{{ .x", "{{", "}}").collect();
        let last = tokens.last().unwrap();
        assert_eq!(last.kind, TokenKind::Error);
        assert_eq!(last.text, "unclosed action");
        assert_eq!(last.location, Location::new(2, 5));
    }

    #[test]
    fn test_unterminated_string() {
        let tokens: Vec<_> = Lexer::new("{{ \"abc }}", "{{", "}}").collect();
        let last = tokens.last().unwrap();
        assert_eq!(last.kind, TokenKind::Error);
        assert_eq!(last.text, "unterminated quoted string");
        assert_eq!(last.location, Location::new(3, 7));
    }

    #[test]
    fn test_unterminated_raw_string() {
        let tokens: Vec<_> = Lexer::new("{{ `abc", "{{", "}}").collect();
        let last = tokens.last().unwrap();
        assert_eq!(last.text, "unterminated raw quoted string");
        assert_eq!(last.location, Location::new(3, 4));
    }

    #[test]
    fn test_unclosed_comment() {
        let tokens: Vec<_> = Lexer::new("{{/* abc", "{{", "}}").collect();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "unclosed comment");
        assert_eq!(tokens[0].location, Location::new(2, 6));
    }

    #[test]
    fn test_comment_must_end_at_delimiter() {
        let tokens: Vec<_> = Lexer::new("{{/* a */ . }}", "{{", "}}").collect();
        assert_eq!(tokens[0].text, "comment ends before closing delimiter");
    }

    #[test]
    fn test_paren_balance() {
        let tokens: Vec<_> = Lexer::new("{{ ) }}", "{{", "}}").collect();
        assert_eq!(tokens.last().unwrap().text, "unexpected right paren");

        let tokens: Vec<_> = Lexer::new("{{ ( }}", "{{", "}}").collect();
        assert_eq!(tokens.last().unwrap().text, "unclosed left paren");
    }

    #[test]
    fn test_bad_number() {
        let tokens: Vec<_> = Lexer::new("{{ 3k }}", "{{", "}}").collect();
        assert_eq!(tokens.last().unwrap().text, "bad number syntax: \"3k\"");
    }

    #[test]
    fn test_lexing_stops_after_error() {
        let tokens: Vec<_> = Lexer::new("{{ \"x }}{{ . }}", "{{", "}}").collect();
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Error);
        assert_eq!(
            tokens.iter().filter(|t| t.kind == TokenKind::Error).count(),
            1
        );
    }
}
