//! Tokens produced by the lexer.

use std::borrow::Cow;
use std::fmt;

use crate::location::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Block,
    Break,
    Continue,
    /// The cursor, `.`
    Dot,
    Define,
    Else,
    End,
    If,
    Nil,
    Range,
    Template,
    With,
}

impl Keyword {
    pub fn from_word(word: &str) -> Option<Self> {
        Some(match word {
            "block" => Keyword::Block,
            "break" => Keyword::Break,
            "continue" => Keyword::Continue,
            "." => Keyword::Dot,
            "define" => Keyword::Define,
            "else" => Keyword::Else,
            "end" => Keyword::End,
            "if" => Keyword::If,
            "nil" => Keyword::Nil,
            "range" => Keyword::Range,
            "template" => Keyword::Template,
            "with" => Keyword::With,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Lexing failed; the token text holds the message.
    Error,
    Bool,
    /// Printable ASCII punctuation such as `,`.
    Char,
    CharConstant,
    Comment,
    /// `1+2i`
    Complex,
    /// `=`
    Assign,
    /// `:=`
    Declare,
    Eof,
    Field,
    Identifier,
    LeftDelim,
    LeftParen,
    Number,
    Pipe,
    RawString,
    RightDelim,
    RightParen,
    Space,
    String,
    Text,
    Variable,
    Keyword(Keyword),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: Cow<'a, str>,
    pub location: Location,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, text: &'a str, location: Location) -> Self {
        Self {
            kind,
            text: Cow::Borrowed(text),
            location,
        }
    }

    pub fn error(message: String, location: Location) -> Self {
        Self {
            kind: TokenKind::Error,
            text: Cow::Owned(message),
            location,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => f.write_str("EOF"),
            TokenKind::Error => f.write_str(&self.text),
            TokenKind::Keyword(_) => write!(f, "<{}>", self.text),
            _ if self.text.chars().count() > 10 => {
                let head: String = self.text.chars().take(10).collect();
                write!(f, "{head:?}...")
            }
            _ => write!(f, "{:?}", self.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(Keyword::from_word("range"), Some(Keyword::Range));
        assert_eq!(Keyword::from_word("."), Some(Keyword::Dot));
        assert_eq!(Keyword::from_word("ranges"), None);
    }

    #[test]
    fn test_display_matches_error_wording() {
        let loc = Location::new(0, 0);
        assert_eq!(Token::new(TokenKind::Eof, "", loc).to_string(), "EOF");
        assert_eq!(
            Token::new(TokenKind::Keyword(Keyword::End), "end", loc).to_string(),
            "<end>"
        );
        assert_eq!(Token::new(TokenKind::Char, ",", loc).to_string(), "\",\"");
        assert_eq!(
            Token::new(TokenKind::Text, "abcdefghijklmnop", loc).to_string(),
            "\"abcdefghij\"..."
        );
        assert_eq!(
            Token::error("unclosed action".to_string(), loc).to_string(),
            "unclosed action"
        );
    }
}
