//! Error types returned by parsing and configuration loading.

use std::path::PathBuf;

use thiserror::Error;

use crate::location::Location;

/// Which stage rejected the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Unterminated action, literal or comment, or an unexpected character.
    Lex,
    /// Grammar or scoping violation.
    Syntax,
    /// Nesting deeper than [`ParseOptions::max_depth`](crate::ParseOptions).
    InternalLimit,
}

/// A failed parse of one template.
///
/// `location` pinpoints the offending source range and `line` is the
/// 1-based line that range starts on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("template: {name}:{line}: {message}")]
pub struct ParseError {
    pub kind: ErrorKind,
    pub name: String,
    pub location: Location,
    pub line: usize,
    pub message: String,
}

impl ParseError {
    pub fn is_lex(&self) -> bool {
        self.kind == ErrorKind::Lex
    }

    pub fn is_syntax(&self) -> bool {
        self.kind == ErrorKind::Syntax
    }

    pub fn is_internal_limit(&self) -> bool {
        self.kind == ErrorKind::InternalLimit
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
