//! # tmplparse - Template Parser with Exact Source Spans
//!
//! Parses text templates in the `{{ ... }}` action language into syntax trees
//! where every node knows the byte range it came from.
//!
//! ## Overview
//!
//! A template is literal text interleaved with actions. Parsing one source
//! yields a [`Registry`] of named [`Tree`]s: the template itself plus one tree
//! per `{{define}}` or `{{block}}` it contains. Each node carries a
//! [`Location`] so tools such as linters can point at the exact characters a
//! finding refers to.
//!
//! ## Quick Start
//!
//! ```rust
//! use tmplparse::{Located, Location, ast::Node};
//!
//! let registry = tmplparse::parse("deploy", "{{ .Values.foobar }}", "", "", &[])?;
//! let tree = registry.get("deploy").unwrap();
//! assert_eq!(tree.root().location, Location::new(0, 20));
//!
//! let Node::Action(action) = &tree.root().nodes[0] else { unreachable!() };
//! assert_eq!(action.location(), Location::new(3, 7));
//! assert_eq!(tree.text(action.pipe.location), Some(".Values.foobar"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Options
//!
//! ```rust
//! use tmplparse::ParseOptions;
//!
//! let options = ParseOptions::new()
//!     .with_delimiters("[[", "]]")
//!     .with_builtins()
//!     .with_function("include");
//! let registry = tmplparse::parse_with_options("t", r#"[[ include "x" . | len ]]"#, &options)?;
//! assert!(registry.contains("t"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Template Syntax
//!
//! - **Actions**: `{{ .Field }}`, `{{ $x := pipeline }}`, `{{ f .A | g }}`
//! - **Control**: `{{if}}`, `{{else if}}`, `{{range}}`, `{{with}}`, `{{else with}}`,
//!   `{{break}}`, `{{continue}}`, `{{end}}`
//! - **Templates**: `{{define "name"}}`, `{{template "name" .}}`, `{{block "name" .}}`
//! - **Comments**: `{{/* ... */}}`
//! - **Trim markers**: `{{- ` and ` -}}` remove adjacent whitespace
//!
//! ## Architecture
//!
//! - [`parse::lexer`]: tokens with spans
//! - [`parse`]: recursive-descent parser
//! - [`ast`]: node types
//! - [`registry`]: named trees
//! - [`visit`]: read-only traversal, span collection and call lookup
//! - [`config`]: TOML configuration for the command-line tool
//!
//! ## Error Handling
//!
//! The first error aborts the template and is returned as a [`ParseError`]
//! carrying its [`ErrorKind`], location and line.

pub mod ast;
pub mod config;
pub mod error;
pub mod location;
pub mod options;
pub mod parse;
pub mod registry;
pub mod visit;

pub use config::Config;
pub use error::{ConfigError, ErrorKind, ParseError};
pub use location::{Located, Location};
pub use options::{BUILTIN_FUNCTIONS, ParseOptions};
pub use registry::{Registry, Tree};

/// Parse `text` as template `name`.
///
/// Empty delimiters select `{{` and `}}`. Identifiers used as functions must
/// appear in `functions`.
pub fn parse(
    name: &str,
    text: &str,
    left_delim: &str,
    right_delim: &str,
    functions: &[&str],
) -> Result<Registry, ParseError> {
    let options = ParseOptions::new()
        .with_delimiters(left_delim, right_delim)
        .with_functions(functions.iter().copied());
    parse_with_options(name, text, &options)
}

pub fn parse_with_options(
    name: &str,
    text: &str,
    options: &ParseOptions,
) -> Result<Registry, ParseError> {
    let mut registry = Registry::new();
    registry.parse(name, text, options)?;
    Ok(registry)
}
