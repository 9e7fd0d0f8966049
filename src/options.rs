//! Parser configuration.

use std::collections::HashSet;

pub const DEFAULT_LEFT_DELIM: &str = "{{";
pub const DEFAULT_RIGHT_DELIM: &str = "}}";

/// Default nesting limit for control structures, parenthesized pipelines
/// and `define`/`block` bodies. Low enough that a thread with the default
/// 2 MiB stack reaches the limit before it runs out of stack.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Function names the standard template runtime predefines.
pub const BUILTIN_FUNCTIONS: &[&str] = &[
    "and", "call", "html", "index", "slice", "js", "len", "not", "or", "print", "printf",
    "println", "urlquery", "eq", "ge", "gt", "le", "lt", "ne",
];

/// Options shared by every template parsed in one call.
///
/// ```
/// use tmplparse::ParseOptions;
///
/// let options = ParseOptions::new()
///     .with_delimiters("[[", "]]")
///     .with_function("sha1sum")
///     .with_builtins();
/// assert!(options.has_function("printf"));
/// assert_eq!(options.left_delim(), "[[");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Left action delimiter; empty means `{{`.
    pub left_delim: String,
    /// Right action delimiter; empty means `}}`.
    pub right_delim: String,
    /// Identifiers that may appear as function names.
    pub functions: HashSet<String>,
    /// Accept any identifier as a function name.
    pub skip_func_check: bool,
    /// Keep `{{/* */}}` comments as nodes.
    pub parse_comments: bool,
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            left_delim: DEFAULT_LEFT_DELIM.to_string(),
            right_delim: DEFAULT_RIGHT_DELIM.to_string(),
            functions: HashSet::new(),
            skip_func_check: false,
            parse_comments: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiters(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.left_delim = left.into();
        self.right_delim = right.into();
        self
    }

    pub fn with_function(mut self, name: impl Into<String>) -> Self {
        self.functions.insert(name.into());
        self
    }

    pub fn with_functions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.functions.extend(names.into_iter().map(Into::into));
        self
    }

    /// Register [`BUILTIN_FUNCTIONS`].
    pub fn with_builtins(self) -> Self {
        self.with_functions(BUILTIN_FUNCTIONS.iter().copied())
    }

    pub fn skip_func_check(mut self, skip: bool) -> Self {
        self.skip_func_check = skip;
        self
    }

    pub fn parse_comments(mut self, keep: bool) -> Self {
        self.parse_comments = keep;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains(name)
    }

    pub fn left_delim(&self) -> &str {
        if self.left_delim.is_empty() {
            DEFAULT_LEFT_DELIM
        } else {
            &self.left_delim
        }
    }

    pub fn right_delim(&self) -> &str {
        if self.right_delim.is_empty() {
            DEFAULT_RIGHT_DELIM
        } else {
            &self.right_delim
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ParseOptions::default();
        assert_eq!(options.left_delim(), "{{");
        assert_eq!(options.right_delim(), "}}");
        assert!(options.parse_comments);
        assert!(!options.skip_func_check);
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_empty_delimiters_fall_back() {
        let options = ParseOptions::new().with_delimiters("", "");
        assert_eq!(options.left_delim(), "{{");
        assert_eq!(options.right_delim(), "}}");
    }

    #[test]
    fn test_functions() {
        let options = ParseOptions::new().with_functions(["foo", "bar"]);
        assert!(options.has_function("foo"));
        assert!(options.has_function("bar"));
        assert!(!options.has_function("printf"));

        let options = options.with_builtins();
        assert!(options.has_function("printf"));
        assert!(options.has_function("eq"));
    }
}
