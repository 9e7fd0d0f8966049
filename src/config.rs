//! TOML configuration for the command-line front end.
//!
//! ```toml
//! functions = ["include", "toYaml"]
//! builtins = true
//! skip_func_check = false
//! parse_comments = true
//! max_depth = 64
//!
//! [delimiters]
//! left = "[["
//! right = "]]"
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;
use crate::options::{DEFAULT_MAX_DEPTH, ParseOptions};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Delimiters {
    #[serde(default)]
    pub left: String,
    #[serde(default)]
    pub right: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub delimiters: Delimiters,
    pub functions: Vec<String>,
    /// Predeclare the standard runtime's function names.
    pub builtins: bool,
    pub skip_func_check: bool,
    pub parse_comments: bool,
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delimiters: Delimiters::default(),
            functions: Vec::new(),
            builtins: false,
            skip_func_check: false,
            parse_comments: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("loaded config from {}", path.display());
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid("max_depth must be positive".to_string()));
        }
        if let Some(name) = self.functions.iter().find(|f| !is_identifier(f)) {
            return Err(ConfigError::Invalid(format!(
                "function name {name:?} is not an identifier"
            )));
        }
        Ok(())
    }

    pub fn to_options(&self) -> ParseOptions {
        let mut options = ParseOptions::new()
            .with_delimiters(&self.delimiters.left, &self.delimiters.right)
            .with_functions(&self.functions)
            .skip_func_check(self.skip_func_check)
            .parse_comments(self.parse_comments)
            .max_depth(self.max_depth);
        if self.builtins {
            options = options.with_builtins();
        }
        options
    }
}

impl From<&Config> for ParseOptions {
    fn from(config: &Config) -> Self {
        config.to_options()
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        let options = config.to_options();
        let defaults = ParseOptions::default();
        assert_eq!(options.left_delim(), defaults.left_delim());
        assert_eq!(options.right_delim(), defaults.right_delim());
        assert_eq!(options.functions, defaults.functions);
        assert_eq!(options.max_depth, defaults.max_depth);
        assert!(options.parse_comments);
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_toml_str(
            r#"
functions = ["include", "toYaml"]
builtins = true
max_depth = 8

[delimiters]
left = "[["
right = "]]"
"#,
        )
        .unwrap();
        let options = config.to_options();
        assert_eq!(options.left_delim(), "[[");
        assert_eq!(options.right_delim(), "]]");
        assert!(options.has_function("include"));
        assert!(options.has_function("printf"));
        assert_eq!(options.max_depth, 8);
        assert!(options.parse_comments);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Config::from_toml_str("max_depth = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_toml_str(r#"functions = ["no-dash"]"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_toml_str("colour = true"),
            Err(ConfigError::Toml(_))
        ));
    }
}
