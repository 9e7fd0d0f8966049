//! Named template trees.
//!
//! A [`Registry`] maps template names to parsed [`Tree`]s. Parsing one source
//! can yield several trees (the main template plus every `define` and
//! `block`), so the registry is the unit that parse entry points return.

use std::collections::HashMap;
use std::collections::hash_map;
use std::sync::Arc;

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use tracing::debug;

use crate::ast::ListNode;
use crate::error::ParseError;
use crate::location::Location;
use crate::options::ParseOptions;
use crate::parse::Parser;

/// One parsed template.
#[derive(Debug, Clone, Serialize)]
pub struct Tree {
    name: String,
    /// Name of the top-level template whose source held this tree.
    parse_name: String,
    pub(crate) root: ListNode,
    #[serde(skip)]
    source: Arc<str>,
}

impl Tree {
    pub(crate) fn new(name: String, parse_name: String, root: ListNode, source: Arc<str>) -> Self {
        Self {
            name,
            parse_name,
            root,
            source,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parse_name(&self) -> &str {
        &self.parse_name
    }

    pub fn root(&self) -> &ListNode {
        &self.root
    }

    /// The full source text the tree was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Source text covered by `location`, or `None` if it lies outside the
    /// source or splits a UTF-8 sequence.
    pub fn text(&self, location: Location) -> Option<&str> {
        self.source.get(location.range())
    }

    /// 1-based line and column (in bytes) of byte offset `position`.
    pub fn line_column(&self, position: usize) -> (usize, usize) {
        let position = position.min(self.source.len());
        let before = &self.source.as_bytes()[..position];
        let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
        let column = match before.iter().rposition(|&b| b == b'\n') {
            Some(newline) => position - newline,
            None => position + 1,
        };
        (line, column)
    }
}

/// Template name to tree.
///
/// Inserting a name that is already present replaces the previous tree;
/// `Arc<Tree>` handles obtained earlier keep the old tree alive.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    trees: HashMap<String, Arc<Tree>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Tree>> {
        self.trees.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.trees.contains_key(name)
    }

    /// Register `tree` under its own name, returning the tree it replaced.
    pub fn insert(&mut self, tree: impl Into<Arc<Tree>>) -> Option<Arc<Tree>> {
        let tree = tree.into();
        let replaced = self.trees.insert(tree.name.clone(), tree);
        if let Some(old) = &replaced {
            debug!("replaced template {:?}", old.name);
        }
        replaced
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<Tree>> {
        self.trees.remove(name)
    }

    /// Move every tree of `other` into `self`; `other` wins on name clashes.
    pub fn merge(&mut self, other: Registry) {
        for (_, tree) in other.trees {
            self.insert(tree);
        }
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.trees.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<Tree>)> {
        self.trees.iter().map(|(name, tree)| (name.as_str(), tree))
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// Parse `text` as template `name` and register every tree it defines.
    ///
    /// On error, trees completed before the failure (such as earlier
    /// `define` blocks) are still registered.
    pub fn parse(&mut self, name: &str, text: &str, options: &ParseOptions) -> Result<(), ParseError> {
        let mut parser = Parser::new(name, text, options);
        let result = parser.parse();
        let mut added = 0;
        for tree in parser.into_trees() {
            self.insert(tree);
            added += 1;
        }
        debug!("registered {} trees from {:?}", added, name);
        result
    }
}

impl IntoIterator for Registry {
    type Item = (String, Arc<Tree>);
    type IntoIter = hash_map::IntoIter<String, Arc<Tree>>;

    fn into_iter(self) -> Self::IntoIter {
        self.trees.into_iter()
    }
}

impl Serialize for Registry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.trees.len()))?;
        for name in self.names() {
            map.serialize_entry(name, self.trees[name].as_ref())?;
        }
        map.end()
    }
}
