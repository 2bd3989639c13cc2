//! Memoization of content extraction and parsing.
//!
//! Two sections, each keyed by raw input text: extracted query content per
//! URL, and parse results per query content. Entries never expire on their
//! own. A section is cleared wholesale when an option that shapes its output
//! changes, and each clear bumps the section's epoch so callers can tell a
//! reused section from a fresh one.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::options::{Options, Overrides};
use crate::parser::ParsedQuery;

/// One independently invalidated cache section.
#[derive(Debug, Clone)]
pub struct Section<V> {
    epoch: u64,
    entries: HashMap<String, V>,
}

impl<V> Default for Section<V> {
    fn default() -> Self {
        Self { epoch: 0, entries: HashMap::new() }
    }
}

impl<V> Section<V> {
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        self.entries.insert(key.into(), value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of times this section has been cleared.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.epoch += 1;
    }
}

/// Which sections a set of overrides would make stale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Invalidation {
    pub content: bool,
    pub params: bool,
}

impl Invalidation {
    /// Compare each present override with the current value. Content only
    /// goes stale when a separator change flips whether URLs can be cut at
    /// `?`/`#`; params go stale on any change to a parse-shaping option.
    pub fn between(current: &Options, overrides: &Overrides) -> Self {
        let separators = overrides.separators_changed(current);
        let content = separators
            && current.separators_contain_boundary_chars()
                != current.combine_with(overrides).separators_contain_boundary_chars();
        Self {
            content,
            params: overrides.parsing_changed(current),
        }
    }

    pub fn is_none(&self) -> bool {
        !self.content && !self.params
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueryCache {
    content: Section<String>,
    params: Section<Arc<ParsedQuery>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extracted query content keyed by raw URL.
    pub fn content(&self) -> &Section<String> {
        &self.content
    }

    /// Parse results keyed by raw query content.
    pub fn params(&self) -> &Section<Arc<ParsedQuery>> {
        &self.params
    }

    pub(crate) fn content_mut(&mut self) -> &mut Section<String> {
        &mut self.content
    }

    pub(crate) fn params_mut(&mut self) -> &mut Section<Arc<ParsedQuery>> {
        &mut self.params
    }

    pub fn invalidate(&mut self, inv: Invalidation) {
        if inv.content {
            debug!(entries = self.content.len(), "clearing content cache");
            self.content.clear();
        }
        if inv.params {
            debug!(entries = self.params.len(), "clearing params cache");
            self.params.clear();
        }
    }

    /// Empty both sections.
    pub fn purge(&mut self) {
        self.invalidate(Invalidation { content: true, params: true });
    }
}
