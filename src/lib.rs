pub mod errors;
pub mod context;
pub mod options;
pub mod value;
pub mod cache;
pub mod parser;
pub mod builder;
mod coercion;
mod content;

use std::sync::Arc;

use tracing::trace;

use cache::{Invalidation, QueryCache};
use context::{Location, StaticLocation};
use parser::{ParamsView, ParsedQuery};

pub use builder::{build_query, params_from_json};
pub use coercion::coerce;
pub use content::extract_query_content;
pub use errors::{QueryError, Result};
pub use options::{Options, Overrides, QuestionMark};
pub use value::Value;

/// A parameter name to look up, or alternatives tried in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamName<'a> {
    One(&'a str),
    Alternatives(Vec<&'a str>),
}

impl<'a> From<&'a str> for ParamName<'a> {
    fn from(name: &'a str) -> Self {
        ParamName::One(name)
    }
}

impl<'a> From<&'a String> for ParamName<'a> {
    fn from(name: &'a String) -> Self {
        ParamName::One(name)
    }
}

impl<'a> From<&'a [&'a str]> for ParamName<'a> {
    fn from(names: &'a [&'a str]) -> Self {
        ParamName::Alternatives(names.to_vec())
    }
}

impl<'a, const N: usize> From<[&'a str; N]> for ParamName<'a> {
    fn from(names: [&'a str; N]) -> Self {
        ParamName::Alternatives(names.to_vec())
    }
}

impl<'a> From<Vec<&'a str>> for ParamName<'a> {
    fn from(names: Vec<&'a str>) -> Self {
        ParamName::Alternatives(names)
    }
}

/// Query-string state: the current options, the memoization cache, and the
/// location used when no URL is given. Independent handles share nothing.
///
/// Every parsing call takes [`Overrides`] that apply to that call only. When
/// those overrides would make a cache section stale, the call runs against a
/// throwaway section and leaves the handle's cache untouched.
pub struct QueryTools {
    options: Options,
    cache: QueryCache,
    location: Box<dyn Location>,
}

impl Default for QueryTools {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryTools {
    pub fn new() -> Self {
        Self::with_location(StaticLocation::default())
    }

    pub fn with_location(location: impl Location + 'static) -> Self {
        Self {
            options: Options::default(),
            cache: QueryCache::new(),
            location: Box::new(location),
        }
    }

    /// Restore the default options.
    pub fn init_options(&mut self) {
        self.options = Options::default();
    }

    pub fn reset_options(&mut self) {
        self.init_options();
    }

    /// Commit `overrides` to the handle's options, first clearing any cache
    /// section whose output an actually changed option would affect.
    pub fn set_options(&mut self, overrides: &Overrides) {
        self.cache.invalidate(Invalidation::between(&self.options, overrides));
        self.options = self.options.combine_with(overrides);
    }

    pub fn list_options(&self) -> &Options {
        &self.options
    }

    pub fn get_options(&self) -> &Options {
        self.list_options()
    }

    /// Effective options for one call.
    pub fn combine_options_with(&self, overrides: &Overrides) -> Options {
        self.options.combine_with(overrides)
    }

    pub fn get_cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn init_cache(&mut self) {
        self.cache.purge();
    }

    pub fn purge_cache(&mut self) {
        self.init_cache();
    }

    /// Query content of `url`, or of the ambient location when `None`.
    pub fn get_query_content(&mut self, url: Option<&str>, overrides: &Overrides) -> String {
        let url = url.map_or_else(|| self.location.href(), str::to_string);
        let opts = self.options.combine_with(overrides);
        if Invalidation::between(&self.options, overrides).content {
            return extract_query_content(&url, &opts).to_string();
        }
        if let Some(hit) = self.cache.content().get(&url) {
            trace!(url = %url, "content cache hit");
            return hit.clone();
        }
        let content = extract_query_content(&url, &opts).to_string();
        trace!(url = %url, content = %content, "content cache miss");
        self.cache.content_mut().insert(url, content.clone());
        content
    }

    /// Parse `content`; `extended` returns every view, otherwise the pairs or
    /// the name map per `listParamsAsPairs`.
    pub fn parse_query_content(
        &mut self,
        content: &str,
        overrides: &Overrides,
        extended: bool,
    ) -> ParamsView {
        let opts = self.options.combine_with(overrides);
        let parsed = self.parsed(content, overrides, &opts);
        ParamsView::select(parsed, extended, &opts)
    }

    /// Extract and parse the query of `url` (or the ambient location).
    pub fn list_query_params(
        &mut self,
        url: Option<&str>,
        overrides: &Overrides,
        extended: bool,
    ) -> ParamsView {
        let content = self.get_query_content(url, overrides);
        self.parse_query_content(&content, overrides, extended)
    }

    /// Value of one parameter, or of the first alternative that is present.
    /// Returns [`Value::Undefined`] when nothing matches.
    pub fn get_query_param<'a>(
        &mut self,
        name: impl Into<ParamName<'a>>,
        url: Option<&str>,
        overrides: &Overrides,
    ) -> Value {
        match name.into() {
            ParamName::One(name) => self.lookup(name, url, overrides),
            ParamName::Alternatives(names) => names
                .into_iter()
                .map(|name| self.lookup(name, url, overrides))
                .find(|v| !v.is_undefined())
                .unwrap_or_default(),
        }
    }

    pub fn build_query<I, K, V>(&self, params: I, overrides: &Overrides) -> String
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        build_query(params, &self.options.combine_with(overrides))
    }

    fn lookup(&mut self, name: &str, url: Option<&str>, overrides: &Overrides) -> Value {
        let opts = self.options.combine_with(overrides);
        // Same decode/trim/case rules as the parsed names.
        let mut name = parser::normalize(name, &opts);
        if opts.param_name_case_ignore {
            name = name.to_lowercase();
        }
        let content = self.get_query_content(url, overrides);
        let parsed = self.parsed(&content, overrides, &opts);
        parsed
            .position(&name, opts.param_name_case_ignore)
            .map(|i| parsed.values[i].clone())
            .unwrap_or_default()
    }

    fn parsed(&mut self, content: &str, overrides: &Overrides, opts: &Options) -> Arc<ParsedQuery> {
        if Invalidation::between(&self.options, overrides).params {
            return Arc::new(parser::parse(content, opts));
        }
        if let Some(hit) = self.cache.params().get(content) {
            trace!(content, "params cache hit");
            return Arc::clone(hit);
        }
        trace!(content, "params cache miss");
        let parsed = Arc::new(parser::parse(content, opts));
        self.cache.params_mut().insert(content, Arc::clone(&parsed));
        parsed
    }
}

/// Convenience: look up `name` in `url` with default options.
pub fn query_param<'a>(name: impl Into<ParamName<'a>>, url: &str) -> Value {
    QueryTools::new().get_query_param(name, Some(url), &Overrides::default())
}
