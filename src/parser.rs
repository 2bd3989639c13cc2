// src/parser.rs
use std::borrow::Cow;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::coercion::coerce;
use crate::options::Options;
use crate::value::Value;

/// Every view of one parsed query content.
///
/// The five sequences are index-aligned and in parse order. The two maps are
/// derived from the pair sequences; a repeated name keeps its first position
/// and takes the last value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedQuery {
    pub keys: Vec<String>,
    #[serde(rename = "keysLC")]
    pub keys_lc: Vec<String>,
    pub values: Vec<Value>,
    pub pairs: Vec<(String, Value)>,
    #[serde(rename = "pairsLC")]
    pub pairs_lc: Vec<(String, Value)>,
    pub object: IndexMap<String, Value>,
    #[serde(rename = "objectLC")]
    pub object_lc: IndexMap<String, Value>,
}

impl ParsedQuery {
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn push(&mut self, name: String, value: Value) {
        let name_lc = name.to_lowercase();
        self.object.insert(name.clone(), value.clone());
        self.object_lc.insert(name_lc.clone(), value.clone());
        self.pairs.push((name.clone(), value.clone()));
        self.pairs_lc.push((name_lc.clone(), value.clone()));
        self.keys.push(name);
        self.keys_lc.push(name_lc);
        self.values.push(value);
    }

    /// Index of the first parameter named `name`, compared against the
    /// lower-cased names when `case_ignore` is set.
    pub fn position(&self, name: &str, case_ignore: bool) -> Option<usize> {
        let keys = if case_ignore { &self.keys_lc } else { &self.keys };
        keys.iter().position(|k| k == name)
    }
}

/// The shape handed back by parse and list calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamsView {
    Extended(Arc<ParsedQuery>),
    Pairs(Vec<(String, Value)>),
    Object(IndexMap<String, Value>),
}

impl ParamsView {
    /// Pick the view requested by `extended` and `listParamsAsPairs`.
    pub fn select(parsed: Arc<ParsedQuery>, extended: bool, opts: &Options) -> Self {
        if extended {
            ParamsView::Extended(parsed)
        } else if opts.list_params_as_pairs {
            ParamsView::Pairs(parsed.pairs.clone())
        } else {
            ParamsView::Object(parsed.object.clone())
        }
    }

    /// Value stored under the original-case `name`, last occurrence winning.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self {
            ParamsView::Extended(p) => p.object.get(name),
            ParamsView::Object(map) => map.get(name),
            ParamsView::Pairs(pairs) => pairs.iter().rev().find(|(k, _)| k == name).map(|(_, v)| v),
        }
    }

    pub fn extended(&self) -> Option<&ParsedQuery> {
        match self {
            ParamsView::Extended(p) => Some(p),
            _ => None,
        }
    }

    pub fn pairs(&self) -> Option<&[(String, Value)]> {
        match self {
            ParamsView::Pairs(p) => Some(p),
            _ => None,
        }
    }

    pub fn object(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            ParamsView::Object(m) => Some(m),
            _ => None,
        }
    }
}

/// Percent-decode, or keep the raw text when it does not decode to UTF-8.
pub(crate) fn decode(raw: &str) -> Cow<'_, str> {
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded,
        Err(e) => {
            debug!(raw, error = %e, "percent-decoding failed, keeping raw text");
            Cow::Borrowed(raw)
        }
    }
}

/// Decode and trim a name or value per `opts`.
pub(crate) fn normalize(raw: &str, opts: &Options) -> String {
    let decoded = if opts.url_encode_and_decode { decode(raw) } else { Cow::Borrowed(raw) };
    if opts.trim_whitespaces {
        decoded.trim().to_string()
    } else {
        decoded.into_owned()
    }
}

/// Parse query content into all of its views.
pub fn parse(content: &str, opts: &Options) -> ParsedQuery {
    let mut out = ParsedQuery::default();
    for segment in content.split(opts.param_separator.as_str()).filter(|s| !s.is_empty()) {
        // An empty value separator means segments carry names only.
        let (raw_name, raw_value) = match opts.value_separator.as_str() {
            "" => (segment, ""),
            sep => segment.split_once(sep).unwrap_or((segment, "")),
        };
        let name = normalize(raw_name, opts);
        if opts.skip_empty_param_names && name.is_empty() {
            continue;
        }
        let value = coerce(normalize(raw_value, opts), opts);
        out.push(name, value);
    }
    out
}
