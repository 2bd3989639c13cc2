use itertools::Itertools;

use crate::errors::{QueryError, Result};
use crate::options::{Options, QuestionMark};
use crate::value::Value;

/// Serialize ordered `(name, value)` pairs into a query string.
///
/// Maps are accepted through their own iteration order, so an `IndexMap` or
/// a `serde_json::Map` keeps insertion order.
///
/// ```
/// use url_query_tools::{build_query, Options, Value};
///
/// let q = build_query([("someParam", Value::from(10)), ("foo", "bar".into())], &Options::default());
/// assert_eq!(q, "?someParam=10&foo=bar");
/// ```
pub fn build_query<I, K, V>(params: I, opts: &Options) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    let joined = params
        .into_iter()
        .filter_map(|(name, value)| build_part(name.into(), value.into(), opts))
        .join(&opts.param_separator);

    let mark = match opts.query_question_mark {
        QuestionMark::Always => true,
        QuestionMark::Never => false,
        QuestionMark::Auto => !joined.is_empty(),
    };
    if mark {
        format!("?{joined}")
    } else {
        joined
    }
}

fn build_part(mut name: String, mut value: Value, opts: &Options) -> Option<String> {
    if opts.trim_whitespaces {
        name = name.trim().to_string();
        if let Value::String(s) = &value {
            value = Value::String(s.trim().to_string());
        }
    }
    if opts.skip_empty_param_names && name.is_empty() {
        return None;
    }
    if (opts.build_skip_undefined && value.is_undefined()) || (opts.build_skip_null && value.is_null()) {
        return None;
    }
    if let (true, Some(b)) = (opts.build_convert_bool_to_num, value.as_bool()) {
        value = Value::from(u8::from(b));
    }

    let mut text = value.to_string();
    if opts.url_encode_and_decode {
        name = urlencoding::encode(&name).into_owned();
        text = urlencoding::encode(&text).into_owned();
    }
    if text.is_empty() && !opts.separate_empty_values {
        Some(name)
    } else {
        Some(format!("{name}{}{text}", opts.value_separator))
    }
}

/// Read builder input from JSON: an object, or an array of `[name, value]`
/// pairs. A pair without a value carries the absent sentinel.
pub fn params_from_json(json: &serde_json::Value) -> Result<Vec<(String, Value)>> {
    match json {
        serde_json::Value::Object(map) => Ok(map
            .iter()
            .map(|(k, v)| (k.clone(), Value::from(v.clone())))
            .collect()),
        serde_json::Value::Array(items) => items
            .iter()
            .map(|item| match item.as_array().map(Vec::as_slice) {
                Some([name, rest @ ..]) => {
                    let name = match name {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    let value = rest.first().cloned().map(Value::from).unwrap_or_default();
                    Ok((name, value))
                }
                _ => Err(QueryError::InvalidParams(item.to_string())),
            })
            .collect(),
        other => Err(QueryError::InvalidParams(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn opts(f: impl FnOnce(&mut Options)) -> Options {
        let mut o = Options::default();
        f(&mut o);
        o
    }

    fn no_params() -> Vec<(String, Value)> {
        Vec::new()
    }

    #[test]
    fn question_mark_policy() {
        assert_eq!(build_query(no_params(), &Options::default()), "");
        let always = opts(|o| o.query_question_mark = QuestionMark::Always);
        assert_eq!(build_query(no_params(), &always), "?");
        assert_eq!(build_query([("a", 1)], &Options::default()), "?a=1");
        let never = opts(|o| o.query_question_mark = QuestionMark::Never);
        assert_eq!(build_query([("a", 1)], &never), "a=1");
    }

    #[test]
    fn skipping_rules() {
        let params = vec![
            ("a", Value::from(10)),
            ("b", Value::Null),
            ("c", Value::Undefined),
            ("", Value::from("x")),
            ("d", Value::from(2)),
        ];
        assert_eq!(build_query(params.clone(), &Options::default()), "?a=10&b=null&d=2");

        let o = opts(|o| {
            o.build_skip_null = true;
            o.build_skip_undefined = false;
            o.skip_empty_param_names = false;
        });
        assert_eq!(build_query(params, &o), "?a=10&c=undefined&=x&d=2");
    }

    #[test]
    fn booleans_and_empty_values() {
        let params = [("a", Value::from(true)), ("b", Value::from(false)), ("c", Value::from(""))];
        assert_eq!(build_query(params.clone(), &Options::default()), "?a=true&b=false&c=");
        let o = opts(|o| {
            o.build_convert_bool_to_num = true;
            o.separate_empty_values = false;
        });
        assert_eq!(build_query(params, &o), "?a=1&b=0&c");
    }

    #[test]
    fn encoding_trimming_and_separators() {
        let params = [(" spaced param ", Value::from(" has space "))];
        assert_eq!(build_query(params.clone(), &Options::default()), "?%20spaced%20param%20=%20has%20space%20");

        let o = opts(|o| {
            o.trim_whitespaces = true;
            o.url_encode_and_decode = false;
            o.param_separator = ";".into();
            o.value_separator = ":".into();
        });
        assert_eq!(build_query(params, &o), "?spaced param:has space");
        assert_eq!(build_query([("a", 1), ("b", 2)], &o), "?a:1;b:2");
    }

    #[test]
    fn whole_floats_render_as_integers() {
        let from_json = params_from_json(&json!({ "a": 10.0, "b": 6.5 })).unwrap();
        assert_eq!(build_query(from_json, &Options::default()), "?a=10&b=6.5");
        assert_eq!(build_query([("a", Value::from(2.0_f64))], &Options::default()), "?a=2");
    }

    #[test]
    fn json_input_shapes() {
        let obj = params_from_json(&json!({ "someParam": 10, "otherOne": 6.5, "foo": "bar" })).unwrap();
        assert_eq!(build_query(obj, &Options::default()), "?someParam=10&otherOne=6.5&foo=bar");

        let pairs = params_from_json(&json!([["someParam", 10], ["otherOne", 6.5], ["foo"]])).unwrap();
        assert_eq!(pairs[2].1, Value::Undefined);
        assert_eq!(build_query(pairs, &Options::default()), "?someParam=10&otherOne=6.5");

        assert!(matches!(params_from_json(&json!("a=1")), Err(QueryError::InvalidParams(_))));
        assert!(matches!(params_from_json(&json!([[]])), Err(QueryError::InvalidParams(_))));
    }
}
