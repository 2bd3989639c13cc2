//! Configuration for parsing and building.
//!
//! [`Options`] is the full configuration a [`QueryTools`](crate::QueryTools)
//! handle carries. [`Overrides`] is the partial form used for `set_options`
//! and for one-shot, call-scoped changes: a field that is `None` keeps the
//! current value.
//!
//! | option                   | default  |
//! |--------------------------|----------|
//! | `paramSeparator`         | `&`      |
//! | `valueSeparator`         | `=`      |
//! | `urlEncodeAndDecode`     | `true`   |
//! | `trimWhitespaces`        | `false`  |
//! | `skipEmptyParamNames`    | `true`   |
//! | `paramNameCaseIgnore`    | `true`   |
//! | `parseConvertZero`       | `true`   |
//! | `parseConvertBool`       | `true`   |
//! | `parseConvertYesNo`      | `false`  |
//! | `parseConvertNull`       | `true`   |
//! | `parseConvertUndefined`  | `true`   |
//! | `specialValueCaseIgnore` | `false`  |
//! | `listParamsAsPairs`      | `false`  |
//! | `buildSkipNull`          | `false`  |
//! | `buildSkipUndefined`     | `true`   |
//! | `buildConvertBoolToNum`  | `false`  |
//! | `separateEmptyValues`    | `true`   |
//! | `queryQuestionMark`      | `"auto"` |

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

use crate::errors::{QueryError, Result};

/// Every recognised option name, in table order.
pub const OPTION_NAMES: [&str; 18] = [
    "paramSeparator",
    "valueSeparator",
    "urlEncodeAndDecode",
    "trimWhitespaces",
    "skipEmptyParamNames",
    "paramNameCaseIgnore",
    "parseConvertZero",
    "parseConvertBool",
    "parseConvertYesNo",
    "parseConvertNull",
    "parseConvertUndefined",
    "specialValueCaseIgnore",
    "listParamsAsPairs",
    "buildSkipNull",
    "buildSkipUndefined",
    "buildConvertBoolToNum",
    "separateEmptyValues",
    "queryQuestionMark",
];

/// Leading `?` policy for built queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuestionMark {
    Always,
    Never,
    /// Only when the built query is non-empty.
    #[default]
    Auto,
}

impl QuestionMark {
    /// `true`/`false` map to always/never; anything else is auto.
    pub fn from_text(text: &str) -> Self {
        match text {
            "true" => QuestionMark::Always,
            "false" => QuestionMark::Never,
            _ => QuestionMark::Auto,
        }
    }
}

impl Serialize for QuestionMark {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            QuestionMark::Always => serializer.serialize_bool(true),
            QuestionMark::Never => serializer.serialize_bool(false),
            QuestionMark::Auto => serializer.serialize_str("auto"),
        }
    }
}

impl<'de> Deserialize<'de> for QuestionMark {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Bool(true) => QuestionMark::Always,
            serde_json::Value::Bool(false) => QuestionMark::Never,
            _ => QuestionMark::Auto,
        })
    }
}

/// A complete configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    pub param_separator: String,
    pub value_separator: String,
    pub url_encode_and_decode: bool,
    pub trim_whitespaces: bool,
    pub skip_empty_param_names: bool,
    pub param_name_case_ignore: bool,
    pub parse_convert_zero: bool,
    pub parse_convert_bool: bool,
    pub parse_convert_yes_no: bool,
    pub parse_convert_null: bool,
    pub parse_convert_undefined: bool,
    pub special_value_case_ignore: bool,
    pub list_params_as_pairs: bool,
    pub build_skip_null: bool,
    pub build_skip_undefined: bool,
    pub build_convert_bool_to_num: bool,
    pub separate_empty_values: bool,
    pub query_question_mark: QuestionMark,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            param_separator: "&".to_string(),
            value_separator: "=".to_string(),
            url_encode_and_decode: true,
            trim_whitespaces: false,
            skip_empty_param_names: true,
            param_name_case_ignore: true,
            parse_convert_zero: true,
            parse_convert_bool: true,
            parse_convert_yes_no: false,
            parse_convert_null: true,
            parse_convert_undefined: true,
            special_value_case_ignore: false,
            list_params_as_pairs: false,
            build_skip_null: false,
            build_skip_undefined: true,
            build_convert_bool_to_num: false,
            separate_empty_values: true,
            query_question_mark: QuestionMark::Auto,
        }
    }
}

/// True if `s` contains a character that delimits the query inside a URL.
pub(crate) fn contains_boundary_chars(s: &str) -> bool {
    s.contains(['?', '#'])
}

impl Options {
    /// Effective configuration for one call. Neither input is modified.
    pub fn combine_with(&self, overrides: &Overrides) -> Options {
        macro_rules! pick {
            ($($field:ident),*) => {
                Options {
                    $($field: overrides.$field.clone().unwrap_or_else(|| self.$field.clone()),)*
                }
            };
        }
        pick!(
            param_separator,
            value_separator,
            url_encode_and_decode,
            trim_whitespaces,
            skip_empty_param_names,
            param_name_case_ignore,
            parse_convert_zero,
            parse_convert_bool,
            parse_convert_yes_no,
            parse_convert_null,
            parse_convert_undefined,
            special_value_case_ignore,
            list_params_as_pairs,
            build_skip_null,
            build_skip_undefined,
            build_convert_bool_to_num,
            separate_empty_values,
            query_question_mark
        )
    }

    /// When a separator contains `?` or `#`, a URL cannot be cut into its
    /// query part and the whole input is treated as query content.
    pub fn separators_contain_boundary_chars(&self) -> bool {
        contains_boundary_chars(&self.param_separator)
            || contains_boundary_chars(&self.value_separator)
    }
}

/// A partial configuration. Present fields override, absent fields inherit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param_separator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_separator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_encode_and_decode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trim_whitespaces: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_empty_param_names: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param_name_case_ignore: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_convert_zero: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_convert_bool: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_convert_yes_no: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_convert_null: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_convert_undefined: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_value_case_ignore: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_params_as_pairs: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_skip_null: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_skip_undefined: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_convert_bool_to_num: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub separate_empty_values: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_question_mark: Option<QuestionMark>,
}

/// Overridden and different from the current value.
pub(crate) fn differs<T: PartialEq>(over: &Option<T>, current: &T) -> bool {
    over.as_ref().is_some_and(|v| v != current)
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object keyed by option names. Unknown keys are ignored.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse and apply one `name=value` assignment.
    pub fn parse_assignment(&mut self, text: &str) -> Result<()> {
        let (name, value) = text
            .split_once('=')
            .ok_or_else(|| QueryError::MalformedAssignment(text.to_string()))?;
        let name = name.trim();
        let flag = || -> Result<Option<bool>> {
            match value.trim() {
                "true" => Ok(Some(true)),
                "false" => Ok(Some(false)),
                other => Err(QueryError::InvalidOptionValue {
                    name: name.to_string(),
                    value: other.to_string(),
                }),
            }
        };
        match name {
            "paramSeparator" => self.param_separator = Some(value.to_string()),
            "valueSeparator" => self.value_separator = Some(value.to_string()),
            "urlEncodeAndDecode" => self.url_encode_and_decode = flag()?,
            "trimWhitespaces" => self.trim_whitespaces = flag()?,
            "skipEmptyParamNames" => self.skip_empty_param_names = flag()?,
            "paramNameCaseIgnore" => self.param_name_case_ignore = flag()?,
            "parseConvertZero" => self.parse_convert_zero = flag()?,
            "parseConvertBool" => self.parse_convert_bool = flag()?,
            "parseConvertYesNo" => self.parse_convert_yes_no = flag()?,
            "parseConvertNull" => self.parse_convert_null = flag()?,
            "parseConvertUndefined" => self.parse_convert_undefined = flag()?,
            "specialValueCaseIgnore" => self.special_value_case_ignore = flag()?,
            "listParamsAsPairs" => self.list_params_as_pairs = flag()?,
            "buildSkipNull" => self.build_skip_null = flag()?,
            "buildSkipUndefined" => self.build_skip_undefined = flag()?,
            "buildConvertBoolToNum" => self.build_convert_bool_to_num = flag()?,
            "separateEmptyValues" => self.separate_empty_values = flag()?,
            "queryQuestionMark" => {
                self.query_question_mark = Some(QuestionMark::from_text(value.trim()))
            }
            unknown => warn!(option = unknown, "ignoring unknown option"),
        }
        Ok(())
    }

    /// Later fields win: `other`'s present fields replace ours.
    pub fn merge(mut self, other: Overrides) -> Overrides {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if other.$field.is_some() { self.$field = other.$field; })*
            };
        }
        take!(
            param_separator,
            value_separator,
            url_encode_and_decode,
            trim_whitespaces,
            skip_empty_param_names,
            param_name_case_ignore,
            parse_convert_zero,
            parse_convert_bool,
            parse_convert_yes_no,
            parse_convert_null,
            parse_convert_undefined,
            special_value_case_ignore,
            list_params_as_pairs,
            build_skip_null,
            build_skip_undefined,
            build_convert_bool_to_num,
            separate_empty_values,
            query_question_mark
        );
        self
    }

    /// Some overridden separator differs from `current`.
    pub(crate) fn separators_changed(&self, current: &Options) -> bool {
        differs(&self.param_separator, &current.param_separator)
            || differs(&self.value_separator, &current.value_separator)
    }

    /// Some overridden option that shapes parser output differs from `current`.
    pub(crate) fn parsing_changed(&self, current: &Options) -> bool {
        self.separators_changed(current)
            || differs(&self.url_encode_and_decode, &current.url_encode_and_decode)
            || differs(&self.trim_whitespaces, &current.trim_whitespaces)
            || differs(&self.skip_empty_param_names, &current.skip_empty_param_names)
            || differs(&self.parse_convert_zero, &current.parse_convert_zero)
            || differs(&self.parse_convert_bool, &current.parse_convert_bool)
            || differs(&self.parse_convert_yes_no, &current.parse_convert_yes_no)
            || differs(&self.parse_convert_null, &current.parse_convert_null)
            || differs(&self.parse_convert_undefined, &current.parse_convert_undefined)
            || differs(&self.special_value_case_ignore, &current.special_value_case_ignore)
    }
}

impl TryFrom<serde_json::Value> for Overrides {
    type Error = QueryError;

    fn try_from(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn defaults_serialize_with_original_names() {
        let v = serde_json::to_value(Options::default()).unwrap();
        assert_eq!(
            v,
            json!({
                "paramSeparator": "&",
                "valueSeparator": "=",
                "urlEncodeAndDecode": true,
                "trimWhitespaces": false,
                "skipEmptyParamNames": true,
                "paramNameCaseIgnore": true,
                "parseConvertZero": true,
                "parseConvertBool": true,
                "parseConvertYesNo": false,
                "parseConvertNull": true,
                "parseConvertUndefined": true,
                "specialValueCaseIgnore": false,
                "listParamsAsPairs": false,
                "buildSkipNull": false,
                "buildSkipUndefined": true,
                "buildConvertBoolToNum": false,
                "separateEmptyValues": true,
                "queryQuestionMark": "auto"
            })
        );
        let names: Vec<&str> = v.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(names, OPTION_NAMES.to_vec());
    }

    #[test]
    fn combine_keeps_inputs_untouched() {
        let base = Options::default();
        let over = Overrides::try_from(json!({
            "paramSeparator": ";",
            "parseConvertBool": false,
            "nonexistentOption": true
        }))
        .unwrap();
        let merged = base.combine_with(&over);
        assert_eq!(merged.param_separator, ";");
        assert!(!merged.parse_convert_bool);
        assert!(merged.parse_convert_null);
        assert_eq!(base, Options::default());
    }

    #[test]
    fn question_mark_accepts_any_value() {
        let over = Overrides::try_from(json!({ "queryQuestionMark": "sometimes" })).unwrap();
        assert_eq!(over.query_question_mark, Some(QuestionMark::Auto));
        let over = Overrides::try_from(json!({ "queryQuestionMark": true })).unwrap();
        assert_eq!(over.query_question_mark, Some(QuestionMark::Always));
        let over = Overrides::try_from(json!({ "queryQuestionMark": null })).unwrap();
        assert_eq!(over.query_question_mark, None);
    }

    #[test]
    fn merge_prefers_later_fields() {
        let base = Overrides::try_from(json!({ "paramSeparator": ";", "trimWhitespaces": true })).unwrap();
        let mut top = Overrides::new();
        top.parse_assignment("paramSeparator=|").unwrap();
        top.parse_assignment("buildSkipNull=true").unwrap();
        let merged = base.merge(top);
        assert_eq!(merged.param_separator.as_deref(), Some("|"));
        assert_eq!(merged.trim_whitespaces, Some(true));
        assert_eq!(merged.build_skip_null, Some(true));
        assert_eq!(merged.value_separator, None);
    }

    #[test]
    fn assignments() {
        let mut over = Overrides::new();
        over.parse_assignment("paramSeparator=;").unwrap();
        over.parse_assignment("valueSeparator==").unwrap();
        over.parse_assignment("trimWhitespaces=true").unwrap();
        over.parse_assignment("queryQuestionMark=false").unwrap();
        over.parse_assignment("whatever=1").unwrap();
        assert_eq!(over.param_separator.as_deref(), Some(";"));
        assert_eq!(over.value_separator.as_deref(), Some("="));
        assert_eq!(over.trim_whitespaces, Some(true));
        assert_eq!(over.query_question_mark, Some(QuestionMark::Never));

        assert!(matches!(
            over.parse_assignment("buildSkipNull=yes"),
            Err(QueryError::InvalidOptionValue { .. })
        ));
        assert!(matches!(
            over.parse_assignment("buildSkipNull"),
            Err(QueryError::MalformedAssignment(_))
        ));
    }

    #[test]
    fn change_detection_compares_against_current() {
        let cur = Options::default();
        let same = Overrides { url_encode_and_decode: Some(true), ..Overrides::default() };
        assert!(!same.parsing_changed(&cur));
        let build_only = Overrides { build_skip_null: Some(true), ..Overrides::default() };
        assert!(!build_only.parsing_changed(&cur));
        let sep = Overrides { value_separator: Some(":".into()), ..Overrides::default() };
        assert!(sep.separators_changed(&cur));
        assert!(sep.parsing_changed(&cur));
    }
}
