use crate::options::Options;
use crate::value::Value;

/// Turn a decoded (and possibly trimmed) raw value into a typed one.
///
/// Special words are tested in a fixed order: booleans, yes/no, `null`,
/// `undefined`, then the zero check. Each test is gated by its own flag and
/// the first match wins; anything else stays a string. Only the word tests
/// honour `specialValueCaseIgnore`; zero is always an exact match on `"0"`.
///
/// `undefined` coerces to `Null`, the same as `null`. The sentinel
/// [`Value::Undefined`] is reserved for "no such parameter", so a present
/// parameter never carries it.
pub fn coerce(raw: String, opts: &Options) -> Value {
    let folded;
    let cmp: &str = if opts.special_value_case_ignore {
        folded = raw.to_lowercase();
        &folded
    } else {
        &raw
    };

    if opts.parse_convert_bool {
        match cmp {
            "true" => return Value::Bool(true),
            "false" => return Value::Bool(false),
            _ => {}
        }
    }
    if opts.parse_convert_yes_no {
        match cmp {
            "yes" => return Value::Bool(true),
            "no" => return Value::Bool(false),
            _ => {}
        }
    }
    if opts.parse_convert_null && cmp == "null" {
        return Value::Null;
    }
    if opts.parse_convert_undefined && cmp == "undefined" {
        return Value::Null;
    }
    if opts.parse_convert_zero && raw == "0" {
        return Value::zero();
    }
    Value::String(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn with(f: impl FnOnce(&mut Options)) -> Options {
        let mut o = Options::default();
        f(&mut o);
        o
    }

    #[test]
    fn defaults() {
        let o = Options::default();
        assert_eq!(coerce("true".into(), &o), Value::Bool(true));
        assert_eq!(coerce("false".into(), &o), Value::Bool(false));
        assert_eq!(coerce("True".into(), &o), Value::from("True"));
        assert_eq!(coerce("yes".into(), &o), Value::from("yes"));
        assert_eq!(coerce("null".into(), &o), Value::Null);
        assert_eq!(coerce("undefined".into(), &o), Value::Null);
        assert_eq!(coerce("0".into(), &o), Value::zero());
        assert_eq!(coerce("0.0".into(), &o), Value::from("0.0"));
        assert_eq!(coerce("".into(), &o), Value::from(""));
    }

    #[test]
    fn flags_gate_each_test() {
        let off = with(|o| {
            o.parse_convert_bool = false;
            o.parse_convert_null = false;
            o.parse_convert_undefined = false;
            o.parse_convert_zero = false;
        });
        for s in ["true", "false", "null", "undefined", "0"] {
            assert_eq!(coerce(s.into(), &off), Value::from(s));
        }
        let yes_no = with(|o| o.parse_convert_yes_no = true);
        assert_eq!(coerce("yes".into(), &yes_no), Value::Bool(true));
        assert_eq!(coerce("no".into(), &yes_no), Value::Bool(false));
    }

    #[test]
    fn case_folding_applies_to_words_only() {
        let ci = with(|o| {
            o.special_value_case_ignore = true;
            o.parse_convert_yes_no = true;
        });
        assert_eq!(coerce("tRUe".into(), &ci), Value::Bool(true));
        assert_eq!(coerce("NuLl".into(), &ci), Value::Null);
        assert_eq!(coerce("YES".into(), &ci), Value::Bool(true));
        assert_eq!(coerce("UNDEFINED".into(), &ci), Value::Null);
    }
}
