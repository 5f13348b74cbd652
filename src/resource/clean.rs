//! Coercion of raw JSON values into typed fields.
//!
//! A raw value is *present* when it is anything other than missing, `null` or
//! the empty string; `0` and `false` are present. Present values go through a
//! cast function, absent ones (and failed casts) fall back to a default.

use crate::resource::{Loadable, Options};

use serde_json::Value;

/// Whether `raw` counts as missing.
pub fn is_absent(raw: Option<&Value>) -> bool {
    match raw {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.is_empty(),
        Some(_) => false,
    }
}

/// JavaScript-style truthiness of a JSON value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|number| number != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Casts a present `raw` value, otherwise returns `default`.
///
/// A cast that yields `None` also falls back to `default`. Arrays go through
/// [`clean_array`] and booleans through [`clean_bool`].
///
/// ```rust
/// use dynamodb_resource::resource::clean::{cast, clean};
/// use serde_json::json;
///
/// assert_eq!(clean(Some(&json!(0)), cast::number, Some(99.0)), Some(0.0));
/// assert_eq!(clean(None, cast::number, Some(99.0)), Some(99.0));
/// assert_eq!(clean(Some(&json!("")), cast::string, None), None);
/// ```
pub fn clean<T>(
    raw: Option<&Value>,
    cast: impl FnOnce(&Value) -> Option<T>,
    default: Option<T>,
) -> Option<T> {
    match raw {
        Some(value) if !is_absent(raw) => cast(value).or(default),
        _ => default,
    }
}

/// Truthiness of `raw`; `0`, `""`, `false`, `null` and missing are all `false`.
pub fn clean_bool(raw: Option<&Value>) -> bool {
    raw.is_some_and(is_truthy)
}

/// Cleans every element of an array, dropping the ones that end up `None`.
///
/// A missing or non-array `raw` yields an empty vector. Element order is kept.
///
/// ```rust
/// use dynamodb_resource::resource::clean::{cast, clean_array};
/// use serde_json::json;
///
/// let raw = json!([1, 0, null, false, "a"]);
/// let cleaned = clean_array(Some(&raw), cast::value, None);
/// assert_eq!(cleaned, vec![json!(1), json!(0), json!(false), json!("a")]);
/// ```
pub fn clean_array<T: Clone>(
    raw: Option<&Value>,
    cast: impl Fn(&Value) -> Option<T>,
    default: Option<T>,
) -> Vec<T> {
    let Some(Value::Array(elements)) = raw else {
        return Vec::new();
    };
    elements
        .iter()
        .filter_map(|element| clean(Some(element), &cast, default.clone()))
        .collect()
}

/// Cast functions for [`clean`] and [`clean_array`].
///
/// There is no boolean cast: booleans never fall back to a default and go
/// through [`clean_bool`](super::clean_bool) instead.
pub mod cast {
    use super::*;

    /// Keeps the raw value as is.
    pub fn value(raw: &Value) -> Option<Value> {
        Some(raw.clone())
    }

    /// Text, numbers and booleans as a string; arrays and objects do not cast.
    pub fn string(raw: &Value) -> Option<String> {
        match raw {
            Value::String(text) => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            Value::Bool(flag) => Some(flag.to_string()),
            _ => None,
        }
    }

    /// Numbers, numeric strings and booleans (`1`/`0`) as a finite `f64`.
    pub fn number(raw: &Value) -> Option<f64> {
        let number = match raw {
            Value::Number(number) => number.as_f64()?,
            Value::String(text) => text.trim().parse::<f64>().ok()?,
            Value::Bool(flag) => f64::from(u8::from(*flag)),
            _ => return None,
        };
        number.is_finite().then_some(number)
    }

    /// [`number`] truncated toward zero.
    pub fn integer(raw: &Value) -> Option<i64> {
        if let Some(integer) = raw.as_i64() {
            return Some(integer);
        }
        number(raw).map(|number| number.trunc() as i64)
    }

    /// Builds a nested resource from the raw sub-object.
    pub fn resource<R: Loadable>(options: &Options) -> impl Fn(&Value) -> Option<R> + '_ {
        move |raw| Some(R::new(Some(raw), options))
    }
}
