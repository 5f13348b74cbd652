//! Emptiness checks per semantic field type.
//!
//! A value is "empty" when it is missing or does not hold a meaningful value
//! of its declared type. Format-based types (email, phone, url, domain, date)
//! are empty when the value fails the corresponding validator.

use crate::resource::clean;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::Value;

/// Semantic type of a field, as declared by the resource validating it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Text with at least one non-whitespace character.
    String,
    /// Any number except zero.
    Number,
    /// A number strictly greater than zero.
    PositiveNumber,
    /// A truthy value.
    Boolean,
    /// A non-empty array or mapping.
    Object,
    /// A calendar date: RFC 3339, `YYYY-MM-DD` or epoch milliseconds.
    Date,
    /// An email address.
    Email,
    /// A phone number, 7 to 15 digits with an optional leading `+`.
    Phone,
    /// An absolute `http` or `https` URL.
    Url,
    /// A fully qualified domain name.
    Domain,
}

/// Infers the field type from the JSON representation of `value`.
pub fn infer(value: &Value) -> Option<FieldType> {
    match value {
        Value::Null => None,
        Value::Bool(_) => Some(FieldType::Boolean),
        Value::Number(_) => Some(FieldType::Number),
        Value::String(_) => Some(FieldType::String),
        Value::Array(_) | Value::Object(_) => Some(FieldType::Object),
    }
}

/// Whether `value` is empty for `kind`, inferring the type when `kind` is `None`.
///
/// `null` is always empty. Note that zero is empty for [`FieldType::Number`].
///
/// ```rust
/// use dynamodb_resource::resource::check::{FieldType, is_empty};
/// use serde_json::json;
///
/// assert!(is_empty(&json!("  "), Some(FieldType::String)));
/// assert!(is_empty(&json!(0), Some(FieldType::Number)));
/// assert!(!is_empty(&json!("a@b.com"), Some(FieldType::Email)));
/// assert!(is_empty(&json!({}), None));
/// ```
pub fn is_empty(value: &Value, kind: Option<FieldType>) -> bool {
    let Some(kind) = kind.or_else(|| infer(value)) else {
        return true;
    };
    if value.is_null() {
        return true;
    }
    match kind {
        FieldType::String => value.as_str().is_none_or(|text| text.trim().is_empty()),
        FieldType::Number => value.as_f64().is_none_or(|number| number == 0.0),
        FieldType::PositiveNumber => value.as_f64().is_none_or(|number| number <= 0.0),
        FieldType::Boolean => !clean::is_truthy(value),
        FieldType::Object => match value {
            Value::Array(elements) => !elements.iter().any(clean::is_truthy),
            Value::Object(map) => map.is_empty(),
            Value::String(text) => text.is_empty(),
            _ => true,
        },
        FieldType::Date => !is_date(value),
        FieldType::Email => value.as_str().is_none_or(|text| !is_email(text)),
        FieldType::Phone => value.as_str().is_none_or(|text| !is_phone(text)),
        FieldType::Url => value.as_str().is_none_or(|text| !is_url(text)),
        FieldType::Domain => value.as_str().is_none_or(|text| !is_domain(text)),
    }
}

/// [`is_empty`] for typed fields; the value is checked through its JSON form.
///
/// `None` serializes to `null` and is therefore empty.
pub fn is_blank<T: Serialize + ?Sized>(value: &T, kind: Option<FieldType>) -> bool {
    serde_json::to_value(value).map_or(true, |value| is_empty(&value, kind))
}

fn is_date(value: &Value) -> bool {
    match value {
        Value::String(text) => {
            let text = text.trim();
            DateTime::parse_from_rfc3339(text).is_ok()
                || NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
                || NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
        }
        Value::Number(number) => number
            .as_f64()
            .filter(|millis| millis.is_finite())
            .and_then(|millis| DateTime::from_timestamp_millis(millis as i64))
            .is_some(),
        _ => false,
    }
}

fn is_email(text: &str) -> bool {
    let Some((local, domain)) = text.rsplit_once('@') else {
        return false;
    };
    !local.is_empty()
        && local.len() <= 64
        && !local.starts_with('.')
        && !local.ends_with('.')
        && !local.contains("..")
        && local.chars().all(is_email_local_char)
        && is_domain(domain)
}

fn is_email_local_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || "!#$%&'*+/=?^_`{|}~.-".contains(ch)
}

fn is_phone(text: &str) -> bool {
    let text = text.trim();
    let text = text.strip_prefix('+').unwrap_or(text);
    let mut digits = 0;
    for ch in text.chars() {
        match ch {
            '0'..='9' => digits += 1,
            ' ' | '-' | '.' | '(' | ')' => {}
            _ => return false,
        }
    }
    (7..=15).contains(&digits)
}

fn is_url(text: &str) -> bool {
    let Some((scheme, rest)) = text.split_once("://") else {
        return false;
    };
    if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
        return false;
    }
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let (authority, tail) = rest.split_at(end);
    if tail.chars().any(char::is_whitespace) {
        return false;
    }
    let host = match authority.rsplit_once(':') {
        Some((host, port)) => {
            if port.is_empty() || !port.chars().all(|ch| ch.is_ascii_digit()) {
                return false;
            }
            host
        }
        None => authority,
    };
    host.eq_ignore_ascii_case("localhost") || is_ipv4(host) || is_domain(host)
}

fn is_ipv4(text: &str) -> bool {
    text.parse::<std::net::Ipv4Addr>().is_ok()
}

fn is_domain(text: &str) -> bool {
    let text = text.strip_suffix('.').unwrap_or(text);
    if text.is_empty() || text.len() > 253 {
        return false;
    }
    let labels = text.split('.').collect::<Vec<_>>();
    let Some(tld) = labels.last() else {
        return false;
    };
    labels.len() >= 2
        && tld.len() >= 2
        && tld.chars().all(|ch| ch.is_ascii_alphabetic())
        && labels.iter().all(|label| is_domain_label(label))
}

fn is_domain_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= 63
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '-')
}
