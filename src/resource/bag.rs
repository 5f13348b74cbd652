use crate::resource::{
    Options,
    check::{self, FieldType},
    clean::clean,
};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Map from an externally supplied key set (language codes, custom field
/// names...) to typed values.
///
/// Keys outside [`Options::allowed_keys`] are dropped on load.
///
/// ```rust
/// use dynamodb_resource::resource::{Options, bag::Bag, check::FieldType, clean::cast};
/// use serde_json::json;
///
/// let options = Options::with_allowed_keys(["en", "it"]).default_key("en");
/// let mut label = Bag::default();
/// label.load(Some(&json!({"en": "", "it": "Ciao", "xx": "?"})), &options, cast::string);
/// assert_eq!(label.get("it").map(String::as_str), Some("Ciao"));
/// assert_eq!(label.get("xx"), None);
/// assert_eq!(label.validate("label", &options, FieldType::String), vec!["label.en"]);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bag<V> {
    entries: IndexMap<String, V>,
}

impl<V> Default for Bag<V> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<V> Bag<V> {
    /// Replaces the content with the allowed keys of the raw mapping.
    ///
    /// Values go through [`clean`] with `cast`; absent values and failed casts
    /// are skipped. A non-object `raw` leaves the bag empty.
    pub fn load(
        &mut self,
        raw: Option<&Value>,
        options: &Options,
        cast: impl Fn(&Value) -> Option<V>,
    ) {
        self.entries.clear();
        let Some(Value::Object(map)) = raw else {
            return;
        };
        for (key, value) in map {
            if !options.allows(key) {
                continue;
            }
            if let Some(value) = clean(Some(value), &cast, None) {
                self.entries.insert(key.clone(), value);
            }
        }
    }

    /// Value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    /// Stores `value` under `key`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        self.entries.insert(key.into(), value)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the bag holds no entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in load order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &V)> {
        self.entries.iter()
    }
}

impl<V: Serialize> Bag<V> {
    /// Flags `field.key` for every entry that is empty for `kind`, and
    /// `field.default_key` when the configured default key has no usable value.
    pub fn validate(&self, field: &str, options: &Options, kind: FieldType) -> Vec<String> {
        let mut violations = self
            .iter()
            .filter(|(_, value)| check::is_blank(*value, Some(kind)))
            .map(|(key, _)| format!("{field}.{key}"))
            .collect::<Vec<_>>();
        if let Some(default_key) = &options.default_key {
            let flagged = format!("{field}.{default_key}");
            if self.get(default_key).is_none() && !violations.contains(&flagged) {
                violations.push(flagged);
            }
        }
        violations
    }
}
