//! Load, safe-load and validate contracts for request payloads.
//!
//! A resource is built from any JSON value and never fails to load: every
//! field is assigned through [`clean`](clean::clean) and falls back to its
//! default. Problems are reported later by [`Validatable::validate`] as a list
//! of invalid field paths.
//!
//! ```rust
//! use dynamodb_resource::resource::{
//!     Loadable, Options, Validatable,
//!     check::FieldType,
//!     clean::{cast, clean},
//!     violations::Violations,
//! };
//! use serde_json::{Value, json};
//!
//! #[derive(Default)]
//! struct Team {
//!     name: Option<String>,
//!     size: i64,
//! }
//!
//! impl Loadable for Team {
//!     fn load(&mut self, raw: &Value, _options: &Options) {
//!         self.name = clean(raw.get("name"), cast::string, None);
//!         self.size = clean(raw.get("size"), cast::integer, Some(1)).unwrap_or(1);
//!     }
//! }
//!
//! impl Validatable for Team {
//!     fn validate(&mut self, _options: &Options) -> Vec<String> {
//!         let mut violations = Violations::default();
//!         violations.check("name", &self.name, FieldType::String);
//!         violations.into_vec()
//!     }
//! }
//!
//! let mut team = Team::from_raw(&json!({"size": "4"}));
//! assert_eq!(team.size, 4);
//! assert_eq!(team.validate(&Options::default()), vec!["name"]);
//! ```

/// Building blocks for attribute maps keyed by an external key set.
pub mod bag;

/// Emptiness checks per semantic field type.
pub mod check;

/// Coercion of raw values into typed fields.
pub mod clean;

/// Last-modified timestamp component.
pub mod tracking;

/// Validation result builder.
pub mod violations;

use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Settings shared by load and validate.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Options {
    /// Keys accepted by attribute bags; `None` accepts every key.
    pub allowed_keys: Option<BTreeSet<String>>,
    /// Key that attribute bags must always provide.
    pub default_key: Option<String>,
}

impl Options {
    /// Options restricting attribute bags to `keys`.
    pub fn with_allowed_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_keys: Some(keys.into_iter().map(Into::into).collect()),
            default_key: None,
        }
    }

    /// Sets the key attribute bags must provide.
    pub fn default_key(mut self, key: impl Into<String>) -> Self {
        self.default_key = Some(key.into());
        self
    }

    /// Whether `key` may be loaded into an attribute bag.
    pub fn allows(&self, key: &str) -> bool {
        self.allowed_keys
            .as_ref()
            .is_none_or(|allowed_keys| allowed_keys.contains(key))
    }
}

/// A type that is fully initialized from an arbitrary raw value.
///
/// `load` must assign every field, falling back to defaults for missing or
/// malformed input, and must not panic. Loading twice from the same input
/// yields the same value.
pub trait Loadable: Default {
    /// Assigns every field from `raw`.
    fn load(&mut self, raw: &Value, options: &Options);

    /// Builds a value from `raw`, or from an empty object when `raw` is `None`.
    fn new(raw: Option<&Value>, options: &Options) -> Self {
        let mut resource = Self::default();
        match raw {
            Some(raw) => resource.load(raw, options),
            None => resource.load(&Value::Object(Map::new()), options),
        }
        resource
    }

    /// [`new`](Self::new) with default options.
    fn from_raw(raw: &Value) -> Self {
        Self::new(Some(raw), &Options::default())
    }
}

/// A type that reports its invalid fields.
pub trait Validatable {
    /// Returns the paths of the invalid fields; empty means valid.
    ///
    /// Only a tracking component may be updated here.
    fn validate(&mut self, _options: &Options) -> Vec<String> {
        Vec::new()
    }
}

/// A loadable type with server-owned fields a client must not overwrite.
pub trait SafeLoadable: Loadable {
    /// Copies the server-owned fields verbatim from `safe`.
    fn protect(&mut self, safe: &Self);

    /// Loads `raw`, then restores the server-owned fields from `safe`.
    fn safe_load(&mut self, raw: &Value, safe: &Self, options: &Options) {
        self.load(raw, options);
        self.protect(safe);
    }
}

/// A loadable and validatable entity.
pub trait Resource: Loadable + Validatable {}

impl<R: Loadable + Validatable> Resource for R {}
