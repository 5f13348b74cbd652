use crate::common;

use serde::Serialize;
use serde_dynamo::{Error, Result, to_attribute_value};

/// Key component.
///
/// ```rust
/// use dynamodb_resource::common::key;
///
/// let key = key::Key::new("id", "1");
/// assert_eq!(key.name, "id");
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Key<T> {
    /// The attribute name of the key.
    pub name: String,
    /// The value of the key.
    pub value: T,
}

impl<T> Key<T> {
    /// Creates a key component.
    pub fn new(name: impl Into<String>, value: T) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Primary key (partition key and optional sort key).
///
/// ```rust
/// use dynamodb_resource::common::key;
///
/// let keys = key::Keys::partition("project", "acme").with_sort("id", "42");
/// assert!(keys.sort_key.is_some());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Keys<T> {
    /// The partition key (required).
    pub partition_key: Key<T>,
    /// The sort key (optional, only for tables with composite primary keys).
    pub sort_key: Option<Key<T>>,
}

impl<T> Keys<T> {
    /// Primary key made of a partition key only.
    pub fn partition(name: impl Into<String>, value: T) -> Self {
        Self {
            partition_key: Key::new(name, value),
            sort_key: None,
        }
    }

    /// Adds a sort key.
    pub fn with_sort(mut self, name: impl Into<String>, value: T) -> Self {
        self.sort_key = Some(Key::new(name, value));
        self
    }
}

impl<T: Serialize> TryFrom<Keys<T>> for common::Item {
    type Error = Error;

    fn try_from(keys: Keys<T>) -> Result<Self> {
        let mut item = Self::with_capacity(2);
        item.insert(
            keys.partition_key.name,
            to_attribute_value(keys.partition_key.value)?,
        );
        if let Some(sort_key) = keys.sort_key {
            item.insert(sort_key.name, to_attribute_value(sort_key.value)?);
        }
        Ok(item)
    }
}
