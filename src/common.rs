//! Common utilities for DynamoDB operations.
//!
//! This module provides shared types used across read and write operations:
//! primary keys, condition expressions and attribute selection, plus the
//! placeholder bookkeeping that turns them into expression strings.

/// Condition expression building for filters, key conditions and conditional writes.
pub mod condition;

/// Key types for identifying items in DynamoDB tables.
pub mod key;

/// Attribute selection for projection expressions.
pub mod selection;

use aws_sdk_dynamodb::types;
use serde::Serialize;
use serde_dynamo::{Result, to_attribute_value};
use std::collections;

/// A DynamoDB item in its native attribute-value form.
pub type Item = collections::HashMap<String, types::AttributeValue>;

/// Separator for attribute path components.
pub(crate) const PATH_SEPARATOR: char = '.';

/// Placeholder tables shared by every expression of a single request.
///
/// Key conditions, filters, projections, update and condition expressions of
/// one request all allocate their `#name` and `:value` placeholders here, so
/// they never collide with each other.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ExpressionBuilder {
    names: collections::HashMap<String, String>,
    values: collections::HashMap<String, types::AttributeValue>,
}

impl ExpressionBuilder {
    /// Registers a dotted attribute path and returns its placeholder form (`a.b` -> `#a.#b`).
    pub(crate) fn name(&mut self, path: &str) -> String {
        path.split(PATH_SEPARATOR)
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                let base = format!("#{}", sanitize(segment));
                let mut placeholder = base.clone();
                let mut suffix = 1;
                // distinct names may sanitize to the same placeholder
                while let Some(existing) = self.names.get(&placeholder) {
                    if existing == segment {
                        break;
                    }
                    placeholder = format!("{base}_{suffix}");
                    suffix += 1;
                }
                self.names.insert(placeholder.clone(), segment.to_string());
                placeholder
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Registers a raw attribute value and returns its placeholder.
    pub(crate) fn value(&mut self, value: types::AttributeValue) -> String {
        let placeholder = format!(":v{}", self.values.len());
        self.values.insert(placeholder.clone(), value);
        placeholder
    }

    /// Serializes a value and registers it.
    pub(crate) fn serialize<T: Serialize>(&mut self, value: T) -> Result<String> {
        let value = to_attribute_value(value)?;
        Ok(self.value(value))
    }

    /// Consumes the builder, returning the placeholder tables or `None` where empty.
    #[allow(clippy::type_complexity)]
    pub(crate) fn into_parts(
        self,
    ) -> (
        Option<collections::HashMap<String, String>>,
        Option<collections::HashMap<String, types::AttributeValue>>,
    ) {
        let names = (!self.names.is_empty()).then_some(self.names);
        let values = (!self.values.is_empty()).then_some(self.values);
        (names, values)
    }
}

fn sanitize(segment: &str) -> String {
    segment
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::single("name", "#name")]
    #[case::nested("address.city", "#address.#city")]
    #[case::sanitized("first-name", "#first_name")]
    #[case::empty_segment("a..b", "#a.#b")]
    #[case::trailing_separator("a.", "#a")]
    fn test_name_placeholder(#[case] path: &str, #[case] expected: &str) {
        let mut builder = ExpressionBuilder::default();
        assert_eq!(builder.name(path), expected);
    }

    #[test]
    fn test_colliding_names_get_distinct_placeholders() {
        let mut builder = ExpressionBuilder::default();
        assert_eq!(builder.name("first-name"), "#first_name");
        assert_eq!(builder.name("first_name"), "#first_name_1");
        assert_eq!(builder.name("first-name"), "#first_name");
    }

    #[test]
    fn test_values_are_numbered_in_order() {
        let mut builder = ExpressionBuilder::default();
        assert_eq!(builder.serialize("a").unwrap(), ":v0");
        assert_eq!(builder.serialize(1).unwrap(), ":v1");
        let (names, values) = builder.into_parts();
        assert_eq!(names, None);
        assert_eq!(
            values,
            Some(collections::HashMap::from([
                (":v0".to_string(), types::AttributeValue::S("a".to_string())),
                (":v1".to_string(), types::AttributeValue::N("1".to_string())),
            ]))
        );
    }

    #[test]
    fn test_empty_builder_has_no_parts() {
        assert_eq!(ExpressionBuilder::default().into_parts(), (None, None));
    }
}
