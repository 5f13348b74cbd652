use crate::{common, error::Result};

use aws_sdk_dynamodb::{operation, types};
use serde::{Serialize, de::DeserializeOwned};
use serde_dynamo::to_attribute_value;
use std::{collections, future::Future};

/// Arguments for single-item read operations (GetItem, BatchGetItem).
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct SingleReadArgs {
    /// Whether to use a consistent read.
    ///
    /// `true` for strongly consistent reads, `false` or `None` for eventually consistent reads.
    pub consistent_read: Option<bool>,
    /// Which attributes to retrieve (projection expression).
    ///
    /// If `None`, all attributes are retrieved.
    pub selection: Option<common::selection::Selection>,
    /// The name of the table to read from.
    pub table_name: String,
}

impl SingleReadArgs {
    /// Read arguments for a table with defaults everywhere else.
    pub fn table(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            ..Default::default()
        }
    }

    pub(crate) fn projection(&self, builder: &mut common::ExpressionBuilder) -> Option<String> {
        self.selection
            .as_ref()
            .map(|selection| selection.render(builder))
    }
}

/// Arguments for multiple-item read operations (Query, Scan).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MultipleReadArgs<T> {
    /// Filter applied to the items after they are read.
    ///
    /// Filtered-out items still count against `limit` and read capacity.
    pub filter: Option<common::condition::ConditionMap<T>>,
    /// Whether to use a consistent read.
    pub consistent_read: Option<bool>,
    /// Key to resume a previous read from.
    ///
    /// Every following page is fetched automatically; this only sets where the first one starts.
    pub exclusive_start_key: Option<collections::HashMap<String, T>>,
    /// The name of a global or local secondary index to read instead of the base table.
    pub index_name: Option<String>,
    /// Maximum number of items evaluated per page (not in total).
    pub limit: Option<i32>,
    /// Which attributes to return.
    pub select: Option<types::Select>,
    /// Which attributes to retrieve (projection expression).
    pub selection: Option<common::selection::Selection>,
    /// The name of the table to read from.
    pub table_name: String,
}

impl<T> MultipleReadArgs<T> {
    /// Read arguments for a table with defaults everywhere else.
    pub fn table(table_name: impl Into<String>) -> Self {
        Self {
            filter: None,
            consistent_read: None,
            exclusive_start_key: None,
            index_name: None,
            limit: None,
            select: None,
            selection: None,
            table_name: table_name.into(),
        }
    }
}

/// Resolved form of [`MultipleReadArgs`]; names and values live in the request's builder.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct MultipleReadInput {
    pub(crate) consistent_read: Option<bool>,
    pub(crate) exclusive_start_key: Option<common::Item>,
    pub(crate) filter_expression: Option<String>,
    pub(crate) index_name: Option<String>,
    pub(crate) limit: Option<i32>,
    pub(crate) projection_expression: Option<String>,
    pub(crate) select: Option<types::Select>,
    pub(crate) table_name: String,
}

impl<T: Serialize> MultipleReadArgs<T> {
    pub(crate) fn resolve(
        self,
        builder: &mut common::ExpressionBuilder,
    ) -> Result<MultipleReadInput> {
        let exclusive_start_key = self
            .exclusive_start_key
            .map(|key| {
                key.into_iter()
                    .map(|(name, value)| -> Result<(String, types::AttributeValue)> {
                        Ok((name, to_attribute_value(value)?))
                    })
                    .collect::<Result<common::Item>>()
            })
            .transpose()?;
        let filter_expression = self
            .filter
            .map(|filter| filter.render(builder))
            .transpose()?;
        let projection_expression = self
            .selection
            .as_ref()
            .map(|selection| selection.render(builder));
        Ok(MultipleReadInput {
            consistent_read: self.consistent_read,
            exclusive_start_key,
            filter_expression,
            index_name: self.index_name,
            limit: self.limit,
            projection_expression,
            select: self.select,
            table_name: self.table_name,
        })
    }
}

/// apply resolved multiple read settings to a query or scan input builder
macro_rules! apply_multiple_read_input {
    ($builder:expr, $input:expr) => {
        $builder
            .set_consistent_read($input.consistent_read)
            .set_exclusive_start_key($input.exclusive_start_key)
            .set_filter_expression($input.filter_expression)
            .set_index_name($input.index_name)
            .set_limit($input.limit)
            .set_projection_expression($input.projection_expression)
            .set_select($input.select)
            .table_name($input.table_name)
    };
}

pub(crate) use apply_multiple_read_input;

/// Items accumulated over every page of a query or scan.
///
/// The whole result set is held in memory, so memory grows linearly with the
/// number of matching items.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReadOutput {
    /// Items of every page, in the order the store returned them.
    pub items: Vec<common::Item>,
    /// Number of items returned after filtering, summed over pages.
    pub count: i32,
    /// Number of items evaluated before filtering, summed over pages.
    pub scanned_count: i32,
    /// Number of requests issued.
    pub pages: usize,
}

impl ReadOutput {
    /// Deserializes the accumulated items.
    pub fn into_typed<D: DeserializeOwned>(self) -> Result<Vec<D>> {
        let items = serde_dynamo::from_items(self.items)?;
        Ok(items)
    }
}

/// Single page returned by a query or scan.
pub(crate) struct Page {
    items: Option<Vec<common::Item>>,
    count: i32,
    scanned_count: i32,
    last_evaluated_key: Option<common::Item>,
}

impl From<operation::query::QueryOutput> for Page {
    fn from(output: operation::query::QueryOutput) -> Self {
        Self {
            items: output.items,
            count: output.count,
            scanned_count: output.scanned_count,
            last_evaluated_key: output.last_evaluated_key,
        }
    }
}

impl From<operation::scan::ScanOutput> for Page {
    fn from(output: operation::scan::ScanOutput) -> Self {
        Self {
            items: output.items,
            count: output.count,
            scanned_count: output.scanned_count,
            last_evaluated_key: output.last_evaluated_key,
        }
    }
}

/// Request that can be resumed from a continuation key.
pub(crate) trait Paginated: Clone {
    fn continue_from(&mut self, key: common::Item);
}

impl Paginated for operation::query::QueryInput {
    fn continue_from(&mut self, key: common::Item) {
        self.exclusive_start_key = Some(key);
    }
}

impl Paginated for operation::scan::ScanInput {
    fn continue_from(&mut self, key: common::Item) {
        self.exclusive_start_key = Some(key);
    }
}

/// Follows continuation keys until the store stops returning one.
///
/// Pages are fetched one at a time. The first failing page aborts the whole
/// read and the items gathered so far are discarded.
pub(crate) async fn accumulate_pages<I, P, F, Fut>(mut input: I, mut fetch: F) -> Result<ReadOutput>
where
    I: Paginated,
    P: Into<Page>,
    F: FnMut(I) -> Fut,
    Fut: Future<Output = Result<P>>,
{
    let mut output = ReadOutput::default();
    loop {
        let page: Page = fetch(input.clone()).await?.into();
        output.pages += 1;
        output.count += page.count;
        output.scanned_count += page.scanned_count;
        output.items.extend(page.items.unwrap_or_default());
        match page.last_evaluated_key {
            Some(key) if !key.is_empty() => {
                tracing::debug!(pages = output.pages, "following continuation key");
                input.continue_from(key);
            }
            _ => return Ok(output),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;
    use serde_json::{Value, json};

    #[test]
    fn test_multiple_read_args_resolve() {
        let args = MultipleReadArgs {
            filter: Some(common::condition::ConditionMap::Leaves(
                common::condition::LogicalOperator::And,
                vec![common::condition::AttributeCondition::new(
                    "status",
                    common::condition::Condition::Equals(json!("active")),
                )],
            )),
            consistent_read: Some(true),
            exclusive_start_key: Some(collections::HashMap::from([(
                "id".to_string(),
                json!("7"),
            )])),
            index_name: Some("by-status".to_string()),
            limit: Some(10),
            select: None,
            selection: Some(common::selection::Selection::from(["id", "name"])),
            table_name: "users".to_string(),
        };
        let mut builder = common::ExpressionBuilder::default();
        let actual = args.resolve(&mut builder).unwrap();
        assert_eq!(
            actual,
            MultipleReadInput {
                consistent_read: Some(true),
                exclusive_start_key: Some(common::Item::from([(
                    "id".to_string(),
                    types::AttributeValue::S("7".to_string()),
                )])),
                filter_expression: Some("#status = :v0".to_string()),
                index_name: Some("by-status".to_string()),
                limit: Some(10),
                projection_expression: Some("#id, #name".to_string()),
                select: None,
                table_name: "users".to_string(),
            }
        );
    }

    #[rstest]
    #[case::no_items(vec![], 0)]
    #[case::two_items(vec![json!({"id": "1"}), json!({"id": "2"})], 2)]
    fn test_read_output_into_typed(#[case] items: Vec<Value>, #[case] expected: usize) {
        let output = ReadOutput {
            items: items
                .into_iter()
                .map(|item| serde_dynamo::to_item(item).unwrap())
                .collect(),
            ..Default::default()
        };
        let typed: Vec<Value> = output.into_typed().unwrap();
        assert_eq!(typed.len(), expected);
    }
}
