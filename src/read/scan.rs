use crate::{common, error::Result, read, store::Store};

use aws_sdk_dynamodb::operation;
use serde::{Serialize, de::DeserializeOwned};

/// Scan operation, following every page.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_resource::read;
/// use serde_json::Value;
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let scan: read::scan::Scan<Value> = read::scan::Scan {
///     multiple_read_args: read::common::MultipleReadArgs {
///         table_name: "users".to_string(),
///         ..Default::default()
///     },
///     ..Default::default()
/// };
/// let users: Vec<Value> = scan.send_as(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scan<T> {
    /// Additional read arguments (table name, filter, selection, etc.).
    pub multiple_read_args: read::common::MultipleReadArgs<T>,
    /// The segment number for parallel scans (0-indexed).
    pub segment: Option<i32>,
    /// The total number of segments for parallel scans.
    pub total_segments: Option<i32>,
}

impl<T: Serialize> TryFrom<Scan<T>> for operation::scan::ScanInput {
    type Error = crate::error::Error;

    fn try_from(scan: Scan<T>) -> Result<Self> {
        let mut builder = common::ExpressionBuilder::default();
        let multiple_read_input = scan.multiple_read_args.resolve(&mut builder)?;
        let (names, values) = builder.into_parts();
        let input =
            read::common::apply_multiple_read_input!(Self::builder(), multiple_read_input)
                .set_expression_attribute_names(names)
                .set_expression_attribute_values(values)
                .set_segment(scan.segment)
                .set_total_segments(scan.total_segments)
                .build()?;
        Ok(input)
    }
}

impl<T: Serialize> Scan<T> {
    /// Execute the scan, accumulating every page.
    ///
    /// Any failing page aborts the scan; no partial result is returned.
    #[tracing::instrument(
        name = "dynamodb_resource.scan",
        skip_all,
        fields(table = %self.multiple_read_args.table_name),
        err
    )]
    pub async fn send<S: Store + ?Sized>(self, store: &S) -> Result<read::common::ReadOutput> {
        let input: operation::scan::ScanInput = self.try_into()?;
        read::common::accumulate_pages(input, |input| store.scan(input)).await
    }

    /// Execute the scan and deserialize every item.
    pub async fn send_as<D: DeserializeOwned, S: Store + ?Sized>(
        self,
        store: &S,
    ) -> Result<Vec<D>> {
        self.send(store).await?.into_typed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::Error, store::mock::MockStore};

    use aws_sdk_dynamodb::types;
    use serde_json::{Value, json};
    use std::collections;

    fn scan() -> Scan<Value> {
        Scan {
            multiple_read_args: read::common::MultipleReadArgs {
                filter: Some(common::condition::ConditionMap::Leaves(
                    common::condition::LogicalOperator::And,
                    vec![common::condition::AttributeCondition::new(
                        "archived",
                        common::condition::Condition::NotEqual(json!(true)),
                    )],
                )),
                table_name: "users".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_scan_input() {
        let mut scan = scan();
        scan.segment = Some(0);
        scan.total_segments = Some(4);
        let actual: operation::scan::ScanInput = scan.try_into().unwrap();
        let expected = operation::scan::ScanInput::builder()
            .table_name("users")
            .filter_expression("#archived <> :v0")
            .set_expression_attribute_names(Some(collections::HashMap::from([(
                "#archived".to_string(),
                "archived".to_string(),
            )])))
            .set_expression_attribute_values(Some(collections::HashMap::from([(
                ":v0".to_string(),
                types::AttributeValue::Bool(true),
            )])))
            .segment(0)
            .total_segments(4)
            .build()
            .unwrap();
        assert_eq!(actual, expected);
    }

    #[tokio::test]
    async fn test_scan_accumulates_three_pages() {
        let key = |id: &str| {
            common::Item::from([("id".to_string(), types::AttributeValue::S(id.to_string()))])
        };
        let store = MockStore::default();
        store
            .push_scan(Ok(operation::scan::ScanOutput::builder()
                .set_items(Some(vec![key("a")]))
                .count(1)
                .scanned_count(3)
                .set_last_evaluated_key(Some(key("a")))
                .build()))
            .push_scan(Ok(operation::scan::ScanOutput::builder()
                .set_items(Some(vec![key("b")]))
                .count(1)
                .scanned_count(2)
                .set_last_evaluated_key(Some(key("b")))
                .build()))
            .push_scan(Ok(operation::scan::ScanOutput::builder()
                .set_items(Some(vec![key("c")]))
                .count(1)
                .scanned_count(1)
                .build()));
        let output = scan().send(&store).await.unwrap();
        assert_eq!(store.scan_calls().len(), 3);
        assert_eq!(output.items, vec![key("a"), key("b"), key("c")]);
        assert_eq!(output.count, 3);
        assert_eq!(output.scanned_count, 6);
    }

    #[tokio::test]
    async fn test_scan_empty_table_issues_single_request() {
        let store = MockStore::default();
        let output = scan().send(&store).await.unwrap();
        assert_eq!(store.scan_calls().len(), 1);
        assert!(output.items.is_empty());
        assert_eq!(output.pages, 1);
    }

    #[tokio::test]
    async fn test_scan_error_aborts() {
        let store = MockStore::default();
        store.push_scan(Err(Error::store("scan", "unavailable")));
        assert!(scan().send(&store).await.is_err());
        assert_eq!(store.scan_calls().len(), 1);
    }
}
