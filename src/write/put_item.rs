use crate::{common, error::Result, store::Store, write};

use aws_sdk_dynamodb::operation;
use serde::Serialize;
use serde_dynamo::to_item;

/// Put item operation.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_resource::write;
/// use serde_json::{Value, json};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let put_item: write::put_item::PutItem<Value> = write::put_item::PutItem {
///     item: json!({"id": "1", "name": "John"}),
///     write_args: write::common::WriteArgs::table("users"),
/// };
/// put_item.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PutItem<T> {
    /// The item to put into the table.
    pub item: T,
    /// Additional write arguments (table name, condition, return values).
    pub write_args: write::common::WriteArgs<T>,
}

impl<T: Serialize> TryFrom<PutItem<T>> for operation::put_item::PutItemInput {
    type Error = crate::error::Error;

    fn try_from(put_item: PutItem<T>) -> Result<Self> {
        let item: common::Item = to_item(put_item.item)?;
        let mut expressions = common::ExpressionBuilder::default();
        let write_input = put_item.write_args.resolve(&mut expressions)?;
        let input =
            write::common::apply_write_input!(Self::builder(), write_input, expressions)
                .set_item(Some(item))
                .build()?;
        Ok(input)
    }
}

impl<T: Serialize> PutItem<T> {
    /// Execute the put item operation.
    #[tracing::instrument(
        name = "dynamodb_resource.put_item",
        skip_all,
        fields(table = %self.write_args.table_name),
        err
    )]
    pub async fn send<S: Store + ?Sized>(
        self,
        store: &S,
    ) -> Result<operation::put_item::PutItemOutput> {
        let input: operation::put_item::PutItemInput = self.try_into()?;
        store.put_item(input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::Error, store::mock::MockStore};

    use aws_sdk_dynamodb::types;
    use serde_json::{Value, json};
    use std::collections;

    fn put_if_absent() -> PutItem<Value> {
        PutItem {
            item: json!({"id": "1", "name": "Ada"}),
            write_args: write::common::WriteArgs::table("users").with_condition(
                common::condition::ConditionMap::Leaves(
                    common::condition::LogicalOperator::And,
                    vec![common::condition::AttributeCondition::new(
                        "id",
                        common::condition::Condition::NotExists,
                    )],
                ),
            ),
        }
    }

    #[test]
    fn test_put_item_input() {
        let actual: operation::put_item::PutItemInput = put_if_absent().try_into().unwrap();
        let expected = operation::put_item::PutItemInput::builder()
            .condition_expression("attribute_not_exists(#id)")
            .set_expression_attribute_names(Some(collections::HashMap::from([(
                "#id".to_string(),
                "id".to_string(),
            )])))
            .set_item(Some(common::Item::from([
                ("id".to_string(), types::AttributeValue::S("1".to_string())),
                ("name".to_string(), types::AttributeValue::S("Ada".to_string())),
            ])))
            .table_name("users")
            .build()
            .unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_put_item_rejects_non_map_item() {
        let put_item = PutItem {
            item: json!("not a map"),
            write_args: write::common::WriteArgs::table("users"),
        };
        let result: Result<operation::put_item::PutItemInput> = put_item.try_into();
        assert!(matches!(result, Err(Error::Serialization(_))));
    }

    #[tokio::test]
    async fn test_put_item_with_empty_in_condition_sends_nothing() {
        let store = MockStore::default();
        let put_item = PutItem {
            item: json!({"id": "1"}),
            write_args: write::common::WriteArgs::table("users").with_condition(
                common::condition::ConditionMap::Leaves(
                    common::condition::LogicalOperator::And,
                    vec![common::condition::AttributeCondition::new(
                        "status",
                        common::condition::Condition::In(vec![]),
                    )],
                ),
            ),
        };
        let result = put_item.send(&store).await;
        assert!(matches!(result, Err(Error::Serialization(_))));
        assert!(store.put_item_calls().is_empty());
    }

    #[tokio::test]
    async fn test_put_item_surfaces_conditional_failure() {
        let store = MockStore::default();
        store.push_put_item(Err(Error::ConditionalCheckFailed {
            operation: "put_item",
        }));
        let error = put_if_absent().send(&store).await.unwrap_err();
        assert!(error.is_conditional_check_failed());
        assert_eq!(store.put_item_calls().len(), 1);
    }
}
