use crate::{common, error::Result, store::Store, write};

use aws_sdk_dynamodb::operation;
use serde::Serialize;

/// Delete item operation.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_resource::{common, write};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let delete_item = write::delete_item::DeleteItem {
///     keys: common::key::Keys::partition("id", "1".to_string()),
///     write_args: write::common::WriteArgs::table("users"),
/// };
/// delete_item.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DeleteItem<T> {
    /// The primary key of the item to delete.
    pub keys: common::key::Keys<T>,
    /// Additional write arguments (table name, condition, return values).
    pub write_args: write::common::WriteArgs<T>,
}

impl<T: Serialize> TryFrom<DeleteItem<T>> for operation::delete_item::DeleteItemInput {
    type Error = crate::error::Error;

    fn try_from(delete_item: DeleteItem<T>) -> Result<Self> {
        let key: common::Item = delete_item.keys.try_into()?;
        let mut expressions = common::ExpressionBuilder::default();
        let write_input = delete_item.write_args.resolve(&mut expressions)?;
        let input =
            write::common::apply_write_input!(Self::builder(), write_input, expressions)
                .set_key(Some(key))
                .build()?;
        Ok(input)
    }
}

impl<T: Serialize> DeleteItem<T> {
    /// Execute the delete item operation.
    #[tracing::instrument(
        name = "dynamodb_resource.delete_item",
        skip_all,
        fields(table = %self.write_args.table_name),
        err
    )]
    pub async fn send<S: Store + ?Sized>(
        self,
        store: &S,
    ) -> Result<operation::delete_item::DeleteItemOutput> {
        let input: operation::delete_item::DeleteItemInput = self.try_into()?;
        store.delete_item(input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mock::MockStore;

    use aws_sdk_dynamodb::types;
    use serde_json::{Value, json};
    use std::collections;

    #[tokio::test]
    async fn test_delete_item_sends_key_and_condition() {
        let store = MockStore::default();
        let delete_item: DeleteItem<Value> = DeleteItem {
            keys: common::key::Keys::partition("project", json!("acme")).with_sort("id", json!("7")),
            write_args: write::common::WriteArgs {
                return_values: Some(types::ReturnValue::AllOld),
                ..write::common::WriteArgs::table("teams").with_condition(
                    common::condition::ConditionMap::Leaves(
                        common::condition::LogicalOperator::And,
                        vec![common::condition::AttributeCondition::new(
                            "id",
                            common::condition::Condition::Exists,
                        )],
                    ),
                )
            },
        };
        delete_item.send(&store).await.unwrap();
        let calls = store.delete_item_calls();
        let expected = operation::delete_item::DeleteItemInput::builder()
            .condition_expression("attribute_exists(#id)")
            .set_expression_attribute_names(Some(collections::HashMap::from([(
                "#id".to_string(),
                "id".to_string(),
            )])))
            .set_key(Some(common::Item::from([
                ("project".to_string(), types::AttributeValue::S("acme".to_string())),
                ("id".to_string(), types::AttributeValue::S("7".to_string())),
            ])))
            .return_values(types::ReturnValue::AllOld)
            .table_name("teams")
            .build()
            .unwrap();
        assert_eq!(calls, vec![expected]);
    }
}
