use crate::{common, error::Result, read, store::Store};

use aws_sdk_dynamodb::operation;
use serde::{Serialize, de::DeserializeOwned};

/// Query operation, following every page.
///
/// Each page's `LastEvaluatedKey` is fed back as the next `ExclusiveStartKey`
/// until the store returns none, and all items are concatenated in page order.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_resource::{common, read};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let query = read::query::Query {
///     partition_key: common::key::Key::new("project", "acme".to_string()),
///     multiple_read_args: read::common::MultipleReadArgs {
///         table_name: "teams".to_string(),
///         ..Default::default()
///     },
///     ..Default::default()
/// };
/// let output = query.send(client).await?;
/// println!("{} items over {} pages", output.items.len(), output.pages);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Query<T> {
    /// Additional read arguments (table name, filter, selection, etc.).
    pub multiple_read_args: read::common::MultipleReadArgs<T>,
    /// The partition key value to query for.
    pub partition_key: common::key::Key<T>,
    /// Whether to read the index forward (ascending) or backward (descending).
    pub scan_index_forward: Option<bool>,
    /// Optional condition on the sort key.
    pub sort_key_condition: Option<common::condition::AttributeCondition<T>>,
}

impl<T: Serialize> TryFrom<Query<T>> for operation::query::QueryInput {
    type Error = crate::error::Error;

    fn try_from(query: Query<T>) -> Result<Self> {
        let mut builder = common::ExpressionBuilder::default();
        let mut key_conditions = vec![common::condition::AttributeCondition::new(
            query.partition_key.name,
            common::condition::Condition::Equals(query.partition_key.value),
        )];
        key_conditions.extend(query.sort_key_condition);
        let key_condition_expression = common::condition::ConditionMap::Leaves(
            common::condition::LogicalOperator::And,
            key_conditions,
        )
        .render(&mut builder)?;
        let multiple_read_input = query.multiple_read_args.resolve(&mut builder)?;
        let (names, values) = builder.into_parts();
        let input = read::common::apply_multiple_read_input!(
            Self::builder(),
            multiple_read_input
        )
        .key_condition_expression(key_condition_expression)
        .set_expression_attribute_names(names)
        .set_expression_attribute_values(values)
        .set_scan_index_forward(query.scan_index_forward)
        .build()?;
        Ok(input)
    }
}

impl<T: Serialize> Query<T> {
    /// Execute the query, accumulating every page.
    ///
    /// Any failing page aborts the query; no partial result is returned.
    #[tracing::instrument(
        name = "dynamodb_resource.query",
        skip_all,
        fields(table = %self.multiple_read_args.table_name),
        err
    )]
    pub async fn send<S: Store + ?Sized>(self, store: &S) -> Result<read::common::ReadOutput> {
        let input: operation::query::QueryInput = self.try_into()?;
        read::common::accumulate_pages(input, |input| store.query(input)).await
    }

    /// Execute the query and deserialize every item.
    pub async fn send_as<D: DeserializeOwned, S: Store + ?Sized>(
        self,
        store: &S,
    ) -> Result<Vec<D>> {
        self.send(store).await?.into_typed()
    }
}
