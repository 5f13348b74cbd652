use crate::{common, error::Result, read, store::Store};

use aws_sdk_dynamodb::operation;
use serde::{Serialize, de::DeserializeOwned};

/// Get item operation.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_resource::{common, read};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let get_item = read::get_item::GetItem {
///     keys: common::key::Keys::partition("id", "1".to_string()),
///     single_read_args: read::common::SingleReadArgs::table("users"),
/// };
/// let item = get_item.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GetItem<T> {
    /// The primary key of the item to retrieve.
    pub keys: common::key::Keys<T>,
    /// Additional read arguments (table name, consistent read, selection).
    pub single_read_args: read::common::SingleReadArgs,
}

impl<T: Serialize> TryFrom<GetItem<T>> for operation::get_item::GetItemInput {
    type Error = crate::error::Error;

    fn try_from(get_item: GetItem<T>) -> Result<Self> {
        let key: common::Item = get_item.keys.try_into()?;
        let mut builder = common::ExpressionBuilder::default();
        let projection_expression = get_item.single_read_args.projection(&mut builder);
        let (names, _) = builder.into_parts();
        let input = Self::builder()
            .set_consistent_read(get_item.single_read_args.consistent_read)
            .set_expression_attribute_names(names)
            .set_key(Some(key))
            .set_projection_expression(projection_expression)
            .table_name(get_item.single_read_args.table_name)
            .build()?;
        Ok(input)
    }
}

impl<T: Serialize> GetItem<T> {
    /// Execute the get item operation, returning `None` when no item has the key.
    #[tracing::instrument(
        name = "dynamodb_resource.get_item",
        skip_all,
        fields(table = %self.single_read_args.table_name),
        err
    )]
    pub async fn send<S: Store + ?Sized>(self, store: &S) -> Result<Option<common::Item>> {
        let input: operation::get_item::GetItemInput = self.try_into()?;
        let output = store.get_item(input).await?;
        Ok(output.item)
    }

    /// Execute the get item operation and deserialize the item.
    pub async fn send_as<D: DeserializeOwned, S: Store + ?Sized>(
        self,
        store: &S,
    ) -> Result<Option<D>> {
        let item: Option<D> = self
            .send(store)
            .await?
            .map(serde_dynamo::from_item)
            .transpose()?;
        Ok(item)
    }
}
