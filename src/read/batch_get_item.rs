use crate::{common, error::Result, read, store::Store};

use aws_sdk_dynamodb::{operation, types};
use serde::{Serialize, de::DeserializeOwned};
use std::collections;

/// Maximum number of keys DynamoDB accepts in a single `BatchGetItem` call.
pub const DEFAULT_READ_CHUNK_SIZE: usize = 100;

/// Chunked batch get over a single table.
///
/// The keys are split into chunks of `chunk_size` and one `BatchGetItem`
/// request is sent per chunk, strictly one after the other. When a chunk
/// fails the operation aborts unless `ignore_errors` is set, in which case the
/// failure is logged and the next chunk is attempted.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_resource::{common, read};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let batch_get = read::batch_get_item::BatchGetItem {
///     keys: (0..250)
///         .map(|id| common::key::Keys::partition("id", id.to_string()))
///         .collect(),
///     single_read_args: read::common::SingleReadArgs::table("users"),
///     ..Default::default()
/// };
/// let output = batch_get.send(client).await?;
/// assert_eq!(output.chunks, 3);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct BatchGetItem<T> {
    /// Primary keys of the items to retrieve.
    pub keys: Vec<common::key::Keys<T>>,
    /// Read arguments applied to every chunk (table name, consistent read, selection).
    pub single_read_args: read::common::SingleReadArgs,
    /// Log and skip failing chunks instead of aborting.
    pub ignore_errors: bool,
    /// Number of keys per request.
    pub chunk_size: usize,
}

impl<T> Default for BatchGetItem<T> {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            single_read_args: read::common::SingleReadArgs::default(),
            ignore_errors: false,
            chunk_size: DEFAULT_READ_CHUNK_SIZE,
        }
    }
}

/// Outcome of a [`BatchGetItem`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchGetOutput {
    /// Items found, in the order the store returned them chunk after chunk.
    pub items: Vec<common::Item>,
    /// Number of chunk requests attempted.
    pub chunks: usize,
    /// Number of chunk requests that failed and were skipped.
    pub failed_chunks: usize,
    /// Keys the store did not process (throttling or size limits); callers may resubmit them.
    pub unprocessed_keys: Vec<common::Item>,
}

impl BatchGetOutput {
    /// Deserializes the retrieved items.
    pub fn into_typed<D: DeserializeOwned>(self) -> Result<Vec<D>> {
        let items = serde_dynamo::from_items(self.items)?;
        Ok(items)
    }
}

impl<T: Serialize> BatchGetItem<T> {
    fn chunk_input(
        &self,
        keys: Vec<common::Item>,
    ) -> Result<operation::batch_get_item::BatchGetItemInput> {
        let mut builder = common::ExpressionBuilder::default();
        let projection_expression = self.single_read_args.projection(&mut builder);
        let (names, _) = builder.into_parts();
        let keys_and_attributes = types::KeysAndAttributes::builder()
            .set_consistent_read(self.single_read_args.consistent_read)
            .set_expression_attribute_names(names)
            .set_keys(Some(keys))
            .set_projection_expression(projection_expression)
            .build()?;
        let input = operation::batch_get_item::BatchGetItemInput::builder()
            .set_request_items(Some(collections::HashMap::from([(
                self.single_read_args.table_name.clone(),
                keys_and_attributes,
            )])))
            .build()?;
        Ok(input)
    }

    /// Execute the batch get, one chunk at a time.
    ///
    /// Every key is serialized before the first request, so a serialization
    /// failure never leaves the read half done.
    #[tracing::instrument(
        name = "dynamodb_resource.batch_get_item",
        skip_all,
        fields(table = %self.single_read_args.table_name, keys = self.keys.len()),
        err
    )]
    pub async fn send<S: Store + ?Sized>(mut self, store: &S) -> Result<BatchGetOutput> {
        let mut output = BatchGetOutput::default();
        if self.keys.is_empty() {
            return Ok(output);
        }
        let keys = std::mem::take(&mut self.keys)
            .into_iter()
            .map(common::Item::try_from)
            .collect::<serde_dynamo::Result<Vec<_>>>()?;
        let chunk_size = self.chunk_size.max(1);
        let mut keys = keys.into_iter().peekable();
        while keys.peek().is_some() {
            let chunk: Vec<_> = keys.by_ref().take(chunk_size).collect();
            let input = self.chunk_input(chunk)?;
            output.chunks += 1;
            match store.batch_get_item(input).await {
                Ok(response) => {
                    let table_name = &self.single_read_args.table_name;
                    if let Some(mut responses) = response.responses {
                        output
                            .items
                            .extend(responses.remove(table_name).unwrap_or_default());
                    }
                    if let Some(mut unprocessed) = response.unprocessed_keys {
                        if let Some(keys_and_attributes) = unprocessed.remove(table_name) {
                            output.unprocessed_keys.extend(keys_and_attributes.keys);
                        }
                    }
                }
                Err(error) if self.ignore_errors => {
                    tracing::warn!(chunk = output.chunks, %error, "skipping failed batch get chunk");
                    output.failed_chunks += 1;
                }
                Err(error) => return Err(error),
            }
        }
        Ok(output)
    }

    /// Execute the batch get and deserialize the retrieved items.
    pub async fn send_as<D: DeserializeOwned, S: Store + ?Sized>(
        self,
        store: &S,
    ) -> Result<Vec<D>> {
        self.send(store).await?.into_typed()
    }
}
