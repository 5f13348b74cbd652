use crate::{common, error::Result, store::Store};

use aws_sdk_dynamodb::{operation, types};
use serde::Serialize;
use serde_dynamo::to_item;
use std::collections;

/// Maximum number of write requests DynamoDB accepts in a single `BatchWriteItem` call.
pub const DEFAULT_WRITE_CHUNK_SIZE: usize = 25;

/// What a [`BatchWriteItem`] does with each of its items.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WriteKind {
    /// Create or replace every item.
    #[default]
    Put,
    /// Delete every item; each item is serialized as the primary key.
    Delete,
}

/// Chunked batch put or delete over a single table.
///
/// Items are split into chunks of `chunk_size` and one `BatchWriteItem`
/// request is sent per chunk, in input order, strictly one after the other.
/// When a chunk fails the operation aborts unless `ignore_errors` is set, in
/// which case the failure is logged and the next chunk is attempted.
///
/// There is no transaction across chunks: chunks written before a failure
/// stay written.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_resource::write;
/// use serde_json::json;
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let batch_write = write::batch_write_item::BatchWriteItem {
///     table_name: "users".to_string(),
///     items: (0..60).map(|id| json!({"id": id.to_string()})).collect(),
///     ..Default::default()
/// };
/// let output = batch_write.send(client).await?;
/// assert_eq!(output.chunks, 3);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct BatchWriteItem<T> {
    /// The name of the table to write to.
    pub table_name: String,
    /// Put or delete.
    pub kind: WriteKind,
    /// Items to put, or primary keys to delete.
    pub items: Vec<T>,
    /// Log and skip failing chunks instead of aborting.
    pub ignore_errors: bool,
    /// Number of requests per chunk.
    pub chunk_size: usize,
}

impl<T> Default for BatchWriteItem<T> {
    fn default() -> Self {
        Self {
            table_name: String::new(),
            kind: WriteKind::default(),
            items: Vec::new(),
            ignore_errors: false,
            chunk_size: DEFAULT_WRITE_CHUNK_SIZE,
        }
    }
}

/// Outcome of a [`BatchWriteItem`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchWriteOutput {
    /// Number of chunk requests attempted.
    pub chunks: usize,
    /// Number of chunk requests that failed and were skipped.
    pub failed_chunks: usize,
    /// Requests the store did not process; callers may resubmit them.
    pub unprocessed_items: Vec<types::WriteRequest>,
}

impl WriteKind {
    fn request<T: Serialize>(self, item: T) -> Result<types::WriteRequest> {
        let item: common::Item = to_item(item)?;
        let builder = match self {
            Self::Put => {
                let put_request = types::PutRequest::builder().set_item(Some(item)).build()?;
                types::WriteRequest::builder().put_request(put_request)
            }
            Self::Delete => {
                let delete_request = types::DeleteRequest::builder().set_key(Some(item)).build()?;
                types::WriteRequest::builder().delete_request(delete_request)
            }
        };
        Ok(builder.build())
    }
}

impl<T: Serialize> BatchWriteItem<T> {
    fn chunk_input(
        &self,
        requests: Vec<types::WriteRequest>,
    ) -> Result<operation::batch_write_item::BatchWriteItemInput> {
        let input = operation::batch_write_item::BatchWriteItemInput::builder()
            .set_request_items(Some(collections::HashMap::from([(
                self.table_name.clone(),
                requests,
            )])))
            .build()?;
        Ok(input)
    }

    /// Execute the batch write, one chunk at a time.
    ///
    /// Every item is serialized before the first request, so a serialization
    /// failure never leaves the table half written.
    #[tracing::instrument(
        name = "dynamodb_resource.batch_write_item",
        skip_all,
        fields(table = %self.table_name, kind = ?self.kind, items = self.items.len()),
        err
    )]
    pub async fn send<S: Store + ?Sized>(mut self, store: &S) -> Result<BatchWriteOutput> {
        let mut output = BatchWriteOutput::default();
        if self.items.is_empty() {
            return Ok(output);
        }
        let requests = std::mem::take(&mut self.items)
            .into_iter()
            .map(|item| self.kind.request(item))
            .collect::<Result<Vec<_>>>()?;
        let chunk_size = self.chunk_size.max(1);
        let mut requests = requests.into_iter().peekable();
        while requests.peek().is_some() {
            let chunk: Vec<_> = requests.by_ref().take(chunk_size).collect();
            let input = self.chunk_input(chunk)?;
            output.chunks += 1;
            match store.batch_write_item(input).await {
                Ok(response) => {
                    if let Some(mut unprocessed) = response.unprocessed_items {
                        output
                            .unprocessed_items
                            .extend(unprocessed.remove(&self.table_name).unwrap_or_default());
                    }
                }
                Err(error) if self.ignore_errors => {
                    tracing::warn!(chunk = output.chunks, %error, "skipping failed batch write chunk");
                    output.failed_chunks += 1;
                }
                Err(error) => return Err(error),
            }
        }
        Ok(output)
    }
}
