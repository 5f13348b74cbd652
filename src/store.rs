//! Storage client boundary.
//!
//! Every operation of this crate talks to DynamoDB through the [`Store`] trait
//! rather than through [`Client`] directly, so the chunking, pagination and id
//! retry loops can run against any backend that speaks the DynamoDB request
//! and response shapes.

#[cfg(test)]
pub(crate) mod mock;

use crate::error::{Error, Result};

use async_trait::async_trait;
use aws_sdk_dynamodb::{Client, error, operation};

/// Asynchronous DynamoDB-shaped storage client.
///
/// Implementations must be stateless per request: a single handle is shared
/// across concurrent calls.
#[async_trait]
pub trait Store: Send + Sync {
    /// Retrieves a single item by primary key.
    async fn get_item(
        &self,
        input: operation::get_item::GetItemInput,
    ) -> Result<operation::get_item::GetItemOutput>;

    /// Creates or replaces an item, optionally guarded by a condition expression.
    ///
    /// A rejected condition must surface as [`Error::ConditionalCheckFailed`].
    async fn put_item(
        &self,
        input: operation::put_item::PutItemInput,
    ) -> Result<operation::put_item::PutItemOutput>;

    /// Applies an update expression to an item.
    async fn update_item(
        &self,
        input: operation::update_item::UpdateItemInput,
    ) -> Result<operation::update_item::UpdateItemOutput>;

    /// Deletes an item by primary key.
    async fn delete_item(
        &self,
        input: operation::delete_item::DeleteItemInput,
    ) -> Result<operation::delete_item::DeleteItemOutput>;

    /// Sends one batch of put/delete requests (at most 25).
    async fn batch_write_item(
        &self,
        input: operation::batch_write_item::BatchWriteItemInput,
    ) -> Result<operation::batch_write_item::BatchWriteItemOutput>;

    /// Sends one batch of key lookups (at most 100).
    async fn batch_get_item(
        &self,
        input: operation::batch_get_item::BatchGetItemInput,
    ) -> Result<operation::batch_get_item::BatchGetItemOutput>;

    /// Fetches a single page of a query.
    async fn query(
        &self,
        input: operation::query::QueryInput,
    ) -> Result<operation::query::QueryOutput>;

    /// Fetches a single page of a scan.
    async fn scan(&self, input: operation::scan::ScanInput)
    -> Result<operation::scan::ScanOutput>;
}

fn map_sdk_error<E, R>(
    operation: &'static str,
    error: error::SdkError<E, R>,
    is_conditional_check_failed: impl FnOnce(&E) -> bool,
) -> Error
where
    error::SdkError<E, R>: std::error::Error + Send + Sync + 'static,
{
    match error.as_service_error() {
        Some(service_error) if is_conditional_check_failed(service_error) => {
            Error::ConditionalCheckFailed { operation }
        }
        _ => Error::store(operation, error),
    }
}

#[async_trait]
impl Store for Client {
    async fn get_item(
        &self,
        input: operation::get_item::GetItemInput,
    ) -> Result<operation::get_item::GetItemOutput> {
        self.get_item()
            .set_consistent_read(input.consistent_read)
            .set_expression_attribute_names(input.expression_attribute_names)
            .set_key(input.key)
            .set_projection_expression(input.projection_expression)
            .set_return_consumed_capacity(input.return_consumed_capacity)
            .set_table_name(input.table_name)
            .send()
            .await
            .map_err(|error| Error::store("get_item", error))
    }

    async fn put_item(
        &self,
        input: operation::put_item::PutItemInput,
    ) -> Result<operation::put_item::PutItemOutput> {
        self.put_item()
            .set_condition_expression(input.condition_expression)
            .set_expression_attribute_names(input.expression_attribute_names)
            .set_expression_attribute_values(input.expression_attribute_values)
            .set_item(input.item)
            .set_return_consumed_capacity(input.return_consumed_capacity)
            .set_return_item_collection_metrics(input.return_item_collection_metrics)
            .set_return_values(input.return_values)
            .set_return_values_on_condition_check_failure(
                input.return_values_on_condition_check_failure,
            )
            .set_table_name(input.table_name)
            .send()
            .await
            .map_err(|error| {
                map_sdk_error("put_item", error, |error| {
                    error.is_conditional_check_failed_exception()
                })
            })
    }

    async fn update_item(
        &self,
        input: operation::update_item::UpdateItemInput,
    ) -> Result<operation::update_item::UpdateItemOutput> {
        self.update_item()
            .set_condition_expression(input.condition_expression)
            .set_expression_attribute_names(input.expression_attribute_names)
            .set_expression_attribute_values(input.expression_attribute_values)
            .set_key(input.key)
            .set_return_consumed_capacity(input.return_consumed_capacity)
            .set_return_item_collection_metrics(input.return_item_collection_metrics)
            .set_return_values(input.return_values)
            .set_return_values_on_condition_check_failure(
                input.return_values_on_condition_check_failure,
            )
            .set_table_name(input.table_name)
            .set_update_expression(input.update_expression)
            .send()
            .await
            .map_err(|error| {
                map_sdk_error("update_item", error, |error| {
                    error.is_conditional_check_failed_exception()
                })
            })
    }

    async fn delete_item(
        &self,
        input: operation::delete_item::DeleteItemInput,
    ) -> Result<operation::delete_item::DeleteItemOutput> {
        self.delete_item()
            .set_condition_expression(input.condition_expression)
            .set_expression_attribute_names(input.expression_attribute_names)
            .set_expression_attribute_values(input.expression_attribute_values)
            .set_key(input.key)
            .set_return_consumed_capacity(input.return_consumed_capacity)
            .set_return_item_collection_metrics(input.return_item_collection_metrics)
            .set_return_values(input.return_values)
            .set_return_values_on_condition_check_failure(
                input.return_values_on_condition_check_failure,
            )
            .set_table_name(input.table_name)
            .send()
            .await
            .map_err(|error| {
                map_sdk_error("delete_item", error, |error| {
                    error.is_conditional_check_failed_exception()
                })
            })
    }

    async fn batch_write_item(
        &self,
        input: operation::batch_write_item::BatchWriteItemInput,
    ) -> Result<operation::batch_write_item::BatchWriteItemOutput> {
        self.batch_write_item()
            .set_request_items(input.request_items)
            .set_return_consumed_capacity(input.return_consumed_capacity)
            .set_return_item_collection_metrics(input.return_item_collection_metrics)
            .send()
            .await
            .map_err(|error| Error::store("batch_write_item", error))
    }

    async fn batch_get_item(
        &self,
        input: operation::batch_get_item::BatchGetItemInput,
    ) -> Result<operation::batch_get_item::BatchGetItemOutput> {
        self.batch_get_item()
            .set_request_items(input.request_items)
            .set_return_consumed_capacity(input.return_consumed_capacity)
            .send()
            .await
            .map_err(|error| Error::store("batch_get_item", error))
    }

    async fn query(
        &self,
        input: operation::query::QueryInput,
    ) -> Result<operation::query::QueryOutput> {
        self.query()
            .set_consistent_read(input.consistent_read)
            .set_exclusive_start_key(input.exclusive_start_key)
            .set_expression_attribute_names(input.expression_attribute_names)
            .set_expression_attribute_values(input.expression_attribute_values)
            .set_filter_expression(input.filter_expression)
            .set_index_name(input.index_name)
            .set_key_condition_expression(input.key_condition_expression)
            .set_limit(input.limit)
            .set_projection_expression(input.projection_expression)
            .set_return_consumed_capacity(input.return_consumed_capacity)
            .set_scan_index_forward(input.scan_index_forward)
            .set_select(input.select)
            .set_table_name(input.table_name)
            .send()
            .await
            .map_err(|error| Error::store("query", error))
    }

    async fn scan(
        &self,
        input: operation::scan::ScanInput,
    ) -> Result<operation::scan::ScanOutput> {
        self.scan()
            .set_consistent_read(input.consistent_read)
            .set_exclusive_start_key(input.exclusive_start_key)
            .set_expression_attribute_names(input.expression_attribute_names)
            .set_expression_attribute_values(input.expression_attribute_values)
            .set_filter_expression(input.filter_expression)
            .set_index_name(input.index_name)
            .set_limit(input.limit)
            .set_projection_expression(input.projection_expression)
            .set_return_consumed_capacity(input.return_consumed_capacity)
            .set_segment(input.segment)
            .set_select(input.select)
            .set_table_name(input.table_name)
            .set_total_segments(input.total_segments)
            .send()
            .await
            .map_err(|error| Error::store("scan", error))
    }
}
