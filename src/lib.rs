#![deny(missing_docs)]
#![deny(warnings)]

//! # DynamoDB Resource
//!
//! Typed resources loaded from untrusted payloads, plus DynamoDB operations
//! that stay correct beyond the provider's per-request limits.
//!
//! ## Overview
//!
//! - [`mod@resource`] turns any JSON value into a fully initialized entity.
//!   Loading never fails; validation returns the paths of the invalid fields;
//!   `safe_load` keeps server-owned fields out of the client's reach.
//! - [`mod@read`] and [`mod@write`] lower typed requests into SDK inputs and
//!   send them through a [`Store`](store::Store). Batch operations are split
//!   into chunks sent one after the other; queries and scans follow
//!   continuation keys until the last page.
//! - [`mod@id`] registers project-scoped unique ids with a conditional put.
//!
//! ## Quick Example
//!
//! ```no_run
//! use aws_sdk_dynamodb::Client;
//! use dynamodb_resource::{common, read, write};
//! use serde_json::{Value, json};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! # let client = Client::from_conf(aws_sdk_dynamodb::config::Config::builder().build());
//! // 60 items become three BatchWriteItem requests of at most 25 items each
//! let batch_write = write::batch_write_item::BatchWriteItem {
//!     table_name: "users".to_string(),
//!     items: (0..60).map(|id| json!({"id": id.to_string(), "team": "core"})).collect(),
//!     ..Default::default()
//! };
//! batch_write.send(&client).await?;
//!
//! // every page of the query is fetched before returning
//! let query: read::query::Query<Value> = read::query::Query {
//!     partition_key: common::key::Key::new("team", json!("core")),
//!     multiple_read_args: read::common::MultipleReadArgs {
//!         index_name: Some("team-index".to_string()),
//!         ..read::common::MultipleReadArgs::table("users")
//!     },
//!     ..Default::default()
//! };
//! let members: Vec<Value> = query.send_as(&client).await?;
//! assert_eq!(members.len(), 60);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`mod@common`] - Keys, conditions, projections and expression placeholders
//! - [`mod@error`] - Error type of the storage operations
//! - [`mod@id`] - Project-scoped unique ids
//! - [`mod@read`] - GetItem, BatchGetItem, Query, Scan
//! - [`mod@resource`] - Load, safe-load and validate contracts
//! - [`mod@store`] - Storage boundary implemented for the SDK client
//! - [`mod@write`] - PutItem, UpdateItem, DeleteItem, BatchWriteItem

/// Common utilities for keys, conditions, and attribute selection.
pub mod common;

/// Errors raised by storage operations.
pub mod error;

/// Project-scoped unique identifier generation.
pub mod id;

/// Read operations for retrieving data from DynamoDB tables.
pub mod read;

/// Resource contracts: load, safe-load and validate.
pub mod resource;

/// Storage boundary used by every operation.
pub mod store;

/// Write operations for modifying data in DynamoDB tables.
pub mod write;
