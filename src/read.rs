//! Read operations for retrieving data from DynamoDB tables.
//!
//! Query and scan follow continuation keys until the last page; batch get
//! splits its keys into chunks of at most 100.

/// Chunked batch get over a single table.
pub mod batch_get_item;

/// Read arguments and page accumulation shared by the read operations.
pub mod common;

/// Get item operation for retrieving a single item by primary key.
pub mod get_item;

/// Query operation across every page.
pub mod query;

/// Scan operation across every page.
pub mod scan;
