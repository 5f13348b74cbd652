//! Write operations for modifying data in DynamoDB tables.
//!
//! Single-item writes accept an optional condition; batch write splits its
//! items into chunks of at most 25.

/// Chunked batch put or delete over a single table.
pub mod batch_write_item;

/// Write arguments shared by the single-item write operations.
pub mod common;

/// Delete item operation for removing items from tables.
pub mod delete_item;

/// Put item operation for creating or replacing items.
pub mod put_item;

/// Update item operation with SET, REMOVE, ADD and DELETE actions.
pub mod update_item;
