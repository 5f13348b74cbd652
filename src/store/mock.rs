//! In-memory recording store for unit tests.
//!
//! Each operation pops its next scripted response; when nothing is scripted
//! an empty successful output is returned. Every input is recorded so tests
//! can count and inspect the requests that were issued.

use crate::{error::Result, store::Store};

use async_trait::async_trait;
use aws_sdk_dynamodb::operation;
use std::{collections::VecDeque, sync::Mutex};

struct Script<I, O> {
    calls: Vec<I>,
    responses: VecDeque<Result<O>>,
}

impl<I, O> Default for Script<I, O> {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            responses: VecDeque::new(),
        }
    }
}

impl<I, O> Script<I, O> {
    fn next(&mut self, input: I, fallback: impl FnOnce() -> O) -> Result<O> {
        self.calls.push(input);
        self.responses.pop_front().unwrap_or_else(|| Ok(fallback()))
    }
}

macro_rules! mock_operation {
    ($field:ident, $push:ident, $calls:ident, $module:ident, $input:ident, $output:ident) => {
        #[allow(dead_code)]
        impl MockStore {
            pub(crate) fn $push(&self, response: Result<operation::$module::$output>) -> &Self {
                self.$field.lock().unwrap().responses.push_back(response);
                self
            }

            pub(crate) fn $calls(&self) -> Vec<operation::$module::$input> {
                self.$field.lock().unwrap().calls.clone()
            }
        }
    };
}

#[derive(Default)]
pub(crate) struct MockStore {
    get_item: Mutex<
        Script<operation::get_item::GetItemInput, operation::get_item::GetItemOutput>,
    >,
    put_item: Mutex<
        Script<operation::put_item::PutItemInput, operation::put_item::PutItemOutput>,
    >,
    update_item: Mutex<
        Script<
            operation::update_item::UpdateItemInput,
            operation::update_item::UpdateItemOutput,
        >,
    >,
    delete_item: Mutex<
        Script<
            operation::delete_item::DeleteItemInput,
            operation::delete_item::DeleteItemOutput,
        >,
    >,
    batch_write_item: Mutex<
        Script<
            operation::batch_write_item::BatchWriteItemInput,
            operation::batch_write_item::BatchWriteItemOutput,
        >,
    >,
    batch_get_item: Mutex<
        Script<
            operation::batch_get_item::BatchGetItemInput,
            operation::batch_get_item::BatchGetItemOutput,
        >,
    >,
    query: Mutex<Script<operation::query::QueryInput, operation::query::QueryOutput>>,
    scan: Mutex<Script<operation::scan::ScanInput, operation::scan::ScanOutput>>,
}

mock_operation!(get_item, push_get_item, get_item_calls, get_item, GetItemInput, GetItemOutput);
mock_operation!(put_item, push_put_item, put_item_calls, put_item, PutItemInput, PutItemOutput);
mock_operation!(
    update_item,
    push_update_item,
    update_item_calls,
    update_item,
    UpdateItemInput,
    UpdateItemOutput
);
mock_operation!(
    delete_item,
    push_delete_item,
    delete_item_calls,
    delete_item,
    DeleteItemInput,
    DeleteItemOutput
);
mock_operation!(
    batch_write_item,
    push_batch_write_item,
    batch_write_item_calls,
    batch_write_item,
    BatchWriteItemInput,
    BatchWriteItemOutput
);
mock_operation!(
    batch_get_item,
    push_batch_get_item,
    batch_get_item_calls,
    batch_get_item,
    BatchGetItemInput,
    BatchGetItemOutput
);
mock_operation!(query, push_query, query_calls, query, QueryInput, QueryOutput);
mock_operation!(scan, push_scan, scan_calls, scan, ScanInput, ScanOutput);

#[async_trait]
impl Store for MockStore {
    async fn get_item(
        &self,
        input: operation::get_item::GetItemInput,
    ) -> Result<operation::get_item::GetItemOutput> {
        self.get_item
            .lock()
            .unwrap()
            .next(input, || operation::get_item::GetItemOutput::builder().build())
    }

    async fn put_item(
        &self,
        input: operation::put_item::PutItemInput,
    ) -> Result<operation::put_item::PutItemOutput> {
        self.put_item
            .lock()
            .unwrap()
            .next(input, || operation::put_item::PutItemOutput::builder().build())
    }

    async fn update_item(
        &self,
        input: operation::update_item::UpdateItemInput,
    ) -> Result<operation::update_item::UpdateItemOutput> {
        self.update_item
            .lock()
            .unwrap()
            .next(input, || operation::update_item::UpdateItemOutput::builder().build())
    }

    async fn delete_item(
        &self,
        input: operation::delete_item::DeleteItemInput,
    ) -> Result<operation::delete_item::DeleteItemOutput> {
        self.delete_item
            .lock()
            .unwrap()
            .next(input, || operation::delete_item::DeleteItemOutput::builder().build())
    }

    async fn batch_write_item(
        &self,
        input: operation::batch_write_item::BatchWriteItemInput,
    ) -> Result<operation::batch_write_item::BatchWriteItemOutput> {
        self.batch_write_item.lock().unwrap().next(input, || {
            operation::batch_write_item::BatchWriteItemOutput::builder().build()
        })
    }

    async fn batch_get_item(
        &self,
        input: operation::batch_get_item::BatchGetItemInput,
    ) -> Result<operation::batch_get_item::BatchGetItemOutput> {
        self.batch_get_item.lock().unwrap().next(input, || {
            operation::batch_get_item::BatchGetItemOutput::builder().build()
        })
    }

    async fn query(
        &self,
        input: operation::query::QueryInput,
    ) -> Result<operation::query::QueryOutput> {
        self.query
            .lock()
            .unwrap()
            .next(input, || operation::query::QueryOutput::builder().build())
    }

    async fn scan(
        &self,
        input: operation::scan::ScanInput,
    ) -> Result<operation::scan::ScanOutput> {
        self.scan
            .lock()
            .unwrap()
            .next(input, || operation::scan::ScanOutput::builder().build())
    }
}
