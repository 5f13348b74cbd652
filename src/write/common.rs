use crate::{common, error::Result};

use aws_sdk_dynamodb::types;
use serde::Serialize;

/// Arguments common to all single-item write operations (Put, Update, Delete).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WriteArgs<T> {
    /// Condition that must hold for the write to proceed.
    ///
    /// When it does not, the store reports
    /// [`Error::ConditionalCheckFailed`](crate::error::Error::ConditionalCheckFailed).
    pub condition: Option<common::condition::ConditionMap<T>>,
    /// Which item attributes to return in the response.
    pub return_values: Option<types::ReturnValue>,
    /// Which item attributes to return if the condition check fails.
    pub return_values_on_condition_check_failure:
        Option<types::ReturnValuesOnConditionCheckFailure>,
    /// The name of the table to write to.
    pub table_name: String,
}

impl<T> WriteArgs<T> {
    /// Write arguments for a table with defaults everywhere else.
    pub fn table(table_name: impl Into<String>) -> Self {
        Self {
            condition: None,
            return_values: None,
            return_values_on_condition_check_failure: None,
            table_name: table_name.into(),
        }
    }

    /// Guards the write with a condition.
    pub fn with_condition(mut self, condition: common::condition::ConditionMap<T>) -> Self {
        self.condition = Some(condition);
        self
    }
}

/// Resolved form of [`WriteArgs`]; names and values live in the request's builder.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct WriteInput {
    pub(crate) condition_expression: Option<String>,
    pub(crate) return_values: Option<types::ReturnValue>,
    pub(crate) return_values_on_condition_check_failure:
        Option<types::ReturnValuesOnConditionCheckFailure>,
    pub(crate) table_name: String,
}

impl<T: Serialize> WriteArgs<T> {
    pub(crate) fn resolve(self, builder: &mut common::ExpressionBuilder) -> Result<WriteInput> {
        let condition_expression = self
            .condition
            .map(|condition| condition.render(builder))
            .transpose()?;
        Ok(WriteInput {
            condition_expression,
            return_values: self.return_values,
            return_values_on_condition_check_failure: self
                .return_values_on_condition_check_failure,
            table_name: self.table_name,
        })
    }
}

/// apply resolved write settings and the request's placeholder tables to an input builder
macro_rules! apply_write_input {
    ($builder:expr, $input:expr, $expressions:expr) => {{
        let (names, values) = $expressions.into_parts();
        $builder
            .set_condition_expression($input.condition_expression)
            .set_expression_attribute_names(names)
            .set_expression_attribute_values(values)
            .set_return_values($input.return_values)
            .set_return_values_on_condition_check_failure(
                $input.return_values_on_condition_check_failure,
            )
            .table_name($input.table_name)
    }};
}

pub(crate) use apply_write_input;
