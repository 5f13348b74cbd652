use crate::{common, error::Result, store::Store, write};

use aws_sdk_dynamodb::operation;
use serde::Serialize;
use serde_dynamo::Result as SerializationResult;

/// SET action for a single attribute.
///
/// ```rust
/// use dynamodb_resource::write::update_item;
///
/// let assign = update_item::SetInput::Assign("value".to_string());
/// let increment = update_item::SetInput::Increment(10);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum SetInput<T> {
    /// Replace the attribute value.
    Assign(T),
    /// Add to a numeric attribute.
    Increment(T),
    /// Subtract from a numeric attribute.
    Decrement(T),
    /// Append values to the end of a list attribute.
    ListAppend(T),
    /// Prepend values to the beginning of a list attribute.
    ListPrepend(T),
    /// Assign only when the attribute is absent.
    IfNotExists(T),
}

impl<T: Serialize> SetInput<T> {
    fn render(
        self,
        path: &str,
        builder: &mut common::ExpressionBuilder,
    ) -> SerializationResult<String> {
        let expression = match self {
            Self::Assign(value) => format!("{path} = {}", builder.serialize(value)?),
            Self::Increment(value) => format!("{path} = {path} + {}", builder.serialize(value)?),
            Self::Decrement(value) => format!("{path} = {path} - {}", builder.serialize(value)?),
            Self::ListAppend(value) => {
                format!("{path} = list_append({path}, {})", builder.serialize(value)?)
            }
            Self::ListPrepend(value) => {
                format!("{path} = list_append({}, {path})", builder.serialize(value)?)
            }
            Self::IfNotExists(value) => {
                format!("{path} = if_not_exists({path}, {})", builder.serialize(value)?)
            }
        };
        Ok(expression)
    }
}

/// Update expression, one list of actions per clause.
///
/// Attribute names are dotted paths. Empty clauses are omitted from the
/// rendered expression.
///
/// ```rust
/// use dynamodb_resource::write::update_item;
///
/// let update = update_item::Update {
///     set: vec![("name".to_string(), update_item::SetInput::Assign("New".to_string()))],
///     remove: vec!["nickname".to_string()],
///     ..Default::default()
/// };
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Update<T> {
    /// SET actions.
    pub set: Vec<(String, SetInput<T>)>,
    /// REMOVE actions (attribute paths).
    pub remove: Vec<String>,
    /// ADD actions: add to a number or insert into a set.
    pub add: Vec<(String, T)>,
    /// DELETE actions: remove elements from a set.
    pub delete: Vec<(String, T)>,
}

impl<T> Default for Update<T> {
    fn default() -> Self {
        Self {
            set: Vec::new(),
            remove: Vec::new(),
            add: Vec::new(),
            delete: Vec::new(),
        }
    }
}

impl<T: Serialize> Update<T> {
    pub(crate) fn render(
        self,
        builder: &mut common::ExpressionBuilder,
    ) -> SerializationResult<String> {
        let mut clauses = Vec::with_capacity(4);
        if !self.set.is_empty() {
            let actions = self
                .set
                .into_iter()
                .map(|(name, input)| {
                    let path = builder.name(&name);
                    input.render(&path, builder)
                })
                .collect::<SerializationResult<Vec<_>>>()?;
            clauses.push(format!("SET {}", actions.join(", ")));
        }
        if !self.remove.is_empty() {
            let paths = self
                .remove
                .iter()
                .map(|name| builder.name(name))
                .collect::<Vec<_>>();
            clauses.push(format!("REMOVE {}", paths.join(", ")));
        }
        for (keyword, actions) in [("ADD", self.add), ("DELETE", self.delete)] {
            if actions.is_empty() {
                continue;
            }
            let actions = actions
                .into_iter()
                .map(|(name, value)| {
                    let path = builder.name(&name);
                    Ok(format!("{path} {}", builder.serialize(value)?))
                })
                .collect::<SerializationResult<Vec<_>>>()?;
            clauses.push(format!("{keyword} {}", actions.join(", ")));
        }
        Ok(clauses.join(" "))
    }
}

/// Update item operation.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_resource::{common, write};
/// use serde_json::{Value, json};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let update_item: write::update_item::UpdateItem<Value> = write::update_item::UpdateItem {
///     keys: common::key::Keys::partition("id", json!("1")),
///     update: write::update_item::Update {
///         set: vec![(
///             "logins".to_string(),
///             write::update_item::SetInput::Increment(json!(1)),
///         )],
///         ..Default::default()
///     },
///     write_args: write::common::WriteArgs::table("users"),
/// };
/// update_item.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateItem<T> {
    /// The primary key of the item to update.
    pub keys: common::key::Keys<T>,
    /// The changes to apply.
    pub update: Update<T>,
    /// Additional write arguments (table name, condition, return values).
    pub write_args: write::common::WriteArgs<T>,
}

impl<T: Serialize> TryFrom<UpdateItem<T>> for operation::update_item::UpdateItemInput {
    type Error = crate::error::Error;

    fn try_from(update_item: UpdateItem<T>) -> Result<Self> {
        let key: common::Item = update_item.keys.try_into()?;
        let mut expressions = common::ExpressionBuilder::default();
        let update_expression = update_item.update.render(&mut expressions)?;
        let write_input = update_item.write_args.resolve(&mut expressions)?;
        let input =
            write::common::apply_write_input!(Self::builder(), write_input, expressions)
                .set_key(Some(key))
                .update_expression(update_expression)
                .build()?;
        Ok(input)
    }
}

impl<T: Serialize> UpdateItem<T> {
    /// Execute the update item operation.
    #[tracing::instrument(
        name = "dynamodb_resource.update_item",
        skip_all,
        fields(table = %self.write_args.table_name),
        err
    )]
    pub async fn send<S: Store + ?Sized>(
        self,
        store: &S,
    ) -> Result<operation::update_item::UpdateItemOutput> {
        let input: operation::update_item::UpdateItemInput = self.try_into()?;
        store.update_item(input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mock::MockStore;

    use aws_sdk_dynamodb::types;
    use rstest::rstest;
    use serde_json::{Value, json};
    use std::collections;

    #[rstest]
    #[case::assign(SetInput::Assign(json!(1)), "#a = :v0")]
    #[case::increment(SetInput::Increment(json!(1)), "#a = #a + :v0")]
    #[case::decrement(SetInput::Decrement(json!(1)), "#a = #a - :v0")]
    #[case::list_append(SetInput::ListAppend(json!([1])), "#a = list_append(#a, :v0)")]
    #[case::list_prepend(SetInput::ListPrepend(json!([1])), "#a = list_append(:v0, #a)")]
    #[case::if_not_exists(SetInput::IfNotExists(json!(1)), "#a = if_not_exists(#a, :v0)")]
    fn test_set_input_expression(#[case] input: SetInput<Value>, #[case] expected: &str) {
        let mut builder = common::ExpressionBuilder::default();
        let path = builder.name("a");
        assert_eq!(input.render(&path, &mut builder).unwrap(), expected);
    }

    #[test]
    fn test_update_expression_clauses() {
        let update = Update {
            set: vec![
                ("name".to_string(), SetInput::Assign(json!("Ada"))),
                ("address.city".to_string(), SetInput::Assign(json!("Turin"))),
            ],
            remove: vec!["nickname".to_string()],
            add: vec![("logins".to_string(), json!(1))],
            delete: vec![],
        };
        let mut builder = common::ExpressionBuilder::default();
        assert_eq!(
            update.render(&mut builder).unwrap(),
            "SET #name = :v0, #address.#city = :v1 REMOVE #nickname ADD #logins :v2"
        );
    }

    #[tokio::test]
    async fn test_update_item_with_condition_shares_placeholders() {
        let store = MockStore::default();
        let update_item: UpdateItem<Value> = UpdateItem {
            keys: common::key::Keys::partition("id", json!("1")),
            update: Update {
                set: vec![("version".to_string(), SetInput::Increment(json!(1)))],
                ..Default::default()
            },
            write_args: write::common::WriteArgs::table("users").with_condition(
                common::condition::ConditionMap::Leaves(
                    common::condition::LogicalOperator::And,
                    vec![common::condition::AttributeCondition::new(
                        "version",
                        common::condition::Condition::Equals(json!(4)),
                    )],
                ),
            ),
        };
        update_item.send(&store).await.unwrap();
        let expected = operation::update_item::UpdateItemInput::builder()
            .condition_expression("#version = :v1")
            .set_expression_attribute_names(Some(collections::HashMap::from([(
                "#version".to_string(),
                "version".to_string(),
            )])))
            .set_expression_attribute_values(Some(collections::HashMap::from([
                (":v0".to_string(), types::AttributeValue::N("1".to_string())),
                (":v1".to_string(), types::AttributeValue::N("4".to_string())),
            ])))
            .set_key(Some(common::Item::from([(
                "id".to_string(),
                types::AttributeValue::S("1".to_string()),
            )])))
            .table_name("users")
            .update_expression("SET #version = #version + :v0")
            .build()
            .unwrap();
        assert_eq!(store.update_item_calls(), vec![expected]);
    }
}
