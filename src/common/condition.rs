use crate::common;

use aws_sdk_dynamodb::types;
use serde::{Serialize, ser::Error as _};
use serde_dynamo::Result;

/// Logical operator for combining conditions.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LogicalOperator {
    /// All conditions must hold.
    #[default]
    And,
    /// At least one condition must hold.
    Or,
}

impl LogicalOperator {
    fn separator(self) -> &'static str {
        match self {
            Self::And => " AND ",
            Self::Or => " OR ",
        }
    }
}

/// Condition applied to a single attribute.
///
/// ```rust
/// use dynamodb_resource::common::condition;
///
/// let eq = condition::Condition::Equals("value".to_string());
/// let gt = condition::Condition::GreaterThan(100);
/// let missing: condition::Condition<String> = condition::Condition::NotExists;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Condition<T> {
    /// The attribute is a string starting with the given prefix.
    BeginsWith(String),
    /// The attribute lies between two values (inclusive).
    Between(T, T),
    /// The attribute (string, set or list) contains the value.
    Contains(T),
    /// The attribute equals the value.
    Equals(T),
    /// The attribute is greater than the value.
    GreaterThan(T),
    /// The attribute is greater than or equal to the value.
    GreaterThanOrEqual(T),
    /// The attribute equals one of the values.
    In(Vec<T>),
    /// The attribute is less than the value.
    LessThan(T),
    /// The attribute is less than or equal to the value.
    LessThanOrEqual(T),
    /// The attribute does not contain the value.
    NotContains(T),
    /// The attribute differs from the value.
    NotEqual(T),
    /// The attribute is present on the item.
    Exists,
    /// The attribute is absent from the item.
    NotExists,
}

impl<T: Serialize> Condition<T> {
    fn render(self, path: &str, builder: &mut common::ExpressionBuilder) -> Result<String> {
        let expression = match self {
            Self::BeginsWith(prefix) => {
                let value = builder.value(types::AttributeValue::S(prefix));
                format!("begins_with({path}, {value})")
            }
            Self::Between(low, high) => {
                let low = builder.serialize(low)?;
                let high = builder.serialize(high)?;
                format!("{path} BETWEEN {low} AND {high}")
            }
            Self::Contains(value) => format!("contains({path}, {})", builder.serialize(value)?),
            Self::Equals(value) => format!("{path} = {}", builder.serialize(value)?),
            Self::GreaterThan(value) => format!("{path} > {}", builder.serialize(value)?),
            Self::GreaterThanOrEqual(value) => format!("{path} >= {}", builder.serialize(value)?),
            Self::In(values) => {
                if values.is_empty() {
                    return Err(serde_dynamo::Error::custom("IN requires at least one value"));
                }
                let placeholders = values
                    .into_iter()
                    .map(|value| builder.serialize(value))
                    .collect::<Result<Vec<_>>>()?;
                format!("{path} IN ({})", placeholders.join(", "))
            }
            Self::LessThan(value) => format!("{path} < {}", builder.serialize(value)?),
            Self::LessThanOrEqual(value) => format!("{path} <= {}", builder.serialize(value)?),
            Self::NotContains(value) => {
                format!("NOT contains({path}, {})", builder.serialize(value)?)
            }
            Self::NotEqual(value) => format!("{path} <> {}", builder.serialize(value)?),
            Self::Exists => format!("attribute_exists({path})"),
            Self::NotExists => format!("attribute_not_exists({path})"),
        };
        Ok(expression)
    }
}

/// Condition bound to an attribute path (`a.b` for nested maps).
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeCondition<T> {
    /// The dotted path of the attribute.
    pub name: String,
    /// The condition to apply.
    pub condition: Condition<T>,
}

impl<T> AttributeCondition<T> {
    /// Binds a condition to an attribute path.
    pub fn new(name: impl Into<String>, condition: Condition<T>) -> Self {
        Self {
            name: name.into(),
            condition,
        }
    }
}

impl<T: Serialize> AttributeCondition<T> {
    pub(crate) fn render(self, builder: &mut common::ExpressionBuilder) -> Result<String> {
        let path = builder.name(&self.name);
        self.condition.render(&path, builder)
    }
}

/// Tree of conditions combined with logical operators.
///
/// ```rust
/// use dynamodb_resource::common::condition;
///
/// let map = condition::ConditionMap::Leaves(
///     condition::LogicalOperator::And,
///     vec![condition::AttributeCondition::new(
///         "status",
///         condition::Condition::Equals("active".to_string()),
///     )],
/// );
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum ConditionMap<T> {
    /// Conditions combined with the logical operator.
    Leaves(LogicalOperator, Vec<AttributeCondition<T>>),
    /// Sub-trees combined with the logical operator; each multi-condition sub-tree is parenthesized.
    Node(LogicalOperator, Vec<ConditionMap<T>>),
}

impl<T: Serialize> ConditionMap<T> {
    pub(crate) fn render(self, builder: &mut common::ExpressionBuilder) -> Result<String> {
        match self {
            Self::Leaves(operator, conditions) => {
                let expressions = conditions
                    .into_iter()
                    .map(|condition| condition.render(builder))
                    .collect::<Result<Vec<_>>>()?;
                Ok(expressions.join(operator.separator()))
            }
            Self::Node(operator, children) => {
                let mut expressions = Vec::with_capacity(children.len());
                for child in children {
                    let wrap = child.len() > 1;
                    let expression = child.render(builder)?;
                    if wrap {
                        expressions.push(format!("({expression})"));
                    } else {
                        expressions.push(expression);
                    }
                }
                Ok(expressions.join(operator.separator()))
            }
        }
    }
}

impl<T> ConditionMap<T> {
    fn len(&self) -> usize {
        match self {
            Self::Leaves(_, conditions) => conditions.len(),
            Self::Node(_, children) => children.len(),
        }
    }
}
