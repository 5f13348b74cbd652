//! Project-scoped unique identifiers.
//!
//! An id is registered in a dedicated table through a conditional put that
//! only succeeds when the `(project, id)` record does not exist yet. A
//! collision is retried with a fresh UUID until the attempts run out.

use crate::{common, error::Error, error::Result, store::Store, write};

use serde::Serialize;
use uuid::Uuid;

/// Number of registration attempts made before giving up.
pub const DEFAULT_ID_ATTEMPTS: usize = 3;

/// Record stored in the id registry table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Registration {
    /// Project the id belongs to.
    pub project: String,
    /// The random part of the id.
    pub id: String,
}

/// Generates ids of the form `{project}_{uuid}` that are unique per project.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_resource::id::IdGenerator;
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let id = IdGenerator::new("ids").generate(client, "acme").await?;
/// assert!(id.starts_with("acme_"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdGenerator {
    /// Registry table, keyed by `project` and `id`.
    pub table_name: String,
    /// Registration attempts before failing; at least one is always made.
    pub attempts: usize,
}

impl IdGenerator {
    /// Generator over `table_name` with the default number of attempts.
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            attempts: DEFAULT_ID_ATTEMPTS,
        }
    }

    fn registration(&self, project: &str) -> write::put_item::PutItem<Registration> {
        let condition = common::condition::ConditionMap::Leaves(
            common::condition::LogicalOperator::And,
            vec![common::condition::AttributeCondition::new(
                "id",
                common::condition::Condition::NotExists,
            )],
        );
        write::put_item::PutItem {
            item: Registration {
                project: project.to_string(),
                id: Uuid::new_v4().to_string(),
            },
            write_args: write::common::WriteArgs::table(self.table_name.as_str())
                .with_condition(condition),
        }
    }

    /// Registers a fresh id for `project` and returns `{project}_{id}`.
    ///
    /// Fails with [`Error::IdGenerationExhausted`] when every attempt collided.
    /// Store failures other than a collision are returned immediately.
    #[tracing::instrument(
        name = "dynamodb_resource.generate_id",
        skip(self, store),
        fields(table = %self.table_name),
        err
    )]
    pub async fn generate<S: Store + ?Sized>(&self, store: &S, project: &str) -> Result<String> {
        let attempts = self.attempts.max(1);
        for attempt in 1..=attempts {
            let put_item = self.registration(project);
            let id = put_item.item.id.clone();
            match put_item.send(store).await {
                Ok(_) => return Ok(format!("{project}_{id}")),
                Err(error) if error.is_conditional_check_failed() => {
                    tracing::debug!(attempt, %id, "id already registered, retrying");
                }
                Err(error) => return Err(error),
            }
        }
        tracing::error!(attempts, "id generation exhausted");
        Err(Error::IdGenerationExhausted {
            project: project.to_string(),
            attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mock::MockStore;

    use aws_sdk_dynamodb::types;
    use rstest::rstest;

    fn collision() -> Result<aws_sdk_dynamodb::operation::put_item::PutItemOutput> {
        Err(Error::ConditionalCheckFailed {
            operation: "put_item",
        })
    }

    #[tokio::test]
    async fn test_generate_first_attempt() {
        let store = MockStore::default();
        let id = IdGenerator::new("ids").generate(&store, "acme").await.unwrap();
        let calls = store.put_item_calls();
        assert_eq!(calls.len(), 1);
        let (project, random) = id.split_once('_').unwrap();
        assert_eq!(project, "acme");
        assert!(Uuid::parse_str(random).is_ok());
        let item = calls[0].item.as_ref().unwrap();
        assert_eq!(item["project"], types::AttributeValue::S("acme".to_string()));
        assert_eq!(item["id"], types::AttributeValue::S(random.to_string()));
        assert_eq!(
            calls[0].condition_expression.as_deref(),
            Some("attribute_not_exists(#id)")
        );
        assert_eq!(calls[0].table_name.as_deref(), Some("ids"));
    }

    #[rstest]
    #[case::default_attempts(DEFAULT_ID_ATTEMPTS, 3)]
    #[case::single_attempt(1, 1)]
    #[case::zero_means_one(0, 1)]
    #[tokio::test]
    async fn test_generate_exhausted(#[case] attempts: usize, #[case] expected: usize) {
        let store = MockStore::default();
        for _ in 0..expected {
            store.push_put_item(collision());
        }
        let generator = IdGenerator {
            attempts,
            ..IdGenerator::new("ids")
        };
        let error = generator.generate(&store, "acme").await.unwrap_err();
        assert!(matches!(
            error,
            Error::IdGenerationExhausted { ref project, attempts } if project == "acme" && attempts == expected
        ));
        assert_eq!(store.put_item_calls().len(), expected);
    }

    #[tokio::test]
    async fn test_generate_retries_with_fresh_id() {
        let store = MockStore::default();
        store.push_put_item(collision());
        let id = IdGenerator::new("ids").generate(&store, "acme").await.unwrap();
        let calls = store.put_item_calls();
        assert_eq!(calls.len(), 2);
        assert_ne!(calls[0].item, calls[1].item);
        assert_eq!(
            id,
            format!("acme_{}", calls[1].item.as_ref().unwrap()["id"].as_s().unwrap())
        );
    }

    #[tokio::test]
    async fn test_generate_propagates_store_failure() {
        let store = MockStore::default();
        store.push_put_item(Err(Error::store("put_item", "access denied")));
        let error = IdGenerator::new("ids").generate(&store, "acme").await.unwrap_err();
        assert!(matches!(error, Error::Store { .. }));
        assert_eq!(store.put_item_calls().len(), 1);
    }
}
