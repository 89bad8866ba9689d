//! Access to the remote structured store.
//!
//! The store exposes one REST collection per table and assigns its own
//! identifiers on insert. [`RemoteStore`] is the seam the sync engine and the
//! HTTP ingress talk to; [`RestClient`] is the production implementation.

mod error;
#[cfg(test)]
pub(crate) mod fake;
mod rest;

pub use error::RemoteError;
pub use rest::RestClient;

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

/// Collections of the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Days,
    Meals,
    MealItems,
    ChatLogs,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Days => "days",
            Collection::Meals => "meals",
            Collection::MealItems => "meal_items",
            Collection::ChatLogs => "chat_logs",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Equality filter on a single column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub column: String,
    pub value: String,
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Query-string form, e.g. `date=eq.2024-01-01`.
    pub fn to_query(&self) -> String {
        format!(
            "{}=eq.{}",
            urlencoding::encode(&self.column),
            urlencoding::encode(&self.value)
        )
    }

    pub fn matches(&self, row: &Value) -> bool {
        match row.get(&self.column) {
            Some(Value::String(s)) => s == &self.value,
            Some(other) => other.to_string() == self.value,
            None => false,
        }
    }
}

/// Operations the remote store offers to this client. No transactions and
/// no batching: every call stands alone.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Inserts a row and returns the stored representation, including any
    /// generated identifier.
    async fn create(&self, collection: Collection, row: &Value) -> Result<Value, RemoteError>;

    /// Updates the rows selected by `filter` and returns them. An empty list
    /// means nothing matched.
    async fn update(
        &self,
        collection: Collection,
        filter: &Filter,
        row: &Value,
    ) -> Result<Vec<Value>, RemoteError>;

    async fn list(
        &self,
        collection: Collection,
        filter: Option<&Filter>,
    ) -> Result<Vec<Value>, RemoteError>;

    /// Cheap call used to tell "unreachable" apart from per-record failures.
    async fn ping(&self) -> Result<(), RemoteError>;
}

/// Reads the generated `id` from a created row.
pub fn generated_id(collection: Collection, row: &Value) -> Result<i64, RemoteError> {
    row.get("id")
        .and_then(Value::as_i64)
        .ok_or(RemoteError::MissingId(collection))
}
