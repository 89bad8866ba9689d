//! In-memory remote store for tests. Mimics the constraints that matter to
//! the sync engine: unique day dates, generated ids, and meal_id references.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{Collection, Filter, RemoteError, RemoteStore};

#[derive(Default)]
struct State {
    tables: HashMap<Collection, Vec<Value>>,
    next_id: i64,
    calls: Vec<String>,
}

#[derive(Default)]
pub struct FakeStore {
    state: Mutex<State>,
    unreachable: bool,
    failing_meal_dates: Vec<String>,
    failing_item_names: Vec<String>,
    unreachable_day_dates: Vec<String>,
    rejected_day_dates: Vec<String>,
    rejected_day_status: u16,
    omit_meal_ids: bool,
}

fn rejected(status: u16, body: &str) -> RemoteError {
    RemoteError::Status {
        status,
        body: body.to_string(),
    }
}

fn field<'a>(row: &'a Value, name: &str) -> &'a str {
    row.get(name).and_then(Value::as_str).unwrap_or_default()
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails as if the network were down.
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    /// Meal inserts for these dates are rejected.
    pub fn failing_meals_on(mut self, dates: &[&str]) -> Self {
        self.failing_meal_dates = dates.iter().map(|d| d.to_string()).collect();
        self
    }

    /// Item inserts with these names are rejected.
    pub fn failing_items_named(mut self, names: &[&str]) -> Self {
        self.failing_item_names = names.iter().map(|n| n.to_string()).collect();
        self
    }

    /// Day creates for these dates never reach the store.
    pub fn dropping_days_on(mut self, dates: &[&str]) -> Self {
        self.unreachable_day_dates = dates.iter().map(|d| d.to_string()).collect();
        self
    }

    /// Day creates for these dates are answered with `status`.
    pub fn rejecting_days_on(mut self, dates: &[&str], status: u16) -> Self {
        self.rejected_day_dates = dates.iter().map(|d| d.to_string()).collect();
        self.rejected_day_status = status;
        self
    }

    /// Created meals come back without an id.
    pub fn omitting_meal_ids(mut self) -> Self {
        self.omit_meal_ids = true;
        self
    }

    pub fn rows(&self, collection: Collection) -> Vec<Value> {
        let state = self.state.lock().unwrap();
        state.tables.get(&collection).cloned().unwrap_or_default()
    }

    /// Calls in issue order, as `collection:operation:key`. Created meals
    /// also carry their generated id (`meals:create:<date>:<id>`).
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }
}

#[async_trait]
impl RemoteStore for FakeStore {
    async fn create(&self, collection: Collection, row: &Value) -> Result<Value, RemoteError> {
        if self.unreachable {
            return Err(RemoteError::Transport("connection refused".to_string()));
        }
        let mut state = self.state.lock().unwrap();

        let key = match collection {
            Collection::MealItems => row["meal_id"].to_string(),
            _ => field(row, "date").to_string(),
        };
        state.calls.push(format!("{}:create:{}", collection, key));

        match collection {
            Collection::Days => {
                if self.unreachable_day_dates.iter().any(|d| d == &key) {
                    return Err(RemoteError::Transport("connection reset".to_string()));
                }
                if self.rejected_day_dates.iter().any(|d| d == &key) {
                    return Err(rejected(self.rejected_day_status, "day rejected"));
                }
                let exists = state
                    .tables
                    .get(&collection)
                    .is_some_and(|rows| rows.iter().any(|r| field(r, "date") == key));
                if exists {
                    return Err(rejected(409, "duplicate key value violates unique constraint"));
                }
            }
            Collection::Meals => {
                if self.failing_meal_dates.iter().any(|d| d == &key) {
                    return Err(rejected(400, "meal rejected"));
                }
            }
            Collection::MealItems => {
                if self
                    .failing_item_names
                    .iter()
                    .any(|n| n == field(row, "name"))
                {
                    return Err(rejected(400, "item rejected"));
                }
                let meal_id = row["meal_id"].as_i64();
                let meal_exists = state.tables.get(&Collection::Meals).is_some_and(|rows| {
                    rows.iter().any(|m| m["id"].as_i64() == meal_id)
                });
                if !meal_exists {
                    return Err(rejected(409, "violates foreign key constraint"));
                }
            }
            Collection::ChatLogs => {}
        }

        state.next_id += 1;
        let id = state.next_id;
        if collection == Collection::Meals {
            if let Some(call) = state.calls.last_mut() {
                call.push_str(&format!(":{}", id));
            }
        }

        let mut stored = row.clone();
        if let Value::Object(map) = &mut stored {
            map.insert("id".to_string(), Value::from(id));
        }
        state
            .tables
            .entry(collection)
            .or_default()
            .push(stored.clone());

        if collection == Collection::Meals && self.omit_meal_ids {
            if let Value::Object(map) = &mut stored {
                map.remove("id");
            }
        }
        Ok(stored)
    }

    async fn update(
        &self,
        collection: Collection,
        filter: &Filter,
        row: &Value,
    ) -> Result<Vec<Value>, RemoteError> {
        if self.unreachable {
            return Err(RemoteError::Transport("connection refused".to_string()));
        }
        let mut state = self.state.lock().unwrap();
        state
            .calls
            .push(format!("{}:update:{}", collection, filter.value));

        let mut updated = Vec::new();
        if let (Some(rows), Value::Object(changes)) =
            (state.tables.get_mut(&collection), row)
        {
            for existing in rows.iter_mut().filter(|r| filter.matches(r)) {
                if let Value::Object(target) = existing {
                    for (k, v) in changes {
                        target.insert(k.clone(), v.clone());
                    }
                }
                updated.push(existing.clone());
            }
        }
        Ok(updated)
    }

    async fn list(
        &self,
        collection: Collection,
        filter: Option<&Filter>,
    ) -> Result<Vec<Value>, RemoteError> {
        if self.unreachable {
            return Err(RemoteError::Transport("connection refused".to_string()));
        }
        Ok(self
            .rows(collection)
            .into_iter()
            .filter(|r| filter.map_or(true, |f| f.matches(r)))
            .collect())
    }

    async fn ping(&self) -> Result<(), RemoteError> {
        if self.unreachable {
            return Err(RemoteError::Transport("connection refused".to_string()));
        }
        Ok(())
    }
}
