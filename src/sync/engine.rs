use serde::Serialize;
use serde_json::Value;

use super::payload::{DayPayload, ItemPayload, MealPayload};
use super::report::{DayOutcome, DayStatus, MealOutcome, SyncReport};
use crate::models::{Day, Item, Meal};
use crate::remote::{generated_id, Collection, Filter, RemoteError, RemoteStore};

/// Sequential Day → Meal → Item writer.
///
/// Each call is awaited before the next one is issued; nothing fans out.
pub struct SyncEngine<S> {
    store: S,
}

fn to_row<T: Serialize>(payload: &T) -> Result<Value, RemoteError> {
    serde_json::to_value(payload).map_err(|e| RemoteError::Encode(e.to_string()))
}

impl<S: RemoteStore> SyncEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fails only if the store cannot be reached at all.
    pub async fn check_connection(&self) -> Result<(), RemoteError> {
        self.store.ping().await
    }

    /// Syncs every day in order. Never stops early.
    pub async fn sync_days(&self, days: &[Day]) -> SyncReport {
        let mut report = SyncReport::default();
        for day in days {
            report.days.push(self.sync_day(day).await);
        }

        tracing::info!(
            days = report.days.len(),
            created = report.days_created(),
            updated = report.days_updated(),
            failed = report.days_failed(),
            "sync finished"
        );
        report
    }

    /// Pushes the day, then its meals. Meals go out whatever the day's
    /// outcome: they refer to it by date only.
    pub async fn sync_day(&self, day: &Day) -> DayOutcome {
        let status = self.push_day(day).await;
        if let DayStatus::Failed(error) = &status {
            tracing::warn!(date = %day.date, %error, "day sync failed");
        }

        let mut meals = Vec::with_capacity(day.meals.len());
        for meal in &day.meals {
            meals.push(self.sync_meal(&day.date, meal).await);
        }

        let outcome = DayOutcome {
            date: day.date.clone(),
            status,
            meals,
        };
        tracing::info!(
            date = %outcome.date,
            status = ?outcome.status,
            meals = outcome.meals.len(),
            items = outcome.items_synced(),
            "day synced"
        );
        outcome
    }

    /// Create, falling back to an update by date only when the store reports
    /// the date as a duplicate key. An update that matches no row fails.
    async fn push_day(&self, day: &Day) -> DayStatus {
        let row = match to_row(&DayPayload::from(day)) {
            Ok(row) => row,
            Err(e) => return DayStatus::Failed(e.to_string()),
        };

        match self.store.create(Collection::Days, &row).await {
            Ok(_) => DayStatus::Created,
            Err(e) if e.is_conflict() => {
                tracing::debug!(date = %day.date, "day already exists ({}), updating", e);
                let filter = Filter::eq("date", &day.date);
                match self.store.update(Collection::Days, &filter, &row).await {
                    Ok(rows) if rows.is_empty() => {
                        DayStatus::Failed(format!("update matched no row for {}", day.date))
                    }
                    Ok(_) => DayStatus::Updated,
                    Err(e) => DayStatus::Failed(e.to_string()),
                }
            }
            Err(e) => DayStatus::Failed(e.to_string()),
        }
    }

    async fn sync_meal(&self, date: &str, meal: &Meal) -> MealOutcome {
        // The generated id only lives for this meal's item loop.
        let remote_id = match self.insert_meal(date, meal).await {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(date, meal = %meal.name, error = %e, "meal insert failed");
                if !meal.items.is_empty() {
                    tracing::warn!(
                        date,
                        meal = %meal.name,
                        "skipping {} item(s) of unsynced meal",
                        meal.items.len()
                    );
                }
                return MealOutcome::Failed {
                    name: meal.name.clone(),
                    error: e.to_string(),
                    items_skipped: meal.items.len(),
                };
            }
        };

        let mut items_synced = 0;
        let mut items_failed = 0;
        for item in &meal.items {
            match self.insert_item(remote_id, item).await {
                Ok(()) => items_synced += 1,
                Err(e) => {
                    tracing::warn!(
                        date,
                        meal = %meal.name,
                        item = %item.name,
                        error = %e,
                        "item insert failed"
                    );
                    items_failed += 1;
                }
            }
        }

        MealOutcome::Synced {
            name: meal.name.clone(),
            remote_id,
            items_synced,
            items_failed,
        }
    }

    async fn insert_meal(&self, date: &str, meal: &Meal) -> Result<i64, RemoteError> {
        let row = to_row(&MealPayload::new(date, meal))?;
        let created = self.store.create(Collection::Meals, &row).await?;
        generated_id(Collection::Meals, &created)
    }

    async fn insert_item(&self, meal_id: i64, item: &Item) -> Result<(), RemoteError> {
        let row = to_row(&ItemPayload::new(meal_id, item))?;
        self.store.create(Collection::MealItems, &row).await?;
        Ok(())
    }
}
