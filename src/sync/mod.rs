//! Pushes parsed or locally stored days to the remote store.
//!
//! Writes go out strictly in order: a day is created (or updated when it
//! already exists), then each of its meals is inserted, then the items of a
//! meal are inserted with the meal id the store just generated. The store has
//! no transactions, so each step is contained on its own: a failure costs the
//! record it happened on (and, for meals, their items) and nothing else.
//!
//! Re-running a day is safe. Re-running meals and items is not: every run
//! inserts them again. Callers that re-sync should restrict the date range.

mod engine;
mod payload;
mod report;

pub use engine::SyncEngine;
pub use payload::{ChatLogPayload, DayPayload, ItemPayload, MealPayload};
pub use report::{DayOutcome, DayStatus, MealOutcome, SyncReport};
