//! Rebuilds the nested Day → Meal → Item view from the local store's flat
//! rows, in the shape the dashboard consumes.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::db::{DayRepository, DayRow, ItemRow, MealRow};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayView {
    pub date: String,
    pub summary: SummaryView,
    pub sleep: SleepView,
    pub meals: Vec<MealView>,
    /// One element when the day has a note, empty otherwise. The dashboard
    /// expects a list here, not a string.
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryView {
    pub kcal: i64,
    pub ptn: i64,
    pub carb: i64,
    pub fat: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SleepView {
    pub start: Option<String>,
    pub end: Option<String>,
    pub quality: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealView {
    pub id: i64,
    pub date: String,
    pub name: String,
    pub kcal: i64,
    pub ptn: i64,
    pub items: Vec<ItemView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemView {
    pub name: String,
    pub kcal: i64,
    pub ptn: i64,
}

impl From<ItemRow> for ItemView {
    fn from(row: ItemRow) -> Self {
        Self {
            name: row.name,
            kcal: row.kcal,
            ptn: row.ptn,
        }
    }
}

impl MealView {
    fn new(row: MealRow, items: Vec<ItemView>) -> Self {
        Self {
            id: row.id,
            date: row.date,
            name: row.name,
            kcal: row.kcal,
            ptn: row.ptn,
            items,
        }
    }
}

impl DayView {
    fn new(row: DayRow, meals: Vec<MealView>) -> Self {
        let notes = match row.notes {
            Some(note) if !note.is_empty() => vec![note],
            _ => Vec::new(),
        };
        Self {
            date: row.date,
            summary: SummaryView {
                kcal: row.kcal_total,
                ptn: row.ptn_total,
                carb: row.carb_total,
                fat: row.fat_total,
            },
            sleep: SleepView {
                start: row.sleep_start,
                end: row.sleep_end,
                quality: row.sleep_quality,
            },
            meals,
            notes,
        }
    }
}

/// Every stored day, most recent first, with meals and items nested.
pub async fn aggregate_days(repo: &DayRepository) -> Result<Vec<DayView>, sqlx::Error> {
    let rows = repo.list_days().await?;

    let mut views = Vec::with_capacity(rows.len());
    for row in rows {
        let mut meals = Vec::new();
        for meal in repo.meals_for_date(&row.date).await? {
            let items = repo
                .items_for_meal(meal.id)
                .await?
                .into_iter()
                .map(ItemView::from)
                .collect();
            meals.push(MealView::new(meal, items));
        }
        views.push(DayView::new(row, meals));
    }
    Ok(views)
}

/// JSON object keyed by date. Key order follows `views`.
pub fn keyed_by_date(views: Vec<DayView>) -> Result<Value, serde_json::Error> {
    let mut map = Map::with_capacity(views.len());
    for view in views {
        let date = view.date.clone();
        map.insert(date, serde_json::to_value(view)?);
    }
    Ok(Value::Object(map))
}
