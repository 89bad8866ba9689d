use serde::Serialize;

use crate::models::{Day, Item, Meal};

/// Row sent to `days`. Meals travel separately.
#[derive(Debug, Serialize)]
pub struct DayPayload<'a> {
    pub date: &'a str,
    pub kcal_total: u32,
    pub ptn_total: u32,
    pub carb_total: u32,
    pub fat_total: u32,
    pub sleep_start: Option<&'a str>,
    pub sleep_end: Option<&'a str>,
    pub sleep_quality: &'a str,
    pub notes: &'a str,
}

impl<'a> From<&'a Day> for DayPayload<'a> {
    fn from(day: &'a Day) -> Self {
        Self {
            date: &day.date,
            kcal_total: day.kcal_total,
            ptn_total: day.ptn_total,
            carb_total: day.carb_total,
            fat_total: day.fat_total,
            sleep_start: day.sleep_start.as_deref(),
            sleep_end: day.sleep_end.as_deref(),
            sleep_quality: &day.sleep_quality,
            notes: &day.notes,
        }
    }
}

/// Row sent to `meals`; refers to its day by date, not by any id.
#[derive(Debug, Serialize)]
pub struct MealPayload<'a> {
    pub date: &'a str,
    pub name: &'a str,
    pub kcal: u32,
    pub ptn: u32,
}

impl<'a> MealPayload<'a> {
    pub fn new(date: &'a str, meal: &'a Meal) -> Self {
        Self {
            date,
            name: &meal.name,
            kcal: meal.kcal,
            ptn: meal.ptn,
        }
    }
}

/// Row sent to `meal_items`. `meal_id` is always the id the remote store
/// generated for the meal in this run.
#[derive(Debug, Serialize)]
pub struct ItemPayload<'a> {
    pub meal_id: i64,
    pub name: &'a str,
    pub kcal: u32,
    pub ptn: u32,
}

impl<'a> ItemPayload<'a> {
    pub fn new(meal_id: i64, item: &'a Item) -> Self {
        Self {
            meal_id,
            name: &item.name,
            kcal: item.kcal,
            ptn: item.ptn,
        }
    }
}

/// Freeform entry captured by the HTTP ingress route.
#[derive(Debug, Serialize)]
pub struct ChatLogPayload<'a> {
    pub date: &'a str,
    pub text: &'a str,
    pub status: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_day_payload_shape() {
        let day = Day::new("2024-01-01")
            .with_totals(2000, 150, 200, 60)
            .with_meals(vec![Meal::new("Breakfast", 500, 30)]);

        let value = serde_json::to_value(DayPayload::from(&day)).unwrap();
        assert_eq!(
            value,
            json!({
                "date": "2024-01-01",
                "kcal_total": 2000,
                "ptn_total": 150,
                "carb_total": 200,
                "fat_total": 60,
                "sleep_start": null,
                "sleep_end": null,
                "sleep_quality": "BOA",
                "notes": ""
            })
        );
    }

    #[test]
    fn test_item_payload_uses_given_meal_id() {
        let item = Item::new("Eggs", 200, 15);
        let value = serde_json::to_value(ItemPayload::new(91, &item)).unwrap();
        assert_eq!(
            value,
            json!({"meal_id": 91, "name": "Eggs", "kcal": 200, "ptn": 15})
        );
    }
}
