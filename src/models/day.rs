use serde::{Deserialize, Serialize};
use std::fmt;

use super::meal::Meal;

/// Sleep quality recorded when the log does not state one.
pub const DEFAULT_SLEEP_QUALITY: &str = "BOA";

/// One day of the log: sleep, nutrition totals, notes and meals.
///
/// The totals are whatever the source recorded. They are not derived from the
/// meals and may disagree with their sum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    /// Natural key, kept exactly as written in the section label.
    pub date: String,
    pub kcal_total: u32,
    pub ptn_total: u32,
    pub carb_total: u32,
    pub fat_total: u32,
    pub sleep_start: Option<String>,
    pub sleep_end: Option<String>,
    pub sleep_quality: String,
    pub notes: String,
    #[serde(default)]
    pub meals: Vec<Meal>,
}

impl Day {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            kcal_total: 0,
            ptn_total: 0,
            carb_total: 0,
            fat_total: 0,
            sleep_start: None,
            sleep_end: None,
            sleep_quality: DEFAULT_SLEEP_QUALITY.to_string(),
            notes: String::new(),
            meals: Vec::new(),
        }
    }

    pub fn with_totals(mut self, kcal: u32, ptn: u32, carb: u32, fat: u32) -> Self {
        self.kcal_total = kcal;
        self.ptn_total = ptn;
        self.carb_total = carb;
        self.fat_total = fat;
        self
    }

    pub fn with_sleep(
        mut self,
        start: impl Into<String>,
        end: impl Into<String>,
        quality: impl Into<String>,
    ) -> Self {
        self.sleep_start = Some(start.into());
        self.sleep_end = Some(end.into());
        self.sleep_quality = quality.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_meals(mut self, meals: Vec<Meal>) -> Self {
        self.meals = meals;
        self
    }

    pub fn item_count(&self) -> usize {
        self.meals.iter().map(|m| m.items.len()).sum()
    }
}

/// Renders the day back into the section format the parser reads.
impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {}", self.date)?;
        if let (Some(start), Some(end)) = (&self.sleep_start, &self.sleep_end) {
            writeln!(
                f,
                "- sleep: deitei {} -> acordou {}; qualidade: {}",
                start, end, self.sleep_quality
            )?;
        }
        writeln!(
            f,
            "- summary: {} kcal, {}g ptn, {}g carb, {}g fat",
            self.kcal_total, self.ptn_total, self.carb_total, self.fat_total
        )?;
        if !self.notes.is_empty() {
            writeln!(f, "- notes: {}", self.notes)?;
        }
        for meal in &self.meals {
            writeln!(f, "{}", meal)?;
        }
        Ok(())
    }
}
