use serde::{Deserialize, Serialize};
use std::fmt;

use super::item::Item;

/// A named eating event. `kcal` and `ptn` come from the meal header and are
/// never recomputed from the items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meal {
    pub name: String,
    pub kcal: u32,
    pub ptn: u32,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Meal {
    pub fn new(name: impl Into<String>, kcal: u32, ptn: u32) -> Self {
        Self {
            name: name.into(),
            kcal,
            ptn,
            items: Vec::new(),
        }
    }

    pub fn with_items(mut self, items: Vec<Item>) -> Self {
        self.items = items;
        self
    }
}

/// Renders the indented meal line of the log format.
impl fmt::Display for Meal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  - {} ({} kcal, {}g ptn)", self.name, self.kcal, self.ptn)?;
        if !self.items.is_empty() {
            let items: Vec<String> = self.items.iter().map(Item::to_string).collect();
            write!(f, ": {}", items.join(", "))?;
        }
        Ok(())
    }
}
