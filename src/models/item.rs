use serde::{Deserialize, Serialize};
use std::fmt;

/// A single food component of a meal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub kcal: u32,
    pub ptn: u32,
}

impl Item {
    pub fn new(name: impl Into<String>, kcal: u32, ptn: u32) -> Self {
        Self {
            name: name.into(),
            kcal,
            ptn,
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} kcal, {}g ptn)", self.name, self.kcal, self.ptn)
    }
}
