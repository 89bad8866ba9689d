mod day;
mod item;
mod meal;

pub use day::{Day, DEFAULT_SLEEP_QUALITY};
pub use item::Item;
pub use meal::Meal;
