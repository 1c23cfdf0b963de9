//! Data models
//!
//! Rust structs representing database entities.

mod achievement;
mod drink;
mod quick_add;
mod settings;

pub use achievement::{achievement_ids, current_streak, earned_achievements, Achievement};
pub use drink::{
    day_bounds, normalize_timestamp, parse_date, DailyTotal, Drink, DrinkCreate, DrinkSource,
    DrinkUpdate, GramsCorrection, TIMESTAMP_FORMAT,
};
pub use quick_add::{
    BuiltinQuickAdd, CustomQuickAdd, CustomQuickAddCreate, CustomQuickAddUpdate,
    BUILTIN_QUICK_ADDS,
};
pub use settings::{Settings, DAILY_GOAL_KEY};
