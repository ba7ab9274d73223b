// src/aggregate/mod.rs
pub mod daily;
pub mod weekly;

pub use daily::{zone_averages, DailyStats};
pub use weekly::{apply_weekly, is_anchor_day};
