use chrono::{Datelike, Days, NaiveDate};

use crate::plan::PlannerDoc;
use crate::status::DayStatus;

/// Length of the rolling window, in days.
pub const WINDOW_DAYS: usize = 60;

/// One date in the grid, with everything the renderer needs to draw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub date: NaiveDate,
    pub weekday: String,
    pub day: u32,
    pub month: String,
    pub status: DayStatus,
}

/// The 60 consecutive dates starting at `today`, each classified from the
/// document's plan for that date.
pub fn rolling_window(doc: &PlannerDoc, today: NaiveDate) -> Vec<Tile> {
    (0..WINDOW_DAYS as u64)
        .filter_map(|offset| today.checked_add_days(Days::new(offset)))
        .map(|date| Tile {
            date,
            weekday: date.format("%a").to_string(),
            day: date.day(),
            month: date.format("%b").to_string(),
            status: DayStatus::of(doc.day(date)),
        })
        .collect()
}
