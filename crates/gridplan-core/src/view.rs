use chrono::NaiveDate;

/// Which date the day inspector is showing.
///
/// The state is the date itself: once initialized there is no "nothing
/// selected" state, and no history of previous selections is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannerViewState {
    selected: NaiveDate,
}

impl PlannerViewState {
    pub fn new(today: NaiveDate) -> Self {
        Self { selected: today }
    }

    pub fn selected(&self) -> NaiveDate {
        self.selected
    }

    /// Replaces the selection. Selecting a date with no plan is valid and
    /// shows an empty day. Never persisted; selection is session state.
    pub fn select(&mut self, date: NaiveDate) {
        self.selected = date;
    }
}
