//! Completion classification for a single day.
//!
//! An empty day and a day with zero tasks completed are different states:
//! the former has no ratio at all, the latter has a ratio of exactly zero.
//! Conflating the two repaints an unplanned day as an at-risk one.

use crate::plan::Task;

/// Discrete completion bucket for a day, ordered from least to most done.
///
/// Buckets over the ratio are open below and closed above: exactly 0.25 is
/// `Low`, exactly 0.50 is `Mid`, exactly 0.75 is `High`. Only a day with
/// every task done is `Complete`; anything short of that, however close,
/// stays `High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Category {
    /// No tasks exist for the day.
    Empty,
    /// Tasks exist, none complete.
    NoneDone,
    Low,
    Mid,
    High,
    Complete,
}

/// `done / total`, or `None` for a day with no tasks. `None` is not zero:
/// it means there is nothing to measure.
pub fn completion_ratio(tasks: &[Task]) -> Option<f64> {
    if tasks.is_empty() {
        return None;
    }
    let done = tasks.iter().filter(|t| t.done).count();
    Some(done as f64 / tasks.len() as f64)
}

/// Pure and total over its input; callable any number of times.
pub fn classify(ratio: Option<f64>) -> Category {
    let Some(ratio) = ratio else {
        return Category::Empty;
    };
    if ratio <= 0.0 {
        Category::NoneDone
    } else if ratio >= 1.0 {
        Category::Complete
    } else if ratio <= 0.25 {
        Category::Low
    } else if ratio <= 0.50 {
        Category::Mid
    } else {
        Category::High
    }
}

/// Aggregated view of one day's plan, as consumed by the grid renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayStatus {
    pub total: usize,
    pub done: usize,
    pub category: Category,
}

impl DayStatus {
    pub fn of(tasks: &[Task]) -> Self {
        let done = tasks.iter().filter(|t| t.done).count();
        Self {
            total: tasks.len(),
            done,
            category: classify(completion_ratio(tasks)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(done: usize, total: usize) -> Vec<Task> {
        (0..total)
            .map(|i| Task {
                name: format!("task {i}"),
                done: i < done,
            })
            .collect()
    }

    #[test]
    fn empty_day_is_empty_never_none_done() {
        assert_eq!(completion_ratio(&[]), None);
        assert_eq!(classify(completion_ratio(&[])), Category::Empty);
    }

    #[test]
    fn tasks_exist_but_none_done() {
        for total in 1..=8 {
            assert_eq!(classify(completion_ratio(&plan(0, total))), Category::NoneDone);
        }
    }

    #[test]
    fn boundaries_are_closed_above() {
        assert_eq!(classify(Some(0.25)), Category::Low);
        assert_eq!(classify(Some(0.50)), Category::Mid);
        assert_eq!(classify(Some(0.75)), Category::High);
        assert_eq!(classify(Some(1.0)), Category::Complete);
    }

    #[test]
    fn boundaries_are_open_below() {
        assert_eq!(classify(Some(0.26)), Category::Mid);
        assert_eq!(classify(Some(0.51)), Category::High);
    }

    #[test]
    fn almost_done_is_still_high() {
        // only exact completion reaches the terminal bucket
        assert_eq!(classify(Some(0.76)), Category::High);
        assert_eq!(classify(Some(0.99)), Category::High);
        assert_eq!(classify(completion_ratio(&plan(9, 10))), Category::High);
    }

    #[test]
    fn two_of_four_done_is_mid() {
        let tasks = plan(2, 4);
        assert_eq!(completion_ratio(&tasks), Some(0.5));
        assert_eq!(classify(completion_ratio(&tasks)), Category::Mid);
    }

    #[test]
    fn classification_is_stable_across_calls() {
        let tasks = plan(1, 3);
        let first = classify(completion_ratio(&tasks));
        let second = classify(completion_ratio(&tasks));
        assert_eq!(first, second);
    }

    #[test]
    fn all_done_is_complete() {
        for total in 1..=8 {
            assert_eq!(classify(completion_ratio(&plan(total, total))), Category::Complete);
        }
    }

    #[test]
    fn categories_order_by_progress() {
        assert!(Category::Empty < Category::NoneDone);
        assert!(Category::NoneDone < Category::Low);
        assert!(Category::Low < Category::Mid);
        assert!(Category::Mid < Category::High);
        assert!(Category::High < Category::Complete);
    }

    #[test]
    fn day_status_carries_counts() {
        let status = DayStatus::of(&plan(2, 4));
        assert_eq!(status.total, 4);
        assert_eq!(status.done, 2);
        assert_eq!(status.category, Category::Mid);
    }
}
