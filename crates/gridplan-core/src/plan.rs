use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// At most this many projects may carry the `Active` status at once.
pub const MAX_ACTIVE_PROJECTS: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub name: String,
    pub done: bool,
}

impl Task {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            done: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProjectStatus {
    Active,
    Parked,
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectStatus::Active => write!(f, "Active"),
            ProjectStatus::Parked => write!(f, "Parked"),
        }
    }
}

impl FromStr for ProjectStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(ProjectStatus::Active),
            "parked" => Ok(ProjectStatus::Parked),
            other => Err(Error::InvalidInput(format!(
                "unknown project status: {other} (expected active or parked)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    pub status: ProjectStatus,
}

/// The whole persisted planner document. Both fields default when missing so
/// documents written before either field existed still load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlannerDoc {
    #[serde(default)]
    pub daily_plans: BTreeMap<NaiveDate, Vec<Task>>,

    #[serde(default)]
    pub projects: Vec<Project>,
}

impl PlannerDoc {
    /// Tasks planned for a date. An absent key reads as an empty day, never
    /// as an error.
    pub fn day(&self, date: NaiveDate) -> &[Task] {
        self.daily_plans
            .get(&date)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn active_project_count(&self) -> usize {
        self.projects
            .iter()
            .filter(|p| p.status == ProjectStatus::Active)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_day_reads_as_empty() {
        let doc = PlannerDoc::default();
        let date = "2024-03-01".parse().expect("date");
        assert!(doc.day(date).is_empty());
    }

    #[test]
    fn document_with_missing_fields_still_loads() {
        let doc: PlannerDoc = serde_json::from_str("{}").expect("parse");
        assert!(doc.daily_plans.is_empty());
        assert!(doc.projects.is_empty());

        let doc: PlannerDoc =
            serde_json::from_str(r#"{"daily_plans": {"2024-03-01": [{"name": "x", "done": true}]}}"#)
                .expect("parse");
        let date = "2024-03-01".parse().expect("date");
        assert_eq!(doc.day(date).len(), 1);
        assert!(doc.projects.is_empty());
    }

    #[test]
    fn project_status_round_trips_as_plain_strings() {
        let project = Project {
            name: "Skit pilot".to_string(),
            format: None,
            status: ProjectStatus::Parked,
        };
        let raw = serde_json::to_string(&project).expect("serialize");
        assert_eq!(raw, r#"{"name":"Skit pilot","status":"Parked"}"#);
    }

    #[test]
    fn project_status_parses_case_insensitively() {
        assert_eq!(
            "ACTIVE".parse::<ProjectStatus>().expect("parse"),
            ProjectStatus::Active
        );
        assert!("retired".parse::<ProjectStatus>().is_err());
    }
}
