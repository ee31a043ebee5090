use chrono::NaiveDate;
use tracing::{info, instrument};

use crate::error::Error;
use crate::plan::{MAX_ACTIVE_PROJECTS, PlannerDoc, Project, ProjectStatus, Task};
use crate::store::DataStore;
use crate::view::PlannerViewState;

/// One planning session: the open store, the loaded document, and the
/// inspector selection.
///
/// Every mutating operation re-checks indices against the current sequence,
/// applies the change, and writes the whole document back before returning.
/// If the write fails, the error reaches the caller; nothing is dropped
/// silently. Selection is the one exception: it is session state only and
/// never touches storage.
///
/// There is no locking. Two processes pointed at the same document race as
/// last-writer-wins; this is an inherited limitation of the whole-document
/// write policy, not a supported mode.
#[derive(Debug)]
pub struct Planner {
    store: DataStore,
    doc: PlannerDoc,
    view: PlannerViewState,
}

impl Planner {
    pub fn new(store: DataStore, today: NaiveDate) -> Self {
        let doc = store.load();
        Self {
            store,
            doc,
            view: PlannerViewState::new(today),
        }
    }

    pub fn doc(&self) -> &PlannerDoc {
        &self.doc
    }

    pub fn view(&self) -> &PlannerViewState {
        &self.view
    }

    pub fn select(&mut self, date: NaiveDate) {
        self.view.select(date);
    }

    #[instrument(skip(self))]
    pub fn add_task(&mut self, date: NaiveDate, name: &str) -> Result<(), Error> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput(
                "task name cannot be empty".to_string(),
            ));
        }

        self.doc
            .daily_plans
            .entry(date)
            .or_default()
            .push(Task::new(name));
        self.store.save(&self.doc)
    }

    #[instrument(skip(self))]
    pub fn toggle_task(&mut self, date: NaiveDate, index: usize, value: bool) -> Result<(), Error> {
        // the length is re-read here, never taken from the caller; a stale
        // index after a delete fails instead of hitting an unrelated task
        let tasks = self.doc.daily_plans.get_mut(&date);
        let len = tasks.as_ref().map_or(0, |t| t.len());
        let Some(task) = tasks.and_then(|t| t.get_mut(index)) else {
            return Err(Error::OutOfRange { date, index, len });
        };

        task.done = value;
        self.store.save(&self.doc)
    }

    #[instrument(skip(self))]
    pub fn delete_task(&mut self, date: NaiveDate, index: usize) -> Result<(), Error> {
        let Some(tasks) = self.doc.daily_plans.get_mut(&date) else {
            return Err(Error::OutOfRange {
                date,
                index,
                len: 0,
            });
        };
        if index >= tasks.len() {
            return Err(Error::OutOfRange {
                date,
                index,
                len: tasks.len(),
            });
        }

        tasks.remove(index);
        if tasks.is_empty() {
            // absent and empty are the same state; drop the key
            self.doc.daily_plans.remove(&date);
        }
        self.store.save(&self.doc)
    }

    /// Appends the named task to every day in the inclusive range, skipping
    /// days that already carry a task with that name. One write covers the
    /// whole range.
    #[instrument(skip(self))]
    pub fn apply_template(
        &mut self,
        name: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<u64, Error> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput(
                "template task name cannot be empty".to_string(),
            ));
        }
        if start > end {
            return Err(Error::InvalidInput(format!(
                "template range is inverted: {start} is after {end}"
            )));
        }

        let mut added = 0_u64;
        let mut day = start;
        loop {
            let tasks = self.doc.daily_plans.entry(day).or_default();
            if !tasks.iter().any(|t| t.name == name) {
                tasks.push(Task::new(name));
                added += 1;
            }

            if day == end {
                break;
            }
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }

        info!(added, "template applied");
        self.store.save(&self.doc)?;
        Ok(added)
    }

    #[instrument(skip(self))]
    pub fn add_project(&mut self, name: &str, format: Option<&str>) -> Result<(), Error> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput(
                "project name cannot be empty".to_string(),
            ));
        }
        let format = format
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(String::from);

        self.doc.projects.push(Project {
            name: name.to_string(),
            format,
            status: ProjectStatus::Parked,
        });
        self.store.save(&self.doc)
    }

    #[instrument(skip(self))]
    pub fn rename_project(&mut self, index: usize, name: &str) -> Result<(), Error> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput(
                "project name cannot be empty".to_string(),
            ));
        }

        self.project_mut(index)?.name = name.to_string();
        self.store.save(&self.doc)
    }

    #[instrument(skip(self))]
    pub fn set_project_format(&mut self, index: usize, format: &str) -> Result<(), Error> {
        let format = format.trim();
        self.project_mut(index)?.format = if format.is_empty() {
            None
        } else {
            Some(format.to_string())
        };
        self.store.save(&self.doc)
    }

    /// Raising a project to Active is refused once three projects are
    /// already Active.
    #[instrument(skip(self))]
    pub fn set_project_status(&mut self, index: usize, status: ProjectStatus) -> Result<(), Error> {
        if index >= self.doc.projects.len() {
            return Err(Error::ProjectOutOfRange {
                index,
                len: self.doc.projects.len(),
            });
        }

        if status == ProjectStatus::Active
            && self.doc.projects[index].status != ProjectStatus::Active
            && self.doc.active_project_count() >= MAX_ACTIVE_PROJECTS
        {
            return Err(Error::InvalidInput(format!(
                "at most {MAX_ACTIVE_PROJECTS} projects can be active at once"
            )));
        }

        self.doc.projects[index].status = status;
        self.store.save(&self.doc)
    }

    #[instrument(skip(self))]
    pub fn delete_project(&mut self, index: usize) -> Result<(), Error> {
        if index >= self.doc.projects.len() {
            return Err(Error::ProjectOutOfRange {
                index,
                len: self.doc.projects.len(),
            });
        }

        self.doc.projects.remove(index);
        self.store.save(&self.doc)
    }

    fn project_mut(&mut self, index: usize) -> Result<&mut Project, Error> {
        let len = self.doc.projects.len();
        self.doc
            .projects
            .get_mut(index)
            .ok_or(Error::ProjectOutOfRange { index, len })
    }
}
