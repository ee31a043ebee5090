use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::Error;
use crate::plan::PlannerDoc;

pub const DOC_FILE: &str = "planner.json";

/// Whole-document storage: one JSON file, rewritten in full on every
/// mutation. There is no incremental or append format.
#[derive(Debug)]
pub struct DataStore {
    pub data_dir: PathBuf,
    pub doc_path: PathBuf,
}

impl DataStore {
    #[tracing::instrument(skip(data_dir))]
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        let data_dir = data_dir.to_path_buf();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create {}", data_dir.display()))?;

        let doc_path = data_dir.join(DOC_FILE);
        info!(
            data_dir = %data_dir.display(),
            doc = %doc_path.display(),
            "opened datastore"
        );

        Ok(Self { data_dir, doc_path })
    }

    /// Fail-open load: a missing, unreadable, or malformed document yields
    /// the empty document. No partial parse is attempted.
    #[tracing::instrument(skip(self))]
    pub fn load(&self) -> PlannerDoc {
        let raw = match fs::read_to_string(&self.doc_path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(file = %self.doc_path.display(), "no document yet; starting empty");
                return PlannerDoc::default();
            }
            Err(err) => {
                warn!(
                    file = %self.doc_path.display(),
                    error = %err,
                    "unreadable document; starting empty"
                );
                return PlannerDoc::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(doc) => doc,
            Err(err) => {
                warn!(
                    file = %self.doc_path.display(),
                    error = %err,
                    "malformed document; starting empty"
                );
                PlannerDoc::default()
            }
        }
    }

    /// Atomic whole-document rewrite. A failure here must reach the caller;
    /// the in-memory change is never dropped silently.
    #[tracing::instrument(skip(self, doc))]
    pub fn save(&self, doc: &PlannerDoc) -> Result<(), Error> {
        debug!(
            file = %self.doc_path.display(),
            days = doc.daily_plans.len(),
            projects = doc.projects.len(),
            "saving document"
        );
        self.write_atomic(doc)
            .map_err(|source| Error::StorageUnavailable {
                path: self.doc_path.clone(),
                source,
            })
    }

    fn write_atomic(&self, doc: &PlannerDoc) -> io::Result<()> {
        let dir = self.doc_path.parent().unwrap_or_else(|| Path::new("."));
        let mut temp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer(&mut temp, doc).map_err(io::Error::other)?;
        temp.flush()?;
        temp.persist(&self.doc_path).map_err(|err| err.error)?;
        Ok(())
    }
}
