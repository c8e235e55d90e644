//! Question bank: the stage-name to stage mapping and its persistence.
//!
//! # Responsibility
//! - Own every stage and provide create/get/delete by name.
//! - Load from and save to the persisted JSON document.
//!
//! # Invariants
//! - Stage names are unique within one bank.
//! - Stage insertion order is kept in memory and in the persisted document.
//! - `load` never fails: unreadable or malformed sources yield an empty bank
//!   so the editor stays usable. `try_load` surfaces the same failures.
//! - Write paths (`save`, `export`) always surface failures.
//! - `save` replaces the destination whole or leaves it untouched.

mod codec;
mod file;

use crate::model::question::{QuestionValidationError, MAX_PRIORITY, MIN_PRIORITY};
use crate::model::stage::Stage;
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Instant;

pub type BankResult<T> = Result<T, BankError>;

/// Errors from bank-level operations and persistence.
#[derive(Debug)]
pub enum BankError {
    /// A stage with this name already exists.
    StageExists(String),
    /// No stage has this name.
    StageNotFound(String),
    /// Stage name is blank after trimming.
    InvalidStageName,
    /// Persisted source is not a valid question bank document.
    Parse(serde_json::Error),
    /// Reading or writing `path` failed.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Serializing the bank failed.
    Serialize(serde_json::Error),
    /// A record cannot be persisted as-is.
    InvalidQuestion {
        stage: String,
        index: usize,
        source: QuestionValidationError,
    },
}

impl Display for BankError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StageExists(name) => write!(f, "stage already exists: `{name}`"),
            Self::StageNotFound(name) => write!(f, "stage not found: `{name}`"),
            Self::InvalidStageName => write!(f, "stage name must not be blank"),
            Self::Parse(err) => write!(f, "malformed question bank: {err}"),
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Serialize(err) => write!(f, "failed to serialize question bank: {err}"),
            Self::InvalidQuestion {
                stage,
                index,
                source,
            } => write!(f, "stage `{stage}` question {index}: {source}"),
        }
    }
}

impl Error for BankError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) | Self::Serialize(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::InvalidQuestion { source, .. } => Some(source),
            Self::StageExists(_) | Self::StageNotFound(_) | Self::InvalidStageName => None,
        }
    }
}

/// How `load_with_policy` treats read failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPolicy {
    /// Swallow failures into an empty bank.
    #[default]
    Lenient,
    /// Surface failures to the caller.
    Strict,
}

/// Every stage of the persona-building question set, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionBank {
    stages: Vec<Stage>,
}

impl QuestionBank {
    /// Creates an empty bank.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a bank from `path`, returning an empty bank on any failure.
    ///
    /// A missing file, I/O failure or malformed document is logged and
    /// absorbed. Callers should treat an empty bank as "no data yet".
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(bank) => bank,
            Err(err) => {
                warn!(
                    "event=bank_load module=bank status=fallback path={} error={}",
                    path.display(),
                    err
                );
                Self::new()
            }
        }
    }

    /// Loads a bank from `path`, surfacing read and parse failures.
    pub fn try_load(path: impl AsRef<Path>) -> BankResult<Self> {
        let path = path.as_ref();
        let started_at = Instant::now();
        info!(
            "event=bank_load module=bank status=start path={}",
            path.display()
        );

        match file::read_bank(path) {
            Ok(bank) => {
                info!(
                    "event=bank_load module=bank status=ok stages={} duration_ms={}",
                    bank.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(bank)
            }
            Err(err) => {
                error!(
                    "event=bank_load module=bank status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Loads with the given failure policy.
    pub fn load_with_policy(path: impl AsRef<Path>, policy: LoadPolicy) -> BankResult<Self> {
        match policy {
            LoadPolicy::Lenient => Ok(Self::load(path)),
            LoadPolicy::Strict => Self::try_load(path),
        }
    }

    /// Parses an in-memory JSON document.
    pub fn from_json_slice(bytes: &[u8]) -> BankResult<Self> {
        serde_json::from_slice(bytes).map_err(BankError::Parse)
    }

    /// Writes the whole bank to `path`, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> BankResult<()> {
        let path = path.as_ref();
        let started_at = Instant::now();
        let bytes = self.export()?;

        match file::write_atomically(path, &bytes) {
            Ok(()) => {
                info!(
                    "event=bank_save module=bank status=ok path={} stages={} bytes={} duration_ms={}",
                    path.display(),
                    self.len(),
                    bytes.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=bank_save module=bank status=error path={} duration_ms={} error={}",
                    path.display(),
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Returns the serialized document `save` would write.
    pub fn export(&self) -> BankResult<Vec<u8>> {
        self.ensure_persistable()?;
        let bytes = codec::to_pretty_json(self)?;
        debug!(
            "event=bank_export module=bank status=ok stages={} bytes={}",
            self.len(),
            bytes.len()
        );
        Ok(bytes)
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Stages in insertion order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Stage names in insertion order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(Stage::name).collect()
    }

    pub fn contains_stage(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn get_stage(&self, name: &str) -> Option<&Stage> {
        self.stages.iter().find(|stage| stage.name() == name)
    }

    pub fn get_stage_mut(&mut self, name: &str) -> Option<&mut Stage> {
        self.stages.iter_mut().find(|stage| stage.name() == name)
    }

    /// Creates an empty `building` stage.
    ///
    /// The name is stored and compared exactly as given, matching keys read
    /// from a document. Blank names are rejected.
    pub fn create_stage(&mut self, name: &str) -> BankResult<&mut Stage> {
        check_stage_name(name)?;
        if self.contains_stage(name) {
            return Err(BankError::StageExists(name.to_string()));
        }

        debug!("event=stage_create module=bank status=ok stages={}", self.len() + 1);
        self.stages.push(Stage::new(name));
        let last = self.stages.len() - 1;
        Ok(&mut self.stages[last])
    }

    /// Removes a stage and returns it.
    ///
    /// Delete then create is the only way to rename a stage.
    pub fn delete_stage(&mut self, name: &str) -> BankResult<Stage> {
        let index = self
            .position(name)
            .ok_or_else(|| BankError::StageNotFound(name.to_string()))?;
        debug!("event=stage_delete module=bank status=ok stages={}", self.len() - 1);
        Ok(self.stages.remove(index))
    }

    /// Replaces a stage's status tag.
    pub fn set_stage_status(&mut self, name: &str, status: impl Into<String>) -> BankResult<()> {
        let stage = self
            .get_stage_mut(name)
            .ok_or_else(|| BankError::StageNotFound(name.to_string()))?;
        stage.set_status(status);
        Ok(())
    }

    /// Inserts a decoded stage; a repeated name replaces the earlier stage in
    /// its original position.
    pub(crate) fn insert_decoded(&mut self, stage: Stage) {
        match self.position(stage.name()) {
            Some(index) => self.stages[index] = stage,
            None => self.stages.push(stage),
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.stages.iter().position(|stage| stage.name() == name)
    }

    fn ensure_persistable(&self) -> BankResult<()> {
        for stage in &self.stages {
            for (index, record) in stage.questions().iter().enumerate() {
                if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&record.priority) {
                    return Err(BankError::InvalidQuestion {
                        stage: stage.name().to_string(),
                        index,
                        source: QuestionValidationError::InvalidPriority(i64::from(
                            record.priority,
                        )),
                    });
                }
            }
        }
        Ok(())
    }
}

fn check_stage_name(name: &str) -> BankResult<()> {
    if name.trim().is_empty() {
        return Err(BankError::InvalidStageName);
    }
    Ok(())
}
