//! Edit session over one question bank.
//!
//! # Responsibility
//! - Track the currently selected stage.
//! - Route question mutations to that stage after strict input validation.
//!
//! # Invariants
//! - Question mutations without a selected stage fail with `NoStageSelected`.
//! - Rejected input never reaches the stage; persisted data only sees
//!   validated edits.
//! - The session never saves on its own.

use crate::bank::{BankError, QuestionBank};
use crate::model::question::{QuestionFields, QuestionRecord, QuestionValidationError};
use crate::model::stage::{Stage, StageError};
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type SessionResult<T> = Result<T, SessionError>;

/// Errors surfaced by edit session operations.
#[derive(Debug)]
pub enum SessionError {
    /// A question operation ran before any stage was selected.
    NoStageSelected,
    /// Stage management or persistence failure.
    Bank(BankError),
    /// Index or permutation failure inside the selected stage.
    Stage(StageError),
    /// Question input rejected by strict validation.
    Validation(QuestionValidationError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoStageSelected => write!(f, "no stage selected"),
            Self::Bank(err) => write!(f, "{err}"),
            Self::Stage(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NoStageSelected => None,
            Self::Bank(err) => Some(err),
            Self::Stage(err) => Some(err),
            Self::Validation(err) => Some(err),
        }
    }
}

impl From<BankError> for SessionError {
    fn from(value: BankError) -> Self {
        Self::Bank(value)
    }
}

impl From<StageError> for SessionError {
    fn from(value: StageError) -> Self {
        Self::Stage(value)
    }
}

impl From<QuestionValidationError> for SessionError {
    fn from(value: QuestionValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Caller-owned editing context: one bank plus an optional stage selection.
pub struct EditSession<'bank> {
    bank: &'bank mut QuestionBank,
    selected: Option<String>,
}

impl<'bank> EditSession<'bank> {
    /// Starts a session with no stage selected.
    pub fn new(bank: &'bank mut QuestionBank) -> Self {
        Self {
            bank,
            selected: None,
        }
    }

    pub fn bank(&self) -> &QuestionBank {
        &*self.bank
    }

    pub fn selected_stage_name(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Returns the selected stage.
    pub fn current_stage(&self) -> SessionResult<&Stage> {
        self.selected
            .as_deref()
            .and_then(|name| self.bank.get_stage(name))
            .ok_or(SessionError::NoStageSelected)
    }

    /// Selects an existing stage.
    pub fn select_stage(&mut self, name: &str) -> SessionResult<()> {
        if !self.bank.contains_stage(name) {
            return Err(BankError::StageNotFound(name.to_string()).into());
        }
        self.selected = Some(name.to_string());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Creates a stage and selects it. Fails with `StageExists` for a taken
    /// name, leaving the selection unchanged.
    pub fn create_and_select_stage(&mut self, name: &str) -> SessionResult<()> {
        let created = self.bank.create_stage(name)?.name().to_string();
        self.selected = Some(created);
        Ok(())
    }

    /// Deletes a stage, clearing the selection when it was selected.
    pub fn delete_stage(&mut self, name: &str) -> SessionResult<Stage> {
        let removed = self.bank.delete_stage(name)?;
        if self.selected.as_deref() == Some(removed.name()) {
            self.selected = None;
        }
        Ok(removed)
    }

    /// Replaces the selected stage's status tag.
    pub fn set_stage_status(&mut self, status: impl Into<String>) -> SessionResult<()> {
        self.stage_mut()?.set_status(status);
        Ok(())
    }

    /// Appends a question to the selected stage and returns its index.
    ///
    /// `text` is required. A missing priority defaults to the stage's next
    /// conventional priority.
    pub fn add_question(&mut self, fields: QuestionFields) -> SessionResult<usize> {
        let stage = self.stage_mut()?;
        if fields.text.is_none() {
            return Err(QuestionValidationError::EmptyText.into());
        }
        fields.validate()?;

        let record = QuestionRecord::from_fields(fields, stage.next_priority());
        record.validate()?;
        let index = stage.add_question(record);
        debug!(
            "event=question_add module=session status=ok index={} len={}",
            index,
            stage.len()
        );
        Ok(index)
    }

    /// Merges provided fields into the question at `index`.
    pub fn update_question(
        &mut self,
        index: usize,
        fields: QuestionFields,
    ) -> SessionResult<&QuestionRecord> {
        let stage = self.stage_mut()?;
        fields.validate()?;
        let record = stage.update_question(index, fields)?;
        debug!("event=question_update module=session status=ok index={index}");
        Ok(record)
    }

    /// Removes and returns the question at `index`.
    pub fn delete_question(&mut self, index: usize) -> SessionResult<QuestionRecord> {
        let stage = self.stage_mut()?;
        let removed = stage.delete_question(index)?;
        debug!(
            "event=question_delete module=session status=ok index={} len={}",
            index,
            stage.len()
        );
        Ok(removed)
    }

    /// Applies a full permutation of the selected stage's questions.
    pub fn reorder_questions(&mut self, new_order: &[usize]) -> SessionResult<()> {
        self.stage_mut()?.reorder(new_order)?;
        debug!(
            "event=question_reorder module=session status=ok len={}",
            new_order.len()
        );
        Ok(())
    }

    /// Moves one question to a new position.
    pub fn move_question(&mut self, from: usize, to: usize) -> SessionResult<()> {
        self.stage_mut()?.move_question(from, to)?;
        debug!("event=question_move module=session status=ok from={from} to={to}");
        Ok(())
    }

    /// Saves the whole bank to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> SessionResult<()> {
        self.bank.save(path).map_err(Into::into)
    }

    /// Serializes the whole bank into a buffer.
    pub fn export(&self) -> SessionResult<Vec<u8>> {
        self.bank.export().map_err(Into::into)
    }

    fn stage_mut(&mut self) -> SessionResult<&mut Stage> {
        let name = self
            .selected
            .as_deref()
            .ok_or(SessionError::NoStageSelected)?;
        self.bank
            .get_stage_mut(name)
            .ok_or(SessionError::NoStageSelected)
    }
}
