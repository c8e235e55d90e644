//! Stage domain model.
//!
//! # Responsibility
//! - Own the ordered question list of one named stage.
//! - Provide index-based add/update/delete and permutation reorder.
//!
//! # Invariants
//! - `name` never changes after construction.
//! - Failed operations leave `questions` untouched.
//! - `reorder` is the only operation that moves existing records.

use crate::model::question::{priority_for_position, QuestionFields, QuestionRecord};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Status assigned to newly created stages.
pub const DEFAULT_STAGE_STATUS: &str = "building";

/// Why a reorder sequence is not a permutation of `[0, len)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermutationDefect {
    LengthMismatch { expected: usize, actual: usize },
    OutOfRange(usize),
    Duplicate(usize),
}

impl Display for PermutationDefect {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LengthMismatch { expected, actual } => {
                write!(f, "expected {expected} indices, got {actual}")
            }
            Self::OutOfRange(index) => write!(f, "index {index} is out of range"),
            Self::Duplicate(index) => write!(f, "index {index} appears more than once"),
        }
    }
}

/// Errors from stage-level question operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageError {
    IndexOutOfRange { index: usize, len: usize },
    InvalidPermutation(PermutationDefect),
}

impl Display for StageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "question index {index} out of range for {len} questions")
            }
            Self::InvalidPermutation(defect) => write!(f, "invalid question order: {defect}"),
        }
    }
}

impl Error for StageError {}

/// Named, ordered group of question records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    name: String,
    questions: Vec<QuestionRecord>,
    status: String,
}

impl Stage {
    /// Creates an empty stage with status `building`.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_parts(name, Vec::new(), DEFAULT_STAGE_STATUS)
    }

    pub(crate) fn with_parts(
        name: impl Into<String>,
        questions: Vec<QuestionRecord>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            questions,
            status: status.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Replaces the informational status tag. No transitions are enforced.
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn questions(&self) -> &[QuestionRecord] {
        &self.questions
    }

    pub fn question(&self, index: usize) -> Option<&QuestionRecord> {
        self.questions.get(index)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Conventional priority for the next appended question: `len + 1`,
    /// capped at the maximum priority.
    pub fn next_priority(&self) -> u8 {
        priority_for_position(self.questions.len())
    }

    /// Appends a record and returns its index.
    pub fn add_question(&mut self, record: QuestionRecord) -> usize {
        self.questions.push(record);
        self.questions.len() - 1
    }

    /// Merges provided fields into the record at `index`.
    pub fn update_question(
        &mut self,
        index: usize,
        fields: QuestionFields,
    ) -> Result<&QuestionRecord, StageError> {
        let len = self.questions.len();
        let record = self
            .questions
            .get_mut(index)
            .ok_or(StageError::IndexOutOfRange { index, len })?;
        record.merge(fields);
        Ok(record)
    }

    /// Removes the record at `index`; later records shift left in order.
    pub fn delete_question(&mut self, index: usize) -> Result<QuestionRecord, StageError> {
        if index >= self.questions.len() {
            return Err(StageError::IndexOutOfRange {
                index,
                len: self.questions.len(),
            });
        }
        Ok(self.questions.remove(index))
    }

    /// Rebuilds the list as `[questions[new_order[0]], questions[new_order[1]], ...]`.
    ///
    /// `new_order` must be a permutation of `[0, len)`; otherwise nothing
    /// changes.
    pub fn reorder(&mut self, new_order: &[usize]) -> Result<(), StageError> {
        check_permutation(new_order, self.questions.len())
            .map_err(StageError::InvalidPermutation)?;

        let mut slots: Vec<Option<QuestionRecord>> = std::mem::take(&mut self.questions)
            .into_iter()
            .map(Some)
            .collect();
        self.questions = new_order
            .iter()
            .filter_map(|&index| slots[index].take())
            .collect();
        Ok(())
    }

    /// Moves one record from `from` to `to`, shifting the records between.
    ///
    /// Implemented as a `reorder` with the equivalent permutation.
    pub fn move_question(&mut self, from: usize, to: usize) -> Result<(), StageError> {
        let len = self.questions.len();
        for index in [from, to] {
            if index >= len {
                return Err(StageError::IndexOutOfRange { index, len });
            }
        }

        let mut order: Vec<usize> = (0..len).collect();
        let moved = order.remove(from);
        order.insert(to, moved);
        self.reorder(&order)
    }
}

fn check_permutation(order: &[usize], len: usize) -> Result<(), PermutationDefect> {
    if order.len() != len {
        return Err(PermutationDefect::LengthMismatch {
            expected: len,
            actual: order.len(),
        });
    }

    let mut seen = vec![false; len];
    for &index in order {
        if index >= len {
            return Err(PermutationDefect::OutOfRange(index));
        }
        if seen[index] {
            return Err(PermutationDefect::Duplicate(index));
        }
        seen[index] = true;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{check_permutation, PermutationDefect};

    #[test]
    fn check_permutation_reports_first_defect() {
        assert_eq!(check_permutation(&[2, 0, 1], 3), Ok(()));
        assert_eq!(check_permutation(&[], 0), Ok(()));
        assert_eq!(
            check_permutation(&[0, 1], 3),
            Err(PermutationDefect::LengthMismatch {
                expected: 3,
                actual: 2
            })
        );
        assert_eq!(
            check_permutation(&[0, 3, 1], 3),
            Err(PermutationDefect::OutOfRange(3))
        );
        assert_eq!(
            check_permutation(&[1, 1, 0], 3),
            Err(PermutationDefect::Duplicate(1))
        );
    }
}
