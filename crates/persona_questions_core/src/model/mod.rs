//! Question bank domain model.
//!
//! # Responsibility
//! - Define question records and the stages that order them.
//! - Keep validation rules next to the data they guard.
//!
//! # Invariants
//! - A stage exclusively owns its records; there are no back-references.
//! - Record order inside a stage is significant.

pub mod question;
pub mod stage;
pub mod text;
