//! Use-case services over the question bank.
//!
//! # Responsibility
//! - Orchestrate model and bank calls into editor-level operations.
//! - Keep presentation layers decoupled from model internals.

pub mod edit_session;
