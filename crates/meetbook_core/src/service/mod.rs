//! Core use-case services.
//!
//! # Responsibility
//! - Own the meeting collection and its mutation rules (`meeting_store`).
//! - Stage interactive edits before they reach the store (`edit_session`).
//! - Derive the sorted display view (`presenter`).
//! - Keep display hosts decoupled from storage details.

pub mod edit_session;
pub mod meeting_store;
pub mod presenter;
