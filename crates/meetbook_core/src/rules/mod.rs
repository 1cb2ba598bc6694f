//! Pure meeting rules applied before any mutation.
//!
//! # Responsibility
//! - Field validation (`validator`).
//! - Time-slot collision checks (`conflict`).
//!
//! # Invariants
//! - Nothing in this module performs I/O or mutates its inputs.

pub mod conflict;
pub mod validator;
