//! Helpers for declaring searchable models

#[macro_use]
pub mod macros;
