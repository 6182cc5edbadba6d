//! Core domain types: actions, records, and errors.

pub mod action;
pub mod errors;
pub mod model;
