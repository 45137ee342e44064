//! Terminal rendering of the collection state.

pub mod prompt;
pub mod views;
