//! Application layer: the collection view-model and the port it drives.

pub mod api;
pub mod collection;
pub mod error;
mod lock;
