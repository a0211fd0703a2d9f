//! CLI command implementations.

pub mod common;
pub mod estimate;
pub mod polynomial;
pub mod sweep;
pub mod targets;
pub mod unitary;
pub mod verify;
pub mod version;
