//! CLI command implementations.

pub mod catalog;
pub mod export;
pub mod import;
pub mod inspect;
