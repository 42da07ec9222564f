//! # dexmig testkit
//!
//! Test utilities for dexmig.
//!
//! This crate provides:
//! - A legacy-schema fixture covering every section
//! - Property-based generators using proptest
//! - A transfer harness that exports and imports through real files
//! - A progress sink that records every update
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dexmig_testkit::prelude::*;
//!
//! #[test]
//! fn full_transfer() {
//!     let mut harness = TransferHarness::default();
//!     let report = harness.transfer(Compression::Gzip).unwrap();
//!     assert!(report.total_added() > 0);
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod integration;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::integration::*;
    pub use dexmig_storage::Compression;
}

pub use fixtures::*;
pub use generators::*;
pub use integration::*;
