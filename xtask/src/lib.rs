//! xtask library for shared functionality
//!
//! Exposes the modules behind the `xtask` binary so integration tests can use
//! them directly.

pub mod config;
pub mod feature_matrix;
