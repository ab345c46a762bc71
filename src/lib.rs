//! Utilities that clean up exported topic data in an S3 bucket.
//!
//! Each binary is a run-to-completion job configured from the environment:
//! `clean-prefix` removes one prefix, `clean-retention` removes topics older
//! than a retention schedule and `list-prefixes` prints the groupings under
//! a directory.

pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod retention;
pub mod s3;

pub use error::{CleanupError, Result};
