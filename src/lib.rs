//! tcache - Daily developer task log
//!
//! Captures an end-of-day summary as a dated markdown document and keeps the
//! log directory in sync with a private GitHub repository.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::TcacheError;
