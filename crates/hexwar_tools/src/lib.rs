//! # Hexwar Development Tools
//!
//! Command-line tools for development:
//! - Environment file validation
//! - Location and hit-table dumps

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod error;
pub mod tables;
pub mod validate;

pub use error::{Result, ToolError};
