//! # Courier Core
//!
//! Core types and error definitions shared across the Courier crates.

pub mod error;
pub mod result;

pub use error::*;
pub use result::*;
