//! # imagedit-core
//!
//! Core crate for imagedit. Contains the in-memory image buffer,
//! configuration schemas, and the unified error system.
//!
//! This crate has **no** internal dependencies on other imagedit crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
pub use types::image::{ImageBuffer, ImageSource};
