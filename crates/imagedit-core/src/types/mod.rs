//! Shared domain types.

pub mod image;
