//! C ABI shared between the host and plugin libraries.

pub mod abi;
pub mod safety;
