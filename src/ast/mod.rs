//! Abstract syntax tree for dialog scripts.

pub mod types;

pub use types::*;
