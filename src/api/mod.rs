//! Score store WASM API
//!
//! # Module Structure
//!
//! - `helpers`: Shared utilities for serialization and error handling
//! - `frac`: `JsFrac` arithmetic and `splitNote`
//! - `core`: the global document store and its operations

pub mod core;
pub mod frac;
pub mod helpers;

pub use self::core::*;
pub use frac::{split_note, JsFrac};
