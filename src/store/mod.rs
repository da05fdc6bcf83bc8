//! The document store
//!
//! - `actions`: the `Action` type and constructors that capture "before" data
//! - `reducer`: `Engine`, `apply` and the initial state
//! - `versions`: upgrading persisted songs to the current schema

pub mod actions;
pub mod reducer;
pub mod versions;

pub use actions::{Action, Control};
pub use reducer::{apply, get_initial_state, Engine};
pub use versions::{migrate, migrate_str};
