//! Configuration loader and schema types.
//!
//! This module exposes the configuration schema used to drive runtime
//! behavior and helpers to load configuration from disk. Persisted UI state
//! (window, columns, device, playlist) lives in `crate::settings` instead.

mod load;
mod schema;

pub use load::{default_config_path, default_state_dir, resolve_config_path};
pub use schema::*;

#[cfg(test)]
mod tests;
