//! Dispatch Shell Library
//!
//! Interactive console front end for the emergency dispatch record store.

pub mod config;
mod menu;
mod shell;

pub use crate::config::{ConfigError, MAX_GRID_SIZE, ShellConfig};
pub use crate::menu::MenuChoice;
pub use crate::shell::Shell;
