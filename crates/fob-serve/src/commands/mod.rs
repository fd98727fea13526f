//! Command implementations.
//!
//! - [`serve`] - build, serve from memory, live reload
//! - [`check`] - configuration validation
//!
//! Each command exposes an `execute` function taking its parsed arguments.

pub mod check;
pub mod serve;

pub use check::execute as check_execute;
pub use serve::execute as serve_execute;
