//! acclog CLI library.
//!
//! Exposes the argument definitions and command handlers for integration
//! testing. The `acclog` binary (main.rs) wires them together.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;
pub mod window;
