//! # Callkit Shell
//!
//! Terminal front end of the setup wizard. Every command is a thin call to the control
//! API served by `callkit-server`; the checklist itself is computed server side.

pub mod cli;
pub mod client;
mod commands;
mod error;
pub mod render;

pub use client::{AccountOverride, ControlClient};
pub use commands::run;
pub use error::{ShellError, ShellErrorExt};
