//! # Domain Models
//!
//! Configuration, wire models and constants shared by the server, the feature slices
//! and the terminal wizard. Keep it lean: no I/O, networking, or heavy logic.

pub mod config;
pub mod constants;
pub mod models;
pub mod readiness;
pub mod registry;
