//! Kernel utilities shared across slices.
//! Keep this crate lightweight: configuration loading, the API state registry and the
//! HTTP error mapping every feature slice reports through.
//!
//! ## Config loading
//! ```rust,no_run
//! use callkit_kernel::config::load_config;
//! use callkit_kernel::domain::config::ApiConfig;
//!
//! let cfg: ApiConfig = load_config(Some("callkit")).unwrap_or_default();
//! assert_eq!(cfg.readiness.probe_attempts, 5);
//! ```
pub mod config;
pub mod prelude;
#[cfg(feature = "server")]
pub mod server;

pub use callkit_domain as domain;
