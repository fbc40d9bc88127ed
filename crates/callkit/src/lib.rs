//! Facade crate for `Callkit` features and shared modules.
//! Re-exports domain/kernel primitives and aggregates feature initialization.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Add `callkit` with the `server` feature.
//! - Call `callkit::init` to build the feature slices, then register them in the
//!   `ApiState` and merge `callkit::server::router::api_router()`.

pub use callkit_domain as domain;
#[cfg(feature = "server")]
use callkit_domain::config::ApiConfig;
pub use callkit_kernel as kernel;

#[cfg(feature = "server")]
pub mod server {
    pub mod router {
        use callkit_kernel::server::ApiState;
        pub use callkit_kernel::server::router::system_router;
        use utoipa_axum::router::OpenApiRouter;

        /// Every feature route of the control API (system routes excluded).
        pub fn api_router() -> OpenApiRouter<ApiState> {
            OpenApiRouter::new()
                .merge(callkit_credentials::api::credentials_router())
                .merge(callkit_telephony::api::telephony_router())
                .merge(callkit_readiness::api::readiness_router())
        }
    }
}

/// Feature slices, one crate each.
pub mod features {
    pub use callkit_credentials as credentials;
    pub use callkit_readiness as readiness;
    pub use callkit_telephony as telephony;
}

/// Initialize all enabled features for server mode.
///
/// # Errors
/// Returns an error if any feature initialization fails.
#[cfg(feature = "server")]
pub fn init(
    config: &ApiConfig,
) -> Result<Vec<domain::registry::InitializedSlice>, Box<dyn std::error::Error>> {
    let slices = vec![
        // Credentials
        features::credentials::init(config)?,
        // Telephony (numbers + outbound calls)
        features::telephony::init(config)?,
        // Readiness (checklist engine + polling)
        features::readiness::init(config)?,
    ];

    Ok(slices)
}
