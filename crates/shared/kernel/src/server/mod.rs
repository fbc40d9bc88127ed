mod error;
mod health;
pub mod router;
mod state;

pub use error::{ApiError, ApiErrorExt, ApiResult};
pub use state::{ApiState, ApiStateBuilder, ApiStateError, ApiStateInner};
