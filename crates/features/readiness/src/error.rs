use callkit_credentials::CredentialsError;
use callkit_telephony::{TelephonyError, TunnelError};
use std::borrow::Cow;

#[callkit_derive::callkit_error]
pub enum ReadinessError {
    #[error("Credentials unavailable{}: {source}", format_context(.context))]
    Credentials { source: CredentialsError, context: Option<Cow<'static, str>> },

    #[error("{source}")]
    Telephony { source: TelephonyError, context: Option<Cow<'static, str>> },

    #[error("Tunnel status unavailable{}: {source}", format_context(.context))]
    Tunnel { source: TunnelError, context: Option<Cow<'static, str>> },

    #[error("HTTP client error{}: {source}", format_context(.context))]
    Http { source: reqwest::Error, context: Option<Cow<'static, str>> },

    #[error("{message}")]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The requested action needs a step that is not done yet.
    #[error("{message}")]
    Precondition { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Readiness internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[cfg(feature = "server")]
impl From<ReadinessError> for callkit_kernel::server::ApiError {
    fn from(err: ReadinessError) -> Self {
        match err {
            ReadinessError::Credentials { source, .. } => source.into(),
            ReadinessError::Telephony { source, .. } => source.into(),
            ReadinessError::Tunnel { source, .. } => Self::upstream(source.to_string()),
            ReadinessError::NotFound { message, .. } => Self::not_found(message),
            ReadinessError::Precondition { message, .. } => Self::configuration(message),
            other @ (ReadinessError::Http { .. } | ReadinessError::Internal { .. }) => {
                Self::Internal { message: other.to_string().into(), context: None }
            },
        }
    }
}
