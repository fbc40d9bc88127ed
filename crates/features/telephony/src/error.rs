use std::borrow::Cow;

#[callkit_derive::callkit_error]
pub enum TelephonyError {
    #[error("Twilio client not initialized")]
    ClientNotInitialized { context: Option<Cow<'static, str>> },

    #[error("{message}")]
    MissingInput { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("{message}")]
    Configuration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("{message}")]
    UpstreamUnavailable { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The provider rejected the request; `message` is its own wording.
    #[error("{message}")]
    Provider { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Telephony request failed{}: {source}", format_context(.context))]
    Http { source: reqwest::Error, context: Option<Cow<'static, str>> },

    #[error("Telephony internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl TelephonyError {
    pub(crate) fn configuration(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Configuration { message: message.into(), context: None }
    }
}

#[cfg(feature = "server")]
impl From<TelephonyError> for callkit_kernel::server::ApiError {
    fn from(err: TelephonyError) -> Self {
        match err {
            TelephonyError::ClientNotInitialized { context } => Self::ClientNotInitialized { context },
            TelephonyError::MissingInput { message, .. } => Self::validation(message),
            TelephonyError::Configuration { message, .. } => Self::configuration(message),
            TelephonyError::UpstreamUnavailable { message, .. } => Self::upstream(message),
            TelephonyError::Provider { message, .. } => Self::provider(message),
            TelephonyError::Http { source, .. } => Self::provider(source.to_string()),
            TelephonyError::Internal { message, context } => Self::Internal { message, context },
        }
    }
}
