use std::borrow::Cow;

#[callkit_derive::callkit_error]
pub enum CredentialsError {
    #[error("{message}")]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Credentials file error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Credentials internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[cfg(feature = "server")]
impl From<CredentialsError> for callkit_kernel::server::ApiError {
    fn from(err: CredentialsError) -> Self {
        match err {
            CredentialsError::Validation { message, .. } => Self::validation(message),
            other => Self::Internal { message: other.to_string().into(), context: None },
        }
    }
}
