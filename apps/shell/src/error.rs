use std::borrow::Cow;

#[callkit_derive::callkit_error]
pub enum ShellError {
    #[error("Control API request failed{}: {source}", format_context(.context))]
    Transport { source: reqwest::Error, context: Option<Cow<'static, str>> },

    /// Non-success response; `message` is the server's `error` field when present.
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("{message}")]
    NotReady { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Shell internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
