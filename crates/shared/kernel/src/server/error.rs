use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use callkit_domain::models::ErrorBody;
use std::borrow::Cow;

pub type ApiResult<T> = Result<T, ApiError>;

/// Error surface of the control API. Every variant renders as `{ "error": message }`.
///
/// Feature slices convert their own errors into one of these kinds; the message is
/// passed through unchanged so provider errors reach the caller verbatim.
#[callkit_derive::callkit_error]
pub enum ApiError {
    #[error("{message}")]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("{message}")]
    Configuration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("{message}")]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("{message}")]
    UpstreamUnavailable { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("{message}")]
    Provider { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Telephony client not initialized")]
    ClientNotInitialized { context: Option<Cow<'static, str>> },

    #[error("{message}")]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl ApiError {
    pub fn validation(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Validation { message: message.into(), context: None }
    }

    pub fn configuration(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Configuration { message: message.into(), context: None }
    }

    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::NotFound { message: message.into(), context: None }
    }

    pub fn upstream(message: impl Into<Cow<'static, str>>) -> Self {
        Self::UpstreamUnavailable { message: message.into(), context: None }
    }

    pub fn provider(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Provider { message: message.into(), context: None }
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::Configuration { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::UpstreamUnavailable { .. } => StatusCode::BAD_GATEWAY,
            Self::Provider { .. } | Self::ClientNotInitialized { .. } | Self::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }

    /// Context attached with `.context(...)`; logged, never sent to the client.
    #[must_use]
    pub fn context_note(&self) -> Option<&str> {
        match self {
            Self::Validation { context, .. }
            | Self::Configuration { context, .. }
            | Self::NotFound { context, .. }
            | Self::UpstreamUnavailable { context, .. }
            | Self::Provider { context, .. }
            | Self::ClientNotInitialized { context }
            | Self::Internal { context, .. } => context.as_deref(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<super::ApiStateError> for ApiError {
    fn from(err: super::ApiStateError) -> Self {
        Self::Internal { message: err.to_string().into(), context: None }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), context = ?self.context_note(), "{self}");
        } else {
            tracing::debug!(status = status.as_u16(), context = ?self.context_note(), "{self}");
        }

        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_status_codes() {
        assert_eq!(ApiError::validation("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::configuration("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::upstream("x").status(), StatusCode::BAD_GATEWAY);
        assert_eq!(ApiError::provider("x").status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            ApiError::ClientNotInitialized { context: None }.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ApiError::from("boom").status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn context_does_not_leak_into_message() {
        let err: ApiResult<()> = Err(ApiError::provider("The 'To' number is not valid"));
        let err = err.context("placing call").expect_err("provider error");

        assert_eq!(err.to_string(), "The 'To' number is not valid");
        assert_eq!(err.context_note(), Some("placing call"));
    }

    #[tokio::test]
    async fn response_body_carries_only_the_message() {
        let response = ApiError::upstream("Failed to get public URL").into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.expect("body");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(body, serde_json::json!({ "error": "Failed to get public URL" }));
    }
}
