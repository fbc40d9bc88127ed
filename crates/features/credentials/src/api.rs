//! `/credentials` and `/credentials-status` endpoints.

use crate::Credentials;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use callkit_derive::api_handler;
use callkit_kernel::domain::constants::CREDENTIALS_TAG;
use callkit_kernel::domain::models::{
    CredentialsStatus, ErrorBody, MaskedCredentials, SaveCredentialsRequest, SuccessResponse,
};
use callkit_kernel::server::{ApiResult, ApiState};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub fn credentials_router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(status_handler))
        .routes(routes!(get_handler, save_handler))
}

#[api_handler(
    get,
    path = "/credentials-status",
    responses((status = OK, description = "Whether both credentials are stored", body = CredentialsStatus)),
    tag = CREDENTIALS_TAG,
)]
pub async fn status_handler(State(state): State<ApiState>) -> ApiResult<Json<CredentialsStatus>> {
    let credentials = state.try_get_slice::<Credentials>()?;
    Ok(Json(CredentialsStatus { credentials_set: credentials.store.is_set()? }))
}

#[api_handler(
    get,
    path = "/credentials",
    responses((status = OK, description = "Stored credentials, masked; empty strings when unset", body = MaskedCredentials)),
    tag = CREDENTIALS_TAG,
)]
pub async fn get_handler(State(state): State<ApiState>) -> ApiResult<Json<MaskedCredentials>> {
    let credentials = state.try_get_slice::<Credentials>()?;
    Ok(Json(credentials.store.masked()?.unwrap_or_default()))
}

#[api_handler(
    post,
    path = "/credentials",
    request_body = SaveCredentialsRequest,
    responses(
        (status = OK, description = "Credentials written to the env file", body = SuccessResponse),
        (status = BAD_REQUEST, description = "A field is missing or blank", body = ErrorBody),
    ),
    tag = CREDENTIALS_TAG,
)]
pub async fn save_handler(
    State(state): State<ApiState>,
    payload: Result<Json<SaveCredentialsRequest>, JsonRejection>,
) -> ApiResult<Json<SuccessResponse>> {
    let Json(request) = payload?;
    let credentials = state.try_get_slice::<Credentials>()?;

    credentials.store.save(
        request.account_sid.as_deref().unwrap_or_default(),
        request.auth_token.as_deref().unwrap_or_default(),
    )?;

    Ok(Json(SuccessResponse { success: true }))
}
