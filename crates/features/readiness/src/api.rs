//! `/readiness` endpoints.

use crate::Readiness;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use callkit_derive::api_handler;
use callkit_kernel::domain::constants::READINESS_TAG;
use callkit_kernel::domain::models::ErrorBody;
use callkit_kernel::domain::readiness::{ProbeResponse, ReadinessSnapshot, SelectNumberRequest};
use callkit_kernel::server::{ApiResult, ApiState};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub fn readiness_router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(snapshot_handler))
        .routes(routes!(probe_handler))
        .routes(routes!(select_handler))
        .routes(routes!(webhook_handler))
}

#[api_handler(
    get,
    path = "/readiness",
    responses((status = OK, description = "Latest readiness snapshot", body = ReadinessSnapshot)),
    tag = READINESS_TAG,
)]
pub async fn snapshot_handler(State(state): State<ApiState>) -> ApiResult<Json<ReadinessSnapshot>> {
    let readiness = state.try_get_slice::<Readiness>()?;
    Ok(Json(readiness.engine.snapshot()))
}

#[api_handler(
    post,
    path = "/readiness/probe",
    responses((
        status = OK,
        description = "Probe result; zero attempts when the tunnel server is down, no public URL is known or a probe is already running",
        body = ProbeResponse
    )),
    tag = READINESS_TAG,
)]
pub async fn probe_handler(State(state): State<ApiState>) -> ApiResult<Json<ProbeResponse>> {
    let readiness = state.try_get_slice::<Readiness>()?;
    let outcome = readiness.engine.probe_tunnel().await;

    Ok(Json(ProbeResponse {
        reached: outcome.is_some_and(|o| o.is_reached()),
        attempts: outcome.map_or(0, |o| o.attempts()),
        snapshot: readiness.engine.snapshot(),
    }))
}

#[api_handler(
    post,
    path = "/readiness/select",
    request_body = SelectNumberRequest,
    responses(
        (status = OK, description = "Snapshot with the new selection", body = ReadinessSnapshot),
        (status = NOT_FOUND, description = "Unknown phone number", body = ErrorBody),
    ),
    tag = READINESS_TAG,
)]
pub async fn select_handler(
    State(state): State<ApiState>,
    payload: Result<Json<SelectNumberRequest>, JsonRejection>,
) -> ApiResult<Json<ReadinessSnapshot>> {
    let Json(request) = payload?;
    let readiness = state.try_get_slice::<Readiness>()?;

    Ok(Json(readiness.engine.select_number(&request.phone_number_sid)?))
}

#[api_handler(
    post,
    path = "/readiness/webhook",
    responses(
        (status = OK, description = "Snapshot after the voice URL update", body = ReadinessSnapshot),
        (status = BAD_REQUEST, description = "No selected number or public URL", body = ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Provider rejected the update", body = ErrorBody),
    ),
    tag = READINESS_TAG,
)]
pub async fn webhook_handler(State(state): State<ApiState>) -> ApiResult<Json<ReadinessSnapshot>> {
    let readiness = state.try_get_slice::<Readiness>()?;
    Ok(Json(readiness.engine.update_webhook().await?))
}
