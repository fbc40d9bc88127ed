//! `/numbers` and `/call` endpoints.

use crate::{Telephony, TelephonyError, TwilioClient};
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::HeaderMap;
use callkit_derive::api_handler;
use callkit_kernel::domain::constants::{ACCOUNT_SID_HEADER, AUTH_TOKEN_HEADER, TELEPHONY_TAG};
use callkit_kernel::domain::models::{
    ErrorBody, PhoneNumberRecord, PlaceCallRequest, PlaceCallResponse, UpdateVoiceUrlRequest,
};
use callkit_kernel::server::{ApiError, ApiResult, ApiState};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub fn telephony_router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(list_numbers_handler, update_number_handler))
        .routes(routes!(call_handler))
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::trim).filter(|v| !v.is_empty())
}

/// Client from the override headers when both are sent, otherwise from stored credentials.
fn request_client(telephony: &Telephony, headers: &HeaderMap) -> ApiResult<Option<TwilioClient>> {
    match (header_value(headers, ACCOUNT_SID_HEADER), header_value(headers, AUTH_TOKEN_HEADER)) {
        (Some(sid), Some(token)) => Ok(telephony.factory.create(Some(sid), Some(token))),
        _ => Ok(telephony.stored_client()?),
    }
}

fn require(client: Option<TwilioClient>) -> Result<TwilioClient, TelephonyError> {
    client.ok_or(TelephonyError::ClientNotInitialized { context: None })
}

#[api_handler(
    get,
    path = "/numbers",
    params(
        ("x-twilio-account-sid" = Option<String>, Header, description = "Account SID override"),
        ("x-twilio-auth-token" = Option<String>, Header, description = "Auth token override"),
    ),
    responses(
        (status = OK, description = "Numbers provisioned on the account", body = Vec<PhoneNumberRecord>),
        (status = INTERNAL_SERVER_ERROR, description = "No credentials or provider failure", body = ErrorBody),
    ),
    tag = TELEPHONY_TAG,
)]
pub async fn list_numbers_handler(
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<PhoneNumberRecord>>> {
    let telephony = state.try_get_slice::<Telephony>()?;
    let client = require(request_client(telephony, &headers)?)?;

    Ok(Json(client.list_numbers(telephony.numbers_page_size).await?))
}

#[api_handler(
    post,
    path = "/numbers",
    request_body = UpdateVoiceUrlRequest,
    params(
        ("x-twilio-account-sid" = Option<String>, Header, description = "Account SID override"),
        ("x-twilio-auth-token" = Option<String>, Header, description = "Auth token override"),
    ),
    responses(
        (status = OK, description = "Updated number", body = PhoneNumberRecord),
        (status = BAD_REQUEST, description = "Malformed body", body = ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "No credentials or provider failure", body = ErrorBody),
    ),
    tag = TELEPHONY_TAG,
)]
pub async fn update_number_handler(
    State(state): State<ApiState>,
    headers: HeaderMap,
    payload: Result<Json<UpdateVoiceUrlRequest>, JsonRejection>,
) -> ApiResult<Json<PhoneNumberRecord>> {
    let telephony = state.try_get_slice::<Telephony>()?;
    let client = require(request_client(telephony, &headers)?)?;

    let Json(request) = payload?;
    if request.phone_number_sid.trim().is_empty() {
        return Err(ApiError::validation("phoneNumberSid is required"));
    }

    Ok(Json(client.update_voice_url(request.phone_number_sid.trim(), &request.voice_url).await?))
}

#[api_handler(
    post,
    path = "/call",
    request_body = PlaceCallRequest,
    params(
        ("x-twilio-account-sid" = Option<String>, Header, description = "Account SID override"),
        ("x-twilio-auth-token" = Option<String>, Header, description = "Auth token override"),
    ),
    responses(
        (status = OK, description = "Call dispatched", body = PlaceCallResponse),
        (status = BAD_REQUEST, description = "Missing number or callback configuration", body = ErrorBody),
        (status = BAD_GATEWAY, description = "Tunnel status endpoint failed", body = ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "No credentials or provider failure", body = ErrorBody),
    ),
    tag = TELEPHONY_TAG,
)]
pub async fn call_handler(
    State(state): State<ApiState>,
    headers: HeaderMap,
    payload: Result<Json<PlaceCallRequest>, JsonRejection>,
) -> ApiResult<Json<PlaceCallResponse>> {
    let telephony = state.try_get_slice::<Telephony>()?;
    let client = request_client(telephony, &headers)?;

    let Json(request) = payload?;
    let call_sid = telephony
        .initiator
        .place_call(client.as_ref(), request.phone_number.as_deref().unwrap_or_default())
        .await?;

    Ok(Json(PlaceCallResponse { success: true, call_sid }))
}
