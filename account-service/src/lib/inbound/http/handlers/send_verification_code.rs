use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn send_verification_code(
    State(state): State<AppState>,
    Json(body): Json<SendVerificationCodeRequest>,
) -> Result<ApiSuccess<SendVerificationCodeResponseData>, ApiError> {
    if body.email.is_empty() {
        return Err(ApiError::UnprocessableEntity(
            "Email is required for verification".to_string(),
        ));
    }

    state
        .account_service
        .send_verification_code(&body.email)
        .await
        .map_err(ApiError::from)
        .map(|_| {
            ApiSuccess::new(
                StatusCode::OK,
                SendVerificationCodeResponseData {
                    message: "Verification code sent successfully. Code will be active for 3 minutes."
                        .to_string(),
                },
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SendVerificationCodeRequest {
    email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendVerificationCodeResponseData {
    pub message: String,
}
