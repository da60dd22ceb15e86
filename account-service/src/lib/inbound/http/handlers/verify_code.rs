use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::account::models::VerifyOutcome;
use crate::inbound::http::router::AppState;

pub async fn verify_code(
    State(state): State<AppState>,
    Json(body): Json<VerifyCodeRequest>,
) -> Result<ApiSuccess<VerifyCodeResponseData>, ApiError> {
    if body.email.is_empty() || body.code.is_empty() {
        return Err(ApiError::UnprocessableEntity(
            "Missing required fields: email and code".to_string(),
        ));
    }

    let outcome = state
        .account_service
        .verify_code(&body.email, &body.code)
        .await
        .map_err(ApiError::from)?;

    let message = match outcome {
        VerifyOutcome::Verified { .. } => {
            format!("Email {} successfully verified", body.email)
        }
        VerifyOutcome::AlreadyVerified { .. } => {
            "Email associated with account is already verified".to_string()
        }
    };

    Ok(ApiSuccess::new(
        StatusCode::OK,
        VerifyCodeResponseData {
            user_id: outcome.user_id().0,
            message,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VerifyCodeRequest {
    email: String,
    code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyCodeResponseData {
    pub user_id: i64,
    pub message: String,
}
