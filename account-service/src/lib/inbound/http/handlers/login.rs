use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::account::models::LoginCommand;
use crate::account::models::LoginSuccess;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    if body.email.is_empty() || body.password.is_empty() {
        return Err(ApiError::UnprocessableEntity(
            "Email and password required".to_string(),
        ));
    }

    state
        .account_service
        .login(LoginCommand {
            email: body.email,
            password: body.password,
        })
        .await
        .map_err(ApiError::from)
        .map(|ref success| ApiSuccess::new(StatusCode::OK, success.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub session_id: String,
    pub user_id: i64,
    pub name: String,
    pub email: String,
}

impl From<&LoginSuccess> for LoginResponseData {
    fn from(success: &LoginSuccess) -> Self {
        Self {
            session_id: success.session_token.clone(),
            user_id: success.user_id.0,
            name: success.name.clone(),
            email: success.email.clone(),
        }
    }
}
