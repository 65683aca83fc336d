use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use earthpulse_store::User;
use serde::Deserialize;
use tracing::info;

use crate::auth::{check_login, hash_password, new_salt, validate_credentials};
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::AppState;

#[derive(Deserialize)]
pub struct Credentials {
    email: String,
    password: String,
}

fn token_response(status: StatusCode, token: String) -> Response {
    (
        status,
        Json(serde_json::json!({
            "access_token": token,
            "token_type": "bearer",
        })),
    )
        .into_response()
}

pub async fn api_register(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<Credentials>,
) -> Result<Response, ApiError> {
    validate_credentials(&body.email, &body.password)?;

    let salt = new_salt();
    let hash = hash_password(&body.password, &salt);

    let user = User::create(&body.email, &hash, &salt, &state.pool)
        .await?
        .ok_or_else(|| ApiError::Conflict("Email already registered".into()))?;

    info!(user_id = %user.id, "User registered");
    let token = state.jwt.create_token(user.id, &user.email)?;
    Ok(token_response(StatusCode::CREATED, token))
}

pub async fn api_login(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<Credentials>,
) -> Result<Response, ApiError> {
    let user = User::find_by_email(&body.email, &state.pool).await?;
    let account = user
        .as_ref()
        .map(|u| (u.password_salt.as_str(), u.password_hash.as_str()));
    if !check_login(&body.password, account) {
        return Err(ApiError::InvalidCredentials);
    }
    let user = user.ok_or(ApiError::InvalidCredentials)?;

    let token = state.jwt.create_token(user.id, &user.email)?;
    Ok(token_response(StatusCode::OK, token))
}
