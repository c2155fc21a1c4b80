use axum::{
    extract::{ConnectInfo, State},
    http::StatusCode,
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::{hash_password, verify_password};
use crate::state::ServerState;
use crate::storage::{CreateUser, StorageError};

/// Plain message body, used by both success and failure responses
#[derive(Debug, Serialize)]
pub struct MsgResponse {
    pub msg: String,
}

fn msg(status: StatusCode, text: &str) -> (StatusCode, Json<MsgResponse>) {
    (
        status,
        Json(MsgResponse {
            msg: text.to_string(),
        }),
    )
}

/// Registration request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub msg: String,
    pub token: String,
    pub expires_in_seconds: u64,
}

/// Logout request
#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub token: String,
}

/// Session validation response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub valid: bool,
    pub email: Option<String>,
    pub expires_in_seconds: Option<u64>,
}

/// Registration endpoint
pub async fn register(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<MsgResponse>, (StatusCode, Json<MsgResponse>)> {
    let name = request.name.trim();
    let email = request.email.trim();
    let password = request.password.as_str();
    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(msg(
            StatusCode::BAD_REQUEST,
            "Name, email and password are required.",
        ));
    }

    let password_hash = hash_password(password).map_err(|e| {
        warn!("Password hashing failed during registration: {}", e);
        msg(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Server error during registration.",
        )
    })?;

    match state
        .user_store
        .create_user(CreateUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
        })
        .await
    {
        Ok(user) => {
            info!("Registered user {}", user.email);
            Ok(Json(MsgResponse {
                msg: "User Registered Successfully".to_string(),
            }))
        }
        Err(StorageError::DuplicateEmail(_)) => {
            Err(msg(StatusCode::BAD_REQUEST, "User already exists"))
        }
        Err(e) => {
            warn!("Storage error during registration: {}", e);
            Err(msg(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server error during registration.",
            ))
        }
    }
}

/// Login endpoint. Unknown email and wrong password produce identical
/// responses so the endpoint cannot be used to enumerate accounts.
pub async fn login(
    State(state): State<Arc<ServerState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, (StatusCode, Json<MsgResponse>)> {
    let ip = addr.ip();
    if state.rate_limiter.is_rate_limited(ip) {
        warn!("Rate limited login attempt from {}", ip);
        return Err(msg(
            StatusCode::TOO_MANY_REQUESTS,
            "Too many failed attempts. Try again later.",
        ));
    }

    let user = match state.user_store.get_user_by_email(request.email.trim()).await {
        Ok(user) => user,
        Err(StorageError::UserNotFound(_)) => {
            state.rate_limiter.record_failure(ip);
            return Err(msg(StatusCode::BAD_REQUEST, "Invalid Credentials"));
        }
        Err(e) => {
            warn!("Storage error during login: {}", e);
            return Err(msg(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server error during login.",
            ));
        }
    };

    match verify_password(&request.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) | Err(_) => {
            state.rate_limiter.record_failure(ip);
            return Err(msg(StatusCode::BAD_REQUEST, "Invalid Credentials"));
        }
    }

    state.rate_limiter.clear(ip);
    let token = state.sessions.create_session(user.email.clone());
    info!("User {} logged in", user.email);

    Ok(Json(LoginResponse {
        msg: "Login Successful".to_string(),
        token,
        expires_in_seconds: state.config.session_timeout_seconds,
    }))
}

/// Logout endpoint
pub async fn logout(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<LogoutRequest>,
) -> StatusCode {
    state.sessions.revoke_session(&request.token);
    StatusCode::OK
}

/// Session validation endpoint. The token travels in the Authorization
/// header so it never lands in request logs.
pub async fn validate_session(
    State(state): State<Arc<ServerState>>,
    auth_header: Option<TypedHeader<Authorization<Bearer>>>,
) -> Json<SessionResponse> {
    let token = match auth_header {
        Some(TypedHeader(Authorization(bearer))) => bearer.token().to_string(),
        None => {
            return Json(SessionResponse {
                valid: false,
                email: None,
                expires_in_seconds: None,
            });
        }
    };

    match state.sessions.validate_token(&token) {
        Some(email) => Json(SessionResponse {
            valid: true,
            email: Some(email),
            expires_in_seconds: Some(state.config.session_timeout_seconds),
        }),
        None => Json(SessionResponse {
            valid: false,
            email: None,
            expires_in_seconds: None,
        }),
    }
}
