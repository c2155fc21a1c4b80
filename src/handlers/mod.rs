mod auth;
mod charts;
mod health;

pub use auth::{
    login, logout, register, validate_session, LoginRequest, LoginResponse, LogoutRequest,
    MsgResponse, RegisterRequest, SessionResponse,
};
pub use charts::{get_charts, get_forecast, ChartsResponse};
pub use health::{api_running, health_check, HealthResponse};

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::state::ServerState;

/// Application routes. CORS, tracing, and body-limit layers are applied by
/// the binary on top of this.
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/", get(api_running))
        .route("/health", get(health_check))
        .route("/routes/register", post(register))
        .route("/routes/login", post(login))
        .route("/routes/logout", post(logout))
        .route("/routes/session", get(validate_session))
        .route("/routes/ml/forecast", get(get_forecast))
        .route("/routes/ml/charts", get(get_charts))
        .with_state(state)
}
