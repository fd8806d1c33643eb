use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{info, warn};
use serde_json::Value;

use crate::config::Config;
use crate::error::AppError;
use crate::twilio::CallPlacer;
use crate::types::{CallParams, HealthResponse};

pub struct AppState {
    pub config: Config,
    pub caller: Arc<dyn CallPlacer>,
}

/// Compares without short-circuiting on the first differing byte.
fn secrets_match(given: &str, expected: &str) -> bool {
    let (a, b) = (given.as_bytes(), expected.as_bytes());
    if a.len() != b.len() {
        return false;
    }

    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

/// The body is read as JSON whatever the content type says, and must be an
/// object whose `may_i` string equals the configured secret.
fn is_authorized(body: &[u8], expected: &str) -> bool {
    let Ok(Value::Object(fields)) = serde_json::from_slice::<Value>(body) else {
        return false;
    };
    match fields.get("may_i") {
        Some(Value::String(given)) => secrets_match(given, expected),
        _ => false,
    }
}

pub async fn callmom(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, AppError> {
    if !is_authorized(&body, &state.config.may_i_answer) {
        warn!("Rejected call request with bad or missing secret");
        return Ok((StatusCode::FORBIDDEN, "Forbidden").into_response());
    }

    let params = CallParams {
        url: state.config.twiml_url.clone(),
        to: state.config.to_number.clone(),
        from: state.config.from_number.clone(),
    };
    info!("Calling {} from {}", params.to, params.from);

    state.caller.create_call(&params).await?;

    Ok((StatusCode::OK, "OK").into_response())
}

pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
