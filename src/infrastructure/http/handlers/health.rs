//! Health Handler
//!
//! 存活探针，不使用响应信封

use axum::{extract::State, Json};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::infrastructure::http::state::AppState;

/// Health 响应
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub uptime: f64,
}

/// Health endpoint - 健康检查
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        uptime: state.uptime_secs(),
    })
}
