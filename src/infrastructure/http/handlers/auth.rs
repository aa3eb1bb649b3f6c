//! Auth HTTP Handlers
//!
//! 注册、登录和当前用户都只返回演示数据

use axum::{http::StatusCode, response::Response};
use serde::Serialize;

use super::reply;
use crate::infrastructure::http::dto::Envelope;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: &'static str,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: &'static str,
    pub token: &'static str,
}

#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub id: &'static str,
    pub name: &'static str,
    pub email: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserProfile,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/auth/register
pub async fn register() -> Response {
    reply(
        StatusCode::CREATED,
        Envelope::success_with_message(
            "User registration endpoint - coming soon!",
            RegisterResponse { user: "Demo user" },
        ),
        "Registration failed",
    )
}

/// POST /api/auth/login
pub async fn login() -> Response {
    reply(
        StatusCode::OK,
        Envelope::success_with_message(
            "User login endpoint - coming soon!",
            LoginResponse {
                user: "Demo user",
                token: "demo-token",
            },
        ),
        "Login failed",
    )
}

/// GET /api/auth/me
pub async fn me() -> Response {
    reply(
        StatusCode::OK,
        Envelope::success(MeResponse {
            user: UserProfile {
                id: "demo",
                name: "Demo User",
                email: "demo@example.com",
            },
        }),
        "Failed to get user info",
    )
}
