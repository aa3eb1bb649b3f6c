//! HTTP Handlers
//!
//! 每个功能分组的处理器都返回固定的演示数据。
//! 构造响应失败时退化为该路由固定的 500 消息。

mod ai;
mod auth;
mod documents;
mod health;
mod users;

pub use ai::*;
pub use auth::*;
pub use documents::*;
pub use health::*;
pub use users::*;

use axum::{
    extract::OriginalUri,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::dto::{Envelope, ErrorBody};

/// 序列化信封；失败时返回 `{ success: false, error: { message: failure } }` 和 500
pub(crate) fn reply<T: Serialize>(
    status: StatusCode,
    envelope: Envelope<T>,
    failure: &'static str,
) -> Response {
    match serde_json::to_vec(&envelope) {
        Ok(body) => (
            status,
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            )],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, failure, "Failed to build response");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(Envelope::fail(ErrorBody::new(failure))),
            )
                .into_response()
        }
    }
}

/// 未匹配路由
pub async fn not_found(OriginalUri(uri): OriginalUri) -> Response {
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    (
        StatusCode::NOT_FOUND,
        Json(Envelope::fail_message(format!("Route {} not found", path))),
    )
        .into_response()
}
