//! HTTP Middleware
//!
//! 由外到内：访问日志 → 安全响应头 → 限流 → (CORS) → 错误归一化 → panic 捕获

use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

use super::dto::Envelope;
use super::error::ApiError;
use super::state::AppState;

/// 访问日志中间件
///
/// 每个请求记录一条日志；状态码为 4xx 时升级为 warn，5xx 时升级为 error
pub async fn access_log_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let client = client_key(&request);
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let latency_ms = started.elapsed().as_millis() as u64;

    if status.is_server_error() {
        tracing::error!(
            client = %client,
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            latency_ms,
            user_agent = %user_agent,
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            client = %client,
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            latency_ms,
            user_agent = %user_agent,
            "HTTP client error"
        );
    } else {
        tracing::info!(
            client = %client,
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            latency_ms,
            user_agent = %user_agent,
            "HTTP request"
        );
    }

    response
}

const SECURITY_HEADERS: &[(&str, &str)] = &[
    (
        "content-security-policy",
        "default-src 'self';base-uri 'self';font-src 'self' https: data:;form-action 'self';\
         frame-ancestors 'self';img-src 'self' data:;object-src 'none';script-src 'self';\
         script-src-attr 'none';style-src 'self' https: 'unsafe-inline';upgrade-insecure-requests",
    ),
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-resource-policy", "same-origin"),
    ("origin-agent-cluster", "?1"),
    ("referrer-policy", "no-referrer"),
    (
        "strict-transport-security",
        "max-age=31536000; includeSubDomains",
    ),
    ("x-content-type-options", "nosniff"),
    ("x-dns-prefetch-control", "off"),
    ("x-download-options", "noopen"),
    ("x-frame-options", "SAMEORIGIN"),
    ("x-permitted-cross-domain-policies", "none"),
    ("x-xss-protection", "0"),
];

/// 安全响应头中间件
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    for &(name, value) in SECURITY_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    headers.remove(header::SERVER);

    response
}

static X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
static X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
static X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");

/// 限流中间件
///
/// 按客户端 IP 计数，超限返回 429 和配置的提示消息
pub async fn rate_limit_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let client = client_key(&request);
    let decision = state.rate_limiter.check(&client);

    let mut response = if decision.allowed {
        next.run(request).await
    } else {
        tracing::warn!(client = %client, limit = decision.limit, "Rate limit exceeded");
        let mut response = (
            StatusCode::TOO_MANY_REQUESTS,
            Json(Envelope::fail_message(state.rate_limiter.message())),
        )
            .into_response();
        response
            .headers_mut()
            .insert(header::RETRY_AFTER, HeaderValue::from(decision.reset_after_secs()));
        response
    };

    let headers = response.headers_mut();
    headers.insert(X_RATELIMIT_LIMIT.clone(), HeaderValue::from(decision.limit));
    headers.insert(X_RATELIMIT_REMAINING.clone(), HeaderValue::from(decision.remaining));
    headers.insert(
        X_RATELIMIT_RESET.clone(),
        HeaderValue::from(decision.reset_at_unix(Utc::now())),
    );

    response
}

/// 错误归一化中间件
///
/// 处理器或提取器产生的 `ApiError` 会被放入 response extensions，
/// 在这里记录日志并按运行模式重写为统一的错误信封
pub async fn error_normalization_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    match response.extensions_mut().remove::<ApiError>() {
        Some(err) => {
            let (status, envelope) = err.normalize(&state.mode);
            (status, Json(envelope)).into_response()
        }
        None => response,
    }
}

/// panic 捕获处理：转换为普通的 500 错误，再交给错误归一化
pub fn panic_to_error(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic message".to_string()
    };

    ApiError::new(message).into_response()
}

/// 客户端标识：对端 IP，无连接信息时为 "unknown"
pub fn client_key(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
