//! HTTP Error Handling
//!
//! `ApiError` 是所有框架级/意外错误的统一载体，字段都可选：
//! `name`、`message`、`status_code`、`code`。
//! 归一化由 [`ErrorClass::classify`] 完成，按顺序匹配，命中即止。

use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;
use std::sync::Arc;

use axum::{
    extract::rejection::{BytesRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::dto::{Envelope, ErrorBody};
use crate::config::RuntimeMode;

/// 错误名称
pub mod names {
    pub const CAST_ERROR: &str = "CastError";
    pub const VALIDATION_ERROR: &str = "ValidationError";
    pub const SYNTAX_ERROR: &str = "SyntaxError";
    pub const PAYLOAD_TOO_LARGE_ERROR: &str = "PayloadTooLargeError";
    pub const URI_ERROR: &str = "URIError";
    pub const GENERIC: &str = "Error";
}

/// 唯一键冲突的错误码
pub const DUPLICATE_KEY_CODE: i64 = 11000;

/// API 错误
#[derive(Debug, Clone, Default)]
pub struct ApiError {
    name: Option<String>,
    message: Option<String>,
    status_code: Option<StatusCode>,
    code: Option<i64>,
    stack: Option<Arc<str>>,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            stack: captured_backtrace(),
            ..Default::default()
        }
    }

    /// 资源 ID 无法解析
    pub fn cast(message: impl Into<String>) -> Self {
        Self::new(message).with_name(names::CAST_ERROR)
    }

    /// 唯一键冲突
    pub fn duplicate_key(message: impl Into<String>) -> Self {
        Self::new(message).with_code(DUPLICATE_KEY_CODE)
    }

    /// 输入校验失败
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(message).with_name(names::VALIDATION_ERROR)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status_code = Some(status);
        self
    }

    pub fn with_code(mut self, code: i64) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(Arc::from(stack.into()));
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn status_code(&self) -> Option<StatusCode> {
        self.status_code
    }

    pub fn code(&self) -> Option<i64> {
        self.code
    }

    /// `<name>: <message>` 开头，后接捕获到的调用栈或错误链
    pub fn stack(&self) -> String {
        let headline = self.to_string();
        match self.stack.as_deref() {
            Some(trace) if !trace.is_empty() => format!("{}\n{}", headline, trace),
            _ => headline,
        }
    }

    /// 按运行模式归一化为状态码和响应信封，同时记录原始错误
    pub fn normalize(&self, mode: &RuntimeMode) -> (StatusCode, Envelope) {
        tracing::error!(
            name = self.name().unwrap_or(names::GENERIC),
            message = self.message().unwrap_or_default(),
            status_code = ?self.status_code,
            code = ?self.code,
            "{}",
            self.stack()
        );

        let class = ErrorClass::classify(self);
        let mut body = ErrorBody::new(class.message());
        if mode.is_development() {
            body = body.with_stack(self.stack());
        }
        (class.status(), Envelope::fail(body))
    }
}

fn captured_backtrace() -> Option<Arc<str>> {
    let backtrace = Backtrace::capture();
    match backtrace.status() {
        BacktraceStatus::Captured => Some(Arc::from(backtrace.to_string())),
        _ => None,
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}",
            self.name().unwrap_or(names::GENERIC),
            self.message().unwrap_or_default()
        )
    }
}

impl std::error::Error for ApiError {}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::new(err.to_string()).with_stack(format!("{:?}", err))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(err.to_string())
            .with_name(names::SYNTAX_ERROR)
            .with_status(StatusCode::BAD_REQUEST)
    }
}

impl From<serde_urlencoded::de::Error> for ApiError {
    fn from(err: serde_urlencoded::de::Error) -> Self {
        Self::new(err.to_string())
            .with_name(names::SYNTAX_ERROR)
            .with_status(StatusCode::BAD_REQUEST)
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        let status = rejection.status();
        let name = if status == StatusCode::PAYLOAD_TOO_LARGE {
            names::PAYLOAD_TOO_LARGE_ERROR
        } else {
            names::GENERIC
        };
        Self::new(rejection.body_text())
            .with_name(name)
            .with_status(status)
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::new(rejection.body_text())
            .with_name(names::URI_ERROR)
            .with_status(rejection.status())
    }
}

/// 错误分类
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorClass {
    Cast,
    DuplicateKey,
    Validation,
    Generic { status: StatusCode, message: String },
}

impl ErrorClass {
    pub fn classify(err: &ApiError) -> Self {
        match (err.name(), err.code()) {
            (Some(names::CAST_ERROR), _) => ErrorClass::Cast,
            (_, Some(DUPLICATE_KEY_CODE)) => ErrorClass::DuplicateKey,
            (Some(names::VALIDATION_ERROR), _) => ErrorClass::Validation,
            _ => ErrorClass::Generic {
                status: err
                    .status_code()
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                message: err
                    .message()
                    .filter(|m| !m.is_empty())
                    .unwrap_or("Server Error")
                    .to_string(),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ErrorClass::Cast => StatusCode::NOT_FOUND,
            ErrorClass::DuplicateKey | ErrorClass::Validation => StatusCode::BAD_REQUEST,
            ErrorClass::Generic { status, .. } => *status,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ErrorClass::Cast => "Resource not found",
            ErrorClass::DuplicateKey => "Duplicate field value entered",
            ErrorClass::Validation => "Invalid input data",
            ErrorClass::Generic { message, .. } => message,
        }
    }
}

/// 未经中间件处理时返回不带 stack 的信封；
/// 原始错误放入 response extensions，交给 `error_normalization_middleware` 按运行模式重写
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let class = ErrorClass::classify(&self);
        let mut response =
            (class.status(), Json(Envelope::fail(ErrorBody::new(class.message())))).into_response();
        response.extensions_mut().insert(self);
        response
    }
}
