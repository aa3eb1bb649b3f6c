//! Data Transfer Objects
//!
//! 所有接口共用的响应信封 `{ success, message?, data?, error? }`

use serde::Serialize;

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应信封
///
/// 字段私有，只能通过构造函数创建：
/// - `success` 始终存在
/// - `error` 仅在 `success == false` 时存在
#[derive(Debug, Serialize)]
pub struct Envelope<T = Empty> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorBody>,
}

/// 错误详情
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack: None,
        }
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}

/// 空数据
#[derive(Debug, Serialize)]
pub struct Empty {}

impl<T> Envelope<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            error: None,
        }
    }

    /// 成功响应，附带提示消息
    pub fn success_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
            error: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&ErrorBody> {
        self.error.as_ref()
    }
}

impl Envelope<Empty> {
    /// 成功但无数据，只有消息
    pub fn ok_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
            error: None,
        }
    }

    /// 失败，只有消息（404、限流）
    pub fn fail_message(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
            error: None,
        }
    }

    /// 失败，附带错误详情
    pub fn fail(error: ErrorBody) -> Self {
        Self {
            success: false,
            message: None,
            data: None,
            error: Some(error),
        }
    }
}
