//! Request Extractors
//!
//! [`ResourceId`] 读取路径中的 `:id`，解码失败（如非 UTF-8 的百分号编码）返回 `ApiError`。
//!
//! [`Payload`] 按 Content-Type 解析请求体：
//! - `application/json` → JSON
//! - `application/x-www-form-urlencoded` → 表单
//! - 其它类型或空请求体 → `T::default()`
//!
//! 解析失败返回 `ApiError`，由错误归一化中间件处理

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{header::CONTENT_TYPE, request::Parts},
};
use serde::de::DeserializeOwned;

use super::error::ApiError;

/// 路径参数中的资源 ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceId(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for ResourceId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) =
            <Path<String> as FromRequestParts<S>>::from_request_parts(parts, state).await?;
        Ok(ResourceId(id))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Payload<T>(pub T);

#[derive(Debug, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    Other,
}

fn body_kind(content_type: Option<&str>) -> BodyKind {
    let mime = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|m| m.trim().to_ascii_lowercase())
        .unwrap_or_default();

    if mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
    {
        BodyKind::Json
    } else if mime == "application/x-www-form-urlencoded" {
        BodyKind::Form
    } else {
        BodyKind::Other
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned + Default + Send + 'static,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let kind = body_kind(
            req.headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
        );
        if kind == BodyKind::Other {
            return Ok(Payload(T::default()));
        }

        let bytes = <Bytes as FromRequest<S>>::from_request(req, state).await?;
        if bytes.is_empty() {
            return Ok(Payload(T::default()));
        }

        let value = match kind {
            BodyKind::Json => serde_json::from_slice(&bytes)?,
            BodyKind::Form => serde_urlencoded::from_bytes(&bytes)?,
            BodyKind::Other => T::default(),
        };
        Ok(Payload(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::{routing::get, Router};
    use http_body_util::BodyExt;
    use serde::Deserialize;
    use tower::util::ServiceExt;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Message {
        message: Option<String>,
    }

    fn request(content_type: Option<&str>, body: &'static str) -> Request {
        let mut builder = axum::http::Request::builder().method("POST").uri("/");
        if let Some(ct) = content_type {
            builder = builder.header(CONTENT_TYPE, ct);
        }
        builder.body(Body::from(body)).unwrap()
    }

    #[test]
    fn test_body_kind() {
        assert_eq!(body_kind(Some("application/json; charset=utf-8")), BodyKind::Json);
        assert_eq!(body_kind(Some("application/vnd.api+json")), BodyKind::Json);
        assert_eq!(body_kind(Some("application/x-www-form-urlencoded")), BodyKind::Form);
        assert_eq!(body_kind(Some("text/plain")), BodyKind::Other);
        assert_eq!(body_kind(None), BodyKind::Other);
    }

    #[tokio::test]
    async fn test_json_and_form_bodies() {
        let Payload(json) = <Payload<Message> as FromRequest<()>>::from_request(
            request(Some("application/json"), r#"{"message":"hi"}"#),
            &(),
        )
        .await
        .unwrap();
        assert_eq!(json.message.as_deref(), Some("hi"));

        let Payload(form) = <Payload<Message> as FromRequest<()>>::from_request(
            request(Some("application/x-www-form-urlencoded"), "message=hello+there"),
            &(),
        )
        .await
        .unwrap();
        assert_eq!(form.message.as_deref(), Some("hello there"));
    }

    #[tokio::test]
    async fn test_missing_body_defaults() {
        let Payload(empty) = <Payload<Message> as FromRequest<()>>::from_request(
            request(Some("application/json"), ""),
            &(),
        )
        .await
        .unwrap();
        assert_eq!(empty, Message::default());

        let Payload(text) = <Payload<Message> as FromRequest<()>>::from_request(
            request(Some("text/plain"), "hi"),
            &(),
        )
        .await
        .unwrap();
        assert_eq!(text, Message::default());
    }

    #[tokio::test]
    async fn test_malformed_json_is_syntax_error() {
        let err = <Payload<Message> as FromRequest<()>>::from_request(
            request(Some("application/json"), "{oops"),
            &(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.name(), Some("SyntaxError"));
        assert_eq!(err.status_code(), Some(StatusCode::BAD_REQUEST));
    }

    async fn echo_id(ResourceId(id): ResourceId) -> String {
        id
    }

    #[tokio::test]
    async fn test_resource_id_decodes_path() {
        let app = Router::new().route("/:id", get(echo_id));
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/hello%20world")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"hello world");
    }

    #[tokio::test]
    async fn test_invalid_utf8_id_is_uri_error() {
        let app = Router::new().route("/:id", get(echo_id));
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/%FF")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let err = response.extensions().get::<ApiError>().unwrap();
        assert_eq!(err.name(), Some("URIError"));
        assert_eq!(err.status_code(), Some(StatusCode::BAD_REQUEST));
    }
}
