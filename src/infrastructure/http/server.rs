//! HTTP Server
//!
//! Axum HTTP 服务器启动和配置

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{DefaultBodyLimit, OriginalUri, Request};
use axum::http::{header, HeaderValue, Method};
use axum::middleware;
use axum::{Router, ServiceExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower::util::MapRequest;
use tower::{Layer, ServiceBuilder};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::middleware::{
    access_log_middleware, error_normalization_middleware, panic_to_error, rate_limit_middleware,
    security_headers_middleware,
};
use super::routes::create_routes;
use super::state::AppState;
use crate::config::ServerConfig;

/// 对外服务：路由前先去掉路径末尾的 `/`
pub type App = MapRequest<NormalizePath<Router>, fn(Request) -> Request>;

/// 记录规范化之前的 URI，404 消息使用客户端的原始路径
fn keep_original_uri(mut request: Request) -> Request {
    let uri = request.uri().clone();
    request.extensions_mut().insert(OriginalUri(uri));
    request
}

/// HTTP 服务器
pub struct HttpServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl HttpServer {
    /// 创建新的 HTTP 服务器
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self {
            config,
            state: Arc::new(state),
        }
    }

    pub fn state(&self) -> Arc<AppState> {
        self.state.clone()
    }

    fn cors_layer(&self) -> CorsLayer {
        let origins: Vec<HeaderValue> = self
            .config
            .allowed_origins()
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_credentials(true)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([
                header::CONTENT_TYPE,
                header::AUTHORIZATION,
                header::COOKIE,
            ])
            .max_age(Duration::from_secs(3600))
    }

    /// 构建 Router
    ///
    /// 由内到外：路由 → 请求体上限 → panic 捕获 → 错误归一化 → CORS → 限流 → 安全响应头 → 访问日志 → trace
    fn build_router(&self) -> Router {
        create_routes()
            .layer(DefaultBodyLimit::max(self.config.body_limit_bytes))
            .layer(CatchPanicLayer::custom(panic_to_error))
            .layer(middleware::from_fn_with_state(
                self.state.clone(),
                error_normalization_middleware,
            ))
            .layer(self.cors_layer())
            .layer(middleware::from_fn_with_state(
                self.state.clone(),
                rate_limit_middleware,
            ))
            .layer(middleware::from_fn(security_headers_middleware))
            .layer(middleware::from_fn(access_log_middleware))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// 构建对外服务：`/health/` 与 `/health` 匹配同一路由
    pub fn build_app(&self) -> App {
        let normalized = NormalizePathLayer::trim_trailing_slash().layer(self.build_router());
        ServiceBuilder::new()
            .map_request(keep_original_uri as fn(Request) -> Request)
            .service(normalized)
    }

    /// 启动服务器（带优雅关闭）
    pub async fn run_with_shutdown<F>(self, shutdown_signal: F) -> Result<(), std::io::Error>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let app = self.build_app();
        let addr = self.config.addr();

        let listener = TcpListener::bind(&addr).await?;
        info!("Server running on port {}", self.config.port);
        info!("Environment: {}", self.config.mode);

        axum::serve(
            listener,
            ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
        )
        .with_graceful_shutdown(shutdown_signal)
        .await?;

        Ok(())
    }

    /// 启动服务器并监督后台任务
    ///
    /// 后台任务提前结束（包括 panic）时停止服务并返回错误
    pub async fn run_supervised<F>(
        self,
        shutdown_signal: F,
        mut background: JoinHandle<()>,
    ) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let result = tokio::select! {
            served = self.run_with_shutdown(shutdown_signal) => served.map_err(anyhow::Error::from),
            joined = &mut background => match joined {
                Ok(()) => Err(anyhow::anyhow!("Background task exited unexpectedly")),
                Err(e) => Err(anyhow::anyhow!("Background task failed: {}", e)),
            },
        };
        background.abort();
        result
    }
}
