//! HTTP Routes
//!
//! API Endpoints:
//! - /health                      GET          存活探针
//! - /api/auth/register           POST         注册
//! - /api/auth/login              POST         登录
//! - /api/auth/me                 GET          当前用户
//! - /api/documents               GET          文档列表
//! - /api/documents/upload        POST         上传文档
//! - /api/documents/:id           GET/DELETE   文档详情 / 删除
//! - /api/ai/chat                 POST         聊天
//! - /api/ai/summarize            POST         摘要
//! - /api/ai/flashcards           POST         闪卡
//! - /api/ai/quiz                 POST         测验
//! - /api/users/progress          GET/POST     学习进度
//! - /api/users/achievements      GET          成就
//!
//! 未匹配的路径和不支持的方法都返回 404 信封

use axum::{
    routing::{get, post, MethodRouter},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

type Routes = Router<Arc<AppState>>;

/// 方法不匹配时同样按未匹配路由处理
fn or_not_found(method_router: MethodRouter<Arc<AppState>>) -> MethodRouter<Arc<AppState>> {
    method_router.fallback(handlers::not_found)
}

/// 创建所有路由
pub fn create_routes() -> Routes {
    Router::new()
        .route("/health", or_not_found(get(handlers::health)))
        .nest("/api", api_routes())
        .fallback(handlers::not_found)
}

/// API 路由
fn api_routes() -> Routes {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/documents", document_routes())
        .nest("/ai", ai_routes())
        .nest("/users", user_routes())
}

/// Auth 路由
fn auth_routes() -> Routes {
    Router::new()
        .route("/register", or_not_found(post(handlers::register)))
        .route("/login", or_not_found(post(handlers::login)))
        .route("/me", or_not_found(get(handlers::me)))
}

/// Document 路由
fn document_routes() -> Routes {
    Router::new()
        .route("/", or_not_found(get(handlers::list_documents)))
        .route("/upload", or_not_found(post(handlers::upload_document)))
        .route(
            "/:id",
            or_not_found(get(handlers::get_document).delete(handlers::delete_document)),
        )
}

/// AI 路由
fn ai_routes() -> Routes {
    Router::new()
        .route("/chat", or_not_found(post(handlers::chat)))
        .route("/summarize", or_not_found(post(handlers::summarize)))
        .route("/flashcards", or_not_found(post(handlers::flashcards)))
        .route("/quiz", or_not_found(post(handlers::quiz)))
}

/// User 路由
fn user_routes() -> Routes {
    Router::new()
        .route(
            "/progress",
            or_not_found(get(handlers::get_progress).post(handlers::update_progress)),
        )
        .route("/achievements", or_not_found(get(handlers::achievements)))
}
