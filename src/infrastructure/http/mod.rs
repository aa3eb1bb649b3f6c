//! HTTP Layer - RESTful API
//!
//! 中间件链 + 各功能分组的处理器 + 统一响应信封

pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use dto::{Envelope, ErrorBody};
pub use error::{ApiError, ErrorClass};
pub use routes::create_routes;
pub use server::{App, HttpServer};
pub use state::AppState;
