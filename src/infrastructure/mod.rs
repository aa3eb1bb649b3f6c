//! Infrastructure Layer - 基础设施层
//!
//! 提供 HTTP 服务和端口的具体实现

pub mod http;
pub mod memory;

pub use memory::InMemoryRateLimitStore;
