//! Memory Layer - In-Memory State Management
//!
//! 进程内唯一的共享可变状态：按客户端 IP 的限流计数

mod rate_limit_store;

pub use rate_limit_store::InMemoryRateLimitStore;
