//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod rate_limit_store;

pub use rate_limit_store::{RateLimitStorePort, WindowHit};
