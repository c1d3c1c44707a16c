//! 连接池配置类型定义
//!
//! 定义带单位的时间跨度、连接池配置模型和事务隔离级别

pub mod duration;
pub mod pool_settings;

// 重新导出所有公共类型以保持API兼容性
pub use duration::{Duration, TimeUnit};
pub use pool_settings::{PoolSettings, TransactionIsolation};
