//! # 配置管理模块
//!
//! 提供连接池配置的构建器模式和链式配置

pub mod builders;

// 重新导出所有公共类型以保持API兼容性
pub use builders::PoolSettingsBuilder;
