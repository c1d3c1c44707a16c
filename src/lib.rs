//! rat_dbpool - 数据库连接池配置与托管生命周期库
//!
//! 校验声明式连接池配置，确定性地投射为引擎侧描述符，
//! 由引擎构建出线程安全的连接池后，以托管组件(start/stop)的形式
//! 接入宿主应用的启动/关闭流程

// 导出所有公共模块
pub mod error;
pub mod types;
pub mod config;
pub mod validator;
pub mod descriptor;
pub mod metrics;
pub mod engine;
pub mod lifecycle;
pub mod manager;
pub mod i18n;

// 重新导出常用类型和函数
pub use error::{ConfigViolation, PoolError, PoolResult};
pub use types::{Duration, PoolSettings, TimeUnit, TransactionIsolation};
pub use config::PoolSettingsBuilder;
pub use validator::validate;
pub use descriptor::{build_descriptor, PoolDescriptor};
pub use metrics::{LogMetricsSink, MetricsSink, NoopMetricsSink};
pub use engine::{create_engine, EnginePool, PoolEngine, PooledLease};
pub use lifecycle::{build_managed_pool, LifecycleState, Managed, ManagedPool};
pub use manager::{
    add_pool, get_aliases, get_pool, health_check, remove_pool,
    set_default_alias, shutdown,
};

// 条件编译调试宏 - 只有在 debug 模式下才输出调试信息
#[cfg(debug_assertions)]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        rat_logger::debug!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        // 在 release 模式下不输出调试信息
    };
}

/// 初始化rat_dbpool库
///
/// 这个函数会初始化多语言错误消息系统
///
/// 注意：日志系统由调用者自行初始化，本库不再自动初始化日志
pub fn init() {
    // 初始化多语言错误消息系统
    i18n::ErrorMessageI18n::init();
}

/// 库版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 库名称
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// 获取库信息
pub fn get_info() -> String {
    format!("{} v{}", NAME, VERSION)
}
