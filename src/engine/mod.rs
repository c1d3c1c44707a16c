//! 连接池引擎接口模块
//!
//! 引擎负责真正的连接租借、驱逐与存活检测；本库只通过描述符这一
//! 配置界面与之交互。引擎适配器按特性开关启用

use std::sync::Arc;

use async_trait::async_trait;

use crate::descriptor::PoolDescriptor;
use crate::error::PoolResult;

#[cfg(feature = "sqlite-support")]
pub mod sqlite;
#[cfg(feature = "sqlite-support")]
pub use sqlite::SqliteEngine;

#[cfg(feature = "postgres-support")]
pub mod postgres;
#[cfg(feature = "postgres-support")]
pub use postgres::PostgresEngine;

/// 池化租约 - 代表一次已借出的连接
///
/// 租约只是句柄，真正的连接由引擎持有；归还时将租约交回引擎
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PooledLease {
    /// 租约ID
    pub id: String,
    /// 所属连接池名称
    pub pool_name: String,
}

/// 引擎构建出的连接池接口
///
/// 实现必须线程安全；`close` 之后 `acquire` 返回错误
#[async_trait]
pub trait EnginePool: Send + Sync + std::fmt::Debug {
    /// 借出一个连接，返回租约
    async fn acquire(&self) -> PoolResult<PooledLease>;

    /// 归还租约对应的连接
    async fn release(&self, lease: &PooledLease) -> PoolResult<()>;

    /// 执行一次存活检测
    async fn ping(&self) -> PoolResult<()>;

    /// 关闭连接池，释放所有连接
    async fn close(&self) -> PoolResult<()>;

    /// 连接池是否已关闭
    fn is_closed(&self) -> bool;
}

/// 连接池引擎接口
///
/// 引擎消费描述符，构建出存活的线程安全连接池
#[async_trait]
pub trait PoolEngine: Send + Sync {
    /// 引擎名称
    fn name(&self) -> &'static str;

    /// 按描述符构建连接池
    ///
    /// # 错误
    ///
    /// URL格式错误、驱动拒绝等构建失败返回 `EngineConstructionFailure`
    async fn construct(&self, descriptor: PoolDescriptor) -> PoolResult<Arc<dyn EnginePool>>;
}

/// 根据驱动类型标识创建对应的引擎
///
/// # 参数
///
/// * `driver_class` - 驱动类型标识，如 "sqlite"、"postgres"
pub fn create_engine(driver_class: &str) -> PoolResult<Arc<dyn PoolEngine>> {
    let normalized = driver_class.trim().to_lowercase();
    match normalized.as_str() {
        #[cfg(feature = "sqlite-support")]
        "sqlite" => Ok(Arc::new(SqliteEngine)),
        #[cfg(feature = "postgres-support")]
        "postgresql" | "postgres" | "pg" => Ok(Arc::new(PostgresEngine)),
        _ => Err(crate::pool_error!(unsupported_driver, driver_class)),
    }
}
