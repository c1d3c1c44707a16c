//! 托管生命周期模块
//!
//! 把引擎构建出的连接池包装为宿主可托管的组件：宿主在启动阶段调用
//! `start`，在关闭阶段调用 `stop`。包装采用组合方式持有引擎池句柄，
//! 连接的借出/归还原样转发给引擎

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use rat_logger::{debug, info};

use crate::descriptor::build_descriptor;
use crate::engine::{EnginePool, PoolEngine, PooledLease};
use crate::error::{PoolError, PoolResult};
use crate::metrics::MetricsSink;
use crate::types::PoolSettings;

/// 托管组件的生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LifecycleState {
    /// 已创建，尚未启动
    Created = 0,
    /// 已启动
    Started = 1,
    /// 已停止（终态，不支持重启）
    Stopped = 2,
}

impl LifecycleState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => LifecycleState::Created,
            1 => LifecycleState::Started,
            _ => LifecycleState::Stopped,
        }
    }
}

/// 托管组件接口 - 宿主生命周期协议
///
/// 宿主的生命周期管理器从单一控制线程调用，并保证 start 先于
/// 业务流量、stop 晚于流量排空
#[async_trait]
pub trait Managed: Send + Sync {
    /// 启动组件
    async fn start(&self) -> PoolResult<()>;

    /// 停止组件，释放持有的资源
    async fn stop(&self) -> PoolResult<()>;
}

/// 托管连接池
///
/// 状态机: Created -> Started -> Stopped，Started -> Stopped 是唯一
/// 后续迁移。重复 stop 安全且不会二次释放资源；未 start 直接 stop
/// 是合法的空操作路径
pub struct ManagedPool {
    pool_name: String,
    pool: Arc<dyn EnginePool>,
    state: AtomicU8,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl std::fmt::Debug for ManagedPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagedPool")
            .field("pool_name", &self.pool_name)
            .field("state", &self.state())
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl ManagedPool {
    /// 包装一个引擎构建出的连接池
    pub fn new<S: Into<String>>(pool_name: S, pool: Arc<dyn EnginePool>) -> Self {
        Self {
            pool_name: pool_name.into(),
            pool,
            state: AtomicU8::new(LifecycleState::Created as u8),
            created_at: chrono::Utc::now(),
        }
    }

    /// 连接池名称
    pub fn pool_name(&self) -> &str {
        &self.pool_name
    }

    /// 当前生命周期状态
    pub fn state(&self) -> LifecycleState {
        LifecycleState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// 创建时间
    pub fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.created_at
    }

    /// 借出一个连接
    pub async fn acquire(&self) -> PoolResult<PooledLease> {
        if self.state() == LifecycleState::Stopped {
            return Err(crate::pool_error!(
                pool,
                format!("连接池 {} 已停止，无法借出连接", self.pool_name)
            ));
        }
        self.pool.acquire().await
    }

    /// 归还一个连接
    pub async fn release(&self, lease: &PooledLease) -> PoolResult<()> {
        self.pool.release(lease).await
    }

    /// 执行一次存活检测
    pub async fn ping(&self) -> PoolResult<()> {
        self.pool.ping().await
    }

    /// 底层引擎池是否已关闭
    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

#[async_trait]
impl Managed for ManagedPool {
    /// 启动连接池
    ///
    /// 连接池在构建完成时即已存活，start 只做状态迁移，
    /// 用于满足宿主两阶段生命周期协议
    async fn start(&self) -> PoolResult<()> {
        let exchanged = self.state.compare_exchange(
            LifecycleState::Created as u8,
            LifecycleState::Started as u8,
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
        if exchanged.is_ok() {
            info!("托管连接池启动: 名称={}", self.pool_name);
        } else {
            debug!("托管连接池 {} 已不在初始状态，忽略 start", self.pool_name);
        }
        Ok(())
    }

    /// 停止连接池，释放全部池化连接
    ///
    /// 只有第一次调用真正执行释放；释放失败以 `ShutdownFailure`
    /// 上报调用者，连接泄漏对宿主进程是正确性问题，不能吞掉
    async fn stop(&self) -> PoolResult<()> {
        let previous = self
            .state
            .swap(LifecycleState::Stopped as u8, Ordering::SeqCst);
        if previous == LifecycleState::Stopped as u8 {
            debug!("托管连接池 {} 已停止，忽略重复 stop", self.pool_name);
            return Ok(());
        }

        info!("托管连接池停止: 名称={}", self.pool_name);
        self.pool.close().await.map_err(|e| match e {
            PoolError::ShutdownFailure { .. } => e,
            other => crate::pool_error!(shutdown, &self.pool_name, other),
        })
    }
}

/// 构建托管连接池
///
/// 流程: 校验配置 -> 构建描述符 -> 引擎构建连接池 -> 托管包装。
/// 校验失败时不会触达引擎
///
/// # 参数
///
/// * `settings` - 连接池配置
/// * `pool_name` - 连接池名称
/// * `metrics` - 指标接收器句柄（可选）
/// * `engine` - 连接池引擎
pub async fn build_managed_pool(
    settings: &PoolSettings,
    pool_name: &str,
    metrics: Option<Arc<dyn MetricsSink>>,
    engine: &dyn PoolEngine,
) -> PoolResult<ManagedPool> {
    crate::validator::validate(settings)?;

    let descriptor = build_descriptor(settings, pool_name, metrics.clone());
    info!("构建连接池: 名称={}, 引擎={}", pool_name, engine.name());

    let pool = engine.construct(descriptor).await?;
    if let Some(metrics) = &metrics {
        metrics.pool_created(pool_name);
    }

    Ok(ManagedPool::new(pool_name, pool))
}
