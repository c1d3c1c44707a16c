//! 连接池管理器核心定义

use std::sync::Arc;

use dashmap::DashMap;
use rat_logger::info;
use tokio::sync::RwLock;

use crate::lifecycle::ManagedPool;

/// 连接池管理器 - 管理多个托管连接池
///
/// 以宿主生命周期管理器的身份持有托管池：注册即启动，shutdown 时
/// 按序停止全部池
#[derive(Debug)]
pub struct PoolManager {
    /// 托管连接池映射 (别名 -> 托管池)
    pub(crate) pools: Arc<DashMap<String, Arc<ManagedPool>>>,
    /// 默认连接池别名
    pub(crate) default_alias: Arc<RwLock<Option<String>>>,
}

impl PoolManager {
    /// 创建新的连接池管理器
    pub fn new() -> Self {
        info!("创建连接池管理器");

        Self {
            pools: Arc::new(DashMap::new()),
            default_alias: Arc::new(RwLock::new(None)),
        }
    }
}

impl Default for PoolManager {
    fn default() -> Self {
        Self::new()
    }
}
