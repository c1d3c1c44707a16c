//! 连接池注册相关方法

use std::sync::Arc;

use rat_logger::{info, warn};

use super::PoolManager;
use crate::engine::PoolEngine;
use crate::error::PoolResult;
use crate::lifecycle::{build_managed_pool, Managed, ManagedPool};
use crate::metrics::MetricsSink;
use crate::types::PoolSettings;

impl PoolManager {
    /// 注册连接池：构建托管池并立即启动
    ///
    /// # 参数
    ///
    /// * `alias` - 连接池别名，同时作为池名称
    /// * `settings` - 连接池配置
    /// * `engine` - 连接池引擎
    pub async fn add_pool(
        &self,
        alias: &str,
        settings: PoolSettings,
        engine: &dyn PoolEngine,
    ) -> PoolResult<()> {
        self.add_pool_with_metrics(alias, settings, engine, None)
            .await
    }

    /// 注册连接池（带指标接收器）
    pub async fn add_pool_with_metrics(
        &self,
        alias: &str,
        settings: PoolSettings,
        engine: &dyn PoolEngine,
        metrics: Option<Arc<dyn MetricsSink>>,
    ) -> PoolResult<()> {
        info!("注册连接池: 别名={}, 引擎={}", alias, engine.name());

        // 别名已存在时替换现有池
        if self.pools.contains_key(alias) {
            warn!("连接池别名已存在，将替换现有配置: {}", alias);
            self.remove_pool(alias).await?;
        }

        let managed = build_managed_pool(&settings, alias, metrics, engine).await?;
        managed.start().await?;
        self.pools.insert(alias.to_string(), Arc::new(managed));

        // 如果这是第一个连接池，设置为默认
        {
            let mut default_alias = self.default_alias.write().await;
            if default_alias.is_none() {
                *default_alias = Some(alias.to_string());
                info!("设置默认连接池别名: {}", alias);
            }
        }

        info!("连接池注册成功: 别名={}", alias);
        Ok(())
    }

    /// 移除连接池：先从注册表摘除，再停止
    ///
    /// 停止失败以 `ShutdownFailure` 上报，此时池已不在注册表中
    pub async fn remove_pool(&self, alias: &str) -> PoolResult<()> {
        info!("移除连接池: 别名={}", alias);

        let Some((_, pool)) = self.pools.remove(alias) else {
            return Err(crate::pool_error!(alias_not_found, alias));
        };

        // 如果移除的是默认连接池，重新设置默认
        {
            let mut default_alias = self.default_alias.write().await;
            if default_alias.as_deref() == Some(alias) {
                *default_alias = self.pools.iter().next().map(|entry| entry.key().clone());
                if let Some(new_default) = default_alias.as_ref() {
                    info!("重新设置默认连接池别名: {}", new_default);
                } else {
                    info!("没有可用的连接池，清空默认别名");
                }
            }
        }

        pool.stop().await?;
        info!("连接池已移除: 别名={}", alias);
        Ok(())
    }

    /// 获取指定别名的托管连接池；别名为 None 时返回默认池
    pub async fn get_pool(&self, alias: Option<&str>) -> PoolResult<Arc<ManagedPool>> {
        let target_alias = match alias {
            Some(a) => a.to_string(),
            None => {
                let default_alias = self.default_alias.read().await;
                match default_alias.as_ref() {
                    Some(a) => a.clone(),
                    None => {
                        return Err(crate::pool_error!(config, "没有配置默认连接池别名"));
                    }
                }
            }
        };

        self.pools
            .get(&target_alias)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| crate::pool_error!(alias_not_found, target_alias))
    }

    /// 获取所有连接池别名
    pub fn get_aliases(&self) -> Vec<String> {
        self.pools.iter().map(|entry| entry.key().clone()).collect()
    }

    /// 获取默认连接池别名
    pub async fn get_default_alias(&self) -> Option<String> {
        self.default_alias.read().await.clone()
    }

    /// 设置默认连接池别名
    pub async fn set_default_alias(&self, alias: &str) -> PoolResult<()> {
        if self.pools.contains_key(alias) {
            let mut default_alias = self.default_alias.write().await;
            *default_alias = Some(alias.to_string());
            info!("设置默认连接池别名: {}", alias);
            Ok(())
        } else {
            Err(crate::pool_error!(alias_not_found, alias))
        }
    }
}
