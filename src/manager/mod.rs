//! 连接池管理器模块
//!
//! 提供多个托管连接池的注册与生命周期编排：注册即启动，
//! shutdown 时按序停止全部池

mod maintenance;
mod manager;
mod registry_ops;

// 重新导出主要类型
pub use manager::PoolManager;

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::engine::PoolEngine;
use crate::error::PoolResult;
use crate::lifecycle::ManagedPool;
use crate::metrics::MetricsSink;
use crate::types::PoolSettings;

/// 全局连接池管理器实例
pub static GLOBAL_POOL_MANAGER: Lazy<PoolManager> = Lazy::new(PoolManager::new);

/// 获取全局连接池管理器
pub(crate) fn get_global_pool_manager() -> &'static PoolManager {
    &GLOBAL_POOL_MANAGER
}

/// 便捷函数 - 注册连接池
pub async fn add_pool(
    alias: &str,
    settings: PoolSettings,
    engine: &dyn PoolEngine,
) -> PoolResult<()> {
    get_global_pool_manager().add_pool(alias, settings, engine).await
}

/// 便捷函数 - 注册连接池（带指标接收器）
pub async fn add_pool_with_metrics(
    alias: &str,
    settings: PoolSettings,
    engine: &dyn PoolEngine,
    metrics: Option<Arc<dyn MetricsSink>>,
) -> PoolResult<()> {
    get_global_pool_manager()
        .add_pool_with_metrics(alias, settings, engine, metrics)
        .await
}

/// 便捷函数 - 移除连接池
pub async fn remove_pool(alias: &str) -> PoolResult<()> {
    get_global_pool_manager().remove_pool(alias).await
}

/// 便捷函数 - 获取托管连接池（别名为 None 时返回默认池）
pub async fn get_pool(alias: Option<&str>) -> PoolResult<Arc<ManagedPool>> {
    get_global_pool_manager().get_pool(alias).await
}

/// 便捷函数 - 获取所有别名
pub fn get_aliases() -> Vec<String> {
    get_global_pool_manager().get_aliases()
}

/// 便捷函数 - 设置默认别名
pub async fn set_default_alias(alias: &str) -> PoolResult<()> {
    get_global_pool_manager().set_default_alias(alias).await
}

/// 便捷函数 - 健康检查
pub async fn health_check() -> std::collections::HashMap<String, bool> {
    get_global_pool_manager().health_check().await
}

/// 便捷函数 - 获取所有托管连接池的状态信息
pub async fn get_pools_status() -> std::collections::HashMap<String, serde_json::Value> {
    get_global_pool_manager().get_pools_status().await
}

/// 便捷函数 - 关闭管理器
pub async fn shutdown() -> PoolResult<()> {
    get_global_pool_manager().shutdown().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::engine::{EnginePool, PooledLease};

    /// 引擎桩：构建计数型池
    #[derive(Debug, Default)]
    struct StubEngine {
        fail_close: bool,
    }

    #[derive(Debug)]
    struct StubPool {
        name: String,
        closed: AtomicUsize,
        fail_close: bool,
    }

    #[async_trait]
    impl EnginePool for StubPool {
        async fn acquire(&self) -> PoolResult<PooledLease> {
            Ok(PooledLease {
                id: "lease".to_string(),
                pool_name: self.name.clone(),
            })
        }

        async fn release(&self, _lease: &PooledLease) -> PoolResult<()> {
            Ok(())
        }

        async fn ping(&self) -> PoolResult<()> {
            Ok(())
        }

        async fn close(&self) -> PoolResult<()> {
            self.closed.fetch_add(1, Ordering::SeqCst);
            if self.fail_close {
                Err(crate::pool_error!(pool, "关闭被拒绝"))
            } else {
                Ok(())
            }
        }

        fn is_closed(&self) -> bool {
            self.closed.load(Ordering::SeqCst) > 0
        }
    }

    #[async_trait]
    impl crate::engine::PoolEngine for StubEngine {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn construct(
            &self,
            descriptor: crate::descriptor::PoolDescriptor,
        ) -> PoolResult<Arc<dyn EnginePool>> {
            Ok(Arc::new(StubPool {
                name: descriptor.pool_name,
                closed: AtomicUsize::new(0),
                fail_close: self.fail_close,
            }))
        }
    }

    fn stub_settings() -> PoolSettings {
        PoolSettings {
            driver_class: "stub".to_string(),
            url: "stub://local".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_register_and_default_alias() {
        let manager = PoolManager::new();
        manager
            .add_pool("first", stub_settings(), &StubEngine::default())
            .await
            .unwrap();
        manager
            .add_pool("second", stub_settings(), &StubEngine::default())
            .await
            .unwrap();

        assert_eq!(manager.get_default_alias().await.as_deref(), Some("first"));
        let pool = manager.get_pool(None).await.unwrap();
        assert_eq!(pool.pool_name(), "first");

        manager.set_default_alias("second").await.unwrap();
        let pool = manager.get_pool(None).await.unwrap();
        assert_eq!(pool.pool_name(), "second");

        let mut aliases = manager.get_aliases();
        aliases.sort();
        assert_eq!(aliases, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_settings() {
        let manager = PoolManager::new();
        let err = manager
            .add_pool("bad", PoolSettings::default(), &StubEngine::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::PoolError::ValidationFailed { .. }
        ));
        assert!(manager.get_aliases().is_empty());
    }

    #[tokio::test]
    async fn test_remove_pool_stops_and_redefaults() {
        let manager = PoolManager::new();
        manager
            .add_pool("a", stub_settings(), &StubEngine::default())
            .await
            .unwrap();
        manager
            .add_pool("b", stub_settings(), &StubEngine::default())
            .await
            .unwrap();

        manager.remove_pool("a").await.unwrap();
        assert_eq!(manager.get_default_alias().await.as_deref(), Some("b"));
        assert!(manager.get_pool(Some("a")).await.is_err());

        let err = manager.remove_pool("missing").await.unwrap_err();
        assert!(matches!(
            err,
            crate::error::PoolError::AliasNotFound { alias } if alias == "missing"
        ));
    }

    #[tokio::test]
    async fn test_health_check() {
        let manager = PoolManager::new();
        manager
            .add_pool("healthy", stub_settings(), &StubEngine::default())
            .await
            .unwrap();

        let status = manager.health_check().await;
        assert_eq!(status.get("healthy"), Some(&true));
    }

    #[tokio::test]
    async fn test_shutdown_continues_past_failures() {
        let manager = PoolManager::new();
        manager
            .add_pool("ok", stub_settings(), &StubEngine::default())
            .await
            .unwrap();
        manager
            .add_pool("broken", stub_settings(), &StubEngine { fail_close: true })
            .await
            .unwrap();

        // 一个池关闭失败不阻断其余池的停止，最终统一上报
        let err = manager.shutdown().await.unwrap_err();
        assert!(matches!(
            err,
            crate::error::PoolError::ShutdownFailure { .. }
        ));
        assert!(manager.get_aliases().is_empty());
        assert!(manager.get_default_alias().await.is_none());
    }

    #[tokio::test]
    async fn test_shutdown_clean() {
        let manager = PoolManager::new();
        manager
            .add_pool("only", stub_settings(), &StubEngine::default())
            .await
            .unwrap();
        manager.shutdown().await.unwrap();
        assert!(manager.get_aliases().is_empty());
    }

    #[tokio::test]
    async fn test_pools_status() {
        let manager = PoolManager::new();
        manager
            .add_pool("observed", stub_settings(), &StubEngine::default())
            .await
            .unwrap();

        let status = manager.get_pools_status().await;
        let entry = status.get("observed").unwrap();
        assert_eq!(entry["state"], "Started");
        assert_eq!(entry["is_closed"], false);
    }
}
