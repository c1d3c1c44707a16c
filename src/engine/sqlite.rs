//! SQLite 引擎适配器
//!
//! 基于 sqlx 的 SQLite 连接池。描述符中的时间项以毫秒传入；
//! 公平排队、归还检测等 sqlx 不支持的开关由描述符携带、此处不消费

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use rat_logger::{debug, info};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{EnginePool, PoolEngine, PooledLease};
use crate::descriptor::PoolDescriptor;
use crate::error::PoolResult;
use crate::metrics::MetricsSink;

/// SQLite 连接池引擎
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteEngine;

/// SQLite 引擎连接池
pub struct SqliteEnginePool {
    pool_name: String,
    pool: SqlitePool,
    validation_query: String,
    validation_query_timeout_ms: Option<u64>,
    /// 在借租约 (租约ID -> 连接)
    leases: DashMap<String, sqlx::pool::PoolConnection<sqlx::Sqlite>>,
    metrics: Option<Arc<dyn MetricsSink>>,
}

impl std::fmt::Debug for SqliteEnginePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteEnginePool")
            .field("pool_name", &self.pool_name)
            .field("validation_query", &self.validation_query)
            .field("outstanding_leases", &self.leases.len())
            .field("is_closed", &self.pool.is_closed())
            .finish()
    }
}

#[async_trait]
impl PoolEngine for SqliteEngine {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn construct(&self, descriptor: PoolDescriptor) -> PoolResult<Arc<dyn EnginePool>> {
        let mut connect_options = SqliteConnectOptions::from_str(&descriptor.url)
            .map_err(|e| crate::pool_error!(engine, &descriptor.pool_name, e))?
            .create_if_missing(true);

        // 驱动专属参数按插入顺序映射为 PRAGMA
        for (key, value) in &descriptor.properties {
            connect_options = connect_options.pragma(key.clone(), value.clone());
        }

        let mut pool_options = SqlitePoolOptions::new()
            .min_connections(descriptor.min_size)
            .max_connections(descriptor.max_size)
            .acquire_timeout(std::time::Duration::from_millis(
                descriptor.max_wait_for_connection_ms,
            ))
            .test_before_acquire(descriptor.check_connection_on_borrow);

        if let Some(ms) = descriptor.idle_timeout_ms {
            pool_options = pool_options.idle_timeout(std::time::Duration::from_millis(ms));
        }
        if let Some(ms) = descriptor.max_connection_age_ms {
            pool_options = pool_options.max_lifetime(std::time::Duration::from_millis(ms));
        }

        // 初始化语句与建连检测在每个新建物理连接上执行一次
        let mut connect_statements: Vec<String> = Vec::new();
        if let Some(query) = &descriptor.initialization_query {
            connect_statements.push(query.clone());
        }
        if descriptor.check_connection_on_connect {
            connect_statements.push(descriptor.validation_query.clone());
        }
        if !connect_statements.is_empty() {
            pool_options = pool_options.after_connect(move |conn, _meta| {
                let statements = connect_statements.clone();
                Box::pin(async move {
                    for statement in &statements {
                        sqlx::query(statement).execute(&mut *conn).await?;
                    }
                    Ok(())
                })
            });
        }

        // 惰性建连：物理连接延迟到首次借出时建立
        let pool = pool_options.connect_lazy_with(connect_options);

        info!(
            "SQLite连接池构建完成: 名称={}, 最小连接数={}, 最大连接数={}",
            descriptor.pool_name, descriptor.min_size, descriptor.max_size
        );

        Ok(Arc::new(SqliteEnginePool {
            pool_name: descriptor.pool_name,
            pool,
            validation_query: descriptor.validation_query,
            validation_query_timeout_ms: descriptor.validation_query_timeout_ms,
            leases: DashMap::new(),
            metrics: descriptor.metrics,
        }))
    }
}

#[async_trait]
impl EnginePool for SqliteEnginePool {
    async fn acquire(&self) -> PoolResult<PooledLease> {
        let connection = self.pool.acquire().await.map_err(|e| {
            crate::pool_error!(pool, format!("借出连接失败: {}", e))
        })?;

        let lease = PooledLease {
            id: Uuid::new_v4().to_string(),
            pool_name: self.pool_name.clone(),
        };
        self.leases.insert(lease.id.clone(), connection);
        crate::debug_log!("连接池 {} 借出连接: 租约={}", self.pool_name, lease.id);

        if let Some(metrics) = &self.metrics {
            metrics.connection_acquired(&self.pool_name);
        }
        Ok(lease)
    }

    async fn release(&self, lease: &PooledLease) -> PoolResult<()> {
        match self.leases.remove(&lease.id) {
            Some(_) => {
                debug!("连接池 {} 归还连接: 租约={}", self.pool_name, lease.id);
                if let Some(metrics) = &self.metrics {
                    metrics.connection_released(&self.pool_name);
                }
                Ok(())
            }
            None => Err(crate::pool_error!(
                pool,
                format!("租约 {} 不存在或已归还", lease.id)
            )),
        }
    }

    async fn ping(&self) -> PoolResult<()> {
        let query = sqlx::query(&self.validation_query);
        let result = match self.validation_query_timeout_ms {
            Some(ms) => tokio::time::timeout(
                std::time::Duration::from_millis(ms),
                query.execute(&self.pool),
            )
            .await
            .map_err(|_| crate::pool_error!(pool, "存活检测超时"))?,
            None => query.execute(&self.pool).await,
        };
        result
            .map(|_| ())
            .map_err(|e| crate::pool_error!(pool, format!("存活检测失败: {}", e)))
    }

    async fn close(&self) -> PoolResult<()> {
        self.pool.close().await;
        if let Some(metrics) = &self.metrics {
            metrics.pool_closed(&self.pool_name);
        }
        info!("SQLite连接池已关闭: 名称={}", self.pool_name);
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}
