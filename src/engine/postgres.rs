//! PostgreSQL 引擎适配器
//!
//! 基于 sqlx 的 PostgreSQL 连接池。驱动专属参数与默认事务特性
//! 通过服务端运行时参数 (GUC) 下发；default_catalog 由连接URL决定，
//! 此处不再消费

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use rat_logger::{debug, info};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use uuid::Uuid;

use super::{EnginePool, PoolEngine, PooledLease};
use crate::descriptor::PoolDescriptor;
use crate::error::PoolResult;
use crate::metrics::MetricsSink;

/// PostgreSQL 连接池引擎
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresEngine;

/// PostgreSQL 引擎连接池
pub struct PostgresEnginePool {
    pool_name: String,
    pool: PgPool,
    validation_query: String,
    validation_query_timeout_ms: Option<u64>,
    /// 在借租约 (租约ID -> 连接)
    leases: DashMap<String, sqlx::pool::PoolConnection<sqlx::Postgres>>,
    metrics: Option<Arc<dyn MetricsSink>>,
}

impl std::fmt::Debug for PostgresEnginePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresEnginePool")
            .field("pool_name", &self.pool_name)
            .field("validation_query", &self.validation_query)
            .field("outstanding_leases", &self.leases.len())
            .field("is_closed", &self.pool.is_closed())
            .finish()
    }
}

/// 规范隔离级别字符串转为 PostgreSQL 运行时参数取值
fn isolation_guc_value(canonical: &str) -> String {
    canonical
        .strip_prefix("TRANSACTION_")
        .unwrap_or(canonical)
        .to_lowercase()
        .replace('_', " ")
}

#[async_trait]
impl PoolEngine for PostgresEngine {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn construct(&self, descriptor: PoolDescriptor) -> PoolResult<Arc<dyn EnginePool>> {
        let mut connect_options = PgConnectOptions::from_str(&descriptor.url)
            .map_err(|e| crate::pool_error!(engine, &descriptor.pool_name, e))?
            .application_name(&descriptor.pool_name);

        if let Some(user) = &descriptor.user {
            connect_options = connect_options.username(user);
        }
        if let Some(password) = &descriptor.password {
            connect_options = connect_options.password(password);
        }

        // 驱动专属参数与默认事务特性统一走服务端运行时参数
        let mut server_settings: Vec<(String, String)> = descriptor
            .properties
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if let Some(isolation) = descriptor.default_transaction_isolation {
            server_settings.push((
                "default_transaction_isolation".to_string(),
                isolation_guc_value(isolation),
            ));
        }
        if let Some(read_only) = descriptor.read_only_by_default {
            server_settings.push((
                "default_transaction_read_only".to_string(),
                if read_only { "on" } else { "off" }.to_string(),
            ));
        }
        if !server_settings.is_empty() {
            connect_options = connect_options.options(server_settings);
        }

        let mut pool_options = PgPoolOptions::new()
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

        // 惰性建连：构建阶段只校验配置，不触达数据库
        let pool = pool_options.connect_lazy_with(connect_options);

        info!(
            "PostgreSQL连接池构建完成: 名称={}, 最小连接数={}, 最大连接数={}",
            descriptor.pool_name, descriptor.min_size, descriptor.max_size
        );

        Ok(Arc::new(PostgresEnginePool {
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
impl EnginePool for PostgresEnginePool {
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
        info!("PostgreSQL连接池已关闭: 名称={}", self.pool_name);
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::build_descriptor;
    use crate::error::PoolError;
    use crate::types::{PoolSettings, TransactionIsolation};

    #[test]
    fn test_isolation_guc_value() {
        assert_eq!(
            isolation_guc_value(TransactionIsolation::RepeatableRead.as_str()),
            "repeatable read"
        );
        assert_eq!(
            isolation_guc_value(TransactionIsolation::Serializable.as_str()),
            "serializable"
        );
    }

    #[tokio::test]
    async fn test_construct_rejects_malformed_url() {
        let settings = PoolSettings {
            driver_class: "postgres".to_string(),
            url: "not a url at all".to_string(),
            ..Default::default()
        };
        let descriptor = build_descriptor(&settings, "bad", None);
        let err = PostgresEngine.construct(descriptor).await.unwrap_err();
        assert!(matches!(
            err,
            PoolError::EngineConstructionFailure { pool, .. } if pool == "bad"
        ));
    }

    #[tokio::test]
    async fn test_construct_lazy_does_not_touch_network() {
        // 惰性建连：无法触达的主机不影响构建本身
        let settings = PoolSettings {
            driver_class: "postgres".to_string(),
            url: "postgres://localhost:1/unreachable".to_string(),
            ..Default::default()
        };
        let descriptor = build_descriptor(&settings, "lazy", None);
        let pool = PostgresEngine.construct(descriptor).await.unwrap();
        assert!(!pool.is_closed());
        pool.close().await.unwrap();
    }
}
