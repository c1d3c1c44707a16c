//! 维护操作相关方法

use rat_logger::{error, info, warn};
use serde_json::json;

use super::PoolManager;
use crate::error::PoolResult;
use crate::lifecycle::Managed;

impl PoolManager {
    /// 检查所有连接池的健康状态
    pub async fn health_check(&self) -> std::collections::HashMap<String, bool> {
        let mut health_status = std::collections::HashMap::new();

        for entry in self.pools.iter() {
            let alias = entry.key().clone();
            let pool = entry.value();

            let is_healthy = match pool.ping().await {
                Ok(()) => true,
                Err(e) => {
                    warn!("连接池 {} 健康检查失败: {}", alias, e);
                    false
                }
            };

            health_status.insert(alias, is_healthy);
        }

        health_status
    }

    /// 获取所有托管连接池的状态信息
    pub async fn get_pools_status(&self) -> std::collections::HashMap<String, serde_json::Value> {
        let mut pools_status = std::collections::HashMap::new();

        for entry in self.pools.iter() {
            let alias = entry.key().clone();
            let pool = entry.value();

            let pool_status = json!({
                "alias": alias,
                "state": format!("{:?}", pool.state()),
                "is_closed": pool.is_closed(),
                "created_at": pool.created_at().to_rfc3339(),
            });
            pools_status.insert(alias, pool_status);
        }

        pools_status
    }

    /// 关闭管理器：停止所有托管连接池
    ///
    /// 某个池停止失败不会阻断其余池的停止流程；全部处理完后统一
    /// 上报失败的池
    pub async fn shutdown(&self) -> PoolResult<()> {
        info!("开始关闭连接池管理器，当前池数量: {}", self.pools.len());

        let mut failed: Vec<(String, String)> = Vec::new();

        let aliases = self.get_aliases();
        for alias in aliases {
            if let Some(entry) = self.pools.get(&alias) {
                let pool = entry.value().clone();
                drop(entry);
                if let Err(e) = pool.stop().await {
                    error!("连接池 {} 停止失败: {}", alias, e);
                    failed.push((alias, e.to_string()));
                }
            }
        }

        // 清空注册表与默认别名
        self.pools.clear();
        {
            let mut default_alias = self.default_alias.write().await;
            *default_alias = None;
        }

        if failed.is_empty() {
            info!("连接池管理器已关闭");
            Ok(())
        } else {
            let pools = failed
                .iter()
                .map(|(alias, _)| alias.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            let messages = failed
                .iter()
                .map(|(_, message)| message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            Err(crate::pool_error!(shutdown, pools, messages))
        }
    }
}
