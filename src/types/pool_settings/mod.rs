//! 连接池配置模型
//!
//! 纯值对象：除 driver_class 和 url 两个必填字段外，每个字段都有
//! 明确定义的默认值，空输入反序列化后仍是合法配置。字段缺省(None)
//! 表示"保留引擎自身默认值"，与"显式设置为零值"严格区分

use indexmap::IndexMap;
use rat_logger::info;
use serde::{Deserialize, Serialize};

use crate::error::{PoolError, PoolResult};
use crate::types::Duration;

/// 事务隔离级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionIsolation {
    /// 无事务隔离
    None,
    /// 读未提交
    ReadUncommitted,
    /// 读已提交
    ReadCommitted,
    /// 可重复读
    RepeatableRead,
    /// 串行化
    Serializable,
}

impl TransactionIsolation {
    /// 获取引擎隔离级别参数的规范字符串表示
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionIsolation::None => "TRANSACTION_NONE",
            TransactionIsolation::ReadUncommitted => "TRANSACTION_READ_UNCOMMITTED",
            TransactionIsolation::ReadCommitted => "TRANSACTION_READ_COMMITTED",
            TransactionIsolation::RepeatableRead => "TRANSACTION_REPEATABLE_READ",
            TransactionIsolation::Serializable => "TRANSACTION_SERIALIZABLE",
        }
    }

    /// 从字符串解析隔离级别
    pub fn from_str(s: &str) -> PoolResult<Self> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        let normalized = normalized
            .strip_prefix("transaction_")
            .unwrap_or(normalized.as_str());
        match normalized {
            "none" => Ok(TransactionIsolation::None),
            "read_uncommitted" => Ok(TransactionIsolation::ReadUncommitted),
            "read_committed" => Ok(TransactionIsolation::ReadCommitted),
            "repeatable_read" => Ok(TransactionIsolation::RepeatableRead),
            "serializable" => Ok(TransactionIsolation::Serializable),
            _ => Err(crate::pool_error!(
                config,
                format!("无法解析事务隔离级别: {}", s)
            )),
        }
    }
}

/// 连接池配置
///
/// 构造一次、构建描述符后不再变更的纯值对象
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolSettings {
    /// 驱动类型标识（必填）
    pub driver_class: String,
    /// 连接URI/DSN（必填）
    pub url: String,
    /// 用户名（可选）
    pub user: Option<String>,
    /// 密码（可选）
    pub password: Option<String>,
    /// 驱动专属参数，保持插入顺序（部分驱动对参数顺序敏感）
    pub properties: IndexMap<String, String>,
    /// 最小连接数
    pub min_size: u32,
    /// 最大连接数
    pub max_size: u32,
    /// 调用者等待池化连接的最长时间
    pub max_wait_for_connection: Duration,
    /// 连接的最短空闲保留时间
    pub min_idle_time: Duration,
    /// 存活检测语句
    pub validation_query: String,
    /// 存活检测语句超时（缺省保留引擎默认值）
    pub validation_query_timeout: Option<Duration>,
    /// 建立物理连接超时（缺省保留引擎默认值）
    pub connection_timeout: Option<Duration>,
    /// 空闲连接回收超时（缺省保留引擎默认值）
    pub idle_timeout: Option<Duration>,
    /// 连接最大存活时间（缺省保留引擎默认值）
    pub max_connection_age: Option<Duration>,
    /// 池初始化失败超时（缺省保留引擎默认值）
    pub initialization_fail_timeout: Option<Duration>,
    /// 连接校验超时（缺省保留引擎默认值）
    pub validation_timeout: Option<Duration>,
    /// 默认目录（可选）
    pub default_catalog: Option<String>,
    /// 默认事务隔离级别（可选）
    pub default_transaction_isolation: Option<TransactionIsolation>,
    /// 默认是否自动提交（三态：未设置/true/false）
    pub auto_commit_by_default: Option<bool>,
    /// 默认是否只读（三态：未设置/true/false）
    #[serde(alias = "default_read_only")]
    pub read_only_by_default: Option<bool>,
    /// 是否使用公平排队
    pub use_fair_queue: bool,
    /// 新建物理连接时是否检测存活
    pub check_connection_on_connect: bool,
    /// 借出连接时是否检测存活
    pub check_connection_on_borrow: bool,
    /// 归还连接时是否检测存活
    pub check_connection_on_return: bool,
    /// 空闲期间是否周期性检测存活
    pub check_connection_while_idle: bool,
    /// 空闲连接驱逐检查间隔
    pub eviction_interval: Duration,
    /// 空闲连接存活检测间隔
    pub validation_interval: Duration,
    /// 是否回收疑似泄漏的连接
    pub remove_abandoned: bool,
    /// 连接多久未归还视为泄漏（仅在 remove_abandoned 开启时生效）
    pub remove_abandoned_timeout: Duration,
    /// 是否记录被回收连接的日志
    pub log_abandoned_connections: bool,
    /// 是否记录存活检测失败日志
    pub log_validation_errors: bool,
    /// 是否在语句上附加注释
    pub auto_comments_enabled: bool,
    /// 是否允许按连接覆盖用户名
    pub alternate_usernames_allowed: bool,
    /// 归还连接时是否自动提交未完成事务
    pub commit_on_return: bool,
    /// 每个新建物理连接上执行一次的初始化语句（可选）
    pub initialization_query: Option<String>,
    /// 自定义连接校验器类名（可选）
    pub validator_class_name: Option<String>,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            driver_class: String::new(),
            url: String::new(),
            user: None,
            password: None,
            properties: IndexMap::new(),
            min_size: 10,
            max_size: 100,
            max_wait_for_connection: Duration::seconds(30),
            min_idle_time: Duration::minutes(1),
            validation_query: "/* 健康检查 */ SELECT 1".to_string(),
            validation_query_timeout: None,
            connection_timeout: None,
            idle_timeout: None,
            max_connection_age: None,
            initialization_fail_timeout: None,
            validation_timeout: None,
            default_catalog: None,
            default_transaction_isolation: None,
            auto_commit_by_default: None,
            read_only_by_default: None,
            use_fair_queue: true,
            check_connection_on_connect: true,
            check_connection_on_borrow: false,
            check_connection_on_return: false,
            check_connection_while_idle: true,
            eviction_interval: Duration::seconds(5),
            validation_interval: Duration::seconds(30),
            remove_abandoned: false,
            remove_abandoned_timeout: Duration::seconds(60),
            log_abandoned_connections: false,
            log_validation_errors: false,
            auto_comments_enabled: true,
            alternate_usernames_allowed: false,
            commit_on_return: false,
            initialization_query: None,
            validator_class_name: None,
        }
    }
}

impl PoolSettings {
    /// 创建连接池配置构建器
    pub fn builder() -> crate::config::PoolSettingsBuilder {
        crate::config::PoolSettingsBuilder::new()
    }

    /// 强制单连接模式：min_size 与 max_size 同时置为 1
    ///
    /// 用于单线程/测试部署。就地覆盖已有取值，重复调用结果不变；
    /// 必须在校验与构建之前调用
    pub fn as_single_connection_pool(&mut self) {
        self.min_size = 1;
        self.max_size = 1;
    }

    /// 从配置文件加载连接池配置
    ///
    /// # 参数
    ///
    /// * `config_path` - 配置文件路径，按扩展名识别 TOML 或 JSON
    pub fn from_file<P: AsRef<std::path::Path>>(config_path: P) -> PoolResult<Self> {
        let content =
            std::fs::read_to_string(config_path.as_ref()).map_err(PoolError::IoError)?;

        let settings: PoolSettings = if config_path.as_ref().extension().and_then(|s| s.to_str())
            == Some("toml")
        {
            toml::from_str(&content).map_err(|e| {
                crate::pool_error!(config, format!("解析TOML配置文件失败: {}", e))
            })?
        } else {
            serde_json::from_str(&content).map_err(|e| {
                crate::pool_error!(config, format!("解析JSON配置文件失败: {}", e))
            })?
        };

        info!("从文件加载连接池配置: {:?}", config_path.as_ref());
        Ok(settings)
    }

    /// 保存连接池配置到文件
    ///
    /// # 参数
    ///
    /// * `config_path` - 配置文件路径，按扩展名识别 TOML 或 JSON
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, config_path: P) -> PoolResult<()> {
        let content = if config_path.as_ref().extension().and_then(|s| s.to_str()) == Some("toml")
        {
            toml::to_string_pretty(self).map_err(|e| {
                crate::pool_error!(config, format!("序列化TOML配置失败: {}", e))
            })?
        } else {
            serde_json::to_string_pretty(self).map_err(|e| {
                crate::pool_error!(config, format!("序列化JSON配置失败: {}", e))
            })?
        };

        std::fs::write(config_path.as_ref(), content).map_err(PoolError::IoError)?;

        info!("保存连接池配置到文件: {:?}", config_path.as_ref());
        Ok(())
    }
}
