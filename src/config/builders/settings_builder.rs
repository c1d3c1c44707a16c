//! # 连接池配置构建器模块
//!
//! 提供连接池配置的构建器实现，支持链式调用；`build()` 统一走校验器，
//! 全部违规项一次性返回

use rat_logger::info;

use crate::error::PoolResult;
use crate::types::{Duration, PoolSettings, TransactionIsolation};

/// 连接池配置构建器
///
/// 未显式设置的字段保持模型默认值，两个必填字段在 `build()` 时校验
#[derive(Debug, Default)]
pub struct PoolSettingsBuilder {
    settings: PoolSettings,
}

impl PoolSettingsBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            settings: PoolSettings::default(),
        }
    }

    /// 设置驱动类型标识
    ///
    /// # 参数
    ///
    /// * `driver_class` - 驱动类型标识，如 "sqlite"、"postgres"
    pub fn driver_class<S: Into<String>>(mut self, driver_class: S) -> Self {
        self.settings.driver_class = driver_class.into();
        self
    }

    /// 设置连接URI/DSN
    ///
    /// # 参数
    ///
    /// * `url` - 连接URI/DSN
    pub fn url<S: Into<String>>(mut self, url: S) -> Self {
        self.settings.url = url.into();
        self
    }

    /// 设置用户名
    pub fn user<S: Into<String>>(mut self, user: S) -> Self {
        self.settings.user = Some(user.into());
        self
    }

    /// 设置密码
    pub fn password<S: Into<String>>(mut self, password: S) -> Self {
        self.settings.password = Some(password.into());
        self
    }

    /// 追加一个驱动专属参数，保持插入顺序
    pub fn property<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.settings.properties.insert(key.into(), value.into());
        self
    }

    /// 设置最小连接数
    pub fn min_size(mut self, min_size: u32) -> Self {
        self.settings.min_size = min_size;
        self
    }

    /// 设置最大连接数
    pub fn max_size(mut self, max_size: u32) -> Self {
        self.settings.max_size = max_size;
        self
    }

    /// 设置调用者等待池化连接的最长时间
    pub fn max_wait_for_connection(mut self, timeout: Duration) -> Self {
        self.settings.max_wait_for_connection = timeout;
        self
    }

    /// 设置连接的最短空闲保留时间
    pub fn min_idle_time(mut self, time: Duration) -> Self {
        self.settings.min_idle_time = time;
        self
    }

    /// 设置存活检测语句
    pub fn validation_query<S: Into<String>>(mut self, query: S) -> Self {
        self.settings.validation_query = query.into();
        self
    }

    /// 设置存活检测语句超时
    pub fn validation_query_timeout(mut self, timeout: Duration) -> Self {
        self.settings.validation_query_timeout = Some(timeout);
        self
    }

    /// 设置建立物理连接超时
    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.settings.connection_timeout = Some(timeout);
        self
    }

    /// 设置空闲连接回收超时
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.settings.idle_timeout = Some(timeout);
        self
    }

    /// 设置连接最大存活时间
    pub fn max_connection_age(mut self, age: Duration) -> Self {
        self.settings.max_connection_age = Some(age);
        self
    }

    /// 设置池初始化失败超时
    pub fn initialization_fail_timeout(mut self, timeout: Duration) -> Self {
        self.settings.initialization_fail_timeout = Some(timeout);
        self
    }

    /// 设置连接校验超时
    pub fn validation_timeout(mut self, timeout: Duration) -> Self {
        self.settings.validation_timeout = Some(timeout);
        self
    }

    /// 设置默认目录
    pub fn default_catalog<S: Into<String>>(mut self, catalog: S) -> Self {
        self.settings.default_catalog = Some(catalog.into());
        self
    }

    /// 设置默认事务隔离级别
    pub fn default_transaction_isolation(mut self, isolation: TransactionIsolation) -> Self {
        self.settings.default_transaction_isolation = Some(isolation);
        self
    }

    /// 设置默认是否自动提交
    pub fn auto_commit_by_default(mut self, auto_commit: bool) -> Self {
        self.settings.auto_commit_by_default = Some(auto_commit);
        self
    }

    /// 设置默认是否只读
    pub fn read_only_by_default(mut self, read_only: bool) -> Self {
        self.settings.read_only_by_default = Some(read_only);
        self
    }

    /// 设置是否使用公平排队
    pub fn use_fair_queue(mut self, fair: bool) -> Self {
        self.settings.use_fair_queue = fair;
        self
    }

    /// 设置新建物理连接时是否检测存活
    pub fn check_connection_on_connect(mut self, check: bool) -> Self {
        self.settings.check_connection_on_connect = check;
        self
    }

    /// 设置借出连接时是否检测存活
    pub fn check_connection_on_borrow(mut self, check: bool) -> Self {
        self.settings.check_connection_on_borrow = check;
        self
    }

    /// 设置归还连接时是否检测存活
    pub fn check_connection_on_return(mut self, check: bool) -> Self {
        self.settings.check_connection_on_return = check;
        self
    }

    /// 设置空闲期间是否周期性检测存活
    pub fn check_connection_while_idle(mut self, check: bool) -> Self {
        self.settings.check_connection_while_idle = check;
        self
    }

    /// 设置空闲连接驱逐检查间隔
    pub fn eviction_interval(mut self, interval: Duration) -> Self {
        self.settings.eviction_interval = interval;
        self
    }

    /// 设置空闲连接存活检测间隔
    pub fn validation_interval(mut self, interval: Duration) -> Self {
        self.settings.validation_interval = interval;
        self
    }

    /// 设置是否回收疑似泄漏的连接
    pub fn remove_abandoned(mut self, remove: bool) -> Self {
        self.settings.remove_abandoned = remove;
        self
    }

    /// 设置连接多久未归还视为泄漏
    pub fn remove_abandoned_timeout(mut self, timeout: Duration) -> Self {
        self.settings.remove_abandoned_timeout = timeout;
        self
    }

    /// 设置是否记录被回收连接的日志
    pub fn log_abandoned_connections(mut self, log: bool) -> Self {
        self.settings.log_abandoned_connections = log;
        self
    }

    /// 设置是否记录存活检测失败日志
    pub fn log_validation_errors(mut self, log: bool) -> Self {
        self.settings.log_validation_errors = log;
        self
    }

    /// 设置是否在语句上附加注释
    pub fn auto_comments_enabled(mut self, enabled: bool) -> Self {
        self.settings.auto_comments_enabled = enabled;
        self
    }

    /// 设置是否允许按连接覆盖用户名
    pub fn alternate_usernames_allowed(mut self, allow: bool) -> Self {
        self.settings.alternate_usernames_allowed = allow;
        self
    }

    /// 设置归还连接时是否自动提交未完成事务
    pub fn commit_on_return(mut self, commit: bool) -> Self {
        self.settings.commit_on_return = commit;
        self
    }

    /// 设置每个新建物理连接上执行一次的初始化语句
    pub fn initialization_query<S: Into<String>>(mut self, query: S) -> Self {
        self.settings.initialization_query = Some(query.into());
        self
    }

    /// 设置自定义连接校验器类名
    pub fn validator_class_name<S: Into<String>>(mut self, name: S) -> Self {
        self.settings.validator_class_name = Some(name.into());
        self
    }

    /// 强制单连接模式，覆盖之前设置的 min_size/max_size
    pub fn as_single_connection_pool(mut self) -> Self {
        self.settings.as_single_connection_pool();
        self
    }

    /// 构建连接池配置
    ///
    /// # 错误
    ///
    /// 配置存在违规项时返回 `ValidationFailed`，一次性携带全部违规项
    pub fn build(self) -> PoolResult<PoolSettings> {
        crate::validator::validate(&self.settings)?;

        info!(
            "创建连接池配置: 驱动={}, 最小连接数={}, 最大连接数={}",
            self.settings.driver_class, self.settings.min_size, self.settings.max_size
        );

        Ok(self.settings)
    }

    /// 跳过校验直接取出配置
    ///
    /// 校验延后到统一构建入口执行时使用
    pub fn build_unchecked(self) -> PoolSettings {
        self.settings
    }
}
