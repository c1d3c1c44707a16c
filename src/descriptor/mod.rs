//! 引擎侧描述符模块
//!
//! 描述符是交给连接池引擎的配置对象：只携带调用者显式设置的内容，
//! "缺省"不等于零值。构建一次、被引擎消费一次，之后即可丢弃

use std::sync::Arc;

use indexmap::IndexMap;

use crate::metrics::MetricsSink;
use crate::types::PoolSettings;

/// 引擎侧连接池描述符
///
/// 时间项在此处统一以毫秒表示；可选项为 `None` 时引擎保留自身默认值
#[derive(Debug, Clone)]
pub struct PoolDescriptor {
    /// 连接池名称
    pub pool_name: String,
    /// 驱动类型标识
    pub driver_class: String,
    /// 连接URI/DSN
    pub url: String,
    /// 用户名
    pub user: Option<String>,
    /// 密码
    ///
    /// user 已设置而 password 缺省时，此处为空字符串而不是 None：
    /// 部分驱动对"无密码"与"空密码"做不同处理，带用户名的匿名认证
    /// 需要显式空串。这是针对该场景的特例，不是通用的空值转换规则
    pub password: Option<String>,
    /// 驱动专属参数，保持插入顺序
    pub properties: IndexMap<String, String>,
    /// 最小连接数
    pub min_size: u32,
    /// 最大连接数
    pub max_size: u32,
    /// 等待池化连接的最长时间（毫秒）
    pub max_wait_for_connection_ms: u64,
    /// 连接的最短空闲保留时间（毫秒）
    pub min_idle_time_ms: u64,
    /// 存活检测语句
    pub validation_query: String,
    /// 存活检测语句超时（毫秒）
    pub validation_query_timeout_ms: Option<u64>,
    /// 建立物理连接超时（毫秒）
    pub connection_timeout_ms: Option<u64>,
    /// 空闲连接回收超时（毫秒）
    pub idle_timeout_ms: Option<u64>,
    /// 连接最大存活时间（毫秒）
    pub max_connection_age_ms: Option<u64>,
    /// 池初始化失败超时（毫秒）
    pub initialization_fail_timeout_ms: Option<u64>,
    /// 连接校验超时（毫秒）
    pub validation_timeout_ms: Option<u64>,
    /// 默认目录
    pub default_catalog: Option<String>,
    /// 默认事务隔离级别（引擎参数的规范字符串形式）
    pub default_transaction_isolation: Option<&'static str>,
    /// 默认是否自动提交
    pub auto_commit_by_default: Option<bool>,
    /// 默认是否只读
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
    /// 空闲连接驱逐检查间隔（毫秒）
    pub eviction_interval_ms: u64,
    /// 空闲连接存活检测间隔（毫秒）
    pub validation_interval_ms: u64,
    /// 是否回收疑似泄漏的连接
    pub remove_abandoned: bool,
    /// 连接多久未归还视为泄漏（毫秒）
    pub remove_abandoned_timeout_ms: u64,
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
    /// 每个新建物理连接上执行一次的初始化语句
    pub initialization_query: Option<String>,
    /// 自定义连接校验器类名
    pub validator_class_name: Option<String>,
    /// 指标接收器句柄（可选）
    pub metrics: Option<Arc<dyn MetricsSink>>,
}

/// 由已校验的配置构建引擎侧描述符
///
/// 纯函数：确定性、与字段赋值顺序无关，除返回值外无任何副作用。
/// 本函数自身永不失败，非法配置在更早的校验阶段就会被拒绝
///
/// # 参数
///
/// * `settings` - 已通过校验的连接池配置
/// * `pool_name` - 连接池名称
/// * `metrics` - 指标接收器句柄（可选）
pub fn build_descriptor(
    settings: &PoolSettings,
    pool_name: &str,
    metrics: Option<Arc<dyn MetricsSink>>,
) -> PoolDescriptor {
    // 带用户名而无密码时补为空串，见 password 字段说明
    let password = match (&settings.user, &settings.password) {
        (Some(_), None) => Some(String::new()),
        _ => settings.password.clone(),
    };

    PoolDescriptor {
        pool_name: pool_name.to_string(),
        driver_class: settings.driver_class.clone(),
        url: settings.url.clone(),
        user: settings.user.clone(),
        password,
        properties: settings.properties.clone(),
        min_size: settings.min_size,
        max_size: settings.max_size,
        // 时间项只在此处换算为毫秒，避免中间表示引入单位漂移
        max_wait_for_connection_ms: settings.max_wait_for_connection.as_millis(),
        min_idle_time_ms: settings.min_idle_time.as_millis(),
        validation_query: settings.validation_query.clone(),
        validation_query_timeout_ms: settings.validation_query_timeout.map(|d| d.as_millis()),
        connection_timeout_ms: settings.connection_timeout.map(|d| d.as_millis()),
        idle_timeout_ms: settings.idle_timeout.map(|d| d.as_millis()),
        max_connection_age_ms: settings.max_connection_age.map(|d| d.as_millis()),
        initialization_fail_timeout_ms: settings
            .initialization_fail_timeout
            .map(|d| d.as_millis()),
        validation_timeout_ms: settings.validation_timeout.map(|d| d.as_millis()),
        default_catalog: settings.default_catalog.clone(),
        default_transaction_isolation: settings
            .default_transaction_isolation
            .map(|isolation| isolation.as_str()),
        auto_commit_by_default: settings.auto_commit_by_default,
        read_only_by_default: settings.read_only_by_default,
        use_fair_queue: settings.use_fair_queue,
        check_connection_on_connect: settings.check_connection_on_connect,
        check_connection_on_borrow: settings.check_connection_on_borrow,
        check_connection_on_return: settings.check_connection_on_return,
        check_connection_while_idle: settings.check_connection_while_idle,
        eviction_interval_ms: settings.eviction_interval.as_millis(),
        validation_interval_ms: settings.validation_interval.as_millis(),
        remove_abandoned: settings.remove_abandoned,
        remove_abandoned_timeout_ms: settings.remove_abandoned_timeout.as_millis(),
        log_abandoned_connections: settings.log_abandoned_connections,
        log_validation_errors: settings.log_validation_errors,
        auto_comments_enabled: settings.auto_comments_enabled,
        alternate_usernames_allowed: settings.alternate_usernames_allowed,
        commit_on_return: settings.commit_on_return,
        initialization_query: settings.initialization_query.clone(),
        validator_class_name: settings.validator_class_name.clone(),
        metrics,
    }
}
