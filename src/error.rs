//! 错误类型定义模块
//!
//! 所有错误消息通过 i18n 模块生成，支持多语言输出

use thiserror::Error;

/// 统一的结果类型别名
pub type PoolResult<T> = Result<T, PoolError>;

/// 单条配置校验违规项
///
/// 校验器一次性收集全部违规项，聚合在 `PoolError::ValidationFailed` 中返回，
/// 调用者修正一轮即可解决所有问题
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigViolation {
    /// 必填字段缺失（空字符串视同缺失）
    #[error("{}", missing_required_field_msg(.field))]
    MissingRequiredField {
        /// 字段名
        field: &'static str,
    },
    /// 字段取值低于允许的下界
    #[error("{}", out_of_range_value_msg(.field, .value, .minimum))]
    OutOfRangeValue {
        /// 字段名
        field: &'static str,
        /// 实际值
        value: String,
        /// 允许的最小值
        minimum: String,
    },
    /// 跨字段约束不成立
    #[error("{}", inconsistent_range_msg(.min_field, .min_value, .max_field, .max_value))]
    InconsistentRange {
        /// 下界字段名
        min_field: &'static str,
        /// 下界字段取值
        min_value: u32,
        /// 上界字段名
        max_field: &'static str,
        /// 上界字段取值
        max_value: u32,
    },
}

/// rat_dbpool 错误类型
#[derive(Debug, Error)]
pub enum PoolError {
    /// 配置校验失败，携带全部违规项
    #[error("{}", validation_failed_msg(.violations))]
    ValidationFailed {
        /// 本轮校验收集到的所有违规项
        violations: Vec<ConfigViolation>,
    },

    /// 配置错误
    #[error("{}", config_msg(.message))]
    ConfigError {
        /// 错误信息
        message: String,
    },

    /// 引擎构建连接池失败（URL格式错误、驱动拒绝等）
    #[error("{}", engine_construction_msg(.pool, .message))]
    EngineConstructionFailure {
        /// 连接池名称
        pool: String,
        /// 底层引擎/驱动错误信息
        message: String,
    },

    /// 关闭连接池失败
    ///
    /// 该错误向调用者如实上报，但不应阻断宿主对其余托管资源的关闭流程
    #[error("{}", shutdown_msg(.pool, .message))]
    ShutdownFailure {
        /// 连接池名称
        pool: String,
        /// 底层错误信息
        message: String,
    },

    /// 连接池操作失败
    #[error("{}", pool_msg(.message))]
    PoolError {
        /// 错误信息
        message: String,
    },

    /// 连接池别名未找到
    #[error("{}", alias_not_found_msg(.alias))]
    AliasNotFound {
        /// 别名
        alias: String,
    },

    /// 不支持的驱动类型
    #[error("{}", unsupported_driver_msg(.driver))]
    UnsupportedDriver {
        /// 驱动名
        driver: String,
    },

    /// IO错误
    #[error("IO错误: {0}")]
    IoError(#[from] std::io::Error),
}

impl PoolError {
    /// 从违规项列表构造校验失败错误
    pub fn from_violations(violations: Vec<ConfigViolation>) -> Self {
        PoolError::ValidationFailed { violations }
    }

    /// 取出校验违规项列表（非校验错误返回空切片）
    pub fn violations(&self) -> &[ConfigViolation] {
        match self {
            PoolError::ValidationFailed { violations } => violations,
            _ => &[],
        }
    }
}

fn missing_required_field_msg(field: &str) -> String {
    crate::i18n::tf("error.missing_required_field", &[("field", field)])
}

fn out_of_range_value_msg(field: &str, value: &str, minimum: &str) -> String {
    crate::i18n::tf(
        "error.out_of_range_value",
        &[("field", field), ("value", value), ("minimum", minimum)],
    )
}

fn inconsistent_range_msg(
    min_field: &str,
    min_value: &u32,
    max_field: &str,
    max_value: &u32,
) -> String {
    crate::i18n::tf(
        "error.inconsistent_range",
        &[
            ("min_field", min_field),
            ("min_value", min_value.to_string().as_str()),
            ("max_field", max_field),
            ("max_value", max_value.to_string().as_str()),
        ],
    )
}

fn validation_failed_msg(violations: &[ConfigViolation]) -> String {
    let details = violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ");
    crate::i18n::tf(
        "error.validation_failed",
        &[
            ("count", violations.len().to_string().as_str()),
            ("details", details.as_str()),
        ],
    )
}

fn config_msg(message: &str) -> String {
    crate::i18n::tf("error.config", &[("message", message)])
}

fn engine_construction_msg(pool: &str, message: &str) -> String {
    crate::i18n::tf(
        "error.engine_construction",
        &[("pool", pool), ("message", message)],
    )
}

fn shutdown_msg(pool: &str, message: &str) -> String {
    crate::i18n::tf("error.shutdown", &[("pool", pool), ("message", message)])
}

fn pool_msg(message: &str) -> String {
    crate::i18n::tf("error.pool", &[("message", message)])
}

fn alias_not_found_msg(alias: &str) -> String {
    crate::i18n::tf("error.alias_not_found", &[("alias", alias)])
}

fn unsupported_driver_msg(driver: &str) -> String {
    crate::i18n::tf("error.unsupported_driver", &[("driver", driver)])
}

/// 快捷错误构造宏
///
/// # 示例
///
/// ```ignore
/// return Err(crate::pool_error!(config, "连接池名称必须设置"));
/// ```
#[macro_export]
macro_rules! pool_error {
    (config, $msg:expr) => {
        $crate::error::PoolError::ConfigError {
            message: $msg.to_string(),
        }
    };
    (pool, $msg:expr) => {
        $crate::error::PoolError::PoolError {
            message: $msg.to_string(),
        }
    };
    (alias_not_found, $alias:expr) => {
        $crate::error::PoolError::AliasNotFound {
            alias: $alias.to_string(),
        }
    };
    (unsupported_driver, $driver:expr) => {
        $crate::error::PoolError::UnsupportedDriver {
            driver: $driver.to_string(),
        }
    };
    (engine, $pool:expr, $msg:expr) => {
        $crate::error::PoolError::EngineConstructionFailure {
            pool: $pool.to_string(),
            message: $msg.to_string(),
        }
    };
    (shutdown, $pool:expr, $msg:expr) => {
        $crate::error::PoolError::ShutdownFailure {
            pool: $pool.to_string(),
            message: $msg.to_string(),
        }
    };
}
