//! 配置校验模块
//!
//! 在任何构建动作之前同步执行。规则逐条独立，可单独测试；
//! 一次校验收集全部违规项后统一返回，不在第一条失败处短路

use rat_logger::warn;

use crate::error::{ConfigViolation, PoolError, PoolResult};
use crate::types::{Duration, PoolSettings};

/// 所有带下界的时间字段共用的最小值
pub const MIN_DURATION: Duration = Duration::seconds(1);

/// 校验连接池配置
///
/// # 错误
///
/// 存在违规项时返回 `ValidationFailed`，携带本轮收集到的全部违规项
pub fn validate(settings: &PoolSettings) -> PoolResult<()> {
    let mut violations = Vec::new();

    check_required_fields(settings, &mut violations);
    check_duration_bounds(settings, &mut violations);
    check_size_range(settings, &mut violations);

    if violations.is_empty() {
        Ok(())
    } else {
        warn!("连接池配置校验失败，共 {} 项违规", violations.len());
        Err(PoolError::from_violations(violations))
    }
}

/// 规则1：必填字段非空（空字符串视同缺失）
fn check_required_fields(settings: &PoolSettings, violations: &mut Vec<ConfigViolation>) {
    if settings.driver_class.trim().is_empty() {
        violations.push(ConfigViolation::MissingRequiredField {
            field: "driver_class",
        });
    }
    if settings.url.trim().is_empty() {
        violations.push(ConfigViolation::MissingRequiredField { field: "url" });
    }
}

/// 规则2：带下界的时间字段在设置时必须不低于下界
fn check_duration_bounds(settings: &PoolSettings, violations: &mut Vec<ConfigViolation>) {
    let bounded: [(&'static str, Option<Duration>); 11] = [
        (
            "max_wait_for_connection",
            Some(settings.max_wait_for_connection),
        ),
        ("min_idle_time", Some(settings.min_idle_time)),
        ("eviction_interval", Some(settings.eviction_interval)),
        ("validation_interval", Some(settings.validation_interval)),
        (
            "remove_abandoned_timeout",
            Some(settings.remove_abandoned_timeout),
        ),
        (
            "validation_query_timeout",
            settings.validation_query_timeout,
        ),
        ("connection_timeout", settings.connection_timeout),
        ("idle_timeout", settings.idle_timeout),
        ("max_connection_age", settings.max_connection_age),
        (
            "initialization_fail_timeout",
            settings.initialization_fail_timeout,
        ),
        ("validation_timeout", settings.validation_timeout),
    ];

    for (field, value) in bounded {
        if let Some(duration) = value {
            if duration < MIN_DURATION {
                violations.push(ConfigViolation::OutOfRangeValue {
                    field,
                    value: duration.to_string(),
                    minimum: MIN_DURATION.to_string(),
                });
            }
        }
    }
}

/// 规则3：跨字段约束 min_size <= max_size
fn check_size_range(settings: &PoolSettings, violations: &mut Vec<ConfigViolation>) {
    if settings.min_size > settings.max_size {
        violations.push(ConfigViolation::InconsistentRange {
            min_field: "min_size",
            min_value: settings.min_size,
            max_field: "max_size",
            max_value: settings.max_size,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legal_settings() -> PoolSettings {
        PoolSettings {
            driver_class: "postgres".to_string(),
            url: "postgres://localhost/demo".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_legal_settings_pass() {
        assert!(validate(&legal_settings()).is_ok());
    }

    #[test]
    fn test_empty_settings_fail_on_required_fields() {
        let err = validate(&PoolSettings::default()).unwrap_err();
        let violations = err.violations();
        assert_eq!(violations.len(), 2);
        assert!(violations.contains(&ConfigViolation::MissingRequiredField {
            field: "driver_class"
        }));
        assert!(violations.contains(&ConfigViolation::MissingRequiredField { field: "url" }));
    }

    #[test]
    fn test_missing_url_only() {
        let mut settings = legal_settings();
        settings.url = String::new();
        let err = validate(&settings).unwrap_err();
        assert_eq!(
            err.violations(),
            &[ConfigViolation::MissingRequiredField { field: "url" }]
        );
    }

    #[test]
    fn test_size_range_rule() {
        let mut settings = legal_settings();
        settings.min_size = 50;
        settings.max_size = 10;
        let err = validate(&settings).unwrap_err();
        assert_eq!(
            err.violations(),
            &[ConfigViolation::InconsistentRange {
                min_field: "min_size",
                min_value: 50,
                max_field: "max_size",
                max_value: 10,
            }]
        );
        // 错误消息同时引用两个字段名和两个取值
        crate::init();
        let message = err.to_string();
        assert!(message.contains("min_size"));
        assert!(message.contains("max_size"));
        assert!(message.contains("50"));
        assert!(message.contains("10"));
    }

    #[test]
    fn test_duration_bound_rule_on_optional_field() {
        let mut settings = legal_settings();
        settings.connection_timeout = Some(Duration::milliseconds(500));
        let err = validate(&settings).unwrap_err();
        assert_eq!(
            err.violations(),
            &[ConfigViolation::OutOfRangeValue {
                field: "connection_timeout",
                value: "500ms".to_string(),
                minimum: "1s".to_string(),
            }]
        );
    }

    #[test]
    fn test_duration_bound_rule_on_required_field() {
        let mut settings = legal_settings();
        settings.eviction_interval = Duration::milliseconds(10);
        let err = validate(&settings).unwrap_err();
        assert_eq!(err.violations().len(), 1);
        assert!(matches!(
            err.violations()[0],
            ConfigViolation::OutOfRangeValue {
                field: "eviction_interval",
                ..
            }
        ));
    }

    #[test]
    fn test_unset_optional_durations_do_not_trigger_bound_rule() {
        // 缺省不等于零值，不触发下界规则
        assert!(validate(&legal_settings()).is_ok());
    }

    #[test]
    fn test_exact_bound_is_legal() {
        let mut settings = legal_settings();
        settings.validation_query_timeout = Some(Duration::seconds(1));
        settings.idle_timeout = Some(Duration::milliseconds(1000));
        assert!(validate(&settings).is_ok());
    }

    #[test]
    fn test_violations_aggregate() {
        let mut settings = PoolSettings::default();
        settings.min_size = 9;
        settings.max_size = 3;
        settings.validation_timeout = Some(Duration::milliseconds(1));
        // 必填字段2项 + 时间下界1项 + 跨字段1项
        let err = validate(&settings).unwrap_err();
        assert_eq!(err.violations().len(), 4);
    }
}
