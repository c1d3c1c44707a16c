//! 带单位的时间跨度类型
//!
//! 配置中的时间项全部使用本类型表达，单位在赋值给引擎描述符时
//! 才统一换算为毫秒，中间表示不做任何换算

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::PoolError;

/// 时间单位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeUnit {
    /// 毫秒
    Milliseconds,
    /// 秒
    Seconds,
    /// 分钟
    Minutes,
    /// 小时
    Hours,
}

impl TimeUnit {
    /// 单位对应的毫秒数
    pub const fn millis_per_unit(&self) -> u64 {
        match self {
            TimeUnit::Milliseconds => 1,
            TimeUnit::Seconds => 1_000,
            TimeUnit::Minutes => 60_000,
            TimeUnit::Hours => 3_600_000,
        }
    }

    /// 单位的紧凑后缀表示
    pub const fn suffix(&self) -> &'static str {
        match self {
            TimeUnit::Milliseconds => "ms",
            TimeUnit::Seconds => "s",
            TimeUnit::Minutes => "m",
            TimeUnit::Hours => "h",
        }
    }
}

/// 带单位的时间跨度
///
/// 相等性与排序按毫秒值比较，`Duration::seconds(1) == Duration::milliseconds(1000)`
#[derive(Debug, Clone, Copy)]
pub struct Duration {
    count: u64,
    unit: TimeUnit,
}

impl Duration {
    /// 创建毫秒时间跨度
    pub const fn milliseconds(count: u64) -> Self {
        Self {
            count,
            unit: TimeUnit::Milliseconds,
        }
    }

    /// 创建秒时间跨度
    pub const fn seconds(count: u64) -> Self {
        Self {
            count,
            unit: TimeUnit::Seconds,
        }
    }

    /// 创建分钟时间跨度
    pub const fn minutes(count: u64) -> Self {
        Self {
            count,
            unit: TimeUnit::Minutes,
        }
    }

    /// 创建小时时间跨度
    pub const fn hours(count: u64) -> Self {
        Self {
            count,
            unit: TimeUnit::Hours,
        }
    }

    /// 数量部分
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// 单位部分
    pub const fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// 换算为毫秒
    pub const fn as_millis(&self) -> u64 {
        self.count.saturating_mul(self.unit.millis_per_unit())
    }

    /// 换算为整秒（向下取整）
    pub const fn as_secs(&self) -> u64 {
        self.as_millis() / 1_000
    }

    /// 转换为标准库时间跨度
    pub fn to_std(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.as_millis())
    }
}

impl PartialEq for Duration {
    fn eq(&self, other: &Self) -> bool {
        self.as_millis() == other.as_millis()
    }
}

impl Eq for Duration {}

impl PartialOrd for Duration {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Duration {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_millis().cmp(&other.as_millis())
    }
}

impl Hash for Duration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_millis().hash(state);
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.count, self.unit.suffix())
    }
}

impl FromStr for Duration {
    type Err = PoolError;

    /// 解析紧凑文本形式: `500ms` / `30s` / `5m` / `1h`，纯数字按秒处理
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(crate::pool_error!(config, "时间跨度不能为空字符串"));
        }

        let (digits, unit) = if let Some(rest) = trimmed.strip_suffix("ms") {
            (rest, TimeUnit::Milliseconds)
        } else if let Some(rest) = trimmed.strip_suffix('s') {
            (rest, TimeUnit::Seconds)
        } else if let Some(rest) = trimmed.strip_suffix('m') {
            (rest, TimeUnit::Minutes)
        } else if let Some(rest) = trimmed.strip_suffix('h') {
            (rest, TimeUnit::Hours)
        } else {
            (trimmed, TimeUnit::Seconds)
        };

        let count = digits.trim().parse::<u64>().map_err(|e| {
            crate::pool_error!(config, format!("无法解析时间跨度 '{}': {}", s, e))
        })?;

        Ok(Duration { count, unit })
    }
}

impl Serialize for Duration {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DurationVisitor;

        impl<'de> Visitor<'de> for DurationVisitor {
            type Value = Duration;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("时间跨度字符串（如 \"30s\"）或整数秒")
            }

            fn visit_str<E>(self, value: &str) -> Result<Duration, E>
            where
                E: de::Error,
            {
                Duration::from_str(value).map_err(|e| E::custom(e.to_string()))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Duration, E>
            where
                E: de::Error,
            {
                Ok(Duration::seconds(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Duration, E>
            where
                E: de::Error,
            {
                if value < 0 {
                    return Err(E::custom("时间跨度不能为负数"));
                }
                Ok(Duration::seconds(value as u64))
            }
        }

        deserializer.deserialize_any(DurationVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_conversion() {
        assert_eq!(Duration::seconds(30).as_millis(), 30_000);
        assert_eq!(Duration::minutes(1).as_millis(), 60_000);
        assert_eq!(Duration::hours(2).as_secs(), 7_200);
        assert_eq!(Duration::milliseconds(1500).as_secs(), 1);
    }

    #[test]
    fn test_equality_across_units() {
        assert_eq!(Duration::seconds(1), Duration::milliseconds(1000));
        assert_eq!(Duration::minutes(1), Duration::seconds(60));
        assert!(Duration::milliseconds(999) < Duration::seconds(1));
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("500ms".parse::<Duration>().unwrap(), Duration::milliseconds(500));
        assert_eq!("30s".parse::<Duration>().unwrap(), Duration::seconds(30));
        assert_eq!("5m".parse::<Duration>().unwrap(), Duration::minutes(5));
        assert_eq!("1h".parse::<Duration>().unwrap(), Duration::hours(1));
        // 纯数字按秒处理
        assert_eq!("45".parse::<Duration>().unwrap(), Duration::seconds(45));

        assert_eq!(Duration::minutes(5).to_string(), "5m");
        assert_eq!(Duration::milliseconds(250).to_string(), "250ms");
    }

    #[test]
    fn test_parse_invalid() {
        assert!("".parse::<Duration>().is_err());
        assert!("abc".parse::<Duration>().is_err());
        assert!("-5s".parse::<Duration>().is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let d: Duration = serde_json::from_str("\"90s\"").unwrap();
        assert_eq!(d, Duration::seconds(90));

        let d: Duration = serde_json::from_str("15").unwrap();
        assert_eq!(d, Duration::seconds(15));

        assert_eq!(serde_json::to_string(&Duration::seconds(5)).unwrap(), "\"5s\"");
    }
}
