//! 指标接收器模块
//!
//! 接收器是调用者提供的不透明句柄，随描述符传入引擎；
//! 指标的落地方式（注册表、导出格式）完全由调用者决定

use rat_logger::debug;

/// 指标接收器接口
///
/// 引擎在连接池关键事件上回调；所有实现必须线程安全
pub trait MetricsSink: Send + Sync + std::fmt::Debug {
    /// 连接池构建完成
    fn pool_created(&self, pool: &str);

    /// 借出一个连接
    fn connection_acquired(&self, pool: &str);

    /// 归还一个连接
    fn connection_released(&self, pool: &str);

    /// 连接池已关闭
    fn pool_closed(&self, pool: &str);
}

/// 空指标接收器 - 丢弃所有事件
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetricsSink;

impl MetricsSink for NoopMetricsSink {
    fn pool_created(&self, _pool: &str) {}

    fn connection_acquired(&self, _pool: &str) {}

    fn connection_released(&self, _pool: &str) {}

    fn pool_closed(&self, _pool: &str) {}
}

/// 日志指标接收器 - 将连接池事件输出到日志系统
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMetricsSink;

impl MetricsSink for LogMetricsSink {
    fn pool_created(&self, pool: &str) {
        debug!("连接池指标: 池 {} 已创建", pool);
    }

    fn connection_acquired(&self, pool: &str) {
        debug!("连接池指标: 池 {} 借出连接", pool);
    }

    fn connection_released(&self, pool: &str) {
        debug!("连接池指标: 池 {} 归还连接", pool);
    }

    fn pool_closed(&self, pool: &str) {
        debug!("连接池指标: 池 {} 已关闭", pool);
    }
}
