//! 多语言错误消息模块
//!
//! 使用rat_embed_lang框架提供统一的错误消息多语言支持

use rat_embed_lang::register_translations;
use std::collections::HashMap;

/// 错误消息翻译注册器
pub struct ErrorMessageI18n;

impl ErrorMessageI18n {
    /// 注册所有错误消息翻译
    pub fn register_all_translations() {
        let mut translations = HashMap::new();

        // 必填字段缺失
        let mut missing_field_errors = HashMap::new();
        missing_field_errors.insert("zh-CN".to_string(), "必填字段 '{field}' 未设置".to_string());
        missing_field_errors.insert(
            "en-US".to_string(),
            "Required field '{field}' is not set".to_string(),
        );
        missing_field_errors.insert(
            "ja-JP".to_string(),
            "必須フィールド '{field}' が設定されていません".to_string(),
        );
        translations.insert("error.missing_required_field".to_string(), missing_field_errors);

        // 字段取值越界
        let mut out_of_range_errors = HashMap::new();
        out_of_range_errors.insert(
            "zh-CN".to_string(),
            "字段 '{field}' 的值 {value} 低于允许的最小值 {minimum}".to_string(),
        );
        out_of_range_errors.insert(
            "en-US".to_string(),
            "Field '{field}' value {value} is below the allowed minimum {minimum}".to_string(),
        );
        out_of_range_errors.insert(
            "ja-JP".to_string(),
            "フィールド '{field}' の値 {value} は許容最小値 {minimum} を下回っています".to_string(),
        );
        translations.insert("error.out_of_range_value".to_string(), out_of_range_errors);

        // 跨字段约束不成立
        let mut inconsistent_range_errors = HashMap::new();
        inconsistent_range_errors.insert(
            "zh-CN".to_string(),
            "{min_field} ({min_value}) 不能大于 {max_field} ({max_value})".to_string(),
        );
        inconsistent_range_errors.insert(
            "en-US".to_string(),
            "{min_field} ({min_value}) must not exceed {max_field} ({max_value})".to_string(),
        );
        inconsistent_range_errors.insert(
            "ja-JP".to_string(),
            "{min_field} ({min_value}) は {max_field} ({max_value}) を超えてはいけません".to_string(),
        );
        translations.insert("error.inconsistent_range".to_string(), inconsistent_range_errors);

        // 配置校验失败（聚合）
        let mut validation_failed_errors = HashMap::new();
        validation_failed_errors.insert(
            "zh-CN".to_string(),
            "配置校验失败，共 {count} 项: {details}".to_string(),
        );
        validation_failed_errors.insert(
            "en-US".to_string(),
            "Configuration validation failed with {count} violation(s): {details}".to_string(),
        );
        validation_failed_errors.insert(
            "ja-JP".to_string(),
            "設定検証に失敗しました（{count} 件）: {details}".to_string(),
        );
        translations.insert("error.validation_failed".to_string(), validation_failed_errors);

        // 配置错误
        let mut config_errors = HashMap::new();
        config_errors.insert("zh-CN".to_string(), "配置错误: {message}".to_string());
        config_errors.insert("en-US".to_string(), "Configuration error: {message}".to_string());
        config_errors.insert("ja-JP".to_string(), "設定エラー: {message}".to_string());
        translations.insert("error.config".to_string(), config_errors);

        // 引擎构建连接池失败
        let mut engine_construction_errors = HashMap::new();
        engine_construction_errors.insert(
            "zh-CN".to_string(),
            "连接池 '{pool}' 构建失败: {message}".to_string(),
        );
        engine_construction_errors.insert(
            "en-US".to_string(),
            "Failed to construct pool '{pool}': {message}".to_string(),
        );
        engine_construction_errors.insert(
            "ja-JP".to_string(),
            "接続プール '{pool}' の構築に失敗しました: {message}".to_string(),
        );
        translations.insert("error.engine_construction".to_string(), engine_construction_errors);

        // 关闭连接池失败
        let mut shutdown_errors = HashMap::new();
        shutdown_errors.insert(
            "zh-CN".to_string(),
            "连接池 '{pool}' 关闭失败: {message}".to_string(),
        );
        shutdown_errors.insert(
            "en-US".to_string(),
            "Failed to shut down pool '{pool}': {message}".to_string(),
        );
        shutdown_errors.insert(
            "ja-JP".to_string(),
            "接続プール '{pool}' の停止に失敗しました: {message}".to_string(),
        );
        translations.insert("error.shutdown".to_string(), shutdown_errors);

        // 连接池错误
        let mut pool_errors = HashMap::new();
        pool_errors.insert("zh-CN".to_string(), "连接池操作失败: {message}".to_string());
        pool_errors.insert(
            "en-US".to_string(),
            "Connection pool operation failed: {message}".to_string(),
        );
        pool_errors.insert(
            "ja-JP".to_string(),
            "接続プール操作が失敗しました: {message}".to_string(),
        );
        translations.insert("error.pool".to_string(), pool_errors);

        // 连接池别名未找到
        let mut alias_not_found_errors = HashMap::new();
        alias_not_found_errors.insert("zh-CN".to_string(), "连接池别名 '{alias}' 未找到".to_string());
        alias_not_found_errors.insert(
            "en-US".to_string(),
            "Pool alias '{alias}' not found".to_string(),
        );
        alias_not_found_errors.insert(
            "ja-JP".to_string(),
            "接続プールエイリアス '{alias}' が見つかりません".to_string(),
        );
        translations.insert("error.alias_not_found".to_string(), alias_not_found_errors);

        // 不支持的驱动类型
        let mut unsupported_driver_errors = HashMap::new();
        unsupported_driver_errors.insert(
            "zh-CN".to_string(),
            "不支持的驱动类型: {driver}".to_string(),
        );
        unsupported_driver_errors.insert(
            "en-US".to_string(),
            "Unsupported driver type: {driver}".to_string(),
        );
        unsupported_driver_errors.insert(
            "ja-JP".to_string(),
            "サポートされていないドライバータイプ: {driver}".to_string(),
        );
        translations.insert("error.unsupported_driver".to_string(), unsupported_driver_errors);

        // 注册所有翻译
        register_translations(translations);
    }

    /// 初始化错误消息多语言支持
    pub fn init() {
        Self::register_all_translations();

        // 从环境变量获取语言设置，默认为zh-CN
        let lang = std::env::var("RAT_LANG")
            .or_else(|_| std::env::var("LANG"))
            .unwrap_or_else(|_| "zh-CN".to_string());

        // 标准化语言代码
        use rat_embed_lang::normalize_language_code;
        let normalized_lang = normalize_language_code(&lang);
        set_language(&normalized_lang);
    }
}

/// 重新导出rat_embed_lang的核心函数
pub use rat_embed_lang::{current_language, set_language, t, tf};
