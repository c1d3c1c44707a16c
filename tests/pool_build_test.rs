#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;

    use rat_dbpool::{
        build_managed_pool, ConfigViolation, Duration, EnginePool, LifecycleState, Managed,
        ManagedPool, PoolEngine, PoolError, PoolSettings, PooledLease, TransactionIsolation,
    };

    /// 记录构建次数的引擎桩
    #[derive(Debug, Default)]
    struct RecordingEngine {
        construct_count: AtomicUsize,
    }

    #[derive(Debug, Default)]
    struct RecordingPool {
        name: String,
        close_count: AtomicUsize,
    }

    #[async_trait]
    impl EnginePool for RecordingPool {
        async fn acquire(&self) -> Result<PooledLease, PoolError> {
            Ok(PooledLease {
                id: "lease-0".to_string(),
                pool_name: self.name.clone(),
            })
        }

        async fn release(&self, _lease: &PooledLease) -> Result<(), PoolError> {
            Ok(())
        }

        async fn ping(&self) -> Result<(), PoolError> {
            Ok(())
        }

        async fn close(&self) -> Result<(), PoolError> {
            self.close_count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn is_closed(&self) -> bool {
            self.close_count.load(Ordering::SeqCst) > 0
        }
    }

    #[async_trait]
    impl PoolEngine for RecordingEngine {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn construct(
            &self,
            descriptor: rat_dbpool::PoolDescriptor,
        ) -> Result<Arc<dyn EnginePool>, PoolError> {
            self.construct_count.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(RecordingPool {
                name: descriptor.pool_name,
                close_count: AtomicUsize::new(0),
            }))
        }
    }

    fn legal_settings() -> PoolSettings {
        PoolSettings {
            driver_class: "org.x.Driver".to_string(),
            url: "jdbc:x://h/db".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_full_build_flow() {
        rat_dbpool::init();

        let settings = PoolSettings::builder()
            .driver_class("org.x.Driver")
            .url("jdbc:x://h/db")
            .min_size(1)
            .max_size(1)
            .validation_query("SELECT 1")
            .build()
            .unwrap();

        let engine = RecordingEngine::default();
        let managed: ManagedPool = build_managed_pool(&settings, "orders", None, &engine)
            .await
            .unwrap();
        assert_eq!(engine.construct_count.load(Ordering::SeqCst), 1);
        assert_eq!(managed.pool_name(), "orders");
        assert_eq!(managed.state(), LifecycleState::Created);

        managed.start().await.unwrap();
        let lease = managed.acquire().await.unwrap();
        managed.release(&lease).await.unwrap();
        managed.ping().await.unwrap();

        managed.stop().await.unwrap();
        managed.stop().await.unwrap();
        assert_eq!(managed.state(), LifecycleState::Stopped);
    }

    #[tokio::test]
    async fn test_validation_failure_never_reaches_engine() {
        let mut settings = legal_settings();
        settings.min_size = 50;
        settings.max_size = 10;

        let engine = RecordingEngine::default();
        let err = build_managed_pool(&settings, "orders", None, &engine)
            .await
            .unwrap_err();

        match &err {
            PoolError::ValidationFailed { violations } => {
                assert_eq!(
                    violations.as_slice(),
                    &[ConfigViolation::InconsistentRange {
                        min_field: "min_size",
                        min_value: 50,
                        max_field: "max_size",
                        max_value: 10,
                    }]
                );
            }
            other => panic!("意外的错误类型: {:?}", other),
        }
        // 校验失败时引擎从未被触达
        assert_eq!(engine.construct_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_all_violations_reported_together() {
        let mut settings = PoolSettings::default();
        settings.min_size = 5;
        settings.max_size = 2;
        settings.connection_timeout = Some(Duration::milliseconds(100));

        let engine = RecordingEngine::default();
        let err = build_managed_pool(&settings, "orders", None, &engine)
            .await
            .unwrap_err();

        // driver_class + url + 跨字段 + 时间下界，一次性全部上报
        assert_eq!(err.violations().len(), 4);
    }

    #[tokio::test]
    async fn test_single_connection_pool_before_build() {
        let mut settings = legal_settings();
        settings.min_size = 30;
        settings.max_size = 60;
        settings.as_single_connection_pool();

        let engine = RecordingEngine::default();
        let managed = build_managed_pool(&settings, "solo", None, &engine)
            .await
            .unwrap();
        assert_eq!(managed.pool_name(), "solo");
        assert_eq!(settings.min_size, 1);
        assert_eq!(settings.max_size, 1);
    }

    #[tokio::test]
    async fn test_deserialized_settings_build() {
        let json = r#"{
            "driver_class": "org.x.Driver",
            "url": "jdbc:x://h/db",
            "user": "app",
            "min_size": 2,
            "max_size": 4,
            "max_wait_for_connection": "10s",
            "connection_timeout": "3s",
            "default_transaction_isolation": "read_committed",
            "properties": {"socketTimeout": "15", "tcpKeepAlive": "true"}
        }"#;
        let settings: PoolSettings = serde_json::from_str(json).unwrap();
        assert_eq!(
            settings.default_transaction_isolation,
            Some(TransactionIsolation::ReadCommitted)
        );

        let descriptor = rat_dbpool::build_descriptor(&settings, "from_json", None);
        assert_eq!(descriptor.max_wait_for_connection_ms, 10_000);
        assert_eq!(descriptor.connection_timeout_ms, Some(3_000));
        // user 已设置而 password 缺省 => 空字符串
        assert_eq!(descriptor.password, Some(String::new()));
        // 未设置的可选时间项保持缺省
        assert!(descriptor.idle_timeout_ms.is_none());
        let keys: Vec<&str> = descriptor.properties.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["socketTimeout", "tcpKeepAlive"]);
    }

    #[cfg(feature = "sqlite-support")]
    #[tokio::test]
    async fn test_sqlite_end_to_end() {
        let settings = PoolSettings::builder()
            .driver_class("sqlite")
            .url("sqlite::memory:")
            .min_size(1)
            .max_size(2)
            .max_wait_for_connection(Duration::seconds(5))
            .build()
            .unwrap();

        let engine = rat_dbpool::create_engine(&settings.driver_class).unwrap();
        let managed = build_managed_pool(&settings, "e2e", None, engine.as_ref())
            .await
            .unwrap();

        managed.start().await.unwrap();
        managed.ping().await.unwrap();
        let lease = managed.acquire().await.unwrap();
        managed.release(&lease).await.unwrap();
        managed.stop().await.unwrap();
        assert!(managed.is_closed());
    }
}
