//! Integration tests for real-world wiring patterns.
//!
//! These mirror how an application assembles itself: modules publish the
//! capabilities they provide and wait for the ones they need, in whatever order
//! the composition root happens to construct them.
//!
//! NOTE: All tests use #[serial] because they share the same registry (wiring).

mod common;

use depkit::{define_registry, Registry, RegistryApi};
use serial_test::serial;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

define_registry!(wiring);

trait Config: Send + Sync {
    fn database_url(&self) -> &str;
    fn max_connections(&self) -> u32;
}

trait Database: Send + Sync {
    fn describe(&self) -> String;
}

trait Plugin: Send + Sync {
    fn name(&self) -> &str;
}

struct StaticConfig;

impl Config for StaticConfig {
    fn database_url(&self) -> &str {
        "postgresql://localhost/mydb"
    }

    fn max_connections(&self) -> u32 {
        100
    }
}

/// A module that needs `Config` and provides `Database`.
struct Pool {
    config: Arc<dyn Config>,
}

impl Database for Pool {
    fn describe(&self) -> String {
        format!(
            "{} ({} connections)",
            self.config.database_url(),
            self.config.max_connections()
        )
    }
}

/// Registers the pool as soon as its configuration is available.
fn install_pool() {
    wiring::get_after_register::<dyn Config, _>(|config| {
        wiring::register::<dyn Database>(Arc::new(Pool { config })).unwrap();
    })
    .unwrap();
}

#[test]
#[serial]
fn test_configuration_pattern() {
    common::init_tracing();
    wiring::reset();

    wiring::register::<dyn Config>(Arc::new(StaticConfig)).unwrap();

    let config = wiring::get::<dyn Config>().unwrap();
    assert_eq!(config.database_url(), "postgresql://localhost/mydb");
    assert_eq!(config.max_connections(), 100);
}

#[test]
#[serial]
fn test_consumer_before_provider() {
    wiring::reset();

    install_pool();
    assert!(!wiring::contains::<dyn Database>().unwrap());

    wiring::register::<dyn Config>(Arc::new(StaticConfig)).unwrap();

    assert_eq!(
        wiring::require::<dyn Database>().describe(),
        "postgresql://localhost/mydb (100 connections)"
    );
}

#[test]
#[serial]
fn test_provider_before_consumer() {
    wiring::reset();

    wiring::register::<dyn Config>(Arc::new(StaticConfig)).unwrap();
    install_pool();

    assert_eq!(
        wiring::require::<dyn Database>().describe(),
        "postgresql://localhost/mydb (100 connections)"
    );
}

#[test]
#[serial]
fn test_chained_wiring() {
    wiring::reset();

    let report = Arc::new(Mutex::new(None));
    let report_clone = Arc::clone(&report);

    // Third stage waits on the second, which waits on the first
    wiring::get_after_register::<dyn Database, _>(move |db| {
        *report_clone.lock().unwrap() = Some(db.describe());
    })
    .unwrap();
    install_pool();

    wiring::register::<dyn Config>(Arc::new(StaticConfig)).unwrap();

    assert_eq!(
        report.lock().unwrap().as_deref(),
        Some("postgresql://localhost/mydb (100 connections)")
    );
}

#[test]
#[serial]
fn test_factory_pattern() {
    wiring::reset();

    #[derive(Debug, PartialEq)]
    struct User {
        name: String,
        id: u32,
    }

    type UserFactory = dyn Fn(String) -> User + Send + Sync;

    let next_id = Arc::new(AtomicU32::new(0));
    let next_id_clone = Arc::clone(&next_id);
    wiring::register::<UserFactory>(Arc::new(move |name: String| User {
        name,
        id: next_id_clone.fetch_add(1, Ordering::SeqCst) + 1,
    }))
    .unwrap();

    let factory = wiring::get::<UserFactory>().unwrap();
    let user1 = factory("Alice".to_string());
    let user2 = factory("Bob".to_string());

    assert_eq!(user1.id, 1);
    assert_eq!(user2.id, 2);
    assert_eq!(user2.name, "Bob");
}

#[test]
#[serial]
fn test_plugin_list_pattern() {
    wiring::reset();

    trait Plugins: Send + Sync {
        fn all(&self) -> &[Arc<dyn Plugin>];
    }

    struct LogPlugin;

    impl Plugin for LogPlugin {
        fn name(&self) -> &str {
            "Logger"
        }
    }

    struct CachePlugin;

    impl Plugin for CachePlugin {
        fn name(&self) -> &str {
            "Cache"
        }
    }

    struct PluginList(Vec<Arc<dyn Plugin>>);

    impl Plugins for PluginList {
        fn all(&self) -> &[Arc<dyn Plugin>] {
            &self.0
        }
    }

    wiring::register::<dyn Plugins>(Arc::new(PluginList(vec![
        Arc::new(LogPlugin),
        Arc::new(CachePlugin),
    ])))
    .unwrap();

    let plugins = wiring::get::<dyn Plugins>().unwrap();
    let names: Vec<&str> = plugins.all().iter().map(|p| p.name()).collect();
    assert_eq!(names, vec!["Logger", "Cache"]);
}

#[test]
#[serial]
fn test_lazy_initialization_pattern() {
    wiring::reset();

    static INIT: OnceLock<()> = OnceLock::new();

    fn config() -> Arc<dyn Config> {
        INIT.get_or_init(|| {
            wiring::register::<dyn Config>(Arc::new(StaticConfig)).unwrap();
        });
        wiring::require::<dyn Config>()
    }

    let first = config();
    let second = config();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_registry_passed_explicitly() {
    // Libraries take the registry as a parameter instead of reaching for a global
    fn install(registry: &Arc<Registry>) {
        let inner = Arc::clone(registry);
        registry
            .get_after_register::<dyn Config, _>(move |config| {
                inner
                    .register::<dyn Database>(Arc::new(Pool { config }))
                    .unwrap();
            })
            .unwrap();
    }

    let registry = Arc::new(Registry::new());
    install(&registry);
    registry
        .register::<dyn Config>(Arc::new(StaticConfig))
        .unwrap();

    assert!(registry.contains::<dyn Database>().unwrap());
    registry.reset();
}
