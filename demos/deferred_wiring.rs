//! Deferred wiring example for depkit.
//!
//! Demonstrates:
//! - Waiting for a capability with `get_after_register()`
//! - Modules constructed in any order still find each other
//! - Passing an explicit `Registry` instead of a global
//!
//! Run with: `RUST_LOG=depkit=debug cargo run --example deferred_wiring`

use depkit::{Registry, RegistryApi, RegistryEvent};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// =============================================================================
// Contracts
// =============================================================================

trait Config: Send + Sync {
    fn greeting(&self) -> &str;
}

trait Greeter: Send + Sync {
    fn greet(&self, name: &str) -> String;
}

/// Function capability: the registry stores the closure itself.
type Shout = dyn Fn(&str) -> String + Send + Sync;

// =============================================================================
// Modules
// =============================================================================

struct StaticConfig;

impl Config for StaticConfig {
    fn greeting(&self) -> &str {
        "Hello"
    }
}

struct ConfiguredGreeter {
    config: Arc<dyn Config>,
}

impl Greeter for ConfiguredGreeter {
    fn greet(&self, name: &str) -> String {
        format!("{}, {}!", self.config.greeting(), name)
    }
}

/// Publishes a `Greeter` once a `Config` is available.
fn install_greeter(registry: &Arc<Registry>) {
    let inner = Arc::clone(registry);
    registry
        .get_after_register::<dyn Config, _>(move |config| {
            println!("   [greeter] Config arrived, registering Greeter");
            inner
                .register::<dyn Greeter>(Arc::new(ConfiguredGreeter { config }))
                .unwrap();
        })
        .unwrap();
}

/// Publishes a `Shout` function once a `Greeter` is available.
fn install_shout(registry: &Arc<Registry>) {
    let inner = Arc::clone(registry);
    registry
        .get_after_register::<dyn Greeter, _>(move |greeter| {
            println!("   [shout] Greeter arrived, registering Shout");
            inner
                .register::<Shout>(Arc::new(move |name: &str| {
                    greeter.greet(name).to_uppercase()
                }))
                .unwrap();
        })
        .unwrap();
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== depkit: Deferred Wiring ===\n");

    let registry = Arc::new(Registry::new());
    registry.set_trace_callback(|event| {
        if let RegistryEvent::Deferred { id } = event {
            println!("   [trace] waiting for {}", id);
        }
    });

    // -------------------------------------------------------------------------
    // 1. Consumers first, in reverse dependency order
    // -------------------------------------------------------------------------
    println!("1. Installing consumers before their providers...");

    install_shout(&registry);
    install_greeter(&registry);

    println!(
        "   pending: Greeter={}, Config={}",
        registry.pending_callbacks::<dyn Greeter>().unwrap(),
        registry.pending_callbacks::<dyn Config>().unwrap()
    );

    // -------------------------------------------------------------------------
    // 2. The root provider arrives and the chain resolves
    // -------------------------------------------------------------------------
    println!("\n2. Registering Config...");

    registry
        .register::<dyn Config>(Arc::new(StaticConfig))
        .unwrap();

    // -------------------------------------------------------------------------
    // 3. Everything is wired
    // -------------------------------------------------------------------------
    println!("\n3. Using the wired modules...");

    let greeter = registry.require::<dyn Greeter>();
    let shout = registry.require::<Shout>();

    println!("   greet(\"world\") = {}", greeter.greet("world"));
    println!("   shout(\"world\") = {}", shout("world"));

    // -------------------------------------------------------------------------
    // 4. Late consumers run immediately
    // -------------------------------------------------------------------------
    println!("\n4. Waiting for a capability that is already registered...");

    registry
        .get_after_register::<dyn Config, _>(|config| {
            println!("   [late] Config already there: {}", config.greeting());
        })
        .unwrap();

    registry.clear_trace_callback();

    println!("\n=== Example Complete ===");
    println!("Capabilities registered: {}", registry.dependencies().len());
}
