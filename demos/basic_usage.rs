//! Basic usage example for depkit.
//!
//! Demonstrates:
//! - Registering a trait object with `register()`
//! - Retrieving it with `get()` (returns `Arc<dyn Trait>`)
//! - Listing registered capabilities with `dependencies()`
//! - Unregistering and handling a missing capability
//!
//! Run with: `RUST_LOG=depkit=debug cargo run --example basic_usage`

use depkit::define_registry;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// Create an isolated registry for this example
define_registry!(app);

/// Contract consumers depend on.
trait Namer: Send + Sync {
    fn name(&self) -> String;
}

struct TestModule;

impl Namer for TestModule {
    fn name(&self) -> String {
        "test".to_string()
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== depkit: Basic Usage ===\n");

    // -------------------------------------------------------------------------
    // 1. Register a module under its capability
    // -------------------------------------------------------------------------
    println!("1. Registering TestModule as dyn Namer...");

    let stored = app::register::<dyn Namer>(Arc::new(TestModule)).unwrap();

    println!("   stored = {}", stored);

    // -------------------------------------------------------------------------
    // 2. The first registration wins
    // -------------------------------------------------------------------------
    println!("\n2. Registering a second Namer...");

    let stored = app::register::<dyn Namer>(Arc::new(TestModule)).unwrap();

    println!("   stored = {} (the first instance is kept)", stored);

    // -------------------------------------------------------------------------
    // 3. List registered capabilities
    // -------------------------------------------------------------------------
    println!("\n3. Listing dependencies()...");

    for id in app::dependencies() {
        println!("   {}", id);
    }

    // -------------------------------------------------------------------------
    // 4. Retrieve the module without naming its concrete type
    // -------------------------------------------------------------------------
    println!("\n4. Retrieving with get::<dyn Namer>()...");

    let namer = app::get::<dyn Namer>().unwrap();

    println!("   name() = {}", namer.name());

    // -------------------------------------------------------------------------
    // 5. Unregister and handle the missing capability
    // -------------------------------------------------------------------------
    println!("\n5. Unregistering and retrieving again...");

    app::unregister::<dyn Namer>().unwrap();

    match app::get::<dyn Namer>() {
        Ok(namer) => println!("   Found: {}", namer.name()),
        Err(e) => println!("   Error (expected): {}", e),
    }

    // -------------------------------------------------------------------------
    // 6. Concrete types are not capabilities
    // -------------------------------------------------------------------------
    println!("\n6. Registering a String...");

    match app::register(Arc::new("not a capability".to_string())) {
        Ok(_) => println!("   Registered"),
        Err(e) => println!("   Error (expected): {}", e),
    }

    println!("\n=== Example Complete ===");
    println!("Capabilities left: {}", app::dependencies().len());
}
