//! Trait contracts example for depkit.
//!
//! Demonstrates the **contract-based dependency injection** pattern:
//! - Define traits (contracts) that specify behavior
//! - Register concrete implementations under `dyn Trait`
//! - Consume them through the contract only
//! - Swap implementations with `unregister()` followed by `register()`
//!
//! Run with: `RUST_LOG=depkit=debug cargo run --example trait_contracts`

use depkit::define_registry;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// Create an isolated registry for this example
define_registry!(services);

// =============================================================================
// Contract Definitions (Traits)
// =============================================================================

/// Contract for a logging service.
trait Logger: Send + Sync {
    fn log(&self, message: &str);
    fn name(&self) -> &str;
}

/// Contract for a notification service.
trait Notifier: Send + Sync {
    fn notify(&self, recipient: &str, message: &str);
    fn service_type(&self) -> &str;
}

// =============================================================================
// Concrete Implementations
// =============================================================================

struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, message: &str) {
        println!("[CONSOLE] {}", message);
    }

    fn name(&self) -> &str {
        "ConsoleLogger"
    }
}

/// File-based logger (simulated).
struct FileLogger {
    path: String,
}

impl Logger for FileLogger {
    fn log(&self, message: &str) {
        println!("[FILE:{}] {}", self.path, message);
    }

    fn name(&self) -> &str {
        "FileLogger"
    }
}

struct EmailNotifier {
    smtp_server: String,
}

impl Notifier for EmailNotifier {
    fn notify(&self, recipient: &str, message: &str) {
        println!(
            "[EMAIL via {}] To: {} - {}",
            self.smtp_server, recipient, message
        );
    }

    fn service_type(&self) -> &str {
        "Email"
    }
}

struct SmsNotifier {
    gateway: String,
}

impl Notifier for SmsNotifier {
    fn notify(&self, recipient: &str, message: &str) {
        println!("[SMS via {}] To: {} - {}", self.gateway, recipient, message);
    }

    fn service_type(&self) -> &str {
        "SMS"
    }
}

// =============================================================================
// Application Code (Uses Contracts, Not Implementations)
// =============================================================================

/// Business logic that only knows the Logger and Notifier contracts.
fn process_order(order_id: u32) {
    let logger = services::require::<dyn Logger>();
    let notifier = services::require::<dyn Notifier>();

    logger.log(&format!("Processing order #{}", order_id));
    logger.log("Order confirmed!");

    notifier.notify("customer@example.com", &format!("Order #{} confirmed!", order_id));
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== depkit: Trait Contracts ===\n");

    // -------------------------------------------------------------------------
    // 1. Register initial implementations
    // -------------------------------------------------------------------------
    println!("1. Registering initial implementations...");

    services::register::<dyn Logger>(Arc::new(ConsoleLogger)).unwrap();
    services::register::<dyn Notifier>(Arc::new(EmailNotifier {
        smtp_server: "smtp.example.com".to_string(),
    }))
    .unwrap();

    println!("   Logger: ConsoleLogger");
    println!("   Notifier: EmailNotifier");

    // -------------------------------------------------------------------------
    // 2. Use the contracts
    // -------------------------------------------------------------------------
    println!("\n2. Processing order with initial implementations...\n");

    process_order(1001);

    // -------------------------------------------------------------------------
    // 3. A second registration does not replace the first
    // -------------------------------------------------------------------------
    println!("\n3. Registering FileLogger while ConsoleLogger is present...");

    let stored = services::register::<dyn Logger>(Arc::new(FileLogger {
        path: "/var/log/app.log".to_string(),
    }))
    .unwrap();

    println!(
        "   stored = {}, current Logger: {}",
        stored,
        services::require::<dyn Logger>().name()
    );

    // -------------------------------------------------------------------------
    // 4. Swap implementations explicitly
    // -------------------------------------------------------------------------
    println!("\n4. Swapping implementations with unregister() + register()...");

    services::unregister::<dyn Logger>().unwrap();
    services::register::<dyn Logger>(Arc::new(FileLogger {
        path: "/var/log/app.log".to_string(),
    }))
    .unwrap();

    services::unregister::<dyn Notifier>().unwrap();
    services::register::<dyn Notifier>(Arc::new(SmsNotifier {
        gateway: "sms.example.com".to_string(),
    }))
    .unwrap();

    println!("   Logger: FileLogger");
    println!("   Notifier: SmsNotifier");

    // -------------------------------------------------------------------------
    // 5. Same business logic, different behavior
    // -------------------------------------------------------------------------
    println!("\n5. Processing another order with new implementations...\n");

    process_order(1002);

    // -------------------------------------------------------------------------
    // 6. Verify current implementations
    // -------------------------------------------------------------------------
    println!("\n6. Verifying current implementations...");

    println!("   Current Logger: {}", services::require::<dyn Logger>().name());
    println!(
        "   Current Notifier: {}",
        services::require::<dyn Notifier>().service_type()
    );

    println!("\n=== Example Complete ===");
    println!("Registered contracts:");
    for id in services::dependencies() {
        println!("  - {}", id);
    }
}
