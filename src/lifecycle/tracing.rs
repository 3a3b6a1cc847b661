//! # Observability & Tracing
//!
//! [`setup_tracing`] initializes structured logging with the `tracing` crate for the
//! whole service: table actors, repositories and the HTTP layer.
//!
//! ## Configuration
//!
//! Log levels come from `RUST_LOG`. The compact format hides the crate/module prefix
//! (`with_target(false)`); every table line carries an `entity_type` field instead.
//!
//! ```bash
//! # Request lines and table lifecycle
//! RUST_LOG=info cargo run
//!
//! # Full payloads of every statement
//! RUST_LOG=debug cargo run
//!
//! # Only the storage engine
//! RUST_LOG=resource_framework=debug cargo run
//! ```
//!
//! ## What Gets Traced
//!
//! - **Table Lifecycle**: `Table started` / `Shutdown` with the final row count
//! - **Statements**: `Created`, `Replaced`, `Patched`, `Deleted` with `entity_type` and `id`
//! - **Repositories**: one span per provided method (`insert`, `find_page`, ...)
//! - **HTTP**: one span per request from `tower-http`'s `TraceLayer`
//! - **Failures**: storage errors behind a 500 are logged at error level
//!
//! With `RUST_LOG=debug` a create looks like:
//!
//! ```text
//! DEBUG insert: Sending request entity_type="art"
//! DEBUG Create entity_type="art" entity=Art { id: None, name: Some("Mona"), .. }
//! INFO Created entity_type="art" id=1 size=1
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Don't show module paths - we use entity_type instead
        .compact()
        .init();
}
