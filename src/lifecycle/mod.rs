//! Runtime orchestration and lifecycle management.
//!
//! # Main Components
//!
//! - [`MarketplaceSystem`] - Spawns every table actor and builds the repositories over them
//! - [`snapshot`] - Loads and saves the whole store as one JSON document
//! - [`setup_tracing`] - Initializes the tracing/logging infrastructure

pub mod marketplace_system;
pub mod snapshot;
pub mod tracing;

pub use self::tracing::setup_tracing;
pub use marketplace_system::MarketplaceSystem;
pub use snapshot::Snapshot;
