//! # Marketplace
//!
//! > **CRUD resources for an art marketplace, served by table actors.**
//!
//! Twelve entity kinds (arts, collections, brands, invoices, ...) are stored in
//! in-memory tables and exposed over one uniform REST surface. Storage, validation,
//! pagination and HTTP are written once in the `resource-framework` crate; this crate
//! declares the entities and wires their relations.
//!
//! ## Module Tour
//!
//! ### 1. The Schema ([`model`])
//! Plain records implementing [`ResourceEntity`](resource_framework::ResourceEntity):
//! fields, constraints, partial-update merge and row mapping.
//!
//! ### 2. The Relations ([`repositories`])
//! One repository per entity with relations. Joins foreign keys, loads related sets on
//! eager reads and edits link rows from either side of a many-to-many relation.
//!
//! ### 3. The Orchestrator ([`lifecycle`])
//! Spawns one table actor per entity, builds the repositories, loads and saves
//! snapshots and shuts everything down.
//! - **Key items**: [`MarketplaceSystem`](lifecycle::MarketplaceSystem),
//!   [`setup_tracing`](lifecycle::setup_tracing).
//!
//! ### 4. The Surface ([`routes`], [`config`])
//! The axum router over every table plus the flags and environment the binary reads.
//!
//! ## Quick Start
//!
//! ```bash
//! RUST_LOG=info cargo run -- --port 8080 --data-file marketplace.json
//! curl -X POST localhost:8080/api/arts -H 'content-type: application/json' \
//!   -d '{"name":"Mona","handle":"mona-1","assetType":"IMAGE","type":"PHYGITAL"}'
//! ```

pub mod config;
pub mod lifecycle;
pub mod model;
pub mod repositories;
pub mod routes;
