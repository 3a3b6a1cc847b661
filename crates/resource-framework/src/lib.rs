//! # Resource Framework
//!
//! This crate provides the building blocks for serving many persistent resources through
//! one generic engine. It implements a **Resource-Oriented Architecture (ROA)** pattern
//! on top of the **Actor Model**: every entity table is owned by one actor, and one set of
//! HTTP handlers serves every entity.
//!
//! ## Why ROA + Actor Model?
//!
//! ### Resource-Oriented Architecture (ROA)
//!
//! - Standard CRUD operations (Create, Read, Update, Delete) on well-defined resources
//! - Predictable lifecycle: {absent, present}, nothing in between
//! - Clean, uniform API surface across all resource types
//!
//! ### Actor Model
//!
//! - Isolated state (no shared memory, no locks)
//! - Message-passing concurrency
//! - Sequential processing within each table makes every statement atomic
//!
//! ### The Synergy
//!
//! - **Separation**: each entity type gets its own table actor with isolated rows
//! - **Coordination**: relations are resolved by repositories that talk to several
//!   tables, never by actors calling each other, so no table ever waits on another
//! - **Maintainability**: an entity only declares its schema; storage, validation
//!   plumbing, pagination and HTTP are written once
//!
//! **Further Reading**:
//! - [Actor Model (Wikipedia)](https://en.wikipedia.org/wiki/Actor_model) - Foundational concurrency pattern by Carl Hewitt
//! - [Resource-Oriented Architecture](https://www.ics.uci.edu/~fielding/pubs/dissertation/rest_arch_style.htm) - Roy Fielding's dissertation on REST/ROA principles
//! - [Actors in Rust](https://ryhl.io/blog/actors-with-tokio/) - Practical guide to implementing actors with Tokio
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`ResourceEntity`]) - schema, validation, patch merge, row mapping
//! 2. **Runtime Layer** ([`ResourceActor`]) - one table per entity, sequential statements
//! 3. **Interface Layer** ([`ResourceClient`]) - type-safe communication with a table
//! 4. **Storage Port** ([`Repository`]) - CRUD plus relation hydration across tables
//! 5. **HTTP Layer** ([`http`]) - generic axum handlers, problem responses, pagination headers
//!
//! ## Core Abstractions
//!
//! ### [`ResourceEntity`] - The Schema
//!
//! ```rust
//! use resource_framework::{ResourceActor, ResourceEntity};
//! use resource_framework::row::{column, Row, RowBuilder};
//! use resource_framework::validation::{ValidationErrors, Validator};
//! use serde::{Deserialize, Serialize};
//!
//! // 1. Define the Entity
//! #[derive(Clone, Debug, Default, Serialize, Deserialize)]
//! struct Artist {
//!     id: Option<i64>,
//!     name: Option<String>,
//! }
//!
//! #[derive(Debug, Deserialize)]
//! struct ArtistPatch { id: Option<i64>, name: Option<String> }
//!
//! impl ResourceEntity for Artist {
//!     const ENTITY_NAME: &'static str = "artist";
//!     const RESOURCE_PATH: &'static str = "artists";
//!     type Patch = ArtistPatch;
//!
//!     fn id(&self) -> Option<i64> { self.id }
//!     fn set_id(&mut self, id: i64) { self.id = Some(id) }
//!     fn patch_id(patch: &ArtistPatch) -> Option<i64> { patch.id }
//!     fn validate(&self) -> Result<(), ValidationErrors> {
//!         Validator::new("artist").required("name", &self.name).finish()
//!     }
//!     fn apply_patch(&mut self, patch: ArtistPatch) {
//!         if let Some(name) = patch.name { self.name = Some(name) }
//!     }
//!     fn to_row(&self) -> Row {
//!         RowBuilder::new().column("id", &self.id).column("name", &self.name).build()
//!     }
//!     fn from_row(row: &Row) -> Self {
//!         Self { id: column::get(row, "id"), name: column::get(row, "name") }
//!     }
//! }
//!
//! // 2. Use the Table
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = ResourceActor::<Artist>::new(10);
//!     tokio::spawn(actor.run());
//!
//!     let saved = client.create(Artist { id: None, name: Some("Hilma".into()) }).await.unwrap();
//!     let patch = ArtistPatch { id: saved.id, name: Some("Hilma af Klint".into()) };
//!     let patched = client.patch(saved.id.unwrap(), patch).await.unwrap();
//!     assert_eq!(patched.name.as_deref(), Some("Hilma af Klint"));
//! }
//! ```
//!
//! ## Type Safety
//!
//! - **Compile-time guarantees**: an `ArtPatch` can't be sent to the `Collection` table
//! - **Uniform errors**: tables fail with [`FrameworkError`], HTTP maps it to problem bodies
//! - **Typed relations**: relation names are `&'static str` constants declared by the entity
//!
//! ## Concurrency Model
//!
//! - Each table runs in its own Tokio task
//! - Messages are processed **sequentially** within a table (no locks needed!)
//! - Tables run in **parallel**
//! - A statement that spans row and link rows (replace, delete) is one message
//!
//! ## Testing
//!
//! The [`mock`] module provides **MockClient**, a real `ResourceClient<T>` answered from
//! scripted expectations, for fast, deterministic tests of repositories and HTTP handlers
//! without spawning tables.

pub mod actor;
pub mod blob;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod http;
pub mod message;
pub mod mock;
pub mod page;
pub mod relation;
pub mod row;
pub mod validation;

#[cfg(test)]
mod fixtures;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::Repository;
pub use entity::ResourceEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response, TableDump};
pub use page::{Page, PageRequest, SortOrder};
