//! # Repositories
//!
//! One repository per entity with relations. Each wraps the entity's own table plus the
//! tables its relations live in, and resolves those relations after every read
//! ([`Repository::hydrate`](resource_framework::Repository::hydrate)). Tables never
//! talk to each other; every cross-table step happens here, one message at a time.
//!
//! Entities without relations (`Artist`, `Collector`, `Invoice`, `Notification`) use
//! their [`ResourceClient`](resource_framework::ResourceClient) directly.

mod art;
mod brand;
mod brand_category;
mod children;
mod collection;
mod transaction;

pub use art::ArtRepository;
pub use brand::BrandRepository;
pub use brand_category::BrandCategoryRepository;
pub use children::{reassign_children, ChildRepository, OwnedChild};
pub use collection::CollectionRepository;
pub use transaction::TransactionRepository;

use resource_framework::{FrameworkError, ResourceClient, ResourceEntity};

/// Fails with `NotFound` unless the row exists.
pub(crate) async fn require<T: ResourceEntity>(
    table: &ResourceClient<T>,
    id: i64,
) -> Result<(), FrameworkError> {
    match table.get(id).await? {
        Some(_) => Ok(()),
        None => Err(FrameworkError::not_found(T::ENTITY_NAME, id)),
    }
}
