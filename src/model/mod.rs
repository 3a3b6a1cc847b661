//! # Domain Model
//!
//! The twelve marketplace entities. Each one is a plain record implementing
//! [`ResourceEntity`](resource_framework::ResourceEntity): its schema, field
//! constraints, partial-update merge and row mapping. Storage, HTTP and
//! relation resolution live elsewhere.
//!
//! Relations:
//!
//! - `Collection` ⟷ `Art` (many-to-many, link rows owned by `Collection`)
//! - `Brand` ⟷ `BrandCategory` (many-to-many, link rows owned by `Brand`)
//! - `Collection` → `Feature`, `Transaction` → `Data` / `Output` (one-to-many, child holds the key)
//! - `BrandCategory` → `BrandCategory` (optional parent)
//!
//! Every record compares by identity only.

mod art;
mod artist;
mod brand;
mod brand_category;
mod collection;
mod collector;
mod data;
mod enums;
mod feature;
mod invoice;
mod notification;
mod output;
mod transaction;

pub use art::{Art, ArtPatch};
pub use artist::{Artist, ArtistPatch};
pub use brand::{Brand, BrandPatch, CATEGORIES};
pub use brand_category::{BrandCategory, BrandCategoryPatch};
pub use collection::{Collection, CollectionPatch, ARTS};
pub use collector::{Collector, CollectorPatch};
pub use data::{Data, DataPatch};
pub use enums::{ArtType, AssetType, BrandStatus, InvoiceStatus, NotificationType, TransactionStatus};
pub use feature::{Feature, FeaturePatch};
pub use invoice::{Invoice, InvoicePatch};
pub use notification::{Notification, NotificationPatch};
pub use output::{Output, OutputPatch};
pub use transaction::{Transaction, TransactionPatch};

resource_framework::impl_identity_eq!(
    Art,
    Artist,
    Brand,
    BrandCategory,
    Collection,
    Collector,
    Data,
    Feature,
    Invoice,
    Notification,
    Output,
    Transaction,
);

/// Id of an optional related record.
pub(crate) fn key_of<T: resource_framework::ResourceEntity>(related: Option<&T>) -> Option<i64> {
    related.and_then(resource_framework::ResourceEntity::id)
}
