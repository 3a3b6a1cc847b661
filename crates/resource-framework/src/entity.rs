//! # ResourceEntity Trait
//!
//! The `ResourceEntity` trait defines the contract that every resource (Art, Collection,
//! Brand, …) must implement to be stored by the generic [`ResourceActor`](crate::ResourceActor)
//! and served by the generic HTTP engine. It carries the per-entity schema: names,
//! validation, partial-update merge, row mapping and relation bookkeeping.
//!
//! # Architecture Note
//! By defining a contract that all our resource types must satisfy, the table actor,
//! the repository port and the HTTP handlers are written *once* and reused for every
//! entity. Each entity only declares what is specific to it.
//!
//! We use an associated type (`type Patch`) to keep partial updates type safe: an `Art`
//! table only accepts an `ArtPatch`, and the compiler rejects anything else.
//!
//! # Identity
//! Ids are surrogate `i64` keys assigned by the table on insert. Records compare by
//! identity only, see [`impl_identity_eq!`](crate::impl_identity_eq).

use crate::relation::LinkSets;
use crate::row::Row;
use crate::validation::ValidationErrors;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// Trait that any resource entity must implement to be managed by a `ResourceActor`.
pub trait ResourceEntity:
    Clone + Debug + Default + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Entity name used in logs, error bodies and alert headers (e.g. `"brandCategory"`).
    const ENTITY_NAME: &'static str;

    /// Plural kebab-case path segment under `/api` (e.g. `"brand-categories"`).
    const RESOURCE_PATH: &'static str;

    /// Many-to-many relations whose link table this entity's table owns.
    const LINKS: &'static [&'static str] = &[];

    /// The partial-update payload: every field optional, `None` meaning "leave as is".
    type Patch: Debug + DeserializeOwned + Send + Sync + 'static;

    fn id(&self) -> Option<i64>;

    fn set_id(&mut self, id: i64);

    /// The id carried by a partial-update payload.
    fn patch_id(patch: &Self::Patch) -> Option<i64>;

    /// Checks field constraints. Called before any write.
    fn validate(&self) -> Result<(), ValidationErrors>;

    /// Overwrites the fields present in `patch`. Relations are never touched.
    fn apply_patch(&mut self, patch: Self::Patch);

    /// Moves relation references of an incoming payload into persisted columns.
    ///
    /// Foreign-key parents become `<relation>_id` columns; owned many-to-many sets are
    /// returned as link rows. Transient relation fields are left empty afterwards.
    fn detach_relations(&mut self) -> LinkSets {
        Vec::new()
    }

    /// Flat column representation used by snapshots.
    fn to_row(&self) -> Row;

    /// Builds a record from a stored row. Never fails; bad columns read as `None`.
    fn from_row(row: &Row) -> Self;
}

/// Implements identity-based equality for entities.
///
/// Two records are equal iff both have the same non-null id. A record without id is
/// only equal to itself.
///
/// ```rust
/// #[derive(Debug)]
/// struct Tag { id: Option<i64> }
/// resource_framework::impl_identity_eq!(Tag);
///
/// let a = Tag { id: None };
/// let b = Tag { id: None };
/// assert_eq!(a, a);
/// assert_ne!(a, b);
/// assert_eq!(Tag { id: Some(1) }, Tag { id: Some(1) });
/// ```
#[macro_export]
macro_rules! impl_identity_eq {
    ($($entity:ty),+ $(,)?) => {
        $(
            impl ::std::cmp::PartialEq for $entity {
                fn eq(&self, other: &Self) -> bool {
                    if ::std::ptr::eq(self, other) {
                        return true;
                    }
                    matches!((self.id, other.id), (Some(a), Some(b)) if a == b)
                }
            }

            impl ::std::cmp::Eq for $entity {}
        )+
    };
}

/// Copies every present field of a patch onto a record.
///
/// ```rust
/// #[derive(Default)]
/// struct Tag { name: Option<String>, rank: Option<i32> }
/// struct TagPatch { name: Option<String>, rank: Option<i32> }
///
/// let mut tag = Tag { name: Some("old".into()), rank: Some(1) };
/// let patch = TagPatch { name: None, rank: Some(2) };
/// resource_framework::merge_present!(tag, patch; name, rank);
/// assert_eq!(tag.name.as_deref(), Some("old"));
/// assert_eq!(tag.rank, Some(2));
/// ```
#[macro_export]
macro_rules! merge_present {
    ($target:expr, $patch:expr; $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = $patch.$field {
                $target.$field = Some(value);
            }
        )+
    };
}
