//! # Relationships
//!
//! Two shapes of relation exist between tables:
//!
//! - **Foreign keys** (child to parent): the child row stores `<relation>_id`.
//!   Reading resolves it like a left outer join: a null key or a key pointing at
//!   a row that no longer exists leaves the related record absent.
//! - **Many-to-many**: pairs `(owner id, target id)` in a [`LinkTable`] kept by the
//!   owner's table actor. Because the owner's actor applies row and link edits in
//!   the same message, replacing an owner together with its links is atomic.
//!
//! Saving an owner replaces its link rows wholesale: rows missing from the new
//! set are deleted, new ones inserted, untouched ones kept ([`LinkTable::replace`]).

use crate::client::ResourceClient;
use crate::entity::ResourceEntity;
use crate::error::FrameworkError;
use std::collections::BTreeSet;

/// Link-table rows carried by a payload, keyed by relation name.
pub type LinkSets = Vec<(&'static str, BTreeSet<i64>)>;

/// What a full replace changed in a link table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkDiff {
    pub inserted: BTreeSet<i64>,
    pub removed: BTreeSet<i64>,
}

impl LinkDiff {
    pub fn between(current: &BTreeSet<i64>, desired: &BTreeSet<i64>) -> Self {
        Self {
            inserted: desired.difference(current).copied().collect(),
            removed: current.difference(desired).copied().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.removed.is_empty()
    }
}

/// An in-memory many-to-many link table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkTable {
    rows: BTreeSet<(i64, i64)>,
}

impl LinkTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.rows.iter().copied()
    }

    pub fn targets_of(&self, owner: i64) -> BTreeSet<i64> {
        self.rows
            .range((owner, i64::MIN)..=(owner, i64::MAX))
            .map(|(_, target)| *target)
            .collect()
    }

    pub fn owners_of(&self, target: i64) -> BTreeSet<i64> {
        self.rows
            .iter()
            .filter(|(_, t)| *t == target)
            .map(|(owner, _)| *owner)
            .collect()
    }

    pub fn insert(&mut self, owner: i64, target: i64) -> bool {
        self.rows.insert((owner, target))
    }

    pub fn remove(&mut self, owner: i64, target: i64) -> bool {
        self.rows.remove(&(owner, target))
    }

    /// Makes `targets` the complete link set of `owner`.
    pub fn replace(&mut self, owner: i64, targets: &BTreeSet<i64>) -> LinkDiff {
        let diff = LinkDiff::between(&self.targets_of(owner), targets);
        for target in &diff.removed {
            self.rows.remove(&(owner, *target));
        }
        for target in &diff.inserted {
            self.rows.insert((owner, *target));
        }
        diff
    }

    pub fn remove_owner(&mut self, owner: i64) -> usize {
        let before = self.rows.len();
        self.rows.retain(|(o, _)| *o != owner);
        before - self.rows.len()
    }

    pub fn remove_target(&mut self, target: i64) -> usize {
        let before = self.rows.len();
        self.rows.retain(|(_, t)| *t != target);
        before - self.rows.len()
    }
}

/// Ids of the records in a relation payload. Records without an id are ignored.
pub fn ids_of<T: ResourceEntity>(records: &[T]) -> BTreeSet<i64> {
    records.iter().filter_map(ResourceEntity::id).collect()
}

/// Resolves a foreign key against the parent table. Null or dangling keys yield `None`.
pub async fn left_join<P: ResourceEntity>(
    parents: &ResourceClient<P>,
    key: Option<i64>,
) -> Result<Option<P>, FrameworkError> {
    match key {
        Some(id) => parents.get(id).await,
        None => Ok(None),
    }
}

/// Loads the rows behind a set of ids, in id order, skipping ids that no longer exist.
pub async fn load_all<T: ResourceEntity>(
    table: &ResourceClient<T>,
    ids: &BTreeSet<i64>,
) -> Result<Vec<T>, FrameworkError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let wanted = ids.clone();
    table
        .find(move |row: &T| row.id().is_some_and(|id| wanted.contains(&id)))
        .await
}

/// Fails with `MissingReference` naming the first id in `ids` that has no row.
pub async fn require_all<T: ResourceEntity>(
    table: &ResourceClient<T>,
    ids: &BTreeSet<i64>,
) -> Result<(), FrameworkError> {
    let found = ids_of(&load_all(table, ids).await?);
    match ids.difference(&found).next() {
        Some(&id) => Err(FrameworkError::missing_reference(T::ENTITY_NAME, id)),
        None => Ok(()),
    }
}
