//! # Generic Messages
//!
//! This module defines the generic message types used for communication between
//! the `ResourceClient` and `ResourceActor`.

use crate::entity::ResourceEntity;
use crate::error::FrameworkError;
use crate::page::{Page, PageRequest};
use crate::row::Row;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Row filter evaluated inside the table actor.
pub type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// Row rewrite applied inside the table actor.
pub type Mutation<T> = Box<dyn Fn(&mut T) + Send + Sync>;

/// Everything a table holds, in row form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableDump {
    pub rows: Vec<Row>,
    pub next_id: i64,
    pub links: Vec<(String, Vec<(i64, i64)>)>,
}

/// Internal message type sent to the table actor.
///
/// # Resource-Oriented Architecture
/// Each actor manages one table of one entity type. Instead of ad-hoc messages per
/// entity, requests are standardized around the statements any persistent resource
/// needs: the **CRUD** core, page/filter reads, bulk foreign-key rewrites and link-table
/// edits. Each message is applied as one unit, so no other request observes it half done.
///
/// # Entity Interaction
/// The enum is generic over `T: ResourceEntity`, so the compiler guarantees an
/// `ArtPatch` can't be sent to the `Collection` table.
pub enum ResourceRequest<T: ResourceEntity> {
    /// Assigns the next id, stores the row and its owned link rows.
    Create {
        entity: T,
        respond_to: Response<T>,
    },
    Get {
        id: i64,
        respond_to: Response<Option<T>>,
    },
    /// Replaces row and owned link rows wholesale.
    Replace {
        id: i64,
        entity: T,
        respond_to: Response<T>,
    },
    Patch {
        id: i64,
        patch: T::Patch,
        respond_to: Response<T>,
    },
    /// Removes the row and its owned link rows. Absent ids are a no-op.
    Delete {
        id: i64,
        respond_to: Response<bool>,
    },
    Count {
        respond_to: Response<u64>,
    },
    List {
        page: PageRequest,
        respond_to: Response<Page<T>>,
    },
    Find {
        filter: Predicate<T>,
        respond_to: Response<Vec<T>>,
    },
    /// Rewrites every matching row; answers with the number of rows changed.
    UpdateWhere {
        filter: Predicate<T>,
        mutation: Mutation<T>,
        respond_to: Response<usize>,
    },
    TargetsOf {
        relation: &'static str,
        owner: i64,
        respond_to: Response<BTreeSet<i64>>,
    },
    OwnersOf {
        relation: &'static str,
        target: i64,
        respond_to: Response<BTreeSet<i64>>,
    },
    Link {
        relation: &'static str,
        owner: i64,
        target: i64,
        respond_to: Response<bool>,
    },
    Unlink {
        relation: &'static str,
        owner: i64,
        target: i64,
        respond_to: Response<bool>,
    },
    /// Drops every link row pointing at `target`, across all owners.
    UnlinkTarget {
        relation: &'static str,
        target: i64,
        respond_to: Response<usize>,
    },
    Dump {
        respond_to: Response<TableDump>,
    },
    /// Replaces the whole table with `dump`; answers with the number of rows loaded.
    Restore {
        dump: TableDump,
        respond_to: Response<usize>,
    },
}

impl<T: ResourceEntity> fmt::Debug for ResourceRequest<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create { entity, .. } => f.debug_struct("Create").field("entity", entity).finish(),
            Self::Get { id, .. } => f.debug_struct("Get").field("id", id).finish(),
            Self::Replace { id, entity, .. } => f
                .debug_struct("Replace")
                .field("id", id)
                .field("entity", entity)
                .finish(),
            Self::Patch { id, patch, .. } => f
                .debug_struct("Patch")
                .field("id", id)
                .field("patch", patch)
                .finish(),
            Self::Delete { id, .. } => f.debug_struct("Delete").field("id", id).finish(),
            Self::Count { .. } => f.write_str("Count"),
            Self::List { page, .. } => f.debug_struct("List").field("page", page).finish(),
            Self::Find { .. } => f.write_str("Find"),
            Self::UpdateWhere { .. } => f.write_str("UpdateWhere"),
            Self::TargetsOf { relation, owner, .. } => f
                .debug_struct("TargetsOf")
                .field("relation", relation)
                .field("owner", owner)
                .finish(),
            Self::OwnersOf { relation, target, .. } => f
                .debug_struct("OwnersOf")
                .field("relation", relation)
                .field("target", target)
                .finish(),
            Self::Link { relation, owner, target, .. } => f
                .debug_struct("Link")
                .field("relation", relation)
                .field("owner", owner)
                .field("target", target)
                .finish(),
            Self::Unlink { relation, owner, target, .. } => f
                .debug_struct("Unlink")
                .field("relation", relation)
                .field("owner", owner)
                .field("target", target)
                .finish(),
            Self::UnlinkTarget { relation, target, .. } => f
                .debug_struct("UnlinkTarget")
                .field("relation", relation)
                .field("target", target)
                .finish(),
            Self::Dump { .. } => f.write_str("Dump"),
            Self::Restore { dump, .. } => f
                .debug_struct("Restore")
                .field("rows", &dump.rows.len())
                .finish(),
        }
    }
}
