//! # Generic Table Actor
//!
//! This module defines the `ResourceActor`, the core component that owns one entity
//! table. It implements the "Server" side of the Actor Model, processing messages
//! sequentially and ensuring exclusive access to the rows and link tables it owns.

use crate::client::ResourceClient;
use crate::entity::ResourceEntity;
use crate::error::FrameworkError;
use crate::message::{ResourceRequest, TableDump};
use crate::relation::{LinkSets, LinkTable};
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that manages one table of entities.
///
/// # Architecture Note
/// This struct is the "Server" half of the actor. It owns the state (`store`, `links`)
/// and the receiver end of the channel.
///
/// **Concurrency Model**:
/// Every table runs in its own task and applies its messages *sequentially*. A message
/// is therefore a transaction: a replace that rewrites the row and its link rows, or a
/// bulk foreign-key rewrite, is never observed half applied, and no `Mutex` is needed
/// around the store.
///
/// # Usage Pattern
///
/// 1.  **Create**: Call `ResourceActor::new()` to get the `actor` (server) and `client` (interface).
/// 2.  **Run**: Spawn the actor's run loop in a background task.
/// 3.  **Use**: Clone the client wherever the table is needed.
///
/// ```rust
/// use resource_framework::{ResourceActor, ResourceEntity};
/// use resource_framework::row::{column, Row, RowBuilder};
/// use resource_framework::validation::{ValidationErrors, Validator};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Debug, Default, Serialize, Deserialize)]
/// struct Tag { id: Option<i64>, name: Option<String> }
/// #[derive(Debug, Deserialize)]
/// struct TagPatch { id: Option<i64>, name: Option<String> }
///
/// impl ResourceEntity for Tag {
///     const ENTITY_NAME: &'static str = "tag";
///     const RESOURCE_PATH: &'static str = "tags";
///     type Patch = TagPatch;
///     fn id(&self) -> Option<i64> { self.id }
///     fn set_id(&mut self, id: i64) { self.id = Some(id) }
///     fn patch_id(patch: &TagPatch) -> Option<i64> { patch.id }
///     fn validate(&self) -> Result<(), ValidationErrors> {
///         Validator::new("tag").required("name", &self.name).finish()
///     }
///     fn apply_patch(&mut self, patch: TagPatch) {
///         if let Some(name) = patch.name { self.name = Some(name) }
///     }
///     fn to_row(&self) -> Row {
///         RowBuilder::new().column("id", &self.id).column("name", &self.name).build()
///     }
///     fn from_row(row: &Row) -> Self {
///         Self { id: column::get(row, "id"), name: column::get(row, "name") }
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = ResourceActor::<Tag>::new(10);
///     tokio::spawn(actor.run());
///
///     let saved = client.create(Tag { id: None, name: Some("rare".into()) }).await.unwrap();
///     assert_eq!(saved.id, Some(1));
/// }
/// ```
///
/// # Operations
///
/// * **Create**: takes the next value of the table sequence as id, moves relation
///   references into columns and link rows, stores both.
/// * **Replace**: full overwrite of an existing row; link rows are diffed and replaced.
/// * **Patch**: merges the present fields of a patch into an existing row.
/// * **Delete**: removes the row and the link rows it owns; deleting an absent id is a no-op.
/// * **List / Find / Count**: read-only views over the rows, in ascending id order.
/// * **UpdateWhere**: rewrites every matching row, used for foreign-key reassignment.
/// * **Link / Unlink / UnlinkTarget / TargetsOf / OwnersOf**: link-table statements.
/// * **Dump / Restore**: whole-table export and import in row form.
pub struct ResourceActor<T: ResourceEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: BTreeMap<i64, T>,
    links: BTreeMap<&'static str, LinkTable>,
    next_id: i64,
}

impl<T: ResourceEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// # Arguments
    ///
    /// * `buffer_size` - The capacity of the MPSC channel. If the channel is full,
    ///   calls to the client will wait until there is space.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: BTreeMap::new(),
            links: T::LINKS.iter().map(|name| (*name, LinkTable::new())).collect(),
            next_id: 1,
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    /// Runs the actor's event loop, processing messages until every client is dropped.
    pub async fn run(mut self) {
        let entity_type = T::ENTITY_NAME;
        info!(entity_type, "Table started");

        while let Some(msg) = self.receiver.recv().await {
            self.handle(msg);
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }

    fn handle(&mut self, msg: ResourceRequest<T>) {
        let entity_type = T::ENTITY_NAME;
        match msg {
            ResourceRequest::Create {
                mut entity,
                respond_to,
            } => {
                debug!(entity_type, ?entity, "Create");
                let links = entity.detach_relations();
                if let Err(e) = self.check_links(&links) {
                    warn!(entity_type, error = %e, "Create failed");
                    let _ = respond_to.send(Err(e));
                    return;
                }
                let id = self.next_id;
                self.next_id += 1;
                entity.set_id(id);
                self.store_links(id, links);
                self.store.insert(id, entity.clone());
                info!(entity_type, id, size = self.store.len(), "Created");
                let _ = respond_to.send(Ok(entity));
            }
            ResourceRequest::Get { id, respond_to } => {
                let item = self.store.get(&id).cloned();
                debug!(entity_type, id, found = item.is_some(), "Get");
                let _ = respond_to.send(Ok(item));
            }
            ResourceRequest::Replace {
                id,
                mut entity,
                respond_to,
            } => {
                debug!(entity_type, id, ?entity, "Replace");
                if !self.store.contains_key(&id) {
                    warn!(entity_type, id, "Not found");
                    let _ = respond_to.send(Err(FrameworkError::not_found(entity_type, id)));
                    return;
                }
                let links = entity.detach_relations();
                if let Err(e) = self.check_links(&links) {
                    warn!(entity_type, id, error = %e, "Replace failed");
                    let _ = respond_to.send(Err(e));
                    return;
                }
                entity.set_id(id);
                self.store_links(id, links);
                self.store.insert(id, entity.clone());
                info!(entity_type, id, "Replaced");
                let _ = respond_to.send(Ok(entity));
            }
            ResourceRequest::Patch {
                id,
                patch,
                respond_to,
            } => {
                debug!(entity_type, id, ?patch, "Patch");
                match self.store.get_mut(&id) {
                    Some(item) => {
                        item.apply_patch(patch);
                        info!(entity_type, id, "Patched");
                        let _ = respond_to.send(Ok(item.clone()));
                    }
                    None => {
                        warn!(entity_type, id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::not_found(entity_type, id)));
                    }
                }
            }
            ResourceRequest::Delete { id, respond_to } => {
                let existed = self.store.remove(&id).is_some();
                if existed {
                    let unlinked: usize = self
                        .links
                        .values_mut()
                        .map(|table| table.remove_owner(id))
                        .sum();
                    info!(entity_type, id, unlinked, size = self.store.len(), "Deleted");
                } else {
                    debug!(entity_type, id, "Delete of absent row");
                }
                let _ = respond_to.send(Ok(existed));
            }
            ResourceRequest::Count { respond_to } => {
                let _ = respond_to.send(Ok(self.store.len() as u64));
            }
            ResourceRequest::List { page, respond_to } => {
                debug!(entity_type, ?page, "List");
                let rows: Vec<T> = self.store.values().cloned().collect();
                let _ = respond_to.send(Ok(page.apply(rows)));
            }
            ResourceRequest::Find { filter, respond_to } => {
                let rows: Vec<T> = self
                    .store
                    .values()
                    .filter(|row| filter(row))
                    .cloned()
                    .collect();
                debug!(entity_type, matched = rows.len(), "Find");
                let _ = respond_to.send(Ok(rows));
            }
            ResourceRequest::UpdateWhere {
                filter,
                mutation,
                respond_to,
            } => {
                let mut changed = 0;
                for row in self.store.values_mut().filter(|row| filter(row)) {
                    mutation(row);
                    changed += 1;
                }
                info!(entity_type, changed, "Updated rows");
                let _ = respond_to.send(Ok(changed));
            }
            ResourceRequest::TargetsOf {
                relation,
                owner,
                respond_to,
            } => {
                let result = self
                    .link_table(relation)
                    .map(|table| table.targets_of(owner));
                let _ = respond_to.send(result);
            }
            ResourceRequest::OwnersOf {
                relation,
                target,
                respond_to,
            } => {
                let result = self
                    .link_table(relation)
                    .map(|table| table.owners_of(target));
                let _ = respond_to.send(result);
            }
            ResourceRequest::Link {
                relation,
                owner,
                target,
                respond_to,
            } => {
                let result = self.edit_link(relation, owner, |table| table.insert(owner, target));
                if let Ok(true) = result {
                    info!(entity_type, relation, owner, target, "Linked");
                }
                let _ = respond_to.send(result);
            }
            ResourceRequest::Unlink {
                relation,
                owner,
                target,
                respond_to,
            } => {
                let result = self.edit_link(relation, owner, |table| table.remove(owner, target));
                if let Ok(true) = result {
                    info!(entity_type, relation, owner, target, "Unlinked");
                }
                let _ = respond_to.send(result);
            }
            ResourceRequest::UnlinkTarget {
                relation,
                target,
                respond_to,
            } => {
                let result = match self.links.get_mut(relation) {
                    Some(table) => Ok(table.remove_target(target)),
                    None => Err(unknown_relation::<T>(relation)),
                };
                if let Ok(removed) = result {
                    info!(entity_type, relation, target, removed, "Unlinked target");
                }
                let _ = respond_to.send(result);
            }
            ResourceRequest::Dump { respond_to } => {
                let dump = TableDump {
                    rows: self.store.values().map(ResourceEntity::to_row).collect(),
                    next_id: self.next_id,
                    links: self
                        .links
                        .iter()
                        .map(|(name, table)| (name.to_string(), table.rows().collect()))
                        .collect(),
                };
                let _ = respond_to.send(Ok(dump));
            }
            ResourceRequest::Restore { dump, respond_to } => {
                let loaded = self.restore(dump);
                info!(entity_type, loaded, next_id = self.next_id, "Restored");
                let _ = respond_to.send(Ok(loaded));
            }
        }
    }

    fn link_table(&self, relation: &str) -> Result<&LinkTable, FrameworkError> {
        self.links
            .get(relation)
            .ok_or_else(|| unknown_relation::<T>(relation))
    }

    fn edit_link(
        &mut self,
        relation: &str,
        owner: i64,
        edit: impl FnOnce(&mut LinkTable) -> bool,
    ) -> Result<bool, FrameworkError> {
        if !self.store.contains_key(&owner) {
            return Err(FrameworkError::not_found(T::ENTITY_NAME, owner));
        }
        match self.links.get_mut(relation) {
            Some(table) => Ok(edit(table)),
            None => Err(unknown_relation::<T>(relation)),
        }
    }

    fn check_links(&self, links: &LinkSets) -> Result<(), FrameworkError> {
        match links.iter().find(|(name, _)| !self.links.contains_key(name)) {
            Some((name, _)) => Err(unknown_relation::<T>(name)),
            None => Ok(()),
        }
    }

    fn store_links(&mut self, owner: i64, links: LinkSets) {
        for (name, targets) in links {
            if let Some(table) = self.links.get_mut(name) {
                let diff = table.replace(owner, &targets);
                if !diff.is_empty() {
                    debug!(
                        entity_type = T::ENTITY_NAME,
                        relation = name,
                        owner,
                        inserted = ?diff.inserted,
                        removed = ?diff.removed,
                        "Link rows replaced"
                    );
                }
            }
        }
    }

    fn restore(&mut self, dump: TableDump) -> usize {
        self.store.clear();
        for table in self.links.values_mut() {
            *table = LinkTable::new();
        }

        for row in &dump.rows {
            let entity = T::from_row(row);
            match entity.id() {
                Some(id) => {
                    self.store.insert(id, entity);
                }
                None => warn!(entity_type = T::ENTITY_NAME, "Skipping stored row without id"),
            }
        }

        for (name, rows) in dump.links {
            match self.links.get_mut(name.as_str()) {
                Some(table) => {
                    for (owner, target) in rows {
                        table.insert(owner, target);
                    }
                }
                None => warn!(entity_type = T::ENTITY_NAME, relation = %name, "Skipping unknown link table"),
            }
        }

        let after_last = self.store.keys().next_back().map_or(1, |id| id + 1);
        self.next_id = dump.next_id.max(after_last);
        self.store.len()
    }
}

fn unknown_relation<T: ResourceEntity>(relation: &str) -> FrameworkError {
    FrameworkError::UnknownRelation {
        entity: T::ENTITY_NAME,
        relation: relation.to_string(),
    }
}
