//! # Generic Client
//!
//! This module defines the generic client for communicating with table actors.

use crate::entity::ResourceEntity;
use crate::error::FrameworkError;
use crate::message::{ResourceRequest, TableDump};
use crate::page::{Page, PageRequest};
use std::collections::BTreeSet;
use tokio::sync::{mpsc, oneshot};

/// ## ResourceClient
///
/// The `ResourceClient<T>` provides a type‑safe, async API for interacting with a
/// `ResourceActor<T>`. It forwards table statements over a Tokio mpsc channel and
/// returns results via oneshot channels. The client is cheap to clone and can be
/// shared across tasks and HTTP handlers.
///
/// * **Cloneable** – holds only a sender, so cloning is inexpensive.
/// * **Async API** – all methods resolve to `Result<…, FrameworkError>`.
/// * **Generic** – works with any entity that implements `ResourceEntity`.
#[derive(Clone)]
pub struct ResourceClient<T: ResourceEntity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: ResourceEntity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<R, FrameworkError>>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    /// Inserts a new row and returns it with its assigned id.
    pub async fn create(&self, entity: T) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Create { entity, respond_to })
            .await
    }

    pub async fn get(&self, id: i64) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to })
            .await
    }

    /// Overwrites an existing row. Fails with `NotFound` when `id` is absent.
    pub async fn replace(&self, id: i64, entity: T) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Replace {
            id,
            entity,
            respond_to,
        })
        .await
    }

    pub async fn patch(&self, id: i64, patch: T::Patch) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Patch {
            id,
            patch,
            respond_to,
        })
        .await
    }

    /// Returns whether a row was removed.
    pub async fn delete(&self, id: i64) -> Result<bool, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to })
            .await
    }

    pub async fn count(&self) -> Result<u64, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Count { respond_to })
            .await
    }

    pub async fn list(&self, page: PageRequest) -> Result<Page<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::List { page, respond_to })
            .await
    }

    /// All rows matching `filter`, in id order.
    pub async fn find(
        &self,
        filter: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> Result<Vec<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Find {
            filter: Box::new(filter),
            respond_to,
        })
        .await
    }

    /// Applies `mutation` to every row matching `filter` in one statement.
    pub async fn update_where(
        &self,
        filter: impl Fn(&T) -> bool + Send + Sync + 'static,
        mutation: impl Fn(&mut T) + Send + Sync + 'static,
    ) -> Result<usize, FrameworkError> {
        self.request(|respond_to| ResourceRequest::UpdateWhere {
            filter: Box::new(filter),
            mutation: Box::new(mutation),
            respond_to,
        })
        .await
    }

    pub async fn targets_of(
        &self,
        relation: &'static str,
        owner: i64,
    ) -> Result<BTreeSet<i64>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::TargetsOf {
            relation,
            owner,
            respond_to,
        })
        .await
    }

    pub async fn owners_of(
        &self,
        relation: &'static str,
        target: i64,
    ) -> Result<BTreeSet<i64>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::OwnersOf {
            relation,
            target,
            respond_to,
        })
        .await
    }

    /// Adds one link row. Returns `false` when it already existed.
    pub async fn link(
        &self,
        relation: &'static str,
        owner: i64,
        target: i64,
    ) -> Result<bool, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Link {
            relation,
            owner,
            target,
            respond_to,
        })
        .await
    }

    pub async fn unlink(
        &self,
        relation: &'static str,
        owner: i64,
        target: i64,
    ) -> Result<bool, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Unlink {
            relation,
            owner,
            target,
            respond_to,
        })
        .await
    }

    /// Removes every link row pointing at `target`.
    pub async fn unlink_target(
        &self,
        relation: &'static str,
        target: i64,
    ) -> Result<usize, FrameworkError> {
        self.request(|respond_to| ResourceRequest::UnlinkTarget {
            relation,
            target,
            respond_to,
        })
        .await
    }

    pub async fn dump(&self) -> Result<TableDump, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Dump { respond_to })
            .await
    }

    pub async fn restore(&self, dump: TableDump) -> Result<usize, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Restore { dump, respond_to })
            .await
    }
}
