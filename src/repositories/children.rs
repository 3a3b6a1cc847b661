//! Children that point at their owner through a foreign-key column.

use crate::model::{Collection, Data, Feature, Output, Transaction};
use async_trait::async_trait;
use resource_framework::relation::{left_join, require_all};
use resource_framework::{FrameworkError, Repository, ResourceClient, ResourceEntity};
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// An entity owned by exactly one parent table through a key column.
pub trait OwnedChild: ResourceEntity {
    type Owner: ResourceEntity;

    fn owner_key(&self) -> Option<i64>;

    /// Id of the owner named in the relation field of an incoming payload.
    fn referenced_owner(&self) -> Option<i64>;

    fn set_owner_key(&mut self, key: Option<i64>);

    /// Puts the joined owner row into the relation field.
    fn attach_owner(&mut self, owner: Option<Self::Owner>);
}

impl OwnedChild for Feature {
    type Owner = Collection;

    fn owner_key(&self) -> Option<i64> {
        self.collection_id
    }

    fn referenced_owner(&self) -> Option<i64> {
        self.collection.as_ref().and_then(|c| c.id)
    }

    fn set_owner_key(&mut self, key: Option<i64>) {
        self.collection_id = key;
    }

    fn attach_owner(&mut self, owner: Option<Collection>) {
        self.collection = owner;
    }
}

impl OwnedChild for Data {
    type Owner = Transaction;

    fn owner_key(&self) -> Option<i64> {
        self.transaction_id
    }

    fn referenced_owner(&self) -> Option<i64> {
        self.transaction.as_ref().and_then(|t| t.id)
    }

    fn set_owner_key(&mut self, key: Option<i64>) {
        self.transaction_id = key;
    }

    fn attach_owner(&mut self, owner: Option<Transaction>) {
        self.transaction = owner;
    }
}

impl OwnedChild for Output {
    type Owner = Transaction;

    fn owner_key(&self) -> Option<i64> {
        self.transaction_id
    }

    fn referenced_owner(&self) -> Option<i64> {
        self.transaction.as_ref().and_then(|t| t.id)
    }

    fn set_owner_key(&mut self, key: Option<i64>) {
        self.transaction_id = key;
    }

    fn attach_owner(&mut self, owner: Option<Transaction>) {
        self.transaction = owner;
    }
}

/// Points the listed children at `owner` and clears the key of every other child it
/// owned before, in one statement on the child table. Returns the rows touched.
#[instrument(skip(children, ids), fields(entity_type = C::ENTITY_NAME, size = ids.len()))]
pub async fn reassign_children<C: OwnedChild>(
    children: &ResourceClient<C>,
    owner: i64,
    ids: BTreeSet<i64>,
) -> Result<usize, FrameworkError> {
    let listed = ids.clone();
    let changed = children
        .update_where(
            move |child: &C| {
                child.owner_key() == Some(owner) || child.id().is_some_and(|id| listed.contains(&id))
            },
            move |child: &mut C| {
                let keep = child.id().is_some_and(|id| ids.contains(&id));
                child.set_owner_key(keep.then_some(owner));
            },
        )
        .await?;
    debug!(changed, "Children reassigned");
    Ok(changed)
}

/// Loads every child currently pointing at `owner`.
pub(crate) async fn children_of<C: OwnedChild>(
    children: &ResourceClient<C>,
    owner: i64,
) -> Result<Vec<C>, FrameworkError> {
    children
        .find(move |child: &C| child.owner_key() == Some(owner))
        .await
}

/// Repository of a child entity: joins the owner row on every read.
#[derive(Clone)]
pub struct ChildRepository<C: OwnedChild> {
    children: ResourceClient<C>,
    owners: ResourceClient<C::Owner>,
}

impl<C: OwnedChild> ChildRepository<C> {
    pub fn new(children: ResourceClient<C>, owners: ResourceClient<C::Owner>) -> Self {
        Self { children, owners }
    }
}

#[async_trait]
impl<C: OwnedChild> Repository<C> for ChildRepository<C> {
    fn table(&self) -> &ResourceClient<C> {
        &self.children
    }

    async fn check_references(&self, child: &C) -> Result<(), FrameworkError> {
        let owner: BTreeSet<i64> = child.referenced_owner().into_iter().collect();
        require_all(&self.owners, &owner).await
    }

    async fn hydrate(&self, child: &mut C, _eager: bool) -> Result<(), FrameworkError> {
        let owner = left_join(&self.owners, child.owner_key()).await?;
        child.attach_owner(owner);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resource_framework::mock::{create_mock_client, expect_update_where};
    use resource_framework::ResourceRequest;

    fn feature(id: i64, owner: Option<i64>) -> Feature {
        Feature {
            id: Some(id),
            collection_id: owner,
            ..Feature::default()
        }
    }

    #[tokio::test]
    async fn test_reassign_selects_listed_and_previously_owned_rows() {
        let (client, mut receiver) = create_mock_client::<Feature>(4);
        let task = tokio::spawn(async move {
            reassign_children(&client, 1, [2, 3].into_iter().collect()).await
        });

        let (filter, mutation, respond_to) = expect_update_where(&mut receiver)
            .await
            .expect("Expected UpdateWhere request");

        let mut rows = vec![feature(1, Some(1)), feature(2, None), feature(3, Some(9)), feature(4, Some(5))];
        let selected: Vec<bool> = rows.iter().map(|row| filter(row)).collect();
        assert_eq!(selected, vec![true, true, true, false]);

        for row in rows.iter_mut() {
            if filter(&*row) {
                mutation(row);
            }
        }
        let keys: Vec<_> = rows.iter().map(|row| row.collection_id).collect();
        assert_eq!(keys, vec![None, Some(1), Some(1), Some(5)]);

        respond_to.send(Ok(3)).unwrap();
        assert_eq!(task.await.unwrap(), Ok(3));
    }

    #[tokio::test]
    async fn test_insert_naming_absent_owner_writes_nothing() {
        let (owners, mut owner_requests) = create_mock_client::<Collection>(1);
        let (children, mut child_requests) = create_mock_client::<Feature>(1);
        tokio::spawn(async move {
            if let Some(ResourceRequest::Find { respond_to, .. }) = owner_requests.recv().await {
                let _ = respond_to.send(Ok(Vec::new()));
            }
        });
        let repo = ChildRepository::new(children, owners);

        let payload = Feature {
            collection: Some(Collection {
                id: Some(2),
                ..Collection::default()
            }),
            ..Feature::default()
        };
        let err = repo.insert(payload).await.unwrap_err();
        assert_eq!(err, FrameworkError::missing_reference("collection", 2));
        drop(repo);
        assert!(child_requests.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_dangling_owner_key_joins_to_nothing() {
        let mut owners = resource_framework::mock::MockClient::<Collection>::new();
        owners.expect_get(8).return_ok(None);
        let (children, _receiver) = create_mock_client::<Feature>(1);
        let repo = ChildRepository::new(children, owners.client());

        let mut child = feature(1, Some(8));
        repo.hydrate(&mut child, false).await.unwrap();
        assert!(child.collection.is_none());
        assert_eq!(child.collection_id, Some(8));
        owners.verify();
    }
}
