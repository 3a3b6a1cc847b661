use super::children::{children_of, reassign_children};
use super::require;
use crate::model::{Art, Collection, Feature, ARTS};
use async_trait::async_trait;
use resource_framework::relation::{ids_of, load_all, require_all};
use resource_framework::{FrameworkError, Repository, ResourceClient};
use std::collections::BTreeSet;
use tracing::instrument;

/// Repository for collections: owns the art link rows and the features pointing at it.
#[derive(Clone)]
pub struct CollectionRepository {
    collections: ResourceClient<Collection>,
    arts: ResourceClient<Art>,
    features: ResourceClient<Feature>,
}

impl CollectionRepository {
    pub fn new(
        collections: ResourceClient<Collection>,
        arts: ResourceClient<Art>,
        features: ResourceClient<Feature>,
    ) -> Self {
        Self {
            collections,
            arts,
            features,
        }
    }

    /// Looks a collection up by its natural key. The first match in id order wins.
    #[instrument(skip(self))]
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Collection>, FrameworkError> {
        let wanted = name.to_string();
        let found = self
            .collections
            .find(move |c: &Collection| c.name.as_deref() == Some(wanted.as_str()))
            .await?;
        match found.into_iter().next() {
            Some(mut collection) => {
                self.hydrate(&mut collection, true).await?;
                Ok(Some(collection))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    pub async fn add_art(&self, collection_id: i64, art_id: i64) -> Result<bool, FrameworkError> {
        require(&self.arts, art_id).await?;
        self.collections.link(ARTS, collection_id, art_id).await
    }

    #[instrument(skip(self))]
    pub async fn remove_art(&self, collection_id: i64, art_id: i64) -> Result<bool, FrameworkError> {
        self.collections.unlink(ARTS, collection_id, art_id).await
    }

    /// Makes exactly `feature_ids` belong to the collection.
    #[instrument(skip(self, feature_ids))]
    pub async fn set_features(
        &self,
        collection_id: i64,
        feature_ids: BTreeSet<i64>,
    ) -> Result<usize, FrameworkError> {
        require(&self.collections, collection_id).await?;
        reassign_children(&self.features, collection_id, feature_ids).await
    }
}

#[async_trait]
impl Repository<Collection> for CollectionRepository {
    fn table(&self) -> &ResourceClient<Collection> {
        &self.collections
    }

    async fn check_references(&self, collection: &Collection) -> Result<(), FrameworkError> {
        require_all(&self.arts, &ids_of(&collection.arts)).await
    }

    async fn hydrate(&self, collection: &mut Collection, eager: bool) -> Result<(), FrameworkError> {
        if let (true, Some(id)) = (eager, collection.id) {
            let targets = self.collections.targets_of(ARTS, id).await?;
            collection.arts = load_all(&self.arts, &targets).await?;
            collection.features = children_of(&self.features, id).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resource_framework::mock::MockClient;

    #[tokio::test]
    async fn test_set_features_requires_the_collection() {
        let mut collections = MockClient::<Collection>::new();
        collections.expect_get(4).return_ok(None);
        let arts = MockClient::<Art>::new();
        let features = MockClient::<Feature>::new();
        let repo = CollectionRepository::new(collections.client(), arts.client(), features.client());

        let err = repo.set_features(4, BTreeSet::from([1])).await.unwrap_err();
        assert_eq!(err, FrameworkError::not_found("collection", 4));
        collections.verify();
        features.verify();
    }

    #[tokio::test]
    async fn test_lazy_hydrate_touches_no_other_table() {
        let collections = MockClient::<Collection>::new();
        let arts = MockClient::<Art>::new();
        let features = MockClient::<Feature>::new();
        let repo = CollectionRepository::new(collections.client(), arts.client(), features.client());

        let mut collection = Collection {
            id: Some(1),
            ..Collection::named("Genesis")
        };
        repo.hydrate(&mut collection, false).await.unwrap();
        assert!(collection.arts.is_empty());
    }
}
