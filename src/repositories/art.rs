use super::require;
use crate::model::{Art, Collection, ARTS};
use async_trait::async_trait;
use resource_framework::relation::load_all;
use resource_framework::{FrameworkError, Repository, ResourceClient};
use tracing::{debug, instrument};

/// Repository for arts. Collection membership is read from and written to the link
/// table owned by the collection table, so both sides always agree.
#[derive(Clone)]
pub struct ArtRepository {
    arts: ResourceClient<Art>,
    collections: ResourceClient<Collection>,
}

impl ArtRepository {
    pub fn new(arts: ResourceClient<Art>, collections: ResourceClient<Collection>) -> Self {
        Self { arts, collections }
    }

    /// Adds the art to a collection. Returns false if it was already a member.
    #[instrument(skip(self))]
    pub async fn add_collection(&self, art_id: i64, collection_id: i64) -> Result<bool, FrameworkError> {
        require(&self.arts, art_id).await?;
        let added = self.collections.link(ARTS, collection_id, art_id).await?;
        debug!(added, "Membership updated");
        Ok(added)
    }

    #[instrument(skip(self))]
    pub async fn remove_collection(&self, art_id: i64, collection_id: i64) -> Result<bool, FrameworkError> {
        self.collections.unlink(ARTS, collection_id, art_id).await
    }
}

#[async_trait]
impl Repository<Art> for ArtRepository {
    fn table(&self) -> &ResourceClient<Art> {
        &self.arts
    }

    async fn hydrate(&self, art: &mut Art, eager: bool) -> Result<(), FrameworkError> {
        if let (true, Some(id)) = (eager, art.id) {
            let owners = self.collections.owners_of(ARTS, id).await?;
            art.collections = load_all(&self.collections, &owners).await?;
        }
        Ok(())
    }

    async fn unlink(&self, id: i64) -> Result<(), FrameworkError> {
        let removed = self.collections.unlink_target(ARTS, id).await?;
        debug!(art_id = id, removed, "Link rows removed");
        Ok(())
    }
}
