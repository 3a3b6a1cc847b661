use crate::lifecycle::snapshot::Snapshot;
use crate::model::{
    Art, Artist, Brand, BrandCategory, Collection, Collector, Data, Feature, Invoice, Notification, Output,
    Transaction,
};
use crate::repositories::{
    ArtRepository, BrandCategoryRepository, BrandRepository, ChildRepository, CollectionRepository,
    TransactionRepository,
};
use anyhow::anyhow;
use resource_framework::http::ApiSettings;
use resource_framework::{FrameworkError, ResourceActor, ResourceClient, ResourceEntity};
use tokio::task::JoinHandle;
use tracing::{error, info};

/// The runtime orchestrator of the marketplace store.
///
/// `MarketplaceSystem` is responsible for:
/// - **Lifecycle Management**: Starting and stopping one table actor per entity
/// - **Dependency Wiring**: Handing each repository the tables its relations live in
/// - **Snapshots**: Dumping and restoring every table as one [`Snapshot`]
///
/// # Example
///
/// ```ignore
/// let system = MarketplaceSystem::new(32);
///
/// let art = system.art_repository().insert(art).await?;
/// let app = system.router(ApiSettings::default());
///
/// // Gracefully shut down when done
/// system.shutdown().await?;
/// ```
pub struct MarketplaceSystem {
    pub arts: ResourceClient<Art>,
    pub collections: ResourceClient<Collection>,
    pub datas: ResourceClient<Data>,
    pub features: ResourceClient<Feature>,
    pub outputs: ResourceClient<Output>,
    pub transactions: ResourceClient<Transaction>,
    pub brands: ResourceClient<Brand>,
    pub brand_categories: ResourceClient<BrandCategory>,
    pub artists: ResourceClient<Artist>,
    pub collectors: ResourceClient<Collector>,
    pub invoices: ResourceClient<Invoice>,
    pub notifications: ResourceClient<Notification>,

    /// Task handles for all running tables (used for graceful shutdown)
    handles: Vec<JoinHandle<()>>,
}

fn spawn_table<T: ResourceEntity>(capacity: usize, handles: &mut Vec<JoinHandle<()>>) -> ResourceClient<T> {
    let (actor, client) = ResourceActor::<T>::new(capacity);
    handles.push(tokio::spawn(actor.run()));
    client
}

impl MarketplaceSystem {
    /// Spawns every table with a channel of `channel_capacity` requests.
    ///
    /// Tables hold no references to each other, so start order does not matter.
    pub fn new(channel_capacity: usize) -> Self {
        let mut handles = Vec::with_capacity(12);
        let system = Self {
            arts: spawn_table(channel_capacity, &mut handles),
            collections: spawn_table(channel_capacity, &mut handles),
            datas: spawn_table(channel_capacity, &mut handles),
            features: spawn_table(channel_capacity, &mut handles),
            outputs: spawn_table(channel_capacity, &mut handles),
            transactions: spawn_table(channel_capacity, &mut handles),
            brands: spawn_table(channel_capacity, &mut handles),
            brand_categories: spawn_table(channel_capacity, &mut handles),
            artists: spawn_table(channel_capacity, &mut handles),
            collectors: spawn_table(channel_capacity, &mut handles),
            invoices: spawn_table(channel_capacity, &mut handles),
            notifications: spawn_table(channel_capacity, &mut handles),
            handles,
        };
        info!(tables = system.handles.len(), "Marketplace tables started");
        system
    }

    pub fn art_repository(&self) -> ArtRepository {
        ArtRepository::new(self.arts.clone(), self.collections.clone())
    }

    pub fn collection_repository(&self) -> CollectionRepository {
        CollectionRepository::new(self.collections.clone(), self.arts.clone(), self.features.clone())
    }

    pub fn feature_repository(&self) -> ChildRepository<Feature> {
        ChildRepository::new(self.features.clone(), self.collections.clone())
    }

    pub fn transaction_repository(&self) -> TransactionRepository {
        TransactionRepository::new(self.transactions.clone(), self.datas.clone(), self.outputs.clone())
    }

    pub fn data_repository(&self) -> ChildRepository<Data> {
        ChildRepository::new(self.datas.clone(), self.transactions.clone())
    }

    pub fn output_repository(&self) -> ChildRepository<Output> {
        ChildRepository::new(self.outputs.clone(), self.transactions.clone())
    }

    pub fn brand_repository(&self) -> BrandRepository {
        BrandRepository::new(self.brands.clone(), self.brand_categories.clone())
    }

    pub fn brand_category_repository(&self) -> BrandCategoryRepository {
        BrandCategoryRepository::new(self.brand_categories.clone(), self.brands.clone())
    }

    /// The HTTP surface over every table.
    pub fn router(&self, settings: ApiSettings) -> axum::Router {
        crate::routes::router(self, settings)
    }

    /// Dumps every table. Each table is read in one message, tables one after another.
    pub async fn dump(&self) -> Result<Snapshot, FrameworkError> {
        let mut snapshot = Snapshot::default();
        snapshot.insert(&self.arts).await?;
        snapshot.insert(&self.collections).await?;
        snapshot.insert(&self.datas).await?;
        snapshot.insert(&self.features).await?;
        snapshot.insert(&self.outputs).await?;
        snapshot.insert(&self.transactions).await?;
        snapshot.insert(&self.brands).await?;
        snapshot.insert(&self.brand_categories).await?;
        snapshot.insert(&self.artists).await?;
        snapshot.insert(&self.collectors).await?;
        snapshot.insert(&self.invoices).await?;
        snapshot.insert(&self.notifications).await?;
        Ok(snapshot)
    }

    /// Loads every table found in `snapshot`. Returns the number of rows loaded.
    pub async fn restore(&self, mut snapshot: Snapshot) -> Result<usize, FrameworkError> {
        let mut loaded = 0;
        loaded += snapshot.restore(&self.arts).await?;
        loaded += snapshot.restore(&self.collections).await?;
        loaded += snapshot.restore(&self.datas).await?;
        loaded += snapshot.restore(&self.features).await?;
        loaded += snapshot.restore(&self.outputs).await?;
        loaded += snapshot.restore(&self.transactions).await?;
        loaded += snapshot.restore(&self.brands).await?;
        loaded += snapshot.restore(&self.brand_categories).await?;
        loaded += snapshot.restore(&self.artists).await?;
        loaded += snapshot.restore(&self.collectors).await?;
        loaded += snapshot.restore(&self.invoices).await?;
        loaded += snapshot.restore(&self.notifications).await?;
        Ok(loaded)
    }

    /// Gracefully shuts down the entire system.
    ///
    /// Dropping the clients closes the table channels; each actor drains its queue
    /// and exits. Clones handed to repositories or routers must be dropped first,
    /// otherwise their tables keep running and this waits for them.
    pub async fn shutdown(mut self) -> anyhow::Result<()> {
        info!("Shutting down system...");

        let handles = std::mem::take(&mut self.handles);
        drop(self);

        for handle in handles {
            if let Err(e) = handle.await {
                error!("Table task failed: {:?}", e);
                return Err(anyhow!("Table task failed: {e}"));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
