use super::require;
use crate::model::{Brand, BrandCategory, CATEGORIES};
use async_trait::async_trait;
use resource_framework::relation::{ids_of, load_all, require_all};
use resource_framework::{FrameworkError, Repository, ResourceClient};
use tracing::instrument;

/// Repository for brands, the owning side of the brand/category link table.
#[derive(Clone)]
pub struct BrandRepository {
    brands: ResourceClient<Brand>,
    categories: ResourceClient<BrandCategory>,
}

impl BrandRepository {
    pub fn new(brands: ResourceClient<Brand>, categories: ResourceClient<BrandCategory>) -> Self {
        Self { brands, categories }
    }

    #[instrument(skip(self))]
    pub async fn add_category(&self, brand_id: i64, category_id: i64) -> Result<bool, FrameworkError> {
        require(&self.categories, category_id).await?;
        self.brands.link(CATEGORIES, brand_id, category_id).await
    }

    #[instrument(skip(self))]
    pub async fn remove_category(&self, brand_id: i64, category_id: i64) -> Result<bool, FrameworkError> {
        self.brands.unlink(CATEGORIES, brand_id, category_id).await
    }
}

#[async_trait]
impl Repository<Brand> for BrandRepository {
    fn table(&self) -> &ResourceClient<Brand> {
        &self.brands
    }

    async fn check_references(&self, brand: &Brand) -> Result<(), FrameworkError> {
        require_all(&self.categories, &ids_of(&brand.categories)).await
    }

    async fn hydrate(&self, brand: &mut Brand, eager: bool) -> Result<(), FrameworkError> {
        if let (true, Some(id)) = (eager, brand.id) {
            let targets = self.brands.targets_of(CATEGORIES, id).await?;
            brand.categories = load_all(&self.categories, &targets).await?;
        }
        Ok(())
    }
}
