use super::require;
use crate::model::{Brand, BrandCategory, CATEGORIES};
use async_trait::async_trait;
use resource_framework::relation::{left_join, load_all, require_all};
use resource_framework::{FrameworkError, Repository, ResourceClient};
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// Repository for brand categories. Joins the parent category on every read; the
/// brands of a category come from the link table held by the brand table.
#[derive(Clone)]
pub struct BrandCategoryRepository {
    categories: ResourceClient<BrandCategory>,
    brands: ResourceClient<Brand>,
}

impl BrandCategoryRepository {
    pub fn new(categories: ResourceClient<BrandCategory>, brands: ResourceClient<Brand>) -> Self {
        Self { categories, brands }
    }

    #[instrument(skip(self))]
    pub async fn add_brand(&self, category_id: i64, brand_id: i64) -> Result<bool, FrameworkError> {
        require(&self.categories, category_id).await?;
        self.brands.link(CATEGORIES, brand_id, category_id).await
    }

    #[instrument(skip(self))]
    pub async fn remove_brand(&self, category_id: i64, brand_id: i64) -> Result<bool, FrameworkError> {
        self.brands.unlink(CATEGORIES, brand_id, category_id).await
    }
}

#[async_trait]
impl Repository<BrandCategory> for BrandCategoryRepository {
    fn table(&self) -> &ResourceClient<BrandCategory> {
        &self.categories
    }

    async fn check_references(&self, category: &BrandCategory) -> Result<(), FrameworkError> {
        let parent: BTreeSet<i64> = category.parent.as_ref().and_then(|p| p.id).into_iter().collect();
        require_all(&self.categories, &parent).await
    }

    async fn hydrate(&self, category: &mut BrandCategory, eager: bool) -> Result<(), FrameworkError> {
        category.parent = left_join(&self.categories, category.parent_id)
            .await?
            .map(Box::new);
        if let (true, Some(id)) = (eager, category.id) {
            let owners = self.brands.owners_of(CATEGORIES, id).await?;
            category.brands = load_all(&self.brands, &owners).await?;
        }
        Ok(())
    }

    async fn unlink(&self, id: i64) -> Result<(), FrameworkError> {
        let removed = self.brands.unlink_target(CATEGORIES, id).await?;
        debug!(category_id = id, removed, "Link rows removed");
        Ok(())
    }
}
