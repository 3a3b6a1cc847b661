use super::{BrandCategory, BrandStatus};
use resource_framework::relation::{ids_of, LinkSets};
use resource_framework::row::{column, Row, RowBuilder};
use resource_framework::validation::{ValidationErrors, Validator};
use resource_framework::ResourceEntity;
use serde::{Deserialize, Serialize};

/// Link table between brands and categories, owned by the brand table.
pub const CATEGORIES: &str = "categories";

/// A storefront brand. Owning side of the brand/category membership.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    #[serde(default, with = "resource_framework::blob")]
    pub logo: Option<Vec<u8>>,
    pub logo_content_type: Option<String>,
    pub status: Option<BrandStatus>,
    #[serde(default)]
    pub categories: Vec<BrandCategory>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandPatch {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    #[serde(default, with = "resource_framework::blob")]
    pub logo: Option<Vec<u8>>,
    pub logo_content_type: Option<String>,
    pub status: Option<BrandStatus>,
}

impl Brand {
    pub fn new(name: &str, slug: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            slug: Some(slug.to_string()),
            status: Some(BrandStatus::Active),
            ..Self::default()
        }
    }
}

impl ResourceEntity for Brand {
    const ENTITY_NAME: &'static str = "brand";
    const RESOURCE_PATH: &'static str = "brands";
    const LINKS: &'static [&'static str] = &[CATEGORIES];
    type Patch = BrandPatch;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn patch_id(patch: &BrandPatch) -> Option<i64> {
        patch.id
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new(Self::ENTITY_NAME)
            .required("name", &self.name)
            .required("slug", &self.slug)
            .min_length("slug", &self.slug, 2)
            .required("status", &self.status)
            .finish()
    }

    fn apply_patch(&mut self, patch: BrandPatch) {
        resource_framework::merge_present!(self, patch;
            name, slug, description, website, logo, logo_content_type, status);
    }

    fn detach_relations(&mut self) -> LinkSets {
        let categories = ids_of(&self.categories);
        self.categories.clear();
        vec![(CATEGORIES, categories)]
    }

    fn to_row(&self) -> Row {
        RowBuilder::new()
            .column("id", &self.id)
            .column("name", &self.name)
            .column("slug", &self.slug)
            .column("description", &self.description)
            .column("website", &self.website)
            .blob("logo", &self.logo)
            .column("logo_content_type", &self.logo_content_type)
            .column("status", &self.status)
            .build()
    }

    fn from_row(row: &Row) -> Self {
        Self {
            id: column::get(row, "id"),
            name: column::get(row, "name"),
            slug: column::get(row, "slug"),
            description: column::get(row, "description"),
            website: column::get(row, "website"),
            logo: column::blob(row, "logo"),
            logo_content_type: column::get(row, "logo_content_type"),
            status: column::get(row, "status"),
            categories: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_needs_two_characters() {
        assert!(Brand::new("Acme", "ac").validate().is_ok());
        let errors = Brand::new("Acme", "a").validate().unwrap_err();
        assert!(errors.has("slug", "Size"));
    }
}
