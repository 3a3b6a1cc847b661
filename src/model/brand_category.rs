use super::{key_of, Brand};
use resource_framework::relation::LinkSets;
use resource_framework::row::{column, Row, RowBuilder};
use resource_framework::validation::{ValidationErrors, Validator};
use resource_framework::ResourceEntity;
use serde::{Deserialize, Serialize};

/// A brand category, optionally nested under a parent category.
///
/// Parent chains are not checked for cycles. `brands` is the inverse side of
/// `Brand.categories` and is only filled on eager loads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandCategory {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub parent: Option<Box<BrandCategory>>,
    #[serde(skip)]
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub brands: Vec<Brand>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandCategoryPatch {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl BrandCategory {
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::default()
        }
    }
}

impl ResourceEntity for BrandCategory {
    const ENTITY_NAME: &'static str = "brandCategory";
    const RESOURCE_PATH: &'static str = "brand-categories";
    type Patch = BrandCategoryPatch;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn patch_id(patch: &BrandCategoryPatch) -> Option<i64> {
        patch.id
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new(Self::ENTITY_NAME)
            .required("name", &self.name)
            .finish()
    }

    fn apply_patch(&mut self, patch: BrandCategoryPatch) {
        resource_framework::merge_present!(self, patch; name, description);
    }

    fn detach_relations(&mut self) -> LinkSets {
        self.parent_id = key_of(self.parent.take().as_deref());
        self.brands.clear();
        Vec::new()
    }

    fn to_row(&self) -> Row {
        RowBuilder::new()
            .column("id", &self.id)
            .column("name", &self.name)
            .column("description", &self.description)
            .column("parent_id", &self.parent_id)
            .build()
    }

    fn from_row(row: &Row) -> Self {
        Self {
            id: column::get(row, "id"),
            name: column::get(row, "name"),
            description: column::get(row, "description"),
            parent: None,
            parent_id: column::get(row, "parent_id"),
            brands: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_parent_is_reduced_to_its_key() {
        let mut category: BrandCategory = serde_json::from_value(json!({
            "name": "Sneakers",
            "parent": {"id": 2, "name": "Shoes"}
        }))
        .unwrap();
        category.detach_relations();
        assert_eq!(category.parent_id, Some(2));
        assert!(category.parent.is_none());

        let loaded = BrandCategory::from_row(&category.to_row());
        assert_eq!(loaded.parent_id, Some(2));
    }
}
