use super::{key_of, Collection};
use resource_framework::relation::LinkSets;
use resource_framework::row::{column, Row, RowBuilder};
use resource_framework::validation::{ValidationErrors, Validator};
use resource_framework::ResourceEntity;
use serde::{Deserialize, Serialize};

/// A named trait of a collection (e.g. `palette = warm`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub value: Option<String>,
    pub description: Option<String>,
    pub collection: Option<Collection>,
    #[serde(skip)]
    pub collection_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturePatch {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub value: Option<String>,
    pub description: Option<String>,
}

impl ResourceEntity for Feature {
    const ENTITY_NAME: &'static str = "feature";
    const RESOURCE_PATH: &'static str = "features";
    type Patch = FeaturePatch;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn patch_id(patch: &FeaturePatch) -> Option<i64> {
        patch.id
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new(Self::ENTITY_NAME)
            .required("name", &self.name)
            .finish()
    }

    fn apply_patch(&mut self, patch: FeaturePatch) {
        resource_framework::merge_present!(self, patch; name, value, description);
    }

    fn detach_relations(&mut self) -> LinkSets {
        self.collection_id = key_of(self.collection.take().as_ref());
        Vec::new()
    }

    fn to_row(&self) -> Row {
        RowBuilder::new()
            .column("id", &self.id)
            .column("name", &self.name)
            .column("value", &self.value)
            .column("description", &self.description)
            .column("collection_id", &self.collection_id)
            .build()
    }

    fn from_row(row: &Row) -> Self {
        Self {
            id: column::get(row, "id"),
            name: column::get(row, "name"),
            value: column::get(row, "value"),
            description: column::get(row, "description"),
            collection: None,
            collection_id: column::get(row, "collection_id"),
        }
    }
}
