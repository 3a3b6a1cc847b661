use super::{ArtType, AssetType, Collection};
use chrono::{DateTime, Utc};
use resource_framework::relation::LinkSets;
use resource_framework::row::{column, Row, RowBuilder};
use resource_framework::validation::{ValidationErrors, Validator};
use resource_framework::ResourceEntity;
use serde::{Deserialize, Serialize};

/// A piece of art listed on the marketplace.
///
/// `collections` is the inverse side of `Collection.arts`: it is filled when the
/// record is loaded eagerly and ignored on save. Use the repository's
/// `add_collection` / `remove_collection` to change membership from this side.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Art {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub handle: Option<String>,
    pub asset_type: Option<AssetType>,
    #[serde(rename = "type")]
    pub art_type: Option<ArtType>,
    pub description: Option<String>,
    #[serde(default, with = "resource_framework::blob")]
    pub image: Option<Vec<u8>>,
    pub image_content_type: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub collections: Vec<Collection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtPatch {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub handle: Option<String>,
    pub asset_type: Option<AssetType>,
    #[serde(rename = "type")]
    pub art_type: Option<ArtType>,
    pub description: Option<String>,
    #[serde(default, with = "resource_framework::blob")]
    pub image: Option<Vec<u8>>,
    pub image_content_type: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Art {
    pub fn new(name: &str, handle: &str, asset_type: AssetType, art_type: ArtType) -> Self {
        Self {
            name: Some(name.to_string()),
            handle: Some(handle.to_string()),
            asset_type: Some(asset_type),
            art_type: Some(art_type),
            ..Self::default()
        }
    }
}

impl ResourceEntity for Art {
    const ENTITY_NAME: &'static str = "art";
    const RESOURCE_PATH: &'static str = "arts";
    type Patch = ArtPatch;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn patch_id(patch: &ArtPatch) -> Option<i64> {
        patch.id
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new(Self::ENTITY_NAME)
            .required("name", &self.name)
            .min_length("name", &self.name, 1)
            .required("handle", &self.handle)
            .min_length("handle", &self.handle, 1)
            .required("assetType", &self.asset_type)
            .required("type", &self.art_type)
            .finish()
    }

    fn apply_patch(&mut self, patch: ArtPatch) {
        resource_framework::merge_present!(self, patch;
            name, handle, asset_type, art_type, description, image, image_content_type, created_at);
    }

    fn detach_relations(&mut self) -> LinkSets {
        self.collections.clear();
        Vec::new()
    }

    fn to_row(&self) -> Row {
        RowBuilder::new()
            .column("id", &self.id)
            .column("name", &self.name)
            .column("handle", &self.handle)
            .column("asset_type", &self.asset_type)
            .column("type", &self.art_type)
            .column("description", &self.description)
            .blob("image", &self.image)
            .column("image_content_type", &self.image_content_type)
            .column("created_at", &self.created_at)
            .build()
    }

    fn from_row(row: &Row) -> Self {
        Self {
            id: column::get(row, "id"),
            name: column::get(row, "name"),
            handle: column::get(row, "handle"),
            asset_type: column::get(row, "asset_type"),
            art_type: column::get(row, "type"),
            description: column::get(row, "description"),
            image: column::blob(row, "image"),
            image_content_type: column::get(row, "image_content_type"),
            created_at: column::get(row, "created_at"),
            collections: Vec::new(),
        }
    }
}
