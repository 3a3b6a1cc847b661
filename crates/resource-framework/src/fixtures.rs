//! Entity used by the unit tests of this crate.

use crate::entity::ResourceEntity;
use crate::relation::{ids_of, LinkSets};
use crate::row::{column, Row, RowBuilder};
use crate::validation::{ValidationErrors, Validator};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sticker {
    pub id: Option<i64>,
    pub label: Option<String>,
    pub weight: Option<i32>,
    #[serde(default)]
    pub friends: Vec<Sticker>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickerPatch {
    pub id: Option<i64>,
    pub label: Option<String>,
    pub weight: Option<i32>,
}

crate::impl_identity_eq!(Sticker);

impl Sticker {
    pub fn labelled(label: &str) -> Self {
        Self {
            label: Some(label.to_string()),
            ..Self::default()
        }
    }
}

impl ResourceEntity for Sticker {
    const ENTITY_NAME: &'static str = "sticker";
    const RESOURCE_PATH: &'static str = "stickers";
    const LINKS: &'static [&'static str] = &["friends"];
    type Patch = StickerPatch;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn patch_id(patch: &StickerPatch) -> Option<i64> {
        patch.id
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new("sticker")
            .required("label", &self.label)
            .min_length("label", &self.label, 2)
            .min("weight", &self.weight, 0)
            .finish()
    }

    fn apply_patch(&mut self, patch: StickerPatch) {
        if let Some(label) = patch.label {
            self.label = Some(label);
        }
        if let Some(weight) = patch.weight {
            self.weight = Some(weight);
        }
    }

    fn detach_relations(&mut self) -> LinkSets {
        let friends = ids_of(&self.friends);
        self.friends.clear();
        vec![("friends", friends)]
    }

    fn to_row(&self) -> Row {
        RowBuilder::new()
            .column("id", &self.id)
            .column("label", &self.label)
            .column("weight", &self.weight)
            .build()
    }

    fn from_row(row: &Row) -> Self {
        Self {
            id: column::get(row, "id"),
            label: column::get(row, "label"),
            weight: column::get(row, "weight"),
            friends: Vec::new(),
        }
    }
}
