use chrono::{DateTime, Utc};
use resource_framework::row::{column, Row, RowBuilder};
use resource_framework::validation::{ValidationErrors, Validator};
use resource_framework::ResourceEntity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collector {
    pub id: Option<i64>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub wallet_address: Option<String>,
    pub joined_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectorPatch {
    pub id: Option<i64>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub wallet_address: Option<String>,
    pub joined_at: Option<DateTime<Utc>>,
}

impl ResourceEntity for Collector {
    const ENTITY_NAME: &'static str = "collector";
    const RESOURCE_PATH: &'static str = "collectors";
    type Patch = CollectorPatch;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn patch_id(patch: &CollectorPatch) -> Option<i64> {
        patch.id
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new(Self::ENTITY_NAME)
            .required("username", &self.username)
            .min_length("username", &self.username, 3)
            .required("email", &self.email)
            .finish()
    }

    fn apply_patch(&mut self, patch: CollectorPatch) {
        resource_framework::merge_present!(self, patch; username, email, wallet_address, joined_at);
    }

    fn to_row(&self) -> Row {
        RowBuilder::new()
            .column("id", &self.id)
            .column("username", &self.username)
            .column("email", &self.email)
            .column("wallet_address", &self.wallet_address)
            .column("joined_at", &self.joined_at)
            .build()
    }

    fn from_row(row: &Row) -> Self {
        Self {
            id: column::get(row, "id"),
            username: column::get(row, "username"),
            email: column::get(row, "email"),
            wallet_address: column::get(row, "wallet_address"),
            joined_at: column::get(row, "joined_at"),
        }
    }
}
