use super::{key_of, Transaction};
use resource_framework::relation::LinkSets;
use resource_framework::row::{column, Row, RowBuilder};
use resource_framework::validation::{ValidationErrors, Validator};
use resource_framework::ResourceEntity;
use serde::{Deserialize, Serialize};

/// A key/value payload attached to a transaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Data {
    pub id: Option<i64>,
    pub key: Option<String>,
    pub value: Option<String>,
    pub encoding: Option<String>,
    pub transaction: Option<Transaction>,
    #[serde(skip)]
    pub transaction_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPatch {
    pub id: Option<i64>,
    pub key: Option<String>,
    pub value: Option<String>,
    pub encoding: Option<String>,
}

impl ResourceEntity for Data {
    const ENTITY_NAME: &'static str = "data";
    const RESOURCE_PATH: &'static str = "data";
    type Patch = DataPatch;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn patch_id(patch: &DataPatch) -> Option<i64> {
        patch.id
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new(Self::ENTITY_NAME)
            .required("key", &self.key)
            .finish()
    }

    fn apply_patch(&mut self, patch: DataPatch) {
        resource_framework::merge_present!(self, patch; key, value, encoding);
    }

    fn detach_relations(&mut self) -> LinkSets {
        self.transaction_id = key_of(self.transaction.take().as_ref());
        Vec::new()
    }

    fn to_row(&self) -> Row {
        RowBuilder::new()
            .column("id", &self.id)
            .column("key", &self.key)
            .column("value", &self.value)
            .column("encoding", &self.encoding)
            .column("transaction_id", &self.transaction_id)
            .build()
    }

    fn from_row(row: &Row) -> Self {
        Self {
            id: column::get(row, "id"),
            key: column::get(row, "key"),
            value: column::get(row, "value"),
            encoding: column::get(row, "encoding"),
            transaction: None,
            transaction_id: column::get(row, "transaction_id"),
        }
    }
}
