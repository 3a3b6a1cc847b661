use super::{Data, Output, TransactionStatus};
use chrono::{DateTime, Utc};
use resource_framework::relation::LinkSets;
use resource_framework::row::{column, Row, RowBuilder};
use resource_framework::validation::{ValidationErrors, Validator};
use resource_framework::ResourceEntity;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A payment or transfer recorded on the marketplace. Owns its `Data` entries and `Output`s.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Option<i64>,
    pub reference: Option<String>,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub status: Option<TransactionStatus>,
    pub created_at: Option<DateTime<Utc>>,
    pub description: Option<String>,
    #[serde(default)]
    pub datas: Vec<Data>,
    #[serde(default)]
    pub outputs: Vec<Output>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPatch {
    pub id: Option<i64>,
    pub reference: Option<String>,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub status: Option<TransactionStatus>,
    pub created_at: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

impl ResourceEntity for Transaction {
    const ENTITY_NAME: &'static str = "transaction";
    const RESOURCE_PATH: &'static str = "transactions";
    type Patch = TransactionPatch;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn patch_id(patch: &TransactionPatch) -> Option<i64> {
        patch.id
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new(Self::ENTITY_NAME)
            .required("reference", &self.reference)
            .min_length("reference", &self.reference, 1)
            .required("amount", &self.amount)
            .decimal_min("amount", &self.amount, Decimal::ZERO)
            .required("currency", &self.currency)
            .min_length("currency", &self.currency, 3)
            .max_length("currency", &self.currency, 3)
            .required("status", &self.status)
            .finish()
    }

    fn apply_patch(&mut self, patch: TransactionPatch) {
        resource_framework::merge_present!(self, patch;
            reference, amount, currency, status, created_at, description);
    }

    fn detach_relations(&mut self) -> LinkSets {
        self.datas.clear();
        self.outputs.clear();
        Vec::new()
    }

    fn to_row(&self) -> Row {
        RowBuilder::new()
            .column("id", &self.id)
            .column("reference", &self.reference)
            .column("amount", &self.amount)
            .column("currency", &self.currency)
            .column("status", &self.status)
            .column("created_at", &self.created_at)
            .column("description", &self.description)
            .build()
    }

    fn from_row(row: &Row) -> Self {
        Self {
            id: column::get(row, "id"),
            reference: column::get(row, "reference"),
            amount: column::get(row, "amount"),
            currency: column::get(row, "currency"),
            status: column::get(row, "status"),
            created_at: column::get(row, "created_at"),
            description: column::get(row, "description"),
            datas: Vec::new(),
            outputs: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid() -> Transaction {
        serde_json::from_value(json!({
            "reference": "tx-1",
            "amount": 12.5,
            "currency": "EUR",
            "status": "PENDING"
        }))
        .unwrap()
    }

    #[test]
    fn test_amount_reads_json_numbers() {
        let tx = valid();
        assert_eq!(tx.amount, Some(Decimal::new(125, 1)));
        assert!(tx.validate().is_ok());
        assert_eq!(serde_json::to_value(&tx).unwrap()["amount"], json!(12.5));
    }

    #[test]
    fn test_amount_and_currency_constraints() {
        let mut tx = valid();
        tx.amount = Some(Decimal::new(-1, 2));
        tx.currency = Some("EURO".into());
        let errors = tx.validate().unwrap_err();
        assert!(errors.has("amount", "DecimalMin"));
        assert!(errors.has("currency", "Size"));
    }
}
