use super::{key_of, Transaction};
use resource_framework::relation::LinkSets;
use resource_framework::row::{column, Row, RowBuilder};
use resource_framework::validation::{ValidationErrors, Validator};
use resource_framework::ResourceEntity;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One destination of a transaction. `position` orders the outputs within it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Output {
    pub id: Option<i64>,
    pub address: Option<String>,
    pub amount: Option<Decimal>,
    pub position: Option<i32>,
    pub transaction: Option<Transaction>,
    #[serde(skip)]
    pub transaction_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputPatch {
    pub id: Option<i64>,
    pub address: Option<String>,
    pub amount: Option<Decimal>,
    pub position: Option<i32>,
}

impl ResourceEntity for Output {
    const ENTITY_NAME: &'static str = "output";
    const RESOURCE_PATH: &'static str = "outputs";
    type Patch = OutputPatch;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn patch_id(patch: &OutputPatch) -> Option<i64> {
        patch.id
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new(Self::ENTITY_NAME)
            .required("address", &self.address)
            .decimal_min("amount", &self.amount, Decimal::ZERO)
            .min("position", &self.position, 0)
            .finish()
    }

    fn apply_patch(&mut self, patch: OutputPatch) {
        resource_framework::merge_present!(self, patch; address, amount, position);
    }

    fn detach_relations(&mut self) -> LinkSets {
        self.transaction_id = key_of(self.transaction.take().as_ref());
        Vec::new()
    }

    fn to_row(&self) -> Row {
        RowBuilder::new()
            .column("id", &self.id)
            .column("address", &self.address)
            .column("amount", &self.amount)
            .column("position", &self.position)
            .column("transaction_id", &self.transaction_id)
            .build()
    }

    fn from_row(row: &Row) -> Self {
        Self {
            id: column::get(row, "id"),
            address: column::get(row, "address"),
            amount: column::get(row, "amount"),
            position: column::get(row, "position"),
            transaction: None,
            transaction_id: column::get(row, "transaction_id"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_numbers_are_bounded_when_present() {
        let mut output = Output {
            address: Some("0xabc".into()),
            ..Output::default()
        };
        assert!(output.validate().is_ok());

        output.position = Some(-1);
        output.amount = Some(Decimal::NEGATIVE_ONE);
        let errors = output.validate().unwrap_err();
        assert!(errors.has("position", "Min"));
        assert!(errors.has("amount", "DecimalMin"));
    }
}
