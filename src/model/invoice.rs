use super::InvoiceStatus;
use chrono::{DateTime, NaiveDate, Utc};
use resource_framework::row::{column, Row, RowBuilder};
use resource_framework::validation::{ValidationErrors, Validator};
use resource_framework::ResourceEntity;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Option<i64>,
    pub code: Option<String>,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<InvoiceStatus>,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePatch {
    pub id: Option<i64>,
    pub code: Option<String>,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<InvoiceStatus>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl ResourceEntity for Invoice {
    const ENTITY_NAME: &'static str = "invoice";
    const RESOURCE_PATH: &'static str = "invoices";
    type Patch = InvoicePatch;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn patch_id(patch: &InvoicePatch) -> Option<i64> {
        patch.id
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new(Self::ENTITY_NAME)
            .required("code", &self.code)
            .required("amount", &self.amount)
            .decimal_min("amount", &self.amount, Decimal::ZERO)
            .required("issueDate", &self.issue_date)
            .required("status", &self.status)
            .finish()
    }

    fn apply_patch(&mut self, patch: InvoicePatch) {
        resource_framework::merge_present!(self, patch;
            code, amount, currency, issue_date, due_date, status, paid_at);
    }

    fn to_row(&self) -> Row {
        RowBuilder::new()
            .column("id", &self.id)
            .column("code", &self.code)
            .column("amount", &self.amount)
            .column("currency", &self.currency)
            .column("issue_date", &self.issue_date)
            .column("due_date", &self.due_date)
            .column("status", &self.status)
            .column("paid_at", &self.paid_at)
            .build()
    }

    fn from_row(row: &Row) -> Self {
        Self {
            id: column::get(row, "id"),
            code: column::get(row, "code"),
            amount: column::get(row, "amount"),
            currency: column::get(row, "currency"),
            issue_date: column::get(row, "issue_date"),
            due_date: column::get(row, "due_date"),
            status: column::get(row, "status"),
            paid_at: column::get(row, "paid_at"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_fields_use_json_names() {
        let errors = Invoice::default().validate().unwrap_err();
        for field in ["code", "amount", "issueDate", "status"] {
            assert!(errors.has(field, "NotNull"), "missing {field}");
        }
        assert!(!errors.has("currency", "NotNull"));
    }

    #[test]
    fn test_large_amount_survives_json_and_row() {
        let invoice: Invoice =
            serde_json::from_str(r#"{"code": "INV-9", "amount": 12345678901234567.89}"#).unwrap();
        assert_eq!(invoice.amount, Some(Decimal::new(1234567890123456789, 2)));

        let stored = Invoice::from_row(&invoice.to_row());
        assert_eq!(stored.amount, invoice.amount);

        let text = serde_json::to_string(&stored).unwrap();
        assert!(text.contains(r#""amount":12345678901234567.89"#), "{text}");
    }
}
