use super::NotificationType;
use chrono::{DateTime, Utc};
use resource_framework::row::{column, Row, RowBuilder};
use resource_framework::validation::{ValidationErrors, Validator};
use resource_framework::ResourceEntity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub notification_type: Option<NotificationType>,
    pub recipient: Option<String>,
    pub read: Option<bool>,
    pub sent_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPatch {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub notification_type: Option<NotificationType>,
    pub recipient: Option<String>,
    pub read: Option<bool>,
    pub sent_at: Option<DateTime<Utc>>,
}

impl ResourceEntity for Notification {
    const ENTITY_NAME: &'static str = "notification";
    const RESOURCE_PATH: &'static str = "notifications";
    type Patch = NotificationPatch;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn patch_id(patch: &NotificationPatch) -> Option<i64> {
        patch.id
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new(Self::ENTITY_NAME)
            .required("title", &self.title)
            .required("message", &self.message)
            .required("type", &self.notification_type)
            .finish()
    }

    fn apply_patch(&mut self, patch: NotificationPatch) {
        resource_framework::merge_present!(self, patch;
            title, message, notification_type, recipient, read, sent_at);
    }

    fn to_row(&self) -> Row {
        RowBuilder::new()
            .column("id", &self.id)
            .column("title", &self.title)
            .column("message", &self.message)
            .column("type", &self.notification_type)
            .column("recipient", &self.recipient)
            .column("read", &self.read)
            .column("sent_at", &self.sent_at)
            .build()
    }

    fn from_row(row: &Row) -> Self {
        Self {
            id: column::get(row, "id"),
            title: column::get(row, "title"),
            message: column::get(row, "message"),
            notification_type: column::get(row, "type"),
            recipient: column::get(row, "recipient"),
            read: column::get(row, "read"),
            sent_at: column::get(row, "sent_at"),
        }
    }
}
