use chrono::NaiveDate;
use resource_framework::row::{column, Row, RowBuilder};
use resource_framework::validation::{ValidationErrors, Validator};
use resource_framework::ResourceEntity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub email: Option<String>,
    pub birth_date: Option<NaiveDate>,
    #[serde(default, with = "resource_framework::blob")]
    pub avatar: Option<Vec<u8>>,
    pub avatar_content_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistPatch {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub email: Option<String>,
    pub birth_date: Option<NaiveDate>,
    #[serde(default, with = "resource_framework::blob")]
    pub avatar: Option<Vec<u8>>,
    pub avatar_content_type: Option<String>,
}

impl ResourceEntity for Artist {
    const ENTITY_NAME: &'static str = "artist";
    const RESOURCE_PATH: &'static str = "artists";
    type Patch = ArtistPatch;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn patch_id(patch: &ArtistPatch) -> Option<i64> {
        patch.id
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new(Self::ENTITY_NAME)
            .required("name", &self.name)
            .finish()
    }

    fn apply_patch(&mut self, patch: ArtistPatch) {
        resource_framework::merge_present!(self, patch;
            name, bio, email, birth_date, avatar, avatar_content_type);
    }

    fn to_row(&self) -> Row {
        RowBuilder::new()
            .column("id", &self.id)
            .column("name", &self.name)
            .column("bio", &self.bio)
            .column("email", &self.email)
            .column("birth_date", &self.birth_date)
            .blob("avatar", &self.avatar)
            .column("avatar_content_type", &self.avatar_content_type)
            .build()
    }

    fn from_row(row: &Row) -> Self {
        Self {
            id: column::get(row, "id"),
            name: column::get(row, "name"),
            bio: column::get(row, "bio"),
            email: column::get(row, "email"),
            birth_date: column::get(row, "birth_date"),
            avatar: column::blob(row, "avatar"),
            avatar_content_type: column::get(row, "avatar_content_type"),
        }
    }
}
