use super::{Art, Feature};
use chrono::{DateTime, Utc};
use resource_framework::relation::{ids_of, LinkSets};
use resource_framework::row::{column, Row, RowBuilder};
use resource_framework::validation::{ValidationErrors, Validator};
use resource_framework::ResourceEntity;
use serde::{Deserialize, Serialize};

/// Link table between collections and arts, owned by the collection table.
pub const ARTS: &str = "arts";

/// A curated set of arts. Names are unique in practice and can be looked up directly.
///
/// `arts` is the owning side of the art membership: saving a collection replaces its
/// link rows with exactly the ids listed. `features` are owned children and are
/// managed through the repository, never through a save.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, with = "resource_framework::blob")]
    pub banner: Option<Vec<u8>>,
    pub banner_content_type: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub arts: Vec<Art>,
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionPatch {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, with = "resource_framework::blob")]
    pub banner: Option<Vec<u8>>,
    pub banner_content_type: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Collection {
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::default()
        }
    }
}

impl ResourceEntity for Collection {
    const ENTITY_NAME: &'static str = "collection";
    const RESOURCE_PATH: &'static str = "collections";
    const LINKS: &'static [&'static str] = &[ARTS];
    type Patch = CollectionPatch;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn patch_id(patch: &CollectionPatch) -> Option<i64> {
        patch.id
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new(Self::ENTITY_NAME)
            .required("name", &self.name)
            .min_length("name", &self.name, 1)
            .finish()
    }

    fn apply_patch(&mut self, patch: CollectionPatch) {
        resource_framework::merge_present!(self, patch;
            name, title, description, banner, banner_content_type, created_at);
    }

    fn detach_relations(&mut self) -> LinkSets {
        let arts = ids_of(&self.arts);
        self.arts.clear();
        self.features.clear();
        vec![(ARTS, arts)]
    }

    fn to_row(&self) -> Row {
        RowBuilder::new()
            .column("id", &self.id)
            .column("name", &self.name)
            .column("title", &self.title)
            .column("description", &self.description)
            .blob("banner", &self.banner)
            .column("banner_content_type", &self.banner_content_type)
            .column("created_at", &self.created_at)
            .build()
    }

    fn from_row(row: &Row) -> Self {
        Self {
            id: column::get(row, "id"),
            name: column::get(row, "name"),
            title: column::get(row, "title"),
            description: column::get(row, "description"),
            banner: column::blob(row, "banner"),
            banner_content_type: column::get(row, "banner_content_type"),
            created_at: column::get(row, "created_at"),
            arts: Vec::new(),
            features: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detach_moves_art_ids_into_link_rows() {
        let mut collection = Collection::named("Genesis");
        collection.arts = vec![
            Art { id: Some(4), ..Art::default() },
            Art { id: Some(2), ..Art::default() },
            Art::default(),
        ];
        collection.features = vec![Feature::default()];

        let links = collection.detach_relations();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].0, ARTS);
        assert_eq!(links[0].1.iter().copied().collect::<Vec<_>>(), vec![2, 4]);
        assert!(collection.arts.is_empty());
        assert!(collection.features.is_empty());
    }

    #[test]
    fn test_name_is_required() {
        assert!(Collection::default().validate().unwrap_err().has("name", "NotNull"));
        assert!(Collection::named("Genesis").validate().is_ok());
    }
}
