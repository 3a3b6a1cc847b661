use resource_framework::relation::{ids_of, load_all, LinkSets};
use resource_framework::row::{column, Row, RowBuilder};
use resource_framework::validation::{ValidationErrors, Validator};
use resource_framework::{FrameworkError, PageRequest, ResourceActor, ResourceEntity, SortOrder};
use serde::{Deserialize, Serialize};

// --- Test Entity ---

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Board {
    id: Option<i64>,
    title: Option<String>,
    pinned: Option<bool>,
    #[serde(default)]
    members: Vec<Board>,
    #[serde(skip)]
    folder_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct BoardPatch {
    id: Option<i64>,
    title: Option<String>,
    pinned: Option<bool>,
}

impl Board {
    fn titled(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            ..Self::default()
        }
    }
}

impl ResourceEntity for Board {
    const ENTITY_NAME: &'static str = "board";
    const RESOURCE_PATH: &'static str = "boards";
    const LINKS: &'static [&'static str] = &["members"];
    type Patch = BoardPatch;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn patch_id(patch: &BoardPatch) -> Option<i64> {
        patch.id
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new("board").required("title", &self.title).finish()
    }

    fn apply_patch(&mut self, patch: BoardPatch) {
        if let Some(title) = patch.title {
            self.title = Some(title);
        }
        if let Some(pinned) = patch.pinned {
            self.pinned = Some(pinned);
        }
    }

    fn detach_relations(&mut self) -> LinkSets {
        let members = ids_of(&self.members);
        self.members.clear();
        vec![("members", members)]
    }

    fn to_row(&self) -> Row {
        RowBuilder::new()
            .column("id", &self.id)
            .column("title", &self.title)
            .column("pinned", &self.pinned)
            .column("folder_id", &self.folder_id)
            .build()
    }

    fn from_row(row: &Row) -> Self {
        Self {
            id: column::get(row, "id"),
            title: column::get(row, "title"),
            pinned: column::get(row, "pinned"),
            members: Vec::new(),
            folder_id: column::get(row, "folder_id"),
        }
    }
}

fn member(id: i64) -> Board {
    Board {
        id: Some(id),
        ..Board::default()
    }
}

// --- Tests ---

#[tokio::test]
async fn test_framework_full_lifecycle() {
    // Start Actor
    let (actor, client) = ResourceActor::<Board>::new(10);
    tokio::spawn(actor.run());

    // 1. Create
    let created = client.create(Board::titled("Drops")).await.unwrap();
    assert_eq!(created.id, Some(1)); // First ID should be 1

    // 2. Patch leaves absent fields alone
    let patch = BoardPatch {
        id: Some(1),
        pinned: Some(true),
        ..BoardPatch::default()
    };
    let patched = client.patch(1, patch).await.unwrap();
    assert_eq!(patched.title.as_deref(), Some("Drops"));
    assert_eq!(patched.pinned, Some(true));

    // 3. Replace overwrites everything
    let replaced = client.replace(1, Board::titled("Auctions")).await.unwrap();
    assert_eq!(replaced.id, Some(1));
    assert_eq!(replaced.pinned, None);

    // 4. Delete
    assert!(client.delete(1).await.unwrap());
    assert!(client.get(1).await.unwrap().is_none());
    assert!(!client.delete(1).await.unwrap());

    // Ids are never reused
    let next = client.create(Board::titled("Mints")).await.unwrap();
    assert_eq!(next.id, Some(2));
}

#[tokio::test]
async fn test_absent_rows_report_not_found() {
    let (actor, client) = ResourceActor::<Board>::new(10);
    tokio::spawn(actor.run());

    let replaced = client.replace(5, Board::titled("Ghost")).await;
    assert_eq!(
        replaced.unwrap_err(),
        FrameworkError::NotFound {
            entity: "board",
            id: 5
        }
    );
    let patched = client.patch(5, BoardPatch::default()).await;
    assert!(patched.unwrap_err().is_not_found());
    assert_eq!(client.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_link_rows_follow_owner_saves() {
    let (actor, client) = ResourceActor::<Board>::new(10);
    tokio::spawn(actor.run());

    for title in ["a", "b", "c"] {
        client.create(Board::titled(title)).await.unwrap();
    }

    let mut owner = Board::titled("owner");
    owner.members = vec![member(1), member(2)];
    let owner = client.create(owner).await.unwrap();
    let owner_id = owner.id.unwrap();
    assert!(owner.members.is_empty());
    assert_eq!(client.targets_of("members", owner_id).await.unwrap().len(), 2);

    // Full replace diffs the link set
    let mut update = Board::titled("owner");
    update.members = vec![member(2), member(3)];
    client.replace(owner_id, update).await.unwrap();
    let targets = client.targets_of("members", owner_id).await.unwrap();
    assert_eq!(targets.into_iter().collect::<Vec<_>>(), vec![2, 3]);
    assert!(client.owners_of("members", 1).await.unwrap().is_empty());

    // Loading the linked rows
    let ids = client.targets_of("members", owner_id).await.unwrap();
    let loaded = load_all(&client, &ids).await.unwrap();
    let titles: Vec<_> = loaded.iter().filter_map(|b| b.title.clone()).collect();
    assert_eq!(titles, vec!["b", "c"]);

    // Single link edits and target removal
    assert!(client.link("members", owner_id, 1).await.unwrap());
    assert!(!client.link("members", owner_id, 1).await.unwrap());
    assert!(client.unlink("members", owner_id, 2).await.unwrap());
    assert_eq!(client.unlink_target("members", 3).await.unwrap(), 1);
    let targets = client.targets_of("members", owner_id).await.unwrap();
    assert_eq!(targets.into_iter().collect::<Vec<_>>(), vec![1]);

    // Deleting the owner drops its link rows
    client.delete(owner_id).await.unwrap();
    assert!(client.owners_of("members", 1).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_relations_and_missing_owners_are_rejected() {
    let (actor, client) = ResourceActor::<Board>::new(10);
    tokio::spawn(actor.run());

    let err = client.targets_of("followers", 1).await.unwrap_err();
    assert!(matches!(err, FrameworkError::UnknownRelation { entity: "board", .. }));

    let err = client.link("members", 42, 1).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_find_and_update_where_touch_matching_rows_only() {
    let (actor, client) = ResourceActor::<Board>::new(10);
    tokio::spawn(actor.run());

    for title in ["a", "b", "c"] {
        client.create(Board::titled(title)).await.unwrap();
    }

    let changed = client
        .update_where(|b: &Board| b.id != Some(2), |b: &mut Board| b.folder_id = Some(7))
        .await
        .unwrap();
    assert_eq!(changed, 2);

    let in_folder = client.find(|b: &Board| b.folder_id == Some(7)).await.unwrap();
    let ids: Vec<_> = in_folder.iter().filter_map(|b| b.id).collect();
    assert_eq!(ids, vec![1, 3]);
}

#[tokio::test]
async fn test_list_sorts_and_pages() {
    let (actor, client) = ResourceActor::<Board>::new(10);
    tokio::spawn(actor.run());

    for title in ["m", "z", "a"] {
        client.create(Board::titled(title)).await.unwrap();
    }

    let page = client
        .list(PageRequest::new(0, 2).sorted_by(SortOrder::asc("title")))
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    let titles: Vec<_> = page.items.iter().filter_map(|b| b.title.clone()).collect();
    assert_eq!(titles, vec!["a", "m"]);
    assert!(page.has_next());
}

#[tokio::test]
async fn test_dump_and_restore_keep_rows_links_and_sequence() {
    let (actor, source) = ResourceActor::<Board>::new(10);
    tokio::spawn(actor.run());

    source.create(Board::titled("a")).await.unwrap();
    let mut owner = Board::titled("owner");
    owner.members = vec![member(1)];
    source.create(owner).await.unwrap();
    source.create(Board::titled("gone")).await.unwrap();
    source.delete(3).await.unwrap();

    let dump = source.dump().await.unwrap();
    assert_eq!(dump.rows.len(), 2);
    assert_eq!(dump.next_id, 4);

    let (actor, target) = ResourceActor::<Board>::new(10);
    tokio::spawn(actor.run());
    assert_eq!(target.restore(dump).await.unwrap(), 2);

    assert_eq!(target.get(2).await.unwrap().unwrap().title.as_deref(), Some("owner"));
    assert_eq!(target.owners_of("members", 1).await.unwrap().len(), 1);
    let next = target.create(Board::titled("new")).await.unwrap();
    assert_eq!(next.id, Some(4));
}

#[tokio::test]
async fn test_closed_table_reports_actor_closed() {
    let (actor, client) = ResourceActor::<Board>::new(10);
    drop(actor);

    let result = client.count().await;
    assert_eq!(result, Err(FrameworkError::ActorClosed));
}
