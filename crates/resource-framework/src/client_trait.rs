//! # Repository Trait
//!
//! The storage port of a resource. Provides the CRUD statements every entity needs on
//! top of its table's [`ResourceClient`], plus hooks for entities with relations:
//! [`Repository::check_references`] rejects writes naming absent rows,
//! [`Repository::hydrate`] resolves relations of loaded rows and [`Repository::unlink`]
//! removes link rows held by *other* tables before a delete.
use crate::page::{Page, PageRequest};
use crate::{FrameworkError, ResourceClient, ResourceEntity};
use async_trait::async_trait;

/// Trait for resource-specific repositories to inherit standard CRUD operations.
///
/// This trait reduces boilerplate by providing default implementations for every
/// statement. A repository only supplies its table and, where the entity has
/// relations, overrides the hooks.
///
/// # Example
///
/// ```rust
/// use resource_framework::{FrameworkError, Repository, ResourceActor, ResourceClient, ResourceEntity};
/// use resource_framework::relation::left_join;
/// use resource_framework::row::{column, Row, RowBuilder};
/// use resource_framework::validation::{ValidationErrors, Validator};
/// use async_trait::async_trait;
/// use serde::{Deserialize, Serialize};
///
/// // 1. Define Entities: a shelf and the books standing on it
/// #[derive(Clone, Debug, Default, Serialize, Deserialize)]
/// struct Shelf { id: Option<i64>, label: Option<String> }
/// #[derive(Debug, Deserialize)]
/// struct ShelfPatch { id: Option<i64> }
///
/// #[derive(Clone, Debug, Default, Serialize, Deserialize)]
/// struct Book {
///     id: Option<i64>,
///     title: Option<String>,
///     shelf: Option<Shelf>,
///     #[serde(skip)]
///     shelf_id: Option<i64>,
/// }
/// #[derive(Debug, Deserialize)]
/// struct BookPatch { id: Option<i64> }
///
/// impl ResourceEntity for Shelf {
///     const ENTITY_NAME: &'static str = "shelf";
///     const RESOURCE_PATH: &'static str = "shelves";
///     type Patch = ShelfPatch;
///     fn id(&self) -> Option<i64> { self.id }
///     fn set_id(&mut self, id: i64) { self.id = Some(id) }
///     fn patch_id(patch: &ShelfPatch) -> Option<i64> { patch.id }
///     fn validate(&self) -> Result<(), ValidationErrors> { Ok(()) }
///     fn apply_patch(&mut self, _: ShelfPatch) {}
///     fn to_row(&self) -> Row { RowBuilder::new().column("id", &self.id).build() }
///     fn from_row(row: &Row) -> Self { Self { id: column::get(row, "id"), label: None } }
/// }
///
/// impl ResourceEntity for Book {
///     const ENTITY_NAME: &'static str = "book";
///     const RESOURCE_PATH: &'static str = "books";
///     type Patch = BookPatch;
///     fn id(&self) -> Option<i64> { self.id }
///     fn set_id(&mut self, id: i64) { self.id = Some(id) }
///     fn patch_id(patch: &BookPatch) -> Option<i64> { patch.id }
///     fn validate(&self) -> Result<(), ValidationErrors> {
///         Validator::new("book").required("title", &self.title).finish()
///     }
///     fn apply_patch(&mut self, _: BookPatch) {}
///     fn detach_relations(&mut self) -> resource_framework::relation::LinkSets {
///         self.shelf_id = self.shelf.take().and_then(|s| s.id);
///         Vec::new()
///     }
///     fn to_row(&self) -> Row { RowBuilder::new().column("id", &self.id).build() }
///     fn from_row(row: &Row) -> Self { Self { id: column::get(row, "id"), ..Self::default() } }
/// }
///
/// // 2. Define the Repository
/// struct BookRepository {
///     books: ResourceClient<Book>,
///     shelves: ResourceClient<Shelf>,
/// }
///
/// // 3. Implement Repository, overriding only the relation hook
/// #[async_trait]
/// impl Repository<Book> for BookRepository {
///     fn table(&self) -> &ResourceClient<Book> {
///         &self.books
///     }
///
///     async fn hydrate(&self, book: &mut Book, _eager: bool) -> Result<(), FrameworkError> {
///         book.shelf = left_join(&self.shelves, book.shelf_id).await?;
///         Ok(())
///     }
/// }
///
/// // 4. Usage
/// #[tokio::main]
/// async fn main() {
///     let (book_actor, books) = ResourceActor::<Book>::new(10);
///     let (shelf_actor, shelves) = ResourceActor::<Shelf>::new(10);
///     tokio::spawn(book_actor.run());
///     tokio::spawn(shelf_actor.run());
///
///     let shelf = shelves.create(Shelf { id: None, label: Some("A".into()) }).await.unwrap();
///     let repo = BookRepository { books, shelves };
///
///     // insert() and find_by_id() are provided automatically!
///     let book = Book { title: Some("Dune".into()), shelf: Some(shelf), ..Book::default() };
///     let saved = repo.insert(book).await.unwrap();
///     let loaded = repo.find_by_id(saved.id.unwrap()).await.unwrap().unwrap();
///     assert_eq!(loaded.shelf.unwrap().label.as_deref(), Some("A"));
/// }
/// ```
#[async_trait]
pub trait Repository<T: ResourceEntity>: Send + Sync {
    /// Access the table this repository writes to.
    fn table(&self) -> &ResourceClient<T>;

    /// Resolves the relations of a loaded record.
    ///
    /// Foreign-key parents are joined on every read; related sets only when `eager`.
    async fn hydrate(&self, _entity: &mut T, _eager: bool) -> Result<(), FrameworkError> {
        Ok(())
    }

    /// Runs before `insert` and `replace` write anything. Fails with
    /// [`FrameworkError::MissingReference`] when a relation names an absent row.
    async fn check_references(&self, _entity: &T) -> Result<(), FrameworkError> {
        Ok(())
    }

    /// Removes link rows that other tables hold for the record about to be deleted.
    async fn unlink(&self, _id: i64) -> Result<(), FrameworkError> {
        Ok(())
    }

    /// Persist a new record and return it with its id and relations.
    #[tracing::instrument(skip(self, entity), fields(entity_type = T::ENTITY_NAME))]
    async fn insert(&self, entity: T) -> Result<T, FrameworkError> {
        tracing::debug!("Sending request");
        self.check_references(&entity).await?;
        let mut saved = self.table().create(entity).await?;
        self.hydrate(&mut saved, true).await?;
        Ok(saved)
    }

    /// Replace an existing record wholesale.
    #[tracing::instrument(skip(self, entity), fields(entity_type = T::ENTITY_NAME))]
    async fn replace(&self, id: i64, entity: T) -> Result<T, FrameworkError> {
        tracing::debug!("Sending request");
        self.check_references(&entity).await?;
        let mut saved = self.table().replace(id, entity).await?;
        self.hydrate(&mut saved, true).await?;
        Ok(saved)
    }

    /// Merge the present fields of `patch` into an existing record.
    #[tracing::instrument(skip(self, patch), fields(entity_type = T::ENTITY_NAME))]
    async fn patch(&self, id: i64, patch: T::Patch) -> Result<T, FrameworkError> {
        tracing::debug!("Sending request");
        let mut saved = self.table().patch(id, patch).await?;
        self.hydrate(&mut saved, true).await?;
        Ok(saved)
    }

    /// Fetch a record by ID with all of its relations.
    #[tracing::instrument(skip(self), fields(entity_type = T::ENTITY_NAME))]
    async fn find_by_id(&self, id: i64) -> Result<Option<T>, FrameworkError> {
        tracing::debug!("Sending request");
        match self.table().get(id).await? {
            Some(mut entity) => {
                self.hydrate(&mut entity, true).await?;
                Ok(Some(entity))
            }
            None => Ok(None),
        }
    }

    async fn exists(&self, id: i64) -> Result<bool, FrameworkError> {
        Ok(self.table().get(id).await?.is_some())
    }

    /// Fetch one page, joining related sets only when `eager`.
    #[tracing::instrument(skip(self), fields(entity_type = T::ENTITY_NAME))]
    async fn find_page(&self, page: PageRequest, eager: bool) -> Result<Page<T>, FrameworkError> {
        tracing::debug!("Sending request");
        let mut result = self.table().list(page).await?;
        for entity in result.items.iter_mut() {
            self.hydrate(entity, eager).await?;
        }
        Ok(result)
    }

    /// Delete a record by ID. Returns whether it existed.
    #[tracing::instrument(skip(self), fields(entity_type = T::ENTITY_NAME))]
    async fn delete_by_id(&self, id: i64) -> Result<bool, FrameworkError> {
        tracing::debug!("Sending request");
        self.unlink(id).await?;
        self.table().delete(id).await
    }

    async fn count(&self) -> Result<u64, FrameworkError> {
        self.table().count().await
    }
}

/// Entities without relations use their table directly as repository.
impl<T: ResourceEntity> Repository<T> for ResourceClient<T> {
    fn table(&self) -> &ResourceClient<T> {
        self
    }
}
