//! # Mock Framework & Testing Guide
//!
//! The `MockClient<T>` type hands out a real `ResourceClient<T>` whose requests are
//! answered from a queue of expectations instead of a table. It lets you script return
//! values and failures for unit tests of repositories and HTTP resources without
//! spawning any table actors.
//!
//! ## When to use Mocks vs Real Actors
//!
//! | Feature | MockClient | Real Actor |
//! |---------|------------|------------|
//! | **Speed** | Instant (in-memory) | Fast (but involves tokio spawn) |
//! | **Determinism** | 100% Deterministic | Subject to scheduler |
//! | **State** | No real state (expectations) | Real rows and link tables |
//! | **Use Case** | Testing logic *around* the client | Testing the table itself or full system |
//! | **Error Injection** | Easy (`return_err`) | Hard (requires a stopped actor) |
//!
//! ## Testing Strategies
//!
//! <details>
//! <summary><b>Pattern 0: Repository Logic Test (Pure Mock)</b></summary>
//!
//! **When to use**: Testing what a repository or handler does with the answers of its
//! table without spinning up any actors.
//!
//! ```rust
//! use resource_framework::mock::MockClient;
//! use resource_framework::{Repository, ResourceEntity};
//! use resource_framework::row::{column, Row, RowBuilder};
//! use resource_framework::validation::ValidationErrors;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Debug, Default, Serialize, Deserialize)]
//! struct Tag { id: Option<i64>, name: Option<String> }
//! #[derive(Debug, Deserialize)]
//! struct TagPatch { id: Option<i64> }
//!
//! impl ResourceEntity for Tag {
//!     const ENTITY_NAME: &'static str = "tag";
//!     const RESOURCE_PATH: &'static str = "tags";
//!     type Patch = TagPatch;
//!     fn id(&self) -> Option<i64> { self.id }
//!     fn set_id(&mut self, id: i64) { self.id = Some(id) }
//!     fn patch_id(patch: &TagPatch) -> Option<i64> { patch.id }
//!     fn validate(&self) -> Result<(), ValidationErrors> { Ok(()) }
//!     fn apply_patch(&mut self, _: TagPatch) {}
//!     fn to_row(&self) -> Row { RowBuilder::new().column("id", &self.id).build() }
//!     fn from_row(row: &Row) -> Self { Self { id: column::get(row, "id"), name: None } }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     // 1. Setup Mocks
//!     let mut mock = MockClient::<Tag>::new();
//!     mock.expect_get(1)
//!         .return_ok(Some(Tag { id: Some(1), name: Some("rare".into()) }));
//!
//!     // 2. The client itself is a repository
//!     let repo = mock.client();
//!
//!     // 3. Test Logic
//!     let tag = repo.find_by_id(1).await.unwrap();
//!     assert_eq!(tag.unwrap().name.as_deref(), Some("rare"));
//!     mock.verify();
//! }
//! ```
//! </details>
//!
//! <details>
//! <summary><b>Pattern 1: Single Table Test (Fast, Isolated)</b></summary>
//!
//! **When to use**: Testing a table actor's statements in isolation. Spawn a
//! `ResourceActor<T>` and drive it through its client, see `tests/integration_test.rs`.
//! </details>
//!
//! <details>
//! <summary><b>Pattern 2: Full System Integration Test (Comprehensive)</b></summary>
//!
//! **When to use**: End-to-end flows through the HTTP router and every table, see the
//! application crate's `tests/` directory.
//! </details>
//!
//! ## Testing Failure Scenarios
//!
//! One of the biggest advantages of `MockClient` is the ability to simulate failures
//! that are hard to reproduce with real actors, such as a table that stopped.
//!
//! ```rust,ignore
//! mock.expect_count().return_err(FrameworkError::ActorClosed);
//! let result = mock.client().count().await;
//! assert!(matches!(result, Err(FrameworkError::ActorClosed)));
//! ```
//!
//! ## Mocking Utilities
//!
//! Use [`create_mock_client`] to get a client and a receiver, or use the fluent [`MockClient`] API.

use crate::client::ResourceClient;
use crate::entity::ResourceEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use crate::page::Page;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{mpsc, oneshot};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

type Reply<R> = Result<R, FrameworkError>;

/// Represents an expected request to the mock client.
enum Expectation<T: ResourceEntity> {
    Get { id: i64, response: Reply<Option<T>> },
    Create { response: Reply<T> },
    Replace { id: i64, response: Reply<T> },
    Patch { id: i64, response: Reply<T> },
    Delete { id: i64, response: Reply<bool> },
    Count { response: Reply<u64> },
    List { response: Reply<Page<T>> },
}

impl<T: ResourceEntity> Expectation<T> {
    fn describe(&self) -> String {
        match self {
            Self::Get { id, .. } => format!("get({id})"),
            Self::Create { .. } => "create".to_string(),
            Self::Replace { id, .. } => format!("replace({id})"),
            Self::Patch { id, .. } => format!("patch({id})"),
            Self::Delete { id, .. } => format!("delete({id})"),
            Self::Count { .. } => "count".to_string(),
            Self::List { .. } => "list".to_string(),
        }
    }
}

type Queue<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

fn lock<T: ResourceEntity>(queue: &Queue<T>) -> MutexGuard<'_, VecDeque<Expectation<T>>> {
    queue.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A mock client with expectation tracking for fluent testing.
///
/// Expectations are consumed in order. A request that does not match the next
/// expectation panics the mock task, and its caller sees `ActorDropped`.
///
/// # Example
/// ```ignore
/// let mut mock = MockClient::<Art>::new();
/// mock.expect_create().return_ok(saved_art);
/// mock.expect_get(1).return_ok(None);
///
/// let client = mock.client();
/// // Use client in tests...
/// mock.verify(); // Ensures all expectations were met
/// ```
pub struct MockClient<T: ResourceEntity> {
    client: ResourceClient<T>,
    expectations: Queue<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ResourceEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ResourceEntity> MockClient<T> {
    /// Creates a new mock client with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Queue<T> = Arc::new(Mutex::new(VecDeque::new()));
        let queue = expectations.clone();

        // Spawn background task to handle requests
        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = lock(&queue).pop_front();

                match (request, expectation) {
                    (ResourceRequest::Get { id, respond_to }, Some(Expectation::Get { id: want, response }))
                        if id == want =>
                    {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::Create { respond_to, .. }, Some(Expectation::Create { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Replace { id, respond_to, .. },
                        Some(Expectation::Replace { id: want, response }),
                    ) if id == want => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Patch { id, respond_to, .. },
                        Some(Expectation::Patch { id: want, response }),
                    ) if id == want => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Delete { id, respond_to },
                        Some(Expectation::Delete { id: want, response }),
                    ) if id == want => {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::Count { respond_to }, Some(Expectation::Count { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::List { respond_to, .. }, Some(Expectation::List { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (request, expectation) => {
                        panic!(
                            "Unexpected request {:?}, expected {}",
                            request,
                            expectation.map_or("nothing".to_string(), |e| e.describe())
                        );
                    }
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    fn expect<R: 'static>(&mut self, make: fn(Reply<R>) -> Expectation<T>) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            expectations: self.expectations.clone(),
            make: Box::new(make),
        }
    }

    fn expect_with_id<R: 'static>(
        &mut self,
        id: i64,
        make: fn(i64, Reply<R>) -> Expectation<T>,
    ) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            expectations: self.expectations.clone(),
            make: Box::new(move |response| make(id, response)),
        }
    }

    /// Expects a `get` operation.
    pub fn expect_get(&mut self, id: i64) -> ExpectationBuilder<T, Option<T>> {
        self.expect_with_id(id, |id, response| Expectation::Get { id, response })
    }

    /// Expects a `create` operation.
    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T> {
        self.expect(|response| Expectation::Create { response })
    }

    pub fn expect_replace(&mut self, id: i64) -> ExpectationBuilder<T, T> {
        self.expect_with_id(id, |id, response| Expectation::Replace { id, response })
    }

    pub fn expect_patch(&mut self, id: i64) -> ExpectationBuilder<T, T> {
        self.expect_with_id(id, |id, response| Expectation::Patch { id, response })
    }

    pub fn expect_delete(&mut self, id: i64) -> ExpectationBuilder<T, bool> {
        self.expect_with_id(id, |id, response| Expectation::Delete { id, response })
    }

    pub fn expect_count(&mut self) -> ExpectationBuilder<T, u64> {
        self.expect(|response| Expectation::Count { response })
    }

    pub fn expect_list(&mut self) -> ExpectationBuilder<T, Page<T>> {
        self.expect(|response| Expectation::List { response })
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = lock(&self.expectations);
        if !exps.is_empty() {
            let pending: Vec<String> = exps.iter().map(Expectation::describe).collect();
            panic!("Not all expectations were met. {} remaining: {:?}", exps.len(), pending);
        }
    }
}

/// Builder that queues the scripted reply of one expectation.
pub struct ExpectationBuilder<T: ResourceEntity, R> {
    expectations: Queue<T>,
    make: Box<dyn FnOnce(Reply<R>) -> Expectation<T> + Send>,
}

impl<T: ResourceEntity, R> ExpectationBuilder<T, R> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        lock(&self.expectations).push_back((self.make)(Ok(value)));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        lock(&self.expectations).push_back((self.make)(Err(error)));
    }
}

// =============================================================================
// RAW RECEIVER HELPERS
// =============================================================================

/// Creates a mock client and a receiver for asserting requests.
///
/// # Testing Strategy
/// Instead of a table actor, the client sends its messages to a channel we control
/// (`receiver`). The test inspects each message as it arrives and answers it, which
/// lets it assert on payloads and simulate success, failure or delay deterministically.
///
/// **Note**: Consider using [`MockClient`] for a more fluent API.
pub fn create_mock_client<T: ResourceEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: ResourceEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T, oneshot::Sender<Reply<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { entity, respond_to }) => Some((entity, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: ResourceEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(i64, oneshot::Sender<Reply<Option<T>>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an UpdateWhere request
pub async fn expect_update_where<T: ResourceEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(crate::message::Predicate<T>, crate::message::Mutation<T>, oneshot::Sender<Reply<usize>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::UpdateWhere {
            filter,
            mutation,
            respond_to,
        }) => Some((filter, mutation, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::Sticker;
    use crate::page::PageRequest;

    fn sticker(id: i64, label: &str) -> Sticker {
        Sticker {
            id: Some(id),
            ..Sticker::labelled(label)
        }
    }

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<Sticker>(10);

        // Test Create
        let create_task = tokio::spawn(async move { client.create(Sticker::labelled("holo")).await });

        let (payload, responder) = expect_create(&mut receiver)
            .await
            .expect("Expected Create request");
        assert_eq!(payload.label.as_deref(), Some("holo"));
        responder.send(Ok(sticker(1, "holo"))).unwrap();

        let result = create_task.await.unwrap();
        assert!(matches!(result, Ok(s) if s.id == Some(1)));
    }

    #[tokio::test]
    async fn test_update_where_closures_travel_with_the_message() {
        let (client, mut receiver) = create_mock_client::<Sticker>(10);

        let task = tokio::spawn(async move {
            client
                .update_where(|s| s.weight.is_none(), |s| s.weight = Some(0))
                .await
        });

        let (filter, mutation, responder) = expect_update_where(&mut receiver).await.unwrap();
        let mut row = sticker(4, "matte");
        assert!(filter(&row));
        mutation(&mut row);
        assert_eq!(row.weight, Some(0));
        assert!(!filter(&row));
        responder.send(Ok(1)).unwrap();

        assert_eq!(task.await.unwrap(), Ok(1));
    }

    #[tokio::test]
    async fn test_mock_client_with_expectations() {
        // Create mock with fluent expectation API
        let mut mock = MockClient::<Sticker>::new();

        // Set up expectations
        mock.expect_create().return_ok(sticker(1, "holo"));
        mock.expect_get(1).return_ok(Some(sticker(1, "holo")));
        mock.expect_list()
            .return_ok(PageRequest::default().apply(vec![sticker(1, "holo")]));
        mock.expect_delete(1).return_ok(true);

        let client = mock.client();

        // Execute operations
        let created = client.create(Sticker::labelled("holo")).await.unwrap();
        assert_eq!(created.id, Some(1));

        let fetched = client.get(1).await.unwrap();
        assert_eq!(fetched.unwrap().label.as_deref(), Some("holo"));

        let page = client.list(PageRequest::default()).await.unwrap();
        assert_eq!(page.total, 1);

        assert!(client.delete(1).await.unwrap());

        // Verify all expectations were met
        mock.verify();
    }

    #[tokio::test]
    async fn test_error_injection() {
        let mut mock = MockClient::<Sticker>::new();
        mock.expect_patch(3)
            .return_err(FrameworkError::not_found("sticker", 3));
        mock.expect_count().return_err(FrameworkError::ActorClosed);

        let client = mock.client();
        let patched = client.patch(3, Default::default()).await;
        assert!(patched.unwrap_err().is_not_found());
        assert_eq!(client.count().await, Err(FrameworkError::ActorClosed));
        mock.verify();
    }

    #[tokio::test]
    async fn test_mismatched_request_drops_reply() {
        let mut mock = MockClient::<Sticker>::new();
        mock.expect_get(1).return_ok(None);

        let result = mock.client().get(2).await;
        assert_eq!(result, Err(FrameworkError::ActorDropped));
    }
}
