//! # HTTP Resource Engine
//!
//! One generic set of axum handlers serves every entity. [`resource_routes`] mounts
//! them under `/api/{RESOURCE_PATH}` for an entity type and the repository that
//! stores it:
//!
//! | Method | Path | Success |
//! |--------|------|---------|
//! | POST   | `/api/{resource}` | 201 + `Location` |
//! | GET    | `/api/{resource}?page&size&sort&eagerload` | 200 + `X-Total-Count` / `Link` |
//! | GET    | `/api/{resource}/{id}` | 200 |
//! | PUT    | `/api/{resource}/{id}` | 200 |
//! | PATCH  | `/api/{resource}/{id}` | 200 |
//! | DELETE | `/api/{resource}/{id}` | 204 |
//!
//! PUT and PATCH on the collection path answer 405. Every check runs before the
//! repository is called, so a rejected request never writes.

pub mod error;
pub mod headers;

pub use error::{ApiError, ApiResult, PROBLEM_JSON};

use crate::client_trait::Repository;
use crate::entity::ResourceEntity;
use crate::error::FrameworkError;
use crate::page::PageRequest;
use axum::body::Bytes;
use axum::extract::{Path, RawQuery, State};
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_APPLICATION_NAME: &str = "marketplaceApp";

/// Settings shared by every resource router.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Prefix of alert headers and alert keys (`X-{app}-alert`).
    pub application_name: String,
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            application_name: DEFAULT_APPLICATION_NAME.to_string(),
            default_page_size: crate::page::DEFAULT_PAGE_SIZE,
            max_page_size: 2000,
        }
    }
}

/// Router state of one resource.
pub struct ResourceState<T, R> {
    pub repo: Arc<R>,
    pub settings: Arc<ApiSettings>,
    entity: PhantomData<fn() -> T>,
}

impl<T, R> ResourceState<T, R> {
    pub fn new(repo: Arc<R>, settings: Arc<ApiSettings>) -> Self {
        Self {
            repo,
            settings,
            entity: PhantomData,
        }
    }

    /// Turns a handler result into a response, rendering failures as problems.
    pub fn respond(&self, result: ApiResult<Response>) -> Response {
        result.unwrap_or_else(|e| e.into_problem(&self.settings.application_name))
    }
}

impl<T, R> Clone for ResourceState<T, R> {
    fn clone(&self) -> Self {
        Self::new(self.repo.clone(), self.settings.clone())
    }
}

/// Mounts the CRUD routes of entity `T`, stored through `repo`.
pub fn resource_routes<T, R>(repo: Arc<R>, settings: Arc<ApiSettings>) -> Router
where
    T: ResourceEntity,
    R: Repository<T> + 'static,
{
    let collection = format!("/api/{}", T::RESOURCE_PATH);
    let item = format!("{collection}/{{id}}");

    Router::new()
        .route(&collection, post(create::<T, R>).get(list::<T, R>))
        .route(
            &item,
            get(get_one::<T, R>)
                .put(replace::<T, R>)
                .patch(patch::<T, R>)
                .delete(delete::<T, R>),
        )
        .with_state(ResourceState::<T, R>::new(repo, settings))
}

/// Location of one record of `T`.
pub fn location<T: ResourceEntity>(id: i64) -> String {
    format!("/api/{}/{id}", T::RESOURCE_PATH)
}

pub fn parse_body<V: DeserializeOwned>(body: &[u8]) -> ApiResult<V> {
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(e.to_string()))
}

pub fn parse_id(raw: &str) -> ApiResult<i64> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid id '{raw}'")))
}

/// Decodes a raw query string into owned pairs, keeping repeated keys.
pub fn query_pairs(query: Option<&str>) -> Vec<(String, String)> {
    query
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .into_owned()
                .collect()
        })
        .unwrap_or_default()
}

fn parse_eagerload(pairs: &[(String, String)]) -> ApiResult<bool> {
    match pairs.iter().rev().find(|(key, _)| key == "eagerload") {
        Some((_, value)) => value.trim().parse().map_err(|_| {
            ApiError::BadRequest(format!("Invalid value '{value}' for query parameter 'eagerload'"))
        }),
        None => Ok(false),
    }
}

fn assigned_id<T: ResourceEntity>(entity: &T) -> ApiResult<i64> {
    entity
        .id()
        .ok_or_else(|| ApiError::Internal(format!("{} stored without id", T::ENTITY_NAME)))
}

async fn create<T, R>(State(state): State<ResourceState<T, R>>, body: Bytes) -> Response
where
    T: ResourceEntity,
    R: Repository<T> + 'static,
{
    let result = try_create(&state, &body).await;
    state.respond(result)
}

async fn try_create<T, R>(state: &ResourceState<T, R>, body: &[u8]) -> ApiResult<Response>
where
    T: ResourceEntity,
    R: Repository<T> + 'static,
{
    let entity: T = parse_body(body)?;
    debug!(entity_type = T::ENTITY_NAME, ?entity, "REST request to save");
    if entity.id().is_some() {
        return Err(ApiError::alert(
            format!("A new {} cannot already have an ID", T::ENTITY_NAME),
            T::ENTITY_NAME,
            "idexists",
        ));
    }
    entity.validate()?;

    let saved = state.repo.insert(entity).await.map_err(write_error::<T>)?;
    let id = assigned_id(&saved)?;
    let alert = headers::created_alert(&state.settings.application_name, T::ENTITY_NAME, id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location::<T>(id))],
        alert,
        Json(saved),
    )
        .into_response())
}

async fn replace<T, R>(
    State(state): State<ResourceState<T, R>>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Response
where
    T: ResourceEntity,
    R: Repository<T> + 'static,
{
    let result = try_replace(&state, &raw_id, &body).await;
    state.respond(result)
}

async fn try_replace<T, R>(state: &ResourceState<T, R>, raw_id: &str, body: &[u8]) -> ApiResult<Response>
where
    T: ResourceEntity,
    R: Repository<T> + 'static,
{
    let id = parse_id(raw_id)?;
    let entity: T = parse_body(body)?;
    debug!(entity_type = T::ENTITY_NAME, id, ?entity, "REST request to update");
    entity.validate()?;
    check_identity::<T>(id, entity.id())?;
    if !state.repo.exists(id).await? {
        return Err(not_found_alert::<T>());
    }

    let saved = match state.repo.replace(id, entity).await {
        Err(e) if e.is_not_found() => return Err(not_found_alert::<T>()),
        other => other.map_err(write_error::<T>)?,
    };
    let alert = headers::updated_alert(&state.settings.application_name, T::ENTITY_NAME, id);
    Ok((alert, Json(saved)).into_response())
}

async fn patch<T, R>(
    State(state): State<ResourceState<T, R>>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Response
where
    T: ResourceEntity,
    R: Repository<T> + 'static,
{
    let result = try_patch(&state, &raw_id, &body).await;
    state.respond(result)
}

async fn try_patch<T, R>(state: &ResourceState<T, R>, raw_id: &str, body: &[u8]) -> ApiResult<Response>
where
    T: ResourceEntity,
    R: Repository<T> + 'static,
{
    let id = parse_id(raw_id)?;
    let patch: T::Patch = parse_body(body)?;
    debug!(entity_type = T::ENTITY_NAME, id, ?patch, "REST request to partial update");
    check_identity::<T>(id, T::patch_id(&patch))?;

    let saved = state.repo.patch(id, patch).await?;
    let alert = headers::updated_alert(&state.settings.application_name, T::ENTITY_NAME, id);
    Ok((alert, Json(saved)).into_response())
}

async fn list<T, R>(
    State(state): State<ResourceState<T, R>>,
    uri: Uri,
    RawQuery(query): RawQuery,
) -> Response
where
    T: ResourceEntity,
    R: Repository<T> + 'static,
{
    let result = try_list(&state, uri.path(), query.as_deref()).await;
    state.respond(result)
}

async fn try_list<T, R>(state: &ResourceState<T, R>, path: &str, query: Option<&str>) -> ApiResult<Response>
where
    T: ResourceEntity,
    R: Repository<T> + 'static,
{
    let pairs = query_pairs(query);
    let request = PageRequest::from_query(
        pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        state.settings.default_page_size,
        state.settings.max_page_size,
    )
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let eager = parse_eagerload(&pairs)?;
    debug!(entity_type = T::ENTITY_NAME, ?request, eager, "REST request to get a page");

    let page = state.repo.find_page(request, eager).await?;
    let links = headers::pagination(path, &pairs, &page);
    Ok((links, Json(page.items)).into_response())
}

async fn get_one<T, R>(
    State(state): State<ResourceState<T, R>>,
    Path(raw_id): Path<String>,
) -> Response
where
    T: ResourceEntity,
    R: Repository<T> + 'static,
{
    let result = try_get(&state, &raw_id).await;
    state.respond(result)
}

async fn try_get<T, R>(state: &ResourceState<T, R>, raw_id: &str) -> ApiResult<Response>
where
    T: ResourceEntity,
    R: Repository<T> + 'static,
{
    let id = parse_id(raw_id)?;
    debug!(entity_type = T::ENTITY_NAME, id, "REST request to get");
    match state.repo.find_by_id(id).await? {
        Some(entity) => Ok(Json(entity).into_response()),
        None => Err(ApiError::NotFound(format!("{} {id} not found", T::ENTITY_NAME))),
    }
}

async fn delete<T, R>(
    State(state): State<ResourceState<T, R>>,
    Path(raw_id): Path<String>,
) -> Response
where
    T: ResourceEntity,
    R: Repository<T> + 'static,
{
    let result = try_delete(&state, &raw_id).await;
    state.respond(result)
}

async fn try_delete<T, R>(state: &ResourceState<T, R>, raw_id: &str) -> ApiResult<Response>
where
    T: ResourceEntity,
    R: Repository<T> + 'static,
{
    let id = parse_id(raw_id)?;
    debug!(entity_type = T::ENTITY_NAME, id, "REST request to delete");
    state.repo.delete_by_id(id).await?;
    let alert = headers::deleted_alert(&state.settings.application_name, T::ENTITY_NAME, id);
    Ok((StatusCode::NO_CONTENT, alert).into_response())
}

fn check_identity<T: ResourceEntity>(path_id: i64, body_id: Option<i64>) -> ApiResult<()> {
    match body_id {
        None => Err(ApiError::alert("Invalid id", T::ENTITY_NAME, "idnull")),
        Some(id) if id != path_id => Err(ApiError::alert("Invalid ID", T::ENTITY_NAME, "idinvalid")),
        Some(_) => Ok(()),
    }
}

fn not_found_alert<T: ResourceEntity>() -> ApiError {
    ApiError::alert("Entity not found", T::ENTITY_NAME, "idnotfound")
}

/// A write naming an absent related row is the client's `idnotfound`.
fn write_error<T: ResourceEntity>(err: FrameworkError) -> ApiError {
    match err {
        FrameworkError::MissingReference { entity, id } => ApiError::alert(
            format!("Referenced {entity} {id} not found"),
            T::ENTITY_NAME,
            "idnotfound",
        ),
        other => other.into(),
    }
}
