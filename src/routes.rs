//! The HTTP surface: one generic resource router per entity, the collection
//! lookup by name and the health probe.

use crate::lifecycle::MarketplaceSystem;
use crate::model::{
    Art, Artist, Brand, BrandCategory, Collection, Collector, Data, Feature, Invoice, Notification, Output,
    Transaction,
};
use crate::repositories::CollectionRepository;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use resource_framework::http::{resource_routes, ApiError, ApiResult, ApiSettings, ResourceState};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

type CollectionState = ResourceState<Collection, CollectionRepository>;

pub fn router(system: &MarketplaceSystem, settings: ApiSettings) -> Router {
    let settings = Arc::new(settings);
    let collections = Arc::new(system.collection_repository());

    let by_name = Router::new()
        .route("/api/collections/by-name/{name}", get(collection_by_name))
        .with_state(CollectionState::new(collections.clone(), settings.clone()));

    Router::new()
        .merge(resource_routes::<Art, _>(Arc::new(system.art_repository()), settings.clone()))
        .merge(resource_routes::<Collection, _>(collections, settings.clone()))
        .merge(resource_routes::<Feature, _>(Arc::new(system.feature_repository()), settings.clone()))
        .merge(resource_routes::<Transaction, _>(Arc::new(system.transaction_repository()), settings.clone()))
        .merge(resource_routes::<Data, _>(Arc::new(system.data_repository()), settings.clone()))
        .merge(resource_routes::<Output, _>(Arc::new(system.output_repository()), settings.clone()))
        .merge(resource_routes::<Brand, _>(Arc::new(system.brand_repository()), settings.clone()))
        .merge(resource_routes::<BrandCategory, _>(Arc::new(system.brand_category_repository()), settings.clone()))
        .merge(resource_routes::<Artist, _>(Arc::new(system.artists.clone()), settings.clone()))
        .merge(resource_routes::<Collector, _>(Arc::new(system.collectors.clone()), settings.clone()))
        .merge(resource_routes::<Invoice, _>(Arc::new(system.invoices.clone()), settings.clone()))
        .merge(resource_routes::<Notification, _>(Arc::new(system.notifications.clone()), settings))
        .merge(by_name)
        .route("/management/health", get(health))
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({"status": "UP"}))
}

async fn collection_by_name(State(state): State<CollectionState>, Path(name): Path<String>) -> Response {
    let result = try_collection_by_name(&state.repo, &name).await;
    state.respond(result)
}

async fn try_collection_by_name(repo: &CollectionRepository, name: &str) -> ApiResult<Response> {
    match repo.find_by_name(name).await? {
        Some(collection) => Ok(Json(collection).into_response()),
        None => Err(ApiError::NotFound(format!("No collection named '{name}'"))),
    }
}
