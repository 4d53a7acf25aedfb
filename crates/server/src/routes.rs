//! HTTP surface under `/api/v1`.
//!
//! Every entity kind is served by the same handful of generic handlers,
//! instantiated per model type.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use common::types::{Stats, Status};
use models::{amenity, city, place, review, state, user};
use serde_json::{json, Value};
use service::{
    place_amenities::{Linked, PlaceAmenities},
    resource::Resource,
    search::PlaceSearch,
    stats, ResourceService,
};
use tower::Layer;
use tower_http::{
    cors::CorsLayer,
    normalize_path::{NormalizePath, NormalizePathLayer},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::errors::{self, ApiError};
use crate::state::AppState;

type ApiResult<T> = Result<T, ApiError>;

fn resources<T: Resource>(state: &AppState) -> ResourceService<T> {
    ResourceService::new(state.store.clone())
}

async fn list<T: Resource>(State(state): State<AppState>) -> ApiResult<Json<Vec<Value>>> {
    Ok(Json(resources::<T>(&state).list().await?))
}

async fn list_children<T: Resource>(
    State(state): State<AppState>,
    Path(parent_id): Path<String>,
) -> ApiResult<Json<Vec<Value>>> {
    Ok(Json(resources::<T>(&state).list_by_parent(&parent_id).await?))
}

async fn get_one<T: Resource>(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    Ok(Json(resources::<T>(&state).get(&id).await?))
}

async fn delete_one<T: Resource>(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    resources::<T>(&state).delete(&id).await?;
    Ok(Json(json!({})))
}

async fn create<T: Resource>(State(state): State<AppState>, body: Bytes) -> ApiResult<(StatusCode, Json<Value>)> {
    let created = resources::<T>(&state).create(None, &body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn create_child<T: Resource>(
    State(state): State<AppState>,
    Path(parent_id): Path<String>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let created = resources::<T>(&state).create(Some(&parent_id), &body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update<T: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    Ok(Json(resources::<T>(&state).update(&id, &body).await?))
}

pub async fn status() -> Json<Status> {
    Json(Status::ok())
}

async fn get_stats(State(state): State<AppState>) -> ApiResult<Json<Stats>> {
    Ok(Json(stats::collect(&state.store).await?))
}

async fn places_search(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<Vec<Value>>> {
    Ok(Json(PlaceSearch::new(state.store.clone()).search_body(&body).await?))
}

async fn place_amenities(State(state): State<AppState>, Path(place_id): Path<String>) -> ApiResult<Json<Vec<Value>>> {
    Ok(Json(PlaceAmenities::new(state.store.clone()).list(&place_id).await?))
}

async fn link_amenity(
    State(state): State<AppState>,
    Path((place_id, amenity_id)): Path<(String, String)>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    match PlaceAmenities::new(state.store.clone()).link(&place_id, &amenity_id).await? {
        Linked::Created(amenity) => Ok((StatusCode::CREATED, Json(amenity))),
        Linked::Existing(amenity) => Ok((StatusCode::OK, Json(amenity))),
    }
}

async fn unlink_amenity(
    State(state): State<AppState>,
    Path((place_id, amenity_id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    PlaceAmenities::new(state.store.clone()).unlink(&place_id, &amenity_id).await?;
    Ok(Json(json!({})))
}

/// Routes relative to `/api/v1`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(status))
        .route("/stats", get(get_stats))
        // states and their cities
        .route("/states", get(list::<state::Model>).post(create::<state::Model>))
        .route(
            "/states/:state_id",
            get(get_one::<state::Model>).put(update::<state::Model>).delete(delete_one::<state::Model>),
        )
        .route(
            "/states/:state_id/cities",
            get(list_children::<city::Model>).post(create_child::<city::Model>),
        )
        .route(
            "/cities/:city_id",
            get(get_one::<city::Model>).put(update::<city::Model>).delete(delete_one::<city::Model>),
        )
        // places
        .route(
            "/cities/:city_id/places",
            get(list_children::<place::Model>).post(create_child::<place::Model>),
        )
        .route(
            "/places/:place_id",
            get(get_one::<place::Model>).put(update::<place::Model>).delete(delete_one::<place::Model>),
        )
        .route("/places_search", post(places_search))
        // reviews
        .route(
            "/places/:place_id/reviews",
            get(list_children::<review::Model>).post(create_child::<review::Model>),
        )
        .route(
            "/reviews/:review_id",
            get(get_one::<review::Model>).put(update::<review::Model>).delete(delete_one::<review::Model>),
        )
        // amenities and place links
        .route("/amenities", get(list::<amenity::Model>).post(create::<amenity::Model>))
        .route(
            "/amenities/:amenity_id",
            get(get_one::<amenity::Model>).put(update::<amenity::Model>).delete(delete_one::<amenity::Model>),
        )
        .route("/places/:place_id/amenities", get(place_amenities))
        .route(
            "/places/:place_id/amenities/:amenity_id",
            post(link_amenity).delete(unlink_amenity),
        )
        // users
        .route("/users", get(list::<user::Model>).post(create::<user::Model>))
        .route(
            "/users/:user_id",
            get(get_one::<user::Model>).put(update::<user::Model>).delete(delete_one::<user::Model>),
        )
}

/// Build the full application router with CORS and request tracing.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .nest("/api/v1", api_routes())
        .fallback(errors::not_found)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one INFO span per request with method and path
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // status code and latency
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx at ERROR
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

/// The router behind a trailing-slash trim, so `/states/` and `/states` reach the same route.
pub fn app(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(build_router(state, CorsLayer::very_permissive()))
}
