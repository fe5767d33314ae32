//! Read-only endpoints backing the public collection pages.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::ApiError;
use crate::auth::MaybeUser;
use crate::db::{self, CollectionWithMembers, LinkQuery, SearchFilter, Sort};
use crate::web::AppState;

/// Links returned per page by the public links endpoint.
pub const PAGE_SIZE: i64 = 20;

/// Load a public collection, reporting private and missing ones identically.
pub async fn load_public_collection(
    state: &AppState,
    id: i64,
) -> Result<CollectionWithMembers, ApiError> {
    db::get_public_collection(state.db.pool(), id)
        .await?
        .ok_or_else(|| ApiError::BadRequest("Collection not found.".to_string()))
}

/// GET /api/v1/public/collections/:id
pub async fn collection_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = id
        .parse::<i64>()
        .map_err(|_| ApiError::BadRequest("Collection not found.".to_string()))?;
    let collection = load_public_collection(&state, id).await?;
    Ok(Json(json!({ "response": collection })))
}

/// Query string of the public links endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicLinksParams {
    pub collection_id: i64,
    pub sort: Option<String>,
    pub search_query_string: Option<String>,
    pub cursor: Option<i64>,
    pub search_by_name: Option<bool>,
    pub search_by_url: Option<bool>,
    pub search_by_description: Option<bool>,
    pub search_by_text_content: Option<bool>,
    pub search_by_tags: Option<bool>,
}

impl PublicLinksParams {
    fn filter(&self) -> SearchFilter {
        let defaults = SearchFilter::default();
        SearchFilter {
            name: self.search_by_name.unwrap_or(defaults.name),
            url: self.search_by_url.unwrap_or(defaults.url),
            description: self.search_by_description.unwrap_or(defaults.description),
            text_content: self.search_by_text_content.unwrap_or(defaults.text_content),
            tags: self.search_by_tags.unwrap_or(defaults.tags),
        }
    }
}

/// GET /api/v1/public/collections/links
pub async fn links_handler(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Query(params): Query<PublicLinksParams>,
) -> Result<Json<Value>, ApiError> {
    load_public_collection(&state, params.collection_id).await?;

    let query = LinkQuery {
        collection_id: params.collection_id,
        sort: params.sort.as_deref().map(Sort::parse_lenient).unwrap_or_default(),
        search: params.search_query_string.clone(),
        filter: params.filter(),
        cursor: params.cursor,
        limit: Some(PAGE_SIZE),
        viewer_id: viewer.map(|u| u.id),
    };

    let links = db::get_links(state.db.pool(), &query).await?;
    Ok(Json(json!({ "response": links })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicTagsParams {
    pub collection_id: i64,
}

/// GET /api/v1/public/collections/tags
pub async fn tags_handler(
    State(state): State<AppState>,
    Query(params): Query<PublicTagsParams>,
) -> Result<Json<Value>, ApiError> {
    load_public_collection(&state, params.collection_id).await?;
    let tags = db::get_tags_for_collection(state.db.pool(), params.collection_id).await?;
    Ok(Json(json!({ "response": tags })))
}

/// GET /api/v1/public/users/:id
pub async fn user_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let Ok(id) = id.parse::<i64>() else {
        return Err(ApiError::NotFound("User"));
    };
    let user = db::get_public_user(state.db.pool(), id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    Ok(Json(json!({ "response": user })))
}
