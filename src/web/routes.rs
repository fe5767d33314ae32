use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{AppendHeaders, Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post, put};
use axum::{Form, Router};
use serde::Deserialize;
use tracing::{debug, error};

use super::feeds::{self, FEED_SIZE};
use super::pages::{
    render_compact_collection, render_dashboard, render_login, render_public_collection,
    CompactCollectionView, DashboardView, PublicCollectionView,
};
use super::preferences::Preferences;
use super::AppState;
use crate::api::session::LoginRequest;
use crate::api::{links, public, session, users, ApiError};
use crate::auth::{session_cookie, MaybeUser};
use crate::db::{
    get_collections_for_user, get_links, get_pinned_links, get_public_collection,
    get_public_user, get_tags_for_collection, CollectionWithMembers, LinkQuery, LinkWithTags,
    SearchFilter, Sort,
};

/// Create the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/dashboard", get(dashboard))
        .route("/login", post(login_form))
        .route("/public/collections/:id", get(public_collection))
        .route("/public/collections/:id/compact", get(compact_collection))
        .route("/public/collections/:id/rss", get(collection_feed))
        .route("/healthz", get(health))
        // JSON API
        .route(
            "/api/v1/links/:id",
            put(links::update_handler).delete(links::delete_handler),
        )
        .route("/api/v1/links/:id/archive", put(links::archive_handler))
        .route(
            "/api/v1/links/:id/pin",
            put(links::pin_handler).delete(links::unpin_handler),
        )
        .route(
            "/api/v1/session",
            post(session::login_handler).delete(session::logout_handler),
        )
        .route("/api/v1/users/me/theme", put(users::theme_handler))
        .route("/api/v1/public/collections/links", get(public::links_handler))
        .route("/api/v1/public/collections/tags", get(public::tags_handler))
        .route("/api/v1/public/collections/:id", get(public::collection_handler))
        .route("/api/v1/public/users/:id", get(public::user_handler))
}

fn database_error(what: &str, e: &anyhow::Error) -> Response {
    error!("Failed to fetch {what}: {e:#}");
    (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response()
}

/// Public collection by path id; `None` for malformed ids, missing or private collections.
async fn find_public_collection(
    state: &AppState,
    id: &str,
) -> anyhow::Result<Option<CollectionWithMembers>> {
    let Ok(id) = id.parse::<i64>() else {
        return Ok(None);
    };
    get_public_collection(state.db.pool(), id).await
}

fn with_cookies(cookies: Vec<String>, body: Html<String>) -> Response {
    let headers = cookies.into_iter().map(|c| (header::SET_COOKIE, c));
    (AppendHeaders(headers), body).into_response()
}

// ========== HTML Routes ==========

async fn index() -> Redirect {
    Redirect::to("/dashboard")
}

#[derive(Debug, Deserialize)]
pub struct PublicPageParams {
    q: Option<String>,
    sort: Option<String>,
    view: Option<String>,
    share: Option<String>,
}

async fn public_collection(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Path(id): Path<String>,
    Query(params): Query<PublicPageParams>,
    headers: HeaderMap,
) -> Response {
    let collection = match find_public_collection(&state, &id).await {
        Ok(Some(c)) => c,
        Ok(None) => {
            debug!(collection = %id, "Public collection not accessible, redirecting");
            return Redirect::to("/dashboard").into_response();
        }
        Err(e) => return database_error("collection", &e),
    };
    let collection_id = collection.collection.id;

    let preferences = Preferences::resolve(params.sort.as_deref(), params.view.as_deref(), &headers);
    let search = params.q.as_deref().map(str::trim).filter(|q| !q.is_empty());

    let owner = match get_public_user(state.db.pool(), collection.collection.owner_id).await {
        Ok(o) => o,
        Err(e) => return database_error("collection owner", &e),
    };

    let query = LinkQuery {
        collection_id,
        sort: preferences.sort,
        search: search.map(str::to_string),
        viewer_id: viewer.as_ref().map(|u| u.id),
        ..LinkQuery::default()
    };
    let links = match get_links(state.db.pool(), &query).await {
        Ok(l) => l,
        Err(e) => return database_error("links", &e),
    };

    let tags = match get_tags_for_collection(state.db.pool(), collection_id).await {
        Ok(t) => t,
        Err(e) => return database_error("tags", &e),
    };

    let view = PublicCollectionView {
        collection: &collection,
        owner: owner.as_ref(),
        links: &links,
        tags: &tags,
        search,
        preferences,
        viewer: viewer.as_ref(),
        share_url: format!(
            "{}/public/collections/{collection_id}",
            state.config.base_url.trim_end_matches('/')
        ),
        show_sharing: params.share.is_some_and(|s| s == "1" || s == "true"),
    };

    with_cookies(
        preferences.set_cookies(),
        Html(render_public_collection(&view).into_string()),
    )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompactPageParams {
    q: Option<String>,
    sort: Option<String>,
    /// Present when the search form was submitted; unchecked fields are then off.
    filters: Option<String>,
    name: Option<bool>,
    url: Option<bool>,
    description: Option<bool>,
    text_content: Option<bool>,
    tags: Option<bool>,
}

impl CompactPageParams {
    fn filter(&self) -> SearchFilter {
        let missing = self.filters.is_none();
        SearchFilter {
            name: self.name.unwrap_or(missing),
            url: self.url.unwrap_or(missing),
            description: self.description.unwrap_or(missing),
            text_content: self.text_content.unwrap_or(missing),
            tags: self.tags.unwrap_or(missing),
        }
    }
}

async fn compact_collection(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Path(id): Path<String>,
    Query(params): Query<CompactPageParams>,
    headers: HeaderMap,
) -> Response {
    let collection = match find_public_collection(&state, &id).await {
        Ok(Some(c)) => c.collection,
        Ok(None) => return Redirect::to("/dashboard").into_response(),
        Err(e) => return database_error("collection", &e),
    };

    let preferences = Preferences::resolve(params.sort.as_deref(), None, &headers);
    let search = params.q.as_deref().map(str::trim).filter(|q| !q.is_empty());
    let filter = params.filter();

    let query = LinkQuery {
        collection_id: collection.id,
        sort: preferences.sort,
        search: search.map(str::to_string),
        filter,
        viewer_id: viewer.as_ref().map(|u| u.id),
        ..LinkQuery::default()
    };
    let links = match get_links(state.db.pool(), &query).await {
        Ok(l) => l,
        Err(e) => return database_error("links", &e),
    };

    let view = CompactCollectionView {
        collection: &collection,
        links: &links,
        search,
        filter,
        sort: preferences.sort,
        viewer: viewer.as_ref(),
    };

    with_cookies(
        preferences.set_cookies(),
        Html(render_compact_collection(&view).into_string()),
    )
}

async fn collection_feed(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let collection = match find_public_collection(&state, &id).await {
        Ok(Some(c)) => c.collection,
        Ok(None) => return (StatusCode::NOT_FOUND, "Collection not found").into_response(),
        Err(e) => return database_error("collection", &e),
    };

    let query = LinkQuery {
        collection_id: collection.id,
        sort: Sort::DateNewestFirst,
        limit: Some(FEED_SIZE),
        ..LinkQuery::default()
    };
    let links = match get_links(state.db.pool(), &query).await {
        Ok(l) => l,
        Err(e) => return database_error("links for RSS feed", &e),
    };

    let rss = feeds::generate_rss(&collection, &links, &state.config.base_url);

    (
        [(header::CONTENT_TYPE, "application/rss+xml; charset=utf-8")],
        rss,
    )
        .into_response()
}

async fn dashboard(State(state): State<AppState>, MaybeUser(viewer): MaybeUser) -> Response {
    let Some(user) = viewer else {
        return Html(render_login(None).into_string()).into_response();
    };

    let collections = match get_collections_for_user(state.db.pool(), user.id).await {
        Ok(c) => c,
        Err(e) => return database_error("collections", &e),
    };

    let pinned: Vec<LinkWithTags> = match get_pinned_links(state.db.pool(), user.id).await {
        Ok(links) => links
            .into_iter()
            .map(|link| LinkWithTags {
                link,
                tags: Vec::new(),
                pinned: true,
            })
            .collect(),
        Err(e) => return database_error("pinned links", &e),
    };

    let view = DashboardView {
        viewer: &user,
        collections: &collections,
        pinned: &pinned,
    };

    Html(render_dashboard(&view).into_string()).into_response()
}

/// POST /login - form login used by the dashboard.
async fn login_form(State(state): State<AppState>, Form(form): Form<LoginRequest>) -> Response {
    match session::login(&state, &form).await {
        Ok(token) => {
            let cookie = session_cookie(&token, state.config.session_lifetime);
            (
                AppendHeaders([(header::SET_COOKIE, cookie)]),
                Redirect::to("/dashboard"),
            )
                .into_response()
        }
        Err(ApiError::InvalidCredentials) => (
            StatusCode::UNAUTHORIZED,
            Html(render_login(Some("Invalid credentials.")).into_string()),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

async fn health() -> &'static str {
    "OK"
}
