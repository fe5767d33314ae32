//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use linkwarden::auth::{expires_at, generate_session_token};
use linkwarden::config::{Config, StorageBackend};
use linkwarden::db::{
    create_collection, create_session, create_user, insert_link, set_link_artifacts,
    upsert_collection_member, CollectionMember, Database, LinkArtifacts, NewCollection, NewLink,
};
use linkwarden::storage::ArtifactStore;
use linkwarden::web::{create_app, AppState};
use tempfile::TempDir;
use tower::ServiceExt;

/// Artifact store that records every removal instead of touching storage.
#[derive(Debug, Default)]
pub struct RecordingStore {
    calls: Mutex<Vec<(i64, i64)>>,
    fail: bool,
}

impl RecordingStore {
    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<(i64, i64)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArtifactStore for RecordingStore {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn remove_files(&self, link_id: i64, collection_id: i64) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push((link_id, collection_id));
        if self.fail {
            anyhow::bail!("storage offline");
        }
        Ok(())
    }
}

pub struct TestApp {
    pub app: Router,
    pub db: Database,
    pub store: Arc<RecordingStore>,
    _temp_dir: TempDir,
}

pub fn test_config(dir: &Path, demo_mode: bool) -> Config {
    Config {
        database_path: dir.join("test.sqlite"),
        storage: StorageBackend::Filesystem {
            root: dir.join("data"),
        },
        web_host: "127.0.0.1".to_string(),
        web_port: 3000,
        base_url: "http://links.test".to_string(),
        session_lifetime: Duration::from_secs(3600),
        demo_mode,
        initial_user: None,
    }
}

pub async fn setup_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.sqlite");
    let db = Database::new(&db_path)
        .await
        .expect("Failed to create database");
    (db, temp_dir)
}

pub async fn setup_app(demo_mode: bool) -> TestApp {
    setup_app_with_store(demo_mode, RecordingStore::default()).await
}

pub async fn setup_app_with_store(demo_mode: bool, store: RecordingStore) -> TestApp {
    let (db, temp_dir) = setup_db().await;
    let store = Arc::new(store);
    let state = AppState::new(
        db.clone(),
        test_config(temp_dir.path(), demo_mode),
        store.clone(),
    );

    TestApp {
        app: create_app(state),
        db,
        store,
        _temp_dir: temp_dir,
    }
}

/// Create a user with a placeholder password hash. Returns the user id.
pub async fn user(db: &Database, username: &str) -> i64 {
    create_user(db.pool(), &capitalize(username), username, "not-a-real-hash")
        .await
        .expect("Failed to create user")
}

/// Create a user and open a session for them. Returns `(user_id, token)`.
pub async fn user_with_session(db: &Database, username: &str) -> (i64, String) {
    let id = user(db, username).await;
    let token = generate_session_token();
    create_session(db.pool(), id, &token, &expires_at(Duration::from_secs(3600)))
        .await
        .expect("Failed to create session");
    (id, token)
}

pub async fn collection(db: &Database, owner_id: i64, name: &str, is_public: bool) -> i64 {
    create_collection(
        db.pool(),
        &NewCollection {
            name: name.to_string(),
            description: format!("About {name}"),
            color: "#0ea5e9".to_string(),
            owner_id,
            is_public,
        },
    )
    .await
    .expect("Failed to create collection")
}

pub async fn member(db: &Database, user_id: i64, collection_id: i64, can_update: bool, can_delete: bool) {
    upsert_collection_member(
        db.pool(),
        &CollectionMember {
            user_id,
            collection_id,
            can_create: false,
            can_update,
            can_delete,
        },
    )
    .await
    .expect("Failed to add member");
}

pub async fn link(db: &Database, collection_id: i64, name: &str, url: Option<&str>) -> i64 {
    insert_link(
        db.pool(),
        &NewLink {
            name: name.to_string(),
            url: url.map(str::to_string),
            description: String::new(),
            collection_id,
        },
    )
    .await
    .expect("Failed to insert link")
}

/// Mark a link as preserved with every artifact present.
pub async fn preserve(db: &Database, link_id: i64) {
    set_link_artifacts(
        db.pool(),
        link_id,
        &LinkArtifacts {
            image: Some(format!("archives/1/{link_id}.png")),
            pdf: Some(format!("archives/1/{link_id}.pdf")),
            readable: Some(format!("archives/1/{link_id}_readability.json")),
            monolith: Some(format!("archives/1/{link_id}.html")),
            preview: Some(format!("archives/preview/1/{link_id}.jpeg")),
            text_content: Some("page text".to_string()),
            index_version: Some(1),
        },
    )
    .await
    .expect("Failed to set artifacts");
}

pub fn authed(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

pub fn anonymous(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Send a request through the router and collect status, headers and body.
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, String::from_utf8_lossy(&body).into_owned())
}

/// Send a request and parse the `response` field of the JSON body.
pub async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let (status, _, body) = send(app, request).await;
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    (status, value["response"].clone())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars
        .next()
        .map(|c| c.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}
