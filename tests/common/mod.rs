#![allow(dead_code)]

mod memory;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use bytes::Bytes;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use teamspace_api::config::AppConfig;
use teamspace_api::routes;
use teamspace_api::state::AppState;
use teamspace_api::storage::{FilesystemStore, ObjectStore, StorageResult};

pub use memory::MemoryStore;

pub const TEST_PASSWORD: &str = "correct horse battery";
const BOUNDARY: &str = "teamspace-test-boundary";

/// Filesystem object store that counts calls, so tests can assert that a
/// rejected upload never reached storage.
pub struct RecordingObjects {
    inner: FilesystemStore,
    puts: AtomicUsize,
    deletes: AtomicUsize,
}

impl RecordingObjects {
    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    pub async fn exists(&self, key: &str) -> bool {
        self.inner.exists(key).await.unwrap_or(false)
    }

    pub fn root(&self) -> &std::path::Path {
        self.inner.root()
    }
}

#[async_trait]
impl ObjectStore for RecordingObjects {
    async fn put(&self, key: &str, data: Bytes) -> StorageResult<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.put(key, data).await
    }

    async fn get(&self, key: &str) -> StorageResult<Bytes> {
        self.inner.get(key).await
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(key).await
    }

    async fn delete_prefix(&self, prefix: &str) -> StorageResult<usize> {
        self.inner.delete_prefix(prefix).await
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        self.inner.exists(key).await
    }
}

/// A signed-up user and their bearer token
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub token: String,
}

/// Response with the JSON body decoded (or `Null` when empty)
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub json: Value,
}

impl TestResponse {
    pub fn data(&self) -> &Value {
        &self.json["data"]
    }

    pub fn code(&self) -> &str {
        self.json["code"].as_str().unwrap_or_default()
    }
}

/// The full router over an in-memory store and a temp-dir object store.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub objects: Arc<RecordingObjects>,
    pub config: AppConfig,
    _dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Result<Self> {
        let dir = tempfile::tempdir()?;

        let mut config = AppConfig::development();
        config.security.jwt_secret = "integration-test-secret-with-enough-length".to_string();
        config.security.bcrypt_cost = 4;
        config.api.enable_request_logging = false;
        config.storage.root = dir.path().to_path_buf();

        let store = Arc::new(MemoryStore::new());
        let objects = Arc::new(RecordingObjects {
            inner: FilesystemStore::new(dir.path()).await?,
            puts: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
        });

        let state = AppState::new(store.clone(), objects.clone(), config.clone());
        let router = routes::app(state);

        Ok(Self {
            router,
            store,
            objects,
            config,
            _dir: dir,
        })
    }

    pub async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await?;
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or(Value::Null)
        };

        Ok(TestResponse {
            status,
            headers,
            body,
            json,
        })
    }

    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => builder.body(Body::empty())?,
        };
        self.send(request).await
    }

    pub async fn get(&self, uri: &str, token: &str) -> Result<TestResponse> {
        self.json(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> Result<TestResponse> {
        self.json(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> Result<TestResponse> {
        self.json(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> Result<TestResponse> {
        self.json(Method::DELETE, uri, Some(token), None).await
    }

    pub async fn signup(&self, name: &str, email: &str) -> Result<TestUser> {
        let res = self
            .json(
                Method::POST,
                "/auth/signup",
                None,
                Some(json!({ "name": name, "email": email, "password": TEST_PASSWORD })),
            )
            .await?;
        anyhow::ensure!(res.status == StatusCode::CREATED, "signup failed: {}", res.json);

        let data = res.data();
        Ok(TestUser {
            id: data["user"]["id"]
                .as_str()
                .context("missing user id")?
                .parse()?,
            email: email.to_string(),
            token: data["token"].as_str().context("missing token")?.to_string(),
        })
    }

    /// Create a workspace owned by `owner`; returns (id, invite code).
    pub async fn create_workspace(&self, owner: &TestUser, name: &str) -> Result<(Uuid, String)> {
        let res = self
            .post("/api/workspaces", &owner.token, json!({ "name": name }))
            .await?;
        anyhow::ensure!(res.status == StatusCode::CREATED, "create failed: {}", res.json);

        let id = res.data()["id"].as_str().context("missing id")?.parse()?;
        let code = res.data()["invite_code"]
            .as_str()
            .context("missing invite code")?
            .to_string();
        Ok((id, code))
    }

    pub async fn join(&self, user: &TestUser, invite_code: &str) -> Result<TestResponse> {
        self.post(
            "/api/workspaces/join",
            &user.token,
            json!({ "invite_code": invite_code }),
        )
        .await
    }

    pub async fn create_note(&self, user: &TestUser, workspace_id: Uuid, title: &str) -> Result<Uuid> {
        let res = self
            .post(
                &format!("/api/workspaces/{}/notes", workspace_id),
                &user.token,
                json!({ "title": title, "content": format!("{} body", title) }),
            )
            .await?;
        anyhow::ensure!(res.status == StatusCode::CREATED, "note create failed: {}", res.json);
        Ok(res.data()["id"].as_str().context("missing id")?.parse()?)
    }

    pub async fn upload(
        &self,
        user: &TestUser,
        workspace_id: Uuid,
        file_name: &str,
        data: &[u8],
    ) -> Result<TestResponse> {
        let request = Request::builder()
            .method(Method::POST)
            .uri(format!("/api/workspaces/{}/files", workspace_id))
            .header(header::AUTHORIZATION, format!("Bearer {}", user.token))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(multipart_body("file", file_name, "text/plain", data)))?;
        self.send(request).await
    }
}

/// Single-part multipart/form-data body
pub fn multipart_body(field: &str, file_name: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(data.len() + 256);
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}
