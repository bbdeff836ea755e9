use anyhow::{anyhow, Context};
use bytes::Bytes;
use reqwest::{header, multipart, RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;

use crate::cli::config::EnvironmentConfig;

/// Thin HTTP client for the Teamspace API. Unwraps the success envelope and
/// turns error bodies into `anyhow` errors carrying the server message.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn from_config(config: &EnvironmentConfig) -> Self {
        Self::new(config.server_url(), config.token.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> anyhow::Result<RequestBuilder> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| anyhow!("Not logged in. Run `teamspace auth login` first"))?;
        Ok(request.bearer_auth(token))
    }

    /// Unauthenticated GET returning the raw JSON body
    pub async fn get_public(&self, path: &str) -> anyhow::Result<Value> {
        let response = self.http.get(self.url(path)).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(error_from_body(status, &body));
        }
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn post_public<B: Serialize>(&self, path: &str, body: &B) -> anyhow::Result<Value> {
        self.send(self.http.post(self.url(path)).json(body)).await
    }

    pub async fn get(&self, path: &str) -> anyhow::Result<Value> {
        self.send(self.authorized(self.http.get(self.url(path)))?).await
    }

    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> anyhow::Result<Value> {
        self.send(self.authorized(self.http.post(self.url(path)).json(body))?).await
    }

    pub async fn put<B: Serialize>(&self, path: &str, body: &B) -> anyhow::Result<Value> {
        self.send(self.authorized(self.http.put(self.url(path)).json(body))?).await
    }

    pub async fn delete(&self, path: &str) -> anyhow::Result<()> {
        self.send(self.authorized(self.http.delete(self.url(path)))?).await?;
        Ok(())
    }

    pub async fn upload(&self, path: &str, file_name: &str, data: Vec<u8>) -> anyhow::Result<Value> {
        let part = multipart::Part::bytes(data).file_name(file_name.to_string());
        let form = multipart::Form::new().part("file", part);
        self.send(self.authorized(self.http.post(self.url(path)).multipart(form))?).await
    }

    /// Download raw bytes plus the file name from `Content-Disposition`.
    pub async fn download(&self, path: &str) -> anyhow::Result<(Option<String>, Bytes)> {
        let response = self.authorized(self.http.get(self.url(path)))?.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_body(status, &body));
        }

        let file_name = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(disposition_file_name);
        let data = response.bytes().await?;
        Ok((file_name, data))
    }

    async fn send(&self, request: RequestBuilder) -> anyhow::Result<Value> {
        let response = request
            .send()
            .await
            .with_context(|| format!("request to {} failed", self.base_url))?;
        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }

        let body = response.text().await?;
        if !status.is_success() {
            return Err(error_from_body(status, &body));
        }

        let envelope: Value = serde_json::from_str(&body).context("server returned invalid JSON")?;
        Ok(envelope.get("data").cloned().unwrap_or(Value::Null))
    }
}

/// `{"error": true, "message": ..., "code": ...}` becomes "message (CODE)".
fn error_from_body(status: StatusCode, body: &str) -> anyhow::Error {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|v| v.get("message"))
        .and_then(Value::as_str);
    let code = parsed.as_ref().and_then(|v| v.get("code")).and_then(Value::as_str);

    match (message, code) {
        (Some(message), Some(code)) => anyhow!("{} ({})", message, code),
        (Some(message), None) => anyhow!("{}", message),
        _ if !body.trim().is_empty() => anyhow!("HTTP {}: {}", status.as_u16(), body.trim()),
        _ => anyhow!("HTTP {}", status.as_u16()),
    }
}

fn disposition_file_name(value: &str) -> Option<String> {
    let start = value.find("filename=\"")? + "filename=\"".len();
    let rest = &value[start..];
    let end = rest.find('"')?;
    Some(rest[..end].to_string())
}
