use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use wordtally_shared::BOT_TOKEN_HEADER;
use wordtally_shared::api::ErrorBody;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not found")]
    NotFound,
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("rejected: {0}")]
    Rejected(String),
    #[error("backend refused the service token")]
    Unauthorized,
    #[error("backend answered {0}")]
    Upstream(u16),
    #[error("backend unreachable: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Decode(#[source] reqwest::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.get_url(&self.url(path)).await
    }

    /// GET against a full URL; used for endpoints living under another base.
    pub async fn get_url<T: DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let resp = self.send(self.client.get(url)).await?;
        resp.json().await.map_err(ApiError::Decode)
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> ApiResult<T> {
        let resp = self.send(self.client.post(self.url(path)).json(body)).await?;
        resp.json().await.map_err(ApiError::Decode)
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let resp = self.send(self.client.patch(self.url(path)).json(body)).await?;
        resp.json().await.map_err(ApiError::Decode)
    }

    async fn send(&self, req: RequestBuilder) -> ApiResult<Response> {
        let req = match &self.token {
            Some(token) => req.header(BOT_TOKEN_HEADER, token),
            None => req,
        };
        let resp = req.send().await.map_err(ApiError::Transport)?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        tracing::debug!("backend answered {} for {}", status, resp.url());

        match status {
            StatusCode::NOT_FOUND => Err(ApiError::NotFound),
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
            StatusCode::FORBIDDEN => Err(ApiError::Forbidden(error_message(resp).await)),
            StatusCode::BAD_REQUEST => Err(ApiError::Rejected(error_message(resp).await)),
            other => Err(ApiError::Upstream(other.as_u16())),
        }
    }
}

async fn error_message(resp: Response) -> String {
    resp.json::<ErrorBody>()
        .await
        .map(|body| body.error)
        .unwrap_or_default()
}
