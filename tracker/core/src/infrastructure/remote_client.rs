// Copyright (c) 2026 AeroTrack Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Remote Store Client
//!
//! Thin reqwest wrapper shared by every HTTP repository.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Transport to the remote aggregate store
//! - **Integration:** HTTP repositories → RemoteStoreClient → remote store API
//!
//! Every request carries the bearer token of the current session, when there
//! is one. Non-2xx responses become [`RepositoryError::Remote`] with the
//! message from the server's `{"error": "..."}` body, falling back to
//! `HTTP <status>`.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::client_config::RemoteConfig;
use crate::domain::repository::RepositoryError;
use crate::domain::session::SessionGate;

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

pub struct RemoteStoreClient {
    client: Client,
    base_url: Url,
    session: Arc<dyn SessionGate>,
}

impl RemoteStoreClient {
    pub fn new(config: &RemoteConfig, session: Arc<dyn SessionGate>) -> Result<Self, RepositoryError> {
        let base_url = Url::parse(config.base_url.trim()).map_err(|e| {
            RepositoryError::remote(None, format!("invalid base url '{}': {}", config.base_url, e))
        })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| RepositoryError::remote(None, e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    /// Joins path segments onto the base URL, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Result<Url, RepositoryError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RepositoryError::remote(None, format!("base url '{}' cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, RepositoryError> {
        let url = self.url(segments)?;
        debug!(method = %method, url = %url, "Remote store request");
        let builder = self.client.request(method, url);
        Ok(match self.session.current().and_then(|s| s.token) {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, RepositoryError> {
        let response = builder
            .send()
            .await
            .map_err(|e| RepositoryError::remote(None, e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

        Err(RepositoryError::remote(Some(status.as_u16()), message))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, RepositoryError> {
        let body = response
            .text()
            .await
            .map_err(|e| RepositoryError::remote(None, e.to_string()))?;
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, RepositoryError> {
        let response = self.send(self.request(Method::GET, segments)?).await?;
        Self::decode(response).await
    }

    pub async fn post<B, T>(&self, segments: &[&str], body: &B) -> Result<T, RepositoryError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(self.request(Method::POST, segments)?.json(body)).await?;
        Self::decode(response).await
    }

    /// POST whose response body is ignored.
    pub async fn post_unit<B>(&self, segments: &[&str], body: &B) -> Result<(), RepositoryError>
    where
        B: Serialize + ?Sized,
    {
        self.send(self.request(Method::POST, segments)?.json(body)).await?;
        Ok(())
    }

    pub async fn put<B, T>(&self, segments: &[&str], body: &B) -> Result<T, RepositoryError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(self.request(Method::PUT, segments)?.json(body)).await?;
        Self::decode(response).await
    }

    /// DELETE; an empty response body is expected and ignored.
    pub async fn delete(&self, segments: &[&str]) -> Result<(), RepositoryError> {
        self.send(self.request(Method::DELETE, segments)?).await?;
        Ok(())
    }
}
