/*
 * SPDX-FileCopyrightText: 2025 Trellis Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Thin client for the external blob storage provider. Objects are
//! addressed by key below a single endpoint; authentication is a bearer
//! token.

use anyhow::{Context, Result, bail};

#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub key: String,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct BlobStore {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl BlobStore {
    pub fn new(endpoint: &str, token: &str) -> Self {
        BlobStore {
            client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.endpoint, key)
    }

    pub async fn put(
        &self,
        key: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<StoredBlob> {
        let url = self.object_url(key);

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.token)
            .header(reqwest::header::CONTENT_TYPE, content_type.to_string())
            .body(body)
            .send()
            .await
            .context("Blob upload request failed")?;

        if !response.status().is_success() {
            bail!("Blob storage rejected upload: {}", response.status());
        }

        Ok(StoredBlob {
            key: key.to_string(),
            url,
        })
    }

    pub async fn delete(&self, key: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.object_url(key))
            .bearer_auth(&self.token)
            .send()
            .await
            .context("Blob delete request failed")?;

        if !response.status().is_success() {
            bail!("Blob storage rejected delete: {}", response.status());
        }

        Ok(())
    }
}
