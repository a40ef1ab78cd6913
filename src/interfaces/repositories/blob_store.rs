use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Method;

use crate::{
    constants::BLOB_CACHE_CONTROL,
    errors::StoreError,
    repositories::supabase::{check_response, SupabaseClient},
};

/// Object storage addressed by bucket and object name.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, bucket: &str, name: &str, bytes: Bytes, content_type: &str) -> Result<(), StoreError>;
    fn public_url(&self, bucket: &str, name: &str) -> String;
    async fn remove(&self, bucket: &str, name: &str) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct SupabaseBlobStore {
    client: SupabaseClient,
}

impl SupabaseBlobStore {
    pub fn new(client: SupabaseClient) -> Self {
        SupabaseBlobStore { client }
    }

    fn object_path(bucket: &str, name: &str) -> String {
        format!("{}/{}", urlencoding::encode(bucket), urlencoding::encode(name))
    }
}

#[async_trait]
impl BlobStore for SupabaseBlobStore {
    async fn put(&self, bucket: &str, name: &str, bytes: Bytes, content_type: &str) -> Result<(), StoreError> {
        let url = self.client.endpoint(&format!("storage/v1/object/{}", Self::object_path(bucket, name)))?;
        let size = bytes.len();

        let response = self.client
            .request(Method::POST, url)
            .header("content-type", content_type)
            .header("cache-control", format!("max-age={}", BLOB_CACHE_CONTROL))
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;
        check_response(response).await?;

        tracing::info!(bucket, name, size, "Uploaded blob");
        Ok(())
    }

    fn public_url(&self, bucket: &str, name: &str) -> String {
        let path = format!("storage/v1/object/public/{}", Self::object_path(bucket, name));
        match self.client.endpoint(&path) {
            Ok(url) => url.to_string(),
            Err(e) => {
                tracing::warn!("Could not build public URL for {}/{}: {}", bucket, name, e);
                path
            }
        }
    }

    async fn remove(&self, bucket: &str, name: &str) -> Result<(), StoreError> {
        let url = self.client.endpoint(&format!("storage/v1/object/{}", urlencoding::encode(bucket)))?;

        let response = self.client
            .request(Method::DELETE, url)
            .json(&serde_json::json!({ "prefixes": [name] }))
            .send()
            .await?;
        check_response(response).await?;

        tracing::info!(bucket, name, "Removed blob");
        Ok(())
    }
}
