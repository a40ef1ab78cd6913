use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder, Response};
use url::Url;
use zeroize::Zeroizing;

use crate::errors::StoreError;

/// Shared HTTP plumbing for the hosted database and storage APIs.
#[derive(Clone)]
pub struct SupabaseClient {
    http: Client,
    base_url: Url,
    api_key: Arc<Zeroizing<String>>,
}

impl SupabaseClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, StoreError> {
        Self::with_http(Client::new(), base_url, api_key)
    }

    pub fn with_http(http: Client, base_url: &str, api_key: &str) -> Result<Self, StoreError> {
        // Url::join drops the last segment unless the base ends with '/'
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized)
            .map_err(|e| StoreError::Transport(format!("Invalid store URL {}: {}", base_url, e)))?;

        Ok(SupabaseClient {
            http,
            base_url,
            api_key: Arc::new(Zeroizing::new(api_key.to_string())),
        })
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, StoreError> {
        self.base_url
            .join(path)
            .map_err(|e| StoreError::Transport(format!("Invalid endpoint {}: {}", path, e)))
    }

    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", self.api_key.as_str())
            .bearer_auth(self.api_key.as_str())
    }
}

/// Turns a non-2xx response into `StoreError::Rejected`, keeping the body as the message.
pub async fn check_response(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or(body);

    Err(StoreError::Rejected {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_keeps_base_path() {
        let client = SupabaseClient::new("https://project.supabase.co/", "key").unwrap();
        assert_eq!(
            client.endpoint("rest/v1/events").unwrap().as_str(),
            "https://project.supabase.co/rest/v1/events"
        );

        let proxied = SupabaseClient::new("https://gateway.example/supabase", "key").unwrap();
        assert_eq!(
            proxied.endpoint("storage/v1/object/b").unwrap().as_str(),
            "https://gateway.example/supabase/storage/v1/object/b"
        );
    }

    #[test]
    fn rejects_invalid_base() {
        assert!(SupabaseClient::new("::nope::", "key").is_err());
    }
}
