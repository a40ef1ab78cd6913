use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::{entities::contact::ContactForm, errors::WebhookError};

/// Spreadsheet intake endpoint for the contact form.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FormWebhook: Send + Sync {
    async fn submit(&self, form: &ContactForm) -> Result<(), WebhookError>;
}

/// Posts to a Google Apps Script web app.
///
/// The script answers with an opaque cross-origin response, so neither status
/// nor body is trusted: the call counts as delivered unless the transport fails.
#[derive(Clone)]
pub struct SheetsWebhook {
    http: Client,
    endpoint: Option<Url>,
}

impl SheetsWebhook {
    pub fn new(endpoint: &str) -> Self {
        Self::with_http(Client::new(), endpoint)
    }

    pub fn with_http(http: Client, endpoint: &str) -> Self {
        let endpoint = match endpoint.trim() {
            "" => None,
            raw => Url::parse(raw)
                .map_err(|e| tracing::error!("Invalid form webhook URL {}: {}", raw, e))
                .ok(),
        };
        SheetsWebhook { http, endpoint }
    }
}

#[async_trait]
impl FormWebhook for SheetsWebhook {
    async fn submit(&self, form: &ContactForm) -> Result<(), WebhookError> {
        let endpoint = self.endpoint.clone().ok_or(WebhookError::NotConfigured)?;

        let response = self.http
            .post(endpoint)
            .json(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Error submitting form: {}", e);
                WebhookError::from(e)
            })?;

        tracing::debug!(status = %response.status(), "Form webhook answered (not inspected)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ContactForm {
        ContactForm {
            name: "Ada Lovelace".into(),
            phone: "5551234567".into(),
            email: "ada@example.com".into(),
            message: "Hello there, this is long enough.".into(),
        }
    }

    #[tokio::test]
    async fn empty_url_is_not_configured() {
        let webhook = SheetsWebhook::new("   ");
        assert!(matches!(webhook.submit(&form()).await, Err(WebhookError::NotConfigured)));
    }

    #[tokio::test]
    async fn unparsable_url_is_not_configured() {
        let webhook = SheetsWebhook::new("not a url");
        assert!(matches!(webhook.submit(&form()).await, Err(WebhookError::NotConfigured)));
    }
}
