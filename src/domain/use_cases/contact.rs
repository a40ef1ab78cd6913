use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::{
    entities::{
        contact::{validate_field, ContactField, ContactForm},
        status::{StatusKind, StatusMessage},
    },
    errors::{AppError, FieldError},
    repositories::form_webhook::FormWebhook,
};

pub const FIX_ERRORS_MESSAGE: &str = "Please fix all errors before submitting";
pub const SENT_MESSAGE: &str =
    "Thank you for your message! I'll get back to you soon. You should also receive an email confirmation.";
pub const SEND_FAILED_MESSAGE: &str =
    "Oops! Something went wrong. Please try again or contact me directly via email.";

#[derive(Debug, Clone, Serialize)]
pub struct ContactView {
    pub form: ContactForm,
    pub errors: BTreeMap<ContactField, &'static str>,
    pub touched: BTreeSet<ContactField>,
    pub is_submitting: bool,
    pub is_form_valid: bool,
    pub status: Option<StatusMessage>,
}

/// Contact form state: per-field errors shown once a field has been touched,
/// one webhook call per accepted submit.
pub struct ContactFormController<W> {
    webhook: W,
    form: ContactForm,
    errors: BTreeMap<ContactField, &'static str>,
    touched: BTreeSet<ContactField>,
    status: Option<StatusMessage>,
    submitting: bool,
}

impl<W> ContactFormController<W>
where
    W: FormWebhook,
{
    pub fn new(webhook: W) -> Self {
        ContactFormController {
            webhook,
            form: ContactForm::default(),
            errors: BTreeMap::new(),
            touched: BTreeSet::new(),
            status: None,
            submitting: false,
        }
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn change(&mut self, field: ContactField, value: impl Into<String>) {
        self.form.set(field, value.into());
        if self.touched.contains(&field) {
            self.revalidate(field);
        }
    }

    pub fn blur(&mut self, field: ContactField) {
        self.touched.insert(field);
        self.revalidate(field);
    }

    /// Replaces every value at once, as a JSON post does.
    pub fn fill(&mut self, form: ContactForm) {
        for field in ContactField::ALL {
            self.change(field, form.get(field).to_string());
        }
    }

    /// Error for a field, only once the user has left it.
    pub fn visible_error(&self, field: ContactField) -> Option<&'static str> {
        if self.touched.contains(&field) {
            self.errors.get(&field).copied()
        } else {
            None
        }
    }

    pub fn is_form_valid(&self) -> bool {
        self.errors.is_empty() && self.form.all_filled()
    }

    fn revalidate(&mut self, field: ContactField) {
        match validate_field(field, self.form.get(field)) {
            Some(message) => {
                self.errors.insert(field, message);
            }
            None => {
                self.errors.remove(&field);
            }
        }
    }

    pub async fn submit(&mut self) -> Result<(), AppError> {
        if self.submitting {
            return Err(AppError::Conflict("A submission is already in progress".to_string()));
        }

        for field in ContactField::ALL {
            self.touched.insert(field);
            self.revalidate(field);
        }
        if !self.errors.is_empty() {
            self.status = Some(StatusMessage {
                kind: StatusKind::Error,
                text: FIX_ERRORS_MESSAGE.to_string(),
            });
            let details = self.errors
                .iter()
                .map(|(field, message)| FieldError {
                    field: field.as_str().to_string(),
                    message: message.to_string(),
                })
                .collect();
            return Err(AppError::ValidationError(details));
        }

        self.submitting = true;
        self.status = None;
        let result = self.webhook.submit(&self.form).await;
        self.submitting = false;

        match result {
            Ok(()) => {
                tracing::info!("Contact form delivered");
                self.form = ContactForm::default();
                self.errors.clear();
                self.touched.clear();
                self.status = Some(StatusMessage {
                    kind: StatusKind::Success,
                    text: SENT_MESSAGE.to_string(),
                });
                Ok(())
            }
            Err(e) => {
                tracing::error!("Error submitting form: {}", e);
                self.status = Some(StatusMessage {
                    kind: StatusKind::Error,
                    text: SEND_FAILED_MESSAGE.to_string(),
                });
                Err(e.into())
            }
        }
    }

    pub fn view(&self) -> ContactView {
        ContactView {
            form: self.form.clone(),
            errors: self.errors.clone(),
            touched: self.touched.clone(),
            is_submitting: self.submitting,
            is_form_valid: self.is_form_valid(),
            status: self.status.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{errors::WebhookError, repositories::form_webhook::MockFormWebhook};

    fn valid_form() -> ContactForm {
        ContactForm {
            name: "Ada Lovelace".into(),
            phone: "+1 (555) 123-4567".into(),
            email: "ada@example.com".into(),
            message: "Would love to have you speak at our meetup.".into(),
        }
    }

    #[test]
    fn errors_appear_only_after_blur() {
        let mut contact = ContactFormController::new(MockFormWebhook::new());

        contact.change(ContactField::Name, "A");
        assert_eq!(contact.visible_error(ContactField::Name), None);

        contact.blur(ContactField::Name);
        assert_eq!(contact.visible_error(ContactField::Name), Some("Name must be at least 2 characters"));

        contact.change(ContactField::Name, "Ada");
        assert_eq!(contact.visible_error(ContactField::Name), None);
    }

    #[test]
    fn validity_needs_every_field() {
        let mut contact = ContactFormController::new(MockFormWebhook::new());
        assert!(!contact.is_form_valid());

        contact.fill(valid_form());
        assert!(contact.is_form_valid());

        contact.blur(ContactField::Email);
        contact.change(ContactField::Email, "ada@");
        assert!(!contact.is_form_valid());
    }

    #[tokio::test]
    async fn short_phone_blocks_submission() {
        let mut webhook = MockFormWebhook::new();
        webhook.expect_submit().times(0);

        let mut contact = ContactFormController::new(webhook);
        contact.fill(ContactForm { phone: "12345".into(), ..valid_form() });

        let err = contact.submit().await.unwrap_err();

        assert!(matches!(err, AppError::ValidationError(ref list) if list.len() == 1 && list[0].field == "phone"));
        assert_eq!(contact.visible_error(ContactField::Phone), Some("Phone number must be at least 10 digits"));
        assert_eq!(contact.status().unwrap().text, FIX_ERRORS_MESSAGE);
        assert_eq!(contact.form().phone, "12345");
    }

    #[tokio::test]
    async fn valid_form_is_sent_once_and_cleared() {
        let mut webhook = MockFormWebhook::new();
        webhook
            .expect_submit()
            .withf(|form: &ContactForm| form.email == "ada@example.com")
            .times(1)
            .returning(|_| Ok(()));

        let mut contact = ContactFormController::new(webhook);
        contact.fill(valid_form());
        contact.submit().await.unwrap();

        assert_eq!(contact.form(), &ContactForm::default());
        assert!(contact.view().touched.is_empty());
        assert_eq!(contact.status().unwrap().kind, StatusKind::Success);
        assert_eq!(contact.status().unwrap().text, SENT_MESSAGE);
        assert!(!contact.is_submitting());
    }

    #[tokio::test]
    async fn transport_failure_keeps_values() {
        let mut webhook = MockFormWebhook::new();
        webhook
            .expect_submit()
            .times(1)
            .returning(|_| Err(WebhookError::Transport("dns failure".into())));

        let mut contact = ContactFormController::new(webhook);
        contact.fill(valid_form());

        assert!(contact.submit().await.is_err());
        assert_eq!(contact.form(), &valid_form());
        assert_eq!(contact.status().unwrap().text, SEND_FAILED_MESSAGE);
        assert!(!contact.is_submitting());
    }
}
