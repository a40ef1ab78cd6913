use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::contact::ContactForm,
    errors::AppError,
    use_cases::contact::ContactFormController,
    AppState,
};

/// One submission per request: the posted values go through the same
/// validation and webhook path as the interactive form.
#[instrument(skip(state, form))]
pub async fn submit_contact(
    state: web::Data<AppState>,
    form: web::Json<ContactForm>,
) -> impl Responder {
    let mut contact = ContactFormController::new(state.webhook.clone());
    contact.fill(form.into_inner());

    match contact.submit().await {
        Ok(()) => HttpResponse::Ok().json(contact.view()),
        Err(AppError::ValidationError(details)) => HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Validation failed",
            "details": details,
            "status": contact.status(),
        })),
        Err(e) => HttpResponse::BadGateway().json(serde_json::json!({
            "error": e.to_string(),
            "status": contact.status(),
            "form": contact.form(),
        })),
    }
}
