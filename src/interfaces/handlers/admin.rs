use actix_multipart::form::{tempfile::TempFile, MultipartForm};
use actix_web::{http::header, web, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, MutexGuard};
use tracing::instrument;

use crate::{
    entities::{event::EventFields, media::RawFile},
    errors::AppError,
    use_cases::upload_slot::UploadSlot,
    utils::sniff::resolve_content_type,
    AppState,
};

#[derive(Debug, MultipartForm)]
pub struct MediaUpload {
    // Above the largest policy limit so oversized picks get the policy message.
    #[multipart(rename = "file", limit = "110MiB")]
    pub file: TempFile,
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub confirm: bool,
}

/// One admin operation per form at a time; a second caller is told to wait.
fn acquire<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, AppError> {
    mutex.try_lock().map_err(|_| {
        tracing::warn!("Admin form busy, rejecting request");
        AppError::Conflict("Another operation on this form is still in progress".to_string())
    })
}

async fn read_upload(upload: MediaUpload) -> Result<RawFile, AppError> {
    let temp = upload.file;
    let bytes = tokio::fs::read(temp.file.path()).await.map_err(|e| {
        tracing::error!("Failed to read uploaded file: {}", e);
        AppError::InternalError("Failed to read uploaded file".to_string())
    })?;

    let declared = temp.content_type.as_ref().map(|mime| mime.essence_str());
    let content_type = resolve_content_type(declared, &bytes);
    let name = temp.file_name.unwrap_or_else(|| "upload".to_string());

    Ok(RawFile::new(name, content_type, bytes))
}

/// Operation outcome plus the refreshed panel, so the banner travels with errors too.
fn with_panel<T, V>(result: Result<T, AppError>, panel: V) -> HttpResponse
where
    T: Serialize,
    V: Serialize,
{
    match result {
        Ok(outcome) => HttpResponse::Ok().json(serde_json::json!({
            "result": outcome,
            "panel": panel,
        })),
        Err(err) => {
            let body = match &err {
                AppError::ValidationError(details) => serde_json::json!({
                    "error": "Validation failed",
                    "details": details,
                    "panel": panel,
                }),
                other => serde_json::json!({
                    "error": other.to_string(),
                    "panel": panel,
                }),
            };
            HttpResponse::build(err.status_code()).json(body)
        }
    }
}

/// The slot's processed file as-is, for the panel's `<img>`/`<video>` preview.
fn preview_response(slot: &UploadSlot) -> Result<HttpResponse, AppError> {
    let media = slot
        .processed()
        .ok_or_else(|| AppError::NotFound("No file selected".to_string()))?;

    Ok(HttpResponse::Ok()
        .content_type(media.content_type)
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .body(media.bytes.clone()))
}

// ───── Events ───────────────────────────────────────────────────────

#[instrument(skip(state))]
pub async fn event_panel(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let mut admin = acquire(&state.event_admin)?;
    let result = admin.refresh().await.map(|events| events.len());
    Ok(with_panel(result, admin.view()))
}

#[instrument(skip(state, fields))]
pub async fn set_event_fields(
    state: web::Data<AppState>,
    fields: web::Json<EventFields>,
) -> Result<HttpResponse, AppError> {
    let mut admin = acquire(&state.event_admin)?;
    admin.set_fields(fields.into_inner());
    let complete = admin.fields().is_complete();
    Ok(with_panel(Ok(complete), admin.view()))
}

#[instrument(skip(state, form))]
pub async fn select_event_file(
    state: web::Data<AppState>,
    form: MultipartForm<MediaUpload>,
) -> Result<HttpResponse, AppError> {
    let file = read_upload(form.into_inner()).await?;
    let mut admin = acquire(&state.event_admin)?;
    let result = admin.select_file(file).await;
    Ok(with_panel(result, admin.view()))
}

#[instrument(skip(state))]
pub async fn event_preview(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let admin = acquire(&state.event_admin)?;
    preview_response(admin.slot())
}

#[instrument(skip(state))]
pub async fn clear_event_file(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let mut admin = acquire(&state.event_admin)?;
    admin.clear_selection();
    Ok(with_panel(Ok(()), admin.view()))
}

#[instrument(skip(state))]
pub async fn submit_event(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let mut admin = acquire(&state.event_admin)?;
    let result = admin.submit().await;
    Ok(with_panel(result, admin.view()))
}

#[instrument(skip(state, query))]
pub async fn delete_event(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    query: web::Query<DeleteQuery>,
) -> Result<HttpResponse, AppError> {
    let mut admin = acquire(&state.event_admin)?;
    let result = admin.delete(id.into_inner(), query.confirm).await;
    Ok(with_panel(result, admin.view()))
}

// ───── Posters ──────────────────────────────────────────────────────

#[instrument(skip(state))]
pub async fn poster_panel(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let mut admin = acquire(&state.poster_admin)?;
    let result = admin.refresh().await.map(|posters| posters.len());
    Ok(with_panel(result, admin.view()))
}

#[instrument(skip(state, form))]
pub async fn select_poster_file(
    state: web::Data<AppState>,
    form: MultipartForm<MediaUpload>,
) -> Result<HttpResponse, AppError> {
    let file = read_upload(form.into_inner()).await?;
    let mut admin = acquire(&state.poster_admin)?;
    let result = admin.select_file(file).await;
    Ok(with_panel(result, admin.view()))
}

#[instrument(skip(state))]
pub async fn poster_preview(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let admin = acquire(&state.poster_admin)?;
    preview_response(admin.slot())
}

#[instrument(skip(state))]
pub async fn clear_poster_file(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let mut admin = acquire(&state.poster_admin)?;
    admin.clear_selection();
    Ok(with_panel(Ok(()), admin.view()))
}

#[instrument(skip(state))]
pub async fn submit_poster(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let mut admin = acquire(&state.poster_admin)?;
    let result = admin.submit().await;
    Ok(with_panel(result, admin.view()))
}

#[instrument(skip(state, query))]
pub async fn delete_poster(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    query: web::Query<DeleteQuery>,
) -> Result<HttpResponse, AppError> {
    let mut admin = acquire(&state.poster_admin)?;
    let result = admin.delete(id.into_inner(), query.confirm).await;
    Ok(with_panel(result, admin.view()))
}
