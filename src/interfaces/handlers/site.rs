use std::time::Duration;

use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    constants::DESKTOP_BREAKPOINT_PX,
    entities::route::Route,
    errors::AppError,
    repositories::record_store::RecordStore,
    use_cases::carousel::{CarouselController, CarouselViewState},
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct RouteQuery {
    pub fragment: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub width: Option<u32>,
}

/// A listing plus the carousel window a client of the given width starts with.
#[derive(Debug, Serialize)]
pub struct CarouselFeed<T> {
    pub items: Vec<T>,
    pub view: CarouselViewState,
    pub max_index: usize,
    pub rotation_secs: u64,
}

impl<T> CarouselFeed<T> {
    fn build(items: Vec<T>, width: u32, period: Duration) -> Self {
        let carousel = CarouselController::new(items, width, period);
        let view = carousel.snapshot();
        let max_index = carousel.max_index();
        let items = carousel.into_items();

        CarouselFeed {
            items,
            view,
            max_index,
            rotation_secs: period.as_secs(),
        }
    }
}

pub async fn resolve_route(
    state: web::Data<AppState>,
    query: web::Query<RouteQuery>,
) -> impl Responder {
    let admin_fragment = &state.config.admin_fragment;
    let route = match (&query.fragment, &query.url) {
        (Some(fragment), _) => Route::resolve(fragment, admin_fragment),
        (None, Some(url)) => Route::from_url(url, admin_fragment),
        (None, None) => Route::Public,
    };

    HttpResponse::Ok().json(serde_json::json!({ "route": route }))
}

#[instrument(skip(state, query))]
pub async fn list_events(
    state: web::Data<AppState>,
    query: web::Query<FeedQuery>,
) -> Result<impl Responder, AppError> {
    let events = state.records.list_events().await.map_err(|e| {
        tracing::error!("Error fetching events: {}", e);
        e
    })?;

    let width = query.width.unwrap_or(DESKTOP_BREAKPOINT_PX);
    Ok(HttpResponse::Ok().json(CarouselFeed::build(events, width, state.config.events_rotation())))
}

#[instrument(skip(state, query))]
pub async fn list_posters(
    state: web::Data<AppState>,
    query: web::Query<FeedQuery>,
) -> Result<impl Responder, AppError> {
    let posters = state.records.list_posters().await.map_err(|e| {
        tracing::error!("Error fetching posters: {}", e);
        e
    })?;

    let width = query.width.unwrap_or(DESKTOP_BREAKPOINT_PX);
    Ok(HttpResponse::Ok().json(CarouselFeed::build(posters, width, state.config.posters_rotation())))
}
