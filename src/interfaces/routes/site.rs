use actix_web::web;

use crate::handlers::{contact, site};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/route").route(web::get().to(site::resolve_route)))
        .service(web::resource("/events").route(web::get().to(site::list_events)))
        .service(web::resource("/posters").route(web::get().to(site::list_posters)))
        .service(web::resource("/contact").route(web::post().to(contact::submit_contact)));
}
