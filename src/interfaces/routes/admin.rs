use actix_multipart::form::MultipartFormConfig;
use actix_web::web;

use crate::{constants::MAX_MEDIA_UPLOAD_BYTES, handlers::admin, errors::AppError};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    // Per-field limits live on `MediaUpload`; this only lifts the 50 MiB default.
    let multipart = MultipartFormConfig::default()
        .total_limit((MAX_MEDIA_UPLOAD_BYTES + MAX_MEDIA_UPLOAD_BYTES / 10) as usize)
        .error_handler(|err, _req| AppError::from(err).into());

    cfg.service(
        web::scope("/admin")
            .app_data(multipart)
            .service(
                web::scope("/events")
                    .service(web::resource("").route(web::get().to(admin::event_panel)))
                    .service(web::resource("/fields").route(web::put().to(admin::set_event_fields)))
                    .service(
                        web::resource("/file")
                            .route(web::post().to(admin::select_event_file))
                            .route(web::delete().to(admin::clear_event_file))
                    )
                    .service(web::resource("/preview").route(web::get().to(admin::event_preview)))
                    .service(web::resource("/submit").route(web::post().to(admin::submit_event)))
                    .service(web::resource("/{id}").route(web::delete().to(admin::delete_event)))
            )
            .service(
                web::scope("/posters")
                    .service(web::resource("").route(web::get().to(admin::poster_panel)))
                    .service(
                        web::resource("/file")
                            .route(web::post().to(admin::select_poster_file))
                            .route(web::delete().to(admin::clear_poster_file))
                    )
                    .service(web::resource("/preview").route(web::get().to(admin::poster_preview)))
                    .service(web::resource("/submit").route(web::post().to(admin::submit_poster)))
                    .service(web::resource("/{id}").route(web::delete().to(admin::delete_poster)))
            )
    );
}
