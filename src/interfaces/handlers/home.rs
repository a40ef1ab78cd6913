use actix_web::{get, HttpResponse, Responder};

#[get("/")]
pub async fn home() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Welcome to the Showcase Site API!",
        "status": "Ok",
        "version": env!("CARGO_PKG_VERSION"),
        "routes": {
            "events": "/api/v1/events",
            "posters": "/api/v1/posters",
            "contact": "/api/v1/contact",
            "admin": "/api/v1/admin"
        }
    }))
}
