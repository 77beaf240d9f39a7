use actix_web::{web, HttpResponse, Responder};

/// Version from Cargo.toml, available at compile time
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/health").route(web::get().to(health_check)));
    cfg.service(web::resource("/api/version").route(web::get().to(get_version)));
}

async fn health_check(data: web::Data<crate::AppState>) -> impl Responder {
    // A cheap query doubles as a database liveness probe
    let database = match data.db.count_unread_messages() {
        Ok(_) => "ok",
        Err(_) => "error",
    };

    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "database": database,
        "version": VERSION
    }))
}

async fn get_version() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "version": VERSION
    }))
}
