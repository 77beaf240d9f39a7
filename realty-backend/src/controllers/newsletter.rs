//! Newsletter signup endpoint.

use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use crate::models::{SubscribeOutcome, SubscribeRequest};
use crate::text::{is_valid_email, normalize_email};
use crate::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/newsletter/subscribe").route(web::post().to(subscribe)),
    );
}

async fn subscribe(
    data: web::Data<AppState>,
    body: web::Json<SubscribeRequest>,
) -> impl Responder {
    let email = normalize_email(&body.email);

    if email.is_empty() {
        return HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": "Email is required.",
        }));
    }
    if !is_valid_email(&email) {
        return HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": "Please enter a valid email address.",
        }));
    }

    match data.db.subscribe_email(&email) {
        Ok(SubscribeOutcome::Subscribed) => {
            log::info!("New newsletter subscriber: {}", email);
            HttpResponse::Ok().json(json!({
                "success": true,
                "message": "Thank you for subscribing to our newsletter!",
            }))
        }
        Ok(SubscribeOutcome::Reactivated) => HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Your subscription has been reactivated!",
        })),
        Ok(SubscribeOutcome::AlreadySubscribed) => HttpResponse::Ok().json(json!({
            "success": false,
            "message": "You are already subscribed to our newsletter.",
        })),
        Err(err) => {
            log::error!("Newsletter subscription failed: {}", err);
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Sorry, there was an error processing your subscription. Please try again.",
            }))
        }
    }
}
