//! Lead capture endpoints: the plain contact form and the long-form
//! investment lead funnel.

use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use crate::models::{ContactLeadRequest, ContactMessageRequest};
use crate::text::{is_valid_email, is_valid_phone};
use crate::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/contact").route(web::post().to(submit_message)));
    cfg.service(web::resource("/api/contact/leads").route(web::post().to(submit_lead)));
}

async fn submit_message(
    data: web::Data<AppState>,
    body: web::Json<ContactMessageRequest>,
) -> impl Responder {
    let request = body.into_inner();

    let required = [
        request.name.trim(),
        request.email.trim(),
        request.phone.trim(),
        request.subject.trim(),
        request.message.trim(),
    ];
    if required.iter().any(|field| field.is_empty()) {
        return HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": "Please fill in all required fields.",
        }));
    }
    if !is_valid_email(request.email.trim()) {
        return HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": "Please enter a valid email address.",
        }));
    }
    if !is_valid_phone(request.phone.trim()) {
        return HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": "Please enter a valid phone number.",
        }));
    }

    match data.db.insert_contact_message(&request) {
        Ok(message) => {
            log::info!(
                "New contact message #{} from {} ({})",
                message.id,
                message.name,
                message.email
            );
            HttpResponse::Ok().json(json!({
                "success": true,
                "message": "Thank you for your message! We will get back to you soon.",
            }))
        }
        Err(err) => {
            log::error!("Failed to store contact message: {}", err);
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "An error occurred while submitting your message. Please try again.",
            }))
        }
    }
}

async fn submit_lead(
    data: web::Data<AppState>,
    body: web::Json<ContactLeadRequest>,
) -> impl Responder {
    let request = body.into_inner();

    let required = [
        request.first_name.trim(),
        request.last_name.trim(),
        request.email.trim(),
        request.phone.trim(),
    ];
    if required.iter().any(|field| field.is_empty()) {
        return HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": "Please fill in all required fields.",
        }));
    }
    if !is_valid_email(request.email.trim()) {
        return HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": "Please enter a valid email address.",
        }));
    }

    match data.db.insert_contact_lead(&request) {
        Ok(lead) => {
            log::info!(
                "New investment lead #{} from {} ({})",
                lead.id,
                lead.full_name(),
                lead.email
            );
            HttpResponse::Ok().json(json!({
                "success": true,
                "message": "Thank you for your inquiry! Our team will contact you within 24 hours.",
                "contact_id": lead.id,
            }))
        }
        Err(err) => {
            log::error!("Failed to store lead: {}", err);
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "An error occurred while submitting your inquiry. Please try again.",
            }))
        }
    }
}
