//! Endpoints for locally-managed exclusive properties: filtered listing,
//! detail with gallery and amenities, filter-form options and inquiries.

use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use crate::models::{
    ContactMethod, CreateInquiryRequest, ExclusiveFilters, ExclusiveProperty, InquiryType,
};
use crate::text::is_valid_email;
use crate::AppState;

/// Listings per page.
const PAGE_SIZE: u32 = 12;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/exclusive-properties").route(web::get().to(list)),
    );
    cfg.service(
        web::resource("/api/exclusive-properties/filter").route(web::post().to(filter)),
    );
    cfg.service(
        web::resource("/api/exclusive-properties/filter-options")
            .route(web::get().to(filter_options)),
    );
    cfg.service(
        web::resource("/api/exclusive-properties/inquiries")
            .route(web::post().to(submit_inquiry)),
    );
    cfg.service(
        web::resource("/api/exclusive-properties/{slug}").route(web::get().to(detail)),
    );
}

async fn list(
    data: web::Data<AppState>,
    query: web::Query<ExclusiveFilters>,
) -> impl Responder {
    respond_with_page(&data, query.into_inner())
}

async fn filter(
    data: web::Data<AppState>,
    body: web::Json<ExclusiveFilters>,
) -> impl Responder {
    respond_with_page(&data, body.into_inner())
}

fn respond_with_page(data: &web::Data<AppState>, filters: ExclusiveFilters) -> HttpResponse {
    let page = filters.page.unwrap_or(1).max(1);

    match data.db.filter_exclusive_properties(&filters, page, PAGE_SIZE) {
        Ok((properties, total)) => {
            let last_page = ((total as u32).div_ceil(PAGE_SIZE)).max(1);
            let results: Vec<serde_json::Value> =
                properties.iter().map(ExclusiveProperty::summary_json).collect();

            HttpResponse::Ok().json(json!({
                "status": "success",
                "data": {
                    "results": results,
                    "count": total,
                    "current_page": page,
                    "last_page": last_page,
                    "has_next": page < last_page,
                    "has_previous": page > 1,
                }
            }))
        }
        Err(err) => {
            log::error!("Exclusive listing query failed: {}", err);
            HttpResponse::InternalServerError().json(json!({
                "status": "error",
                "message": "Unable to load exclusive properties.",
            }))
        }
    }
}

async fn filter_options(data: web::Data<AppState>) -> impl Responder {
    match data.db.exclusive_filter_options() {
        Ok(options) => HttpResponse::Ok().json(json!({"status": true, "data": options})),
        Err(err) => {
            log::error!("Failed to load filter options: {}", err);
            HttpResponse::InternalServerError().json(json!({
                "status": false,
                "error": "Unable to load filter options.",
            }))
        }
    }
}

async fn detail(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let slug = path.into_inner();

    let property = match data.db.get_exclusive_property_by_slug(&slug) {
        Ok(Some(property)) => property,
        Ok(None) => {
            return HttpResponse::NotFound().json(json!({
                "error": "Property not found"
            }));
        }
        Err(err) => {
            log::error!("Failed to load property {}: {}", slug, err);
            return HttpResponse::InternalServerError().json(json!({
                "error": "Internal server error"
            }));
        }
    };

    if let Err(err) = data.db.increment_property_views(&property.id) {
        log::warn!("Failed to bump view count for {}: {}", property.id, err);
    }

    let images = data.db.list_property_images(&property.id).unwrap_or_default();
    let amenities = data
        .db
        .list_property_amenities(&property.id)
        .unwrap_or_default();
    let related = data
        .db
        .related_exclusive_properties(&property.district, &property.id, 3)
        .unwrap_or_default();

    let mut body = serde_json::to_value(&property).unwrap_or_else(|_| json!({}));
    if let Some(object) = body.as_object_mut() {
        object.insert("formatted_price".to_string(), json!(property.formatted_price()));
        object.insert("bedroom_display".to_string(), json!(property.bedroom_display()));
        object.insert("url".to_string(), json!(property.url()));
    }

    HttpResponse::Ok().json(json!({
        "property": body,
        "images": images,
        "amenities": amenities,
        "related_properties": related
            .iter()
            .map(ExclusiveProperty::summary_json)
            .collect::<Vec<_>>(),
    }))
}

async fn submit_inquiry(
    data: web::Data<AppState>,
    body: web::Json<CreateInquiryRequest>,
) -> impl Responder {
    let request = body.into_inner();

    if request.name.trim().is_empty() || !is_valid_email(request.email.trim()) {
        return HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": "Please provide your name and a valid email address.",
        }));
    }

    let property = match data.db.get_exclusive_property(&request.property_id) {
        Ok(Some(property)) => property,
        Ok(None) => {
            return HttpResponse::NotFound().json(json!({
                "success": false,
                "message": "Property not found.",
            }));
        }
        Err(err) => {
            log::error!("Inquiry property lookup failed: {}", err);
            return HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "An error occurred. Please try again.",
            }));
        }
    };

    let inquiry_type = request
        .inquiry_type
        .as_deref()
        .and_then(InquiryType::parse)
        .unwrap_or_default();
    let contact_method = request
        .contact_method
        .as_deref()
        .and_then(ContactMethod::parse)
        .unwrap_or_default();

    let inserted = data.db.insert_inquiry(
        &property.id,
        inquiry_type,
        request.name.trim(),
        request.email.trim(),
        request.phone.as_deref().unwrap_or("").trim(),
        request.message.as_deref().unwrap_or("").trim(),
        contact_method,
        request.budget_min,
        request.budget_max,
    );

    match inserted {
        Ok(inquiry) => {
            if let Err(err) = data.db.increment_property_inquiries(&property.id) {
                log::warn!("Failed to bump inquiry count for {}: {}", property.id, err);
            }
            log::info!(
                "New {} inquiry #{} for '{}' from {}",
                inquiry.inquiry_type.as_str(),
                inquiry.id,
                property.title,
                inquiry.email
            );
            HttpResponse::Ok().json(json!({
                "success": true,
                "message": "Your inquiry has been submitted successfully. We will contact you soon.",
            }))
        }
        Err(err) => {
            log::error!("Failed to store inquiry: {}", err);
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "An error occurred. Please try again.",
            }))
        }
    }
}
