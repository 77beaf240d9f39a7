//! Endpoints proxying the external property catalog: filtered listings,
//! detail and unit lookups, search, and the cities/developers dropdowns.

use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::models::{ListingSummary, MarketSegment};
use crate::pagination::{extract_page_param, page_range};
use crate::services::{find_unit, PropertyService};
use crate::AppState;

/// Upstream page size, used to estimate last_page when the API omits it.
const API_PAGE_SIZE: i64 = 12;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/properties")
            .route(web::get().to(list_properties))
            .route(web::post().to(filter_properties)),
    );
    cfg.service(web::resource("/api/search").route(web::get().to(search_properties)));
    cfg.service(web::resource("/api/cities").route(web::get().to(cities)));
    cfg.service(web::resource("/api/developers").route(web::get().to(developers)));
    cfg.service(web::resource("/api/properties/{id}").route(web::get().to(property_detail)));
    cfg.service(
        web::resource("/api/properties/{property_id}/units/{unit_id}")
            .route(web::get().to(unit_detail)),
    );
}

#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    page: Option<u32>,
    city: Option<String>,
    district: Option<String>,
    property_type: Option<String>,
    min_price: Option<String>,
    max_price: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
    page: Option<u32>,
}

fn insert_non_empty(map: &mut Map<String, Value>, key: &str, value: &Option<String>) {
    if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        map.insert(key.to_string(), Value::String(value.to_string()));
    }
}

/// GET listing: a small set of filters straight from the query string.
async fn list_properties(
    data: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> impl Responder {
    let mut raw = Map::new();
    insert_non_empty(&mut raw, "city", &query.city);
    insert_non_empty(&mut raw, "district", &query.district);
    insert_non_empty(&mut raw, "property_type", &query.property_type);
    insert_non_empty(&mut raw, "min_price", &query.min_price);
    insert_non_empty(&mut raw, "max_price", &query.max_price);

    respond_with_listings(&data, Value::Object(raw), query.page).await
}

/// POST listing: the full whitelisted filter object as a JSON body.
async fn filter_properties(
    data: web::Data<AppState>,
    body: web::Json<Value>,
) -> impl Responder {
    let page = body
        .get("page")
        .and_then(|v| v.as_u64().or_else(|| v.as_str()?.parse().ok()))
        .map(|v| v as u32);

    respond_with_listings(&data, body.into_inner(), page).await
}

async fn respond_with_listings(
    data: &web::Data<AppState>,
    raw_filters: Value,
    page: Option<u32>,
) -> HttpResponse {
    let payload = PropertyService::build_filter_payload(&raw_filters);

    let page_data = match data.properties.fetch_page(&payload, page).await {
        Ok(page_data) => page_data,
        Err(error) => {
            return HttpResponse::Ok().json(json!({
                "status": false,
                "error": error,
            }));
        }
    };

    let listings: Vec<ListingSummary> = page_data
        .results
        .iter()
        .filter_map(ListingSummary::from_api)
        .collect();

    let commercial = listings
        .iter()
        .filter(|l| l.segment == MarketSegment::Commercial)
        .count();
    let predominant = if commercial * 2 > listings.len() {
        MarketSegment::Commercial
    } else {
        MarketSegment::Residential
    };

    let current_page = page_data.current_page.unwrap_or_else(|| page.unwrap_or(1));
    let last_page = page_data
        .last_page
        .unwrap_or_else(|| ((page_data.count / API_PAGE_SIZE) + 1) as u32);

    HttpResponse::Ok().json(json!({
        "status": true,
        "data": {
            "results": listings,
            "count": page_data.count,
            "current_page": current_page,
            "last_page": last_page,
            "next_page": page_data.next_page_url.as_deref().and_then(extract_page_param),
            "prev_page": page_data.previous_page_url.as_deref().and_then(extract_page_param),
            "page_range": page_range(current_page, last_page),
            "predominant_property_type": predominant.as_str(),
        }
    }))
}

async fn property_detail(data: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let id = path.into_inner();
    match data.properties.fetch_detail(id).await {
        Ok(detail) => HttpResponse::Ok().json(json!({
            "status": true,
            "data": detail,
        })),
        Err(error) => {
            log::warn!("Property {} detail unavailable: {}", id, error);
            HttpResponse::NotFound().json(json!({
                "status": false,
                "error": error,
            }))
        }
    }
}

async fn unit_detail(
    data: web::Data<AppState>,
    path: web::Path<(i64, String)>,
) -> impl Responder {
    let (property_id, unit_id) = path.into_inner();

    let detail = match data.properties.fetch_detail(property_id).await {
        Ok(detail) => detail,
        Err(error) => {
            return HttpResponse::NotFound().json(json!({
                "status": false,
                "error": error,
            }));
        }
    };

    match find_unit(&detail, &unit_id) {
        Some(unit) => HttpResponse::Ok().json(json!({
            "status": true,
            "data": {
                "property": detail,
                "unit": unit,
            }
        })),
        None => HttpResponse::NotFound().json(json!({
            "status": false,
            "error": "Unit not found.",
        })),
    }
}

async fn search_properties(
    data: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> impl Responder {
    let term = query.q.trim();
    if term.is_empty() {
        return HttpResponse::Ok().json(json!({
            "success": true,
            "properties": [],
            "total": 0,
        }));
    }

    match data.properties.search(term, &Map::new(), query.page).await {
        Ok(page_data) => HttpResponse::Ok().json(json!({
            "success": true,
            "properties": page_data.results,
            "total": page_data.count,
        })),
        Err(error) => HttpResponse::Ok().json(json!({
            "success": false,
            "error": error,
        })),
    }
}

async fn cities(data: web::Data<AppState>) -> impl Responder {
    match data.properties.fetch_cities().await {
        Ok(cities) => HttpResponse::Ok().json(json!({"status": true, "data": cities})),
        Err(error) => {
            HttpResponse::BadGateway().json(json!({"status": false, "error": error}))
        }
    }
}

async fn developers(data: web::Data<AppState>) -> impl Responder {
    match data.properties.fetch_developers().await {
        Ok(developers) => HttpResponse::Ok().json(json!({"status": true, "data": developers})),
        Err(error) => {
            HttpResponse::BadGateway().json(json!({"status": false, "error": error}))
        }
    }
}
