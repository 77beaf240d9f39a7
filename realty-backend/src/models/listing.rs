//! Mapping helpers for objects returned by the external listings API.
//!
//! The API is multilingual: `title` is either a bare string or
//! `{"en": "..."}`, and `city`/`district`/`developer` nest as
//! `{"name": {"en": "..."}}`. Numbers arrive as numbers or numeric strings
//! depending on the field and endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Upstream property-type taxonomy: id 3 is commercial, 20 residential.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketSegment {
    #[default]
    Residential,
    Commercial,
}

impl MarketSegment {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketSegment::Residential => "residential",
            MarketSegment::Commercial => "commercial",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MarketSegment::Residential => "Residential",
            MarketSegment::Commercial => "Commercial",
        }
    }

    /// Map the API's `property_type` id, which may be a number or a string.
    pub fn from_type_id(value: Option<&Value>) -> Self {
        let is_commercial = match value {
            Some(Value::Number(n)) => n.as_i64() == Some(3),
            Some(Value::String(s)) => s == "3",
            _ => false,
        };
        if is_commercial {
            MarketSegment::Commercial
        } else {
            MarketSegment::Residential
        }
    }
}

/// Extract English text from a multilingual field with graceful fallback:
/// `en` key first, then a nested `name`, then the first string value.
pub fn lang_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(map) => {
            if let Some(Value::String(s)) = map.get("en") {
                if !s.is_empty() {
                    return Some(s.clone());
                }
            }
            if let Some(name) = map.get("name") {
                return lang_text(name);
            }
            map.values()
                .find_map(|v| v.as_str().filter(|s| !s.is_empty()).map(str::to_string))
        }
        _ => None,
    }
}

/// English text for a field of an API object, empty when absent.
pub fn field_text(object: &Value, field: &str) -> String {
    object
        .get(field)
        .and_then(lang_text)
        .unwrap_or_default()
}

/// Numeric id of an API object; ids occasionally arrive as strings.
pub fn api_id(object: &Value) -> Option<i64> {
    match object.get("id") {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    }
}

fn field_f64(object: &Value, field: &str) -> Option<f64> {
    match object.get(field) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

fn field_i64(object: &Value, field: &str) -> Option<i64> {
    match object.get(field) {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

/// String rendition of a field that may be a string or a number.
fn field_string(object: &Value, field: &str) -> String {
    match object.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn field_bool(object: &Value, field: &str) -> bool {
    object
        .get(field)
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// A listing card mapped from one API result object.
#[derive(Debug, Clone, Serialize)]
pub struct ListingSummary {
    pub id: i64,
    pub title: String,
    pub image: Option<String>,
    pub location: String,
    pub price: Option<f64>,
    pub area: Option<f64>,
    pub bedrooms: String,
    pub bathrooms: String,
    pub property_type: &'static str,
    pub segment: MarketSegment,
    pub detail_url: String,
}

impl ListingSummary {
    /// Returns `None` when the object carries no usable id.
    pub fn from_api(object: &Value) -> Option<Self> {
        let id = api_id(object)?;
        let title = object
            .get("title")
            .and_then(lang_text)
            .unwrap_or_else(|| "Untitled".to_string());

        let city = field_text(object, "city");
        let district = field_text(object, "district");
        let segment = MarketSegment::from_type_id(object.get("property_type"));

        Some(ListingSummary {
            id,
            title,
            image: object
                .get("cover")
                .and_then(Value::as_str)
                .map(str::to_string),
            location: format!("{}, {}", city, district),
            price: field_f64(object, "low_price"),
            area: field_f64(object, "min_area"),
            bedrooms: field_string(object, "bedrooms"),
            bathrooms: field_string(object, "bathrooms"),
            property_type: segment.label(),
            segment,
            detail_url: format!("/property/{}/", id),
        })
    }
}

/// A row in the local mirror of the external catalog.
#[derive(Debug, Clone, Serialize)]
pub struct MirrorProperty {
    pub api_id: i64,
    pub title: String,
    pub description: String,
    pub property_type: MarketSegment,
    pub unit_type: String,
    pub city: String,
    pub district: String,
    pub low_price: Option<f64>,
    pub high_price: Option<f64>,
    pub min_area: Option<f64>,
    pub max_area: Option<f64>,
    pub bedrooms: String,
    pub bathrooms: String,
    pub rooms: String,
    pub cover_image: String,
    pub property_status: String,
    pub sales_status: String,
    pub delivery_year: Option<i64>,
    pub developer: String,
    pub is_featured: bool,
}

impl MirrorProperty {
    /// Returns `None` when the object carries no usable id.
    pub fn from_api(object: &Value) -> Option<Self> {
        let api_id = api_id(object)?;

        Some(MirrorProperty {
            api_id,
            title: object
                .get("title")
                .and_then(lang_text)
                .unwrap_or_else(|| "Untitled Property".to_string()),
            description: field_text(object, "description"),
            property_type: MarketSegment::from_type_id(object.get("property_type")),
            unit_type: field_string(object, "unit_type"),
            city: field_text(object, "city"),
            district: field_text(object, "district"),
            low_price: field_f64(object, "low_price"),
            high_price: field_f64(object, "high_price"),
            min_area: field_f64(object, "min_area"),
            max_area: field_f64(object, "max_area"),
            bedrooms: field_string(object, "bedrooms"),
            bathrooms: field_string(object, "bathrooms"),
            rooms: field_string(object, "rooms"),
            cover_image: field_string(object, "cover"),
            property_status: field_string(object, "property_status"),
            sales_status: field_string(object, "sales_status"),
            delivery_year: field_i64(object, "delivery_year"),
            developer: field_text(object, "developer"),
            is_featured: field_bool(object, "is_featured") || field_bool(object, "featured"),
        })
    }
}
