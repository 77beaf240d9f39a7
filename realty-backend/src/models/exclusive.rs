use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::text::format_thousands;

/// Unit kinds an exclusive property can be listed as.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    #[default]
    Apartment,
    Villa,
    Townhouse,
    Penthouse,
    Studio,
    Duplex,
}

impl PropertyKind {
    pub const ALL: [PropertyKind; 6] = [
        PropertyKind::Apartment,
        PropertyKind::Villa,
        PropertyKind::Townhouse,
        PropertyKind::Penthouse,
        PropertyKind::Studio,
        PropertyKind::Duplex,
    ];

    /// Kinds shown under the commercial tab; studios stay residential-only.
    pub const COMMERCIAL: [PropertyKind; 5] = [
        PropertyKind::Apartment,
        PropertyKind::Villa,
        PropertyKind::Townhouse,
        PropertyKind::Penthouse,
        PropertyKind::Duplex,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyKind::Apartment => "apartment",
            PropertyKind::Villa => "villa",
            PropertyKind::Townhouse => "townhouse",
            PropertyKind::Penthouse => "penthouse",
            PropertyKind::Studio => "studio",
            PropertyKind::Duplex => "duplex",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PropertyKind::Apartment => "Apartment",
            PropertyKind::Villa => "Villa",
            PropertyKind::Townhouse => "Townhouse",
            PropertyKind::Penthouse => "Penthouse",
            PropertyKind::Studio => "Studio",
            PropertyKind::Duplex => "Duplex",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == value)
    }
}

/// Sales status of an exclusive property. Only `Available` and `UnderOffer`
/// listings are publicly visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyStatus {
    #[default]
    Available,
    Reserved,
    Sold,
    UnderOffer,
    OffMarket,
}

impl PropertyStatus {
    pub const VISIBLE: [PropertyStatus; 2] =
        [PropertyStatus::Available, PropertyStatus::UnderOffer];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyStatus::Available => "available",
            PropertyStatus::Reserved => "reserved",
            PropertyStatus::Sold => "sold",
            PropertyStatus::UnderOffer => "under_offer",
            PropertyStatus::OffMarket => "off_market",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PropertyStatus::Available => "Available",
            PropertyStatus::Reserved => "Reserved",
            PropertyStatus::Sold => "Sold",
            PropertyStatus::UnderOffer => "Under Offer",
            PropertyStatus::OffMarket => "Off Market",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        [
            PropertyStatus::Available,
            PropertyStatus::Reserved,
            PropertyStatus::Sold,
            PropertyStatus::UnderOffer,
            PropertyStatus::OffMarket,
        ]
        .iter()
        .copied()
        .find(|s| s.as_str() == value)
    }
}

/// A locally-managed listing, as opposed to the API-sourced catalog.
#[derive(Debug, Clone, Serialize)]
pub struct ExclusiveProperty {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub property_type: PropertyKind,
    pub city: String,
    pub district: String,
    pub neighborhood: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub bedrooms: i64,
    pub bathrooms: f64,
    pub area_sqft: i64,
    pub plot_size: Option<i64>,
    pub price: f64,
    pub price_per_sqft: Option<f64>,
    pub service_charge: Option<f64>,
    pub description: String,
    pub short_description: String,
    pub key_features: Vec<String>,
    pub nearby_amenities: Vec<String>,
    pub cover_image: String,
    pub video_url: String,
    pub virtual_tour_url: String,
    pub floor_plan: String,
    pub status: PropertyStatus,
    pub priority: i64,
    pub is_featured: bool,
    pub is_exclusive: bool,
    pub contact_phone: String,
    pub contact_email: String,
    pub developer_name: String,
    pub completion_year: Option<i64>,
    pub meta_title: String,
    pub meta_description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
    pub view_count: i64,
    pub inquiry_count: i64,
}

impl ExclusiveProperty {
    pub fn formatted_price(&self) -> String {
        format!("AED {}", format_thousands(self.price))
    }

    pub fn bedroom_display(&self) -> String {
        if self.bedrooms == 0 {
            "Studio".to_string()
        } else {
            format!("{} BR", self.bedrooms)
        }
    }

    pub fn url(&self) -> String {
        format!("/exclusive-properties/{}/", self.slug)
    }

    /// Card-sized JSON used by the listing endpoints.
    pub fn summary_json(&self) -> serde_json::Value {
        json!({
            "id": self.id,
            "title": self.title,
            "slug": self.slug,
            "property_type": self.property_type.label(),
            "city": self.city,
            "district": self.district,
            "neighborhood": self.neighborhood,
            "bedrooms": self.bedrooms,
            "bedroom_display": self.bedroom_display(),
            "bathrooms": self.bathrooms,
            "area_sqft": self.area_sqft,
            "price": self.price,
            "formatted_price": self.formatted_price(),
            "cover_image": self.cover_image,
            "short_description": self.short_description,
            "status": self.status.label(),
            "developer_name": self.developer_name,
            "completion_year": self.completion_year,
            "url": self.url(),
        })
    }
}

/// Insert payload for an exclusive property. Slug and price-per-sqft are
/// derived on insert.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewExclusiveProperty {
    pub title: String,
    pub property_type: PropertyKind,
    pub city: Option<String>,
    pub district: String,
    pub neighborhood: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub bedrooms: i64,
    pub bathrooms: f64,
    pub area_sqft: i64,
    pub plot_size: Option<i64>,
    pub price: f64,
    pub service_charge: Option<f64>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub key_features: Vec<String>,
    pub nearby_amenities: Vec<String>,
    pub cover_image: Option<String>,
    pub video_url: Option<String>,
    pub virtual_tour_url: Option<String>,
    pub floor_plan: Option<String>,
    pub status: Option<PropertyStatus>,
    pub priority: Option<i64>,
    pub is_featured: bool,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub developer_name: Option<String>,
    pub completion_year: Option<i64>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

/// Gallery image attached to an exclusive property.
#[derive(Debug, Clone, Serialize)]
pub struct PropertyImage {
    pub id: i64,
    pub property_id: String,
    pub image: String,
    pub title: String,
    pub description: String,
    pub sort_order: i64,
    pub is_cover: bool,
}

/// An amenity that can be linked to any number of properties.
#[derive(Debug, Clone, Serialize)]
pub struct PropertyAmenity {
    pub id: i64,
    pub name: String,
    pub icon: String,
    pub category: String,
}

/// Filter parameters accepted by the exclusive listing endpoints, both as
/// query string and as a JSON body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExclusiveFilters {
    pub property_type: Option<String>,
    pub unit_type: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub price_range: Option<String>,
    pub bedrooms: Option<String>,
    #[serde(default, deserialize_with = "super::lenient_i64")]
    pub delivery_year: Option<i64>,
    pub developer: Option<String>,
    pub project_name: Option<String>,
    pub property_status: Option<String>,
    #[serde(default, deserialize_with = "super::lenient_f64")]
    pub min_price: Option<f64>,
    #[serde(default, deserialize_with = "super::lenient_f64")]
    pub max_price: Option<f64>,
    #[serde(default, deserialize_with = "super::lenient_f64")]
    pub min_area: Option<f64>,
    #[serde(default, deserialize_with = "super::lenient_f64")]
    pub max_area: Option<f64>,
    #[serde(default, deserialize_with = "super::lenient_u32")]
    pub page: Option<u32>,
}

/// Distinct values available to populate the filter form.
#[derive(Debug, Clone, Serialize)]
pub struct FilterOptions {
    pub property_types: Vec<&'static str>,
    pub cities: Vec<String>,
    pub districts: Vec<String>,
    pub developers: Vec<String>,
    pub completion_years: Vec<i64>,
}

/// Parse a preset price band: `"500000-1000000"` or `"5000000+"`.
pub fn parse_price_range(range: &str) -> Option<(f64, Option<f64>)> {
    let range = range.trim();
    if let Some(min) = range.strip_suffix('+') {
        return min.parse().ok().map(|m| (m, None));
    }
    let (min, max) = range.split_once('-')?;
    Some((min.parse().ok()?, Some(max.parse().ok()?)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips() {
        for kind in PropertyKind::ALL {
            assert_eq!(PropertyKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(PropertyKind::parse("warehouse"), None);
    }

    #[test]
    fn status_round_trips() {
        assert_eq!(
            PropertyStatus::parse("under_offer"),
            Some(PropertyStatus::UnderOffer)
        );
        assert_eq!(PropertyStatus::parse("unknown"), None);
    }

    #[test]
    fn price_range_bands() {
        assert_eq!(
            parse_price_range("500000-1000000"),
            Some((500_000.0, Some(1_000_000.0)))
        );
        assert_eq!(parse_price_range("5000000+"), Some((5_000_000.0, None)));
        assert_eq!(parse_price_range("luxury"), None);
    }

    #[test]
    fn bedroom_display_handles_studios() {
        let mut property = sample_property();
        assert_eq!(property.bedroom_display(), "2 BR");
        property.bedrooms = 0;
        assert_eq!(property.bedroom_display(), "Studio");
    }

    #[test]
    fn formatted_price_uses_separators() {
        assert_eq!(sample_property().formatted_price(), "AED 2,450,000");
    }

    fn sample_property() -> ExclusiveProperty {
        ExclusiveProperty {
            id: "test".to_string(),
            title: "Marina Vista".to_string(),
            slug: "marina-vista-dubai-marina".to_string(),
            property_type: PropertyKind::Apartment,
            city: "Dubai".to_string(),
            district: "Dubai Marina".to_string(),
            neighborhood: String::new(),
            address: String::new(),
            latitude: None,
            longitude: None,
            bedrooms: 2,
            bathrooms: 2.5,
            area_sqft: 1400,
            plot_size: None,
            price: 2_450_000.0,
            price_per_sqft: Some(1750.0),
            service_charge: None,
            description: String::new(),
            short_description: String::new(),
            key_features: Vec::new(),
            nearby_amenities: Vec::new(),
            cover_image: String::new(),
            video_url: String::new(),
            virtual_tour_url: String::new(),
            floor_plan: String::new(),
            status: PropertyStatus::Available,
            priority: 1,
            is_featured: false,
            is_exclusive: true,
            contact_phone: String::new(),
            contact_email: String::new(),
            developer_name: String::new(),
            completion_year: None,
            meta_title: String::new(),
            meta_description: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            published_at: None,
            view_count: 0,
            inquiry_count: 0,
        }
    }
}
