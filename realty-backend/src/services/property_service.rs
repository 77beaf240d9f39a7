//! Thin client for the external property listings API.
//!
//! The upstream filter endpoint takes a POST with a JSON body of filter
//! fields and a `page` query parameter, and answers with an envelope of
//! `{status: bool, data: {results, count, current_page, last_page,
//! next_page_url, previous_page_url}}`. Detail objects live under
//! `{detail_base}/{id}`.

use std::time::Duration;

use serde::Deserialize;
use serde_json::{Map, Value};
use url::Url;

use super::http_retry::BackoffTracker;
use crate::config::Config;

/// Filter keys forwarded to the upstream filter endpoint; anything else a
/// client submits is dropped.
const ALLOWED_FILTER_KEYS: [&str; 14] = [
    "city",
    "district",
    "property_type",
    "unit_type",
    "rooms",
    "delivery_year",
    "min_price",
    "max_price",
    "min_area",
    "max_area",
    "property_status",
    "sales_status",
    "title",
    "developer",
];

/// Detail objects render galleries and unit tables; guarantee the list
/// fields exist so consumers never branch on missing keys.
const DETAIL_LIST_FIELDS: [&str; 5] = [
    "property_images",
    "facilities",
    "grouped_apartments",
    "payment_plans",
    "property_units",
];

/// One page of the upstream catalog.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageData {
    #[serde(default)]
    pub results: Vec<Value>,
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub last_page: Option<u32>,
    #[serde(default)]
    pub next_page_url: Option<String>,
    #[serde(default)]
    pub previous_page_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PageEnvelope {
    #[serde(default)]
    status: bool,
    #[serde(default)]
    data: Option<PageData>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailEnvelope {
    #[serde(default)]
    status: bool,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

pub struct PropertyService {
    client: reqwest::Client,
    properties_url: String,
    detail_base: String,
    cities_url: String,
    developers_url: String,
    backoff: BackoffTracker,
}

impl PropertyService {
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        PropertyService {
            client,
            properties_url: config.properties_api_url.clone(),
            detail_base: config.property_detail_api_url.trim_end_matches('/').to_string(),
            cities_url: config.cities_api_url.clone(),
            developers_url: config.developers_api_url.clone(),
            backoff: BackoffTracker::new(),
        }
    }

    /// Whether the catalog host is inside a backoff window. Bulk fetchers
    /// check this between pages and skip instead of piling on.
    pub fn catalog_in_backoff(&self) -> bool {
        self.backoff.in_backoff(&host_of(&self.properties_url))
    }

    /// Strip a raw client filter object down to the keys the upstream API
    /// understands, dropping nulls and empty strings. `featured` passes
    /// through for the homepage rail; `page` travels as a query parameter
    /// and is handled separately.
    pub fn build_filter_payload(raw: &Value) -> Map<String, Value> {
        let mut payload = Map::new();
        let Value::Object(map) = raw else {
            return payload;
        };

        for (key, value) in map {
            let allowed = ALLOWED_FILTER_KEYS.contains(&key.as_str()) || key == "featured";
            if !allowed {
                continue;
            }
            match value {
                Value::Null => {}
                Value::String(s) if s.trim().is_empty() => {}
                _ => {
                    payload.insert(key.clone(), value.clone());
                }
            }
        }

        payload
    }

    /// Fetch one page of listings matching `filters`.
    pub async fn fetch_page(
        &self,
        filters: &Map<String, Value>,
        page: Option<u32>,
    ) -> Result<PageData, String> {
        let host = host_of(&self.properties_url);

        let mut request = self.client.post(&self.properties_url).json(filters);
        if let Some(page) = page {
            request = request.query(&[("page", page)]);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                if super::is_retryable_reqwest_error(&err) {
                    self.backoff.record_error(&host);
                }
                log::error!("Listings API request failed: {}", err);
                if err.is_timeout() {
                    return Err("Request timed out. Please try again.".to_string());
                }
                return Err("Unable to fetch properties. Please try again later.".to_string());
            }
        };

        let status = response.status();
        if !status.is_success() {
            if BackoffTracker::is_retryable_status(status.as_u16()) {
                self.backoff.record_error(&host);
            }
            log::error!("Listings API returned HTTP {}", status);
            return Err("Unable to fetch properties. Please try again later.".to_string());
        }

        let envelope: PageEnvelope = response.json().await.map_err(|err| {
            log::error!("Listings API returned invalid JSON: {}", err);
            "Unable to fetch properties. Please try again later.".to_string()
        })?;

        if !envelope.status {
            let message = envelope
                .message
                .unwrap_or_else(|| "The listings service returned an error.".to_string());
            log::warn!("Listings API rejected the request: {}", message);
            return Err(message);
        }

        self.backoff.record_success(&host);
        Ok(envelope.data.unwrap_or_default())
    }

    /// Title search over the catalog.
    pub async fn search(
        &self,
        query: &str,
        extra: &Map<String, Value>,
        page: Option<u32>,
    ) -> Result<PageData, String> {
        let mut filters = extra.clone();
        filters.insert("title".to_string(), Value::String(query.to_string()));
        self.fetch_page(&filters, page).await
    }

    /// Fetch one property's detail object.
    pub async fn fetch_detail(&self, id: i64) -> Result<Value, String> {
        let url = format!("{}/{}", self.detail_base, id);

        let response = self.client.get(&url).send().await.map_err(|err| {
            log::error!("Property detail request failed: {}", err);
            "Failed to retrieve property data.".to_string()
        })?;

        if !response.status().is_success() {
            return Err("Property not found or API error.".to_string());
        }

        let envelope: DetailEnvelope = response.json().await.map_err(|err| {
            log::error!("Property detail returned invalid JSON: {}", err);
            "Failed to retrieve property data.".to_string()
        })?;

        if !envelope.status {
            return Err(envelope
                .message
                .unwrap_or_else(|| "API returned error.".to_string()));
        }

        let mut detail = envelope.data.unwrap_or_else(|| Value::Object(Map::new()));
        ensure_list_fields(&mut detail);
        Ok(detail)
    }

    pub async fn fetch_cities(&self) -> Result<Value, String> {
        self.fetch_passthrough(&self.cities_url, "cities").await
    }

    pub async fn fetch_developers(&self) -> Result<Value, String> {
        self.fetch_passthrough(&self.developers_url, "developers").await
    }

    async fn fetch_passthrough(&self, url: &str, what: &str) -> Result<Value, String> {
        let response = self.client.get(url).send().await.map_err(|err| {
            log::error!("{} API request failed: {}", what, err);
            format!("Unable to fetch {} data.", what)
        })?;

        if !response.status().is_success() {
            log::error!("{} API returned HTTP {}", what, response.status());
            return Err(format!("Unable to fetch {} data.", what));
        }

        response.json().await.map_err(|err| {
            log::error!("{} API returned invalid JSON: {}", what, err);
            format!("Unable to fetch {} data.", what)
        })
    }
}

/// Guarantee the array-valued detail fields exist.
pub(crate) fn ensure_list_fields(detail: &mut Value) {
    if let Value::Object(map) = detail {
        for field in DETAIL_LIST_FIELDS {
            let missing = matches!(map.get(field), None | Some(Value::Null));
            if missing {
                map.insert(field.to_string(), Value::Array(Vec::new()));
            }
        }
    }
}

/// Locate a unit inside a detail object by id, searching grouped apartments
/// first and the flat unit list second. Ids are compared numerically when
/// both sides parse, as strings otherwise.
pub fn find_unit<'a>(detail: &'a Value, unit_id: &str) -> Option<&'a Value> {
    let candidates = ["grouped_apartments", "property_units"]
        .into_iter()
        .filter_map(|field| detail.get(field))
        .filter_map(Value::as_array)
        .flatten();

    for unit in candidates {
        let Some(id) = unit.get("id") else { continue };
        let matches = match (id.as_i64(), unit_id.parse::<i64>().ok()) {
            (Some(a), Some(b)) => a == b,
            _ => match id {
                Value::String(s) => s == unit_id,
                other => other.to_string() == unit_id,
            },
        };
        if matches {
            return Some(unit);
        }
    }

    None
}

fn host_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filter_payload_enforces_the_whitelist() {
        let raw = json!({
            "city": "Dubai",
            "min_price": 500000,
            "title": "creek",
            "featured": true,
            "page": 3,
            "drop_table": "properties",
            "district": "",
            "developer": null,
        });

        let payload = PropertyService::build_filter_payload(&raw);
        assert_eq!(payload.get("city"), Some(&json!("Dubai")));
        assert_eq!(payload.get("min_price"), Some(&json!(500000)));
        assert_eq!(payload.get("featured"), Some(&json!(true)));
        assert!(payload.get("page").is_none());
        assert!(payload.get("drop_table").is_none());
        assert!(payload.get("district").is_none());
        assert!(payload.get("developer").is_none());
    }

    #[test]
    fn page_data_tolerates_missing_fields() {
        let data: PageData = serde_json::from_value(json!({
            "results": [{"id": 1}],
            "count": 120,
            "next_page_url": "https://api.example.com/properties?page=2",
        }))
        .unwrap();

        assert_eq!(data.results.len(), 1);
        assert_eq!(data.count, 120);
        assert_eq!(data.current_page, None);
        assert_eq!(
            data.next_page_url.as_deref(),
            Some("https://api.example.com/properties?page=2")
        );
    }

    #[test]
    fn detail_list_fields_are_backfilled() {
        let mut detail = json!({"id": 7, "facilities": null});
        ensure_list_fields(&mut detail);

        for field in DETAIL_LIST_FIELDS {
            assert!(detail.get(field).unwrap().is_array(), "{} missing", field);
        }
    }

    #[test]
    fn find_unit_checks_both_lists_and_both_id_shapes() {
        let detail = json!({
            "grouped_apartments": [{"id": "101", "label": "1BR"}],
            "property_units": [{"id": 202, "label": "2BR"}],
        });

        assert_eq!(
            find_unit(&detail, "101").unwrap().get("label"),
            Some(&json!("1BR"))
        );
        assert_eq!(
            find_unit(&detail, "202").unwrap().get("label"),
            Some(&json!("2BR"))
        );
        assert!(find_unit(&detail, "999").is_none());
    }

    #[test]
    fn host_extraction_falls_back_to_the_raw_url() {
        assert_eq!(
            host_of("https://api.example.com/properties/filter/"),
            "api.example.com"
        );
        assert_eq!(host_of("not a url"), "not a url");
    }
}
