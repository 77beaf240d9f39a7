//! Paginated aggregation of the external catalog into sitemap sections.
//!
//! The API serves 50 properties per page; each sitemap section carries 250
//! URLs, so section N aggregates API pages `5N-4 ..= 5N`. Failed or empty
//! pages are skipped rather than failing the whole section.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::{SectionCache, SitemapUrl};
use crate::db::Database;
use crate::models::api_id;
use crate::services::PropertyService;

/// Properties per upstream API page.
pub const API_PAGE_SIZE: u32 = 50;
/// Property URLs per sitemap section.
pub const SECTION_SIZE: u32 = 250;
/// Sections advertised while the local mirror is empty; sized to the
/// catalog at launch (~1700 properties).
pub const DEFAULT_SECTIONS: u32 = 7;

/// Pause between upstream page fetches.
const PAGE_DELAY_MS: u64 = 200;

/// How many property sections the index should advertise. Derived from the
/// mirror when it has been synced, otherwise the static default.
pub fn section_count(db: &Database) -> u32 {
    match db.count_active_properties() {
        Ok(count) if count > 0 => ((count as u32).div_ceil(SECTION_SIZE)).max(1),
        _ => DEFAULT_SECTIONS,
    }
}

/// lastmod from an API object's `updated_at`/`modified_at`, when parseable.
fn parse_lastmod(object: &Value) -> Option<DateTime<Utc>> {
    let raw = object
        .get("updated_at")
        .or_else(|| object.get("modified_at"))?
        .as_str()?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Aggregate one sitemap section from the upstream catalog, serving from
/// cache when fresh. Partial results are returned when pages fail; only
/// non-empty sections are cached.
pub async fn property_section_urls(
    service: &PropertyService,
    cache: &SectionCache,
    base: &str,
    section: u32,
) -> Vec<SitemapUrl> {
    let key = format!("properties-{}", section);
    if let Some(urls) = cache.get(&key) {
        log::debug!("Sitemap section {} served from cache ({} urls)", section, urls.len());
        return urls;
    }

    let pages_per_section = SECTION_SIZE / API_PAGE_SIZE;
    let start_page = (section.max(1) - 1) * pages_per_section + 1;
    let end_page = start_page + pages_per_section - 1;

    log::info!(
        "Sitemap section {}: fetching API pages {}-{}",
        section,
        start_page,
        end_page
    );

    let filters = Map::new();
    let mut urls = Vec::new();

    for page in start_page..=end_page {
        if service.catalog_in_backoff() {
            log::warn!(
                "Sitemap section {}: upstream in backoff, skipping page {}",
                section,
                page
            );
            continue;
        }

        match service.fetch_page(&filters, Some(page)).await {
            Ok(data) => {
                if data.results.is_empty() {
                    // Past the end of the catalog
                    break;
                }
                for object in &data.results {
                    let Some(id) = api_id(object) else { continue };
                    if object.get("title").is_none() {
                        continue;
                    }
                    urls.push(SitemapUrl {
                        loc: format!("{}/property/{}/", base, id),
                        lastmod: parse_lastmod(object),
                        changefreq: "daily",
                        priority: "0.9",
                    });
                }
            }
            Err(err) => {
                log::error!("Sitemap section {}: page {} failed: {}", section, page, err);
                continue;
            }
        }

        if page < end_page {
            tokio::time::sleep(Duration::from_millis(PAGE_DELAY_MS)).await;
        }
    }

    log::info!("Sitemap section {}: {} urls", section, urls.len());
    if !urls.is_empty() {
        cache.set(key, urls.clone());
    }
    urls
}

/// Populate the cache for every property section. Run in the background at
/// startup when `WARM_SITEMAPS_ON_START` is set.
pub async fn warm_sitemap_cache(
    service: &PropertyService,
    cache: &SectionCache,
    db: &Database,
    base: &str,
) {
    let sections = section_count(db);
    log::info!("Warming sitemap cache: {} property sections", sections);

    for section in 1..=sections {
        let urls = property_section_urls(service, cache, base, section).await;
        log::info!(
            "Warmed sitemap section {}/{}: {} urls",
            section,
            sections,
            urls.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MirrorProperty;
    use serde_json::json;

    #[test]
    fn lastmod_parses_rfc3339_with_z_suffix() {
        let parsed = parse_lastmod(&json!({"updated_at": "2026-03-01T08:30:00Z"})).unwrap();
        assert_eq!(parsed.format("%Y-%m-%d").to_string(), "2026-03-01");

        let fallback = parse_lastmod(&json!({"modified_at": "2025-12-31T23:59:59+04:00"}));
        assert!(fallback.is_some());

        assert!(parse_lastmod(&json!({"updated_at": "yesterday"})).is_none());
        assert!(parse_lastmod(&json!({})).is_none());
    }

    #[test]
    fn section_count_defaults_until_the_mirror_is_synced() {
        let db = Database::new(":memory:").unwrap();
        assert_eq!(section_count(&db), DEFAULT_SECTIONS);

        for id in 0..3 {
            let mirror = MirrorProperty::from_api(&json!({
                "id": id,
                "title": {"en": format!("Property {}", id)},
            }))
            .unwrap();
            db.upsert_synced_property(&mirror).unwrap();
        }
        assert_eq!(section_count(&db), 1);
    }
}
