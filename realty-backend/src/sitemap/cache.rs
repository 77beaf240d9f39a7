//! In-process TTL cache for aggregated sitemap sections.
//!
//! Building one property section costs five upstream requests; crawlers hit
//! the sitemap endpoints far more often than the catalog changes.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use super::SitemapUrl;

struct CacheEntry {
    urls: Vec<SitemapUrl>,
    expires_at: Instant,
}

pub struct SectionCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl SectionCache {
    pub fn new(ttl_secs: u64) -> Self {
        SectionCache {
            entries: RwLock::new(HashMap::new()),
            ttl: Duration::from_secs(ttl_secs),
        }
    }

    pub fn get(&self, key: &str) -> Option<Vec<SitemapUrl>> {
        let entries = self.entries.read().ok()?;
        if let Some(entry) = entries.get(key) {
            if entry.expires_at > Instant::now() {
                return Some(entry.urls.clone());
            }
        }
        None
    }

    pub fn set(&self, key: String, urls: Vec<SitemapUrl>) {
        if let Ok(mut entries) = self.entries.write() {
            // Clean expired entries occasionally
            if entries.len() > 32 {
                let now = Instant::now();
                entries.retain(|_, v| v.expires_at > now);
            }
            entries.insert(
                key,
                CacheEntry {
                    urls,
                    expires_at: Instant::now() + self.ttl,
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(loc: &str) -> SitemapUrl {
        SitemapUrl {
            loc: loc.to_string(),
            lastmod: None,
            changefreq: "daily",
            priority: "0.9",
        }
    }

    #[test]
    fn entries_live_until_the_ttl() {
        let cache = SectionCache::new(3600);
        assert!(cache.get("properties-1").is_none());

        cache.set("properties-1".to_string(), vec![url("/property/1/")]);
        let hit = cache.get("properties-1").unwrap();
        assert_eq!(hit.len(), 1);
        assert_eq!(hit[0].loc, "/property/1/");
    }

    #[test]
    fn zero_ttl_expires_immediately() {
        let cache = SectionCache::new(0);
        cache.set("properties-1".to_string(), vec![url("/property/1/")]);
        assert!(cache.get("properties-1").is_none());
    }
}
