use std::env;

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub properties_api_url: String,
    pub property_detail_api_url: String,
    pub cities_api_url: String,
    pub developers_api_url: String,
    pub api_timeout_secs: u64,
    pub site_base_url: String,
    pub sitemap_cache_ttl_secs: u64,
    pub warm_sitemaps_on_start: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let properties_api_url =
            env::var("PROPERTIES_API_URL").expect("PROPERTIES_API_URL must be set");
        let property_detail_api_url = env::var("PROPERTY_DETAIL_API_URL")
            .unwrap_or_else(|_| detail_base_from(&properties_api_url));

        Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "./.db/realty.db".to_string()),
            cities_api_url: env::var("CITIES_API_URL").expect("CITIES_API_URL must be set"),
            developers_api_url: env::var("DEVELOPERS_API_URL")
                .expect("DEVELOPERS_API_URL must be set"),
            api_timeout_secs: parse_env_or("API_TIMEOUT_SECS", 30),
            site_base_url: env::var("SITE_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string())
                .trim_end_matches('/')
                .to_string(),
            sitemap_cache_ttl_secs: parse_env_or("SITEMAP_CACHE_TTL_SECS", 3600),
            warm_sitemaps_on_start: env_flag("WARM_SITEMAPS_ON_START"),
            properties_api_url,
            property_detail_api_url,
        }
    }
}

/// The detail endpoint is the filter endpoint minus its trailing `/filter`
/// segment; individual properties are fetched as `{base}/{id}`.
fn detail_base_from(filter_url: &str) -> String {
    let trimmed = filter_url.trim_end_matches('/');
    trimmed
        .strip_suffix("/filter")
        .unwrap_or(trimmed)
        .to_string()
}

fn parse_env_or(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_flag(key: &str) -> bool {
    env::var(key)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_base_strips_filter_segment() {
        assert_eq!(
            detail_base_from("https://example.com/api/properties/filter/"),
            "https://example.com/api/properties"
        );
        assert_eq!(
            detail_base_from("https://example.com/api/properties/filter"),
            "https://example.com/api/properties"
        );
    }

    #[test]
    fn detail_base_keeps_plain_urls() {
        assert_eq!(
            detail_base_from("https://example.com/api/property/"),
            "https://example.com/api/property"
        );
    }
}
