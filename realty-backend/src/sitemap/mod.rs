//! XML sitemap generation.
//!
//! Local content (static routes, blog posts, exclusive properties) renders
//! straight from the database. The external catalog is far too large for one
//! document, so it is split into sections of 250 URLs, each aggregated from
//! five upstream pages and cached in-process.

mod cache;
mod sections;

pub use cache::SectionCache;
pub use sections::{
    property_section_urls, section_count, warm_sitemap_cache, API_PAGE_SIZE, DEFAULT_SECTIONS,
    SECTION_SIZE,
};

use chrono::{DateTime, Utc};
use rusqlite::Result as SqliteResult;

use crate::db::Database;

#[derive(Debug, Clone, PartialEq)]
pub struct SitemapUrl {
    pub loc: String,
    pub lastmod: Option<DateTime<Utc>>,
    pub changefreq: &'static str,
    pub priority: &'static str,
}

/// Marketing and legal routes served by the frontend.
const STATIC_ROUTES: [&str; 19] = [
    "/",
    "/properties/",
    "/exclusive-properties/",
    "/about/",
    "/contact/",
    "/blog/",
    "/retail/",
    "/second-homes/",
    "/commercial/",
    "/luxury/",
    "/beach/",
    "/offplan/",
    "/labour/",
    "/warehouse/",
    "/plots/",
    "/mansions/",
    "/privacy-policy/",
    "/terms/",
    "/rera/",
];

fn xml_escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Render a `<urlset>` document.
pub fn render_urlset(urls: &[SitemapUrl]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    for url in urls {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", xml_escape(&url.loc)));
        if let Some(lastmod) = url.lastmod {
            xml.push_str(&format!(
                "    <lastmod>{}</lastmod>\n",
                lastmod.format("%Y-%m-%d")
            ));
        }
        xml.push_str(&format!(
            "    <changefreq>{}</changefreq>\n",
            url.changefreq
        ));
        xml.push_str(&format!("    <priority>{}</priority>\n", url.priority));
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

/// Render the `<sitemapindex>` document pointing at the section sitemaps.
pub fn render_index(locations: &[String]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <sitemapindex xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    for loc in locations {
        xml.push_str("  <sitemap>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", xml_escape(loc)));
        xml.push_str("  </sitemap>\n");
    }

    xml.push_str("</sitemapindex>\n");
    xml
}

pub fn static_urls(base: &str) -> Vec<SitemapUrl> {
    STATIC_ROUTES
        .iter()
        .map(|route| SitemapUrl {
            loc: format!("{}{}", base, route),
            lastmod: None,
            changefreq: "monthly",
            priority: "0.6",
        })
        .collect()
}

pub fn blog_urls(db: &Database, base: &str) -> SqliteResult<Vec<SitemapUrl>> {
    let urls = db
        .list_published_slugs()?
        .into_iter()
        .map(|(slug, updated_at)| SitemapUrl {
            loc: format!("{}/blog/{}/", base, slug),
            lastmod: Some(updated_at),
            changefreq: "weekly",
            priority: "0.8",
        })
        .collect();
    Ok(urls)
}

pub fn exclusive_urls(db: &Database, base: &str) -> SqliteResult<Vec<SitemapUrl>> {
    let urls = db
        .list_exclusive_slugs()?
        .into_iter()
        .map(|(slug, updated_at)| SitemapUrl {
            loc: format!("{}/exclusive-properties/{}/", base, slug),
            lastmod: Some(updated_at),
            changefreq: "daily",
            priority: "0.9",
        })
        .collect();
    Ok(urls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewBlogPost, NewExclusiveProperty, PostStatus, PropertyKind};

    #[test]
    fn urlset_escapes_and_formats() {
        let urls = vec![SitemapUrl {
            loc: "https://example.com/property/1/?a=1&b=2".to_string(),
            lastmod: Some("2026-04-02T10:00:00Z".parse().unwrap()),
            changefreq: "daily",
            priority: "0.9",
        }];

        let xml = render_urlset(&urls);
        assert!(xml.starts_with("<?xml version=\"1.0\""));
        assert!(xml.contains("<loc>https://example.com/property/1/?a=1&amp;b=2</loc>"));
        assert!(xml.contains("<lastmod>2026-04-02</lastmod>"));
        assert!(xml.contains("<changefreq>daily</changefreq>"));
        assert!(xml.contains("<priority>0.9</priority>"));
    }

    #[test]
    fn index_lists_every_section() {
        let xml = render_index(&[
            "https://example.com/sitemap-static.xml".to_string(),
            "https://example.com/sitemap-properties-1.xml".to_string(),
        ]);
        assert!(xml.contains("<sitemapindex"));
        assert_eq!(xml.matches("<sitemap>").count(), 2);
        assert!(xml.contains("sitemap-properties-1.xml"));
    }

    #[test]
    fn static_urls_cover_the_landing_pages() {
        let urls = static_urls("https://example.com");
        assert!(urls.iter().any(|u| u.loc == "https://example.com/"));
        assert!(urls.iter().any(|u| u.loc == "https://example.com/mansions/"));
        assert!(urls.iter().all(|u| u.changefreq == "monthly"));
    }

    #[test]
    fn blog_and_exclusive_urls_come_from_the_db() {
        let db = Database::new(":memory:").unwrap();
        db.insert_blog_post(&NewBlogPost {
            title: "Sitemapped".to_string(),
            content: "...".to_string(),
            status: Some(PostStatus::Published),
            ..Default::default()
        })
        .unwrap();
        db.insert_exclusive_property(&NewExclusiveProperty {
            title: "Crawl Me".to_string(),
            district: "JVC".to_string(),
            property_type: PropertyKind::Villa,
            bedrooms: 3,
            bathrooms: 3.0,
            area_sqft: 2000,
            price: 3_000_000.0,
            ..Default::default()
        })
        .unwrap();

        let blog = blog_urls(&db, "https://example.com").unwrap();
        assert_eq!(blog.len(), 1);
        assert_eq!(blog[0].loc, "https://example.com/blog/sitemapped/");
        assert!(blog[0].lastmod.is_some());

        let exclusive = exclusive_urls(&db, "https://example.com").unwrap();
        assert_eq!(exclusive.len(), 1);
        assert_eq!(
            exclusive[0].loc,
            "https://example.com/exclusive-properties/crawl-me-jvc/"
        );
    }
}
