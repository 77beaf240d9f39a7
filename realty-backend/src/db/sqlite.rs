//! SQLite database - schema definitions and connection management
//!
//! This file contains:
//! - Database struct definition
//! - Connection management (new, init)
//! - Schema creation and migrations
//!
//! All database operations are in the tables/ subdirectory.

use rusqlite::{Connection, Result as SqliteResult};
use std::path::Path;
use std::sync::Mutex;

/// Main database wrapper with connection pooling via Mutex
pub struct Database {
    pub(crate) conn: Mutex<Connection>,
}

impl Database {
    /// Create a new database connection and initialize schema
    pub fn new(database_url: &str) -> SqliteResult<Self> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = Path::new(database_url).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).ok();
            }
        }

        let conn = Connection::open(database_url)?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init()?;
        Ok(db)
    }

    /// Initialize all database tables and run migrations
    fn init(&self) -> SqliteResult<()> {
        let conn = self.conn.lock().unwrap();

        // Exclusive properties - locally managed listings
        conn.execute(
            "CREATE TABLE IF NOT EXISTS exclusive_properties (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                slug TEXT UNIQUE NOT NULL,
                property_type TEXT NOT NULL,
                city TEXT NOT NULL DEFAULT 'Dubai',
                district TEXT NOT NULL,
                neighborhood TEXT NOT NULL DEFAULT '',
                address TEXT NOT NULL DEFAULT '',
                latitude REAL,
                longitude REAL,
                bedrooms INTEGER NOT NULL DEFAULT 0,
                bathrooms REAL NOT NULL DEFAULT 1,
                area_sqft INTEGER NOT NULL DEFAULT 0,
                plot_size INTEGER,
                price REAL NOT NULL DEFAULT 0,
                price_per_sqft REAL,
                service_charge REAL,
                description TEXT NOT NULL DEFAULT '',
                short_description TEXT NOT NULL DEFAULT '',
                key_features TEXT NOT NULL DEFAULT '[]',
                nearby_amenities TEXT NOT NULL DEFAULT '[]',
                cover_image TEXT NOT NULL DEFAULT '',
                video_url TEXT NOT NULL DEFAULT '',
                virtual_tour_url TEXT NOT NULL DEFAULT '',
                floor_plan TEXT NOT NULL DEFAULT '',
                status TEXT NOT NULL DEFAULT 'available',
                priority INTEGER NOT NULL DEFAULT 1,
                is_featured INTEGER NOT NULL DEFAULT 0,
                is_exclusive INTEGER NOT NULL DEFAULT 1,
                contact_phone TEXT NOT NULL DEFAULT '',
                contact_email TEXT NOT NULL DEFAULT '',
                developer_name TEXT NOT NULL DEFAULT '',
                completion_year INTEGER,
                meta_title TEXT NOT NULL DEFAULT '',
                meta_description TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                published_at TEXT,
                view_count INTEGER NOT NULL DEFAULT 0,
                inquiry_count INTEGER NOT NULL DEFAULT 0
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_exclusive_visibility
             ON exclusive_properties(is_exclusive, status)",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_exclusive_district
             ON exclusive_properties(district)",
            [],
        )?;

        // Gallery images for exclusive properties
        conn.execute(
            "CREATE TABLE IF NOT EXISTS exclusive_property_images (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                property_id TEXT NOT NULL,
                image TEXT NOT NULL,
                title TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL DEFAULT '',
                sort_order INTEGER NOT NULL DEFAULT 0,
                is_cover INTEGER NOT NULL DEFAULT 0,
                FOREIGN KEY (property_id) REFERENCES exclusive_properties(id) ON DELETE CASCADE
            )",
            [],
        )?;

        // Amenity catalog and property links
        conn.execute(
            "CREATE TABLE IF NOT EXISTS property_amenities (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT UNIQUE NOT NULL,
                icon TEXT NOT NULL DEFAULT '',
                category TEXT NOT NULL DEFAULT ''
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS exclusive_property_amenity_links (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                property_id TEXT NOT NULL,
                amenity_id INTEGER NOT NULL,
                FOREIGN KEY (property_id) REFERENCES exclusive_properties(id) ON DELETE CASCADE,
                FOREIGN KEY (amenity_id) REFERENCES property_amenities(id) ON DELETE CASCADE,
                UNIQUE(property_id, amenity_id)
            )",
            [],
        )?;

        // Inquiries submitted against exclusive properties
        conn.execute(
            "CREATE TABLE IF NOT EXISTS property_inquiries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                property_id TEXT NOT NULL,
                inquiry_type TEXT NOT NULL DEFAULT 'info',
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                phone TEXT NOT NULL DEFAULT '',
                message TEXT NOT NULL DEFAULT '',
                preferred_contact_method TEXT NOT NULL DEFAULT 'email',
                budget_min REAL,
                budget_max REAL,
                is_responded INTEGER NOT NULL DEFAULT 0,
                responded_at TEXT,
                created_at TEXT NOT NULL,
                FOREIGN KEY (property_id) REFERENCES exclusive_properties(id) ON DELETE CASCADE
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_inquiries_property
             ON property_inquiries(property_id, created_at DESC)",
            [],
        )?;

        // Blog taxonomy
        conn.execute(
            "CREATE TABLE IF NOT EXISTS blog_categories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                slug TEXT UNIQUE NOT NULL,
                description TEXT NOT NULL DEFAULT ''
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS blog_tags (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                slug TEXT UNIQUE NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS blog_posts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                slug TEXT UNIQUE NOT NULL,
                excerpt TEXT NOT NULL DEFAULT '',
                content TEXT NOT NULL,
                category_id INTEGER,
                author TEXT NOT NULL DEFAULT '',
                cover_image TEXT NOT NULL DEFAULT '',
                status TEXT NOT NULL DEFAULT 'draft',
                is_featured INTEGER NOT NULL DEFAULT 0,
                view_count INTEGER NOT NULL DEFAULT 0,
                meta_title TEXT NOT NULL DEFAULT '',
                meta_description TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                published_at TEXT,
                FOREIGN KEY (category_id) REFERENCES blog_categories(id) ON DELETE SET NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_blog_posts_status
             ON blog_posts(status, published_at DESC)",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS blog_post_tags (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                post_id INTEGER NOT NULL,
                tag_id INTEGER NOT NULL,
                FOREIGN KEY (post_id) REFERENCES blog_posts(id) ON DELETE CASCADE,
                FOREIGN KEY (tag_id) REFERENCES blog_tags(id) ON DELETE CASCADE,
                UNIQUE(post_id, tag_id)
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS blog_comments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                post_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                website TEXT NOT NULL DEFAULT '',
                content TEXT NOT NULL,
                is_approved INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                FOREIGN KEY (post_id) REFERENCES blog_posts(id) ON DELETE CASCADE
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_comments_post
             ON blog_comments(post_id, is_approved, created_at DESC)",
            [],
        )?;

        // Newsletter and lead capture
        conn.execute(
            "CREATE TABLE IF NOT EXISTS newsletter_subscribers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT UNIQUE NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 1,
                subscribed_at TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS contact_messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                phone TEXT NOT NULL,
                subject TEXT NOT NULL,
                message TEXT NOT NULL,
                is_read INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS contact_leads (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                email TEXT NOT NULL,
                phone TEXT NOT NULL,
                investment_budget TEXT NOT NULL DEFAULT '',
                investment_type TEXT NOT NULL DEFAULT '',
                preferred_location TEXT NOT NULL DEFAULT '',
                timeline TEXT NOT NULL DEFAULT '',
                message TEXT NOT NULL DEFAULT '',
                property_interests TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        // Local mirror of the external catalog, maintained by sync_properties
        conn.execute(
            "CREATE TABLE IF NOT EXISTS properties (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                api_id INTEGER UNIQUE NOT NULL,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                property_type TEXT NOT NULL DEFAULT 'residential',
                unit_type TEXT NOT NULL DEFAULT '',
                city TEXT NOT NULL DEFAULT '',
                district TEXT NOT NULL DEFAULT '',
                low_price REAL,
                high_price REAL,
                min_area REAL,
                max_area REAL,
                bedrooms TEXT NOT NULL DEFAULT '',
                bathrooms TEXT NOT NULL DEFAULT '',
                rooms TEXT NOT NULL DEFAULT '',
                cover_image TEXT NOT NULL DEFAULT '',
                property_status TEXT NOT NULL DEFAULT '',
                sales_status TEXT NOT NULL DEFAULT '',
                delivery_year INTEGER,
                developer TEXT NOT NULL DEFAULT '',
                is_featured INTEGER NOT NULL DEFAULT 0,
                is_active INTEGER NOT NULL DEFAULT 1,
                synced_at TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_properties_active
             ON properties(is_active, api_id)",
            [],
        )?;

        // Migration: SEO columns on exclusive_properties (for old DBs)
        let _ = conn.execute(
            "ALTER TABLE exclusive_properties ADD COLUMN meta_title TEXT NOT NULL DEFAULT ''",
            [],
        );
        let _ = conn.execute(
            "ALTER TABLE exclusive_properties ADD COLUMN meta_description TEXT NOT NULL DEFAULT ''",
            [],
        );

        // Migration: sales_status column on the mirror (for old DBs)
        let _ = conn.execute(
            "ALTER TABLE properties ADD COLUMN sales_status TEXT NOT NULL DEFAULT ''",
            [],
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        let db = Database::new(":memory:").unwrap();
        db.init().unwrap();
        db.init().unwrap();
    }

    #[test]
    fn creates_parent_directories_for_file_databases() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/realty.db");
        let db = Database::new(path.to_str().unwrap()).unwrap();
        drop(db);
        assert!(path.exists());
    }
}
