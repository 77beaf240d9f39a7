//! Exclusive property database operations: inserts, filtered listing,
//! detail lookups, gallery images and amenity links.

use chrono::{Datelike, Utc};
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Result as SqliteResult, Row};
use uuid::Uuid;

use super::super::Database;
use super::{json_list, opt_ts, ts, unique_slug};
use crate::models::{
    parse_price_range, ExclusiveFilters, ExclusiveProperty, FilterOptions, NewExclusiveProperty,
    PropertyAmenity, PropertyImage, PropertyKind, PropertyStatus,
};
use crate::text::slugify;

const COLUMNS: &str = "id, title, slug, property_type, city, district, neighborhood, address,
    latitude, longitude, bedrooms, bathrooms, area_sqft, plot_size, price, price_per_sqft,
    service_charge, description, short_description, key_features, nearby_amenities, cover_image,
    video_url, virtual_tour_url, floor_plan, status, priority, is_featured, is_exclusive,
    contact_phone, contact_email, developer_name, completion_year, meta_title, meta_description,
    created_at, updated_at, published_at, view_count, inquiry_count";

fn row_to_property(row: &Row) -> rusqlite::Result<ExclusiveProperty> {
    let kind: String = row.get(3)?;
    let status: String = row.get(25)?;
    Ok(ExclusiveProperty {
        id: row.get(0)?,
        title: row.get(1)?,
        slug: row.get(2)?,
        property_type: PropertyKind::parse(&kind).unwrap_or_default(),
        city: row.get(4)?,
        district: row.get(5)?,
        neighborhood: row.get(6)?,
        address: row.get(7)?,
        latitude: row.get(8)?,
        longitude: row.get(9)?,
        bedrooms: row.get(10)?,
        bathrooms: row.get(11)?,
        area_sqft: row.get(12)?,
        plot_size: row.get(13)?,
        price: row.get(14)?,
        price_per_sqft: row.get(15)?,
        service_charge: row.get(16)?,
        description: row.get(17)?,
        short_description: row.get(18)?,
        key_features: json_list(row.get(19)?),
        nearby_amenities: json_list(row.get(20)?),
        cover_image: row.get(21)?,
        video_url: row.get(22)?,
        virtual_tour_url: row.get(23)?,
        floor_plan: row.get(24)?,
        status: PropertyStatus::parse(&status).unwrap_or_default(),
        priority: row.get(26)?,
        is_featured: row.get::<_, i64>(27)? != 0,
        is_exclusive: row.get::<_, i64>(28)? != 0,
        contact_phone: row.get(29)?,
        contact_email: row.get(30)?,
        developer_name: row.get(31)?,
        completion_year: row.get(32)?,
        meta_title: row.get(33)?,
        meta_description: row.get(34)?,
        created_at: ts(row.get(35)?),
        updated_at: ts(row.get(36)?),
        published_at: opt_ts(row.get(37)?),
        view_count: row.get(38)?,
        inquiry_count: row.get(39)?,
    })
}

fn like(value: &str) -> SqlValue {
    SqlValue::Text(format!("%{}%", value.trim()))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Compose the WHERE clause for the public exclusive listing from the
/// request filters. Returns the SQL fragment and its bound parameters.
fn build_filter_clause(filters: &ExclusiveFilters) -> (String, Vec<SqlValue>) {
    let mut clauses =
        vec!["is_exclusive = 1".to_string(), "status IN ('available', 'under_offer')".to_string()];
    let mut binds: Vec<SqlValue> = Vec::new();

    let kinds: &[PropertyKind] = match filters.property_type.as_deref() {
        Some("commercial") => &PropertyKind::COMMERCIAL,
        _ => &PropertyKind::ALL,
    };
    let kind_list = kinds
        .iter()
        .map(|k| format!("'{}'", k.as_str()))
        .collect::<Vec<_>>()
        .join(", ");
    clauses.push(format!("property_type IN ({})", kind_list));

    if let Some(unit_type) = non_empty(&filters.unit_type) {
        clauses.push("property_type = ?".to_string());
        binds.push(SqlValue::Text(unit_type.to_string()));
    }

    if let Some(city) = non_empty(&filters.city) {
        clauses.push("city LIKE ?".to_string());
        binds.push(like(city));
    }

    if let Some(district) = non_empty(&filters.district) {
        clauses.push("(district LIKE ? OR neighborhood LIKE ?)".to_string());
        binds.push(like(district));
        binds.push(like(district));
    }

    if let Some(range) = non_empty(&filters.price_range) {
        if let Some((min, max)) = parse_price_range(range) {
            clauses.push("price >= ?".to_string());
            binds.push(SqlValue::Real(min));
            if let Some(max) = max {
                clauses.push("price <= ?".to_string());
                binds.push(SqlValue::Real(max));
            }
        }
    }

    // 0 and 100000000 are the form's "untouched slider" sentinels
    if let Some(min_price) = filters.min_price.filter(|v| *v > 0.0) {
        clauses.push("price >= ?".to_string());
        binds.push(SqlValue::Real(min_price));
    }
    if let Some(max_price) = filters
        .max_price
        .filter(|v| *v > 0.0 && *v != 100_000_000.0)
    {
        clauses.push("price <= ?".to_string());
        binds.push(SqlValue::Real(max_price));
    }

    if let Some(bedrooms) = non_empty(&filters.bedrooms) {
        if bedrooms == "studio" {
            clauses.push("bedrooms = 0".to_string());
        } else if bedrooms == "6+" {
            clauses.push("bedrooms >= 6".to_string());
        } else if let Ok(count) = bedrooms.parse::<i64>() {
            clauses.push("bedrooms = ?".to_string());
            binds.push(SqlValue::Integer(count));
        }
    }

    if let Some(year) = filters.delivery_year {
        clauses.push("completion_year = ?".to_string());
        binds.push(SqlValue::Integer(year));
    }

    if let Some(developer) = non_empty(&filters.developer) {
        clauses.push("developer_name LIKE ?".to_string());
        binds.push(like(developer));
    }

    if let Some(project) = non_empty(&filters.project_name) {
        clauses.push("(title LIKE ? OR developer_name LIKE ?)".to_string());
        binds.push(like(project));
        binds.push(like(project));
    }

    if let Some(status) = non_empty(&filters.property_status) {
        let current_year = Utc::now().year() as i64;
        match status {
            "Ready" => {
                clauses.push("completion_year IS NOT NULL AND completion_year <= ?".to_string());
                binds.push(SqlValue::Integer(current_year));
            }
            "Off Plan" | "Under Construction" => {
                clauses.push("completion_year > ?".to_string());
                binds.push(SqlValue::Integer(current_year));
            }
            _ => {}
        }
    }

    // 0 and 50000 are the area slider sentinels
    if let Some(min_area) = filters.min_area.filter(|v| *v > 0.0) {
        clauses.push("area_sqft >= ?".to_string());
        binds.push(SqlValue::Real(min_area));
    }
    if let Some(max_area) = filters.max_area.filter(|v| *v > 0.0 && *v != 50_000.0) {
        clauses.push("area_sqft <= ?".to_string());
        binds.push(SqlValue::Real(max_area));
    }

    (clauses.join(" AND "), binds)
}

impl Database {
    /// Insert a new exclusive property, deriving slug and price-per-sqft.
    pub fn insert_exclusive_property(
        &self,
        new: &NewExclusiveProperty,
    ) -> SqliteResult<ExclusiveProperty> {
        let conn = self.conn.lock().unwrap();

        let id = Uuid::new_v4().to_string();
        let slug = unique_slug(
            &conn,
            "exclusive_properties",
            &slugify(&format!("{} {}", new.title, new.district)),
        );
        let price_per_sqft = if new.price > 0.0 && new.area_sqft > 0 {
            Some(new.price / new.area_sqft as f64)
        } else {
            None
        };
        let now = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO exclusive_properties (
                id, title, slug, property_type, city, district, neighborhood, address,
                latitude, longitude, bedrooms, bathrooms, area_sqft, plot_size, price,
                price_per_sqft, service_charge, description, short_description, key_features,
                nearby_amenities, cover_image, video_url, virtual_tour_url, floor_plan, status,
                priority, is_featured, contact_phone, contact_email, developer_name,
                completion_year, meta_title, meta_description, created_at, updated_at,
                published_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17,
                ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28, ?29, ?30, ?31, ?32,
                ?33, ?34, ?35, ?35, ?36
            )",
            params![
                id,
                new.title,
                slug,
                new.property_type.as_str(),
                new.city.as_deref().unwrap_or("Dubai"),
                new.district,
                new.neighborhood.as_deref().unwrap_or(""),
                new.address.as_deref().unwrap_or(""),
                new.latitude,
                new.longitude,
                new.bedrooms,
                new.bathrooms,
                new.area_sqft,
                new.plot_size,
                new.price,
                price_per_sqft,
                new.service_charge,
                new.description.as_deref().unwrap_or(""),
                new.short_description.as_deref().unwrap_or(""),
                serde_json::to_string(&new.key_features).unwrap_or_else(|_| "[]".to_string()),
                serde_json::to_string(&new.nearby_amenities).unwrap_or_else(|_| "[]".to_string()),
                new.cover_image.as_deref().unwrap_or(""),
                new.video_url.as_deref().unwrap_or(""),
                new.virtual_tour_url.as_deref().unwrap_or(""),
                new.floor_plan.as_deref().unwrap_or(""),
                new.status.unwrap_or_default().as_str(),
                new.priority.unwrap_or(1),
                new.is_featured as i64,
                new.contact_phone.as_deref().unwrap_or(""),
                new.contact_email.as_deref().unwrap_or(""),
                new.developer_name.as_deref().unwrap_or(""),
                new.completion_year,
                new.meta_title.as_deref().unwrap_or(""),
                new.meta_description.as_deref().unwrap_or(""),
                now,
                new.published_at.map(|dt| dt.to_rfc3339()),
            ],
        )?;
        drop(conn);

        self.get_exclusive_property(&id).map(|opt| opt.unwrap())
    }

    pub fn get_exclusive_property(&self, id: &str) -> SqliteResult<Option<ExclusiveProperty>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM exclusive_properties WHERE id = ?1",
            COLUMNS
        ))?;
        let property = stmt.query_row([id], row_to_property).ok();
        Ok(property)
    }

    /// Look up a visible exclusive property by slug.
    pub fn get_exclusive_property_by_slug(
        &self,
        slug: &str,
    ) -> SqliteResult<Option<ExclusiveProperty>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM exclusive_properties WHERE slug = ?1 AND is_exclusive = 1",
            COLUMNS
        ))?;
        let property = stmt.query_row([slug], row_to_property).ok();
        Ok(property)
    }

    /// Filtered, paginated listing of visible exclusive properties.
    /// Returns the page of results and the total match count.
    pub fn filter_exclusive_properties(
        &self,
        filters: &ExclusiveFilters,
        page: u32,
        per_page: u32,
    ) -> SqliteResult<(Vec<ExclusiveProperty>, i64)> {
        let conn = self.conn.lock().unwrap();
        let (where_sql, binds) = build_filter_clause(filters);

        let total: i64 = conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM exclusive_properties WHERE {}",
                where_sql
            ),
            params_from_iter(binds.iter()),
            |row| row.get(0),
        )?;

        let page = page.max(1);
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM exclusive_properties WHERE {}
             ORDER BY priority DESC, created_at DESC
             LIMIT ?{} OFFSET ?{}",
            COLUMNS,
            where_sql,
            binds.len() + 1,
            binds.len() + 2,
        ))?;

        let mut binds = binds;
        binds.push(SqlValue::Integer(per_page as i64));
        binds.push(SqlValue::Integer(((page - 1) * per_page) as i64));

        let properties = stmt
            .query_map(params_from_iter(binds.iter()), row_to_property)?
            .filter_map(|r| r.ok())
            .collect();

        Ok((properties, total))
    }

    /// Up to `limit` other visible properties in the same district.
    pub fn related_exclusive_properties(
        &self,
        district: &str,
        exclude_id: &str,
        limit: u32,
    ) -> SqliteResult<Vec<ExclusiveProperty>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM exclusive_properties
             WHERE is_exclusive = 1 AND status IN ('available', 'under_offer')
               AND district = ?1 AND id != ?2
             ORDER BY priority DESC, created_at DESC LIMIT ?3",
            COLUMNS
        ))?;

        let properties = stmt
            .query_map(params![district, exclude_id, limit], row_to_property)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(properties)
    }

    pub fn increment_property_views(&self, id: &str) -> SqliteResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE exclusive_properties SET view_count = view_count + 1 WHERE id = ?1",
            [id],
        )?;
        Ok(())
    }

    pub fn increment_property_inquiries(&self, id: &str) -> SqliteResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE exclusive_properties SET inquiry_count = inquiry_count + 1 WHERE id = ?1",
            [id],
        )?;
        Ok(())
    }

    /// Distinct values for the filter form dropdowns.
    pub fn exclusive_filter_options(&self) -> SqliteResult<FilterOptions> {
        let conn = self.conn.lock().unwrap();

        let text_column = |sql: &str| -> SqliteResult<Vec<String>> {
            let mut stmt = conn.prepare(sql)?;
            let values = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .filter_map(|r| r.ok())
                .collect();
            Ok(values)
        };

        let cities = text_column(
            "SELECT DISTINCT city FROM exclusive_properties WHERE city != '' ORDER BY city",
        )?;
        let districts = text_column(
            "SELECT DISTINCT district FROM exclusive_properties WHERE district != '' ORDER BY district",
        )?;
        let developers = text_column(
            "SELECT DISTINCT developer_name FROM exclusive_properties
             WHERE developer_name != '' ORDER BY developer_name",
        )?;

        let mut stmt = conn.prepare(
            "SELECT DISTINCT completion_year FROM exclusive_properties
             WHERE completion_year IS NOT NULL ORDER BY completion_year",
        )?;
        let completion_years = stmt
            .query_map([], |row| row.get::<_, i64>(0))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(FilterOptions {
            property_types: PropertyKind::ALL.iter().map(|k| k.label()).collect(),
            cities,
            districts,
            developers,
            completion_years,
        })
    }

    /// Slug and updated_at of every visible exclusive property, for the
    /// sitemap.
    pub fn list_exclusive_slugs(&self) -> SqliteResult<Vec<(String, chrono::DateTime<Utc>)>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT slug, updated_at FROM exclusive_properties
             WHERE is_exclusive = 1 AND status IN ('available', 'under_offer')
             ORDER BY updated_at DESC",
        )?;
        let slugs = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, ts(row.get(1)?)))
            })?
            .filter_map(|r| r.ok())
            .collect();
        Ok(slugs)
    }

    // ============================================
    // Gallery images
    // ============================================

    pub fn add_property_image(
        &self,
        property_id: &str,
        image: &str,
        title: &str,
        sort_order: i64,
        is_cover: bool,
    ) -> SqliteResult<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO exclusive_property_images (property_id, image, title, sort_order, is_cover)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![property_id, image, title, sort_order, is_cover as i64],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn list_property_images(&self, property_id: &str) -> SqliteResult<Vec<PropertyImage>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, property_id, image, title, description, sort_order, is_cover
             FROM exclusive_property_images WHERE property_id = ?1
             ORDER BY sort_order, id",
        )?;
        let images = stmt
            .query_map([property_id], |row| {
                Ok(PropertyImage {
                    id: row.get(0)?,
                    property_id: row.get(1)?,
                    image: row.get(2)?,
                    title: row.get(3)?,
                    description: row.get(4)?,
                    sort_order: row.get(5)?,
                    is_cover: row.get::<_, i64>(6)? != 0,
                })
            })?
            .filter_map(|r| r.ok())
            .collect();
        Ok(images)
    }

    // ============================================
    // Amenities
    // ============================================

    /// Insert the amenity if it is new and return its id either way.
    pub fn ensure_amenity(&self, name: &str, icon: &str, category: &str) -> SqliteResult<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR IGNORE INTO property_amenities (name, icon, category) VALUES (?1, ?2, ?3)",
            params![name, icon, category],
        )?;
        conn.query_row(
            "SELECT id FROM property_amenities WHERE name = ?1",
            [name],
            |row| row.get(0),
        )
    }

    pub fn link_property_amenity(&self, property_id: &str, amenity_id: i64) -> SqliteResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR IGNORE INTO exclusive_property_amenity_links (property_id, amenity_id)
             VALUES (?1, ?2)",
            params![property_id, amenity_id],
        )?;
        Ok(())
    }

    pub fn list_property_amenities(
        &self,
        property_id: &str,
    ) -> SqliteResult<Vec<PropertyAmenity>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT a.id, a.name, a.icon, a.category
             FROM property_amenities a
             JOIN exclusive_property_amenity_links l ON l.amenity_id = a.id
             WHERE l.property_id = ?1
             ORDER BY a.name",
        )?;
        let amenities = stmt
            .query_map([property_id], |row| {
                Ok(PropertyAmenity {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    icon: row.get(2)?,
                    category: row.get(3)?,
                })
            })?
            .filter_map(|r| r.ok())
            .collect();
        Ok(amenities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Database {
        Database::new(":memory:").unwrap()
    }

    fn listing(title: &str, district: &str) -> NewExclusiveProperty {
        NewExclusiveProperty {
            title: title.to_string(),
            district: district.to_string(),
            property_type: PropertyKind::Apartment,
            bedrooms: 2,
            bathrooms: 2.0,
            area_sqft: 1200,
            price: 1_800_000.0,
            ..Default::default()
        }
    }

    #[test]
    fn insert_derives_slug_and_price_per_sqft() {
        let db = test_db();
        let property = db
            .insert_exclusive_property(&listing("Marina Vista", "Dubai Marina"))
            .unwrap();

        assert_eq!(property.slug, "marina-vista-dubai-marina");
        assert_eq!(property.price_per_sqft, Some(1500.0));
        assert_eq!(property.city, "Dubai");
        assert_eq!(property.status, PropertyStatus::Available);
    }

    #[test]
    fn duplicate_titles_get_suffixed_slugs() {
        let db = test_db();
        let first = db
            .insert_exclusive_property(&listing("Marina Vista", "Dubai Marina"))
            .unwrap();
        let second = db
            .insert_exclusive_property(&listing("Marina Vista", "Dubai Marina"))
            .unwrap();

        assert_eq!(first.slug, "marina-vista-dubai-marina");
        assert_eq!(second.slug, "marina-vista-dubai-marina-2");
    }

    #[test]
    fn filters_exclude_hidden_statuses() {
        let db = test_db();
        db.insert_exclusive_property(&listing("Visible", "JVC")).unwrap();
        let mut sold = listing("Sold Out", "JVC");
        sold.status = Some(PropertyStatus::Sold);
        db.insert_exclusive_property(&sold).unwrap();

        let (results, total) = db
            .filter_exclusive_properties(&ExclusiveFilters::default(), 1, 12)
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(results[0].title, "Visible");
    }

    #[test]
    fn bedroom_filter_understands_studio_and_open_end() {
        let db = test_db();
        let mut studio = listing("Compact Studio", "JLT");
        studio.bedrooms = 0;
        studio.property_type = PropertyKind::Studio;
        db.insert_exclusive_property(&studio).unwrap();
        let mut mansion = listing("Eight Bed Mansion", "Emirates Hills");
        mansion.bedrooms = 8;
        db.insert_exclusive_property(&mansion).unwrap();

        let filters = ExclusiveFilters {
            bedrooms: Some("studio".to_string()),
            ..Default::default()
        };
        let (results, _) = db.filter_exclusive_properties(&filters, 1, 12).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Compact Studio");

        let filters = ExclusiveFilters {
            bedrooms: Some("6+".to_string()),
            ..Default::default()
        };
        let (results, _) = db.filter_exclusive_properties(&filters, 1, 12).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Eight Bed Mansion");
    }

    #[test]
    fn price_sentinels_are_ignored() {
        let db = test_db();
        db.insert_exclusive_property(&listing("Affordable", "JVC")).unwrap();

        let filters = ExclusiveFilters {
            min_price: Some(0.0),
            max_price: Some(100_000_000.0),
            min_area: Some(0.0),
            max_area: Some(50_000.0),
            ..Default::default()
        };
        let (_, total) = db.filter_exclusive_properties(&filters, 1, 12).unwrap();
        assert_eq!(total, 1);

        let filters = ExclusiveFilters {
            min_price: Some(2_000_000.0),
            ..Default::default()
        };
        let (_, total) = db.filter_exclusive_properties(&filters, 1, 12).unwrap();
        assert_eq!(total, 0);
    }

    #[test]
    fn district_filter_also_matches_neighborhood() {
        let db = test_db();
        let mut property = listing("Park View", "Dubai Hills");
        property.neighborhood = Some("Sidra".to_string());
        db.insert_exclusive_property(&property).unwrap();

        let filters = ExclusiveFilters {
            district: Some("sidra".to_string()),
            ..Default::default()
        };
        let (results, _) = db.filter_exclusive_properties(&filters, 1, 12).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn commercial_tab_excludes_studios() {
        let db = test_db();
        let mut studio = listing("Tiny Studio", "JLT");
        studio.property_type = PropertyKind::Studio;
        studio.bedrooms = 0;
        db.insert_exclusive_property(&studio).unwrap();
        db.insert_exclusive_property(&listing("Tower Floor", "DIFC")).unwrap();

        let filters = ExclusiveFilters {
            property_type: Some("commercial".to_string()),
            ..Default::default()
        };
        let (results, _) = db.filter_exclusive_properties(&filters, 1, 12).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Tower Floor");
    }

    #[test]
    fn property_status_filter_uses_completion_year() {
        let db = test_db();
        let mut ready = listing("Ready Villa", "Arabian Ranches");
        ready.completion_year = Some(2020);
        db.insert_exclusive_property(&ready).unwrap();
        let mut offplan = listing("Offplan Villa", "The Valley");
        offplan.completion_year = Some(2031);
        db.insert_exclusive_property(&offplan).unwrap();

        let filters = ExclusiveFilters {
            property_status: Some("Ready".to_string()),
            ..Default::default()
        };
        let (results, _) = db.filter_exclusive_properties(&filters, 1, 12).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Ready Villa");

        let filters = ExclusiveFilters {
            property_status: Some("Off Plan".to_string()),
            ..Default::default()
        };
        let (results, _) = db.filter_exclusive_properties(&filters, 1, 12).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Offplan Villa");
    }

    #[test]
    fn pagination_reports_full_total() {
        let db = test_db();
        for i in 0..15 {
            db.insert_exclusive_property(&listing(&format!("Unit {}", i), "JVC"))
                .unwrap();
        }

        let (page_one, total) = db
            .filter_exclusive_properties(&ExclusiveFilters::default(), 1, 12)
            .unwrap();
        assert_eq!(total, 15);
        assert_eq!(page_one.len(), 12);

        let (page_two, _) = db
            .filter_exclusive_properties(&ExclusiveFilters::default(), 2, 12)
            .unwrap();
        assert_eq!(page_two.len(), 3);
    }

    #[test]
    fn view_and_inquiry_counters_increment() {
        let db = test_db();
        let property = db
            .insert_exclusive_property(&listing("Counted", "JVC"))
            .unwrap();

        db.increment_property_views(&property.id).unwrap();
        db.increment_property_views(&property.id).unwrap();
        db.increment_property_inquiries(&property.id).unwrap();

        let reloaded = db.get_exclusive_property(&property.id).unwrap().unwrap();
        assert_eq!(reloaded.view_count, 2);
        assert_eq!(reloaded.inquiry_count, 1);
    }

    #[test]
    fn related_properties_share_a_district() {
        let db = test_db();
        let anchor = db
            .insert_exclusive_property(&listing("Anchor", "Palm Jumeirah"))
            .unwrap();
        db.insert_exclusive_property(&listing("Neighbor", "Palm Jumeirah"))
            .unwrap();
        db.insert_exclusive_property(&listing("Far Away", "JVC")).unwrap();

        let related = db
            .related_exclusive_properties("Palm Jumeirah", &anchor.id, 3)
            .unwrap();
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].title, "Neighbor");
    }

    #[test]
    fn filter_options_list_distinct_values() {
        let db = test_db();
        let mut first = listing("One", "Dubai Marina");
        first.developer_name = Some("Emaar".to_string());
        first.completion_year = Some(2026);
        db.insert_exclusive_property(&first).unwrap();
        let mut second = listing("Two", "Dubai Marina");
        second.developer_name = Some("Emaar".to_string());
        second.completion_year = Some(2027);
        db.insert_exclusive_property(&second).unwrap();

        let options = db.exclusive_filter_options().unwrap();
        assert_eq!(options.districts, vec!["Dubai Marina"]);
        assert_eq!(options.developers, vec!["Emaar"]);
        assert_eq!(options.completion_years, vec![2026, 2027]);
        assert_eq!(options.cities, vec!["Dubai"]);
    }

    #[test]
    fn images_and_amenities_round_trip() {
        let db = test_db();
        let property = db
            .insert_exclusive_property(&listing("Gallery Home", "JVC"))
            .unwrap();

        db.add_property_image(&property.id, "a.jpg", "Lobby", 1, false)
            .unwrap();
        db.add_property_image(&property.id, "cover.jpg", "Facade", 0, true)
            .unwrap();

        let images = db.list_property_images(&property.id).unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].image, "cover.jpg");
        assert!(images[0].is_cover);

        let pool = db.ensure_amenity("Swimming Pool", "fa-water", "leisure").unwrap();
        let gym = db.ensure_amenity("Gym", "fa-dumbbell", "leisure").unwrap();
        assert_eq!(db.ensure_amenity("Gym", "fa-dumbbell", "leisure").unwrap(), gym);

        db.link_property_amenity(&property.id, pool).unwrap();
        db.link_property_amenity(&property.id, gym).unwrap();
        db.link_property_amenity(&property.id, gym).unwrap();

        let amenities = db.list_property_amenities(&property.id).unwrap();
        assert_eq!(amenities.len(), 2);
        assert_eq!(amenities[0].name, "Gym");
    }
}
