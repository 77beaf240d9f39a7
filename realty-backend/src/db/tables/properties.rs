//! Local mirror of the external catalog, maintained by the sync binary.

use chrono::{DateTime, Utc};
use rusqlite::{params, Result as SqliteResult, Row};

use super::super::Database;
use super::ts;
use crate::models::MirrorProperty;

/// A mirror row as stored locally.
#[derive(Debug, Clone)]
pub struct SyncedProperty {
    pub id: i64,
    pub api_id: i64,
    pub title: String,
    pub property_type: String,
    pub city: String,
    pub district: String,
    pub low_price: Option<f64>,
    pub high_price: Option<f64>,
    pub delivery_year: Option<i64>,
    pub developer: String,
    pub is_featured: bool,
    pub is_active: bool,
    pub synced_at: DateTime<Utc>,
}

fn row_to_synced(row: &Row) -> rusqlite::Result<SyncedProperty> {
    Ok(SyncedProperty {
        id: row.get(0)?,
        api_id: row.get(1)?,
        title: row.get(2)?,
        property_type: row.get(3)?,
        city: row.get(4)?,
        district: row.get(5)?,
        low_price: row.get(6)?,
        high_price: row.get(7)?,
        delivery_year: row.get(8)?,
        developer: row.get(9)?,
        is_featured: row.get::<_, i64>(10)? != 0,
        is_active: row.get::<_, i64>(11)? != 0,
        synced_at: ts(row.get(12)?),
    })
}

impl Database {
    /// Create or update a mirror row keyed by `api_id`. Returns `true` when
    /// the row was newly created.
    pub fn upsert_synced_property(&self, property: &MirrorProperty) -> SqliteResult<bool> {
        let conn = self.conn.lock().unwrap();
        let existed: bool = conn
            .query_row(
                "SELECT COUNT(*) FROM properties WHERE api_id = ?1",
                [property.api_id],
                |row| row.get::<_, i64>(0),
            )
            .map(|c| c > 0)
            .unwrap_or(false);

        let now = Utc::now().to_rfc3339();
        if existed {
            conn.execute(
                "UPDATE properties SET title = ?2, description = ?3, property_type = ?4,
                 unit_type = ?5, city = ?6, district = ?7, low_price = ?8, high_price = ?9,
                 min_area = ?10, max_area = ?11, bedrooms = ?12, bathrooms = ?13, rooms = ?14,
                 cover_image = ?15, property_status = ?16, sales_status = ?17,
                 delivery_year = ?18, developer = ?19, is_featured = ?20, is_active = 1,
                 synced_at = ?21
                 WHERE api_id = ?1",
                params![
                    property.api_id,
                    property.title,
                    property.description,
                    property.property_type.as_str(),
                    property.unit_type,
                    property.city,
                    property.district,
                    property.low_price,
                    property.high_price,
                    property.min_area,
                    property.max_area,
                    property.bedrooms,
                    property.bathrooms,
                    property.rooms,
                    property.cover_image,
                    property.property_status,
                    property.sales_status,
                    property.delivery_year,
                    property.developer,
                    property.is_featured as i64,
                    now,
                ],
            )?;
        } else {
            conn.execute(
                "INSERT INTO properties (api_id, title, description, property_type, unit_type,
                 city, district, low_price, high_price, min_area, max_area, bedrooms, bathrooms,
                 rooms, cover_image, property_status, sales_status, delivery_year, developer,
                 is_featured, is_active, synced_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16,
                 ?17, ?18, ?19, ?20, 1, ?21)",
                params![
                    property.api_id,
                    property.title,
                    property.description,
                    property.property_type.as_str(),
                    property.unit_type,
                    property.city,
                    property.district,
                    property.low_price,
                    property.high_price,
                    property.min_area,
                    property.max_area,
                    property.bedrooms,
                    property.bathrooms,
                    property.rooms,
                    property.cover_image,
                    property.property_status,
                    property.sales_status,
                    property.delivery_year,
                    property.developer,
                    property.is_featured as i64,
                    now,
                ],
            )?;
        }

        Ok(!existed)
    }

    pub fn get_synced_property(&self, api_id: i64) -> SqliteResult<Option<SyncedProperty>> {
        let conn = self.conn.lock().unwrap();
        let property = conn
            .query_row(
                "SELECT id, api_id, title, property_type, city, district, low_price, high_price,
                 delivery_year, developer, is_featured, is_active, synced_at
                 FROM properties WHERE api_id = ?1",
                [api_id],
                row_to_synced,
            )
            .ok();
        Ok(property)
    }

    /// Active mirror rows, used to size the property sitemap.
    pub fn count_active_properties(&self) -> SqliteResult<i64> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT COUNT(*) FROM properties WHERE is_active = 1",
            [],
            |row| row.get(0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mirror(api_id: i64, title: &str) -> MirrorProperty {
        MirrorProperty::from_api(&json!({
            "id": api_id,
            "title": {"en": title},
            "city": {"name": {"en": "Dubai"}},
            "district": {"name": {"en": "Business Bay"}},
            "developer": {"name": {"en": "Omniyat"}},
            "property_type": 20,
            "low_price": 900000,
        }))
        .unwrap()
    }

    #[test]
    fn upsert_creates_then_updates() {
        let db = Database::new(":memory:").unwrap();

        assert!(db.upsert_synced_property(&mirror(9, "First Title")).unwrap());
        assert!(!db.upsert_synced_property(&mirror(9, "Renamed Title")).unwrap());

        let row = db.get_synced_property(9).unwrap().unwrap();
        assert_eq!(row.title, "Renamed Title");
        assert_eq!(row.property_type, "residential");
        assert_eq!(row.developer, "Omniyat");
        assert!(row.is_active);

        assert_eq!(db.count_active_properties().unwrap(), 1);
    }
}
