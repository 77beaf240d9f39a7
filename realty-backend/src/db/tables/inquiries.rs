//! Property inquiry database operations

use chrono::Utc;
use rusqlite::{params, Result as SqliteResult, Row};

use super::super::Database;
use super::{opt_ts, ts};
use crate::models::{ContactMethod, InquiryType, PropertyInquiry};

const COLUMNS: &str = "id, property_id, inquiry_type, name, email, phone, message,
    preferred_contact_method, budget_min, budget_max, is_responded, responded_at, created_at";

fn row_to_inquiry(row: &Row) -> rusqlite::Result<PropertyInquiry> {
    let inquiry_type: String = row.get(2)?;
    let contact_method: String = row.get(7)?;
    Ok(PropertyInquiry {
        id: row.get(0)?,
        property_id: row.get(1)?,
        inquiry_type: InquiryType::parse(&inquiry_type).unwrap_or_default(),
        name: row.get(3)?,
        email: row.get(4)?,
        phone: row.get(5)?,
        message: row.get(6)?,
        preferred_contact_method: ContactMethod::parse(&contact_method).unwrap_or_default(),
        budget_min: row.get(8)?,
        budget_max: row.get(9)?,
        is_responded: row.get::<_, i64>(10)? != 0,
        responded_at: opt_ts(row.get(11)?),
        created_at: ts(row.get(12)?),
    })
}

impl Database {
    #[allow(clippy::too_many_arguments)]
    pub fn insert_inquiry(
        &self,
        property_id: &str,
        inquiry_type: InquiryType,
        name: &str,
        email: &str,
        phone: &str,
        message: &str,
        contact_method: ContactMethod,
        budget_min: Option<f64>,
        budget_max: Option<f64>,
    ) -> SqliteResult<PropertyInquiry> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO property_inquiries (property_id, inquiry_type, name, email, phone,
             message, preferred_contact_method, budget_min, budget_max, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                property_id,
                inquiry_type.as_str(),
                name,
                email,
                phone,
                message,
                contact_method.as_str(),
                budget_min,
                budget_max,
                now,
            ],
        )?;

        let id = conn.last_insert_rowid();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM property_inquiries WHERE id = ?1",
            COLUMNS
        ))?;
        stmt.query_row([id], row_to_inquiry)
    }

    /// Newest-first inquiries for one property.
    pub fn list_inquiries_for_property(
        &self,
        property_id: &str,
    ) -> SqliteResult<Vec<PropertyInquiry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM property_inquiries WHERE property_id = ?1 ORDER BY created_at DESC",
            COLUMNS
        ))?;
        let inquiries = stmt
            .query_map([property_id], row_to_inquiry)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(inquiries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewExclusiveProperty, PropertyKind};

    #[test]
    fn inquiries_round_trip() {
        let db = Database::new(":memory:").unwrap();
        let property = db
            .insert_exclusive_property(&NewExclusiveProperty {
                title: "Inquiry Target".to_string(),
                district: "JVC".to_string(),
                property_type: PropertyKind::Villa,
                bedrooms: 4,
                bathrooms: 4.0,
                area_sqft: 3500,
                price: 5_500_000.0,
                ..Default::default()
            })
            .unwrap();

        let inquiry = db
            .insert_inquiry(
                &property.id,
                InquiryType::Viewing,
                "Omar",
                "omar@example.com",
                "+971501234567",
                "Weekend viewing possible?",
                ContactMethod::Whatsapp,
                Some(5_000_000.0),
                None,
            )
            .unwrap();

        assert_eq!(inquiry.inquiry_type, InquiryType::Viewing);
        assert_eq!(inquiry.preferred_contact_method, ContactMethod::Whatsapp);
        assert!(!inquiry.is_responded);

        let listed = db.list_inquiries_for_property(&property.id).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Omar");
    }
}
