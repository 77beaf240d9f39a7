//! Lead capture database operations: plain contact messages and the
//! long-form investment lead funnel.

use chrono::Utc;
use rusqlite::{params, Result as SqliteResult, Row};

use super::super::Database;
use super::ts;
use crate::models::{ContactLead, ContactLeadRequest, ContactMessage, ContactMessageRequest};

fn row_to_message(row: &Row) -> rusqlite::Result<ContactMessage> {
    Ok(ContactMessage {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        subject: row.get(4)?,
        message: row.get(5)?,
        is_read: row.get::<_, i64>(6)? != 0,
        created_at: ts(row.get(7)?),
    })
}

fn row_to_lead(row: &Row) -> rusqlite::Result<ContactLead> {
    Ok(ContactLead {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        investment_budget: row.get(5)?,
        investment_type: row.get(6)?,
        preferred_location: row.get(7)?,
        timeline: row.get(8)?,
        message: row.get(9)?,
        property_interests: row.get(10)?,
        created_at: ts(row.get(11)?),
    })
}

impl Database {
    pub fn insert_contact_message(
        &self,
        request: &ContactMessageRequest,
    ) -> SqliteResult<ContactMessage> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO contact_messages (name, email, phone, subject, message, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                request.name.trim(),
                request.email.trim(),
                request.phone.trim(),
                request.subject.trim(),
                request.message,
                Utc::now().to_rfc3339(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        conn.query_row(
            "SELECT id, name, email, phone, subject, message, is_read, created_at
             FROM contact_messages WHERE id = ?1",
            [id],
            row_to_message,
        )
    }

    pub fn insert_contact_lead(&self, request: &ContactLeadRequest) -> SqliteResult<ContactLead> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO contact_leads (first_name, last_name, email, phone, investment_budget,
             investment_type, preferred_location, timeline, message, property_interests,
             created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                request.first_name.trim(),
                request.last_name.trim(),
                request.email.trim(),
                request.phone.trim(),
                request.investment_budget.as_deref().unwrap_or(""),
                request.investment_type.as_deref().unwrap_or(""),
                request.preferred_location.as_deref().unwrap_or(""),
                request.timeline.as_deref().unwrap_or(""),
                request.message.as_deref().unwrap_or(""),
                request.interests_joined(),
                Utc::now().to_rfc3339(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        conn.query_row(
            "SELECT id, first_name, last_name, email, phone, investment_budget, investment_type,
             preferred_location, timeline, message, property_interests, created_at
             FROM contact_leads WHERE id = ?1",
            [id],
            row_to_lead,
        )
    }

    pub fn count_unread_messages(&self) -> SqliteResult<i64> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT COUNT(*) FROM contact_messages WHERE is_read = 0",
            [],
            |row| row.get(0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn contact_message_round_trips() {
        let db = Database::new(":memory:").unwrap();
        let message = db
            .insert_contact_message(&ContactMessageRequest {
                name: " Sami ".to_string(),
                email: "sami@example.com".to_string(),
                phone: "+971501234567".to_string(),
                subject: "Viewing request".to_string(),
                message: "Please call me back.".to_string(),
            })
            .unwrap();

        assert_eq!(message.name, "Sami");
        assert!(!message.is_read);
        assert_eq!(db.count_unread_messages().unwrap(), 1);
    }

    #[test]
    fn lead_stores_joined_interests() {
        let db = Database::new(":memory:").unwrap();
        let request: ContactLeadRequest = serde_json::from_value(json!({
            "firstName": "Amira",
            "lastName": "Hassan",
            "email": "amira@example.com",
            "phone": "+971501234567",
            "investmentBudget": "2m-5m",
            "propertyInterest": ["villa", "penthouse"],
        }))
        .unwrap();

        let lead = db.insert_contact_lead(&request).unwrap();
        assert_eq!(lead.full_name(), "Amira Hassan");
        assert_eq!(lead.property_interests, "villa, penthouse");
        assert_eq!(lead.investment_budget, "2m-5m");
    }
}
