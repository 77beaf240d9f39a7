//! Newsletter subscriber database operations

use chrono::Utc;
use rusqlite::{params, Result as SqliteResult};

use super::super::Database;
use super::ts;
use crate::models::{NewsletterSubscriber, SubscribeOutcome};
use crate::text::normalize_email;

impl Database {
    /// Idempotent subscribe: new emails are inserted, lapsed ones
    /// reactivated, active ones reported as already subscribed.
    pub fn subscribe_email(&self, email: &str) -> SqliteResult<SubscribeOutcome> {
        let email = normalize_email(email);
        let conn = self.conn.lock().unwrap();

        let existing: Option<(i64, i64)> = conn
            .query_row(
                "SELECT id, is_active FROM newsletter_subscribers WHERE email = ?1",
                [&email],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .ok();

        match existing {
            None => {
                conn.execute(
                    "INSERT INTO newsletter_subscribers (email, is_active, subscribed_at)
                     VALUES (?1, 1, ?2)",
                    params![email, Utc::now().to_rfc3339()],
                )?;
                Ok(SubscribeOutcome::Subscribed)
            }
            Some((id, 0)) => {
                conn.execute(
                    "UPDATE newsletter_subscribers SET is_active = 1 WHERE id = ?1",
                    [id],
                )?;
                Ok(SubscribeOutcome::Reactivated)
            }
            Some(_) => Ok(SubscribeOutcome::AlreadySubscribed),
        }
    }

    pub fn get_subscriber(&self, email: &str) -> SqliteResult<Option<NewsletterSubscriber>> {
        let email = normalize_email(email);
        let conn = self.conn.lock().unwrap();
        let subscriber = conn
            .query_row(
                "SELECT id, email, is_active, subscribed_at FROM newsletter_subscribers
                 WHERE email = ?1",
                [&email],
                |row| {
                    Ok(NewsletterSubscriber {
                        id: row.get(0)?,
                        email: row.get(1)?,
                        is_active: row.get::<_, i64>(2)? != 0,
                        subscribed_at: ts(row.get(3)?),
                    })
                },
            )
            .ok();
        Ok(subscriber)
    }

    pub fn unsubscribe_email(&self, email: &str) -> SqliteResult<bool> {
        let email = normalize_email(email);
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE newsletter_subscribers SET is_active = 0 WHERE email = ?1",
            [&email],
        )?;
        Ok(changed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribe_is_idempotent_with_reactivation() {
        let db = Database::new(":memory:").unwrap();

        assert_eq!(
            db.subscribe_email("Investor@Example.com").unwrap(),
            SubscribeOutcome::Subscribed
        );
        // Same address, different casing
        assert_eq!(
            db.subscribe_email("investor@example.com ").unwrap(),
            SubscribeOutcome::AlreadySubscribed
        );

        assert!(db.unsubscribe_email("investor@example.com").unwrap());
        assert_eq!(
            db.subscribe_email("investor@example.com").unwrap(),
            SubscribeOutcome::Reactivated
        );

        let subscriber = db.get_subscriber("INVESTOR@example.com").unwrap().unwrap();
        assert_eq!(subscriber.email, "investor@example.com");
        assert!(subscriber.is_active);
    }
}
