//! Blog comment database operations. Comments are held for moderation and
//! only approved ones are ever served.

use chrono::Utc;
use rusqlite::{params, Result as SqliteResult, Row};

use super::super::Database;
use super::ts;
use crate::models::Comment;

const COLUMNS: &str = "id, post_id, name, email, website, content, is_approved, created_at";

fn row_to_comment(row: &Row) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get(0)?,
        post_id: row.get(1)?,
        name: row.get(2)?,
        email: row.get(3)?,
        website: row.get(4)?,
        content: row.get(5)?,
        is_approved: row.get::<_, i64>(6)? != 0,
        created_at: ts(row.get(7)?),
    })
}

impl Database {
    pub fn insert_comment(
        &self,
        post_id: i64,
        name: &str,
        email: &str,
        website: &str,
        content: &str,
    ) -> SqliteResult<Comment> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO blog_comments (post_id, name, email, website, content, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![post_id, name, email, website, content, Utc::now().to_rfc3339()],
        )?;

        let id = conn.last_insert_rowid();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM blog_comments WHERE id = ?1",
            COLUMNS
        ))?;
        stmt.query_row([id], row_to_comment)
    }

    pub fn approved_comments(&self, post_id: i64) -> SqliteResult<Vec<Comment>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM blog_comments WHERE post_id = ?1 AND is_approved = 1
             ORDER BY created_at DESC",
            COLUMNS
        ))?;
        let comments = stmt
            .query_map([post_id], row_to_comment)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(comments)
    }

    pub fn count_approved_comments(&self, post_id: i64) -> SqliteResult<i64> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT COUNT(*) FROM blog_comments WHERE post_id = ?1 AND is_approved = 1",
            [post_id],
            |row| row.get(0),
        )
    }

    pub fn approve_comment(&self, id: i64) -> SqliteResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE blog_comments SET is_approved = 1 WHERE id = ?1",
            [id],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewBlogPost, PostStatus};

    #[test]
    fn comments_stay_hidden_until_approved() {
        let db = Database::new(":memory:").unwrap();
        let post = db
            .insert_blog_post(&NewBlogPost {
                title: "Commented Post".to_string(),
                content: "...".to_string(),
                status: Some(PostStatus::Published),
                ..Default::default()
            })
            .unwrap();

        let comment = db
            .insert_comment(post.id, "Rana", "rana@example.com", "", "Great overview, thanks!")
            .unwrap();
        assert!(!comment.is_approved);
        assert!(db.approved_comments(post.id).unwrap().is_empty());
        assert_eq!(db.count_approved_comments(post.id).unwrap(), 0);

        db.approve_comment(comment.id).unwrap();
        let visible = db.approved_comments(post.id).unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "Rana");
        assert_eq!(db.count_approved_comments(post.id).unwrap(), 1);
    }
}
