//! Blog database operations: posts, categories, tags and the listing
//! queries behind the blog pages.

use chrono::Utc;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, Result as SqliteResult, Row};

use super::super::Database;
use super::{opt_ts, ts, unique_slug};
use crate::models::{
    BlogListQuery, BlogPost, Category, CategoryWithCount, NewBlogPost, PostStatus, Tag,
    TagWithCount,
};
use crate::text::slugify;

const POST_COLUMNS: &str = "p.id, p.title, p.slug, p.excerpt, p.content, p.category_id,
    c.name, c.slug, p.author, p.cover_image, p.status, p.is_featured, p.view_count,
    p.meta_title, p.meta_description, p.created_at, p.updated_at, p.published_at";

const POST_FROM: &str = "blog_posts p LEFT JOIN blog_categories c ON c.id = p.category_id";

fn row_to_post(row: &Row) -> rusqlite::Result<BlogPost> {
    let status: String = row.get(10)?;
    Ok(BlogPost {
        id: row.get(0)?,
        title: row.get(1)?,
        slug: row.get(2)?,
        excerpt: row.get(3)?,
        content: row.get(4)?,
        category_id: row.get(5)?,
        category_name: row.get(6)?,
        category_slug: row.get(7)?,
        author: row.get(8)?,
        cover_image: row.get(9)?,
        status: PostStatus::parse(&status).unwrap_or_default(),
        is_featured: row.get::<_, i64>(11)? != 0,
        view_count: row.get(12)?,
        meta_title: row.get(13)?,
        meta_description: row.get(14)?,
        created_at: ts(row.get(15)?),
        updated_at: ts(row.get(16)?),
        published_at: opt_ts(row.get(17)?),
        tags: Vec::new(),
    })
}

fn load_tags(conn: &Connection, post_id: i64) -> SqliteResult<Vec<Tag>> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.name, t.slug FROM blog_tags t
         JOIN blog_post_tags pt ON pt.tag_id = t.id
         WHERE pt.post_id = ?1 ORDER BY t.name",
    )?;
    let tags = stmt
        .query_map([post_id], |row| {
            Ok(Tag {
                id: row.get(0)?,
                name: row.get(1)?,
                slug: row.get(2)?,
            })
        })?
        .filter_map(|r| r.ok())
        .collect();
    Ok(tags)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl Database {
    pub fn insert_blog_category(&self, name: &str, description: &str) -> SqliteResult<Category> {
        let conn = self.conn.lock().unwrap();
        let slug = unique_slug(&conn, "blog_categories", &slugify(name));
        conn.execute(
            "INSERT INTO blog_categories (name, slug, description) VALUES (?1, ?2, ?3)",
            params![name, slug, description],
        )?;
        Ok(Category {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            slug,
            description: description.to_string(),
        })
    }

    pub fn insert_blog_tag(&self, name: &str) -> SqliteResult<Tag> {
        let conn = self.conn.lock().unwrap();
        let slug = unique_slug(&conn, "blog_tags", &slugify(name));
        conn.execute(
            "INSERT INTO blog_tags (name, slug) VALUES (?1, ?2)",
            params![name, slug],
        )?;
        Ok(Tag {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            slug,
        })
    }

    pub fn insert_blog_post(&self, new: &NewBlogPost) -> SqliteResult<BlogPost> {
        let conn = self.conn.lock().unwrap();
        let slug = unique_slug(&conn, "blog_posts", &slugify(&new.title));
        let status = new.status.unwrap_or_default();
        let now = Utc::now();
        // Publishing without an explicit date stamps the post now
        let published_at = match (status, new.published_at) {
            (PostStatus::Published, None) => Some(now),
            (_, explicit) => explicit,
        };

        conn.execute(
            "INSERT INTO blog_posts (title, slug, excerpt, content, category_id, author,
             cover_image, status, is_featured, meta_title, meta_description, created_at,
             updated_at, published_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12, ?13)",
            params![
                new.title,
                slug,
                new.excerpt.as_deref().unwrap_or(""),
                new.content,
                new.category_id,
                new.author.as_deref().unwrap_or(""),
                new.cover_image.as_deref().unwrap_or(""),
                status.as_str(),
                new.is_featured as i64,
                new.meta_title.as_deref().unwrap_or(""),
                new.meta_description.as_deref().unwrap_or(""),
                now.to_rfc3339(),
                published_at.map(|dt| dt.to_rfc3339()),
            ],
        )?;

        let id = conn.last_insert_rowid();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM {} WHERE p.id = ?1",
            POST_COLUMNS, POST_FROM
        ))?;
        stmt.query_row([id], row_to_post)
    }

    pub fn tag_post(&self, post_id: i64, tag_id: i64) -> SqliteResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR IGNORE INTO blog_post_tags (post_id, tag_id) VALUES (?1, ?2)",
            params![post_id, tag_id],
        )?;
        Ok(())
    }

    /// Published posts, newest first, with the blog page's category / tag /
    /// search filters applied. Returns one page plus the total match count.
    pub fn list_published_posts(
        &self,
        query: &BlogListQuery,
        exclude_id: Option<i64>,
        page: u32,
        per_page: u32,
    ) -> SqliteResult<(Vec<BlogPost>, i64)> {
        let conn = self.conn.lock().unwrap();

        let mut clauses = vec!["p.status = 'published'".to_string()];
        let mut binds: Vec<SqlValue> = Vec::new();

        if let Some(category) = non_empty(&query.category) {
            clauses.push(
                "p.category_id IN (SELECT id FROM blog_categories WHERE slug = ?)".to_string(),
            );
            binds.push(SqlValue::Text(category.to_string()));
        }

        if let Some(tag) = non_empty(&query.tag) {
            clauses.push(
                "p.id IN (SELECT pt.post_id FROM blog_post_tags pt
                  JOIN blog_tags t ON t.id = pt.tag_id WHERE t.slug = ?)"
                    .to_string(),
            );
            binds.push(SqlValue::Text(tag.to_string()));
        }

        if let Some(term) = non_empty(&query.q) {
            let pattern = format!("%{}%", term);
            clauses.push(
                "(p.title LIKE ? OR p.excerpt LIKE ? OR p.content LIKE ?
                  OR p.id IN (SELECT pt.post_id FROM blog_post_tags pt
                      JOIN blog_tags t ON t.id = pt.tag_id WHERE t.name LIKE ?))"
                    .to_string(),
            );
            for _ in 0..4 {
                binds.push(SqlValue::Text(pattern.clone()));
            }
        }

        if let Some(exclude) = exclude_id {
            clauses.push("p.id != ?".to_string());
            binds.push(SqlValue::Integer(exclude));
        }

        let where_sql = clauses.join(" AND ");

        let total: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {} WHERE {}", POST_FROM, where_sql),
            params_from_iter(binds.iter()),
            |row| row.get(0),
        )?;

        let page = page.max(1);
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM {} WHERE {} ORDER BY p.published_at DESC LIMIT ?{} OFFSET ?{}",
            POST_COLUMNS,
            POST_FROM,
            where_sql,
            binds.len() + 1,
            binds.len() + 2,
        ))?;

        let mut binds = binds;
        binds.push(SqlValue::Integer(per_page as i64));
        binds.push(SqlValue::Integer(((page - 1) * per_page) as i64));

        let mut posts: Vec<BlogPost> = stmt
            .query_map(params_from_iter(binds.iter()), row_to_post)?
            .filter_map(|r| r.ok())
            .collect();
        for post in &mut posts {
            post.tags = load_tags(&conn, post.id)?;
        }

        Ok((posts, total))
    }

    /// Latest featured published post, if any.
    pub fn featured_post(&self) -> SqliteResult<Option<BlogPost>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM {} WHERE p.status = 'published' AND p.is_featured = 1
             ORDER BY p.published_at DESC LIMIT 1",
            POST_COLUMNS, POST_FROM
        ))?;

        let post = stmt.query_row([], row_to_post).ok();
        match post {
            Some(mut post) => {
                post.tags = load_tags(&conn, post.id)?;
                Ok(Some(post))
            }
            None => Ok(None),
        }
    }

    pub fn get_post_by_slug(
        &self,
        slug: &str,
        published_only: bool,
    ) -> SqliteResult<Option<BlogPost>> {
        let conn = self.conn.lock().unwrap();
        let status_clause = if published_only {
            " AND p.status = 'published'"
        } else {
            ""
        };
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM {} WHERE p.slug = ?1{}",
            POST_COLUMNS, POST_FROM, status_clause
        ))?;

        let post = stmt.query_row([slug], row_to_post).ok();
        match post {
            Some(mut post) => {
                post.tags = load_tags(&conn, post.id)?;
                Ok(Some(post))
            }
            None => Ok(None),
        }
    }

    pub fn increment_post_views(&self, id: i64) -> SqliteResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE blog_posts SET view_count = view_count + 1 WHERE id = ?1",
            [id],
        )?;
        Ok(())
    }

    /// Other published posts in the same category.
    pub fn related_posts(
        &self,
        category_id: Option<i64>,
        exclude_id: i64,
        limit: u32,
    ) -> SqliteResult<Vec<BlogPost>> {
        let Some(category_id) = category_id else {
            return Ok(Vec::new());
        };

        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM {} WHERE p.status = 'published' AND p.category_id = ?1
             AND p.id != ?2 ORDER BY p.published_at DESC LIMIT ?3",
            POST_COLUMNS, POST_FROM
        ))?;
        let posts = stmt
            .query_map(params![category_id, exclude_id, limit], row_to_post)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(posts)
    }

    pub fn recent_posts(&self, limit: u32) -> SqliteResult<Vec<BlogPost>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM {} WHERE p.status = 'published'
             ORDER BY p.published_at DESC LIMIT ?1",
            POST_COLUMNS, POST_FROM
        ))?;
        let posts = stmt
            .query_map([limit], row_to_post)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(posts)
    }

    /// Categories holding at least one published post, with counts.
    pub fn categories_with_counts(&self) -> SqliteResult<Vec<CategoryWithCount>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT c.id, c.name, c.slug, c.description, COUNT(p.id)
             FROM blog_categories c
             JOIN blog_posts p ON p.category_id = c.id AND p.status = 'published'
             GROUP BY c.id ORDER BY c.name",
        )?;
        let categories = stmt
            .query_map([], |row| {
                Ok(CategoryWithCount {
                    category: Category {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        slug: row.get(2)?,
                        description: row.get(3)?,
                    },
                    posts_count: row.get(4)?,
                })
            })?
            .filter_map(|r| r.ok())
            .collect();
        Ok(categories)
    }

    /// Most-used tags across published posts.
    pub fn popular_tags(&self, limit: u32) -> SqliteResult<Vec<TagWithCount>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT t.id, t.name, t.slug, COUNT(p.id) AS posts_count
             FROM blog_tags t
             JOIN blog_post_tags pt ON pt.tag_id = t.id
             JOIN blog_posts p ON p.id = pt.post_id AND p.status = 'published'
             GROUP BY t.id ORDER BY posts_count DESC, t.name LIMIT ?1",
        )?;
        let tags = stmt
            .query_map([limit], |row| {
                Ok(TagWithCount {
                    tag: Tag {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        slug: row.get(2)?,
                    },
                    posts_count: row.get(3)?,
                })
            })?
            .filter_map(|r| r.ok())
            .collect();
        Ok(tags)
    }

    /// Slug and updated_at of every published post, for the sitemap.
    pub fn list_published_slugs(
        &self,
    ) -> SqliteResult<Vec<(String, chrono::DateTime<Utc>)>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT slug, updated_at FROM blog_posts WHERE status = 'published'
             ORDER BY published_at DESC",
        )?;
        let slugs = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, ts(row.get(1)?))))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(slugs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Database {
        Database::new(":memory:").unwrap()
    }

    fn published(title: &str) -> NewBlogPost {
        NewBlogPost {
            title: title.to_string(),
            content: "Dubai market insight content body".to_string(),
            status: Some(PostStatus::Published),
            ..Default::default()
        }
    }

    #[test]
    fn publishing_stamps_published_at() {
        let db = test_db();
        let post = db.insert_blog_post(&published("Market Watch")).unwrap();
        assert!(post.published_at.is_some());
        assert_eq!(post.slug, "market-watch");

        let draft = db
            .insert_blog_post(&NewBlogPost {
                title: "Unfinished".to_string(),
                content: "...".to_string(),
                ..Default::default()
            })
            .unwrap();
        assert!(draft.published_at.is_none());
        assert_eq!(draft.status, PostStatus::Draft);
    }

    #[test]
    fn drafts_are_invisible_to_listing_and_detail() {
        let db = test_db();
        db.insert_blog_post(&published("Visible")).unwrap();
        db.insert_blog_post(&NewBlogPost {
            title: "Hidden".to_string(),
            content: "...".to_string(),
            ..Default::default()
        })
        .unwrap();

        let (posts, total) = db
            .list_published_posts(&BlogListQuery::default(), None, 1, 6)
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(posts[0].title, "Visible");

        assert!(db.get_post_by_slug("hidden", true).unwrap().is_none());
        assert!(db.get_post_by_slug("hidden", false).unwrap().is_some());
    }

    #[test]
    fn category_and_tag_filters() {
        let db = test_db();
        let guides = db.insert_blog_category("Buying Guides", "").unwrap();
        let offplan = db.insert_blog_tag("Off-Plan").unwrap();

        let mut post = published("How To Buy Off-Plan");
        post.category_id = Some(guides.id);
        let post = db.insert_blog_post(&post).unwrap();
        db.tag_post(post.id, offplan.id).unwrap();
        db.insert_blog_post(&published("Unrelated News")).unwrap();

        let query = BlogListQuery {
            category: Some(guides.slug.clone()),
            ..Default::default()
        };
        let (posts, total) = db.list_published_posts(&query, None, 1, 6).unwrap();
        assert_eq!(total, 1);
        assert_eq!(posts[0].tags.len(), 1);
        assert_eq!(posts[0].tags[0].name, "Off-Plan");

        let query = BlogListQuery {
            tag: Some(offplan.slug.clone()),
            ..Default::default()
        };
        let (_, total) = db.list_published_posts(&query, None, 1, 6).unwrap();
        assert_eq!(total, 1);
    }

    #[test]
    fn search_matches_title_content_and_tag_names() {
        let db = test_db();
        let post = db.insert_blog_post(&published("Waterfront Living")).unwrap();
        let tag = db.insert_blog_tag("Golden Visa").unwrap();
        db.tag_post(post.id, tag.id).unwrap();

        for term in ["waterfront", "market insight", "golden"] {
            let query = BlogListQuery {
                q: Some(term.to_string()),
                ..Default::default()
            };
            let (_, total) = db.list_published_posts(&query, None, 1, 6).unwrap();
            assert_eq!(total, 1, "term {:?} should match", term);
        }

        let query = BlogListQuery {
            q: Some("mortgage".to_string()),
            ..Default::default()
        };
        let (_, total) = db.list_published_posts(&query, None, 1, 6).unwrap();
        assert_eq!(total, 0);
    }

    #[test]
    fn featured_post_is_excludable_from_listing() {
        let db = test_db();
        let mut featured = published("Featured Story");
        featured.is_featured = true;
        let featured = db.insert_blog_post(&featured).unwrap();
        db.insert_blog_post(&published("Regular Story")).unwrap();

        let found = db.featured_post().unwrap().unwrap();
        assert_eq!(found.id, featured.id);

        let (posts, total) = db
            .list_published_posts(&BlogListQuery::default(), Some(featured.id), 1, 6)
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(posts[0].title, "Regular Story");
    }

    #[test]
    fn sidebar_aggregates_counts() {
        let db = test_db();
        let guides = db.insert_blog_category("Guides", "").unwrap();
        db.insert_blog_category("Empty", "").unwrap();
        let tag = db.insert_blog_tag("Dubai").unwrap();

        for i in 0..2 {
            let mut post = published(&format!("Guide {}", i));
            post.category_id = Some(guides.id);
            let post = db.insert_blog_post(&post).unwrap();
            db.tag_post(post.id, tag.id).unwrap();
        }

        let categories = db.categories_with_counts().unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].posts_count, 2);

        let tags = db.popular_tags(10).unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].posts_count, 2);

        assert_eq!(db.recent_posts(3).unwrap().len(), 2);
    }

    #[test]
    fn related_posts_need_a_shared_category() {
        let db = test_db();
        let news = db.insert_blog_category("News", "").unwrap();
        let mut anchor = published("Anchor");
        anchor.category_id = Some(news.id);
        let anchor = db.insert_blog_post(&anchor).unwrap();
        let mut sibling = published("Sibling");
        sibling.category_id = Some(news.id);
        db.insert_blog_post(&sibling).unwrap();
        db.insert_blog_post(&published("Orphan")).unwrap();

        let related = db.related_posts(anchor.category_id, anchor.id, 3).unwrap();
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].title, "Sibling");

        assert!(db.related_posts(None, anchor.id, 3).unwrap().is_empty());
    }

    #[test]
    fn view_counter_increments() {
        let db = test_db();
        let post = db.insert_blog_post(&published("Counted")).unwrap();
        db.increment_post_views(post.id).unwrap();
        db.increment_post_views(post.id).unwrap();
        let reloaded = db.get_post_by_slug(&post.slug, true).unwrap().unwrap();
        assert_eq!(reloaded.view_count, 2);
    }
}
