use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Comments shorter than this are rejected.
pub const MIN_COMMENT_LEN: usize = 10;

/// Posts per listing page.
pub const BLOG_PAGE_SIZE: u32 = 6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
            PostStatus::Archived => "archived",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        [PostStatus::Draft, PostStatus::Published, PostStatus::Archived]
            .iter()
            .copied()
            .find(|s| s.as_str() == value)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryWithCount {
    #[serde(flatten)]
    pub category: Category,
    pub posts_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagWithCount {
    #[serde(flatten)]
    pub tag: Tag,
    pub posts_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlogPost {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    pub author: String,
    pub cover_image: String,
    pub status: PostStatus,
    pub is_featured: bool,
    pub view_count: i64,
    pub meta_title: String,
    pub meta_description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
    pub tags: Vec<Tag>,
}

impl BlogPost {
    pub fn url(&self) -> String {
        format!("/blog/{}/", self.slug)
    }

    /// Card-sized JSON for listing pages and sidebars.
    pub fn summary_json(&self) -> serde_json::Value {
        json!({
            "id": self.id,
            "title": self.title,
            "slug": self.slug,
            "excerpt": self.excerpt,
            "category": self.category_name.as_ref().map(|name| json!({
                "name": name,
                "slug": self.category_slug,
            })),
            "author": self.author,
            "cover_image": self.cover_image,
            "is_featured": self.is_featured,
            "view_count": self.view_count,
            "published_at": self.published_at,
            "tags": self.tags,
            "url": self.url(),
        })
    }
}

/// Insert payload for a blog post; the slug is derived from the title.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewBlogPost {
    pub title: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub category_id: Option<i64>,
    pub author: Option<String>,
    pub cover_image: Option<String>,
    pub status: Option<PostStatus>,
    pub is_featured: bool,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub name: String,
    pub email: String,
    pub website: String,
    pub content: String,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCommentRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub website: Option<String>,
    pub content: String,
}

/// Query parameters for the blog listing endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlogListQuery {
    #[serde(default, deserialize_with = "super::lenient_u32")]
    pub page: Option<u32>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub q: Option<String>,
}
