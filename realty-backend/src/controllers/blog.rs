//! Blog endpoints: paginated listing with filters and sidebar data, post
//! detail with comments, comment submission and taxonomy lookups.

use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use crate::models::{BlogListQuery, BlogPost, CreateCommentRequest, BLOG_PAGE_SIZE, MIN_COMMENT_LEN};
use crate::text::is_valid_email;
use crate::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/blog").route(web::get().to(list)));
    cfg.service(web::resource("/api/blog/categories").route(web::get().to(categories)));
    cfg.service(web::resource("/api/blog/tags").route(web::get().to(tags)));
    cfg.service(web::resource("/api/blog/{slug}").route(web::get().to(detail)));
    cfg.service(
        web::resource("/api/blog/{slug}/comments").route(web::post().to(submit_comment)),
    );
}

async fn list(data: web::Data<AppState>, query: web::Query<BlogListQuery>) -> impl Responder {
    let query = query.into_inner();
    let page = query.page.unwrap_or(1).max(1);

    // The featured post is pinned above the grid and excluded from it
    let featured = match data.db.featured_post() {
        Ok(featured) => featured,
        Err(err) => {
            log::error!("Failed to load featured post: {}", err);
            None
        }
    };

    let listed = data
        .db
        .list_published_posts(&query, featured.as_ref().map(|p| p.id), page, BLOG_PAGE_SIZE);
    let (posts, total) = match listed {
        Ok(result) => result,
        Err(err) => {
            log::error!("Blog listing query failed: {}", err);
            return HttpResponse::InternalServerError().json(json!({
                "status": false,
                "error": "Unable to load blog posts.",
            }));
        }
    };

    let last_page = ((total as u32).div_ceil(BLOG_PAGE_SIZE)).max(1);
    let categories = data.db.categories_with_counts().unwrap_or_default();
    let recent = data.db.recent_posts(3).unwrap_or_default();
    let popular_tags = data.db.popular_tags(10).unwrap_or_default();

    HttpResponse::Ok().json(json!({
        "status": true,
        "data": {
            "featured_post": featured.as_ref().map(BlogPost::summary_json),
            "results": posts.iter().map(BlogPost::summary_json).collect::<Vec<_>>(),
            "count": total,
            "current_page": page,
            "last_page": last_page,
            "categories": categories,
            "recent_posts": recent.iter().map(BlogPost::summary_json).collect::<Vec<_>>(),
            "popular_tags": popular_tags,
            "search_query": query.q,
        }
    }))
}

async fn detail(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let slug = path.into_inner();

    let post = match data.db.get_post_by_slug(&slug, true) {
        Ok(Some(post)) => post,
        Ok(None) => {
            return HttpResponse::NotFound().json(json!({"error": "Post not found"}));
        }
        Err(err) => {
            log::error!("Failed to load post {}: {}", slug, err);
            return HttpResponse::InternalServerError()
                .json(json!({"error": "Internal server error"}));
        }
    };

    if let Err(err) = data.db.increment_post_views(post.id) {
        log::warn!("Failed to bump view count for post {}: {}", post.id, err);
    }

    let comments = data.db.approved_comments(post.id).unwrap_or_default();
    let comment_count = comments.len();
    let related = data
        .db
        .related_posts(post.category_id, post.id, 3)
        .unwrap_or_default();

    HttpResponse::Ok().json(json!({
        "post": post,
        "comments": comments,
        "comment_count": comment_count,
        "related_posts": related.iter().map(BlogPost::summary_json).collect::<Vec<_>>(),
    }))
}

async fn submit_comment(
    data: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<CreateCommentRequest>,
) -> impl Responder {
    let slug = path.into_inner();
    let request = body.into_inner();

    let post = match data.db.get_post_by_slug(&slug, true) {
        Ok(Some(post)) => post,
        Ok(None) => {
            return HttpResponse::NotFound().json(json!({
                "success": false,
                "message": "Post not found.",
            }));
        }
        Err(err) => {
            log::error!("Comment post lookup failed: {}", err);
            return HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Sorry, there was an error submitting your comment. Please try again.",
            }));
        }
    };

    let name = request.name.trim();
    let email = request.email.trim();
    let content = request.content.trim();
    if name.is_empty() || !is_valid_email(email) || content.len() < MIN_COMMENT_LEN {
        return HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": "Please correct the errors in your form.",
        }));
    }

    let inserted = data.db.insert_comment(
        post.id,
        name,
        email,
        request.website.as_deref().unwrap_or("").trim(),
        content,
    );

    match inserted {
        Ok(_) => {
            let comment_count = data.db.count_approved_comments(post.id).unwrap_or(0);
            HttpResponse::Ok().json(json!({
                "success": true,
                "message": "Thank you for your comment! It has been submitted and is awaiting approval.",
                "comment_count": comment_count,
            }))
        }
        Err(err) => {
            log::error!("Failed to store comment: {}", err);
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Sorry, there was an error submitting your comment. Please try again.",
            }))
        }
    }
}

async fn categories(data: web::Data<AppState>) -> impl Responder {
    match data.db.categories_with_counts() {
        Ok(categories) => HttpResponse::Ok().json(json!({"status": true, "data": categories})),
        Err(err) => {
            log::error!("Failed to list categories: {}", err);
            HttpResponse::InternalServerError().json(json!({
                "status": false,
                "error": "Unable to load categories.",
            }))
        }
    }
}

async fn tags(data: web::Data<AppState>) -> impl Responder {
    match data.db.popular_tags(10) {
        Ok(tags) => HttpResponse::Ok().json(json!({"status": true, "data": tags})),
        Err(err) => {
            log::error!("Failed to list tags: {}", err);
            HttpResponse::InternalServerError().json(json!({
                "status": false,
                "error": "Unable to load tags.",
            }))
        }
    }
}
