//! SEO endpoints: robots.txt, the sitemap index and the section sitemaps.

use actix_web::{web, HttpResponse, Responder};

use crate::sitemap::{
    blog_urls, exclusive_urls, property_section_urls, render_index, render_urlset, section_count,
    static_urls,
};
use crate::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/robots.txt").route(web::get().to(robots)));
    cfg.service(web::resource("/sitemap.xml").route(web::get().to(index)));
    cfg.service(web::resource("/sitemap-static.xml").route(web::get().to(static_sitemap)));
    cfg.service(web::resource("/sitemap-blog.xml").route(web::get().to(blog_sitemap)));
    cfg.service(
        web::resource("/sitemap-exclusive.xml").route(web::get().to(exclusive_sitemap)),
    );
    cfg.service(
        web::resource("/sitemap-properties-{section}.xml")
            .route(web::get().to(properties_sitemap)),
    );
}

fn xml_response(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/xml; charset=utf-8")
        .body(body)
}

async fn robots(data: web::Data<AppState>) -> impl Responder {
    let body = format!(
        "User-agent: *\nDisallow: /api/\nAllow: /\nSitemap: {}/sitemap.xml\n",
        data.config.site_base_url
    );
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(body)
}

async fn index(data: web::Data<AppState>) -> impl Responder {
    let base = &data.config.site_base_url;
    let mut locations = vec![
        format!("{}/sitemap-static.xml", base),
        format!("{}/sitemap-blog.xml", base),
        format!("{}/sitemap-exclusive.xml", base),
    ];
    for section in 1..=section_count(&data.db) {
        locations.push(format!("{}/sitemap-properties-{}.xml", base, section));
    }
    xml_response(render_index(&locations))
}

async fn static_sitemap(data: web::Data<AppState>) -> impl Responder {
    xml_response(render_urlset(&static_urls(&data.config.site_base_url)))
}

async fn blog_sitemap(data: web::Data<AppState>) -> impl Responder {
    match blog_urls(&data.db, &data.config.site_base_url) {
        Ok(urls) => xml_response(render_urlset(&urls)),
        Err(err) => {
            log::error!("Blog sitemap query failed: {}", err);
            HttpResponse::InternalServerError().finish()
        }
    }
}

async fn exclusive_sitemap(data: web::Data<AppState>) -> impl Responder {
    match exclusive_urls(&data.db, &data.config.site_base_url) {
        Ok(urls) => xml_response(render_urlset(&urls)),
        Err(err) => {
            log::error!("Exclusive sitemap query failed: {}", err);
            HttpResponse::InternalServerError().finish()
        }
    }
}

async fn properties_sitemap(
    data: web::Data<AppState>,
    path: web::Path<u32>,
) -> impl Responder {
    let section = path.into_inner();
    if section < 1 || section > section_count(&data.db) {
        return HttpResponse::NotFound().finish();
    }

    let urls = property_section_urls(
        &data.properties,
        &data.sitemaps,
        &data.config.site_base_url,
        section,
    )
    .await;

    xml_response(render_urlset(&urls))
}
