use actix_cors::Cors;
use actix_files::{Files, NamedFile};
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;

use realty_backend::config::Config;
use realty_backend::controllers;
use realty_backend::db::Database;
use realty_backend::services::PropertyService;
use realty_backend::sitemap::{warm_sitemap_cache, SectionCache};
use realty_backend::AppState;

/// SPA fallback handler - serves index.html for client-side routing
async fn spa_fallback() -> actix_web::Result<NamedFile> {
    // Check both possible locations for the frontend dist
    if std::path::Path::new("./frontend/dist/index.html").exists() {
        Ok(NamedFile::open("./frontend/dist/index.html")?)
    } else {
        Ok(NamedFile::open("../frontend/dist/index.html")?)
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let port = config.port;

    log::info!("Initializing database at {}", config.database_url);
    let db = Database::new(&config.database_url).expect("Failed to initialize database");
    let db = Arc::new(db);

    log::info!("Listings API: {}", config.properties_api_url);
    let properties = Arc::new(PropertyService::new(&config));
    let sitemaps = Arc::new(SectionCache::new(config.sitemap_cache_ttl_secs));

    // Pre-fetch the property sitemap sections so the first crawler hit is
    // served from cache
    if config.warm_sitemaps_on_start {
        log::info!("Scheduling sitemap cache warm-up");
        let warm_service = Arc::clone(&properties);
        let warm_cache = Arc::clone(&sitemaps);
        let warm_db = Arc::clone(&db);
        let warm_base = config.site_base_url.clone();
        tokio::spawn(async move {
            warm_sitemap_cache(&warm_service, &warm_cache, &warm_db, &warm_base).await;
        });
    }

    // Set DISABLE_FRONTEND=1 to disable static file serving (for separate dev server)
    let frontend_dist = if std::env::var("DISABLE_FRONTEND")
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(false)
    {
        log::info!("Frontend serving disabled via DISABLE_FRONTEND env var");
        ""
    } else if std::path::Path::new("./frontend/dist").exists() {
        "./frontend/dist"
    } else if std::path::Path::new("../frontend/dist").exists() {
        "../frontend/dist"
    } else {
        log::warn!("Frontend dist not found in ./frontend/dist or ../frontend/dist - static file serving disabled");
        ""
    };

    log::info!("Starting realty backend on port {}", port);
    if !frontend_dist.is_empty() {
        log::info!("Serving frontend from: {}", frontend_dist);
    }

    let frontend_dist = frontend_dist.to_string();

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        let mut app = App::new()
            .app_data(web::Data::new(AppState {
                db: Arc::clone(&db),
                config: config.clone(),
                properties: Arc::clone(&properties),
                sitemaps: Arc::clone(&sitemaps),
            }))
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::health::config)
            .configure(controllers::properties::config)
            .configure(controllers::exclusive::config)
            .configure(controllers::blog::config)
            .configure(controllers::newsletter::config)
            .configure(controllers::contact::config)
            .configure(controllers::sitemap::config);

        // Serve static files only if a frontend dist exists
        if !frontend_dist.is_empty() {
            app = app.service(
                Files::new("/", frontend_dist.clone())
                    .index_file("index.html")
                    .default_handler(actix_web::web::to(spa_fallback)),
            );
        }

        app
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
