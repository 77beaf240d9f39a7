use std::sync::Arc;

pub mod config;
pub mod controllers;
pub mod db;
pub mod models;
pub mod pagination;
pub mod services;
pub mod sitemap;
pub mod text;

use config::Config;
use db::Database;
use services::PropertyService;
use sitemap::SectionCache;

/// Shared application state handed to every handler.
pub struct AppState {
    pub db: Arc<Database>,
    pub config: Config,
    pub properties: Arc<PropertyService>,
    pub sitemaps: Arc<SectionCache>,
}
