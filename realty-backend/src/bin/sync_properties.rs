//! Catalog sync CLI
//!
//! Mirrors the external property catalog into the local database.
//!
//! Usage:
//!   cargo run --bin sync_properties                    # full sync
//!   cargo run --bin sync_properties -- --max-pages 5   # capped sync
//!   cargo run --bin sync_properties -- --id 412        # single property

use dotenv::dotenv;

use realty_backend::config::Config;
use realty_backend::db::Database;
use realty_backend::services::{sync_all_properties, sync_single_property, PropertyService};

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let mut max_pages: Option<u32> = None;
    let mut single_id: Option<i64> = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--max-pages" => {
                max_pages = args.next().and_then(|v| v.parse().ok());
                if max_pages.is_none() {
                    eprintln!("--max-pages expects a number");
                    std::process::exit(2);
                }
            }
            "--id" => {
                single_id = args.next().and_then(|v| v.parse().ok());
                if single_id.is_none() {
                    eprintln!("--id expects a property id");
                    std::process::exit(2);
                }
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("Usage: sync_properties [--max-pages N] [--id PROPERTY_ID]");
                std::process::exit(2);
            }
        }
    }

    let config = Config::from_env();
    let db = Database::new(&config.database_url).expect("Failed to initialize database");
    let service = PropertyService::new(&config);

    if let Some(api_id) = single_id {
        match sync_single_property(&db, &service, api_id).await {
            Ok(created) => {
                println!(
                    "Property {} {}",
                    api_id,
                    if created { "created" } else { "updated" }
                );
            }
            Err(err) => {
                eprintln!("Sync failed for property {}: {}", api_id, err);
                std::process::exit(1);
            }
        }
        return;
    }

    let stats = sync_all_properties(&db, &service, max_pages).await;

    println!("==================================================");
    println!("SYNC COMPLETED");
    println!("==================================================");
    println!("Pages processed: {}", stats.pages_processed);
    println!("Total fetched:   {}", stats.total_fetched);
    println!("Created:         {}", stats.created);
    println!("Updated:         {}", stats.updated);
    if stats.errors > 0 {
        println!("Errors:          {}", stats.errors);
    }
    println!("==================================================");

    // Nothing synced and something failed: exit non-zero for cron
    if stats.pages_processed == 0 && stats.errors > 0 {
        std::process::exit(1);
    }
}
