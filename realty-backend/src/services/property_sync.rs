//! Pull the external catalog into the local `properties` mirror table.

use serde_json::Map;

use super::PropertyService;
use crate::db::Database;
use crate::models::MirrorProperty;

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct SyncStats {
    pub pages_processed: u64,
    pub total_fetched: u64,
    pub created: u64,
    pub updated: u64,
    pub errors: u64,
}

/// Walk the catalog page-by-page and upsert every property into the mirror.
/// Stops on an empty page, a missing `next_page_url`, an upstream error, or
/// the optional page cap.
pub async fn sync_all_properties(
    db: &Database,
    service: &PropertyService,
    max_pages: Option<u32>,
) -> SyncStats {
    let mut stats = SyncStats::default();
    let empty_filters = Map::new();
    let mut page = 1;

    log::info!("Starting property sync from API");

    loop {
        if let Some(max) = max_pages {
            if page > max {
                log::info!("Reached max pages limit ({})", max);
                break;
            }
        }

        let data = match service.fetch_page(&empty_filters, Some(page)).await {
            Ok(data) => data,
            Err(err) => {
                log::error!("Sync failed on page {}: {}", page, err);
                stats.errors += 1;
                break;
            }
        };

        if data.results.is_empty() {
            log::info!("No results on page {}, stopping", page);
            break;
        }

        for object in &data.results {
            let Some(mirror) = MirrorProperty::from_api(object) else {
                stats.errors += 1;
                log::warn!("Skipping property without id on page {}", page);
                continue;
            };

            match db.upsert_synced_property(&mirror) {
                Ok(created) => {
                    stats.total_fetched += 1;
                    if created {
                        stats.created += 1;
                    } else {
                        stats.updated += 1;
                    }
                }
                Err(err) => {
                    stats.errors += 1;
                    log::error!("Failed to store property {}: {}", mirror.api_id, err);
                }
            }
        }

        stats.pages_processed += 1;
        log::info!(
            "Synced page {}: {} properties so far",
            page,
            stats.total_fetched
        );

        if data.next_page_url.is_none() {
            break;
        }
        page += 1;
    }

    log::info!(
        "Property sync completed: {} pages, {} fetched ({} created, {} updated, {} errors)",
        stats.pages_processed,
        stats.total_fetched,
        stats.created,
        stats.updated,
        stats.errors
    );
    stats
}

/// Refresh a single mirror row from the detail endpoint. Returns whether the
/// row was newly created.
pub async fn sync_single_property(
    db: &Database,
    service: &PropertyService,
    api_id: i64,
) -> Result<bool, String> {
    let detail = service.fetch_detail(api_id).await?;
    let mirror = MirrorProperty::from_api(&detail)
        .ok_or_else(|| format!("Property {} payload carries no id", api_id))?;
    db.upsert_synced_property(&mirror)
        .map_err(|err| err.to_string())
}
