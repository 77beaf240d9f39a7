mod http_retry;
mod property_service;
mod property_sync;

pub use http_retry::{is_retryable_reqwest_error, BackoffTracker};
pub use property_service::{find_unit, PageData, PropertyService};
pub use property_sync::{sync_all_properties, sync_single_property, SyncStats};
