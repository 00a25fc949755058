//! Shared setup for integration tests.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use movos_browse::Browser;
use movos_catalog::MediaGateway;
use movos_core::config::BrowseConfig;
use movos_core::{JsonFileStore, LocalAccountStore};

/// Browse settings with notifications shown immediately.
pub fn browse_config() -> BrowseConfig {
    BrowseConfig {
        notification_delay: Duration::ZERO,
        ..BrowseConfig::default()
    }
}

/// Launches a browser backed by a preference file in `dir`.
///
/// Launching twice on the same directory simulates an app restart.
pub async fn launch(gateway: Arc<dyn MediaGateway>, dir: &Path) -> (Browser, Arc<JsonFileStore>) {
    let store = Arc::new(JsonFileStore::open(dir.join("preferences.json")).unwrap());
    let accounts = Arc::new(LocalAccountStore::new(store.clone()));
    let browser = Browser::launch(gateway, store.clone(), accounts, &browse_config())
        .await
        .unwrap();
    (browser, store)
}

pub fn ids(items: &[movos_core::MediaSummary]) -> Vec<String> {
    items.iter().map(|item| item.id.clone()).collect()
}
