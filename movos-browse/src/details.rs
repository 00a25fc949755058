//! Detail view loading.
//!
//! Opening a title shows its summary at once; the full record replaces it when
//! the gateway returns one.

use std::sync::Arc;

use movos_catalog::{CatalogError, MediaGateway};
use movos_core::{MediaDetail, MediaSummary, MediaType};
use tokio::sync::watch;

use crate::session::SessionContext;

/// What the detail view currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailView {
    /// Card data only, while the full record loads or after it failed.
    Summary(MediaSummary),
    Full(Box<MediaDetail>),
}

impl DetailView {
    pub fn summary(&self) -> &MediaSummary {
        match self {
            DetailView::Summary(summary) => summary,
            DetailView::Full(detail) => &detail.summary,
        }
    }

    pub fn detail(&self) -> Option<&MediaDetail> {
        match self {
            DetailView::Summary(_) => None,
            DetailView::Full(detail) => Some(detail),
        }
    }
}

/// Opens titles and enriches them in the background.
#[derive(Debug, Clone)]
pub struct DetailLoader {
    gateway: Arc<dyn MediaGateway>,
    session: Arc<SessionContext>,
}

impl DetailLoader {
    pub fn new(gateway: Arc<dyn MediaGateway>, session: Arc<SessionContext>) -> Self {
        Self { gateway, session }
    }

    /// Records the view and returns a channel that starts at the summary.
    pub fn open(&self, item: &MediaSummary) -> watch::Receiver<DetailView> {
        self.session.view(item);
        let (sender, receiver) = watch::channel(DetailView::Summary(item.clone()));

        let loader = self.clone();
        let item = item.clone();
        tokio::spawn(async move {
            let view = loader.enrich(item).await;
            if let DetailView::Full(_) = view {
                // Nobody listening means the view was closed first.
                let _ = sender.send(view);
            }
        });
        receiver
    }

    /// Records the view and waits for the full record.
    pub async fn load(&self, item: &MediaSummary) -> DetailView {
        self.session.view(item);
        self.enrich(item.clone()).await
    }

    /// Fetches a title by id, recording the view only when it exists.
    ///
    /// # Errors
    ///
    /// - `CatalogError` - The detail request failed
    pub async fn load_by_id(
        &self,
        id: &str,
        media_type: MediaType,
    ) -> Result<Option<MediaDetail>, CatalogError> {
        let detail = self.gateway.fetch_media_details(id, media_type).await?;
        if let Some(detail) = &detail {
            self.session.view(&detail.summary);
        }
        Ok(detail)
    }

    async fn enrich(&self, item: MediaSummary) -> DetailView {
        match self
            .gateway
            .fetch_media_details(&item.id, item.media_type)
            .await
        {
            Ok(Some(detail)) => DetailView::Full(Box::new(detail)),
            Ok(None) => {
                tracing::debug!(id = %item.id, "No detail record, keeping summary");
                DetailView::Summary(item)
            }
            Err(e) => {
                tracing::warn!(id = %item.id, error = %e, "Detail fetch failed, keeping summary");
                DetailView::Summary(item)
            }
        }
    }
}
