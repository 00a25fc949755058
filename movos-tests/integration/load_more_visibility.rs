//! Which list "load more" extends as the user moves between screens.

use std::sync::Arc;

use movos_browse::{LoadMoreContext, LoadOutcome, ScrollMetrics, Tab};
use movos_catalog::{DiscoveryGenre, Endpoint, FeedCategory, ScriptedGateway};

use crate::common::launch;

const NEAR_END: ScrollMetrics = ScrollMetrics {
    scroll_top: 1450.0,
    viewport_height: 600.0,
    content_height: 2200.0,
};

const FAR_FROM_END: ScrollMetrics = ScrollMetrics {
    scroll_top: 0.0,
    viewport_height: 600.0,
    content_height: 2200.0,
};
