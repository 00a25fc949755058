//! Home feed loading, see-all paging and new-content detection.

use std::sync::Arc;

use chrono::Utc;
use movos_browse::LoadOutcome;
use movos_browse::notifications::new_content_message;
use movos_catalog::{DemoGateway, Endpoint, FeedCategory, ScriptedGateway};
use movos_core::MediaType;
use movos_core::storage::{keys, save_json};
use movos_core::test_fixtures::summary;

use crate::common::{ids, launch};
