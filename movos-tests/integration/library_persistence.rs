//! Saved titles, recently viewed and accounts across restarts.

use std::sync::Arc;

use movos_catalog::ScriptedGateway;
use movos_core::library::RECENTLY_VIEWED_LIMIT;
use movos_core::test_fixtures::summary;
use movos_core::{MediaType, Preferences, SaveToggle};

use crate::common::{ids, launch};
