//! Search suggestions, submission, history and result paging.

use std::sync::Arc;
use std::time::Duration;

use movos_browse::{LoadOutcome, SearchPhase, Tab};
use movos_catalog::{DemoGateway, Endpoint, ScriptedGateway};

use crate::common::{ids, launch};
