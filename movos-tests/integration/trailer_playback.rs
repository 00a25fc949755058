//! Opening titles, trailer resolution and the player.

use std::sync::Arc;

use movos_browse::{DetailView, HeadlessPlatform, PlaybackController, TrailerUrls};
use movos_catalog::{DemoGateway, Endpoint, ScriptedGateway};
use movos_core::test_fixtures::summary;
use movos_core::{MediaType, TrailerResolution};

use crate::common::launch;
