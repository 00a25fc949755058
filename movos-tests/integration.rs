//! Integration tests for Movos
//!
//! These tests drive the browser the way a front end would: through
//! `Browser` with a scripted or demo gateway and a real preference file.

#[path = "integration/common.rs"]
mod common;

#[path = "integration/home_feeds.rs"]
mod home_feeds;
#[path = "integration/search_workflow.rs"]
mod search_workflow;
#[path = "integration/library_persistence.rs"]
mod library_persistence;
#[path = "integration/load_more_visibility.rs"]
mod load_more_visibility;
#[path = "integration/trailer_playback.rs"]
mod trailer_playback;
