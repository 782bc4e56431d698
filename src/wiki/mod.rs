// src/wiki/mod.rs
// =============================================================================
// This module talks to Wikipedia.
//
// Submodules:
// - fetch: the MediaWiki Action API client and the FetchPage trait
//
// The rest of the application only ever sees the FetchPage trait and the
// Page struct; how the links are actually obtained (API calls, pagination,
// auto-suggest) stays private to this module.
// =============================================================================

mod fetch;

// Re-export the public API
pub use fetch::{FetchPage, Page, WikiClient};
