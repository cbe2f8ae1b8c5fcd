//! Integration tests for Archive-Harvest
//!
//! These tests run the crawl loop end-to-end against wiremock servers and
//! temporary output directories.

mod harvest_tests;
