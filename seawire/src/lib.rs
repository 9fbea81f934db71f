// Library interface for seawire modules
// This allows tests and the binary to import modules

pub mod cache;
pub mod categorize;
pub mod fetcher;
pub mod ingestion;
pub mod models;
pub mod server;
