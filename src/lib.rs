//! Upload Tracker: document folder tracking and staging
//!
//! Remembers one tracked folder, finds its most recently modified subfolder and
//! the office documents inside it, records their conversion status, and stages
//! them into a fresh `SOURCE/{NATIVE,PDF}` tree for downstream conversion.

pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod props;
pub mod resolver;
pub mod staging;
pub mod store;
pub mod tooling;
pub mod tree;
pub mod types;
pub mod upload;
