//! Integration tests for folder tracking, the document store and staging

mod cli_commands;
mod staging_pipeline;
mod state_store;
mod tracked_folder;
mod tree_scan;
