pub mod actions;
pub mod config;
pub mod output;
pub mod records;
pub mod scoring;
pub mod store;
