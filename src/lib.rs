pub mod auth;
pub mod config;
pub mod error;
pub mod filter;
pub mod import;
pub mod models;
pub mod report;
pub mod roster;
pub mod scoring;
pub mod stats;
