//! # Highlights Library
//!
//! Core functionality for the football highlights service: feed ingestion,
//! entity mapping, cached listings, and the HTTP surface on top of them.

pub mod auth;
pub mod cache;
pub mod checksum;
pub mod config;
pub mod db;
pub mod error;
pub mod feed;
pub mod handlers;
pub mod ingestion;
pub mod listing;
pub mod mapping;
pub mod models;
pub mod repositories;
pub mod scheduler;
pub mod seeds;
pub mod server;
pub mod slug;
pub mod telemetry;
pub use migration;
