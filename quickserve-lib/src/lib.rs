//! Client library behind the quickServe admin front ends.
//!
//! [`Client`] wires the REST API, the shared [`QueryCache`](cache::QueryCache) and the
//! notification queue together. The [`workflow`] module holds the toolkit independent screen
//! state that the CLI and GUI drive.

use thiserror::Error;

pub mod api;
pub mod cache;
pub mod config;
pub mod data;
pub mod demo;
pub mod fs;
pub mod models;
pub mod notify;
pub mod service_data;
pub mod workflow;

mod client;

pub use client::Client;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] api::ApiError),
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Query(#[from] data::QueryError),
}
