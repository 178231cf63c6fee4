// Job portal client - library root

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http_client;
pub mod middleware;
pub mod models;

pub use client::PortalClient;
pub use error::{ClientError, RefreshFailure, Result};
