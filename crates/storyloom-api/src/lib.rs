//! Storyloom HTTP API: configuration, error mapping, shared state and routes.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
