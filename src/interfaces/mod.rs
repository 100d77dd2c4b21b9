//! Inbound adapters: CSV seeding and the HTTP API.

pub mod csv;
pub mod http;
