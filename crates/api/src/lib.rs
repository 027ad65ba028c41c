//! HTTP client for the taskdeck REST API. Implements the gateway traits from
//! `taskdeck-core` on top of reqwest; everything above this crate stays
//! transport-agnostic.

mod categories;
mod client;
mod notes;
mod tasks;

pub use client::ApiClient;
