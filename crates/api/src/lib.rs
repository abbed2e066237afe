//! HTTP form boundary: session state, item entry, and PDF download.

pub mod app;
pub mod config;
