//! Environment-driven configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use quotecraft_render::FontSource;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Listen address (`QUOTECRAFT_ADDR`, default `0.0.0.0:8080`).
    pub addr: SocketAddr,
    /// Optional font asset path (`QUOTECRAFT_FONT`); the renderer falls back
    /// to the built-in typeface if it is missing or unparseable.
    pub font: FontSource,
}

impl Config {
    pub fn from_env() -> Self {
        let addr = match std::env::var("QUOTECRAFT_ADDR") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(%raw, "invalid QUOTECRAFT_ADDR; using default");
                default_addr()
            }),
            Err(_) => default_addr(),
        };

        let font = std::env::var_os("QUOTECRAFT_FONT")
            .map(|p| FontSource::Path(PathBuf::from(p)))
            .unwrap_or_default();

        Self { addr, font }
    }
}

fn default_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}
