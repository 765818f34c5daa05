//! Answer backends.
//!
//! A backend is configured once, validated and materialized by `check()`,
//! and then answers queries without touching mutable state. The two kinds
//! are a closed set, so dispatch is a plain `match` rather than a trait
//! object.

mod auto;
mod geo;
mod record;

pub use self::auto::{AutoAnswer, AutoBackend};
pub use self::geo::GeoBackend;
pub use self::record::{Record, Soa};

use crate::errors::ConfigError;
use crate::types::Message;
use serde::Deserialize;

/// The two answer sources: algorithmic forward/reverse mapping, and
/// GeoIP-selected preconfigured records.
pub enum Backend {
    Auto(AutoBackend),
    Geo(GeoBackend),
}

impl Backend {
    /// One-shot startup validation and materialization. A backend that does
    /// not check refuses the whole process.
    pub fn check(&mut self) -> Result<(), ConfigError> {
        match self {
            Backend::Auto(backend) => backend.check(),
            Backend::Geo(backend) => backend.check(),
        }
    }

    /// Answer a single query. Pure apart from the GeoIP oracle; a query
    /// that matches nothing yields an empty list, never an error.
    pub fn query(&self, message: &Message) -> Vec<Message> {
        match self {
            Backend::Auto(backend) => backend.query(message),
            Backend::Geo(backend) => backend.query(message),
        }
    }
}

/// The `backend:` section of the configuration file.
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub auto: Vec<AutoBackend>,
    pub geo: Vec<GeoBackend>,
}

impl BackendConfig {
    /// Check every configured backend and hand back the dispatch list, auto
    /// backends first, each group in file order.
    pub fn backends(self) -> Result<Vec<Backend>, ConfigError> {
        let mut backends: Vec<Backend> = Vec::new();
        backends.extend(self.auto.into_iter().map(Backend::Auto));
        backends.extend(self.geo.into_iter().map(Backend::Geo));

        if backends.is_empty() {
            return Err(ConfigError::NoBackends);
        }

        for backend in &mut backends {
            backend.check()?;
        }

        Ok(backends)
    }
}
