//! Typed shape of the YAML configuration file and its loader.
//!
//! Unknown keys are ignored, so a top-level `templates:` section can hold
//! shared YAML anchors without upsetting the loader.

use crate::backend::{Backend, BackendConfig};
use crate::errors::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let data = fs::read(path)?;
        Ok(serde_yaml::from_slice(&data)?)
    }

    /// Materialize and check every configured backend. Fails fast on the
    /// first inconsistency, or when no backend is configured at all.
    pub fn backends(self) -> Result<Vec<Backend>, ConfigError> {
        self.backend.backends()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Backend;
    use pretty_assertions::assert_eq;

    #[test]
    fn load_example() {
        let config = Config::load(Path::new("testdata/dns.yaml")).expect("example config");

        assert_eq!(config.backend.auto.len(), 1);
        assert_eq!(config.backend.geo.len(), 1);

        // The encode mapping keeps its file order.
        let auto = &config.backend.auto[0];
        let encoders: Vec<&str> = auto
            .encode
            .iter()
            .filter_map(|(name, _)| name.as_str())
            .collect();
        assert_eq!(encoders, vec!["eui64", "base32"]);

        assert_eq!(config.backend.geo[0].zones, vec!["geo.example.com"]);
    }

    #[test]
    fn backends_materialize() {
        let yaml = r#"
            backend:
              auto:
                - encode:
                    base32: {}
                  dns: [ns1.example.com]
                  answers:
                    "10.0.0.0/8":
                      zone: ip.example.com
        "#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        let backends = config.backends().unwrap();

        assert_eq!(backends.len(), 1);
        assert!(matches!(backends[0], Backend::Auto(_)));
    }

    #[test]
    fn no_backends() {
        let config: Config = serde_yaml::from_str("backend: {}").unwrap();
        assert!(matches!(config.backends(), Err(ConfigError::NoBackends)));
    }

    #[test]
    fn check_failures_propagate() {
        let yaml = r#"
            backend:
              auto:
                - encode:
                    base32: {}
                  answers: {}
        "#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(matches!(config.backends(), Err(ConfigError::NoUpstreams)));
    }
}
