//! Loadable registry configuration.
//!
//! ```json
//! {
//!   "namespaces": {
//!     "tenant-a": { "fallbackNamespace": "shared" },
//!     "shared": {},
//!     "sandbox": { "autoFallback": false }
//!   }
//! }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::registry::NamespaceConfig;

/// Namespaces to create, applied in file order by
/// [`super::ComponentRegistry::apply_config`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryConfig {
    #[serde(default)]
    pub namespaces: IndexMap<String, NamespaceConfig>,
}

impl RegistryConfig {
    /// Parse a configuration from JSON text
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let config = RegistryConfig::from_json(
            r#"{"namespaces": {"b": {"autoFallback": false}, "a": {"fallbackNamespace": "b"}}}"#,
        )
        .unwrap();

        let names: Vec<&String> = config.namespaces.keys().collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(config.namespaces["b"].auto_fallback, Some(false));
        assert_eq!(config.namespaces["a"].fallback_namespace.as_deref(), Some("b"));
    }

    #[test]
    fn test_empty_config() {
        let config = RegistryConfig::from_json("{}").unwrap();
        assert!(config.namespaces.is_empty());
    }
}
