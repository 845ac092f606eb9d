//! Errors raised by the A2UI core.
//!
//! Rendering itself never fails: misses fall back to defaults and unknown
//! components render a placeholder. Only configuration mistakes are errors.

/// A rejected configuration or protocol definition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The `default` namespace cannot be created or reset explicitly
    #[error("cannot create or reset reserved namespace \"{0}\"")]
    ReservedNamespace(String),

    /// A component definition that does not have the `{ "<Type>": {..} }` shape
    #[error("invalid component definition: {0}")]
    InvalidComponent(String),
}
