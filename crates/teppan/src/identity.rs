use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque key identifying one model variant.
///
/// An identity is what the prefix catalog is queried with and what every
/// per-variant lookup table inside the composite is keyed by. Two
/// requests belong to the same variant exactly when their identities
/// compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModelIdentity {
    name: String,
    version: u32,
    variant: Option<String>,
}

impl ModelIdentity {
    /// Creates an identity for a named model version.
    pub fn new(name: impl Into<String>, version: u32) -> Self {
        Self {
            name: name.into(),
            version,
            variant: None,
        }
    }

    /// Attaches a variant parameter string.
    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    /// The model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The model version.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// The variant parameters, if any.
    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }
}

impl fmt::Display for ModelIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.version)?;
        if let Some(variant) = &self.variant {
            write!(f, ":{variant}")?;
        }
        Ok(())
    }
}
