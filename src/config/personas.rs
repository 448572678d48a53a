//! Persona catalog configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Persona catalog configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PersonaConfig {
    /// Path to the persona catalog YAML file
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,
}

impl PersonaConfig {
    /// Validate persona configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.catalog_path.is_empty() {
            return Err(ValidationError::MissingRequired("PERSONAS_CATALOG_PATH"));
        }
        if !self.catalog_path.ends_with(".yaml") && !self.catalog_path.ends_with(".yml") {
            return Err(ValidationError::InvalidCatalogPath);
        }
        Ok(())
    }
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
        }
    }
}

fn default_catalog_path() -> String {
    "personas.yaml".to_string()
}
