//! Provider configuration structures for the Caravel provisioning core.
//!
//! The configuration is read-only as far as this core is concerned: it is
//! loaded and validated by the embedding application and handed in by
//! reference.

use crate::types::{NetworkId, TemplateId, VdcId};
use serde::{Deserialize, Serialize};

/// Complete provider configuration consumed by the provisioning step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Virtual datacenter vApps are provisioned into.
    pub vdc_id: VdcId,
    /// Prefix for generated vApp names. Falls back to a fixed literal when
    /// unset.
    #[serde(default)]
    pub vapp_prefix: Option<String>,
    /// Catalog the machine templates come from.
    pub catalog: CatalogConfig,
    /// vApp network settings.
    pub network: NetworkSettings,
}

/// Catalog section: the templates machines are instantiated from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Catalog name, kept for diagnostics only.
    #[serde(default)]
    pub name: Option<String>,
    /// Templates in catalog order.
    ///
    /// Every machine is instantiated from the first entry; additional
    /// entries are accepted but not consulted.
    #[serde(default)]
    pub templates: Vec<CatalogTemplate>,
}

/// One template entry of the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogTemplate {
    /// Template name as listed in the catalog.
    pub name: String,
    /// Remote identifier of the template VM.
    pub id: TemplateId,
}

impl CatalogConfig {
    /// Get the first-listed template entry, if any.
    pub fn first_template(&self) -> Option<&CatalogTemplate> {
        self.templates.first()
    }
}

/// Network section of the provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSettings {
    /// Subnet for the vApp-private network, in CIDR form
    /// (e.g. `"10.10.0.0/24"`). Mutually exclusive with `bridge`.
    #[serde(default)]
    pub subnet: Option<String>,
    /// DNS entries, each in CIDR form; at most two are used.
    #[serde(default)]
    pub dns: Vec<String>,
    /// Organization network to attach to directly in bridged mode, skipping
    /// the edge gateway. Mutually exclusive with `subnet`.
    #[serde(default)]
    pub bridge: Option<NetworkId>,
    /// Parent organization network the vApp network connects through.
    pub parent_network: NetworkId,
}

impl ProviderConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?
            .try_deserialize()
    }
}
