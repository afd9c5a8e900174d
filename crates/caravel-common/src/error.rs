//! Error types for the Caravel provisioning core.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Caravel provisioning core.
#[derive(Error, Debug)]
pub enum Error {
    /// The network settings cannot produce a usable plan (malformed CIDR,
    /// subnet too small, or conflicting subnet + bridge configuration).
    /// Detected before any remote call is made.
    #[error("invalid network configuration: {0}")]
    InvalidNetworkConfig(String),

    /// A compose or recompose task terminated with an error, or a vApp
    /// lookup that must succeed right after a completed task returned
    /// nothing. Carries the remote error text where available.
    #[error("vApp composition failed: {0}")]
    ComposeVApp(String),

    /// The fetched vApp does not list a VM under the machine's name.
    #[error("VM '{vm_name}' not found in vApp '{vapp_name}'")]
    VmNotFound {
        /// Name the VM was composed under.
        vm_name: String,
        /// Name of the vApp that was searched.
        vapp_name: String,
    },

    /// Invalid provider configuration (e.g. an empty catalog).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Transport-level failure reported by the cloud driver.
    #[error("cloud driver error: {0}")]
    Remote(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Check if this error was raised before any remote call was issued.
    ///
    /// Such failures leave no partial remote state behind.
    pub fn is_preflight(&self) -> bool {
        matches!(
            self,
            Error::InvalidNetworkConfig(_) | Error::InvalidConfig(_)
        )
    }

    /// Check if this error surfaced from the remote endpoint, in which case
    /// a partially built vApp may have been left behind.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Error::ComposeVApp(_) | Error::VmNotFound { .. } | Error::Remote(_)
        )
    }
}
