//! Remote identifier types used throughout the Caravel provisioning core.
//!
//! All identifiers are opaque strings assigned by the cloud endpoint
//! (vCloud-style URNs or hrefs). They are newtyped so that a task id can
//! never be passed where a vApp id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! remote_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Create an identifier from its string form.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the inner string representation.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }
    };
}

remote_id! {
    /// Identifier of a vApp inside a virtual datacenter.
    VAppId
}

remote_id! {
    /// Identifier of a single VM inside a vApp.
    VmId
}

remote_id! {
    /// Identifier of an asynchronous remote task.
    TaskId
}

remote_id! {
    /// Identifier of a catalog template a VM is instantiated from.
    TemplateId
}

remote_id! {
    /// Identifier of the virtual datacenter vApps are provisioned into.
    VdcId
}

remote_id! {
    /// Identifier of an organization network (parent or bridge target).
    NetworkId
}
