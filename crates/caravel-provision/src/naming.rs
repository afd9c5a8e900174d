//! Unique vApp naming and descriptions.
//!
//! vApp names must be distinct per invocation so that concurrent runs on
//! different workstations (or repeated runs on one) never collide on the
//! endpoint. The name encodes who provisioned from where, plus a random
//! suffix.

use uuid::Uuid;

/// Prefix used when the configuration does not set one.
pub const DEFAULT_VAPP_PREFIX: &str = "Caravel";

/// Build a globally distinct vApp name:
/// `<prefix>-<local user>-<lowercased hostname>-<8 hex digits>`.
pub fn vapp_name(prefix: Option<&str>) -> String {
    format!(
        "{}-{}-{}-{}",
        prefix.unwrap_or(DEFAULT_VAPP_PREFIX),
        local_user(),
        local_hostname(),
        random_suffix()
    )
}

/// Build the vApp description shown in the endpoint's UI.
pub fn vapp_description() -> String {
    format!(
        "vApp created by {} running on {} using caravel on {}",
        local_user(),
        local_hostname(),
        chrono::Local::now().format("%B %d, %Y")
    )
}

fn random_suffix() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

fn local_user() -> String {
    std::env::var("USER").unwrap_or_else(|_| "unknown".to_string())
}

fn local_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "localhost".to_string())
        .to_lowercase()
}
