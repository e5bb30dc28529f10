//! Hostname policy configuration.
//!
//! These knobs relax or tighten the owner-name and target-name checks that
//! every record validator runs.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Result};

/// Hostname acceptance policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostnamePolicy {
    /// Accept labels starting with `_` for every record type, not only the
    /// service-style types (SRV, TLSA, ...) that always allow them.
    pub allow_underscore: bool,

    /// Accept a leading `*` label where the record type permits it.
    pub allow_wildcard: bool,

    /// Reject single-label names such as `com`.
    pub top_level_tld_check: bool,

    /// Require the last label to appear in `valid_tlds`.
    pub strict_tld_check: bool,

    /// Top-level domains accepted when `strict_tld_check` is enabled.
    pub valid_tlds: Vec<String>,
}

impl Default for HostnamePolicy {
    fn default() -> Self {
        Self {
            allow_underscore: false,
            allow_wildcard: true,
            top_level_tld_check: false,
            strict_tld_check: false,
            valid_tlds: Vec::new(),
        }
    }
}

impl HostnamePolicy {
    /// Returns true if `tld` is in the configured list, ignoring case.
    pub fn is_valid_tld(&self, tld: &str) -> bool {
        self.valid_tlds.iter().any(|t| t.eq_ignore_ascii_case(tld))
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.strict_tld_check && self.valid_tlds.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "dns.hostname.valid_tlds".to_string(),
                message: "must not be empty when strict_tld_check is enabled".to_string(),
            });
        }

        if let Some(bad) = self
            .valid_tlds
            .iter()
            .find(|t| t.is_empty() || t.contains('.'))
        {
            return Err(ConfigError::InvalidValue {
                field: "dns.hostname.valid_tlds".to_string(),
                message: format!("'{bad}' is not a single label"),
            });
        }

        Ok(())
    }
}
