//! Hostname syntax checks.
//!
//! Owner names and every name embedded in record content go through
//! [`HostnameValidator`]. Labels follow RFC 1035 with the RFC 2181
//! relaxations the configuration allows.

use smallvec::SmallVec;
use zonegate_config::HostnamePolicy;
use zonegate_proto::{MAX_HOSTNAME_LENGTH, MAX_LABEL_LENGTH};

use crate::error::{Result, ValidationError};

/// Reverse zones where RFC 2317 classless delegation labels (`0/26`) appear.
const REVERSE_SUFFIXES: [&str; 2] = ["in-addr.arpa", "ip6.arpa"];

/// Validates hostnames against a [`HostnamePolicy`].
#[derive(Debug, Clone, Copy)]
pub struct HostnameValidator<'c> {
    policy: &'c HostnamePolicy,
    underscore: bool,
}

impl<'c> HostnameValidator<'c> {
    /// Creates a validator for the given policy.
    pub fn new(policy: &'c HostnamePolicy) -> Self {
        Self {
            policy,
            underscore: policy.allow_underscore,
        }
    }

    /// Accepts labels starting with `_` regardless of the policy.
    ///
    /// Service-style owners (`_sip._tcp.example.com`) need this.
    #[must_use]
    pub fn allow_underscore(mut self, allow: bool) -> Self {
        self.underscore = self.policy.allow_underscore || allow;
        self
    }

    /// Validates `name` and returns it without its trailing dot.
    ///
    /// `allow_wildcard` permits a leading `*` label when the policy also
    /// allows wildcards.
    pub fn validate(&self, name: &str, allow_wildcard: bool) -> Result<String> {
        let name = name.trim();
        let host = name.strip_suffix('.').unwrap_or(name);

        if host.is_empty() {
            return Err(ValidationError::structure(
                "name",
                "Hostname cannot be empty.",
            ));
        }

        if host.len() > MAX_HOSTNAME_LENGTH {
            return Err(ValidationError::range(
                "name",
                format!("Hostname exceeds the maximum length of {MAX_HOSTNAME_LENGTH} characters."),
            ));
        }

        let labels: SmallVec<[&str; 8]> = host.split('.').collect();
        if labels.iter().any(|l| l.is_empty()) {
            return Err(ValidationError::structure(
                "name",
                format!("Hostname '{host}' contains an empty label."),
            ));
        }

        let lower = host.to_ascii_lowercase();
        let classless = REVERSE_SUFFIXES.iter().any(|suffix| {
            lower
                .strip_suffix(suffix)
                .is_some_and(|rest| rest.is_empty() || rest.ends_with('.'))
        });

        for (i, label) in labels.iter().enumerate() {
            if *label == "*" {
                if i != 0 {
                    return Err(ValidationError::syntax(
                        "name",
                        "A wildcard is only allowed as the first label of a hostname.",
                    ));
                }
                if !(allow_wildcard && self.policy.allow_wildcard) {
                    return Err(ValidationError::syntax(
                        "name",
                        "Wildcard hostnames are not allowed here.",
                    ));
                }
                continue;
            }
            self.check_label(label, classless)?;
        }

        if self.policy.top_level_tld_check && labels.len() == 1 {
            return Err(ValidationError::syntax(
                "name",
                format!("Hostname '{host}' must not be a top-level domain."),
            ));
        }

        if self.policy.strict_tld_check {
            // Reverse zones end in arpa, which no TLD list is expected to carry.
            let tld = labels[labels.len() - 1];
            if !classless && !self.policy.is_valid_tld(tld) {
                return Err(ValidationError::syntax(
                    "name",
                    format!("'{tld}' is not a valid top-level domain."),
                ));
            }
        }

        Ok(host.to_string())
    }

    fn check_label(&self, label: &str, classless: bool) -> Result<()> {
        if label.len() > MAX_LABEL_LENGTH {
            return Err(ValidationError::range(
                "name",
                format!("Label '{label}' exceeds the maximum length of {MAX_LABEL_LENGTH} characters."),
            ));
        }

        let body = match label.strip_prefix('_') {
            Some(rest) if self.underscore => rest,
            Some(_) => {
                return Err(ValidationError::syntax(
                    "name",
                    format!("Label '{label}' must not start with an underscore."),
                ))
            }
            None => label,
        };

        if body.starts_with('-') || body.ends_with('-') {
            return Err(ValidationError::syntax(
                "name",
                format!("Label '{label}' must not start or end with a hyphen."),
            ));
        }

        let mut slashes = 0;
        for c in body.chars() {
            match c {
                'a'..='z' | 'A'..='Z' | '0'..='9' | '-' => {}
                '/' if classless => slashes += 1,
                _ => {
                    return Err(ValidationError::syntax(
                        "name",
                        format!("Label '{label}' contains an invalid character '{c}'."),
                    ))
                }
            }
        }

        if slashes > 1 || body.starts_with('/') || body.ends_with('/') {
            return Err(ValidationError::syntax(
                "name",
                format!("Label '{label}' is not a valid classless delegation label."),
            ));
        }

        if body.is_empty() {
            return Err(ValidationError::syntax(
                "name",
                format!("Label '{label}' has nothing after the underscore."),
            ));
        }

        Ok(())
    }
}
