//! Priority normalization.

use zonegate_proto::RecordType;

use crate::error::{Result, ValidationError};

/// How a record type treats the priority field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityRule {
    /// Priority must be blank or zero and normalizes to 0.
    Unused,
    /// Priority is meaningful; blank yields `default`.
    Required {
        /// Value used when the priority is blank.
        default: u16,
    },
}

/// Returns the effective priority for a record of type `rtype`.
///
/// Only plain decimal digits are accepted, so `0.0` or `-0` never pass as
/// zero.
pub fn validate_priority(priority: Option<&str>, rule: PriorityRule, rtype: RecordType) -> Result<u16> {
    let priority = priority.map(str::trim).filter(|p| !p.is_empty());

    match (rule, priority) {
        (PriorityRule::Unused, None) => Ok(0),
        (PriorityRule::Required { default }, None) => Ok(default),
        (PriorityRule::Unused, Some(p)) => {
            let message = format!("Priority field for {rtype} records must be 0 or empty.");
            if !is_digits(p) {
                Err(ValidationError::syntax("priority", message))
            } else if p.bytes().all(|b| b == b'0') {
                Ok(0)
            } else {
                Err(ValidationError::range("priority", message))
            }
        }
        (PriorityRule::Required { .. }, Some(p)) => {
            if !is_digits(p) {
                return Err(ValidationError::syntax(
                    "priority",
                    format!("Invalid value for {rtype} priority. It should be a non-negative integer."),
                ));
            }
            p.parse::<u16>().map_err(|_| {
                ValidationError::range(
                    "priority",
                    format!("Invalid value for {rtype} priority. It must be between 0 and 65535."),
                )
            })
        }
    }
}

fn is_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}
