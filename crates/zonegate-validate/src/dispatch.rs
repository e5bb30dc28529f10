//! Validator lookup and the per-record pipeline.

use tracing::{debug, trace};
use zonegate_config::DnsConfig;
use zonegate_proto::RecordType;

use crate::error::{Result, ValidationError};
use crate::priority::validate_priority;
use crate::record::{RecordInput, ValidatedRecord};
use crate::records::{grammar_for, Context, Grammar};
use crate::ttl::validate_ttl;

/// A validator for one record type.
pub trait RecordValidator: Send + Sync {
    /// The record type this validator checks.
    fn record_type(&self) -> RecordType;

    /// Validates a candidate record.
    ///
    /// Stops at the first failing check and returns that error.
    fn validate(&self, input: &RecordInput<'_>) -> Result<ValidatedRecord>;
}

/// Table-driven validator bound to a configuration.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'c> {
    rtype: RecordType,
    grammar: Grammar,
    config: &'c DnsConfig,
}

impl<'c> Validator<'c> {
    /// Creates a validator for `rtype`.
    ///
    /// Fails with [`ValidationError::UnsupportedType`] for meta, query and
    /// obsolete types.
    pub fn new(rtype: RecordType, config: &'c DnsConfig) -> Result<Self> {
        let grammar = grammar_for(rtype).ok_or(ValidationError::UnsupportedType { rtype })?;
        Ok(Self {
            rtype,
            grammar,
            config,
        })
    }

    fn run(&self, input: &RecordInput<'_>) -> Result<ValidatedRecord> {
        let rtype = self.rtype;
        let name = self.grammar.owner.check(rtype, self.config, input.name)?;

        let content = input.content;
        if content.trim().is_empty() {
            return Err(ValidationError::structure(
                "content",
                format!("{rtype} record content cannot be empty."),
            ));
        }
        let max = self.config.max_content_length;
        if content.len() > max {
            return Err(ValidationError::structure(
                "content",
                format!("{rtype} record content exceeds the maximum length of {max} characters."),
            ));
        }

        let ctx = Context {
            rtype,
            config: self.config,
        };
        let fields = (self.grammar.content)(&ctx, content)?;

        let ttl = validate_ttl(input.ttl, input.default_ttl)?;
        let prio = validate_priority(input.priority, self.grammar.priority, rtype)?;

        Ok(ValidatedRecord {
            rtype,
            name,
            content: content.to_string(),
            ttl,
            prio,
            fields,
        })
    }
}

impl RecordValidator for Validator<'_> {
    fn record_type(&self) -> RecordType {
        self.rtype
    }

    fn validate(&self, input: &RecordInput<'_>) -> Result<ValidatedRecord> {
        trace!(rtype = %self.rtype, name = input.name, "validating record");

        let result = self.run(input);
        if let Err(err) = &result {
            debug!(
                rtype = %self.rtype,
                name = input.name,
                kind = ?err.kind(),
                field = err.field(),
                error = %err,
                "record rejected"
            );
        }
        result
    }
}

/// Returns the validator for a record type mnemonic, ignoring case.
///
/// Unknown mnemonics fail with [`ValidationError::UnknownType`]; known
/// types without a grammar fail with [`ValidationError::UnsupportedType`].
pub fn for_type<'c>(identifier: &str, config: &'c DnsConfig) -> Result<Validator<'c>> {
    let rtype = RecordType::from_mnemonic(identifier.trim()).ok_or_else(|| ValidationError::UnknownType {
        mnemonic: identifier.to_string(),
    })?;
    Validator::new(rtype, config)
}

/// Validates one record of the type named by `identifier`.
pub fn validate(identifier: &str, input: &RecordInput<'_>, config: &DnsConfig) -> Result<ValidatedRecord> {
    for_type(identifier, config)?.validate(input)
}

/// Returns every record type that has a validator, in type code order.
pub fn supported_types() -> Vec<RecordType> {
    let mut types: Vec<_> = RecordType::ALL
        .iter()
        .copied()
        .filter(|t| grammar_for(*t).is_some())
        .collect();
    types.sort_by_key(|t| t.to_u16());
    types
}

/// Returns true if `rtype` has a validator.
pub fn is_supported(rtype: RecordType) -> bool {
    grammar_for(rtype).is_some()
}
