//! Errors raised while parsing transform rules.

use alloc::string::String;
use thiserror::Error;

/// Errors raised by the [`FromStr`](core::str::FromStr) implementations in
/// [`rules`](crate::rules).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleParseError {
    /// A rule does not contain the `=` between source and destination.
    #[error("Rule `{0}` has no `=` between source and destination")]
    MissingSeparator(String),

    /// A side of a rule (or a keyword in it) is empty.
    #[error("Rule `{0}` contains an empty keyword")]
    EmptyKeyword(String),

    /// The keyword is not a file format, image format, palette format or condition.
    #[error("Unknown keyword: {0}")]
    UnknownKeyword(String),

    /// A condition keyword was used on the destination side.
    #[error("Keyword {0} can only be used on the source side")]
    ConditionInDestination(String),

    /// Two keywords on the same side set the same field.
    #[error("Keyword {keyword} sets the {field} a second time")]
    DuplicateField {
        /// Field that was already set
        field: &'static str,
        /// Keyword that tried to set it again
        keyword: String,
    },
}
