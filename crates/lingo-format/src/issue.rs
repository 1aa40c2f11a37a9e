#![forbid(unsafe_code)]

//! Problems recovered during a render.
//!
//! No issue aborts a render. Each one is logged when it happens, most
//! leave a visible marker in the output in place of the directive that
//! failed, and all of them are returned with the text so callers and
//! tests can inspect what went wrong.

use lingo_core::{ParamKind, StringId};

/// Marker for a directive that could not be parsed.
pub const INVALID_COMMAND: &str = "(invalid command)";
/// Marker for a parameter slot that is unset or out of range.
pub const MISSING_PARAMETER: &str = "(missing parameter)";
/// Marker for a parameter with the wrong tag.
pub const INVALID_PARAMETER: &str = "(invalid parameter)";
/// Marker for a value that cannot be displayed.
pub const INVALID_VALUE: &str = "(invalid value)";
/// Marker for a sub-string that nests too deeply.
pub const RECURSION_LIMIT: &str = "(recursion limit)";
/// Marker for a script string that asks for more parameters than exist.
pub const TOO_MANY_PARAMETERS: &str = "(too many parameters)";

/// A recovered render problem.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderIssue {
    /// The output hit its bound. The text is a valid prefix.
    #[error("output truncated at {limit} bytes")]
    BufferTruncated { limit: usize },

    /// No template exists for the identifier; the placeholder was used.
    #[error("unknown string {id}")]
    UnknownStringIdentifier { id: StringId },

    /// A directive found a parameter with a different tag than it needs.
    #[error("parameter {index}: expected {expected}, found {found}")]
    ParameterTagMismatch {
        index: usize,
        expected: ParamKind,
        found: ParamKind,
    },

    /// A directive read a slot that is unset or past the stack.
    #[error("parameter {index} is missing")]
    ParameterMissing { index: usize },

    /// Sub-strings nested past the configured limit.
    #[error("string {id} nested past depth {depth}")]
    RecursionLimitExceeded { id: StringId, depth: usize },

    /// The active language lacks the string; the base language's was used.
    #[error("string {id} is not translated to {isocode}")]
    MissingTranslation { id: StringId, isocode: String },

    /// A directive that could not be interpreted.
    #[error("malformed directive {directive}")]
    MalformedDirective {
        directive: String,
        marker: &'static str,
    },

    /// A script string referenced a string scripts may not use.
    #[error("string {id} is not available to scripts")]
    ScriptRestricted { id: StringId },

    /// A parameter holds a value the directive cannot display.
    #[error("parameter {index} holds a value out of range")]
    ValueOutOfRange { index: usize },
}

impl RenderIssue {
    /// Text left in the output in place of the failed directive.
    #[must_use]
    pub fn marker(&self) -> Option<&'static str> {
        match self {
            Self::BufferTruncated { .. }
            | Self::UnknownStringIdentifier { .. }
            | Self::MissingTranslation { .. }
            | Self::ScriptRestricted { .. } => None,
            Self::ParameterTagMismatch { .. } => Some(INVALID_PARAMETER),
            Self::ParameterMissing { .. } => Some(MISSING_PARAMETER),
            Self::RecursionLimitExceeded { .. } => Some(RECURSION_LIMIT),
            Self::MalformedDirective { marker, .. } => Some(*marker),
            Self::ValueOutOfRange { .. } => Some(INVALID_VALUE),
        }
    }

    /// Whether the issue points at broken template or script data, as
    /// opposed to an expected degradation.
    #[must_use]
    pub const fn is_bad_data(&self) -> bool {
        matches!(
            self,
            Self::UnknownStringIdentifier { .. }
                | Self::RecursionLimitExceeded { .. }
                | Self::MalformedDirective { .. }
                | Self::ScriptRestricted { .. }
        )
    }

    /// Short stable name, used as a log field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::BufferTruncated { .. } => "buffer_truncated",
            Self::UnknownStringIdentifier { .. } => "unknown_string",
            Self::ParameterTagMismatch { .. } => "tag_mismatch",
            Self::ParameterMissing { .. } => "parameter_missing",
            Self::RecursionLimitExceeded { .. } => "recursion_limit",
            Self::MissingTranslation { .. } => "missing_translation",
            Self::MalformedDirective { .. } => "malformed_directive",
            Self::ScriptRestricted { .. } => "script_restricted",
            Self::ValueOutOfRange { .. } => "value_out_of_range",
        }
    }
}

impl From<lingo_core::ParamError> for RenderIssue {
    fn from(err: lingo_core::ParamError) -> Self {
        use lingo_core::ParamError;
        match err {
            ParamError::OutOfRange { index, .. } | ParamError::Unset { index } => {
                Self::ParameterMissing { index }
            }
            ParamError::TypeMismatch {
                index,
                expected,
                found,
            } => Self::ParameterTagMismatch {
                index,
                expected,
                found,
            },
        }
    }
}
