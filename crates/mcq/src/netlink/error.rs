//! Error types for the attribute codec.

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while validating, encoding or decoding attributes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A rate value could not be converted.
    #[error("illegal \"maxrate\": {token}")]
    InvalidRate {
        /// The offending value token.
        token: String,
    },

    /// A time value could not be converted.
    #[error("illegal duration: {token}")]
    InvalidDuration {
        /// The offending value token.
        token: String,
    },

    /// A count value could not be converted.
    #[error("illegal \"{option}\": {token}")]
    InvalidNumber {
        /// The option keyword.
        option: &'static str,
        /// The offending value token.
        token: String,
    },

    /// The keyword is not a known option.
    #[error("unrecognized option: {token}")]
    UnrecognizedOption {
        /// The offending keyword token.
        token: String,
    },

    /// The keyword was the last token and its value is missing.
    #[error("missing value for \"{option}\"")]
    MissingValue {
        /// The option keyword.
        option: &'static str,
    },

    /// An attribute header declares a length the buffer cannot hold.
    #[error(
        "truncated attribute at offset {offset}: declared {declared} bytes, {remaining} remaining"
    )]
    TruncatedAttribute {
        /// Offset of the attribute header within the block.
        offset: usize,
        /// Length from the attribute header.
        declared: usize,
        /// Bytes left in the block at that offset.
        remaining: usize,
    },

    /// Encoding would overflow the output bound.
    #[error("attribute block capacity exceeded: need {needed} bytes, capacity {capacity}")]
    CapacityExceeded {
        /// Total bytes the block would need.
        needed: usize,
        /// Maximum block size.
        capacity: usize,
    },

    /// `nest_end`/`finish` called without a matching `nest_start`.
    #[error("unbalanced nested attribute")]
    UnbalancedNest,

    /// Invalid attribute format.
    #[error("invalid attribute: {0}")]
    InvalidAttribute(String),

    /// Parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl Error {
    /// Check if this error came from option validation.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidRate { .. }
                | Self::InvalidDuration { .. }
                | Self::InvalidNumber { .. }
                | Self::UnrecognizedOption { .. }
                | Self::MissingValue { .. }
        )
    }

    /// Check if this is a malformed length in received data.
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::TruncatedAttribute { .. })
    }

    /// Get the offending token, if the error carries one.
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::InvalidRate { token }
            | Self::InvalidDuration { token }
            | Self::InvalidNumber { token, .. }
            | Self::UnrecognizedOption { token } => Some(token),
            _ => None,
        }
    }
}
