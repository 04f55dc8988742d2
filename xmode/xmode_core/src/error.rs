//! Error types for xmode.
//!
//! The root error type, `Error`, covers the four failure classes the
//! permission operations can produce (a missing path, a malformed mode
//! argument, a failure of the platform ACL subsystem, an identity that cannot
//! be resolved) plus the ambient I/O and configuration failures. Errors are
//! never retried; they surface to the caller as-is.

use std::path::PathBuf;

use thiserror::Error;

/// Root error type for xmode.
#[derive(Debug, Error)]
pub enum Error {
    /// The path does not exist. Raised before any mutation is attempted.
    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A mode argument could not be parsed
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// The platform access-control subsystem failed
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// An access-control entry names an identity that no longer resolves.
    ///
    /// This is informational on the read path: translators report it and
    /// carry on with the remaining entries.
    #[error("Unresolved identity: {0}")]
    UnresolvedIdentity(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The operation has no implementation on this platform
    #[error("Not supported on this platform: {0}")]
    Unsupported(String),
}

/// Errors raised while parsing mode arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// A clause of a symbolic expression does not match `[ugoa]*[-+=][rwx]*`
    #[error("bad format of symbolic clause '{clause}' in '{expression}'")]
    MalformedClause {
        /// The full expression being evaluated
        expression: String,

        /// The offending clause
        clause: String,
    },

    /// Text that should be an octal number is not one
    #[error("invalid octal mode '{0}'")]
    InvalidOctal(String),

    /// A numeric mode has bits set above the nine permission bits
    #[error("mode {0:#o} is outside the range 0..=0o777")]
    OutOfRange(u32),

    /// A fixed-length mode string has the wrong number of characters
    #[error("mode string '{value}' must be {expected} characters long, got {actual}")]
    WrongLength {
        /// The string as given
        value: String,

        /// Required length
        expected: usize,

        /// Length found
        actual: usize,
    },

    /// A fixed-length mode string has an unexpected character
    #[error("invalid character '{found}' at position {position} of mode string '{value}'")]
    InvalidCharacter {
        /// The string as given
        value: String,

        /// Zero-based character position
        position: usize,

        /// The character found there
        found: char,
    },
}

/// Errors raised by the platform access-control subsystem.
#[derive(Debug, Error)]
pub enum TranslationError {
    /// Reading the security descriptor of an object failed
    #[error("failed to read security descriptor of {}: {reason}", path.display())]
    ReadFailed {
        /// Object whose descriptor was read
        path: PathBuf,

        /// Platform-specific reason
        reason: String,
    },

    /// Committing a replacement entry list failed
    #[error("failed to write security descriptor of {}: {reason}", path.display())]
    WriteFailed {
        /// Object whose descriptor was written
        path: PathBuf,

        /// Platform-specific reason
        reason: String,
    },

    /// An account name could not be turned into an identity
    #[error("failed to look up account '{account}': {reason}")]
    AccountLookupFailed {
        /// Account name that was looked up
        account: String,

        /// Platform-specific reason
        reason: String,
    },
}

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type used throughout xmode.
pub type Result<T> = std::result::Result<T, Error>;
