//! Common error infrastructure for loadout-core.
//!
//! Domain-specific errors (`FilterError`, `LoadoutError`, `ManagerError`,
//! `OracleError`) live next to the operations that produce them. This module
//! only provides the shared classification used by callers to decide whether
//! to retry, reject user input, or report a bug.
//!
//! Conditions the engine treats as *answers* rather than failures never show up
//! here: a filter asked about the wrong item kind returns `false`, a capability
//! missing on one side of a filter copy is skipped, and a zero carrying
//! capacity yields a ratio of `0.0`.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the same request may succeed after the caller changes
///   something unrelated (e.g. removes a tag first)
/// - **Validation**: invalid input, reject without retry
/// - **Internal**: registries out of sync with each other
/// - **Fatal**: a required collaborator is missing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Recoverable,
    Validation,
    Internal,
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all loadout-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
/// - Error codes are stable strings suitable for logs and tests
pub trait LoadoutFault: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
