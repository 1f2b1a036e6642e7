//! Error types for Kairn.
//!
//! `KernelError` is returned by every use case and repository port. Each
//! variant belongs to exactly one [`ErrorKind`] so callers can decide whether
//! to fix their input, retry, or treat the failure as fatal. Storage-level
//! failures are wrapped in [`StorageError`].
//!
//! Integrity findings from audit verification are not errors; they are
//! reported through `VerifyAuditReport`.

use std::fmt;

use thiserror::Error;

use crate::enums::SidecarKind;

// ---------------------------------------------------------------------------
// ErrorKind
// ---------------------------------------------------------------------------

/// Coarse classification of a [`KernelError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad input. The caller must correct it; never retried automatically.
    Validation,
    /// A referenced unit or version does not exist.
    NotFound,
    /// Stale optimistic-lock token or duplicate key. Re-read and retry.
    Conflict,
    /// A use case was wired without a required collaborator.
    Configuration,
    /// Repository state contradicts itself.
    Consistency,
    /// Underlying storage failed.
    Storage,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Configuration => "configuration",
            Self::Consistency => "consistency",
            Self::Storage => "storage",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// StorageError
// ---------------------------------------------------------------------------

/// Failures raised by repository and audit log adapters.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem or stream I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be encoded or decoded as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A persisted record exists but its content is unusable.
    #[error("Corrupt record at {location}: {reason}")]
    Corrupt { location: String, reason: String },

    /// A lock guarding shared state was poisoned by a panicking writer.
    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),

    /// The operating system random source failed.
    #[error("Random source unavailable: {0}")]
    Entropy(String),
}

// ---------------------------------------------------------------------------
// KernelError
// ---------------------------------------------------------------------------

/// Errors returned by Kairn use cases and ports.
#[derive(Debug, Error)]
pub enum KernelError {
    /// Unit key shorter than three characters after trimming.
    #[error("Invalid unit key: must be at least 3 characters")]
    InvalidUnitKey,

    /// Unit title shorter than three characters after trimming.
    #[error("Invalid unit title: must be at least 3 characters")]
    InvalidUnitTitle,

    /// Version label empty after trimming.
    #[error("Invalid version label: must not be empty")]
    InvalidVersionLabel,

    /// Version content empty after trimming.
    #[error("Version content must not be empty")]
    EmptyContent,

    /// A sidecar document declared the wrong `schema_version`.
    #[error("Invalid {kind} schema_version: expected {expected}, found {found:?}")]
    InvalidSchemaVersion {
        kind: SidecarKind,
        expected: &'static str,
        found: String,
    },

    /// A sidecar payload exceeded the size ceiling.
    #[error("{kind} payload too large: {size} bytes exceeds {limit}")]
    PayloadTooLarge {
        kind: SidecarKind,
        size: usize,
        limit: usize,
    },

    /// A sidecar payload could not be decoded into its document type.
    #[error("Invalid {kind} document: {reason}")]
    InvalidDocument { kind: SidecarKind, reason: String },

    /// Claim set failed structural or referential validation.
    #[error("Invalid claim set: {0}")]
    InvalidClaimSet(String),

    /// Uncertainty annotation has an empty id.
    #[error("Invalid uncertainty id: must not be empty")]
    InvalidUncertaintyId,

    /// Uncertainty type is not one of the supported values.
    #[error("Invalid uncertainty type: {0:?}")]
    InvalidUncertaintyType(String),

    /// Uncertainty level is not one of the supported values.
    #[error("Invalid uncertainty level: {0:?}")]
    InvalidUncertaintyLevel(String),

    /// `applies_to.scope` is not one of the supported values.
    #[error("Invalid applies_to scope: {0:?}")]
    InvalidAppliesToScope(String),

    /// `applies_to.scope` is `claim` but no claim id was given.
    #[error("applies_to scope 'claim' requires a claim_id")]
    MissingClaimIdForUncertainty,

    /// No unit matches the given key or id.
    #[error("Unit not found: {0}")]
    UnitNotFound(String),

    /// No version matches the given id, or it belongs to another unit.
    #[error("Version not found: {0}")]
    VersionNotFound(String),

    /// The unit has no accepted versions yet.
    #[error("Unit has no versions: {0}")]
    NoVersions(String),

    /// A unit with this key already exists.
    #[error("Unit already exists: {0}")]
    UnitAlreadyExists(String),

    /// The optimistic-lock token does not match the current head.
    #[error("Conflict: base version {base} is not the current head {head:?}")]
    Conflict { base: String, head: String },

    /// A sidecar of this kind was already attached to the version.
    #[error("{kind} already set for version {version_id}")]
    SidecarAlreadySet {
        kind: SidecarKind,
        version_id: String,
    },

    /// The use case was constructed without an audit log or reader.
    #[error("Audit log not configured")]
    AuditNotConfigured,

    /// The use case was constructed without a clock.
    #[error("Clock not configured")]
    ClockNotConfigured,

    /// The unit's head pointer references a version outside its own list.
    #[error("Inconsistent head for unit {unit_id}: {head_version_id} not in version list")]
    InconsistentHead {
        unit_id: String,
        head_version_id: String,
    },

    /// Underlying storage failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl KernelError {
    /// Classify this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidUnitKey
            | Self::InvalidUnitTitle
            | Self::InvalidVersionLabel
            | Self::EmptyContent
            | Self::InvalidSchemaVersion { .. }
            | Self::PayloadTooLarge { .. }
            | Self::InvalidDocument { .. }
            | Self::InvalidClaimSet(_)
            | Self::InvalidUncertaintyId
            | Self::InvalidUncertaintyType(_)
            | Self::InvalidUncertaintyLevel(_)
            | Self::InvalidAppliesToScope(_)
            | Self::MissingClaimIdForUncertainty => ErrorKind::Validation,
            Self::UnitNotFound(_) | Self::VersionNotFound(_) | Self::NoVersions(_) => {
                ErrorKind::NotFound
            }
            Self::UnitAlreadyExists(_) | Self::Conflict { .. } | Self::SidecarAlreadySet { .. } => {
                ErrorKind::Conflict
            }
            Self::AuditNotConfigured | Self::ClockNotConfigured => ErrorKind::Configuration,
            Self::InconsistentHead { .. } => ErrorKind::Consistency,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }
}

impl From<std::io::Error> for KernelError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(StorageError::Io(err))
    }
}

impl From<serde_json::Error> for KernelError {
    fn from(err: serde_json::Error) -> Self {
        Self::Storage(StorageError::Json(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(KernelError::InvalidUnitKey.kind(), ErrorKind::Validation);
        assert_eq!(
            KernelError::UnitNotFound("abc".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            KernelError::Conflict {
                base: "ver_a".into(),
                head: "ver_b".into()
            }
            .kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            KernelError::AuditNotConfigured.kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            KernelError::InconsistentHead {
                unit_id: "unit_a".into(),
                head_version_id: "ver_x".into()
            }
            .kind(),
            ErrorKind::Consistency
        );
    }

    #[test]
    fn io_errors_become_storage() {
        let err: KernelError = std::io::Error::other("disk gone").into();
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert!(err.to_string().contains("disk gone"));
    }

    #[test]
    fn schema_version_message_names_kind() {
        let err = KernelError::InvalidSchemaVersion {
            kind: SidecarKind::ClaimSet,
            expected: "claimset/v0",
            found: "claimset/v9".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid claimset schema_version: expected claimset/v0, found \"claimset/v9\""
        );
    }
}
