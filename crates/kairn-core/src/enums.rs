//! Event types, sidecar kinds, and sidecar vocabulary enums.
//!
//! Wire spellings are fixed by the audit journal format and the sidecar
//! document schemas, so each enum carries explicit `as_str` / `parse` pairs
//! rather than relying on a blanket serde rename.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// EventType
// ---------------------------------------------------------------------------

/// Audit event types emitted by the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub enum EventType {
    #[serde(rename = "unit.created")]
    UnitCreated,
    #[serde(rename = "version.created")]
    VersionCreated,
    #[serde(rename = "MEANING_SET")]
    MeaningSet,
    #[serde(rename = "CLAIM_SET")]
    ClaimSet,
    #[serde(rename = "UNCERTAINTY_SET")]
    UncertaintySet,
}

impl EventType {
    /// Return the string written to the journal's `type` field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnitCreated => "unit.created",
            Self::VersionCreated => "version.created",
            Self::MeaningSet => "MEANING_SET",
            Self::ClaimSet => "CLAIM_SET",
            Self::UncertaintySet => "UNCERTAINTY_SET",
        }
    }

    /// Parse a journal `type` string. Unknown types return `None`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "unit.created" => Some(Self::UnitCreated),
            "version.created" => Some(Self::VersionCreated),
            "MEANING_SET" => Some(Self::MeaningSet),
            "CLAIM_SET" => Some(Self::ClaimSet),
            "UNCERTAINTY_SET" => Some(Self::UncertaintySet),
            _ => None,
        }
    }

    /// Payload keys that may carry the recorded hash, in lookup order.
    ///
    /// Older journals wrote `contentHash`; both spellings are accepted.
    #[must_use]
    pub const fn hash_keys(self) -> &'static [&'static str] {
        match self {
            Self::UnitCreated => &[],
            Self::VersionCreated => &["content_hash", "contentHash"],
            Self::MeaningSet => &["meaning_hash", "meaningHash"],
            Self::ClaimSet => &["claimset_hash", "claimSetHash", "claim_set_hash"],
            Self::UncertaintySet => &["uncertainty_hash", "uncertaintyHash"],
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SidecarKind
// ---------------------------------------------------------------------------

/// The three kinds of structured document that can be attached to a version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SidecarKind {
    Meaning,
    #[serde(rename = "claimset")]
    ClaimSet,
    Uncertainty,
}

impl SidecarKind {
    pub const ALL: [Self; 3] = [Self::Meaning, Self::ClaimSet, Self::Uncertainty];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Meaning => "meaning",
            Self::ClaimSet => "claimset",
            Self::Uncertainty => "uncertainty",
        }
    }

    /// The exact `schema_version` a document of this kind must declare.
    #[must_use]
    pub const fn schema_version(self) -> &'static str {
        match self {
            Self::Meaning => "meaning/v1",
            Self::ClaimSet => "claimset/v0",
            Self::Uncertainty => "uncertainty/v0",
        }
    }

    /// The audit event emitted when a document of this kind is attached.
    #[must_use]
    pub const fn event_type(self) -> EventType {
        match self {
            Self::Meaning => EventType::MeaningSet,
            Self::ClaimSet => EventType::ClaimSet,
            Self::Uncertainty => EventType::UncertaintySet,
        }
    }

    /// Sidecar file name for a version: `{unit_id}.{version_id}.{kind}.json`.
    #[must_use]
    pub fn file_name(self, unit_id: &str, version_id: &str) -> String {
        format!("{unit_id}.{version_id}.{}.json", self.as_str())
    }
}

impl fmt::Display for SidecarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RelationType
// ---------------------------------------------------------------------------

/// Relation between two claims in a claim set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationType {
    Contradicts,
}

impl RelationType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Contradicts => "CONTRADICTS",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CONTRADICTS" => Some(Self::Contradicts),
            _ => None,
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// UncertaintyType
// ---------------------------------------------------------------------------

/// What kind of doubt an uncertainty annotation expresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UncertaintyType {
    Empirical,
    Interpretative,
    Incomplete,
}

impl UncertaintyType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Empirical => "empirical",
            Self::Interpretative => "interpretative",
            Self::Incomplete => "incomplete",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "empirical" => Some(Self::Empirical),
            "interpretative" => Some(Self::Interpretative),
            "incomplete" => Some(Self::Incomplete),
            _ => None,
        }
    }
}

impl fmt::Display for UncertaintyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// UncertaintyLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UncertaintyLevel {
    Low,
    Medium,
    High,
}

impl UncertaintyLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl fmt::Display for UncertaintyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AppliesToScope
// ---------------------------------------------------------------------------

/// Target of an uncertainty annotation: the whole version or one claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppliesToScope {
    Version,
    Claim,
}

impl AppliesToScope {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Version => "version",
            Self::Claim => "claim",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "version" => Some(Self::Version),
            "claim" => Some(Self::Claim),
            _ => None,
        }
    }
}

impl fmt::Display for AppliesToScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_parse_matches_as_str() {
        for ty in [
            EventType::UnitCreated,
            EventType::VersionCreated,
            EventType::MeaningSet,
            EventType::ClaimSet,
            EventType::UncertaintySet,
        ] {
            assert_eq!(EventType::parse(ty.as_str()), Some(ty));
            let json = serde_json::to_string(&ty).unwrap();
            assert_eq!(json, format!("\"{}\"", ty.as_str()));
        }
        assert_eq!(EventType::parse("unit.deleted"), None);
    }

    #[test]
    fn sidecar_kind_wiring() {
        assert_eq!(SidecarKind::ClaimSet.event_type(), EventType::ClaimSet);
        assert_eq!(SidecarKind::Uncertainty.schema_version(), "uncertainty/v0");
        assert_eq!(
            SidecarKind::Meaning.file_name("unit_a", "ver_b"),
            "unit_a.ver_b.meaning.json"
        );
        assert_eq!(
            serde_json::to_string(&SidecarKind::ClaimSet).unwrap(),
            "\"claimset\""
        );
    }

    #[test]
    fn vocabulary_is_case_sensitive() {
        assert_eq!(UncertaintyType::parse("Empirical"), None);
        assert_eq!(UncertaintyLevel::parse("HIGH"), None);
        assert_eq!(RelationType::parse("contradicts"), None);
        assert_eq!(AppliesToScope::parse("claim"), Some(AppliesToScope::Claim));
    }
}
