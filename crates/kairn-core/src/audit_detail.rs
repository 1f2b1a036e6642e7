//! Typed audit payloads.
//!
//! Each known event type carries one of these shapes in its `data` field.
//! Field aliases accept the camelCase spellings written by older journals.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Payload for `unit.created`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UnitCreatedData {
    pub key: String,
    pub title: String,
}

/// Payload for `version.created`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct VersionCreatedData {
    #[serde(
        default,
        alias = "prevVersionId",
        skip_serializing_if = "Option::is_none"
    )]
    pub prev_version_id: Option<String>,
    #[serde(alias = "contentHash")]
    pub content_hash: String,
    pub label: String,
}

/// Title and purpose copied from a meaning document for quick inspection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct InlinePreview {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub purpose: String,
}

/// Payload for `MEANING_SET`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MeaningSetData {
    #[serde(alias = "meaningHash")]
    pub meaning_hash: String,
    #[serde(default, alias = "meaningPath")]
    pub meaning_path: String,
    #[serde(default, alias = "schemaVersion")]
    pub schema_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_preview: Option<InlinePreview>,
}

/// Payload for `CLAIM_SET`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ClaimSetData {
    #[serde(default)]
    pub unit_id: String,
    #[serde(default)]
    pub version_id: String,
    #[serde(alias = "claimSetHash", alias = "claim_set_hash")]
    pub claimset_hash: String,
    #[serde(default)]
    pub claimset_path: String,
}

/// Payload for `UNCERTAINTY_SET`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UncertaintySetData {
    #[serde(default)]
    pub unit_id: String,
    #[serde(default)]
    pub version_id: String,
    #[serde(alias = "uncertaintyHash")]
    pub uncertainty_hash: String,
    #[serde(default)]
    pub uncertainty_path: String,
}
