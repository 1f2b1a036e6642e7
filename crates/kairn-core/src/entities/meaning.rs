use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::SidecarKind;
use crate::errors::KernelError;

/// Structured interpretive context attached to a version (`meaning/v1`).
///
/// Every field except `schema_version` is optional and omitted from the
/// serialized form when empty, so the canonical hash depends only on the
/// content actually supplied.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Meaning {
    pub schema_version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub purpose: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<MeaningScope>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub claims: Vec<MeaningClaim>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<MeaningSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<MeaningProvenance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integrity: Option<MeaningIntegrity>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MeaningScope {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub audience: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub jurisdiction: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locale: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<MeaningTimeframe>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MeaningTimeframe {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub valid_from: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub valid_until: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MeaningClaim {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub strength: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MeaningSource {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub source_type: String,
    #[serde(rename = "ref", default, skip_serializing_if = "String::is_empty")]
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<MeaningSourceQuote>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MeaningSourceQuote {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub snippet: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub locator: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MeaningProvenance {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub author: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub org: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub role: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MeaningIntegrity {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub narrative_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub supersedes: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicts_with: Vec<String>,
}

impl Meaning {
    /// # Errors
    ///
    /// Returns `InvalidSchemaVersion` unless `schema_version` is `meaning/v1`.
    pub fn validate(&self) -> Result<(), KernelError> {
        let expected = SidecarKind::Meaning.schema_version();
        if self.schema_version != expected {
            return Err(KernelError::InvalidSchemaVersion {
                kind: SidecarKind::Meaning,
                expected,
                found: self.schema_version.clone(),
            });
        }
        Ok(())
    }
}
