use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{RelationType, SidecarKind};
use crate::errors::KernelError;

/// A single identified claim inside a claim set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Claim {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// A directed relation between two claims of the same set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ClaimRelation {
    #[serde(rename = "type", default)]
    pub relation_type: String,
    #[serde(default)]
    pub from_claim_id: String,
    #[serde(default)]
    pub to_claim_id: String,
}

/// Claims extracted from a version (`claimset/v0`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ClaimSet {
    pub schema_version: String,
    #[serde(default)]
    pub version_id: String,
    #[serde(default)]
    pub claims: Vec<Claim>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relations: Vec<ClaimRelation>,
}

impl ClaimSet {
    /// Check the schema version, claim identity, and relation references.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSchemaVersion` for a wrong `schema_version`, otherwise
    /// `InvalidClaimSet` naming the first offending claim or relation.
    pub fn validate(&self) -> Result<(), KernelError> {
        let expected = SidecarKind::ClaimSet.schema_version();
        if self.schema_version != expected {
            return Err(KernelError::InvalidSchemaVersion {
                kind: SidecarKind::ClaimSet,
                expected,
                found: self.schema_version.clone(),
            });
        }
        if self.version_id.is_empty() {
            return Err(invalid("version_id is required".into()));
        }

        let mut seen = HashSet::with_capacity(self.claims.len());
        for (i, claim) in self.claims.iter().enumerate() {
            if claim.id.is_empty() {
                return Err(invalid(format!("claim[{i}]: id is required")));
            }
            if claim.text.is_empty() {
                return Err(invalid(format!(
                    "claim[{i}]: text is required for id={}",
                    claim.id
                )));
            }
            if !seen.insert(claim.id.as_str()) {
                return Err(invalid(format!("duplicate claim id: {}", claim.id)));
            }
        }

        for (i, rel) in self.relations.iter().enumerate() {
            if RelationType::parse(&rel.relation_type).is_none() {
                return Err(invalid(format!(
                    "relation[{i}]: unsupported relation type: {}",
                    rel.relation_type
                )));
            }
            if rel.from_claim_id.is_empty() || rel.to_claim_id.is_empty() {
                return Err(invalid(format!(
                    "relation[{i}]: from_claim_id and to_claim_id are required"
                )));
            }
            if !seen.contains(rel.from_claim_id.as_str()) {
                return Err(invalid(format!(
                    "relation[{i}]: from_claim_id references unknown claim id: {}",
                    rel.from_claim_id
                )));
            }
            if !seen.contains(rel.to_claim_id.as_str()) {
                return Err(invalid(format!(
                    "relation[{i}]: to_claim_id references unknown claim id: {}",
                    rel.to_claim_id
                )));
            }
        }
        Ok(())
    }
}

const fn invalid(reason: String) -> KernelError {
    KernelError::InvalidClaimSet(reason)
}
