use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{AppliesToScope, SidecarKind, UncertaintyLevel, UncertaintyType};
use crate::errors::KernelError;

/// What an uncertainty annotation refers to.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AppliesTo {
    #[serde(default)]
    pub scope: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub claim_id: String,
}

/// An auditable statement of doubt about a version or one of its claims
/// (`uncertainty/v0`).
///
/// `uncertainty_type`, `level`, and `applies_to.scope` stay as strings on the
/// wire so each invalid value gets its own validation error instead of a
/// generic decode failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Uncertainty {
    pub schema_version: String,
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub uncertainty_type: String,
    #[serde(default)]
    pub level: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub applies_to: AppliesTo,
}

impl Uncertainty {
    /// # Errors
    ///
    /// Returns the first failing check, in order: schema version, id, type,
    /// level, scope, claim id requirement.
    pub fn validate(&self) -> Result<(), KernelError> {
        let expected = SidecarKind::Uncertainty.schema_version();
        if self.schema_version != expected {
            return Err(KernelError::InvalidSchemaVersion {
                kind: SidecarKind::Uncertainty,
                expected,
                found: self.schema_version.clone(),
            });
        }
        if self.id.is_empty() {
            return Err(KernelError::InvalidUncertaintyId);
        }
        if UncertaintyType::parse(&self.uncertainty_type).is_none() {
            return Err(KernelError::InvalidUncertaintyType(
                self.uncertainty_type.clone(),
            ));
        }
        if UncertaintyLevel::parse(&self.level).is_none() {
            return Err(KernelError::InvalidUncertaintyLevel(self.level.clone()));
        }
        match AppliesToScope::parse(&self.applies_to.scope) {
            Some(AppliesToScope::Version) => Ok(()),
            Some(AppliesToScope::Claim) if self.applies_to.claim_id.is_empty() => {
                Err(KernelError::MissingClaimIdForUncertainty)
            }
            Some(AppliesToScope::Claim) => Ok(()),
            None => Err(KernelError::InvalidAppliesToScope(
                self.applies_to.scope.clone(),
            )),
        }
    }
}
