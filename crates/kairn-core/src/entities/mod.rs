//! Entity structs for all Kairn domain objects.
//!
//! Units, versions, and sidecar documents derive `Serialize`, `Deserialize`,
//! and `JsonSchema`. Audit events serialize through their wire record so the
//! typed payload and the journal `type` field never disagree.

mod audit;
mod claim;
mod meaning;
mod uncertainty;
mod unit;
mod version;

pub use audit::{AUDIT_SCHEMA, AuditEvent, AuditPayload, UNKNOWN_ACTOR, actor_or_unknown};
pub use claim::{Claim, ClaimRelation, ClaimSet};
pub use meaning::{
    Meaning, MeaningClaim, MeaningIntegrity, MeaningProvenance, MeaningScope, MeaningSource,
    MeaningSourceQuote, MeaningTimeframe,
};
pub use uncertainty::{AppliesTo, Uncertainty};
pub use unit::{MIN_UNIT_FIELD_LEN, Unit};
pub use version::{Version, VersionDraft};
