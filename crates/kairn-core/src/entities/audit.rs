use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::audit_detail::{
    ClaimSetData, MeaningSetData, UncertaintySetData, UnitCreatedData, VersionCreatedData,
};
use crate::enums::EventType;

/// Schema tag written on every audit event.
pub const AUDIT_SCHEMA: &str = "kairn.audit.v1";

/// Actor recorded when the caller supplies none.
pub const UNKNOWN_ACTOR: &str = "unknown";

/// Trim `actor`, falling back to [`UNKNOWN_ACTOR`] when blank.
#[must_use]
pub fn actor_or_unknown(actor: &str) -> &str {
    let actor = actor.trim();
    if actor.is_empty() { UNKNOWN_ACTOR } else { actor }
}

// ---------------------------------------------------------------------------
// AuditPayload
// ---------------------------------------------------------------------------

/// Type-specific audit payload.
///
/// The event type and its payload shape travel together. Events whose type is
/// unknown, or whose data does not fit the typed shape, are kept as
/// `Untyped` with the raw mapping so nothing in the journal is lost.
#[derive(Debug, Clone, PartialEq)]
pub enum AuditPayload {
    UnitCreated(UnitCreatedData),
    VersionCreated(VersionCreatedData),
    MeaningSet(MeaningSetData),
    ClaimSet(ClaimSetData),
    UncertaintySet(UncertaintySetData),
    Untyped { event_type: String, data: Value },
}

impl AuditPayload {
    /// Decode a journal `type` and `data` pair. This is the single place where
    /// wire payloads are interpreted.
    #[must_use]
    pub fn decode(event_type: &str, data: Value) -> Self {
        let Some(kind) = EventType::parse(event_type) else {
            return Self::untyped(event_type, data);
        };
        let decoded = match kind {
            EventType::UnitCreated => serde_json::from_value(data.clone()).map(Self::UnitCreated),
            EventType::VersionCreated => {
                serde_json::from_value(data.clone()).map(Self::VersionCreated)
            }
            EventType::MeaningSet => serde_json::from_value(data.clone()).map(Self::MeaningSet),
            EventType::ClaimSet => serde_json::from_value(data.clone()).map(Self::ClaimSet),
            EventType::UncertaintySet => {
                serde_json::from_value(data.clone()).map(Self::UncertaintySet)
            }
        };
        decoded.unwrap_or_else(|_| Self::untyped(event_type, data))
    }

    fn untyped(event_type: &str, data: Value) -> Self {
        Self::Untyped {
            event_type: event_type.to_owned(),
            data,
        }
    }

    /// The journal `type` string.
    #[must_use]
    pub fn event_type(&self) -> &str {
        match self {
            Self::Untyped { event_type, .. } => event_type.as_str(),
            typed => typed.kind().map_or("", EventType::as_str),
        }
    }

    /// The known event type, if this payload belongs to one.
    #[must_use]
    pub fn kind(&self) -> Option<EventType> {
        match self {
            Self::UnitCreated(_) => Some(EventType::UnitCreated),
            Self::VersionCreated(_) => Some(EventType::VersionCreated),
            Self::MeaningSet(_) => Some(EventType::MeaningSet),
            Self::ClaimSet(_) => Some(EventType::ClaimSet),
            Self::UncertaintySet(_) => Some(EventType::UncertaintySet),
            Self::Untyped { event_type, .. } => EventType::parse(event_type),
        }
    }

    /// The payload as a JSON value, as written to the journal.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let value = match self {
            Self::UnitCreated(d) => serde_json::to_value(d),
            Self::VersionCreated(d) => serde_json::to_value(d),
            Self::MeaningSet(d) => serde_json::to_value(d),
            Self::ClaimSet(d) => serde_json::to_value(d),
            Self::UncertaintySet(d) => serde_json::to_value(d),
            Self::Untyped { data, .. } => return data.clone(),
        };
        value.unwrap_or_default()
    }

    /// The hash this event recorded for its target, if any.
    ///
    /// Works for typed payloads and for untyped mappings of a known event type.
    #[must_use]
    pub fn recorded_hash(&self) -> Option<&str> {
        let hash = match self {
            Self::UnitCreated(_) => None,
            Self::VersionCreated(d) => Some(d.content_hash.as_str()),
            Self::MeaningSet(d) => Some(d.meaning_hash.as_str()),
            Self::ClaimSet(d) => Some(d.claimset_hash.as_str()),
            Self::UncertaintySet(d) => Some(d.uncertainty_hash.as_str()),
            Self::Untyped { event_type, data } => {
                let map = data.as_object()?;
                EventType::parse(event_type)?
                    .hash_keys()
                    .iter()
                    .find_map(|key| map.get(*key).and_then(Value::as_str))
            }
        };
        hash.filter(|h| !h.is_empty())
    }
}

// ---------------------------------------------------------------------------
// AuditEvent
// ---------------------------------------------------------------------------

/// One append-only journal record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "AuditRecord", into = "AuditRecord")]
pub struct AuditEvent {
    pub schema: String,
    pub id: String,
    pub at_unix: i64,
    pub actor_id: String,
    pub unit_id: Option<String>,
    pub version_id: Option<String>,
    pub payload: AuditPayload,
}

impl AuditEvent {
    /// Build an event stamped with the current schema. Blank actors become
    /// `unknown`.
    #[must_use]
    pub fn new(id: impl Into<String>, at_unix: i64, actor_id: &str, payload: AuditPayload) -> Self {
        Self {
            schema: AUDIT_SCHEMA.to_owned(),
            id: id.into(),
            at_unix,
            actor_id: actor_or_unknown(actor_id).to_owned(),
            unit_id: None,
            version_id: None,
            payload,
        }
    }

    #[must_use]
    pub fn for_unit(mut self, unit_id: impl Into<String>) -> Self {
        self.unit_id = Some(unit_id.into());
        self
    }

    #[must_use]
    pub fn for_version(mut self, version_id: impl Into<String>) -> Self {
        self.version_id = Some(version_id.into());
        self
    }

    #[must_use]
    pub fn event_type(&self) -> &str {
        self.payload.event_type()
    }

    #[must_use]
    pub fn kind(&self) -> Option<EventType> {
        self.payload.kind()
    }

    /// The entity this event is about: the unit for `unit.created`, the
    /// version for everything else.
    #[must_use]
    pub fn target_id(&self) -> Option<&str> {
        let target = match self.kind()? {
            EventType::UnitCreated => self.unit_id.as_deref(),
            _ => self.version_id.as_deref().or(match &self.payload {
                AuditPayload::ClaimSet(d) => Some(d.version_id.as_str()),
                AuditPayload::UncertaintySet(d) => Some(d.version_id.as_str()),
                _ => None,
            }),
        };
        target.filter(|id| !id.is_empty())
    }

    #[must_use]
    pub fn recorded_hash(&self) -> Option<&str> {
        self.payload.recorded_hash()
    }
}

/// Wire shape of an audit event.
#[derive(Serialize, Deserialize)]
struct AuditRecord {
    #[serde(default)]
    schema: String,
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    #[serde(alias = "atUnix")]
    at_unix: i64,
    #[serde(default, alias = "actorId")]
    actor_id: String,
    #[serde(default, alias = "unitId", skip_serializing_if = "Option::is_none")]
    unit_id: Option<String>,
    #[serde(default, alias = "versionId", skip_serializing_if = "Option::is_none")]
    version_id: Option<String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    data: Value,
}

impl From<AuditRecord> for AuditEvent {
    fn from(record: AuditRecord) -> Self {
        let payload = AuditPayload::decode(&record.event_type, record.data);
        Self {
            schema: record.schema,
            id: record.id,
            at_unix: record.at_unix,
            actor_id: record.actor_id,
            unit_id: record.unit_id.filter(|id| !id.is_empty()),
            version_id: record.version_id.filter(|id| !id.is_empty()),
            payload,
        }
    }
}

impl From<AuditEvent> for AuditRecord {
    fn from(event: AuditEvent) -> Self {
        Self {
            data: event.payload.to_value(),
            event_type: event.payload.event_type().to_owned(),
            schema: event.schema,
            id: event.id,
            at_unix: event.at_unix,
            actor_id: event.actor_id,
            unit_id: event.unit_id,
            version_id: event.version_id,
        }
    }
}
