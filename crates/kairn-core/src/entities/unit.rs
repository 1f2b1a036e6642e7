use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::KernelError;

/// Minimum length of a trimmed unit key or title.
pub const MIN_UNIT_FIELD_LEN: usize = 3;

/// A named, versioned knowledge document.
///
/// `head_version_id` is the only field that changes after creation. It is
/// `None` until the first version is accepted.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Unit {
    pub id: String,
    pub key: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_version_id: Option<String>,
}

impl Unit {
    /// Build a validated unit. Key, title, and description are trimmed; an
    /// empty description becomes `None`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUnitKey` or `InvalidUnitTitle` if the trimmed value is
    /// shorter than three characters.
    pub fn new(
        id: impl Into<String>,
        key: &str,
        title: &str,
        description: Option<&str>,
    ) -> Result<Self, KernelError> {
        let key = key.trim();
        let title = title.trim();
        if key.chars().count() < MIN_UNIT_FIELD_LEN {
            return Err(KernelError::InvalidUnitKey);
        }
        if title.chars().count() < MIN_UNIT_FIELD_LEN {
            return Err(KernelError::InvalidUnitTitle);
        }
        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_owned);

        Ok(Self {
            id: id.into(),
            key: key.to_owned(),
            title: title.to_owned(),
            description,
            head_version_id: None,
        })
    }

    /// Current head version id, or `""` when the unit has no versions.
    #[must_use]
    pub fn head(&self) -> &str {
        self.head_version_id.as_deref().unwrap_or_default()
    }
}
