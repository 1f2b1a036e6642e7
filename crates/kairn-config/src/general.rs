//! General application configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Actor recorded on audit events when `--actor` is not given. Empty
    /// means `unknown`.
    #[serde(default)]
    pub actor_id: String,
}
