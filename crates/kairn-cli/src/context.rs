//! Everything a command handler needs, resolved once per invocation.

use anyhow::Context;
use kairn_config::KairnConfig;
use kairn_kernel::Kernel;

use crate::cli::GlobalFlags;

pub struct AppContext {
    pub kernel: Kernel,
    pub config: KairnConfig,
    /// Actor for audit events; empty becomes `unknown` in the kernel.
    pub actor: String,
}

impl AppContext {
    /// Flags win over configuration.
    pub fn init(config: KairnConfig, flags: &GlobalFlags) -> anyhow::Result<Self> {
        let data_dir = flags
            .data
            .clone()
            .unwrap_or_else(|| config.storage.data_dir.clone());
        let actor = flags
            .actor
            .clone()
            .unwrap_or_else(|| config.general.actor_id.clone());

        let kernel = kairn_store::open_kernel(&data_dir)
            .with_context(|| format!("failed to open data directory {}", data_dir.display()))?;
        tracing::debug!(data_dir = %data_dir.display(), actor = %actor, "krn: context ready");

        Ok(Self {
            kernel,
            config,
            actor,
        })
    }
}
