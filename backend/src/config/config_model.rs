use std::path::PathBuf;

use vhr_core::{
    domain::value_objects::{
        enums::trial_modes::TrialMode, plan_catalog::PlanCatalog, trial_policy::TrialPolicy,
    },
    infra::user_access_store::DatabaseSettings,
};

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub backend_server: BackendServer,
    pub database: Option<DatabaseSettings>,
    pub trial: Trial,
    pub plan_catalog: PlanCatalog,
    pub static_site: Option<StaticSite>,
}

#[derive(Debug, Clone)]
pub struct BackendServer {
    pub port: u16,
    /// Megabytes.
    pub body_limit: u64,
    /// Seconds.
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Trial {
    pub mode: TrialMode,
    pub policy: TrialPolicy,
}

#[derive(Debug, Clone)]
pub struct StaticSite {
    pub root: PathBuf,
}
