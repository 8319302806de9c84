use std::fmt::Display;

use anyhow::{Result, bail};

/// Where trial start dates are tracked. Resolved once at startup into a
/// concrete user access store.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialMode {
    #[default]
    Database,
    Memory,
    /// No trial limitation: start dates are never recorded.
    None,
}

impl Display for TrialMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mode = match self {
            TrialMode::Database => "database",
            TrialMode::Memory => "memory",
            TrialMode::None => "none",
        };
        write!(f, "{}", mode)
    }
}

impl TryFrom<&str> for TrialMode {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "database" | "db" => Ok(TrialMode::Database),
            "memory" => Ok(TrialMode::Memory),
            "none" | "off" => Ok(TrialMode::None),
            "localstorage" | "cookie" => {
                bail!("trial mode `{value}` is tracked by the browser and cannot be enforced here")
            }
            other => bail!("unknown trial mode `{other}`"),
        }
    }
}
