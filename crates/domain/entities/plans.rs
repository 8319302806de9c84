use std::collections::BTreeMap;

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{
    enums::billing_periods::BillingPeriod,
    plans::{QuotaLimit, STANDARD_PLAN_ID, UNLIMITED},
};

/// A subscription tier from the static plan catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanEntity {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price_minor: i64,
    pub currency: String,
    #[serde(default)]
    pub billing_period: BillingPeriod,
    /// Display-only, kept in catalog order.
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub limits: BTreeMap<String, i64>,
}

impl PlanEntity {
    pub fn standard() -> Self {
        let features = [
            "Full access to VHR Dashboard",
            "VR headset management",
            "Video streaming (Scrcpy)",
            "Automatic WiFi",
            "PC to headset voice (TTS)",
            "App management",
            "User support",
            "Updates included",
        ];
        let limits = ["maxUsers", "maxDataPoints", "storageGB", "apiCallsPerDay"];

        Self {
            id: STANDARD_PLAN_ID.to_string(),
            name: "Monthly subscription".to_string(),
            description: Some("Full VHR Dashboard access - 29 EUR incl. VAT per month".to_string()),
            price_minor: 2900,
            currency: "EUR".to_string(),
            billing_period: BillingPeriod::Month,
            features: features.iter().map(|f| f.to_string()).collect(),
            limits: limits
                .iter()
                .map(|name| (name.to_string(), UNLIMITED))
                .collect(),
        }
    }

    /// Typed view of `limits`. Fails on values below the `-1` sentinel.
    pub fn quota_limits(&self) -> Result<BTreeMap<&str, QuotaLimit>> {
        self.limits
            .iter()
            .map(|(name, raw)| {
                QuotaLimit::from_raw(*raw)
                    .map(|limit| (name.as_str(), limit))
                    .ok_or_else(|| anyhow!("plan `{}` has an invalid `{name}` limit {raw}", self.id))
            })
            .collect()
    }
}
