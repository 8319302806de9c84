use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::plans::PlanEntity,
    value_objects::{enums::billing_periods::BillingPeriod, trial_policy::DEFAULT_TRIAL_DAYS},
};

/// Identifier of the single monthly plan sold today.
pub const STANDARD_PLAN_ID: &str = "plan_standard";

/// Sentinel stored in plan limits for "no limit".
pub const UNLIMITED: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaLimit {
    Limited(i64),
    Unlimited,
}

impl QuotaLimit {
    /// `None` for negative values other than the `-1` sentinel.
    pub fn from_raw(value: i64) -> Option<Self> {
        match value {
            UNLIMITED => Some(QuotaLimit::Unlimited),
            max if max >= 0 => Some(QuotaLimit::Limited(max)),
            _ => None,
        }
    }
}

/// Payment cadence offered next to the plans, e.g. monthly with a free trial.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BillingOption {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub billing_period: BillingPeriod,
    #[serde(default)]
    pub discount_percent: i64,
    pub trial_days: i64,
}

impl BillingOption {
    pub fn monthly() -> Self {
        Self {
            id: "monthly".to_string(),
            name: "Monthly".to_string(),
            billing_period: BillingPeriod::Month,
            discount_percent: 0,
            trial_days: DEFAULT_TRIAL_DAYS,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlanDto {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price_minor: i64,
    pub currency: String,
    pub billing_period: BillingPeriod,
    pub features: Vec<String>,
    pub limits: BTreeMap<String, i64>,
}

/// Response of the plan listing endpoint.
#[derive(Debug, Serialize)]
pub struct PlanListingDto {
    pub plans: Vec<PlanDto>,
    pub billing_options: Vec<BillingOption>,
}

impl From<PlanEntity> for PlanDto {
    fn from(value: PlanEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
            price_minor: value.price_minor,
            currency: value.currency,
            billing_period: value.billing_period,
            features: value.features,
            limits: value.limits,
        }
    }
}
