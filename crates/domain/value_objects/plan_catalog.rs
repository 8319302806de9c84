use std::collections::HashSet;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::domain::{entities::plans::PlanEntity, value_objects::plans::BillingOption};

/// Read-only list of plans and billing options, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanCatalog {
    plans: Vec<PlanEntity>,
    billing_options: Vec<BillingOption>,
}

#[derive(Debug, Deserialize)]
struct PlanCatalogFile {
    plans: Vec<PlanEntity>,
    #[serde(default = "default_billing_options")]
    billing_options: Vec<BillingOption>,
}

fn default_billing_options() -> Vec<BillingOption> {
    vec![BillingOption::monthly()]
}

impl Default for PlanCatalog {
    fn default() -> Self {
        Self {
            plans: vec![PlanEntity::standard()],
            billing_options: default_billing_options(),
        }
    }
}

impl PlanCatalog {
    pub fn new(plans: Vec<PlanEntity>, billing_options: Vec<BillingOption>) -> Result<Self> {
        if plans.is_empty() {
            bail!("plan catalog must contain at least one plan");
        }

        let mut seen = HashSet::new();
        for plan in &plans {
            if !seen.insert(plan.id.as_str()) {
                bail!("plan catalog contains duplicate plan id `{}`", plan.id);
            }
            if plan.price_minor < 0 {
                bail!("plan `{}` has a negative price", plan.id);
            }
            plan.quota_limits()?;
        }

        let mut seen_options = HashSet::new();
        for option in &billing_options {
            if !seen_options.insert(option.id.as_str()) {
                bail!("plan catalog contains duplicate billing option `{}`", option.id);
            }
            if !(0..=100).contains(&option.discount_percent) {
                bail!("billing option `{}` has a discount outside 0-100", option.id);
            }
            if option.trial_days < 0 {
                bail!("billing option `{}` has a negative trial", option.id);
            }
        }

        Ok(Self {
            plans,
            billing_options,
        })
    }

    /// Accepts `{"plans": [...]}` as well as a bare array.
    pub fn from_json(raw: &str) -> Result<Self> {
        let file = match serde_json::from_str::<PlanCatalogFile>(raw) {
            Ok(file) => file,
            Err(_) => PlanCatalogFile {
                plans: serde_json::from_str::<Vec<PlanEntity>>(raw)
                    .context("plan catalog is neither {\"plans\": [...]} nor a plan array")?,
                billing_options: default_billing_options(),
            },
        };
        Self::new(file.plans, file.billing_options)
    }

    pub fn resolve(&self, plan_id: &str) -> Option<&PlanEntity> {
        self.plans.iter().find(|plan| plan.id == plan_id)
    }

    pub fn plans(&self) -> &[PlanEntity] {
        &self.plans
    }

    pub fn billing_options(&self) -> &[BillingOption] {
        &self.billing_options
    }
}
