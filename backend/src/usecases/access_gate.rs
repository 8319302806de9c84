use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;
use vhr_core::domain::{
    entities::user_access::UserAccessEntity,
    value_objects::{
        access::AccessDecision,
        enums::{
            access_states::{AccessReason, AccessState},
            subscription_statuses::SubscriptionStatus,
        },
        plan_catalog::PlanCatalog,
        trial_policy::{TrialPolicy, ceil_days},
    },
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessGateError {
    #[error("user {user_id} is {status} but plan {plan_id:?} is not in the catalog")]
    InvalidRecord {
        user_id: Uuid,
        status: SubscriptionStatus,
        plan_id: Option<String>,
    },
}

/// Stamps the trial start on first evaluation. Later calls leave the record untouched.
pub fn ensure_trial_started(mut record: UserAccessEntity, now: DateTime<Utc>) -> UserAccessEntity {
    if record.trial_started_at.is_none() {
        record.trial_started_at = Some(now);
    }
    record
}

/// Decides allow / warn / block for one user at one instant.
#[derive(Debug, Clone)]
pub struct AccessGate {
    policy: Arc<TrialPolicy>,
    catalog: Arc<PlanCatalog>,
}

impl AccessGate {
    pub fn new(policy: Arc<TrialPolicy>, catalog: Arc<PlanCatalog>) -> Self {
        Self { policy, catalog }
    }

    pub fn policy(&self) -> &TrialPolicy {
        &self.policy
    }

    /// Rules are checked in order; the first match wins.
    pub fn evaluate(
        &self,
        record: &UserAccessEntity,
        now: DateTime<Utc>,
    ) -> Result<AccessDecision, AccessGateError> {
        if record.subscription_status.requires_plan() {
            self.ensure_plan_resolves(record)?;
        }

        let decision = match record.subscription_status {
            SubscriptionStatus::Active => {
                AccessDecision::new(AccessState::Allowed, AccessReason::Subscribed, None)
            }
            // Payment failures never block on their own.
            SubscriptionStatus::PastDue => AccessDecision::new(
                AccessState::AllowedWithWarning,
                AccessReason::PaymentFailed,
                None,
            ),
            SubscriptionStatus::Canceled => match record.trial_started_at {
                Some(trial_started_at) => self.evaluate_trial(trial_started_at, now),
                None => AccessDecision::new(AccessState::Blocked, AccessReason::Canceled, None),
            },
            SubscriptionStatus::None | SubscriptionStatus::Trialing => {
                match record.trial_started_at {
                    Some(trial_started_at) => self.evaluate_trial(trial_started_at, now),
                    None => AccessDecision::new(
                        AccessState::Allowed,
                        AccessReason::TrialNotStarted,
                        Some(self.policy.trial_duration_days()),
                    ),
                }
            }
        };

        Ok(decision)
    }

    /// Stamps first, then evaluates against the stamped record.
    pub fn evaluate_and_stamp(
        &self,
        record: UserAccessEntity,
        now: DateTime<Utc>,
    ) -> Result<(UserAccessEntity, AccessDecision), AccessGateError> {
        let record = ensure_trial_started(record, now);
        let decision = self.evaluate(&record, now)?;
        Ok((record, decision))
    }

    fn evaluate_trial(&self, trial_started_at: DateTime<Utc>, now: DateTime<Utc>) -> AccessDecision {
        // A clock behind the stamp counts as no time elapsed.
        let elapsed_ms = (now - trial_started_at).num_milliseconds().max(0);
        let remaining_ms = self.policy.trial_duration_ms - elapsed_ms;
        let days_remaining = ceil_days(remaining_ms).max(0);

        if remaining_ms <= 0 {
            let state = if self.policy.on_expiration.block_access {
                AccessState::Blocked
            } else {
                AccessState::AllowedWithWarning
            };
            return AccessDecision::new(state, AccessReason::TrialExpired, Some(days_remaining));
        }

        if days_remaining <= self.policy.warning_threshold_days {
            return AccessDecision::new(
                AccessState::AllowedWithWarning,
                AccessReason::TrialEndingSoon,
                Some(days_remaining),
            );
        }

        AccessDecision::new(
            AccessState::Allowed,
            AccessReason::TrialActive,
            Some(days_remaining),
        )
    }

    fn ensure_plan_resolves(&self, record: &UserAccessEntity) -> Result<(), AccessGateError> {
        let resolved = record
            .plan_id
            .as_deref()
            .and_then(|plan_id| self.catalog.resolve(plan_id))
            .is_some();

        if resolved {
            Ok(())
        } else {
            Err(AccessGateError::InvalidRecord {
                user_id: record.user_id,
                status: record.subscription_status,
                plan_id: record.plan_id.clone(),
            })
        }
    }
}
