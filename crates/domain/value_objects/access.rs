use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{
    entities::user_access::UserAccessEntity,
    value_objects::{
        enums::{
            access_states::{AccessReason, AccessState},
            subscription_statuses::SubscriptionStatus,
        },
        trial_policy::{ExpirationActions, TrialPolicy},
    },
};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct AccessDecision {
    pub state: AccessState,
    pub reason: AccessReason,
    pub days_remaining: Option<i64>,
}

impl AccessDecision {
    pub fn new(state: AccessState, reason: AccessReason, days_remaining: Option<i64>) -> Self {
        Self {
            state,
            reason,
            days_remaining,
        }
    }

    pub fn message(&self) -> String {
        let days = self.days_remaining.unwrap_or(0);
        match self.reason {
            AccessReason::Subscribed => "Access granted by an active subscription".to_string(),
            AccessReason::PaymentFailed => {
                "Last payment failed, update your payment method to keep access".to_string()
            }
            AccessReason::Canceled => "Subscription canceled, subscribe to continue".to_string(),
            AccessReason::TrialExpired => {
                "Trial expired, a subscription is required to continue".to_string()
            }
            AccessReason::TrialEndingSoon => format!("Trial ending soon, {days} day(s) remaining"),
            AccessReason::TrialActive | AccessReason::TrialNotStarted => {
                format!("Trial in progress, {days} day(s) remaining")
            }
            AccessReason::Unrestricted => "Unrestricted administrator access".to_string(),
        }
    }
}

/// Response of the access status endpoint.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AccessStatusDto {
    pub state: AccessState,
    pub reason: AccessReason,
    pub days_remaining: Option<i64>,
    pub total_days: i64,
    pub trial_started_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub subscription_status: SubscriptionStatus,
    pub plan_id: Option<String>,
    pub access_blocked: bool,
    /// Present only when access is warned or blocked.
    pub advisory: Option<ExpirationActions>,
    pub message: String,
}

impl AccessStatusDto {
    pub fn from_decision(
        record: &UserAccessEntity,
        decision: AccessDecision,
        policy: &TrialPolicy,
    ) -> Self {
        Self {
            state: decision.state,
            reason: decision.reason,
            days_remaining: decision.days_remaining,
            total_days: policy.trial_duration_days(),
            trial_started_at: record.trial_started_at,
            expires_at: record
                .trial_started_at
                .and_then(|started_at| policy.trial_expires_at(started_at)),
            subscription_status: record.subscription_status,
            plan_id: record.plan_id.clone(),
            access_blocked: decision.state.is_blocked(),
            advisory: policy.advisory_actions(decision.state),
            message: decision.message(),
        }
    }

    pub fn unrestricted(policy: &TrialPolicy) -> Self {
        let decision = AccessDecision::new(AccessState::Allowed, AccessReason::Unrestricted, None);
        Self {
            state: decision.state,
            reason: decision.reason,
            days_remaining: None,
            total_days: policy.trial_duration_days(),
            trial_started_at: None,
            expires_at: None,
            subscription_status: SubscriptionStatus::Active,
            plan_id: None,
            access_blocked: false,
            advisory: None,
            message: decision.message(),
        }
    }
}

/// Response of the download eligibility endpoint.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EligibilityDto {
    pub can_download: bool,
    pub state: AccessState,
    pub reason: AccessReason,
    pub days_remaining: Option<i64>,
}

impl From<AccessDecision> for EligibilityDto {
    fn from(value: AccessDecision) -> Self {
        Self {
            can_download: !value.state.is_blocked(),
            state: value.state,
            reason: value.reason,
            days_remaining: value.days_remaining,
        }
    }
}
