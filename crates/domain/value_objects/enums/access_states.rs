use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessState {
    Allowed,
    AllowedWithWarning,
    Blocked,
}

impl AccessState {
    pub fn is_blocked(&self) -> bool {
        matches!(self, AccessState::Blocked)
    }
}

impl Display for AccessState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self {
            AccessState::Allowed => "ALLOWED",
            AccessState::AllowedWithWarning => "ALLOWED_WITH_WARNING",
            AccessState::Blocked => "BLOCKED",
        };
        write!(f, "{}", state)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessReason {
    Subscribed,
    PaymentFailed,
    Canceled,
    TrialExpired,
    TrialEndingSoon,
    TrialActive,
    TrialNotStarted,
    /// Administrator accounts never go through the gate.
    Unrestricted,
}

impl Display for AccessReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            AccessReason::Subscribed => "SUBSCRIBED",
            AccessReason::PaymentFailed => "PAYMENT_FAILED",
            AccessReason::Canceled => "CANCELED",
            AccessReason::TrialExpired => "TRIAL_EXPIRED",
            AccessReason::TrialEndingSoon => "TRIAL_ENDING_SOON",
            AccessReason::TrialActive => "TRIAL_ACTIVE",
            AccessReason::TrialNotStarted => "TRIAL_NOT_STARTED",
            AccessReason::Unrestricted => "UNRESTRICTED",
        };
        write!(f, "{}", reason)
    }
}
