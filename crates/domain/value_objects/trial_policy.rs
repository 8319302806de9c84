use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::enums::access_states::AccessState;

pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

pub const DEFAULT_TRIAL_DAYS: i64 = 7;
pub const DEFAULT_WARNING_DAYS_BEFORE: i64 = 1;
/// Longest trial the loader accepts, about ten years.
pub const MAX_TRIAL_DAYS: i64 = 3650;

/// What the presentation layer should do once a trial is over. The gate only
/// reads `block_access`; the rest are advisory.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExpirationActions {
    pub block_access: bool,
    pub show_upgrade_prompt: bool,
    pub redirect_to_upgrade: bool,
    pub send_notification_email: bool,
}

impl Default for ExpirationActions {
    fn default() -> Self {
        Self {
            block_access: true,
            show_upgrade_prompt: true,
            redirect_to_upgrade: false,
            send_notification_email: true,
        }
    }
}

/// Process-wide trial configuration, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialPolicy {
    pub trial_duration_ms: i64,
    pub warning_threshold_days: i64,
    pub on_expiration: ExpirationActions,
}

impl Default for TrialPolicy {
    fn default() -> Self {
        Self {
            trial_duration_ms: DEFAULT_TRIAL_DAYS * DAY_MS,
            warning_threshold_days: DEFAULT_WARNING_DAYS_BEFORE,
            on_expiration: ExpirationActions::default(),
        }
    }
}

impl TrialPolicy {
    pub fn trial_duration_days(&self) -> i64 {
        ceil_days(self.trial_duration_ms)
    }

    /// `None` when the expiry is beyond what `DateTime` can represent.
    pub fn trial_expires_at(&self, trial_started_at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        Duration::try_milliseconds(self.trial_duration_ms)
            .and_then(|duration| trial_started_at.checked_add_signed(duration))
    }

    /// Flags the caller acts on whenever access is warned or blocked.
    pub fn advisory_actions(&self, state: AccessState) -> Option<ExpirationActions> {
        match state {
            AccessState::Allowed => None,
            AccessState::AllowedWithWarning | AccessState::Blocked => Some(self.on_expiration),
        }
    }
}

/// Whole days covering `ms`, rounded up. Negative spans round toward zero.
pub fn ceil_days(ms: i64) -> i64 {
    let days = ms.div_euclid(DAY_MS);
    if ms.rem_euclid(DAY_MS) > 0 { days + 1 } else { days }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceil_days_rounds_partial_days_up() {
        assert_eq!(ceil_days(0), 0);
        assert_eq!(ceil_days(1), 1);
        assert_eq!(ceil_days(DAY_MS), 1);
        assert_eq!(ceil_days(DAY_MS + 1), 2);
        assert_eq!(ceil_days(-1), 0);
        assert_eq!(ceil_days(-DAY_MS - 1), -1);
    }

    #[test]
    fn default_policy_is_a_seven_day_trial() {
        let policy = TrialPolicy::default();
        assert_eq!(policy.trial_duration_ms, 604_800_000);
        assert_eq!(policy.trial_duration_days(), 7);
        assert_eq!(policy.warning_threshold_days, 1);
        assert!(policy.on_expiration.block_access);
        assert!(!policy.on_expiration.redirect_to_upgrade);
    }

    #[test]
    fn expiry_saturates_to_none_instead_of_overflowing() {
        let started_at = Utc::now();
        let policy = TrialPolicy::default();
        assert_eq!(
            policy.trial_expires_at(started_at),
            Some(started_at + Duration::days(7))
        );

        let unbounded = TrialPolicy {
            trial_duration_ms: i64::MAX,
            ..TrialPolicy::default()
        };
        assert_eq!(unbounded.trial_expires_at(started_at), None);
    }

    #[test]
    fn advisory_actions_only_surface_for_warned_or_blocked_access() {
        let policy = TrialPolicy::default();
        assert_eq!(policy.advisory_actions(AccessState::Allowed), None);
        assert_eq!(
            policy.advisory_actions(AccessState::Blocked),
            Some(policy.on_expiration)
        );
        assert_eq!(
            policy.advisory_actions(AccessState::AllowedWithWarning),
            Some(policy.on_expiration)
        );
    }
}
