pub mod access_states;
pub mod billing_periods;
pub mod subscription_statuses;
pub mod trial_modes;
