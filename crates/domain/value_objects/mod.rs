pub mod access;
pub mod enums;
pub mod plan_catalog;
pub mod plans;
pub mod trial_policy;
