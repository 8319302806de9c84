use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    domain::value_objects::enums::subscription_statuses::SubscriptionStatus,
    infra::db::postgres::schema::user_access,
};

/// Per-user trial and subscription state. The gate only ever writes
/// `trial_started_at`; subscription fields belong to the payment webhooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserAccessEntity {
    pub user_id: Uuid,
    pub trial_started_at: Option<DateTime<Utc>>,
    pub subscription_status: SubscriptionStatus,
    pub plan_id: Option<String>,
}

impl UserAccessEntity {
    /// Fresh record as created at sign-up.
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            trial_started_at: None,
            subscription_status: SubscriptionStatus::None,
            plan_id: None,
        }
    }
}

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = user_access, primary_key(user_id))]
pub struct UserAccessRow {
    pub user_id: Uuid,
    pub trial_started_at: Option<DateTime<Utc>>,
    pub subscription_status: String,
    pub plan_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserAccessRow> for UserAccessEntity {
    fn from(value: UserAccessRow) -> Self {
        Self {
            user_id: value.user_id,
            trial_started_at: value.trial_started_at,
            subscription_status: SubscriptionStatus::from_str(&value.subscription_status),
            plan_id: value.plan_id,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_access)]
pub struct InsertUserAccessRow {
    pub user_id: Uuid,
    pub subscription_status: String,
}

impl InsertUserAccessRow {
    pub fn fresh(user_id: Uuid) -> Self {
        Self {
            user_id,
            subscription_status: SubscriptionStatus::None.to_string(),
        }
    }
}
