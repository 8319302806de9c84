use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::user_access::UserAccessEntity;

#[async_trait]
#[automock]
pub trait UserAccessRepository {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<UserAccessEntity>>;

    /// Inserts a fresh record unless one exists, then returns the stored record.
    async fn provision(&self, user_id: Uuid) -> Result<UserAccessEntity>;

    /// Sets `trial_started_at` only while it is still null, atomically.
    /// Returns the record as stored, which carries the earlier stamp when
    /// another writer got there first.
    async fn stamp_trial_started_if_absent(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<UserAccessEntity>;
}
