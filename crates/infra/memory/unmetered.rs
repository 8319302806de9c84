use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    entities::user_access::UserAccessEntity, repositories::user_access::UserAccessRepository,
};

/// Store behind `TRIAL_MODE=none`: nothing is persisted and trials never
/// start, so every user evaluates as a trial that has not begun.
#[derive(Debug, Default, Clone, Copy)]
pub struct UserAccessUnmetered;

#[async_trait]
impl UserAccessRepository for UserAccessUnmetered {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<UserAccessEntity>> {
        Ok(Some(UserAccessEntity::new(user_id)))
    }

    async fn provision(&self, user_id: Uuid) -> Result<UserAccessEntity> {
        Ok(UserAccessEntity::new(user_id))
    }

    async fn stamp_trial_started_if_absent(
        &self,
        user_id: Uuid,
        _now: DateTime<Utc>,
    ) -> Result<UserAccessEntity> {
        Ok(UserAccessEntity::new(user_id))
    }
}
