use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{
    entities::user_access::UserAccessEntity, repositories::user_access::UserAccessRepository,
};

/// Process-local store. Records are lost on restart.
#[derive(Default)]
pub struct UserAccessMemory {
    records: RwLock<HashMap<Uuid, UserAccessEntity>>,
}

impl UserAccessMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = UserAccessEntity>) -> Self {
        Self {
            records: RwLock::new(
                records
                    .into_iter()
                    .map(|record| (record.user_id, record))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl UserAccessRepository for UserAccessMemory {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<UserAccessEntity>> {
        Ok(self.records.read().await.get(&user_id).cloned())
    }

    async fn provision(&self, user_id: Uuid) -> Result<UserAccessEntity> {
        let mut records = self.records.write().await;
        let record = records
            .entry(user_id)
            .or_insert_with(|| UserAccessEntity::new(user_id));

        Ok(record.clone())
    }

    async fn stamp_trial_started_if_absent(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<UserAccessEntity> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&user_id)
            .ok_or_else(|| anyhow!("user access record {user_id} not found"))?;

        if record.trial_started_at.is_none() {
            record.trial_started_at = Some(now);
        }

        Ok(record.clone())
    }
}
