use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{
    domain::{
        entities::user_access::UserAccessEntity, repositories::user_access::UserAccessRepository,
        value_objects::enums::trial_modes::TrialMode,
    },
    infra::{
        db::{postgres::postgres_connection, repositories::user_access::UserAccessPostgres},
        memory::{unmetered::UserAccessUnmetered, user_access::UserAccessMemory},
    },
};

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub pool_size: u32,
}

/// Storage strategy picked once from the configured trial mode.
pub enum UserAccessStore {
    Postgres(UserAccessPostgres),
    Memory(UserAccessMemory),
    Unmetered(UserAccessUnmetered),
}

impl UserAccessStore {
    pub fn resolve(mode: TrialMode, database: Option<&DatabaseSettings>) -> Result<Self> {
        let store = match mode {
            TrialMode::Database => {
                let database = database
                    .ok_or_else(|| anyhow!("DATABASE_URL is required when TRIAL_MODE=database"))?;
                let pool =
                    postgres_connection::establish_connection(&database.url, database.pool_size)?;
                UserAccessStore::Postgres(UserAccessPostgres::new(Arc::new(pool)))
            }
            TrialMode::Memory => UserAccessStore::Memory(UserAccessMemory::new()),
            TrialMode::None => UserAccessStore::Unmetered(UserAccessUnmetered),
        };

        info!(trial_mode = %mode, "user access store resolved");
        Ok(store)
    }
}

#[async_trait]
impl UserAccessRepository for UserAccessStore {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<UserAccessEntity>> {
        match self {
            UserAccessStore::Postgres(store) => store.find_by_user_id(user_id).await,
            UserAccessStore::Memory(store) => store.find_by_user_id(user_id).await,
            UserAccessStore::Unmetered(store) => store.find_by_user_id(user_id).await,
        }
    }

    async fn provision(&self, user_id: Uuid) -> Result<UserAccessEntity> {
        match self {
            UserAccessStore::Postgres(store) => store.provision(user_id).await,
            UserAccessStore::Memory(store) => store.provision(user_id).await,
            UserAccessStore::Unmetered(store) => store.provision(user_id).await,
        }
    }

    async fn stamp_trial_started_if_absent(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<UserAccessEntity> {
        match self {
            UserAccessStore::Postgres(store) => {
                store.stamp_trial_started_if_absent(user_id, now).await
            }
            UserAccessStore::Memory(store) => {
                store.stamp_trial_started_if_absent(user_id, now).await
            }
            UserAccessStore::Unmetered(store) => {
                store.stamp_trial_started_if_absent(user_id, now).await
            }
        }
    }
}
