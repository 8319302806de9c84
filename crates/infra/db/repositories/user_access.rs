use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{postgres_connection::PgPool, schema::user_access},
};
use domain::{
    entities::user_access::{InsertUserAccessRow, UserAccessEntity, UserAccessRow},
    repositories::user_access::UserAccessRepository,
};

pub struct UserAccessPostgres {
    db_pool: Arc<PgPool>,
}

impl UserAccessPostgres {
    pub fn new(db_pool: Arc<PgPool>) -> Self {
        Self { db_pool }
    }

    fn load(conn: &mut PgConnection, user_id: Uuid) -> Result<UserAccessEntity> {
        let row = user_access::table
            .filter(user_access::user_id.eq(user_id))
            .select(UserAccessRow::as_select())
            .first::<UserAccessRow>(conn)?;

        Ok(row.into())
    }
}

#[async_trait]
impl UserAccessRepository for UserAccessPostgres {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<UserAccessEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = user_access::table
            .filter(user_access::user_id.eq(user_id))
            .select(UserAccessRow::as_select())
            .first::<UserAccessRow>(&mut conn)
            .optional()?;

        Ok(row.map(UserAccessEntity::from))
    }

    async fn provision(&self, user_id: Uuid) -> Result<UserAccessEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        insert_into(user_access::table)
            .values(&InsertUserAccessRow::fresh(user_id))
            .on_conflict(user_access::user_id)
            .do_nothing()
            .execute(&mut conn)?;

        Self::load(&mut conn, user_id)
    }

    async fn stamp_trial_started_if_absent(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<UserAccessEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // The IS NULL filter makes the write a compare-and-set: a concurrent
        // stamp updates zero rows and the reload below returns the winner.
        update(user_access::table)
            .filter(user_access::user_id.eq(user_id))
            .filter(user_access::trial_started_at.is_null())
            .set((
                user_access::trial_started_at.eq(Some(now)),
                user_access::updated_at.eq(now),
            ))
            .execute(&mut conn)?;

        Self::load(&mut conn, user_id)
    }
}
