use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;
use vhr_core::domain::{
    entities::user_access::UserAccessEntity,
    repositories::user_access::UserAccessRepository,
    value_objects::{
        access::{AccessDecision, AccessStatusDto, EligibilityDto},
        enums::{
            access_states::{AccessReason, AccessState},
            subscription_statuses::SubscriptionStatus,
        },
    },
};

use crate::usecases::access_gate::{AccessGate, AccessGateError};

pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("user not found")]
    UserNotFound,
    #[error(transparent)]
    InvalidRecord(#[from] AccessGateError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AccessError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            AccessError::UserNotFound => StatusCode::NOT_FOUND,
            AccessError::InvalidRecord(_) => StatusCode::CONFLICT,
            AccessError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, AccessError>;

pub struct AccessStatusUseCase<R>
where
    R: UserAccessRepository + Send + Sync + 'static,
{
    user_access_repo: Arc<R>,
    gate: AccessGate,
}

impl<R> AccessStatusUseCase<R>
where
    R: UserAccessRepository + Send + Sync + 'static,
{
    pub fn new(user_access_repo: Arc<R>, gate: AccessGate) -> Self {
        Self {
            user_access_repo,
            gate,
        }
    }

    /// Full trial/subscription status. Users unknown to the store get a fresh
    /// trial record instead of an error.
    pub async fn get_status(
        &self,
        user_id: Uuid,
        role: &str,
        now: DateTime<Utc>,
    ) -> UseCaseResult<AccessStatusDto> {
        info!(%user_id, "access: status requested");

        if role == ADMIN_ROLE {
            info!(%user_id, "access: administrator, skipping trial checks");
            return Ok(AccessStatusDto::unrestricted(self.gate.policy()));
        }

        let record = match self.find_record(user_id).await? {
            Some(record) => record,
            None => {
                warn!(%user_id, "access: no access record, provisioning trial account");
                self.user_access_repo
                    .provision(user_id)
                    .await
                    .map_err(|err| {
                        error!(%user_id, db_error = ?err, "access: failed to provision record");
                        AccessError::Internal(err)
                    })?
            }
        };

        let (record, decision) = self.stamp_and_evaluate(record, now).await?;

        Ok(AccessStatusDto::from_decision(
            &record,
            decision,
            self.gate.policy(),
        ))
    }

    /// Whether the user may download the headset app right now.
    pub async fn check_eligibility(
        &self,
        user_id: Uuid,
        role: &str,
        now: DateTime<Utc>,
    ) -> UseCaseResult<EligibilityDto> {
        info!(%user_id, "access: download eligibility requested");

        if role == ADMIN_ROLE {
            return Ok(
                AccessDecision::new(AccessState::Allowed, AccessReason::Unrestricted, None).into(),
            );
        }

        let record = match self.find_record(user_id).await? {
            Some(record) => record,
            None => {
                warn!(%user_id, "access: eligibility check for unknown user");
                return Err(AccessError::UserNotFound);
            }
        };

        let (_, decision) = self.stamp_and_evaluate(record, now).await?;
        Ok(decision.into())
    }

    async fn find_record(&self, user_id: Uuid) -> UseCaseResult<Option<UserAccessEntity>> {
        self.user_access_repo
            .find_by_user_id(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "access: failed to load access record");
                AccessError::Internal(err)
            })
    }

    async fn stamp_and_evaluate(
        &self,
        record: UserAccessEntity,
        now: DateTime<Utc>,
    ) -> UseCaseResult<(UserAccessEntity, AccessDecision)> {
        let user_id = record.user_id;

        // Stamp through the store so racing requests agree on one start date.
        // Canceled accounts never start a trial here.
        let starts_trial = record.trial_started_at.is_none()
            && record.subscription_status != SubscriptionStatus::Canceled;
        let record = if starts_trial {
            let stamped = self
                .user_access_repo
                .stamp_trial_started_if_absent(user_id, now)
                .await
                .map_err(|err| {
                    error!(%user_id, db_error = ?err, "access: failed to stamp trial start");
                    AccessError::Internal(err)
                })?;
            if let Some(trial_started_at) = stamped.trial_started_at {
                info!(%user_id, %trial_started_at, "access: trial started");
            }
            stamped
        } else {
            record
        };

        let decision = self.gate.evaluate(&record, now).map_err(|err| {
            error!(%user_id, error = %err, "access: access record is inconsistent");
            AccessError::InvalidRecord(err)
        })?;

        info!(
            %user_id,
            state = %decision.state,
            reason = %decision.reason,
            days_remaining = ?decision.days_remaining,
            "access: decision computed"
        );

        Ok((record, decision))
    }
}
