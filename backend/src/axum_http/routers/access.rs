use crate::{
    auth::AuthUser,
    axum_http::error_responses::AppError,
    config::config_model::DotEnvyConfig,
    usecases::{access_gate::AccessGate, access_status::AccessStatusUseCase},
};
use axum::{Json, Router, extract::State, routing::get};
use chrono::Utc;
use std::sync::Arc;
use vhr_core::domain::{
    repositories::user_access::UserAccessRepository,
    value_objects::access::{AccessStatusDto, EligibilityDto},
};

pub fn routes<R>(user_access_repo: Arc<R>, config: Arc<DotEnvyConfig>) -> Router
where
    R: UserAccessRepository + Send + Sync + 'static,
{
    let gate = AccessGate::new(
        Arc::new(config.trial.policy.clone()),
        Arc::new(config.plan_catalog.clone()),
    );
    let usecase = AccessStatusUseCase::new(user_access_repo, gate);

    Router::new()
        .route("/status", get(access_status::<R>))
        .route("/eligibility", get(check_eligibility::<R>))
        .with_state(Arc::new(usecase))
}

pub async fn access_status<R>(
    State(usecase): State<Arc<AccessStatusUseCase<R>>>,
    AuthUser { user_id, role, .. }: AuthUser,
) -> Result<Json<AccessStatusDto>, AppError>
where
    R: UserAccessRepository + Send + Sync + 'static,
{
    let status = usecase.get_status(user_id, &role, Utc::now()).await?;
    Ok(Json(status))
}

pub async fn check_eligibility<R>(
    State(usecase): State<Arc<AccessStatusUseCase<R>>>,
    AuthUser { user_id, role, .. }: AuthUser,
) -> Result<Json<EligibilityDto>, AppError>
where
    R: UserAccessRepository + Send + Sync + 'static,
{
    let eligibility = usecase.check_eligibility(user_id, &role, Utc::now()).await?;
    Ok(Json(eligibility))
}
