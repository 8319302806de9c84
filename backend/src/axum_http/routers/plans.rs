use axum::{Json, Router, extract::State, routing::get};
use std::sync::Arc;
use tracing::info;
use vhr_core::domain::value_objects::{
    plan_catalog::PlanCatalog,
    plans::{PlanDto, PlanListingDto},
};

pub fn routes(catalog: Arc<PlanCatalog>) -> Router {
    Router::new()
        .route("/", get(list_plans))
        .with_state(catalog)
}

pub async fn list_plans(State(catalog): State<Arc<PlanCatalog>>) -> Json<PlanListingDto> {
    let plans: Vec<PlanDto> = catalog.plans().iter().cloned().map(PlanDto::from).collect();
    info!(plan_count = plans.len(), "plans: catalog listed");

    Json(PlanListingDto {
        plans,
        billing_options: catalog.billing_options().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vhr_core::domain::value_objects::plans::BillingOption;

    #[tokio::test]
    async fn lists_the_default_catalog() {
        let Json(listing) = list_plans(State(Arc::new(PlanCatalog::default()))).await;

        assert_eq!(listing.plans.len(), 1);
        assert_eq!(listing.plans[0].id, "plan_standard");
        assert_eq!(listing.plans[0].currency, "EUR");
        assert_eq!(listing.billing_options, vec![BillingOption::monthly()]);
    }
}
