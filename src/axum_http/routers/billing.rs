use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch},
};
use serde::{Deserialize, Serialize};

use crate::auth::AdminSession;
use crate::axum_http::error_responses::AppError;
use crate::axum_http::format;
use crate::backend_api::BackendClient;
use crate::backend_api::billing::{
    PaymentListFilter, PaymentListItem, PaymentListResponse, SubscriptionListFilter,
    SubscriptionListResponse,
};
use crate::cache::QueryCache;
use crate::usecases::billing::{BillingGateway, BillingUseCase};

/// Payment with the minor-unit amount kept verbatim and a formatted display
/// string added next to it.
#[derive(Debug, Serialize)]
pub struct PaymentRow {
    #[serde(flatten)]
    pub payment: PaymentListItem,
    pub amount_display: String,
}

#[derive(Debug, Serialize)]
pub struct PaymentListView {
    pub items: Vec<PaymentRow>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_amount: i64,
    /// Omitted on an empty page, which has no currency to format with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount_display: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusChange {
    pub status: String,
}

pub fn payment_routes(client: Arc<BackendClient>, cache: Arc<QueryCache>) -> Router {
    let billing_usecase = BillingUseCase::new(client, cache);

    Router::new()
        .route("/", get(list_payments))
        .with_state(Arc::new(billing_usecase))
}

pub fn subscription_routes(client: Arc<BackendClient>, cache: Arc<QueryCache>) -> Router {
    let billing_usecase = BillingUseCase::new(client, cache);

    Router::new()
        .route("/", get(list_subscriptions))
        .route("/:subscription_id", patch(update_subscription_status))
        .with_state(Arc::new(billing_usecase))
}

fn payment_list_view(response: PaymentListResponse) -> PaymentListView {
    // Assume a single currency per page for the footer total; mixed pages
    // fall back to the first row's currency.
    let total_amount_display = response
        .items
        .first()
        .map(|payment| format::minor_units(response.total_amount, &payment.currency));

    let items = response
        .items
        .into_iter()
        .map(|payment| {
            let amount_display = format::minor_units(payment.amount, &payment.currency);
            PaymentRow {
                payment,
                amount_display,
            }
        })
        .collect();

    PaymentListView {
        items,
        total: response.total,
        page: response.page,
        page_size: response.page_size,
        total_amount: response.total_amount,
        total_amount_display,
    }
}

pub async fn list_payments<G>(
    State(billing_usecase): State<Arc<BillingUseCase<G>>>,
    _session: AdminSession,
    Query(filter): Query<PaymentListFilter>,
) -> Result<Json<PaymentListView>, AppError>
where
    G: BillingGateway + Send + Sync + 'static,
{
    let response = billing_usecase.list_payments(&filter).await?;
    Ok(Json(payment_list_view(response)))
}

pub async fn list_subscriptions<G>(
    State(billing_usecase): State<Arc<BillingUseCase<G>>>,
    _session: AdminSession,
    Query(filter): Query<SubscriptionListFilter>,
) -> Result<Json<SubscriptionListResponse>, AppError>
where
    G: BillingGateway + Send + Sync + 'static,
{
    let response = billing_usecase.list_subscriptions(&filter).await?;
    Ok(Json(response))
}

pub async fn update_subscription_status<G>(
    State(billing_usecase): State<Arc<BillingUseCase<G>>>,
    _session: AdminSession,
    Path(subscription_id): Path<i64>,
    Json(change): Json<StatusChange>,
) -> Result<Json<SubscriptionListResponse>, AppError>
where
    G: BillingGateway + Send + Sync + 'static,
{
    billing_usecase
        .update_subscription_status(subscription_id, change.status)
        .await?;
    let response = billing_usecase
        .list_subscriptions(&SubscriptionListFilter::default())
        .await?;
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn payment(amount: i64, currency: &str) -> PaymentListItem {
        PaymentListItem {
            id: "pay_1".to_string(),
            user_id: 1,
            subscription_id: None,
            amount,
            currency: currency.to_string(),
            status: "succeeded".to_string(),
            is_recurring: false,
            description: None,
            created_at: Utc::now(),
            paid_at: Some(Utc::now()),
            user_telegram_id: None,
            user_username: None,
        }
    }

    #[test]
    fn test_footer_total_uses_the_page_currency() {
        let view = payment_list_view(PaymentListResponse {
            items: vec![payment(12900, "RUB")],
            total: 1,
            page: 1,
            page_size: 20,
            total_amount: 12900,
        });

        assert_eq!(view.items[0].amount_display, "129.00 RUB");
        assert_eq!(view.total_amount_display.as_deref(), Some("129.00 RUB"));
    }

    #[test]
    fn test_empty_page_omits_the_footer_display() {
        let view = payment_list_view(PaymentListResponse {
            items: vec![],
            total: 0,
            page: 1,
            page_size: 20,
            total_amount: 0,
        });

        assert!(view.items.is_empty());
        assert_eq!(view.total_amount, 0);
        assert_eq!(view.total_amount_display, None);
    }
}
