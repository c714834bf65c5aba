//! Payment history handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};
use chrono::NaiveDate;
use domain::{PaymentHistoryFilter, PaymentHistoryResponse, PaymentStatus};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::api::extractors::ValidatedQuery;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::types::{PageRequest, PagedResult};

/// Optional narrowing of a payment history page.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaymentHistoryParams {
    #[param(inline)]
    pub status: Option<PaymentStatus>,
    /// Day of payment (UTC), `YYYY-MM-DD`
    pub payment_date: Option<NaiveDate>,
    /// Matches customer name, phone or e-mail
    pub search: Option<String>,
}

impl From<PaymentHistoryParams> for PaymentHistoryFilter {
    fn from(params: PaymentHistoryParams) -> Self {
        Self {
            status: params.status,
            payment_date: params.payment_date,
            search: params.search,
        }
    }
}

pub fn payment_history_routes() -> Router<AppState> {
    Router::new()
        .route("/bars/:bar_id", get(get_by_bar))
        .route("/customers/:customer_id", get(get_by_customer))
}

/// Payments for bookings at a bar (bar staff only)
#[utoipa::path(
    get,
    path = "/payment-histories/bars/{bar_id}",
    tag = "Payment histories",
    security(("bearer_auth" = [])),
    params(("bar_id" = Uuid, Path, description = "Bar ID"), PageRequest, PaymentHistoryParams),
    responses(
        (status = 200, description = "One page of payments, most recent first", body = PagedPaymentHistories),
        (status = 400, description = "Invalid paging"),
        (status = 401, description = "Caller does not work for this bar"),
        (status = 404, description = "A related booking, bar or account is missing")
    )
)]
pub async fn get_by_bar(
    current_user: CurrentUser,
    State(state): State<AppState>,
    Path(bar_id): Path<Uuid>,
    ValidatedQuery(page): ValidatedQuery<PageRequest>,
    ValidatedQuery(params): ValidatedQuery<PaymentHistoryParams>,
) -> AppResult<Json<PagedResult<PaymentHistoryResponse>>> {
    let payments = state
        .services
        .payment_histories()
        .get_by_bar(current_user.caller(), bar_id, params.into(), page)
        .await?;

    Ok(Json(payments))
}

/// Payments made by a customer (the customer only)
#[utoipa::path(
    get,
    path = "/payment-histories/customers/{customer_id}",
    tag = "Payment histories",
    security(("bearer_auth" = [])),
    params(("customer_id" = Uuid, Path, description = "Customer account ID"), PageRequest, PaymentHistoryParams),
    responses(
        (status = 200, description = "One page of payments, most recent first", body = PagedPaymentHistories),
        (status = 400, description = "Invalid paging"),
        (status = 401, description = "Not the caller's account"),
        (status = 404, description = "Customer role or a related row is missing")
    )
)]
pub async fn get_by_customer(
    current_user: CurrentUser,
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
    ValidatedQuery(page): ValidatedQuery<PageRequest>,
    ValidatedQuery(params): ValidatedQuery<PaymentHistoryParams>,
) -> AppResult<Json<PagedResult<PaymentHistoryResponse>>> {
    let payments = state
        .services
        .payment_histories()
        .get_by_customer(current_user.caller(), customer_id, params.into(), page)
        .await?;

    Ok(Json(payments))
}
