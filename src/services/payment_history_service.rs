//! Paginated payment history for a bar or a customer.

use async_trait::async_trait;
use domain::{
    CallerId, PaymentHistoryFilter, PaymentHistoryQuery, PaymentHistoryResponse, PaymentScope,
};
use std::sync::Arc;
use uuid::Uuid;

use super::access;
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{PageRequest, PageWindow, PagedResult};

#[async_trait]
pub trait PaymentHistoryService: Send + Sync {
    /// Payments for bookings at `bar_id`. The caller must work for that bar.
    async fn get_by_bar(
        &self,
        caller: CallerId,
        bar_id: Uuid,
        filter: PaymentHistoryFilter,
        page: PageRequest,
    ) -> AppResult<PagedResult<PaymentHistoryResponse>>;

    /// Payments made by `customer_id`. Callers may only read their own.
    async fn get_by_customer(
        &self,
        caller: CallerId,
        customer_id: Uuid,
        filter: PaymentHistoryFilter,
        page: PageRequest,
    ) -> AppResult<PagedResult<PaymentHistoryResponse>>;
}

pub struct PaymentHistoryManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> PaymentHistoryManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn page(
        &self,
        query: PaymentHistoryQuery,
        window: PageWindow,
    ) -> AppResult<PagedResult<PaymentHistoryResponse>> {
        let payments = self.uow.payment_histories();
        let total = payments.count(&query).await?;
        let records = payments
            .fetch(&query, Some(window))
            .await?
            .ok_or_not_found("Payment history")?;

        let items = records
            .into_iter()
            .map(PaymentHistoryResponse::from)
            .collect();
        Ok(PagedResult::new(items, total, window))
    }
}

#[async_trait]
impl<U: UnitOfWork> PaymentHistoryService for PaymentHistoryManager<U> {
    async fn get_by_bar(
        &self,
        caller: CallerId,
        bar_id: Uuid,
        filter: PaymentHistoryFilter,
        page: PageRequest,
    ) -> AppResult<PagedResult<PaymentHistoryResponse>> {
        let window = page.window()?;
        access::ensure_bar_scope(self.uow.as_ref(), caller, bar_id).await?;

        let query = PaymentHistoryQuery::new(PaymentScope::Bar(bar_id), filter);
        self.page(query, window).await
    }

    async fn get_by_customer(
        &self,
        caller: CallerId,
        customer_id: Uuid,
        filter: PaymentHistoryFilter,
        page: PageRequest,
    ) -> AppResult<PagedResult<PaymentHistoryResponse>> {
        let window = page.window()?;
        access::ensure_self(caller, customer_id)?;

        let role = access::customer_role(self.uow.as_ref()).await?;
        let scope = PaymentScope::Customer {
            account_id: customer_id,
            role_id: role.id,
        };
        self.page(PaymentHistoryQuery::new(scope, filter), window)
            .await
    }
}
