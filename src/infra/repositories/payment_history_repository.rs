//! Payment history queries.
//!
//! Payments are scoped through their booking (bar) or their paying account
//! (customer), and every page is enriched with the booking date, the bar and
//! the customer's display fields.

use async_trait::async_trait;
use chrono::{Days, NaiveDate, NaiveTime};
use domain::{
    BarSummary, CustomerSummary, PaymentHistoryQuery, PaymentHistoryRecord, PaymentScope,
};
use sea_orm::sea_query::{Condition, Expr, Func};
use sea_orm::{
    ColumnTrait, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    Select,
};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::base::Repository;
use super::entities::{account, bar, booking, payment_history};
use crate::errors::AppResult;
use crate::infra::unit_of_work::WorkScope;
use crate::types::PageWindow;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PaymentHistoryRepository: Send + Sync {
    async fn count(&self, query: &PaymentHistoryQuery) -> AppResult<u64>;

    /// Payments matching `query`, most recent first.
    ///
    /// `None` when a payment's booking, bar or customer row is missing.
    async fn fetch(
        &self,
        query: &PaymentHistoryQuery,
        window: Option<PageWindow>,
    ) -> AppResult<Option<Vec<PaymentHistoryRecord>>>;
}

pub struct PaymentHistoryStore {
    payments: Repository<payment_history::Entity>,
    bookings: Repository<booking::Entity>,
    bars: Repository<bar::Entity>,
    accounts: Repository<account::Entity>,
}

impl PaymentHistoryStore {
    pub fn new(scope: Arc<WorkScope>) -> Self {
        Self {
            payments: Repository::new(scope.clone()),
            bookings: Repository::new(scope.clone()),
            bars: Repository::new(scope.clone()),
            accounts: Repository::new(scope),
        }
    }

    fn filtered(query: &PaymentHistoryQuery) -> Select<payment_history::Entity> {
        let mut select = payment_history::Entity::find()
            .join(JoinType::InnerJoin, payment_history::Relation::Booking.def())
            .join(JoinType::InnerJoin, payment_history::Relation::Account.def());

        select = match query.scope {
            PaymentScope::Bar(bar_id) => select.filter(booking::Column::BarId.eq(bar_id)),
            PaymentScope::Customer {
                account_id,
                role_id,
            } => select
                .filter(payment_history::Column::AccountId.eq(account_id))
                .filter(account::Column::RoleId.eq(role_id)),
        };

        if let Some(status) = query.status {
            select = select.filter(payment_history::Column::Status.eq(status.code()));
        }

        if let Some(day) = query.payment_date {
            let (start, end) = day_bounds(day);
            select = select
                .filter(payment_history::Column::PaymentDate.gte(start))
                .filter(payment_history::Column::PaymentDate.lt(end));
        }

        if let Some(search) = &query.search {
            let pattern = format!("%{}%", search.to_lowercase());
            let matches = |column: account::Column| {
                Expr::expr(Func::lower(Expr::col((account::Entity, column)))).like(pattern.clone())
            };
            select = select.filter(
                Condition::any()
                    .add(matches(account::Column::FullName))
                    .add(matches(account::Column::Phone))
                    .add(matches(account::Column::Email)),
            );
        }

        select
    }
}

/// Start (inclusive) and end (exclusive) of a UTC calendar day.
fn day_bounds(day: NaiveDate) -> (chrono::DateTime<chrono::Utc>, chrono::DateTime<chrono::Utc>) {
    let start = day.and_time(NaiveTime::MIN).and_utc();
    let end = day
        .checked_add_days(Days::new(1))
        .unwrap_or(day)
        .and_time(NaiveTime::MIN)
        .and_utc();
    (start, end)
}

fn unique(ids: impl Iterator<Item = Uuid>) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = ids.collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

#[async_trait]
impl PaymentHistoryRepository for PaymentHistoryStore {
    async fn count(&self, query: &PaymentHistoryQuery) -> AppResult<u64> {
        self.payments.count(Self::filtered(query)).await
    }

    async fn fetch(
        &self,
        query: &PaymentHistoryQuery,
        window: Option<PageWindow>,
    ) -> AppResult<Option<Vec<PaymentHistoryRecord>>> {
        let select =
            Self::filtered(query).order_by_desc(payment_history::Column::PaymentDate);
        let payments = self.payments.window(select, window).await?;
        if payments.is_empty() {
            return Ok(Some(Vec::new()));
        }

        let bookings: HashMap<Uuid, booking::Model> = self
            .bookings
            .all(booking::Entity::find().filter(
                booking::Column::Id.is_in(unique(payments.iter().map(|p| p.booking_id))),
            ))
            .await?
            .into_iter()
            .map(|b| (b.id, b))
            .collect();

        let bars: HashMap<Uuid, bar::Model> = self
            .bars
            .all(bar::Entity::find().filter(
                bar::Column::Id.is_in(unique(bookings.values().map(|b| b.bar_id))),
            ))
            .await?
            .into_iter()
            .map(|b| (b.id, b))
            .collect();

        let customers: HashMap<Uuid, account::Model> = self
            .accounts
            .all(account::Entity::find().filter(
                account::Column::Id.is_in(unique(payments.iter().map(|p| p.account_id))),
            ))
            .await?
            .into_iter()
            .map(|a| (a.id, a))
            .collect();

        let mut records = Vec::with_capacity(payments.len());
        for model in payments {
            let payment_id = model.id;
            let related = bookings.get(&model.booking_id).and_then(|booking| {
                let bar = bars.get(&booking.bar_id)?;
                let customer = customers.get(&model.account_id)?;
                Some((booking.booking_date, bar.clone(), customer.clone()))
            });
            let Some((booking_date, bar, customer)) = related else {
                tracing::warn!(payment_id = %payment_id, "Payment history with missing related rows");
                return Ok(None);
            };
            let Some(payment) = model.into_domain() else {
                tracing::warn!(payment_id = %payment_id, "Payment history with unknown status code");
                return Ok(None);
            };

            records.push(PaymentHistoryRecord {
                payment,
                booking_date,
                bar: BarSummary::from(bar),
                customer: CustomerSummary {
                    id: customer.id,
                    full_name: customer.full_name,
                    email: customer.email,
                    phone: customer.phone,
                },
            });
        }

        Ok(Some(records))
    }
}
