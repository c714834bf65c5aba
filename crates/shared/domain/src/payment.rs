//! Payment history and the query that scopes it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of a payment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
    Refunded,
}

impl PaymentStatus {
    /// Code stored in the `status` column
    pub fn code(&self) -> i16 {
        match self {
            PaymentStatus::Pending => 0,
            PaymentStatus::Success => 1,
            PaymentStatus::Failed => 2,
            PaymentStatus::Refunded => 3,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(PaymentStatus::Pending),
            1 => Some(PaymentStatus::Success),
            2 => Some(PaymentStatus::Failed),
            3 => Some(PaymentStatus::Refunded),
            _ => None,
        }
    }
}

/// A single payment made by a customer for a booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentHistory {
    pub id: Uuid,
    pub account_id: Uuid,
    pub booking_id: Uuid,
    pub payment_date: DateTime<Utc>,
    pub total_price: f64,
    pub provider_name: String,
    pub transaction_code: String,
    pub status: PaymentStatus,
    pub note: Option<String>,
}

/// Display fields of the bar a payment was made at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarSummary {
    pub id: Uuid,
    pub name: String,
}

/// Display fields of the paying customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// A payment together with the related rows needed to describe it.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentHistoryRecord {
    pub payment: PaymentHistory,
    pub booking_date: NaiveDate,
    pub bar: BarSummary,
    pub customer: CustomerSummary,
}

/// Whose payments a query may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentScope {
    /// Payments for bookings at a bar
    Bar(Uuid),
    /// Payments made by one account holding the given role
    Customer { account_id: Uuid, role_id: Uuid },
}

/// Optional narrowing applied on top of a scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PaymentHistoryFilter {
    pub status: Option<PaymentStatus>,
    /// Calendar day (UTC) of the payment
    pub payment_date: Option<NaiveDate>,
    /// Case-insensitive match on customer name, phone or e-mail
    pub search: Option<String>,
}

/// Full description of a payment-history query.
///
/// Built once per request and handed unchanged to both the count and the
/// page fetch, so the two always apply the same predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentHistoryQuery {
    pub scope: PaymentScope,
    pub status: Option<PaymentStatus>,
    pub payment_date: Option<NaiveDate>,
    pub search: Option<String>,
}

impl PaymentHistoryQuery {
    pub fn new(scope: PaymentScope, filter: PaymentHistoryFilter) -> Self {
        Self {
            scope,
            status: filter.status,
            payment_date: filter.payment_date,
            search: filter
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }
}

/// Flattened payment history row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PaymentHistoryResponse {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub booking_date: NaiveDate,
    pub bar_id: Uuid,
    pub bar_name: String,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub payment_date: DateTime<Utc>,
    pub total_price: f64,
    pub provider_name: String,
    pub transaction_code: String,
    pub status: PaymentStatus,
    pub note: Option<String>,
}

impl From<PaymentHistoryRecord> for PaymentHistoryResponse {
    fn from(record: PaymentHistoryRecord) -> Self {
        let PaymentHistoryRecord {
            payment,
            booking_date,
            bar,
            customer,
        } = record;
        Self {
            id: payment.id,
            booking_id: payment.booking_id,
            booking_date,
            bar_id: bar.id,
            bar_name: bar.name,
            customer_id: customer.id,
            customer_name: customer.full_name,
            customer_email: customer.email,
            customer_phone: customer.phone,
            payment_date: payment.payment_date,
            total_price: payment.total_price,
            provider_name: payment.provider_name,
            transaction_code: payment.transaction_code,
            status: payment.status,
            note: payment.note,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_round_trip() {
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Success,
            PaymentStatus::Failed,
            PaymentStatus::Refunded,
        ] {
            assert_eq!(PaymentStatus::from_code(status.code()), Some(status));
        }
        assert_eq!(PaymentStatus::from_code(9), None);
    }

    #[test]
    fn test_query_drops_blank_search() {
        let filter = PaymentHistoryFilter {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        let query = PaymentHistoryQuery::new(PaymentScope::Bar(Uuid::new_v4()), filter);
        assert_eq!(query.search, None);
    }

    #[test]
    fn test_response_carries_related_display_fields() {
        let bar_id = Uuid::new_v4();
        let customer_id = Uuid::new_v4();
        let record = PaymentHistoryRecord {
            payment: PaymentHistory {
                id: Uuid::new_v4(),
                account_id: customer_id,
                booking_id: Uuid::new_v4(),
                payment_date: Utc::now(),
                total_price: 250_000.0,
                provider_name: "VNPay".to_string(),
                transaction_code: "TX-1".to_string(),
                status: PaymentStatus::Success,
                note: None,
            },
            booking_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            bar: BarSummary {
                id: bar_id,
                name: "Blue Note".to_string(),
            },
            customer: CustomerSummary {
                id: customer_id,
                full_name: "Linh Tran".to_string(),
                email: "linh@example.com".to_string(),
                phone: Some("0900000000".to_string()),
            },
        };

        let response = PaymentHistoryResponse::from(record);
        assert_eq!(response.bar_id, bar_id);
        assert_eq!(response.bar_name, "Blue Note");
        assert_eq!(response.customer_name, "Linh Tran");
        assert_eq!(response.status, PaymentStatus::Success);
    }
}
