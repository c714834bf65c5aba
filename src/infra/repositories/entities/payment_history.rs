use domain::{PaymentHistory, PaymentStatus};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payment_histories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub account_id: Uuid,
    pub booking_id: Uuid,
    pub payment_date: DateTimeUtc,
    pub total_price: f64,
    pub provider_name: String,
    pub transaction_code: String,
    pub status: i16,
    pub note: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::booking::Entity",
        from = "Column::BookingId",
        to = "super::booking::Column::Id"
    )]
    Booking,
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id"
    )]
    Account,
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Booking.def()
    }
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// `None` when the stored status code is unknown.
    pub fn into_domain(self) -> Option<PaymentHistory> {
        let status = PaymentStatus::from_code(self.status)?;
        Some(PaymentHistory {
            id: self.id,
            account_id: self.account_id,
            booking_id: self.booking_id,
            payment_date: self.payment_date,
            total_price: self.total_price,
            provider_name: self.provider_name,
            transaction_code: self.transaction_code,
            status,
            note: self.note,
        })
    }
}
