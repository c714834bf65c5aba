use domain::NotificationDetail;
use sea_orm::entity::prelude::*;
use sea_orm::Set;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "notification_details")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub notification_id: Uuid,
    pub account_id: Uuid,
    pub is_read: bool,
    pub read_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::notification::Entity",
        from = "Column::NotificationId",
        to = "super::notification::Column::Id"
    )]
    Notification,
}

impl Related<super::notification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notification.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for NotificationDetail {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            notification_id: model.notification_id,
            account_id: model.account_id,
            is_read: model.is_read,
            read_at: model.read_at,
            created_at: model.created_at,
        }
    }
}

impl From<&NotificationDetail> for ActiveModel {
    fn from(detail: &NotificationDetail) -> Self {
        Self {
            id: Set(detail.id),
            notification_id: Set(detail.notification_id),
            account_id: Set(detail.account_id),
            is_read: Set(detail.is_read),
            read_at: Set(detail.read_at),
            created_at: Set(detail.created_at),
        }
    }
}
