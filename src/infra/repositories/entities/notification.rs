use domain::Notification;
use sea_orm::entity::prelude::*;
use sea_orm::Set;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub image_url: Option<String>,
    pub link: Option<String>,
    pub is_public: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::notification_detail::Entity")]
    NotificationDetail,
}

impl Related<super::notification_detail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::NotificationDetail.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Notification {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            message: model.message,
            image_url: model.image_url,
            link: model.link,
            is_public: model.is_public,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<&Notification> for ActiveModel {
    fn from(notification: &Notification) -> Self {
        Self {
            id: Set(notification.id),
            title: Set(notification.title.clone()),
            message: Set(notification.message.clone()),
            image_url: Set(notification.image_url.clone()),
            link: Set(notification.link.clone()),
            is_public: Set(notification.is_public),
            created_at: Set(notification.created_at),
            updated_at: Set(notification.updated_at),
        }
    }
}
