use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub account_id: Uuid,
    pub bar_id: Uuid,
    pub booking_date: Date,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bar::Entity",
        from = "Column::BarId",
        to = "super::bar::Column::Id"
    )]
    Bar,
}

impl Related<super::bar::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bar.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
