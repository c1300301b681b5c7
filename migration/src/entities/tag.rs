use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::service_tag::Entity")]
    ServiceTag,
}

impl Related<super::service_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceTag.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
