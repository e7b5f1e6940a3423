use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "business_processes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub description: String,

    // JSON-encoded list of department names; decoded by ProcessStore only
    pub departments: String,

    // Comma-separated role tokens; empty or "all" means unrestricted
    pub allowed_roles: String,

    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::process_step::Entity")]
    ProcessStep,
}

impl Related<super::process_step::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProcessStep.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
