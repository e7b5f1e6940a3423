use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "process_steps")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub process_id: String,
    // 1-based, contiguous within a process; ascending order is display order
    #[sea_orm(primary_key, auto_increment = false)]
    pub step_number: i32,
    pub title: String,
    pub description: String,
    pub responsible: String,
    pub duration: Option<String>,

    // JSON-encoded list of content ids; weak references, may dangle
    pub related_content_ids: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::business_process::Entity",
        from = "Column::ProcessId",
        to = "super::business_process::Column::Id",
        on_delete = "Cascade"
    )]
    BusinessProcess,
}

impl Related<super::business_process::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BusinessProcess.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
