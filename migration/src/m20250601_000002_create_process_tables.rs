use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create business_processes table
        manager
            .create_table(
                Table::create()
                    .table(BusinessProcesses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BusinessProcesses::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(BusinessProcesses::Name).string().not_null())
                    .col(ColumnDef::new(BusinessProcesses::Description).string().not_null().default(""))
                    .col(ColumnDef::new(BusinessProcesses::Departments).string().not_null().default("[]"))
                    .col(ColumnDef::new(BusinessProcesses::AllowedRoles).string().not_null().default(""))
                    .col(ColumnDef::new(BusinessProcesses::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(BusinessProcesses::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Create process_steps table
        //
        // Composite primary key (process_id, step_number) keeps step numbers
        // unique within a process. Related content ids are a JSON-encoded
        // list of weak references with no foreign key.
        manager
            .create_table(
                Table::create()
                    .table(ProcessSteps::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ProcessSteps::ProcessId).string().not_null())
                    .col(ColumnDef::new(ProcessSteps::StepNumber).integer().not_null())
                    .col(ColumnDef::new(ProcessSteps::Title).string().not_null())
                    .col(ColumnDef::new(ProcessSteps::Description).string().not_null().default(""))
                    .col(ColumnDef::new(ProcessSteps::Responsible).string().not_null().default(""))
                    .col(ColumnDef::new(ProcessSteps::Duration).string().null())
                    .col(ColumnDef::new(ProcessSteps::RelatedContentIds).string().not_null().default("[]"))
                    .primary_key(
                        Index::create()
                            .col(ProcessSteps::ProcessId)
                            .col(ProcessSteps::StepNumber),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_process_steps_process_id")
                            .from(ProcessSteps::Table, ProcessSteps::ProcessId)
                            .to(BusinessProcesses::Table, BusinessProcesses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create index for step lookups by process
        manager
            .create_index(
                Index::create()
                    .name("idx_process_steps_process_id")
                    .table(ProcessSteps::Table)
                    .col(ProcessSteps::ProcessId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProcessSteps::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BusinessProcesses::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum BusinessProcesses {
    Table,
    Id,
    Name,
    Description,
    Departments,
    AllowedRoles,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ProcessSteps {
    Table,
    ProcessId,
    StepNumber,
    Title,
    Description,
    Responsible,
    Duration,
    RelatedContentIds,
}
