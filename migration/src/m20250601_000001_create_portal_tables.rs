use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Name).string().null())
                    .col(ColumnDef::new(Users::Role).string().not_null().default("user"))
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Create categories table
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Categories::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Categories::Slug).string().not_null().unique_key())
                    .col(ColumnDef::new(Categories::Name).string().not_null())
                    .col(ColumnDef::new(Categories::Description).string().not_null().default(""))
                    .col(ColumnDef::new(Categories::Icon).string().not_null().default("folder"))
                    .col(ColumnDef::new(Categories::AllowedRoles).string().not_null().default(""))
                    .to_owned(),
            )
            .await?;

        // Create content table
        manager
            .create_table(
                Table::create()
                    .table(Content::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Content::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Content::Title).string().not_null())
                    .col(ColumnDef::new(Content::Description).string().not_null().default(""))
                    .col(ColumnDef::new(Content::CategoryId).string().not_null())
                    .col(ColumnDef::new(Content::Kind).string().not_null())
                    .col(ColumnDef::new(Content::Duration).string().null())
                    .col(ColumnDef::new(Content::Thumbnail).string().null())
                    .col(ColumnDef::new(Content::VideoUrl).string().null())
                    .col(ColumnDef::new(Content::Body).string().null())
                    .col(ColumnDef::new(Content::Views).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Content::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_content_category_id")
                            .from(Content::Table, Content::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create index for content lookups by category
        manager
            .create_index(
                Index::create()
                    .name("idx_content_category_id")
                    .table(Content::Table)
                    .col(Content::CategoryId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Content::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    PasswordHash,
    Name,
    Role,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    Slug,
    Name,
    Description,
    Icon,
    AllowedRoles,
}

#[derive(DeriveIden)]
enum Content {
    Table,
    Id,
    Title,
    Description,
    CategoryId,
    Kind,
    Duration,
    Thumbnail,
    VideoUrl,
    Body,
    Views,
    CreatedAt,
}
