use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Datasets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Datasets::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Datasets::Name).text().not_null())
                    .col(
                        ColumnDef::new(Datasets::UploadTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Datasets::File).text().not_null())
                    .col(
                        ColumnDef::new(Datasets::RowCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Datasets::Checksum)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .to_owned(),
            )
            .await?;

        // Listing and retention both order by upload time
        manager
            .create_index(
                Index::create()
                    .name("idx_datasets_upload_time")
                    .table(Datasets::Table)
                    .col(Datasets::UploadTime)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Datasets::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Datasets {
    Table,
    Id,
    Name,
    UploadTime,
    File,
    RowCount,
    Checksum,
}
