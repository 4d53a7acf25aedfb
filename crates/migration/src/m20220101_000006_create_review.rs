//! Create `reviews` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Review::Table)
                    .if_not_exists()
                    .col(string_len(Review::Id, 60).primary_key())
                    .col(timestamp(Review::CreatedAt))
                    .col(timestamp(Review::UpdatedAt))
                    .col(string_len(Review::PlaceId, 60))
                    .col(string_len(Review::UserId, 60))
                    .col(string_len(Review::Text, 1024))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Review::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Review {
    #[sea_orm(iden = "reviews")]
    Table,
    Id,
    CreatedAt,
    UpdatedAt,
    PlaceId,
    UserId,
    Text,
}
