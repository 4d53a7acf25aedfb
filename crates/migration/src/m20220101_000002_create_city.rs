//! Create `cities` table.
//!
//! `state_id` is a plain indexed column: deleting a state leaves its cities in place.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(City::Table)
                    .if_not_exists()
                    .col(string_len(City::Id, 60).primary_key())
                    .col(timestamp(City::CreatedAt))
                    .col(timestamp(City::UpdatedAt))
                    .col(string_len(City::StateId, 60))
                    .col(string_len(City::Name, 128))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(City::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum City {
    #[sea_orm(iden = "cities")]
    Table,
    Id,
    CreatedAt,
    UpdatedAt,
    StateId,
    Name,
}
