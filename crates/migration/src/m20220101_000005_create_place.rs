//! Create `places` table.
//!
//! `city_id`/`user_id` are indexed but carry no FK constraint; existence is
//! checked when a place is created and dependents are never cascaded.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Place::Table)
                    .if_not_exists()
                    .col(string_len(Place::Id, 60).primary_key())
                    .col(timestamp(Place::CreatedAt))
                    .col(timestamp(Place::UpdatedAt))
                    .col(string_len(Place::CityId, 60))
                    .col(string_len(Place::UserId, 60))
                    .col(string_len(Place::Name, 128))
                    .col(string_len_null(Place::Description, 1024))
                    .col(integer(Place::NumberRooms).default(0))
                    .col(integer(Place::NumberBathrooms).default(0))
                    .col(integer(Place::MaxGuest).default(0))
                    .col(integer(Place::PriceByNight).default(0))
                    .col(double_null(Place::Latitude))
                    .col(double_null(Place::Longitude))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Place::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Place {
    #[sea_orm(iden = "places")]
    Table,
    Id,
    CreatedAt,
    UpdatedAt,
    CityId,
    UserId,
    Name,
    Description,
    NumberRooms,
    NumberBathrooms,
    MaxGuest,
    PriceByNight,
    Latitude,
    Longitude,
}
