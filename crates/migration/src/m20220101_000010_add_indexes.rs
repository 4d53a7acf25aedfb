use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Cities: lookup by state
        manager
            .create_index(
                Index::create()
                    .name("idx_cities_state")
                    .table(City::Table)
                    .col(City::StateId)
                    .to_owned(),
            )
            .await?;

        // Places: lookup by city, and by owner
        manager
            .create_index(
                Index::create()
                    .name("idx_places_city")
                    .table(Place::Table)
                    .col(Place::CityId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_places_user")
                    .table(Place::Table)
                    .col(Place::UserId)
                    .to_owned(),
            )
            .await?;

        // Reviews: lookup by place
        manager
            .create_index(
                Index::create()
                    .name("idx_reviews_place")
                    .table(Review::Table)
                    .col(Review::PlaceId)
                    .to_owned(),
            )
            .await?;

        // place_amenity: reverse lookup by amenity
        manager
            .create_index(
                Index::create()
                    .name("idx_place_amenity_amenity")
                    .table(PlaceAmenity::Table)
                    .col(PlaceAmenity::AmenityId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_place_amenity_amenity").table(PlaceAmenity::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_reviews_place").table(Review::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_places_user").table(Place::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_places_city").table(Place::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_cities_state").table(City::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum City {
    #[sea_orm(iden = "cities")]
    Table,
    StateId,
}

#[derive(DeriveIden)]
enum Place {
    #[sea_orm(iden = "places")]
    Table,
    CityId,
    UserId,
}

#[derive(DeriveIden)]
enum Review {
    #[sea_orm(iden = "reviews")]
    Table,
    PlaceId,
}

#[derive(DeriveIden)]
enum PlaceAmenity { Table, AmenityId }
