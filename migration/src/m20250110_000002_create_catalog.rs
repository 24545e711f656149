use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
pub enum Artists {
    Table,
    Id,
    Name,
    Biography,
    Country,
    ImageUrl,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum Albums {
    Table,
    Id,
    Title,
    ArtistId,
    ReleaseDate,
    CoverImageUrl,
    Genre,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum Songs {
    Table,
    Id,
    Title,
    ArtistId,
    AlbumId,
    DurationSeconds,
    FileUrl,
    Genre,
    PlayCount,
    CreatedAt,
    UpdatedAt,
}

fn timestamps<C: IntoIden, U: IntoIden>(table: &mut TableCreateStatement, created: C, updated: U) {
    table
        .col(
            ColumnDef::new(created)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(updated)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        );
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut artists = Table::create()
            .table(Artists::Table)
            .if_not_exists()
            .col(ColumnDef::new(Artists::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Artists::Name).string_len(255).not_null())
            .col(ColumnDef::new(Artists::Biography).text().null())
            .col(ColumnDef::new(Artists::Country).string_len(100).null())
            .col(ColumnDef::new(Artists::ImageUrl).string_len(500).null())
            .to_owned();
        timestamps(&mut artists, Artists::CreatedAt, Artists::UpdatedAt);
        manager.create_table(artists).await?;

        // Can't have an Album without an Artist
        let mut albums = Table::create()
            .table(Albums::Table)
            .if_not_exists()
            .col(ColumnDef::new(Albums::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Albums::Title).string_len(255).not_null())
            .col(ColumnDef::new(Albums::ArtistId).uuid().not_null())
            .col(ColumnDef::new(Albums::ReleaseDate).date().null())
            .col(ColumnDef::new(Albums::CoverImageUrl).string_len(500).null())
            .col(ColumnDef::new(Albums::Genre).string_len(100).null())
            .foreign_key(
                ForeignKey::create()
                    .name("fk-albums-artist_id")
                    .from(Albums::Table, Albums::ArtistId)
                    .to(Artists::Table, Artists::Id)
                    .on_delete(ForeignKeyAction::Restrict),
            )
            .to_owned();
        timestamps(&mut albums, Albums::CreatedAt, Albums::UpdatedAt);
        manager.create_table(albums).await?;

        let mut songs = Table::create()
            .table(Songs::Table)
            .if_not_exists()
            .col(ColumnDef::new(Songs::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Songs::Title).string_len(255).not_null())
            .col(ColumnDef::new(Songs::ArtistId).uuid().not_null())
            .col(ColumnDef::new(Songs::AlbumId).uuid().null())
            .col(
                ColumnDef::new(Songs::DurationSeconds)
                    .integer()
                    .not_null()
                    .default(0),
            )
            .col(ColumnDef::new(Songs::FileUrl).string_len(500).not_null())
            .col(ColumnDef::new(Songs::Genre).string_len(100).null())
            .col(
                ColumnDef::new(Songs::PlayCount)
                    .integer()
                    .not_null()
                    .default(0),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk-songs-artist_id")
                    .from(Songs::Table, Songs::ArtistId)
                    .to(Artists::Table, Artists::Id)
                    .on_delete(ForeignKeyAction::Restrict),
            )
            // Songs outlive their album
            .foreign_key(
                ForeignKey::create()
                    .name("fk-songs-album_id")
                    .from(Songs::Table, Songs::AlbumId)
                    .to(Albums::Table, Albums::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            )
            .to_owned();
        timestamps(&mut songs, Songs::CreatedAt, Songs::UpdatedAt);
        manager.create_table(songs).await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx-albums-artist_id")
                    .table(Albums::Table)
                    .col(Albums::ArtistId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx-songs-artist_id")
                    .table(Songs::Table)
                    .col(Songs::ArtistId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx-songs-album_id")
                    .table(Songs::Table)
                    .col(Songs::AlbumId)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Songs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Albums::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Artists::Table).to_owned())
            .await?;
        Ok(())
    }
}
