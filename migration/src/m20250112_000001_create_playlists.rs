use sea_orm_migration::prelude::*;

use crate::m20250110_000001_create_users::Users;
use crate::m20250110_000002_create_catalog::Songs;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Playlists {
    Table,
    Id,
    Name,
    Description,
    UserId,
    IsPublic,
    CoverImageUrl,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PlaylistSongs {
    Table,
    PlaylistId,
    SongId,
    Position,
    AddedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Playlists::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Playlists::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Playlists::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Playlists::Description).text().null())
                    .col(ColumnDef::new(Playlists::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(Playlists::IsPublic)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Playlists::CoverImageUrl).string_len(500).null())
                    .col(
                        ColumnDef::new(Playlists::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Playlists::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-playlists-user_id")
                            .from(Playlists::Table, Playlists::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PlaylistSongs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PlaylistSongs::PlaylistId).uuid().not_null())
                    .col(ColumnDef::new(PlaylistSongs::SongId).uuid().not_null())
                    .col(ColumnDef::new(PlaylistSongs::Position).integer().not_null())
                    .col(
                        ColumnDef::new(PlaylistSongs::AddedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(PlaylistSongs::PlaylistId)
                            .col(PlaylistSongs::SongId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-playlist_songs-playlist_id")
                            .from(PlaylistSongs::Table, PlaylistSongs::PlaylistId)
                            .to(Playlists::Table, Playlists::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-playlist_songs-song_id")
                            .from(PlaylistSongs::Table, PlaylistSongs::SongId)
                            .to(Songs::Table, Songs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PlaylistSongs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Playlists::Table).to_owned())
            .await?;
        Ok(())
    }
}
