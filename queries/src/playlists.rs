use entities::playlist::{Playlist, PlaylistChanges, PlaylistSong};
use entities::song::Song;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::contains_pattern;

pub async fn add_playlist(pool: &Pool<Postgres>, playlist: &Playlist) -> Result<Playlist, sqlx::Error> {
    sqlx::query_as::<_, Playlist>(
        r#"insert into playlists (id, name, description, user_id, is_public, cover_image_url, created_at, updated_at)
        values ($1, $2, $3, $4, $5, $6, $7, $8)
        returning *"#,
    )
    .bind(playlist.id)
    .bind(&playlist.name)
    .bind(&playlist.description)
    .bind(playlist.user_id)
    .bind(playlist.is_public)
    .bind(&playlist.cover_image_url)
    .bind(playlist.created_at)
    .bind(playlist.updated_at)
    .fetch_one(pool)
    .await
}

pub async fn get_playlist_by_id(
    pool: &Pool<Postgres>,
    playlist_id: Uuid,
) -> Result<Option<Playlist>, sqlx::Error> {
    sqlx::query_as::<_, Playlist>("select * from playlists where id = $1")
        .bind(playlist_id)
        .fetch_optional(pool)
        .await
}

/// Public playlists plus the ones owned by `viewer`.
pub async fn get_visible_playlists(
    pool: &Pool<Postgres>,
    viewer: Option<Uuid>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Playlist>, sqlx::Error> {
    sqlx::query_as::<_, Playlist>(
        r#"select * from playlists
        where is_public or user_id = $1
        order by name, id
        limit $2 offset $3"#,
    )
    .bind(viewer)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn search_visible_playlists(
    pool: &Pool<Postgres>,
    viewer: Option<Uuid>,
    name: &str,
) -> Result<Vec<Playlist>, sqlx::Error> {
    sqlx::query_as::<_, Playlist>(
        r#"select * from playlists
        where (is_public or user_id = $1) and name ilike $2
        order by name, id"#,
    )
    .bind(viewer)
    .bind(contains_pattern(name))
    .fetch_all(pool)
    .await
}

pub async fn get_playlists_by_user_id(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    include_private: bool,
) -> Result<Vec<Playlist>, sqlx::Error> {
    sqlx::query_as::<_, Playlist>(
        "select * from playlists where user_id = $1 and (is_public or $2) order by name, id",
    )
    .bind(user_id)
    .bind(include_private)
    .fetch_all(pool)
    .await
}

pub async fn update_playlist(
    pool: &Pool<Postgres>,
    playlist_id: Uuid,
    changes: &PlaylistChanges,
) -> Result<Option<Playlist>, sqlx::Error> {
    sqlx::query_as::<_, Playlist>(
        r#"update playlists set
            name = coalesce($2, name),
            description = coalesce($3, description),
            is_public = coalesce($4, is_public),
            cover_image_url = coalesce($5, cover_image_url),
            updated_at = now()
        where id = $1
        returning *"#,
    )
    .bind(playlist_id)
    .bind(&changes.name)
    .bind(&changes.description)
    .bind(changes.is_public)
    .bind(&changes.cover_image_url)
    .fetch_optional(pool)
    .await
}

pub async fn delete_playlist_by_id(
    pool: &Pool<Postgres>,
    playlist_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let ret = sqlx::query("delete from playlists where id = $1")
        .bind(playlist_id)
        .execute(pool)
        .await?;
    Ok(ret.rows_affected())
}

/// Inserts the join row. Without an explicit position the song goes after
/// the current last one, computed in the same statement.
pub async fn add_playlist_song(
    pool: &Pool<Postgres>,
    playlist_id: Uuid,
    song_id: Uuid,
    position: Option<i32>,
) -> Result<PlaylistSong, sqlx::Error> {
    sqlx::query_as::<_, PlaylistSong>(
        r#"insert into playlist_songs (playlist_id, song_id, position, added_at)
        select $1, $2,
            coalesce($3, (select coalesce(max(position), 0) + 1 from playlist_songs where playlist_id = $1)),
            now()
        returning *"#,
    )
    .bind(playlist_id)
    .bind(song_id)
    .bind(position)
    .fetch_one(pool)
    .await
}

pub async fn remove_playlist_song(
    pool: &Pool<Postgres>,
    playlist_id: Uuid,
    song_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let ret = sqlx::query("delete from playlist_songs where playlist_id = $1 and song_id = $2")
        .bind(playlist_id)
        .bind(song_id)
        .execute(pool)
        .await?;
    Ok(ret.rows_affected())
}

pub async fn get_playlist_songs(
    pool: &Pool<Postgres>,
    playlist_id: Uuid,
) -> Result<Vec<Song>, sqlx::Error> {
    sqlx::query_as::<_, Song>(
        r#"select songs.* from playlist_songs
        inner join songs on songs.id = playlist_songs.song_id
        where playlist_songs.playlist_id = $1
        order by playlist_songs.position, playlist_songs.added_at"#,
    )
    .bind(playlist_id)
    .fetch_all(pool)
    .await
}
