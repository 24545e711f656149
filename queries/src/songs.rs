use entities::song::{Song, SongChanges};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::contains_pattern;

pub async fn add_song(pool: &Pool<Postgres>, song: &Song) -> Result<Song, sqlx::Error> {
    sqlx::query_as::<_, Song>(
        r#"insert into songs (id, title, artist_id, album_id, duration_seconds, file_url, genre, play_count, created_at, updated_at)
        values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        returning *"#,
    )
    .bind(song.id)
    .bind(&song.title)
    .bind(song.artist_id)
    .bind(song.album_id)
    .bind(song.duration_seconds)
    .bind(&song.file_url)
    .bind(&song.genre)
    .bind(song.play_count)
    .bind(song.created_at)
    .bind(song.updated_at)
    .fetch_one(pool)
    .await
}

pub async fn get_songs_paginated(
    pool: &Pool<Postgres>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Song>, sqlx::Error> {
    sqlx::query_as::<_, Song>("select * from songs order by title, id limit $1 offset $2")
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn get_song_by_id(
    pool: &Pool<Postgres>,
    song_id: Uuid,
) -> Result<Option<Song>, sqlx::Error> {
    sqlx::query_as::<_, Song>("select * from songs where id = $1")
        .bind(song_id)
        .fetch_optional(pool)
        .await
}

pub async fn get_songs_by_artist_id(
    pool: &Pool<Postgres>,
    artist_id: Uuid,
) -> Result<Vec<Song>, sqlx::Error> {
    sqlx::query_as::<_, Song>("select * from songs where artist_id = $1 order by title, id")
        .bind(artist_id)
        .fetch_all(pool)
        .await
}

pub async fn get_songs_by_album_id(
    pool: &Pool<Postgres>,
    album_id: Uuid,
) -> Result<Vec<Song>, sqlx::Error> {
    sqlx::query_as::<_, Song>("select * from songs where album_id = $1 order by created_at, id")
        .bind(album_id)
        .fetch_all(pool)
        .await
}

pub async fn search_songs_by_title(
    pool: &Pool<Postgres>,
    title: &str,
) -> Result<Vec<Song>, sqlx::Error> {
    sqlx::query_as::<_, Song>("select * from songs where title ilike $1 order by title, id")
        .bind(contains_pattern(title))
        .fetch_all(pool)
        .await
}

pub async fn update_song(
    pool: &Pool<Postgres>,
    song_id: Uuid,
    changes: &SongChanges,
) -> Result<Option<Song>, sqlx::Error> {
    sqlx::query_as::<_, Song>(
        r#"update songs set
            title = coalesce($2, title),
            artist_id = coalesce($3, artist_id),
            album_id = coalesce($4, album_id),
            duration_seconds = coalesce($5, duration_seconds),
            file_url = coalesce($6, file_url),
            genre = coalesce($7, genre),
            updated_at = now()
        where id = $1
        returning *"#,
    )
    .bind(song_id)
    .bind(&changes.title)
    .bind(changes.artist_id)
    .bind(changes.album_id)
    .bind(changes.duration_seconds)
    .bind(&changes.file_url)
    .bind(&changes.genre)
    .fetch_optional(pool)
    .await
}

pub async fn delete_song_by_id(pool: &Pool<Postgres>, song_id: Uuid) -> Result<u64, sqlx::Error> {
    let ret = sqlx::query("delete from songs where id = $1")
        .bind(song_id)
        .execute(pool)
        .await?;
    Ok(ret.rows_affected())
}

/// Single-statement increment, so concurrent plays are never lost.
pub async fn increment_play_count(
    pool: &Pool<Postgres>,
    song_id: Uuid,
) -> Result<Option<i32>, sqlx::Error> {
    sqlx::query_scalar::<_, i32>(
        "update songs set play_count = least(play_count, 2147483646) + 1, updated_at = now() where id = $1 returning play_count",
    )
    .bind(song_id)
    .fetch_optional(pool)
    .await
}
