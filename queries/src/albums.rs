use entities::album::{Album, AlbumChanges};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::contains_pattern;

pub async fn add_album(pool: &Pool<Postgres>, album: &Album) -> Result<Album, sqlx::Error> {
    sqlx::query_as::<_, Album>(
        r#"insert into albums (id, title, artist_id, release_date, cover_image_url, genre, created_at, updated_at)
        values ($1, $2, $3, $4, $5, $6, $7, $8)
        returning *"#,
    )
    .bind(album.id)
    .bind(&album.title)
    .bind(album.artist_id)
    .bind(album.release_date)
    .bind(&album.cover_image_url)
    .bind(&album.genre)
    .bind(album.created_at)
    .bind(album.updated_at)
    .fetch_one(pool)
    .await
}

pub async fn get_albums_paginated(
    pool: &Pool<Postgres>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Album>, sqlx::Error> {
    sqlx::query_as::<_, Album>("select * from albums order by title, id limit $1 offset $2")
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn get_album_by_id(
    pool: &Pool<Postgres>,
    album_id: Uuid,
) -> Result<Option<Album>, sqlx::Error> {
    sqlx::query_as::<_, Album>("select * from albums where id = $1")
        .bind(album_id)
        .fetch_optional(pool)
        .await
}

pub async fn get_albums_by_artist_id(
    pool: &Pool<Postgres>,
    artist_id: Uuid,
) -> Result<Vec<Album>, sqlx::Error> {
    sqlx::query_as::<_, Album>(
        "select * from albums where artist_id = $1 order by release_date nulls last, title, id",
    )
    .bind(artist_id)
    .fetch_all(pool)
    .await
}

pub async fn search_albums_by_title(
    pool: &Pool<Postgres>,
    title: &str,
) -> Result<Vec<Album>, sqlx::Error> {
    sqlx::query_as::<_, Album>("select * from albums where title ilike $1 order by title, id")
        .bind(contains_pattern(title))
        .fetch_all(pool)
        .await
}

pub async fn update_album(
    pool: &Pool<Postgres>,
    album_id: Uuid,
    changes: &AlbumChanges,
) -> Result<Option<Album>, sqlx::Error> {
    sqlx::query_as::<_, Album>(
        r#"update albums set
            title = coalesce($2, title),
            artist_id = coalesce($3, artist_id),
            release_date = coalesce($4, release_date),
            cover_image_url = coalesce($5, cover_image_url),
            genre = coalesce($6, genre),
            updated_at = now()
        where id = $1
        returning *"#,
    )
    .bind(album_id)
    .bind(&changes.title)
    .bind(changes.artist_id)
    .bind(changes.release_date)
    .bind(&changes.cover_image_url)
    .bind(&changes.genre)
    .fetch_optional(pool)
    .await
}

pub async fn delete_album_by_id(pool: &Pool<Postgres>, album_id: Uuid) -> Result<u64, sqlx::Error> {
    let ret = sqlx::query("delete from albums where id = $1")
        .bind(album_id)
        .execute(pool)
        .await?;
    Ok(ret.rows_affected())
}
