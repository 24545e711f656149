use entities::artist::{Artist, ArtistChanges};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::contains_pattern;

pub async fn add_artist(pool: &Pool<Postgres>, artist: &Artist) -> Result<Artist, sqlx::Error> {
    sqlx::query_as::<_, Artist>(
        r#"insert into artists (id, name, biography, country, image_url, created_at, updated_at)
        values ($1, $2, $3, $4, $5, $6, $7)
        returning *"#,
    )
    .bind(artist.id)
    .bind(&artist.name)
    .bind(&artist.biography)
    .bind(&artist.country)
    .bind(&artist.image_url)
    .bind(artist.created_at)
    .bind(artist.updated_at)
    .fetch_one(pool)
    .await
}

pub async fn get_artists_paginated(
    pool: &Pool<Postgres>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Artist>, sqlx::Error> {
    sqlx::query_as::<_, Artist>("select * from artists order by name, id limit $1 offset $2")
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn get_artist_by_id(
    pool: &Pool<Postgres>,
    artist_id: Uuid,
) -> Result<Option<Artist>, sqlx::Error> {
    sqlx::query_as::<_, Artist>("select * from artists where id = $1")
        .bind(artist_id)
        .fetch_optional(pool)
        .await
}

pub async fn search_artists_by_name(
    pool: &Pool<Postgres>,
    name: &str,
) -> Result<Vec<Artist>, sqlx::Error> {
    sqlx::query_as::<_, Artist>("select * from artists where name ilike $1 order by name, id")
        .bind(contains_pattern(name))
        .fetch_all(pool)
        .await
}

pub async fn update_artist(
    pool: &Pool<Postgres>,
    artist_id: Uuid,
    changes: &ArtistChanges,
) -> Result<Option<Artist>, sqlx::Error> {
    sqlx::query_as::<_, Artist>(
        r#"update artists set
            name = coalesce($2, name),
            biography = coalesce($3, biography),
            country = coalesce($4, country),
            image_url = coalesce($5, image_url),
            updated_at = now()
        where id = $1
        returning *"#,
    )
    .bind(artist_id)
    .bind(&changes.name)
    .bind(&changes.biography)
    .bind(&changes.country)
    .bind(&changes.image_url)
    .fetch_optional(pool)
    .await
}

pub async fn delete_artist_by_id(pool: &Pool<Postgres>, artist_id: Uuid) -> Result<u64, sqlx::Error> {
    let ret = sqlx::query("delete from artists where id = $1")
        .bind(artist_id)
        .execute(pool)
        .await?;
    Ok(ret.rows_affected())
}
