use entities::user::User;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn add_user(pool: &Pool<Postgres>, user: &User) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"insert into users (id, username, email, password, role, created_at, updated_at)
        values ($1, $2, $3, $4, $5, $6, $7)
        returning *"#,
    )
    .bind(user.id)
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.password)
    .bind(&user.role)
    .bind(user.created_at)
    .bind(user.updated_at)
    .fetch_one(pool)
    .await
}

pub async fn get_user_by_id(pool: &Pool<Postgres>, user_id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("select * from users where id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn get_user_by_username(
    pool: &Pool<Postgres>,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("select * from users where username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await
}

pub async fn get_user_by_username_or_email(
    pool: &Pool<Postgres>,
    username: &str,
    email: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("select * from users where username = $1 or email = $2 limit 1")
        .bind(username)
        .bind(email)
        .fetch_optional(pool)
        .await
}
