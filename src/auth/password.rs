use crate::auth::AuthError;

/// bcrypt is CPU bound; it runs on the blocking pool.
pub async fn hash_password(password: String, cost: u32) -> Result<String, AuthError> {
    let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
    Ok(hashed)
}

pub async fn verify_password(password: String, hash: String) -> Result<bool, AuthError> {
    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_then_verify() {
        let hash = hash_password("correct horse".to_string(), 4).await.unwrap();
        assert!(hash.starts_with("$2"));
        assert!(verify_password("correct horse".to_string(), hash.clone()).await.unwrap());
        assert!(!verify_password("battery staple".to_string(), hash).await.unwrap());
    }
}
