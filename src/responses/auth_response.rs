use entities::user::{Role, User};
use serde::Serialize;
use uuid::Uuid;

/// Public view of a user. The password hash never leaves the server.
#[derive(Serialize, Clone, Debug)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        UserResponse {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role(),
        }
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}
