use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Sre,
    Viewer,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct User {
    pub id: u64,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
}

/// Result of `POST /auth/login`. The backend may also set a session cookie.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Token lifetime in seconds.
    pub expires_in: Option<u64>,
    pub user: Option<User>,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Result of `POST /auth/register`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RegisterResponse {
    pub message: Option<String>,
    pub user: Option<User>,
}
