use serde::{Deserialize, Serialize};

use super::serde_helpers::null_as_default;

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
}
