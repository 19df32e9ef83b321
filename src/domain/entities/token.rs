use serde::{Serialize, Deserialize};

use crate::entities::account::Role;

/// Body returned by both register and login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub name: String,
    pub role: Role,
}

impl AuthResponse {
    pub fn new(token: String, name: String, role: Role) -> Self {
        AuthResponse { token, name, role }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub exp: usize,
    pub iat: usize,
    pub jti: String,
}
