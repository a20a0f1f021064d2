use serde::{Deserialize, Serialize};

/// JWT claims for an admin session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    /// Session version at issue time; bumped on logout
    pub ver: i64,
    pub jti: String,
    pub exp: usize,
    pub iat: usize,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Authenticated admin session, inserted into request extensions
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub session_id: String,
}
