use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Claims read from an access token issued by Supabase Auth.
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub exp: Option<u64>,
    pub iat: Option<u64>,
    pub email: Option<String>,
    pub role: Option<String>,
}

/// Caller identity placed in request extensions by the auth middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub role: Option<String>,
    /// When the presented token was issued.
    pub issued_at: Option<DateTime<Utc>>,
}
