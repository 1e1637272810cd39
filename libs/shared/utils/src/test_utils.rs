//! Fixtures shared by the cells' test suites: an `AppConfig` pointing at a
//! local (or wiremock) PostgREST, and HS256 tokens the auth middleware accepts.

use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::{json, Value};
use sha2::Sha256;
use uuid::Uuid;

use shared_config::AppConfig;

pub const TEST_JWT_SECRET: &str = "test-secret-key-for-jwt-validation-must-be-long-enough";

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: TEST_JWT_SECRET.to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_supabase_url(url: &str) -> Self {
        Self {
            supabase_url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            supabase_jwt_secret: self.jwt_secret.clone(),
            ..AppConfig::default()
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

/// Someone calling the API: a salon owner managing schedules, a stylist, or a client.
pub struct TestUser {
    pub id: String,
    pub email: String,
    pub role: String,
}

impl TestUser {
    pub fn new(email: &str, role: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            role: role.to_string(),
        }
    }

    pub fn salon_owner(email: &str) -> Self {
        Self::new(email, "salon_owner")
    }

    pub fn staff(email: &str) -> Self {
        Self::new(email, "staff")
    }

    pub fn client(email: &str) -> Self {
        Self::new(email, "client")
    }

    fn claims(&self, issued: chrono::DateTime<Utc>, lifetime: Duration) -> Value {
        json!({
            "sub": self.id,
            "email": self.email,
            "role": self.role,
            "iat": issued.timestamp(),
            "exp": (issued + lifetime).timestamp()
        })
    }
}

pub struct TestTokens;

impl TestTokens {
    /// Signs arbitrary claims with HS256.
    pub fn sign(claims: &Value, secret: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(json!({ "alg": "HS256", "typ": "JWT" }).to_string());
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        let signing_input = format!("{}.{}", header, payload);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        format!("{}.{}", signing_input, signature)
    }

    pub fn valid(user: &TestUser, secret: &str) -> String {
        Self::sign(&user.claims(Utc::now(), Duration::hours(1)), secret)
    }

    pub fn expired(user: &TestUser, secret: &str) -> String {
        Self::sign(&user.claims(Utc::now() - Duration::hours(2), Duration::hours(1)), secret)
    }

    /// Well-formed, but signed with a key the server does not know.
    pub fn forged(user: &TestUser) -> String {
        Self::valid(user, "not-the-server-secret")
    }

    /// A salon owner's token for the default test secret.
    pub fn owner() -> String {
        Self::valid(&TestUser::salon_owner("owner@salon.test"), TEST_JWT_SECRET)
    }
}
