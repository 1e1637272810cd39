use std::env;
use tracing::warn;

pub const DEFAULT_SLOT_GRANULARITY_MINUTES: i64 = 15;
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_jwt_secret: String,
    /// Step between candidate booking start times offered to clients.
    pub slot_granularity_minutes: i64,
    pub bind_address: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            supabase_url: String::new(),
            supabase_anon_key: String::new(),
            supabase_jwt_secret: String::new(),
            slot_granularity_minutes: DEFAULT_SLOT_GRANULARITY_MINUTES,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                    String::new()
                }),
            supabase_jwt_secret: env::var("SUPABASE_JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_JWT_SECRET not set, using empty value");
                    String::new()
                }),
            slot_granularity_minutes: parse_granularity(env::var("SLOT_GRANULARITY_MINUTES").ok()),
            bind_address: env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string()),
        };

        if !config.is_configured() {
            warn!("Supabase not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.supabase_anon_key.is_empty()
            && !self.supabase_jwt_secret.is_empty()
    }
}

fn parse_granularity(raw: Option<String>) -> i64 {
    match raw {
        None => DEFAULT_SLOT_GRANULARITY_MINUTES,
        Some(value) => match value.trim().parse::<i64>() {
            Ok(minutes) if minutes > 0 => minutes,
            _ => {
                warn!(
                    "SLOT_GRANULARITY_MINUTES={} is not a positive integer, using {}",
                    value, DEFAULT_SLOT_GRANULARITY_MINUTES
                );
                DEFAULT_SLOT_GRANULARITY_MINUTES
            }
        },
    }
}
