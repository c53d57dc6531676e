use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// What the booking flow does when the store fails while a slot is being validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreFailurePolicy {
    /// Report the failure to the caller as an internal error.
    #[default]
    Surface,
    /// Treat the failing check as unsatisfied and reject the slot with that check's reason.
    FailClosed,
}

impl FromStr for StoreFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "surface" => Ok(StoreFailurePolicy::Surface),
            "fail_closed" | "fail-closed" => Ok(StoreFailurePolicy::FailClosed),
            other => Err(format!("unknown store failure policy '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub database_timeout: Duration,
    pub port: u16,
    pub store_failure_policy: StoreFailurePolicy,
}

impl AppConfig {
    pub const DEFAULT_PORT: u16 = 8080;
    pub const DEFAULT_DATABASE_TIMEOUT_SECS: u64 = 10;

    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_service_key: env::var("SUPABASE_SERVICE_KEY")
                .or_else(|_| env::var("SUPABASE_ANON_PUBLIC_KEY"))
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_SERVICE_KEY not set, using empty value");
                    String::new()
                }),
            database_timeout: Duration::from_secs(
                parse_or_default("DATABASE_TIMEOUT_SECS", Self::DEFAULT_DATABASE_TIMEOUT_SECS),
            ),
            port: parse_or_default("PORT", Self::DEFAULT_PORT),
            store_failure_policy: parse_or_default("STORE_FAILURE_POLICY", StoreFailurePolicy::Surface),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty() && !self.supabase_service_key.is_empty()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            supabase_url: String::new(),
            supabase_service_key: String::new(),
            database_timeout: Duration::from_secs(Self::DEFAULT_DATABASE_TIMEOUT_SECS),
            port: Self::DEFAULT_PORT,
            store_failure_policy: StoreFailurePolicy::default(),
        }
    }
}

fn parse_or_default<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Debug,
{
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} has invalid value '{}', using default {:?}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}
