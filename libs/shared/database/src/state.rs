use std::sync::Arc;

use shared_config::AppConfig;

use crate::error::DbError;
use crate::supabase::SupabaseClient;

/// Process-wide handles passed to every router.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub supabase: Arc<SupabaseClient>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, DbError> {
        let supabase = SupabaseClient::new(&config)?;

        Ok(Self {
            config: Arc::new(config),
            supabase: Arc::new(supabase),
        })
    }
}
