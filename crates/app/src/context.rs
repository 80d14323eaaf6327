use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use insight_core::Clock;
use insight_core::model::{SessionSettings, User};
use services::CatalogService;
use storage::{JsonDirRepository, Storage};

#[derive(Debug)]
pub enum ConfigError {
    MissingEmail,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingEmail => {
                write!(f, "no user: pass --email or set INSIGHT_USER_EMAIL")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Wiring shared by every command.
pub struct AppContext {
    pub user: User,
    pub clock: Clock,
    pub settings: SessionSettings,
    pub storage: Storage,
    pub catalog: CatalogService,
}

impl AppContext {
    pub fn from_options(
        data_dir: PathBuf,
        email: Option<String>,
        name: Option<String>,
        department: Option<String>,
        redirect_delay_secs: u64,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let email = email.ok_or(ConfigError::MissingEmail)?;
        let user = User::new(email, name, department)?;
        let clock = Clock::system();
        let settings =
            SessionSettings::default().with_redirect_delay(Duration::from_secs(redirect_delay_secs));

        tracing::debug!(data_dir = %data_dir.display(), user = user.email(), "opening data directory");
        let storage = Storage::from_repository(JsonDirRepository::new(data_dir));
        let catalog = CatalogService::new(
            clock,
            Arc::clone(&storage.tests),
            Arc::clone(&storage.results),
        );

        Ok(Self {
            user,
            clock,
            settings,
            storage,
            catalog,
        })
    }
}
