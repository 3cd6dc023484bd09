use std::env;
use config::{Config, File, ConfigError};
use dotenv::dotenv;
use secrecy::{ExposeSecret, SecretString};

use crate::scoring::ScoringRules;

#[derive(serde::Deserialize, Debug)]
pub struct Settings{
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub scheduler: SchedulerSettings,
    #[serde(default)]
    pub trigger: TriggerSettings,
}

#[derive(serde::Deserialize, Debug)]
pub struct DatabaseSettings{
    pub user: String,
    pub password: SecretString,
    pub port: u16,
    pub host: String,
    pub db_name: String,
    #[serde(default)]
    pub db_url: Option<SecretString>
}

impl DatabaseSettings {
    pub fn connection_string(&self) -> SecretString {
        match &self.db_url {
            Some(db_url) => db_url.clone(),
            None => {
                SecretString::new(format!(
                    "postgres://{}:{}@{}:{}/{}",
                    self.user, self.password.expose_secret(), self.host, self.port, self.db_name
                ).into_boxed_str())
            }
        }
    }
}

#[derive(serde::Deserialize, Debug)]
pub struct ApplicationSettings{
    pub port: u16,
    pub host: String,
    pub log_level: String
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct ScoringSettings {
    #[serde(default = "default_exact_points")]
    pub exact_points: i32,
    #[serde(default = "default_sign_points")]
    pub sign_points: i32,
    /// Take final scores from the official results feed instead of the match rows.
    #[serde(default)]
    pub cross_reference_feed: bool,
    /// Added to the built-in homonym prefixes of the name normalizer.
    #[serde(default)]
    pub ambiguous_prefixes: Vec<String>,
    #[serde(default)]
    pub include_unscored_finished: bool,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            exact_points: default_exact_points(),
            sign_points: default_sign_points(),
            cross_reference_feed: false,
            ambiguous_prefixes: Vec::new(),
            include_unscored_finished: false,
        }
    }
}

impl ScoringSettings {
    pub fn rules(&self) -> ScoringRules {
        ScoringRules {
            exact_points: self.exact_points,
            sign_points: self.sign_points,
        }
    }
}

fn default_exact_points() -> i32 {
    ScoringRules::default().exact_points
}

fn default_sign_points() -> i32 {
    ScoringRules::default().sign_points
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct SchedulerSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_cron")]
    pub cron: String,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            cron: default_cron(),
        }
    }
}

fn default_cron() -> String {
    "0 */5 * * * *".to_string()
}

/// Where the standalone `recalculate_job` sends its requests.
#[derive(serde::Deserialize, Debug, Clone)]
pub struct TriggerSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TriggerSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

pub fn get_config() -> Result<Settings, ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| ConfigError::Message(format!("Failed to determine the current directory: {e}")))?;
    let configuration_directory = base_path.join("configuration");

    dotenv().ok();

    let environment: Environment = env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(ConfigError::Message)?;

    let env_filename = format!("{}.yml", environment.as_str());
    let config = Config::builder()
        .add_source(File::from(configuration_directory.join("base.yml")))
        .add_source(File::from(configuration_directory.join(env_filename)))
        .add_source(
            config::Environment::default()
                .prefix("POSTGRES")
                .prefix_separator("__")
                .separator("__")
        )
        .add_source(
            config::Environment::default()
                .prefix("APP")
                .prefix_separator("__")
                .separator("__")
        )
        .build()?;

    let mut settings = config.try_deserialize::<Settings>()?;

    // Hosted deployments expose the database URL directly
    if let Ok(db_url) = env::var("DATABASE_URL") {
        settings.database.db_url = Some(SecretString::new(db_url.into_boxed_str()));
    }

    Ok(settings)
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. \
                Use either `local` or `production`.",
                other
            )),
        }
    }
}
