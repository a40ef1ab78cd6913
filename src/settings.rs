use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, str::FromStr, time::Duration};
use url::Url;

use crate::constants::{EVENTS_ROTATION_PERIOD, POSTERS_ROTATION_PERIOD};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default)]
    pub supabase_url: String,

    #[serde(default)]
    pub supabase_key: String,

    #[serde(default)]
    pub form_webhook_url: String,

    #[serde(default = "default_events_bucket")]
    pub events_bucket: String,

    #[serde(default = "default_posters_bucket")]
    pub posters_bucket: String,

    #[serde(default = "default_admin_fragment")]
    pub admin_fragment: String,

    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,

    #[serde(default = "default_events_rotation")]
    pub events_rotation_secs: u64,

    #[serde(default = "default_posters_rotation")]
    pub posters_rotation_secs: u64,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Showcase-Site".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_events_bucket() -> String {
    "events-images".to_string()
}
fn default_posters_bucket() -> String {
    "posters-media".to_string()
}
fn default_admin_fragment() -> String {
    "#admin".to_string()
}
fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}
fn default_events_rotation() -> u64 {
    EVENTS_ROTATION_PERIOD.as_secs()
}
fn default_posters_rotation() -> u64 {
    POSTERS_ROTATION_PERIOD.as_secs()
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(Environment::with_prefix("APP").prefix_separator("_").ignore_empty(true));

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        config.supabase_url = fill_or_env(config.supabase_url, "APP_SUPABASE_URL")?;
        config.supabase_key = fill_or_env(config.supabase_key, "APP_SUPABASE_KEY")?;

        if config.form_webhook_url.trim().is_empty() {
            config.form_webhook_url = env::var("APP_FORM_WEBHOOK_URL").unwrap_or_default();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.supabase_url.trim().is_empty() {
            errors.push("SUPABASE_URL cannot be empty".to_string());
        } else if Url::parse(&self.supabase_url).is_err() {
            errors.push(format!("SUPABASE_URL is not a valid URL: {}", self.supabase_url));
        }
        if self.supabase_key.trim().is_empty() {
            errors.push("SUPABASE_KEY cannot be empty".to_string());
        }
        if !self.form_webhook_url.trim().is_empty() && Url::parse(&self.form_webhook_url).is_err() {
            errors.push("FORM_WEBHOOK_URL is not a valid URL".to_string());
        }
        if !self.admin_fragment.starts_with('#') {
            errors.push("ADMIN_FRAGMENT must start with '#'".to_string());
        }
        if self.events_rotation_secs == 0 || self.posters_rotation_secs == 0 {
            errors.push("Carousel rotation periods must be at least one second".to_string());
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn events_rotation(&self) -> Duration {
        Duration::from_secs(self.events_rotation_secs)
    }

    pub fn posters_rotation(&self) -> Duration {
        Duration::from_secs(self.posters_rotation_secs)
    }
}

fn fill_or_env(current: String, env_key: &str) -> Result<String, ConfigError> {
    if current.trim().is_empty() {
        env::var(env_key).map_err(|_| ConfigError::Message(format!("{env_key} must be set")))
    } else {
        Ok(current)
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for str {
    fn redact(&self) -> &str {
        if self.is_empty() {
            "[MISSING]"
        } else {
            "[REDACTED]"
        }
    }
}

impl Redact for String {
    fn redact(&self) -> &str {
        self.as_str().redact()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("supabase_url", &self.supabase_url)
            .field("supabase_key", &self.supabase_key.redact())
            .field("form_webhook_url", &self.form_webhook_url.redact())
            .field("events_bucket", &self.events_bucket)
            .field("posters_bucket", &self.posters_bucket)
            .field("admin_fragment", &self.admin_fragment)
            .field("ffmpeg_path", &self.ffmpeg_path)
            .field("events_rotation_secs", &self.events_rotation_secs)
            .field("posters_rotation_secs", &self.posters_rotation_secs)
            .finish()
    }
}
