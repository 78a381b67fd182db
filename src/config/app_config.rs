use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::upload::{DEFAULT_ALLOWED_EXTENSIONS, DEFAULT_MAX_UPLOAD_BYTES};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub cors: CorsConfig,
    pub rate_limit: RateLimitConfig,
    pub mail: MailConfig,
    pub github: GithubConfig,
    pub upload: UploadConfig,
    pub content: ContentConfig,
    pub offline: OfflineConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Overrides the per-environment defaults when set
    pub allowed_origins: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub global_window_secs: u64,
    pub global_max: u32,
    pub contact_window_secs: u64,
    pub contact_max: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// Provider send endpoint
    pub api_url: String,
    pub api_key: Option<String>,
    pub from: String,
    pub to: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub api_url: String,
    pub user: String,
    pub per_page: u32,
    pub timeout_secs: u64,
}

/// Prometheus exporter settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    /// Scrape endpoint path
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub max_bytes: u64,
    pub allowed_extensions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub resume_url: String,
    /// Static site root for `serve`
    pub static_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OfflineConfig {
    pub cache_name: String,
    /// Deployed site the proxy fronts
    pub origin: String,
    pub port: u16,
    pub precache: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: Environment::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl CorsConfig {
    /// Configured origins, or the environment's defaults
    pub fn origins(&self, environment: Environment) -> Vec<String> {
        if let Some(origins) = &self.allowed_origins {
            return origins.clone();
        }

        let defaults: &[&str] = match environment {
            Environment::Production => {
                &["https://annan-shrestha.github.io", "https://your-domain.com"]
            }
            Environment::Development => &["http://localhost:3000", "http://127.0.0.1:5500"],
        };

        defaults.iter().map(|s| s.to_string()).collect()
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            global_window_secs: 15 * 60,
            global_max: 100,
            contact_window_secs: 60 * 60,
            contact_max: 5,
        }
    }
}

impl RateLimitConfig {
    pub fn global_window(&self) -> Duration {
        Duration::from_secs(self.global_window_secs)
    }

    pub fn contact_window(&self) -> Duration {
        Duration::from_secs(self.contact_window_secs)
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.resend.com/emails".to_string(),
            api_key: None,
            from: "Portfolio <portfolio@annan.dev>".to_string(),
            to: "annanshrestha1@gmail.com".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            user: "AnnShrestha".to_string(),
            per_page: 10,
            timeout_secs: 10,
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("uploads"),
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            resume_url: "https://drive.google.com/file/d/17hXSAKD9pRQDGgVzb8D2wCkKYHPOMQlb/view?usp=drive_link".to_string(),
            static_dir: PathBuf::from("public"),
        }
    }
}

/// Site assets preloaded by each cache generation
pub const DEFAULT_PRECACHE: &[&str] = &[
    "/",
    "/index.html",
    "/css/custom.css",
    "/js/main.js",
    "/images/about-me.png",
    "/images/about-me1.png",
    "/images/bg_1.jpg",
    "/images/Inventory.jpg",
    "/images/loc.png",
    "/images/proj_1.jpg",
    "/images/proj_2.jpg",
    "/images/proj_3.jpg",
    "/images/icons/arcgis.png",
    "/images/icons/excel.png",
    "/images/icons/python.png",
    "/images/icons/qgis.png",
    "/images/icons/terrset.png",
    "https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css",
    "https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/js/bootstrap.bundle.min.js",
    "https://unpkg.com/aos@2.3.1/dist/aos.js",
    "https://unpkg.com/aos@2.3.1/dist/aos.css",
    "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/5.15.4/css/all.min.css",
];

impl Default for OfflineConfig {
    fn default() -> Self {
        Self {
            cache_name: "portfolio-cache-v1".to_string(),
            origin: "http://localhost:3000".to_string(),
            port: 8081,
            precache: DEFAULT_PRECACHE.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl AppConfig {
    /// `config/default.*`, then `config/local.*`, then `APP__`-prefixed
    /// environment variables
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .with_list_parse_key("offline.precache")
                    .with_list_parse_key("upload.allowed_extensions")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
