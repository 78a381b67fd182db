//! Layered application configuration

mod app_config;

pub use app_config::{
    AppConfig, ContentConfig, CorsConfig, Environment, GithubConfig, LogFormat, LoggingConfig,
    MailConfig, MetricsConfig, OfflineConfig, RateLimitConfig, ServerConfig, UploadConfig,
    DEFAULT_PRECACHE,
};
