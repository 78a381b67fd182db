//! Domain layer - Core business logic and entities

pub mod contact;
pub mod content;
pub mod error;
pub mod gis;
pub mod offline;
pub mod repository;
pub mod upload;

pub use contact::{ContactForm, ContactSubmission, ContactValidationError, MailMessage, Mailer};
pub use content::ContentCatalog;
pub use error::DomainError;
pub use gis::{AnalysisRequest, AnalysisResult, SampleKind};
pub use offline::{
    AssetRequest, AssetResponse, CacheName, CacheStorage, CacheStore, FetchOutcome, Fetcher,
    OfflineWorker, RequestKey, ResponseSource, ResponseType, WorkerManifest, WorkerPhase,
    WorkerRegistration,
};
pub use repository::{RepositorySource, RepositorySummary};
pub use upload::{FileStore, UploadError, UploadPolicy, UploadedFile};
