//! Infrastructure services

mod contact_service;
mod upload_service;

pub use contact_service::{ContactRouting, ContactService};
pub use upload_service::{IncomingFile, UploadService};
