//! Which uploads are accepted

use std::fmt;

/// Default size ceiling: 10 MB
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Images, documents and GIS formats
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &[
    "jpeg", "jpg", "png", "gif", "pdf", "doc", "docx", "shp", "kml", "geojson",
];

/// GIS formats whose registered MIME types are not universally known
const GIS_MIME_TYPES: &[(&str, &[&str])] = &[
    ("geojson", &["application/geo+json", "application/json"]),
    ("kml", &["application/vnd.google-earth.kml+xml", "application/xml", "text/xml"]),
    ("shp", &["application/octet-stream", "application/x-esri-shape"]),
];

/// Upload rejection reasons
#[derive(Debug, Clone, PartialEq)]
pub enum UploadError {
    NoFile,
    InvalidType,
    TooLarge { max_bytes: u64 },
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoFile => write!(f, "No file uploaded"),
            Self::InvalidType => write!(
                f,
                "Invalid file type. Only images, documents, and GIS files are allowed."
            ),
            Self::TooLarge { max_bytes } => write!(
                f,
                "File too large. Maximum size is {}MB.",
                max_bytes / (1024 * 1024)
            ),
        }
    }
}

impl std::error::Error for UploadError {}

/// Extension, MIME and size filtering for uploads
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    max_bytes: u64,
    allowed_extensions: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_UPLOAD_BYTES,
            DEFAULT_ALLOWED_EXTENSIONS.iter().map(|s| s.to_string()),
        )
    }
}

impl UploadPolicy {
    pub fn new(max_bytes: u64, allowed_extensions: impl IntoIterator<Item = String>) -> Self {
        Self {
            max_bytes,
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Lower-cased extension of a client-supplied filename
    pub fn extension_of(filename: &str) -> Option<String> {
        let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
        let (stem, ext) = base.rsplit_once('.')?;

        if stem.is_empty() || ext.is_empty() {
            return None;
        }

        Some(ext.to_ascii_lowercase())
    }

    /// Accept when the extension is allowlisted and the declared MIME type
    /// agrees with it
    pub fn check_type(&self, filename: &str, declared_mime: &str) -> Result<String, UploadError> {
        let ext = Self::extension_of(filename).ok_or(UploadError::InvalidType)?;

        if !self.allowed_extensions.contains(&ext) {
            return Err(UploadError::InvalidType);
        }

        if self.mime_matches(&ext, declared_mime) {
            Ok(ext)
        } else {
            Err(UploadError::InvalidType)
        }
    }

    fn mime_matches(&self, ext: &str, declared_mime: &str) -> bool {
        let declared = declared_mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if declared.is_empty() {
            return false;
        }

        if self.allowed_extensions.iter().any(|token| declared.contains(token.as_str())) {
            return true;
        }

        let gis_match = GIS_MIME_TYPES
            .iter()
            .filter(|(gis_ext, _)| *gis_ext == ext)
            .any(|(_, types)| types.contains(&declared.as_str()));

        gis_match
            || mime_guess::from_ext(ext)
                .iter()
                .any(|m| m.essence_str() == declared)
    }

    pub fn check_size(&self, size: u64) -> Result<(), UploadError> {
        if size > self.max_bytes {
            return Err(UploadError::TooLarge {
                max_bytes: self.max_bytes,
            });
        }

        Ok(())
    }
}

/// Name a stored upload: `<field>-<millis>-<suffix>.<ext>`
pub fn stored_filename(field: &str, millis: i64, suffix: u32, ext: &str) -> String {
    format!("{}-{}-{}.{}", field, millis, suffix, ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_of() {
        assert_eq!(UploadPolicy::extension_of("map.GeoJSON"), Some("geojson".to_string()));
        assert_eq!(UploadPolicy::extension_of("dir/sub/a.tar.kml"), Some("kml".to_string()));
        assert_eq!(UploadPolicy::extension_of("C:\\maps\\b.png"), Some("png".to_string()));
        assert_eq!(UploadPolicy::extension_of("README"), None);
        assert_eq!(UploadPolicy::extension_of(".png"), None);
        assert_eq!(UploadPolicy::extension_of("trailing."), None);
    }

    #[test]
    fn test_accepts_matching_types() {
        let policy = UploadPolicy::default();

        assert_eq!(policy.check_type("a.png", "image/png"), Ok("png".to_string()));
        assert!(policy.check_type("a.jpg", "image/jpeg").is_ok());
        assert!(policy.check_type("a.pdf", "application/pdf").is_ok());
        assert!(policy.check_type("a.kml", "application/vnd.google-earth.kml+xml").is_ok());
        assert!(policy.check_type("a.geojson", "application/geo+json").is_ok());
        assert!(policy.check_type("a.doc", "application/msword").is_ok());
        assert!(policy.check_type("a.shp", "application/octet-stream").is_ok());
    }

    #[test]
    fn test_rejects_disallowed_extension() {
        let policy = UploadPolicy::default();

        assert_eq!(
            policy.check_type("a.exe", "application/pdf"),
            Err(UploadError::InvalidType)
        );
        assert_eq!(policy.check_type("noext", "image/png"), Err(UploadError::InvalidType));
    }

    #[test]
    fn test_rejects_mismatched_mime() {
        let policy = UploadPolicy::default();

        assert_eq!(
            policy.check_type("a.png", "application/x-msdownload"),
            Err(UploadError::InvalidType)
        );
        assert_eq!(policy.check_type("a.png", ""), Err(UploadError::InvalidType));
        assert_eq!(
            policy.check_type("a.pdf", "application/octet-stream"),
            Err(UploadError::InvalidType)
        );
    }

    #[test]
    fn test_mime_parameters_are_ignored() {
        let policy = UploadPolicy::default();
        assert!(policy.check_type("a.geojson", "application/geo+json; charset=utf-8").is_ok());
    }

    #[test]
    fn test_size_ceiling() {
        let policy = UploadPolicy::default();

        assert!(policy.check_size(DEFAULT_MAX_UPLOAD_BYTES).is_ok());
        assert_eq!(
            policy.check_size(DEFAULT_MAX_UPLOAD_BYTES + 1),
            Err(UploadError::TooLarge {
                max_bytes: DEFAULT_MAX_UPLOAD_BYTES
            })
        );
        assert_eq!(
            UploadError::TooLarge {
                max_bytes: DEFAULT_MAX_UPLOAD_BYTES
            }
            .to_string(),
            "File too large. Maximum size is 10MB."
        );
    }

    #[test]
    fn test_stored_filename() {
        assert_eq!(
            stored_filename("gisFile", 1_700_000_000_000, 42, "kml"),
            "gisFile-1700000000000-42.kml"
        );
    }
}
