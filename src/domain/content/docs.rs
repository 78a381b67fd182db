//! Self-describing API index and documentation

use serde_json::{json, Value};

use super::entity::Author;

pub const API_VERSION: &str = "1.0.0";

/// `GET /api` payload; `base` is `<scheme>://<host>`
pub fn api_index(base: &str, author: &Author) -> Value {
    json!({
        "message": "Welcome to Annan Shrestha Portfolio API",
        "version": API_VERSION,
        "documentation": format!("{}/api/docs", base),
        "endpoints": [
            "/api/health",
            "/api/portfolio",
            "/api/contact",
            "/api/gis/*",
            "/api/publications",
            "/api/github/*",
            "/api/analytics",
            "/api/blog"
        ],
        "author": author,
    })
}

fn endpoint(method: &str, path: &str, description: &str) -> Value {
    json!({ "method": method, "path": path, "description": description })
}

/// `GET /api/docs` payload; `base` is `<scheme>://<host>`
pub fn api_docs(base: &str) -> Value {
    let mut contact = endpoint("POST", "/contact", "Send contact form message");
    contact["body"] = json!({
        "name": "string",
        "email": "string",
        "subject": "string",
        "message": "string"
    });

    json!({
        "title": "Annan Shrestha Portfolio API",
        "version": API_VERSION,
        "description": "RESTful API for GIS Portfolio with spatial data processing capabilities",
        "baseUrl": format!("{}/api", base),
        "endpoints": {
            "health": endpoint("GET", "/health", "Health check and system status"),
            "portfolio": endpoint(
                "GET",
                "/portfolio",
                "Get complete portfolio data including skills, experience, and projects"
            ),
            "contact": contact,
            "gis": {
                "analyze": endpoint("POST", "/gis/analyze", "Perform GIS spatial analysis"),
                "data": endpoint("GET", "/gis/data/:type", "Get spatial data in GeoJSON format"),
                "upload": endpoint("POST", "/gis/upload", "Upload GIS files for processing")
            },
            "publications": endpoint(
                "GET",
                "/publications",
                "Get list of research publications and papers"
            ),
            "github": {
                "repos": endpoint("GET", "/github/repos", "Get latest GitHub repositories")
            },
            "analytics": endpoint(
                "GET",
                "/analytics",
                "Get portfolio analytics and visitor statistics"
            ),
            "blog": endpoint("GET", "/blog", "Get blog posts and articles"),
            "resume": endpoint("GET", "/resume/download", "Download the latest resume")
        },
        "examples": {
            "portfolio": format!("{}/api/portfolio", base),
            "contact": {
                "url": format!("{}/api/contact", base),
                "method": "POST",
                "headers": { "Content-Type": "application/json" },
                "body": {
                    "name": "John Doe",
                    "email": "john@example.com",
                    "subject": "Collaboration Opportunity",
                    "message": "I would like to discuss a potential project..."
                }
            },
            "gisData": format!("{}/api/gis/data/points", base)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::content::ContentCatalog;

    #[test]
    fn test_index_links_to_docs() {
        let catalog = ContentCatalog::new();
        let index = api_index("http://localhost:3000", catalog.author());

        assert_eq!(index["documentation"], "http://localhost:3000/api/docs");
        assert_eq!(index["version"], "1.0.0");
        assert_eq!(index["author"]["name"], "Annan Shrestha");
        assert_eq!(index["endpoints"].as_array().unwrap().len(), 8);
    }

    #[test]
    fn test_docs_base_url() {
        let docs = api_docs("https://annan.dev");

        assert_eq!(docs["baseUrl"], "https://annan.dev/api");
        assert_eq!(docs["endpoints"]["contact"]["body"]["email"], "string");
        assert_eq!(docs["examples"]["gisData"], "https://annan.dev/api/gis/data/points");
    }
}
