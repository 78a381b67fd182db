//! The site's fixed content

use chrono::{DateTime, TimeZone, Utc};

use super::entity::{
    AnalyticsSnapshot, Author, BlogPost, Education, Experience, PageViews, Portfolio, Project,
    Publication, ReferrerVisits, Skill, Skills,
};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn utc(year: i32, month: u32, day: u32, hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, 0)
        .single()
        .unwrap_or_default()
}

/// All literal payloads served by the API
#[derive(Debug, Clone)]
pub struct ContentCatalog {
    author: Author,
    portfolio: Portfolio,
    publications: Vec<Publication>,
    blog_posts: Vec<BlogPost>,
}

impl Default for ContentCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentCatalog {
    pub fn new() -> Self {
        Self {
            author: default_author(),
            portfolio: default_portfolio(),
            publications: default_publications(),
            blog_posts: default_blog_posts(),
        }
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    pub fn publications(&self) -> &[Publication] {
        &self.publications
    }

    pub fn blog_posts(&self) -> &[BlogPost] {
        &self.blog_posts
    }

    /// Analytics stamped with `now`
    pub fn analytics(&self, now: DateTime<Utc>) -> AnalyticsSnapshot {
        AnalyticsSnapshot {
            total_visitors: 1250,
            monthly_visitors: 340,
            project_views: 890,
            contact_forms: 45,
            top_pages: [
                ("/projects", 450),
                ("/about", 320),
                ("/skills", 280),
                ("/contact", 200),
            ]
            .into_iter()
            .map(|(page, views)| PageViews {
                page: page.to_string(),
                views,
            })
            .collect(),
            referrers: [
                ("GitHub", 380),
                ("LinkedIn", 290),
                ("Google", 250),
                ("Direct", 330),
            ]
            .into_iter()
            .map(|(source, visits)| ReferrerVisits {
                source: source.to_string(),
                visits,
            })
            .collect(),
            last_updated: now,
        }
    }
}

fn default_author() -> Author {
    Author {
        name: "Annan Shrestha".to_string(),
        email: "annanshrestha1@gmail.com".to_string(),
        github: "https://github.com/AnnShrestha".to_string(),
        linkedin: "https://linkedin.com/in/annan-shrestha".to_string(),
    }
}

fn default_portfolio() -> Portfolio {
    Portfolio {
        name: "Annan Shrestha".to_string(),
        title: "GIS Specialist & Web Developer".to_string(),
        location: "Worcester, MA".to_string(),
        email: "annanshrestha1@gmail.com".to_string(),
        phone: "+1-781-750-9053".to_string(),
        education: Education {
            current: "MS in Geographic Information Science - Clark University (2024-2026)"
                .to_string(),
            previous: "MS in Environmental Science - Tribhuvan University, Nepal".to_string(),
        },
        skills: Skills {
            frontend: vec![
                Skill::new("HTML5 & CSS3", 90),
                Skill::new("JavaScript & ES6+", 85),
                Skill::new("React.js", 80),
                Skill::new("Web Mapping (Leaflet, MapboxGL)", 88),
                Skill::new("Data Visualization (D3.js, Chart.js)", 85),
                Skill::new("Bootstrap & Responsive Design", 90),
            ],
            backend: vec![
                Skill::new("Python Programming", 92),
                Skill::new("Node.js & Express", 78),
                Skill::new("GIS Software (ArcGIS Pro/Desktop, QGIS)", 95),
                Skill::new("Spatial Databases (PostGIS, SpatiaLite)", 82),
                Skill::new("Remote Sensing & Image Analysis", 88),
                Skill::new("Statistical Analysis (R, SPSS)", 85),
            ],
        },
        experience: vec![
            Experience {
                position: "Research Assistant".to_string(),
                company: "Clark's Center for Geospatial Analytics".to_string(),
                period: "2025 - Present".to_string(),
                responsibilities: strings(&[
                    "Updated land use for mapping the conversion of coastal habitats to shrimp aquaculture",
                    "Developed comprehensive maps reflecting land changes from 1999 to 2024 due to shrimp farming across Indonesia, Thailand, Vietnam, Myanmar, and Ecuador",
                ]),
            },
            Experience {
                position: "GIS and Remote Sensing Analyst".to_string(),
                company: "Environment and Engineering Research Center Pvt. Ltd".to_string(),
                period: "2019 - 2024".to_string(),
                responsibilities: strings(&[
                    "Gathered geospatial data from various sources and maintained geodatabase integrity",
                    "Provided technical support and training to users of GIS and remote sensing software",
                    "Led GIS and remote sensing projects from planning to execution",
                    "Created high-quality maps and visual representations of geospatial data",
                ]),
            },
        ],
        projects: vec![
            Project {
                name: "Soil Erosion Mapping".to_string(),
                description: "Analyzed soil erosion rate of districts in Bagmati Province using RUSLE Method".to_string(),
                technologies: strings(&["GIS Analysis", "RUSLE", "Environmental"]),
                github: "https://github.com/AnnShrestha/Soil_erosion_Bagmati-Province".to_string(),
            },
            Project {
                name: "African Elephant Habitat Modeling".to_string(),
                description: "Modeled habitat preferences in Tarangire National Park using GPS collar data".to_string(),
                technologies: strings(&["Spatial Analysis", "Wildlife", "GPS Data"]),
                github: "https://github.com/AnnShrestha/Habitat_Suitability".to_string(),
            },
            Project {
                name: "Flood/Overland Flow Modeling".to_string(),
                description: "Created flood hazard maps for West Rapti Basin and identified vulnerable communities".to_string(),
                technologies: strings(&["Hydrology", "Risk Assessment", "Modeling"]),
                github: "https://github.com/AnnShrestha/Flood_overland_FLow_Modelling".to_string(),
            },
        ],
    }
}

fn default_publications() -> Vec<Publication> {
    vec![
        Publication {
            id: 1,
            title: "Spatial Analysis of Land Use Change and Its Impact on Soil Erosion in Bagmati Province, Nepal".to_string(),
            authors: strings(&["A. Shrestha", "B. Sharma", "C. Poudel"]),
            journal: "Journal of Environmental Geography".to_string(),
            status: "Under Review".to_string(),
            year: 2024,
            summary: "This study examines the relationship between land use changes and soil erosion rates using RUSLE methodology and remote sensing data across multiple districts in Bagmati Province.".to_string(),
            keywords: strings(&["land use change", "soil erosion", "RUSLE", "remote sensing", "Nepal"]),
        },
        Publication {
            id: 2,
            title: "Multi-hazard Risk Assessment Using GIS: A Case Study of Sindhupalchowk District".to_string(),
            authors: strings(&["A. Shrestha", "D. Maharjan"]),
            journal: "International Journal of Disaster Risk Reduction".to_string(),
            status: "In Preparation".to_string(),
            year: 2024,
            summary: "Comprehensive analysis of multiple natural hazards including landslides, floods, and earthquakes using spatial modeling techniques.".to_string(),
            keywords: strings(&["multi-hazard", "risk assessment", "GIS", "spatial modeling", "disaster management"]),
        },
        Publication {
            id: 3,
            title: "Habitat Suitability Modeling for African Elephants Using Remote Sensing and GPS Collar Data".to_string(),
            authors: strings(&["A. Shrestha", "J. Smith", "M. Johnson"]),
            journal: "Remote Sensing in Ecology and Conservation".to_string(),
            status: "Draft".to_string(),
            year: 2024,
            summary: "Application of MaxEnt modeling and satellite imagery to predict suitable habitat areas for African elephants in Tarangire National Park.".to_string(),
            keywords: strings(&["habitat modeling", "MaxEnt", "wildlife conservation", "remote sensing", "GPS tracking"]),
        },
    ]
}

fn default_blog_posts() -> Vec<BlogPost> {
    vec![
        BlogPost {
            id: 1,
            title: "Getting Started with Web GIS Development".to_string(),
            slug: "getting-started-web-gis-development".to_string(),
            excerpt: "Learn the fundamentals of building interactive web-based GIS applications using modern web technologies.".to_string(),
            content: String::new(),
            author: "Annan Shrestha".to_string(),
            published_at: utc(2024, 3, 15, 10, 0),
            tags: strings(&["web-gis", "javascript", "leaflet", "tutorial"]),
            read_time: 8,
        },
        BlogPost {
            id: 2,
            title: "Python for GIS: Advanced Spatial Analysis Techniques".to_string(),
            slug: "python-gis-advanced-spatial-analysis".to_string(),
            excerpt: "Explore advanced spatial analysis techniques using Python libraries like GeoPandas, Shapely, and Rasterio.".to_string(),
            content: String::new(),
            author: "Annan Shrestha".to_string(),
            published_at: utc(2024, 3, 10, 14, 30),
            tags: strings(&["python", "gis", "spatial-analysis", "geopandas"]),
            read_time: 12,
        },
    ]
}
