//! GIS domain - canned spatial analysis and GeoJSON samples

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Analysis request; every field is echoed back untouched
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    #[serde(default)]
    pub data_type: Option<Value>,
    #[serde(default)]
    pub analysis_type: Option<Value>,
    #[serde(default)]
    pub parameters: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub id: String,
    pub data_type: Option<Value>,
    pub analysis_type: Option<Value>,
    pub parameters: Option<Value>,
    pub status: String,
    pub results: AnalysisFigures,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisFigures {
    pub area: f64,
    pub perimeter: f64,
    pub centroid: Centroid,
    pub metadata: AnalysisMetadata,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Centroid {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetadata {
    pub crs: String,
    pub units: String,
    pub processed_at: DateTime<Utc>,
}

impl AnalysisResult {
    /// Fixed figures centred on Worcester, MA
    pub fn completed(request: AnalysisRequest, now: DateTime<Utc>) -> Self {
        Self {
            id: now.timestamp_millis().to_string(),
            data_type: request.data_type,
            analysis_type: request.analysis_type,
            parameters: request.parameters,
            status: "completed".to_string(),
            results: AnalysisFigures {
                area: 1234.56,
                perimeter: 789.12,
                centroid: Centroid {
                    x: -71.8023,
                    y: 42.2619,
                },
                metadata: AnalysisMetadata {
                    crs: "EPSG:4326".to_string(),
                    units: "degrees".to_string(),
                    processed_at: now,
                },
            },
        }
    }
}

/// Sample data sets served as GeoJSON
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    Points,
    Polygons,
}

impl SampleKind {
    /// Unknown names fall back to points
    pub fn parse(name: &str) -> Self {
        match name {
            "polygons" => Self::Polygons,
            _ => Self::Points,
        }
    }

    pub fn feature_collection(&self) -> Value {
        match self {
            Self::Points => json!({
                "type": "FeatureCollection",
                "features": [{
                    "type": "Feature",
                    "properties": {
                        "name": "Clark University",
                        "type": "Educational Institution"
                    },
                    "geometry": {
                        "type": "Point",
                        "coordinates": [-71.825, 42.251]
                    }
                }]
            }),
            Self::Polygons => json!({
                "type": "FeatureCollection",
                "features": [{
                    "type": "Feature",
                    "properties": {
                        "name": "Worcester County",
                        "population": 830000
                    },
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[
                            [-71.9, 42.1],
                            [-71.7, 42.1],
                            [-71.7, 42.4],
                            [-71.9, 42.4],
                            [-71.9, 42.1]
                        ]]
                    }
                }]
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_analysis_echoes_request() {
        let request: AnalysisRequest = serde_json::from_value(json!({
            "dataType": "raster",
            "analysisType": "buffer",
            "parameters": {"distance": 500}
        }))
        .unwrap();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();

        let json = serde_json::to_value(AnalysisResult::completed(request, now)).unwrap();

        assert_eq!(json["dataType"], "raster");
        assert_eq!(json["analysisType"], "buffer");
        assert_eq!(json["parameters"]["distance"], 500);
        assert_eq!(json["status"], "completed");
        assert_eq!(json["id"], now.timestamp_millis().to_string());
        assert_eq!(json["results"]["metadata"]["crs"], "EPSG:4326");
        assert_eq!(json["results"]["metadata"]["processedAt"], "2025-06-01T12:00:00Z");
    }

    #[test]
    fn test_analysis_with_empty_body() {
        let request: AnalysisRequest = serde_json::from_value(json!({})).unwrap();
        let json = serde_json::to_value(AnalysisResult::completed(request, Utc::now())).unwrap();

        assert!(json["dataType"].is_null());
        assert_eq!(json["results"]["area"], 1234.56);
    }

    #[test]
    fn test_sample_kind_fallback() {
        assert_eq!(SampleKind::parse("polygons"), SampleKind::Polygons);
        assert_eq!(SampleKind::parse("points"), SampleKind::Points);
        assert_eq!(SampleKind::parse("rivers"), SampleKind::Points);
    }

    #[test]
    fn test_feature_collections() {
        let points = SampleKind::Points.feature_collection();
        assert_eq!(points["features"][0]["geometry"]["type"], "Point");

        let polygons = SampleKind::Polygons.feature_collection();
        assert_eq!(polygons["features"][0]["properties"]["population"], 830000);
        assert_eq!(
            polygons["features"][0]["geometry"]["coordinates"][0]
                .as_array()
                .unwrap()
                .len(),
            5
        );
    }
}
