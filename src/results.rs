use crate::error::Result;
use chrono::Local;
use serde::{Deserialize, Serialize};

/// Format of [`RunResult::timestamp`]
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Filtered sentences from one followed link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Absolute URL of the page
    pub url: String,

    /// Relevant sentences, in page order
    pub content: Vec<String>,
}

impl Document {
    pub fn new(url: String, content: Vec<String>) -> Self {
        Self { url, content }
    }
}

/// Output of one crawl run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    /// Local time the run fetched its root page
    pub timestamp: String,

    /// One document per successfully processed link, in discovery order
    pub results: Vec<Document>,
}

impl RunResult {
    pub fn new(timestamp: String, results: Vec<Document>) -> Self {
        Self { timestamp, results }
    }

    /// Current local time in [`TIMESTAMP_FORMAT`]
    pub fn now_timestamp() -> String {
        Local::now().format(TIMESTAMP_FORMAT).to_string()
    }

    /// Pretty JSON with four-space indentation
    pub fn to_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        // serde_json only ever writes valid UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RunResult {
        RunResult::new(
            "2024-05-01 12:30:00".to_string(),
            vec![Document::new(
                "https://example.com/price".to_string(),
                vec![
                    "Our pricing starts at $10.".to_string(),
                    "Prix spéciaux « été ».".to_string(),
                ],
            )],
        )
    }

    #[test]
    fn test_json_shape() {
        let json = sample().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["timestamp"], "2024-05-01 12:30:00");
        assert_eq!(value["results"][0]["url"], "https://example.com/price");
        assert_eq!(value["results"][0]["content"][1], "Prix spéciaux « été ».");
        // four-space indentation, non-ASCII kept as is
        assert!(json.contains("\n    \"timestamp\""));
        assert!(json.contains("été"));
    }

    #[test]
    fn test_parse_back() {
        let original = sample();
        let parsed = RunResult::from_json(&original.to_json().unwrap()).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_empty_results_serialize_as_array() {
        let run = RunResult::new("2024-05-01 12:30:00".to_string(), Vec::new());
        let value: serde_json::Value = serde_json::from_str(&run.to_json().unwrap()).unwrap();
        assert!(value["results"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_timestamp_format() {
        let ts = RunResult::now_timestamp();
        assert!(chrono::NaiveDateTime::parse_from_str(&ts, TIMESTAMP_FORMAT).is_ok());
    }
}
