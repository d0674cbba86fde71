//! Wire-level data models for the translate and detect endpoints

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::core::errors::TranslateError;

/// How a request is put on the wire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStyle {
    /// GET with every parameter in the URL query string
    #[default]
    UrlQuery,
    /// POST with the API key in the query string and the parameters as JSON
    JsonBody,
}

impl fmt::Display for RequestStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestStyle::UrlQuery => write!(f, "query"),
            RequestStyle::JsonBody => write!(f, "json"),
        }
    }
}

impl FromStr for RequestStyle {
    type Err = TranslateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "query" | "get" => Ok(RequestStyle::UrlQuery),
            "json" | "post" => Ok(RequestStyle::JsonBody),
            other => Err(TranslateError::ConfigError {
                message: format!("unknown request style '{other}' (expected 'query' or 'json')"),
            }),
        }
    }
}

/// Parameters for a translate call
///
/// Serializes identically as a query string or a JSON body. The source
/// language is always resolved before a request is built.
#[derive(Debug, Clone, Serialize)]
pub struct TranslateParams<'a> {
    /// Text to translate
    pub q: &'a str,
    /// Language the text is written in
    pub source: &'a str,
    /// Language to translate into
    pub target: &'a str,
}

/// Parameters for a detect call
#[derive(Debug, Clone, Serialize)]
pub struct DetectParams<'a> {
    /// Text whose language is to be detected
    pub q: &'a str,
}

/// Extract the first translated text from a translate response
///
/// Returns `None` when the response carries no translations or does not have
/// the expected shape; the caller decides whether that is acceptable.
pub fn first_translation(response: &Value) -> Option<String> {
    response["data"]["translations"]
        .get(0)
        .and_then(|t| t["translatedText"].as_str())
        .map(str::to_owned)
}

/// Extract the first detected language code from a detect response
pub fn first_detection(response: &Value) -> Option<String> {
    response["data"]["detections"]
        .get(0)
        .and_then(|group| group.get(0))
        .and_then(|d| d["language"].as_str())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_translation_reads_first_entry() {
        let response = json!({
            "data": {
                "translations": [
                    {"translatedText": "bonjour"},
                    {"translatedText": "salut"}
                ]
            }
        });
        assert_eq!(first_translation(&response).as_deref(), Some("bonjour"));
    }

    #[test]
    fn test_first_translation_empty_list() {
        let response = json!({"data": {"translations": []}});
        assert_eq!(first_translation(&response), None);
    }

    #[test]
    fn test_first_translation_unexpected_shape() {
        assert_eq!(first_translation(&json!({"error": "quota"})), None);
        assert_eq!(first_translation(&json!(null)), None);
    }

    #[test]
    fn test_first_detection_reads_nested_group() {
        let response = json!({
            "data": {
                "detections": [[{"language": "en", "confidence": 0.97}]]
            }
        });
        assert_eq!(first_detection(&response).as_deref(), Some("en"));
    }

    #[test]
    fn test_first_detection_missing_shape() {
        assert_eq!(first_detection(&json!({"data": {}})), None);
        assert_eq!(first_detection(&json!({"data": {"detections": [[]]}})), None);
    }

    #[test]
    fn test_request_style_parsing() {
        assert_eq!("query".parse::<RequestStyle>().unwrap(), RequestStyle::UrlQuery);
        assert_eq!("GET".parse::<RequestStyle>().unwrap(), RequestStyle::UrlQuery);
        assert_eq!("json".parse::<RequestStyle>().unwrap(), RequestStyle::JsonBody);
        assert_eq!("post".parse::<RequestStyle>().unwrap(), RequestStyle::JsonBody);
        assert!("soap".parse::<RequestStyle>().is_err());
    }

    #[test]
    fn test_translate_params_wire_names() {
        let params = TranslateParams { q: "hello", source: "en", target: "fr" };
        let encoded = serde_json::to_value(&params).unwrap();
        assert_eq!(encoded, json!({"q": "hello", "source": "en", "target": "fr"}));
    }
}
