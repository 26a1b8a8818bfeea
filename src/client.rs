// 🌐 JMA Client - Blocking retrieval of the area directory and forecasts
//
// Retrieval failures stop here: callers get a FetchError and the extractor
// never sees a partial document.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::area_catalog::AreaCatalog;
use crate::config::Config;
use crate::forecast::{extract, DisplayRecord, ForecastDocument};

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum FetchError {
    /// Area codes are plain alphanumerics; anything else never reaches a URL
    #[error("invalid area code: {0:?}")]
    InvalidCode(String),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<ureq::Transport>,
    },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("response from {url} is not valid JSON: {source}")]
    Decode {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("forecast document from {url} is not a JSON array")]
    NotAnArray { url: String },
}

// ============================================================================
// SOURCE TRAIT
// ============================================================================

/// Where documents come from. The JMA client is the production source;
/// tests and demos plug in fixed documents.
pub trait ForecastSource: Send + Sync {
    /// Raw area directory document (object with centers/offices)
    fn area_directory(&self) -> Result<Value, FetchError>;

    /// Raw forecast document for one area code
    fn forecast(&self, code: &str) -> Result<ForecastDocument, FetchError>;
}

/// Fetch the directory and flatten it
pub fn load_catalog(source: &dyn ForecastSource) -> Result<AreaCatalog, FetchError> {
    let directory = source.area_directory()?;
    let catalog = AreaCatalog::from_directory(&directory);
    info!(areas = catalog.len(), "area catalog loaded");
    Ok(catalog)
}

/// Fetch one area's forecast and extract its display records
pub fn load_forecast(source: &dyn ForecastSource, code: &str) -> Result<Vec<DisplayRecord>, FetchError> {
    let doc = source.forecast(code)?;
    let records = extract(&doc);
    info!(code, area_forecasts = doc.len(), records = records.len(), "forecast extracted");
    Ok(records)
}

// ============================================================================
// JMA CLIENT
// ============================================================================

pub struct JmaClient {
    agent: ureq::Agent,
    config: Config,
}

impl JmaClient {
    pub fn new(config: Config) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();
        JmaClient { agent, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    #[tracing::instrument(skip(self), level = "debug")]
    fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let response = self.agent.get(url).call().map_err(|err| match err {
            ureq::Error::Status(status, _) => FetchError::Status {
                url: url.to_string(),
                status,
            },
            ureq::Error::Transport(transport) => FetchError::Transport {
                url: url.to_string(),
                source: Box::new(transport),
            },
        })?;

        debug!(status = response.status(), "response received");

        response.into_json::<Value>().map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

impl ForecastSource for JmaClient {
    fn area_directory(&self) -> Result<Value, FetchError> {
        self.get_json(&self.config.area_url)
    }

    fn forecast(&self, code: &str) -> Result<ForecastDocument, FetchError> {
        validate_code(code)?;
        let url = self.config.forecast_url(code);

        match self.get_json(&url)? {
            Value::Array(doc) => Ok(doc),
            _ => Err(FetchError::NotAnArray { url }),
        }
    }
}

fn validate_code(code: &str) -> Result<(), FetchError> {
    if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(FetchError::InvalidCode(code.to_string()));
    }
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Serves fixed documents instead of the network
    struct FixedSource {
        directory: Value,
        forecast: ForecastDocument,
    }

    impl ForecastSource for FixedSource {
        fn area_directory(&self) -> Result<Value, FetchError> {
            Ok(self.directory.clone())
        }

        fn forecast(&self, code: &str) -> Result<ForecastDocument, FetchError> {
            validate_code(code)?;
            Ok(self.forecast.clone())
        }
    }

    struct DownSource;

    impl ForecastSource for DownSource {
        fn area_directory(&self) -> Result<Value, FetchError> {
            Err(FetchError::Status {
                url: "http://example.invalid/area.json".to_string(),
                status: 503,
            })
        }

        fn forecast(&self, _code: &str) -> Result<ForecastDocument, FetchError> {
            Err(FetchError::Status {
                url: "http://example.invalid/forecast.json".to_string(),
                status: 404,
            })
        }
    }

    #[test]
    fn test_load_catalog_from_source() {
        let source = FixedSource {
            directory: json!({ "offices": { "130000": { "name": "東京都" } } }),
            forecast: vec![],
        };

        let catalog = load_catalog(&source).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.entries()[0].code, "130000");
    }

    #[test]
    fn test_load_forecast_extracts_records() {
        let source = FixedSource {
            directory: json!({}),
            forecast: vec![],
        };

        let records = load_forecast(&source, "130000").unwrap();
        assert_eq!(records, vec![DisplayRecord::NoData]);
    }

    #[test]
    fn test_retrieval_failure_never_reaches_extractor() {
        let err = load_forecast(&DownSource, "130000").unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
        assert!(err.to_string().contains("HTTP 404"));

        assert!(load_catalog(&DownSource).is_err());
    }

    #[test]
    fn test_code_validation() {
        assert!(validate_code("130000").is_ok());
        assert!(validate_code("").is_err());
        assert!(validate_code("../etc").is_err());
        assert!(validate_code("13 0000").is_err());

        let source = FixedSource {
            directory: json!({}),
            forecast: vec![],
        };
        assert!(matches!(
            load_forecast(&source, "a/b"),
            Err(FetchError::InvalidCode(_))
        ));
    }

    #[test]
    fn test_client_keeps_config() {
        let client = JmaClient::new(Config::default());
        assert_eq!(client.config().area_url, crate::config::DEFAULT_AREA_URL);
    }
}
