use std::str::FromStr;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use crate::table::{DataSource, Row};

const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:95.0) Gecko/20100101 Firefox/95.0";

#[derive(Clone, Debug)]
pub struct FetchOptions {
    pub timeout_seconds: usize,
    pub proxy: Option<String>,
    /// Extra request header in `Key: Value` form.
    pub header: Option<String>,
    pub follow_redirects: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            proxy: None,
            header: None,
            follow_redirects: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to setup proxy: {proxy}: {source}")]
    ProxySetup {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid header '{header}', expected 'Key: Value'")]
    InvalidHeader { header: String },

    #[error("request failed (data URL: {url}): {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{status} {reason} (data URL: {url})")]
    Http {
        status: u16,
        reason: String,
        url: String,
    },

    #[error("response is not JSON, content-type '{content_type}' (data URL: {url})")]
    JsonSyntax { content_type: String, url: String },

    #[error("failed to parse JSON from {location}: {source}")]
    Parse {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("expected an array of objects from {location}, found {found}")]
    Shape {
        location: String,
        found: &'static str,
    },
}

impl FetchError {
    /// Short error name shown in the error panel.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ClientBuild { .. } | Self::ProxySetup { .. } | Self::InvalidHeader { .. } => {
                "ConfigurationError"
            }
            Self::Transport { .. } => "NetworkError",
            Self::Http { .. } => "HTTPError",
            Self::JsonSyntax { .. } => "JSONSyntaxError",
            Self::Parse { .. } => "SyntaxError",
            Self::Read { .. } => "ReadError",
            Self::Shape { .. } => "DataShapeError",
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new(options: &FetchOptions) -> Result<Self, FetchError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(USER_AGENT),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        if let Some(raw) = options.header.as_deref().filter(|h| !h.trim().is_empty()) {
            let (key, value) = parse_header(raw)?;
            headers.append(key, value);
        }

        let redirect_policy = if options.follow_redirects {
            reqwest::redirect::Policy::limited(10)
        } else {
            reqwest::redirect::Policy::none()
        };

        let timeout = Duration::from_secs(options.timeout_seconds.try_into().unwrap_or(10));
        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .redirect(redirect_policy)
            .timeout(timeout);

        if let Some(proxy) = options.proxy.as_deref().filter(|p| !p.trim().is_empty()) {
            let proxy_cfg = reqwest::Proxy::all(proxy).map_err(|e| FetchError::ProxySetup {
                proxy: proxy.to_string(),
                source: e,
            })?;
            builder = builder.proxy(proxy_cfg);
        }

        let client = builder
            .build()
            .map_err(|e| FetchError::ClientBuild { source: e })?;
        Ok(Self { client })
    }

    pub async fn fetch_rows(&self, source: &DataSource) -> Result<Vec<Row>, FetchError> {
        match source {
            DataSource::Url(url) => self.fetch_url(url).await,
            DataSource::File(path) => {
                let location = path.display().to_string();
                tracing::debug!(path = %location, "reading table data");
                let body = tokio::fs::read(path).await.map_err(|e| FetchError::Read {
                    path: location.clone(),
                    source: e,
                })?;
                decode_rows(&body, &location)
            }
            DataSource::Inline(rows) => Ok(rows.clone()),
        }
    }

    async fn fetch_url(&self, url: &str) -> Result<Vec<Row>, FetchError> {
        tracing::debug!(%url, "fetching table data");
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: url.to_string(),
                source: e,
            })?;

        let status = resp.status();
        tracing::debug!(%url, status = status.as_u16(), "data response");
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
                url: url.to_string(),
            });
        }

        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !is_json_content_type(&content_type) {
            return Err(FetchError::JsonSyntax {
                content_type,
                url: url.to_string(),
            });
        }

        let body = resp.bytes().await.map_err(|e| FetchError::Transport {
            url: url.to_string(),
            source: e,
        })?;
        decode_rows(&body, url)
    }
}

pub fn is_json_content_type(content_type: &str) -> bool {
    content_type
        .to_ascii_lowercase()
        .contains("application/json")
}

fn parse_header(
    raw: &str,
) -> Result<(reqwest::header::HeaderName, reqwest::header::HeaderValue), FetchError> {
    let invalid = || FetchError::InvalidHeader {
        header: raw.to_string(),
    };
    let (key, value) = raw.split_once(':').ok_or_else(invalid)?;
    let key = reqwest::header::HeaderName::from_str(key.trim()).map_err(|_| invalid())?;
    let value = reqwest::header::HeaderValue::from_str(value.trim()).map_err(|_| invalid())?;
    Ok((key, value))
}

pub fn decode_rows(body: &[u8], location: &str) -> Result<Vec<Row>, FetchError> {
    let doc: Value = serde_json::from_slice(body).map_err(|e| FetchError::Parse {
        location: location.to_string(),
        source: e,
    })?;
    let items = match doc {
        Value::Array(items) => items,
        other => {
            return Err(FetchError::Shape {
                location: location.to_string(),
                found: value_kind(&other),
            })
        }
    };

    let mut rows = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::Object(row) => rows.push(row),
            other => {
                return Err(FetchError::Shape {
                    location: location.to_string(),
                    found: value_kind(&other),
                })
            }
        }
    }
    tracing::debug!(%location, rows = rows.len(), "decoded table data");
    Ok(rows)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
