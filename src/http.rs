//! Fetching remote CSV files over HTTP(S).

use std::io::Read;
use std::time::Duration;
use thiserror::Error;

/// Default timeout for HTTP requests (30 seconds).
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Largest body accepted from a remote source (256 MiB).
pub const MAX_DOWNLOAD_BYTES: u64 = 256 * 1024 * 1024;

/// Errors that can occur during HTTP fetching.
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("HTTP error {status}: {message}")]
    HttpStatus { status: u16, message: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Response exceeds {limit} bytes")]
    TooLarge { limit: u64 },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ureq::Error> for HttpError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => HttpError::HttpStatus {
                status: code,
                message: format!("Server returned status {code}"),
            },
            _ => HttpError::Network(err.to_string()),
        }
    }
}

/// Validate that `url` uses http or https.
fn check_scheme(url: &str) -> Result<(), HttpError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(HttpError::InvalidUrl(format!(
            "URL must start with http:// or https://: {url}"
        )))
    }
}

/// Download the whole body at `url`, refusing bodies over
/// [`MAX_DOWNLOAD_BYTES`].
pub fn fetch_csv(url: &str) -> Result<Vec<u8>, HttpError> {
    check_scheme(url)?;

    let config = ureq::Agent::config_builder()
        .timeout_global(Some(DEFAULT_TIMEOUT))
        .build();
    let agent = ureq::Agent::new_with_config(config);

    let response = agent.get(url).call()?;

    let content_length = response
        .headers()
        .get("Content-Length")
        .and_then(|h| h.to_str().ok()?.parse::<u64>().ok());
    if content_length.is_some_and(|len| len > MAX_DOWNLOAD_BYTES) {
        return Err(HttpError::TooLarge {
            limit: MAX_DOWNLOAD_BYTES,
        });
    }

    // Read one byte past the limit to detect oversized chunked bodies
    let mut data = Vec::with_capacity(content_length.unwrap_or(0) as usize);
    response
        .into_body()
        .into_reader()
        .take(MAX_DOWNLOAD_BYTES + 1)
        .read_to_end(&mut data)?;
    if data.len() as u64 > MAX_DOWNLOAD_BYTES {
        return Err(HttpError::TooLarge {
            limit: MAX_DOWNLOAD_BYTES,
        });
    }

    Ok(data)
}
