#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid url")]
    InvalidUrl(String),
    #[error("HTTP request failed ({}): {0}", transport_kind(.0))]
    Request(#[from] reqwest::Error),
    #[error("HTTP request returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("invalid data")]
    InvalidData,
    #[error("Failed to parse HTML selector: {0}")]
    ParseError(String),
    #[error("gas price element not found")]
    ElementNotFound,
    #[error("gas price element is empty")]
    EmptyElement,
    #[error("Failed to build HTTP client: {0}")]
    Client(reqwest::Error),
}

fn transport_kind(e: &reqwest::Error) -> &'static str {
    if e.is_timeout() {
        "timed out"
    } else if e.is_connect() {
        "connect failed"
    } else {
        "transport error"
    }
}
