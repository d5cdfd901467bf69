use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to reach upstream: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("unsupported content type: {0:?}")]
    UnsupportedContentType(String),

    #[error("failed to decode upstream response: {0}")]
    InvalidEnvelope(#[source] serde_json::Error),

    #[error("upstream rejected request: {description}")]
    UpstreamRejected {
        description: String,
        error_code: Option<i64>,
    },

    #[error("failed to parse result as {target}: {source}")]
    ResultDecode {
        target: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
