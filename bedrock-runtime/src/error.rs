use thiserror::Error;

/// Errors returned by the Bedrock Runtime client.
#[derive(Error, Debug)]
pub enum BedrockError {
    /// Missing or malformed client configuration (credentials, region).
    #[error("configuration error: {0}")]
    Config(String),

    /// The endpoint or request URL could not be constructed.
    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    /// The HTTP layer failed before a usable response arrived.
    #[error("request transport failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Bedrock answered with a non-success status code.
    #[error("Bedrock returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// A request or response body could not be serialized or decoded.
    #[error("payload serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// A computed header value contained bytes invalid for HTTP.
    #[error("invalid header value for {name}")]
    InvalidHeader { name: &'static str },

    /// The model answered with an empty candidate list.
    #[error("model {model_id} returned no results")]
    EmptyResponse { model_id: String },
}

pub type Result<T> = std::result::Result<T, BedrockError>;
