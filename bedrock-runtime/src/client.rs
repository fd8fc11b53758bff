use chrono::Utc;
use reqwest::Response;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::credentials::{Credentials, region_from_env};
use crate::error::{BedrockError, Result};
use crate::sigv4::{self, SigningParams, uri_encode};

/// SigV4 service name for the Bedrock Runtime endpoints.
const SERVICE: &str = "bedrock";

/// Client for the Amazon Bedrock Runtime `InvokeModel` API.
///
/// Holds a reqwest client, the resolved region and static credentials.
/// Each call signs its own request, so the client is freely shareable
/// behind an `Arc`.
#[derive(Debug, Clone)]
pub struct BedrockRuntime {
    http: reqwest::Client,
    endpoint: Url,
    region: String,
    credentials: Credentials,
}

impl BedrockRuntime {
    /// Builds a client for `region` with explicit credentials.
    pub fn new(region: impl Into<String>, credentials: Credentials) -> Result<Self> {
        let region = region.into();
        let endpoint = Url::parse(&format!("https://bedrock-runtime.{region}.amazonaws.com"))?;
        Ok(Self { http: reqwest::Client::new(), endpoint, region, credentials })
    }

    /// Builds a client from `AWS_REGION` and the standard credential
    /// environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(region_from_env(), Credentials::from_env()?)
    }

    /// Replaces the endpoint base URL. Intended for tests and local stubs.
    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = endpoint;
        self
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Invokes `model_id` with a JSON request body and decodes the JSON
    /// response body.
    #[instrument(skip(self, request), fields(model_id = model_id))]
    pub async fn invoke_model<Req, Res>(&self, model_id: &str, request: &Req) -> Result<Res>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let url = self.invoke_url(model_id)?;
        let payload = serde_json::to_vec(request)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let params = SigningParams {
            credentials: &self.credentials,
            region: &self.region,
            service: SERVICE,
            timestamp: Utc::now(),
        };
        sigv4::sign_request("POST", &url, &mut headers, &payload, &params)?;

        debug!(url = %url, bytes = payload.len(), "invoking model");
        let response = self.http.post(url).headers(headers).body(payload).send().await?;
        let response = check_response(response).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    // Versioned model ids contain ':', which must stay percent-encoded on
    // the wire and in the signed path.
    fn invoke_url(&self, model_id: &str) -> Result<Url> {
        let path = format!("/model/{}/invoke", uri_encode(model_id));
        Ok(self.endpoint.join(&path)?)
    }
}

/// Surfaces non-success statuses as `Api` errors carrying the body
/// Bedrock sent, which holds the service's exception message.
async fn check_response(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let message = response.text().await.unwrap_or_default();
        Err(BedrockError::Api { status: status.as_u16(), message })
    }
}
