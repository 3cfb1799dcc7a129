use std::collections::HashMap;

use reqwest::{Client, Method};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

#[derive(Clone)]
pub struct RequestParams<'a, S: Serialize> {
    pub url: &'a str,
    pub method: Method,
    pub body: Option<S>,
    pub query_args: Option<HashMap<&'a str, &'a str>>,
}

/// Error body returned by the claim API on non-2xx responses.
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    /// Non-2xx status. `message` is the `error` field of the body, if any.
    #[error("Status code not 200: {status}, {body}")]
    Status {
        status: reqwest::StatusCode,
        message: Option<String>,
        body: String,
    },
    #[error("Failed to deserialize response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub async fn send_http_request<R: DeserializeOwned>(
    client: &Client,
    request_params: RequestParams<'_, impl Serialize>,
) -> Result<R, FetchError> {
    let mut request = client.request(request_params.method.clone(), request_params.url);

    if let Some(params) = &request_params.query_args {
        request = request.query(&params);
    }

    if let Some(body) = &request_params.body {
        request = request.json(&body);
    }

    let response = request
        .send()
        .await
        .inspect_err(|e| tracing::error!("Request failed: {}", e))?;

    let status = response.status();

    let text = response
        .text()
        .await
        .inspect_err(|e| tracing::error!("Failed to retrieve response text: {}", e))?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.error);

        return Err(FetchError::Status {
            status,
            message,
            body: text,
        });
    }

    let deserialized_body = serde_json::from_str::<R>(&text)
        .inspect_err(|e| tracing::error!("Failed to deserialize response: {}\n {} ", e, text))?;

    Ok(deserialized_body)
}
