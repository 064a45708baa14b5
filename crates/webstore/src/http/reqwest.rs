use std::time::Duration;

use async_trait::async_trait;

use super::{HttpExecutor, HttpRequest, HttpResponse, Method, RequestBody, encode_form};
use crate::error::TransportError;

pub struct ReqwestExecutor {
    client: reqwest::Client,
}

impl Default for ReqwestExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestExecutor {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Build an executor whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Request {
                url: String::new(),
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpExecutor for ReqwestExecutor {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url.clone();
        let mut builder = self.client.request(request.method.into(), &request.url);

        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }

        builder = match request.body {
            RequestBody::Empty => builder.header(reqwest::header::CONTENT_LENGTH, "0"),
            RequestBody::Form(pairs) => builder
                .header(
                    reqwest::header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .body(encode_form(&pairs)),
            RequestBody::File(path) => {
                let file = tokio::fs::File::open(&path)
                    .await
                    .map_err(|source| TransportError::Body { path, source })?;
                builder.body(reqwest::Body::from(file))
            }
        };

        let response = builder.send().await.map_err(|e| TransportError::Request {
            url: url.clone(),
            message: e.to_string(),
        })?;

        map_response(url, response).await
    }
}

impl From<Method> for reqwest::Method {
    fn from(value: Method) -> Self {
        match value {
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
        }
    }
}

async fn map_response(
    url: String,
    value: reqwest::Response,
) -> Result<HttpResponse, TransportError> {
    let status = value.status().as_u16();

    let data = value
        .bytes()
        .await
        .map_err(|e| TransportError::Response {
            url,
            message: e.to_string(),
        })?
        .to_vec();

    Ok(HttpResponse { status, data })
}
