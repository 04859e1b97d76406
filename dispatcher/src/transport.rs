use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use shared::{
    dtos::fragment_response::FragmentResponse,
    models::fragments::work_unit::WorkUnit,
    networking::MANDELBROT_PATH,
};

use crate::error::DispatchError;

/// Carries one work unit to its node and brings back the node's answer.
#[async_trait]
pub trait FragmentTransport: Send + Sync {
    async fn fetch(&self, unit: &WorkUnit) -> Result<FragmentResponse, DispatchError>;
}

/// Sends work units as `GET /mandelbrot?...` requests.
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, DispatchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DispatchError::Transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl FragmentTransport for HttpTransport {
    async fn fetch(&self, unit: &WorkUnit) -> Result<FragmentResponse, DispatchError> {
        let url = unit.node.endpoint(MANDELBROT_PATH);
        debug!("Sending partition {} to {}", unit.index, url);

        let response = self
            .client
            .get(&url)
            .query(&unit.query().to_pairs())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DispatchError::Timeout {
                        after: self.timeout,
                    }
                } else {
                    e.into()
                }
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await;
            return Err(status_error(status, body));
        }

        response.json::<FragmentResponse>().await.map_err(|e| {
            if e.is_timeout() {
                DispatchError::Timeout {
                    after: self.timeout,
                }
            } else {
                DispatchError::Decode(e.to_string())
            }
        })
    }
}

/// A non-200 answer. The body is kept as the failure detail, or replaced by a note
/// when it could not be read.
fn status_error(status: StatusCode, body: Result<String, reqwest::Error>) -> DispatchError {
    let body = match body {
        Ok(body) => body,
        Err(e) => format!("<unreadable body: {}>", e),
    };
    DispatchError::Status {
        status: status.as_u16(),
        body,
    }
}
