use std::future::Future;
use std::pin::Pin;

use dav_api::{Registrar, RegistrarError};

/// `Registrar` over HTTP. Transport failures and non-2xx answers are
/// reported as-is; retries are left to the caller.
#[derive(Debug, Clone, Default)]
pub struct HttpRegistrar {
    client: reqwest::Client,
}

impl HttpRegistrar {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Registrar for HttpRegistrar {
    fn post(
        &self,
        url: &str,
        body: serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = Result<(), RegistrarError>> + Send + '_>> {
        let request = self.client.post(url).json(&body);
        let url = url.to_string();
        Box::pin(async move {
            let response = request
                .send()
                .await
                .map_err(|e| RegistrarError::Transport(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                tracing::debug!(%url, status = status.as_u16(), "registrar rejected request");
                return Err(RegistrarError::Status { status: status.as_u16(), body });
            }
            Ok(())
        })
    }
}
