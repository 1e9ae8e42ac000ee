use std::future::Future;
use std::pin::Pin;

use crate::error::RegistrarError;

/// HTTP-facing registrar that records needs, bids and filters on the network.
pub trait Registrar: Send + Sync {
    /// POST `body` as JSON to `url`. The response body is not interpreted.
    fn post(
        &self,
        url: &str,
        body: serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = Result<(), RegistrarError>> + Send + '_>>;
}
