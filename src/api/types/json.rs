//! Lenient JSON body extractor

use std::convert::Infallible;

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use tracing::debug;

/// JSON extractor that never rejects.
///
/// Unreadable or undecodable bodies produce `T::default()`, and no
/// `Content-Type` header is required. Existing clients rely on signup and
/// login accepting whatever they send.
#[derive(Debug, Clone, Copy, Default)]
pub struct LenientJson<T>(pub T);

impl<T> LenientJson<T> {
    /// Consume the extractor and return the inner value
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<S, T> FromRequest<S> for LenientJson<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let value = match Bytes::from_request(req, state).await {
            Ok(bytes) => decode_or_default(&bytes),
            Err(rejection) => {
                debug!(error = %rejection, "Failed to read request body, using empty value");
                T::default()
            }
        };

        Ok(Self(value))
    }
}

fn decode_or_default<T: DeserializeOwned + Default>(bytes: &[u8]) -> T {
    serde_json::from_slice(bytes).unwrap_or_else(|e| {
        debug!(error = %e, "Ignoring undecodable JSON body");
        T::default()
    })
}
