//! Classification of a single tile request.

use crate::provider::ProviderError;

/// Result of one tile request, before anything is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileFetch {
    /// 2xx with a non-empty body.
    Success(Vec<u8>),
    /// 404: the provider has no imagery here.
    NotFound,
    /// 403: the provider refused the request.
    Blocked,
    /// Anything else, with a description for the log.
    TransportError(String),
}

impl TileFetch {
    pub fn classify(result: Result<Vec<u8>, ProviderError>) -> Self {
        match result {
            Ok(body) if body.is_empty() => {
                TileFetch::TransportError("empty response body".to_string())
            }
            Ok(body) => TileFetch::Success(body),
            Err(e) => match e.status() {
                Some(404) => TileFetch::NotFound,
                Some(403) => TileFetch::Blocked,
                _ => TileFetch::TransportError(e.to_string()),
            },
        }
    }
}
