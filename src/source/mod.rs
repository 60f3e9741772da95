//! Remote catalog sources.
//!
//! A source answers one [`PageRequest`] at a time. It is the only asynchronous
//! boundary of the engine; merging the result into the page window is done
//! separately by [`crate::paging::accumulate`].
//!
//! - [`GraphqlSource`] - the `allPeople` connection of a SWAPI GraphQL endpoint
//! - [`FixtureSource`] - a local JSON file, selected with a `file://` endpoint

mod fixture;
mod graphql;

pub use fixture::FixtureSource;
pub use graphql::{ALL_CHARACTERS_QUERY, DEFAULT_ENDPOINT, GraphqlSource};

use std::future::Future;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::{Page, PageRequest};

/// Errors that can occur while fetching a page.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Network or transport failure
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Non-success HTTP status
    #[error("Source returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The query was rejected by the GraphQL server
    #[error("Query failed: {0}")]
    Query(String),

    /// Response body could not be decoded
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Fixture file could not be read
    #[error("Failed to read fixture {path}: {message}")]
    Fixture { path: PathBuf, message: String },

    /// The background task running the fetch died before answering
    #[error("Fetch task aborted: {0}")]
    Aborted(String),
}

/// A paginated source of characters.
///
/// `Ok(None)` means the source answered without a connection (an empty
/// fetch). Failures are returned as-is; sources never retry.
pub trait CharacterSource {
    fn fetch_page(
        &self,
        request: &PageRequest,
    ) -> impl Future<Output = Result<Option<Page>, SourceError>> + Send;

    /// Where pages come from (for display purposes).
    fn describe(&self) -> String;
}

/// A source chosen from an endpoint string.
#[derive(Debug)]
pub enum AnySource {
    Graphql(GraphqlSource),
    Fixture(FixtureSource),
}

impl AnySource {
    /// `file://` endpoints load a fixture, anything else is treated as a GraphQL URL.
    pub fn from_endpoint(endpoint: &str) -> Result<Self, SourceError> {
        match endpoint.strip_prefix("file://") {
            Some(path) => Ok(Self::Fixture(FixtureSource::open(path)?)),
            None => Ok(Self::Graphql(GraphqlSource::new(endpoint)?)),
        }
    }
}

impl CharacterSource for AnySource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Option<Page>, SourceError> {
        match self {
            Self::Graphql(source) => source.fetch_page(request).await,
            Self::Fixture(source) => source.fetch_page(request).await,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Graphql(source) => source.describe(),
            Self::Fixture(source) => source.describe(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_endpoint_http_is_graphql() {
        let source = AnySource::from_endpoint("http://localhost:4000/graphql").unwrap();
        assert!(matches!(source, AnySource::Graphql(_)));
    }

    #[test]
    fn test_from_endpoint_missing_fixture_is_error() {
        let err = AnySource::from_endpoint("file:///definitely/not/here.json").unwrap_err();
        assert!(matches!(err, SourceError::Fixture { .. }));
    }
}
