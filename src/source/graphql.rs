//! GraphQL client for the `allPeople` connection.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{CharacterSource, SourceError};
use crate::models::{Page, PageRequest};

/// Public SWAPI GraphQL endpoint
pub const DEFAULT_ENDPOINT: &str = "https://swapi-graphql.netlify.app/.netlify/functions/index";

/// User-Agent header sent with every request
const USER_AGENT: &str = concat!("roster/", env!("CARGO_PKG_VERSION"));

/// Upper bound for a single page fetch
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const ALL_CHARACTERS_QUERY: &str = r#"query AllCharacters($first: Int!, $after: String) {
  allPeople(first: $first, after: $after) {
    edges {
      node {
        id
        name
        height
        mass
        gender
        eyeColor
        homeworld {
          name
        }
        species {
          name
        }
        filmConnection {
          films {
            title
          }
        }
      }
    }
    pageInfo {
      endCursor
      hasNextPage
    }
    totalCount
  }
}"#;

#[derive(Debug, Serialize)]
struct GraphqlRequest<'a> {
    query: &'static str,
    #[serde(rename = "operationName")]
    operation_name: &'static str,
    variables: &'a PageRequest,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    data: Option<AllPeopleData>,
    #[serde(default)]
    errors: Option<Vec<GraphqlError>>,
}

#[derive(Debug, Deserialize)]
struct AllPeopleData {
    #[serde(default, rename = "allPeople")]
    all_people: Option<Page>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

/// Fetches pages from a GraphQL endpoint over HTTP.
#[derive(Debug, Clone)]
pub struct GraphqlSource {
    endpoint: String,
    client: reqwest::Client,
}

impl GraphqlSource {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SourceError::Http(e.to_string()))?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl CharacterSource for GraphqlSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Option<Page>, SourceError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            first = request.first.get(),
            after = ?request.after,
            "fetching page"
        );

        let body = GraphqlRequest {
            query: ALL_CHARACTERS_QUERY,
            operation_name: "AllCharacters",
            variables: request,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| SourceError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: GraphqlResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        if let Some(errors) = payload.errors.filter(|errors| !errors.is_empty()) {
            let message = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(SourceError::Query(message));
        }

        let page = payload.data.and_then(|data| data.all_people);
        tracing::debug!(
            fetched = page.as_ref().and_then(|p| p.edges.as_ref()).map(Vec::len),
            "page received"
        );
        Ok(page)
    }

    fn describe(&self) -> String {
        self.endpoint.clone()
    }
}
