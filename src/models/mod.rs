//! Data models for catalog entities.
//!
//! This module defines the core data structures:
//! - `Character` - One catalog record as returned by the remote source
//! - `NamedRef` - Name-only projection of a nested entity (homeworld, species)
//! - `FilmConnection` / `Film` - The films a character appears in
//! - `Page`, `Edge`, `PageInfo` - One page of the paginated `allPeople` connection
//! - `PageRequest` - Variables for fetching the next page

pub mod availability;

pub use availability::{Available, NOT_AVAILABLE, display_value, is_available};

use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// Name-only projection of a referenced entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(default)]
    pub name: Option<String>,
}

impl NamedRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

/// A film reference. Only the title is projected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Film {
    #[serde(default)]
    pub title: Option<String>,
}

/// Connection wrapper around the films list.
///
/// The remote schema allows both the list and its items to be null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilmConnection {
    #[serde(default)]
    pub films: Option<Vec<Option<Film>>>,
}

/// A character snapshot as received from the remote source.
///
/// Serialized in the remote's camelCase shape so persisted favorites hold
/// exactly what the source returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    /// Opaque, stable identity
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    /// Height in centimeters
    #[serde(default)]
    pub height: Option<u32>,

    /// Mass in kilograms
    #[serde(default)]
    pub mass: Option<f64>,

    #[serde(default)]
    pub gender: Option<String>,

    #[serde(default)]
    pub eye_color: Option<String>,

    #[serde(default)]
    pub homeworld: Option<NamedRef>,

    #[serde(default)]
    pub species: Option<NamedRef>,

    #[serde(default)]
    pub film_connection: Option<FilmConnection>,
}

impl Character {
    /// Create a character with the given identity and name and no other attributes.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            height: None,
            mass: None,
            gender: None,
            eye_color: None,
            homeworld: None,
            species: None,
            film_connection: None,
        }
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = Some(mass);
        self
    }

    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    pub fn with_eye_color(mut self, eye_color: impl Into<String>) -> Self {
        self.eye_color = Some(eye_color.into());
        self
    }

    pub fn with_homeworld(mut self, name: impl Into<String>) -> Self {
        self.homeworld = Some(NamedRef::new(name));
        self
    }

    pub fn with_species(mut self, name: impl Into<String>) -> Self {
        self.species = Some(NamedRef::new(name));
        self
    }

    pub fn with_films<I, T>(mut self, titles: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let films = titles
            .into_iter()
            .map(|title| {
                Some(Film {
                    title: Some(title.into()),
                })
            })
            .collect();
        self.film_connection = Some(FilmConnection { films: Some(films) });
        self
    }

    /// Display name, falling back to the identity.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    pub fn homeworld_name(&self) -> Option<&str> {
        self.homeworld.as_ref().and_then(|h| h.name.as_deref())
    }

    pub fn species_name(&self) -> Option<&str> {
        self.species.as_ref().and_then(|s| s.name.as_deref())
    }

    /// Titles of the films this character appears in, in source order.
    ///
    /// Null films and null titles are skipped; the result is never null.
    pub fn film_titles(&self) -> Vec<&str> {
        self.film_connection
            .as_ref()
            .and_then(|conn| conn.films.as_ref())
            .map(|films| {
                films
                    .iter()
                    .flatten()
                    .filter_map(|film| film.title.as_deref())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// One edge of the `allPeople` connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(default)]
    pub node: Option<Character>,
}

/// Continuation state reported with each page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub end_cursor: Option<String>,
    #[serde(default)]
    pub has_next_page: bool,
}

/// One fetched page of the `allPeople` connection.
///
/// `edges == None` marks a malformed page that the accumulator ignores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(default)]
    pub edges: Option<Vec<Option<Edge>>>,
    #[serde(default)]
    pub page_info: PageInfo,
    #[serde(default)]
    pub total_count: Option<u32>,
}

impl Page {
    /// Build a well-formed page from a list of characters.
    pub fn new(characters: Vec<Character>, end_cursor: Option<String>, has_next_page: bool) -> Self {
        let edges = characters
            .into_iter()
            .map(|node| Some(Edge { node: Some(node) }))
            .collect();
        Self {
            edges: Some(edges),
            page_info: PageInfo {
                end_cursor,
                has_next_page,
            },
            total_count: None,
        }
    }

    pub fn with_total_count(mut self, total_count: u32) -> Self {
        self.total_count = Some(total_count);
        self
    }

    /// A page whose entity sequence is missing.
    pub fn malformed() -> Self {
        Self {
            edges: None,
            page_info: PageInfo::default(),
            total_count: None,
        }
    }

    /// Characters carried by this page; edges with an absent node are skipped.
    ///
    /// Returns `None` when the page is malformed.
    pub fn into_characters(self) -> Option<Vec<Character>> {
        self.edges.map(|edges| {
            edges
                .into_iter()
                .flatten()
                .filter_map(|edge| edge.node)
                .collect()
        })
    }
}

/// Variables for fetching one page from the remote source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page size
    pub first: NonZeroU32,
    /// Continuation cursor; absent for the first page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}
