//! Command implementations for the Roster CLI.
//!
//! Each command drives an [`Overview`] and returns a result type that can be
//! rendered as JSON or as human-readable text via [`CommandResult`]. Commands
//! are generic over the storage backend and the character source so they can
//! be exercised without touching the network or the user's data directory.

use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::cli::FilterArgs;
use crate::config::{ResolvedConfig, RosterConfig};
use crate::favorites::FavoritesStore;
use crate::models::Character;
use crate::models::availability::display_value;
use crate::overview::Overview;
use crate::source::{AnySource, CharacterSource};
use crate::storage::{FileStore, KeyValueStore};
use crate::{Error, Result};

/// Command results that can be serialized to JSON or formatted for humans.
pub trait CommandResult {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

fn to_json_string<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }).to_string())
}

/// Overview and source wired from resolved configuration.
pub struct Session {
    pub overview: Overview<FileStore>,
    pub source: AnySource,
}

impl Session {
    pub fn open(config: &ResolvedConfig) -> Result<Self> {
        let overview = open_overview(config);
        let source = AnySource::from_endpoint(config.endpoint())?;
        tracing::debug!(source = %source.describe(), "session opened");
        Ok(Self { overview, source })
    }
}

/// Overview over the persisted favorites, for commands that never fetch.
pub fn open_overview(config: &ResolvedConfig) -> Overview<FileStore> {
    let store = FileStore::new(config.data_dir());
    Overview::with_default_facets(FavoritesStore::load(store), config.page_size())
}

/// A character as printed by the CLI.
#[derive(Debug, Serialize)]
pub struct CharacterEntry {
    #[serde(flatten)]
    pub character: Character,
    pub favorite: bool,
}

impl CharacterEntry {
    fn new(character: &Character, favorite: bool) -> Self {
        Self {
            character: character.clone(),
            favorite,
        }
    }

    fn summary_line(&self) -> String {
        let c = &self.character;
        format!(
            "  {} [{}] {}  {} | {} | {}",
            if self.favorite { "★" } else { " " },
            c.id,
            c.display_name(),
            display_value(c.gender.as_deref()),
            display_value(c.eye_color.as_deref()),
            display_value(c.species_name()),
        )
    }
}

// === list ===

#[derive(Debug, Serialize)]
pub struct ListResult {
    pub count: usize,
    pub loaded: usize,
    pub total_count: Option<u32>,
    pub has_next_page: bool,
    pub favorites_only: bool,
    pub characters: Vec<CharacterEntry>,
}

impl CommandResult for ListResult {
    fn to_json(&self) -> String {
        to_json_string(self)
    }

    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        if self.favorites_only {
            lines.push(format!("{} favorite character(s) match", self.count));
        } else {
            let total = self
                .total_count
                .map(|t| format!(" of {}", t))
                .unwrap_or_default();
            let more = if self.has_next_page {
                ", more available"
            } else {
                ""
            };
            lines.push(format!(
                "{} character(s) match ({} loaded{}{})",
                self.count, self.loaded, total, more
            ));
        }
        if self.characters.is_empty() {
            lines.push("  (none)".to_string());
        }
        lines.extend(self.characters.iter().map(CharacterEntry::summary_line));
        lines.join("\n")
    }
}

/// Apply CLI facet selections to the overview.
pub fn apply_filters<S: KeyValueStore>(overview: &mut Overview<S>, filters: &FilterArgs) -> Result<()> {
    for (key, values) in filters.selections() {
        overview.select(key, values.iter().cloned())?;
    }
    Ok(())
}

pub async fn list<S, C>(
    overview: &mut Overview<S>,
    source: &C,
    pages: Option<u32>,
    filters: &FilterArgs,
    favorites_only: bool,
) -> Result<ListResult>
where
    S: KeyValueStore,
    C: CharacterSource,
{
    overview.set_favorites_only(favorites_only);
    if !favorites_only {
        overview.load_pages(source, pages).await?;
    }
    apply_filters(overview, filters)?;

    let characters: Vec<CharacterEntry> = overview
        .filtered()
        .into_iter()
        .map(|c| CharacterEntry::new(c, overview.is_favorite(&c.id)))
        .collect();

    Ok(ListResult {
        count: characters.len(),
        loaded: overview.window().len(),
        total_count: overview.window().total_count(),
        has_next_page: overview.window().has_next_page(),
        favorites_only,
        characters,
    })
}

// === options ===

#[derive(Debug, Serialize)]
pub struct OptionsResult {
    pub facet: String,
    pub label: String,
    pub options: Vec<String>,
}

impl CommandResult for OptionsResult {
    fn to_json(&self) -> String {
        to_json_string(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![format!("{} ({} option(s)):", self.label, self.options.len())];
        lines.extend(self.options.iter().map(|o| format!("  {}", o)));
        lines.join("\n")
    }
}

pub async fn options<S, C>(
    overview: &mut Overview<S>,
    source: &C,
    facet: &str,
    pages: Option<u32>,
    favorites_only: bool,
) -> Result<OptionsResult>
where
    S: KeyValueStore,
    C: CharacterSource,
{
    // Reject unknown facets before any fetch is made.
    let label = overview.engine().facet(facet)?.label.to_string();

    overview.set_favorites_only(favorites_only);
    if !favorites_only {
        overview.load_pages(source, pages).await?;
    }

    Ok(OptionsResult {
        facet: facet.to_string(),
        label,
        options: overview.options(facet)?,
    })
}

// === show ===

#[derive(Debug, Serialize)]
pub struct ShowResult {
    #[serde(flatten)]
    pub entry: CharacterEntry,
}

impl CommandResult for ShowResult {
    fn to_json(&self) -> String {
        to_json_string(self)
    }

    fn to_human(&self) -> String {
        let c = &self.entry.character;
        let mut lines = vec![
            format!(
                "{}{} [{}]",
                c.display_name(),
                if self.entry.favorite { " ★" } else { "" },
                c.id
            ),
            format!("  Height:    {}", display_value(c.height)),
            format!("  Mass:      {}", display_value(c.mass)),
            format!("  Homeworld: {}", display_value(c.homeworld_name())),
            format!("  Species:   {}", display_value(c.species_name())),
            format!("  Gender:    {}", display_value(c.gender.as_deref())),
            format!("  Eye color: {}", display_value(c.eye_color.as_deref())),
        ];
        let films = c.film_titles();
        if films.is_empty() {
            lines.push("  Films:     -".to_string());
        } else {
            lines.push("  Films:".to_string());
            lines.extend(films.iter().map(|title| format!("    - {}", title)));
        }
        lines.join("\n")
    }
}

pub async fn show<S, C>(
    overview: &mut Overview<S>,
    source: &C,
    id: &str,
    pages: Option<u32>,
) -> Result<ShowResult>
where
    S: KeyValueStore,
    C: CharacterSource,
{
    if overview.find(id).is_none() {
        overview.load_pages(source, pages).await?;
    }
    let favorite = overview.is_favorite(id);
    let character = overview.inspect(id)?;
    Ok(ShowResult {
        entry: CharacterEntry::new(character, favorite),
    })
}

// === fav ===

#[derive(Debug, Serialize)]
pub struct FavListResult {
    pub count: usize,
    pub location: String,
    pub favorites: Vec<Character>,
}

impl CommandResult for FavListResult {
    fn to_json(&self) -> String {
        to_json_string(self)
    }

    fn to_human(&self) -> String {
        if self.favorites.is_empty() {
            return "No favorites.".to_string();
        }
        let mut lines = vec![format!("{} favorite(s):", self.count)];
        lines.extend(
            self.favorites
                .iter()
                .map(|c| CharacterEntry::new(c, true).summary_line()),
        );
        lines.join("\n")
    }
}

pub fn fav_list<S: KeyValueStore>(overview: &Overview<S>) -> FavListResult {
    let favorites = overview.favorites().as_slice().to_vec();
    FavListResult {
        count: favorites.len(),
        location: overview.favorites_location(),
        favorites,
    }
}

#[derive(Debug, Serialize)]
pub struct FavToggleResult {
    pub id: String,
    pub name: String,
    pub favorite: bool,
    pub count: usize,
}

impl CommandResult for FavToggleResult {
    fn to_json(&self) -> String {
        to_json_string(self)
    }

    fn to_human(&self) -> String {
        let action = if self.favorite {
            "Added"
        } else {
            "Removed"
        };
        let direction = if self.favorite { "to" } else { "from" };
        format!(
            "{} {} [{}] {} favorites ({} total)",
            action, self.name, self.id, direction, self.count
        )
    }
}

pub async fn fav_toggle<S, C>(
    overview: &mut Overview<S>,
    source: &C,
    id: &str,
    pages: Option<u32>,
) -> Result<FavToggleResult>
where
    S: KeyValueStore,
    C: CharacterSource,
{
    if overview.find(id).is_none() {
        overview.load_pages(source, pages).await?;
    }
    let name = overview
        .find(id)
        .map(|c| c.display_name().to_string())
        .ok_or_else(|| Error::NotFound(id.to_string()))?;
    let favorite = overview.toggle_favorite_by_id(id)?;
    tracing::info!(id, favorite, "favorite toggled");

    Ok(FavToggleResult {
        id: id.to_string(),
        name,
        favorite,
        count: overview.favorites().len(),
    })
}

#[derive(Debug, Serialize)]
pub struct FavClearResult {
    pub removed: usize,
}

impl CommandResult for FavClearResult {
    fn to_json(&self) -> String {
        to_json_string(self)
    }

    fn to_human(&self) -> String {
        format!("Removed {} favorite(s)", self.removed)
    }
}

pub fn fav_clear<S: KeyValueStore>(overview: &mut Overview<S>) -> Result<FavClearResult> {
    let removed = overview.favorites().len();
    overview.clear_favorites()?;
    Ok(FavClearResult { removed })
}

// === config / status ===

#[derive(Debug, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub commit: &'static str,
    pub built_at: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            commit: env!("ROSTER_GIT_COMMIT"),
            built_at: env!("ROSTER_BUILD_TIMESTAMP"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ConfigShowResult {
    #[serde(flatten)]
    pub config: ResolvedConfig,
    pub build: BuildInfo,
}

impl CommandResult for ConfigShowResult {
    fn to_json(&self) -> String {
        to_json_string(self)
    }

    fn to_human(&self) -> String {
        let c = &self.config;
        let mut lines = vec![
            format!("Config file: {}", c.config_path.display()),
            format!("  endpoint      = {} ({})", c.endpoint.value, c.endpoint.source),
            format!("  page-size     = {} ({})", c.page_size.value, c.page_size.source),
            format!("  data-dir      = {} ({})", c.data_dir.value.display(), c.data_dir.source),
            format!(
                "  output-format = {} ({})",
                c.output_format.value, c.output_format.source
            ),
        ];
        match &c.log_level {
            Some(level) => lines.push(format!("  log-level     = {} ({})", level.value, level.source)),
            None => lines.push("  log-level     = warn (default)".to_string()),
        }
        lines.push(format!(
            "  log-format    = {} ({})",
            c.log_format.value, c.log_format.source
        ));
        lines.push(format!(
            "roster {} ({}, built {})",
            self.build.version, self.build.commit, self.build.built_at
        ));
        lines.join("\n")
    }
}

pub fn config_show(config: &ResolvedConfig) -> ConfigShowResult {
    ConfigShowResult {
        config: config.clone(),
        build: BuildInfo::current(),
    }
}

#[derive(Debug, Serialize)]
pub struct ConfigSetResult {
    pub key: String,
    pub value: String,
    pub path: PathBuf,
}

impl CommandResult for ConfigSetResult {
    fn to_json(&self) -> String {
        to_json_string(self)
    }

    fn to_human(&self) -> String {
        format!("Set {} = {} in {}", self.key, self.value, self.path.display())
    }
}

/// Store one key in config.kdl, keeping the other keys already there.
pub fn config_set(path: &Path, key: &str, value: &str) -> Result<ConfigSetResult> {
    let update = RosterConfig::from_key_value(key, value)?;
    let mut config = RosterConfig::read(path)?;
    config.merge(&update);
    config.write(path)?;
    tracing::info!(key, value, path = %path.display(), "config updated");

    Ok(ConfigSetResult {
        key: key.to_string(),
        value: value.to_string(),
        path: path.to_path_buf(),
    })
}

/// Summary printed when no command is given.
#[derive(Debug, Serialize)]
pub struct StatusResult {
    pub version: &'static str,
    pub endpoint: String,
    pub page_size: NonZeroU32,
    pub favorites: usize,
    pub favorites_location: String,
}

impl CommandResult for StatusResult {
    fn to_json(&self) -> String {
        to_json_string(self)
    }

    fn to_human(&self) -> String {
        [
            format!("Roster {}", self.version),
            format!("  Source:    {}", self.endpoint),
            format!("  Page size: {}", self.page_size),
            format!(
                "  Favorites: {} (stored in {})",
                self.favorites, self.favorites_location
            ),
            String::new(),
            "Run `roster list -H` to browse characters or `roster tui` for the interactive view."
                .to_string(),
        ]
        .join("\n")
    }
}

pub fn status<S: KeyValueStore>(overview: &Overview<S>, endpoint: &str) -> StatusResult {
    StatusResult {
        version: env!("CARGO_PKG_VERSION"),
        endpoint: endpoint.to_string(),
        page_size: overview.page_size(),
        favorites: overview.favorites().len(),
        favorites_location: overview.favorites_location(),
    }
}
