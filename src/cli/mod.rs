//! CLI argument definitions for Roster.

use std::num::NonZeroU32;

use clap::{Args, Parser, Subcommand};

/// Roster - browse, filter and favorite characters from a paginated catalog.
///
/// Run `roster` with no command for a status summary, `roster list` to fetch
/// characters, or `roster tui` for the interactive browser.
#[derive(Parser, Debug)]
#[command(name = "roster")]
#[command(
    author,
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("ROSTER_GIT_COMMIT"), ")"),
    about = "Browse, filter and favorite characters from a paginated catalog",
    long_about = None
)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// GraphQL endpoint, or file:// path to a fixture.
    /// Can also be set via ROSTER_ENDPOINT or config.kdl.
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Characters requested per page (default: 16)
    #[arg(long, global = true)]
    pub page_size: Option<NonZeroU32>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch characters and print the filtered list
    List {
        #[command(flatten)]
        pages: PageArgs,

        #[command(flatten)]
        filters: FilterArgs,

        /// Filter the favorites instead of fetched pages (no fetch is made)
        #[arg(long)]
        favorites_only: bool,
    },

    /// Print the filter options available for one facet
    Options {
        /// Facet key (gender, eye-color, species, film)
        facet: String,

        #[command(flatten)]
        pages: PageArgs,

        /// Derive options from the favorites instead of fetched pages
        #[arg(long)]
        favorites_only: bool,
    },

    /// Show one character by ID (searches fetched pages, then favorites)
    Show {
        /// Character ID
        id: String,

        #[command(flatten)]
        pages: PageArgs,
    },

    /// Favorites management commands
    Fav {
        #[command(subcommand)]
        command: FavCommands,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Open the interactive terminal browser
    #[cfg(feature = "tui")]
    Tui,
}

/// How many pages to fetch before answering.
#[derive(Args, Debug, Clone, Default)]
pub struct PageArgs {
    /// Number of pages to fetch (default: 1)
    #[arg(long, conflicts_with = "all")]
    pub pages: Option<NonZeroU32>,

    /// Fetch every page
    #[arg(long)]
    pub all: bool,
}

impl PageArgs {
    /// Page limit for the loader; `None` means until exhausted.
    pub fn limit(&self) -> Option<u32> {
        if self.all {
            None
        } else {
            Some(self.pages.map_or(1, NonZeroU32::get))
        }
    }
}

/// Facet selections. Values within one facet are alternatives; facets combine.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Keep characters with this gender (repeatable)
    #[arg(long = "gender", value_name = "VALUE")]
    pub gender: Vec<String>,

    /// Keep characters with this eye color (repeatable)
    #[arg(long = "eye-color", value_name = "VALUE")]
    pub eye_color: Vec<String>,

    /// Keep characters of this species (repeatable)
    #[arg(long = "species", value_name = "VALUE")]
    pub species: Vec<String>,

    /// Keep characters appearing in this film (repeatable)
    #[arg(long = "film", value_name = "TITLE")]
    pub film: Vec<String>,
}

impl FilterArgs {
    /// `(facet key, values)` pairs with at least one value.
    pub fn selections(&self) -> Vec<(&'static str, &[String])> {
        [
            (crate::filter::GENDER, self.gender.as_slice()),
            (crate::filter::EYE_COLOR, self.eye_color.as_slice()),
            (crate::filter::SPECIES, self.species.as_slice()),
            (crate::filter::FILM, self.film.as_slice()),
        ]
        .into_iter()
        .filter(|(_, values)| !values.is_empty())
        .collect()
    }
}

/// Favorites subcommands
#[derive(Subcommand, Debug)]
pub enum FavCommands {
    /// List favorite characters
    List,

    /// Add or remove a character from the favorites
    Toggle {
        /// Character ID
        id: String,

        #[command(flatten)]
        pages: PageArgs,
    },

    /// Remove every favorite
    Clear,
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show resolved configuration values and where each came from
    Show,

    /// Store a value in config.kdl
    Set {
        /// Configuration key (endpoint, page-size, data-dir, output-format, log-level, log-format)
        key: String,
        /// Configuration value
        value: String,
    },
}
