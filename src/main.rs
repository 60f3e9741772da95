//! Roster CLI - browse, filter and favorite characters from a paginated catalog.

use std::process;

use clap::Parser;
use roster::cli::{Cli, Commands, ConfigCommands, FavCommands};
use roster::commands::{self, CommandResult, Session};
use roster::config::{ConfigOverrides, OutputFormat, ResolvedConfig, resolve_config};
use roster::telemetry::{self, TelemetryConfig};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut overrides = ConfigOverrides::new();
    if let Some(endpoint) = cli.endpoint.clone() {
        overrides = overrides.with_endpoint(endpoint);
    }
    if let Some(page_size) = cli.page_size {
        overrides = overrides.with_page_size(page_size);
    }
    if cli.human_readable {
        overrides = overrides.with_output_format(OutputFormat::Human);
    }

    let config = match resolve_config(&overrides) {
        Ok(config) => config,
        Err(e) => exit_with_error(&e, cli.human_readable),
    };
    let human = *config.output_format() == OutputFormat::Human;

    let result = run_command(cli.command, cli.verbose, &config, human).await;

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        exit_with_error(&e, human);
    }
}

fn exit_with_error(e: &roster::Error, human: bool) -> ! {
    if human {
        eprintln!("Error: {}", e);
    } else {
        eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
    }
    process::exit(1);
}

async fn run_command(
    command: Option<Commands>,
    verbose: u8,
    config: &ResolvedConfig,
    human: bool,
) -> Result<(), roster::Error> {
    #[cfg(feature = "tui")]
    if let Some(Commands::Tui) = command {
        let session = Session::open(config)?;
        let _guard = telemetry::init(
            TelemetryConfig::file(verbose, config.data_dir().join("logs"))
                .with_configured_level(config.log_level())
                .with_json(config.log_json()),
        );
        return roster::tui::run_tui(session).await;
    }

    let _guard = telemetry::init(
        TelemetryConfig::stderr(verbose)
            .with_configured_level(config.log_level())
            .with_json(config.log_json()),
    );

    match command {
        None => {
            let overview = commands::open_overview(config);
            output(&commands::status(&overview, config.endpoint()), human);
        }
        Some(Commands::List {
            pages,
            filters,
            favorites_only,
        }) => {
            let mut session = Session::open(config)?;
            let result = commands::list(
                &mut session.overview,
                &session.source,
                pages.limit(),
                &filters,
                favorites_only,
            )
            .await?;
            output(&result, human);
        }
        Some(Commands::Options {
            facet,
            pages,
            favorites_only,
        }) => {
            let mut session = Session::open(config)?;
            let result = commands::options(
                &mut session.overview,
                &session.source,
                &facet,
                pages.limit(),
                favorites_only,
            )
            .await?;
            output(&result, human);
        }
        Some(Commands::Show { id, pages }) => {
            let mut session = Session::open(config)?;
            let result =
                commands::show(&mut session.overview, &session.source, &id, pages.limit()).await?;
            output(&result, human);
        }
        Some(Commands::Fav { command }) => match command {
            FavCommands::List => {
                let overview = commands::open_overview(config);
                output(&commands::fav_list(&overview), human);
            }
            FavCommands::Toggle { id, pages } => {
                let mut session = Session::open(config)?;
                let result = commands::fav_toggle(
                    &mut session.overview,
                    &session.source,
                    &id,
                    pages.limit(),
                )
                .await?;
                output(&result, human);
            }
            FavCommands::Clear => {
                let mut overview = commands::open_overview(config);
                output(&commands::fav_clear(&mut overview)?, human);
            }
        },
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show => output(&commands::config_show(config), human),
            ConfigCommands::Set { key, value } => {
                output(&commands::config_set(&config.config_path, &key, &value)?, human)
            }
        },
        #[cfg(feature = "tui")]
        Some(Commands::Tui) => {}
    }

    Ok(())
}

fn output<T: CommandResult>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}
