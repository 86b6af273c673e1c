use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, InquireError, Password, PasswordDisplayMode, Select, Text};

use wizard_core::{
    Action, Binder, Config, Dropdown, DropdownEntry, EffectRunner, HomePosition, config::API_KEY_ENV,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "wizard", version, about = "Weather Wizard: current weather for any place")]
pub struct Cli {
    /// Log requests and state changes to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeatherMap API key and an optional home position.
    Configure,

    /// List up to five places matching the given text.
    Suggest {
        /// Place name fragment, e.g. "Par".
        text: String,
    },

    /// Show current weather for a place, or for your current position.
    Show {
        /// Place name; the best match is used.
        location: Option<String>,

        /// Use the current position instead of a place name.
        #[arg(long, conflicts_with = "location")]
        here: bool,

        /// Latitude of the current position (implies --here).
        #[arg(long, requires = "lon", allow_negative_numbers = true, conflicts_with = "location")]
        lat: Option<f64>,

        /// Longitude of the current position (implies --here).
        #[arg(long, requires = "lat", allow_negative_numbers = true, conflicts_with = "location")]
        lon: Option<f64>,
    },

    /// Search interactively and pick from suggestions (default).
    Search,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Search) {
            Command::Configure => configure(),
            Command::Suggest { text } => suggest(&text).await,
            Command::Show { location, here, lat, lon } => {
                let mut config = Config::load()?;
                if let (Some(latitude), Some(longitude)) = (lat, lon) {
                    config.home = Some(HomePosition { latitude, longitude });
                }
                let use_position = here || lat.is_some();
                show(&config, location, use_position).await
            }
            Command::Search => search().await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load_file()?;

    let api_key = Password::new("OpenWeatherMap API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Get one at https://home.openweathermap.org/api_keys")
        .prompt()
        .context("API key prompt failed")?;
    config.set_api_key(api_key);

    let set_home = Confirm::new("Set a home position for \"current location\"?")
        .with_default(config.home.is_some())
        .prompt()
        .context("Home position prompt failed")?;

    config.home = if set_home {
        let latitude = CustomType::<f64>::new("Latitude:")
            .with_error_message("Please type a number, e.g. 48.85")
            .prompt()
            .context("Latitude prompt failed")?;
        let longitude = CustomType::<f64>::new("Longitude:")
            .with_error_message("Please type a number, e.g. 2.35")
            .prompt()
            .context("Longitude prompt failed")?;
        Some(HomePosition { latitude, longitude })
    } else {
        None
    };

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    if std::env::var_os(API_KEY_ENV).is_some() {
        println!("Note: {API_KEY_ENV} is set and overrides the stored key.");
    }
    Ok(())
}

async fn suggest(text: &str) -> anyhow::Result<()> {
    let config = Config::load()?;
    let runner = EffectRunner::from_config(&config)?;

    let mut suggestions = runner.resolver().suggest(text).await;

    if let Some(err) = suggestions.take_error() {
        return Err(err).context("Location lookup failed");
    }
    if suggestions.offer_current_position() {
        println!("Nothing to search for. Try `wizard show --here` for your current position.");
        return Ok(());
    }

    let mut any = false;
    for (i, candidate) in suggestions.enumerate() {
        any = true;
        println!(
            "{}. {}  ({:.4}, {:.4})",
            i + 1,
            candidate.display_name(),
            candidate.coordinates.latitude,
            candidate.coordinates.longitude
        );
    }
    if !any {
        println!("No results found");
    }
    Ok(())
}

async fn show(config: &Config, location: Option<String>, use_position: bool) -> anyhow::Result<()> {
    let runner = EffectRunner::from_config(config)?;
    let mut binder = runner.binder();

    let action = if use_position {
        Action::UseCurrentLocation
    } else {
        if let Some(text) = location {
            runner.dispatch(&mut binder, Action::EnterText(text)).await;
        }
        Action::Search
    };
    tracing::debug!(?action, "running lookup");
    runner.dispatch(&mut binder, action).await;

    finish(&binder)
}

/// Print the settled view; an error phase becomes the process error.
fn finish(binder: &Binder) -> anyhow::Result<()> {
    let view = binder.view();
    if let Some(message) = view.error() {
        bail!("{message}");
    }
    print!("{}", render::view(&view));
    Ok(())
}

async fn search() -> anyhow::Result<()> {
    let config = Config::load()?;
    let runner = EffectRunner::from_config(&config)?;
    let mut binder = runner.binder();
    let mut dropdown = Dropdown::new();

    println!("Type a place name, leave blank for your current location, Esc to quit.");

    loop {
        dropdown.focus();

        let term = match Text::new("Search for a location:").prompt_skippable() {
            Ok(Some(term)) => term,
            Ok(None) | Err(InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Search prompt failed"),
        };

        let suggestions = runner.resolver().suggest(&term).await;
        if let Some(err) = dropdown.show(&term, suggestions) {
            eprintln!("Could not look up \"{}\": {err}", term.trim());
            continue;
        }

        let entries = dropdown.entries();
        if entries == [DropdownEntry::NoResults] {
            println!("No results found");
            continue;
        }

        let picked = match Select::new("Pick a location:", entries).prompt_skippable() {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                dropdown.dismiss_outside();
                continue;
            }
            Err(InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Selection prompt failed"),
        };

        let Some(action) = dropdown.choose(&picked) else {
            continue;
        };
        runner.dispatch(&mut binder, action).await;

        print!("{}", render::view(&binder.view()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_interactive_search() {
        let cli = Cli::try_parse_from(["wizard"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn show_accepts_negative_coordinates() {
        let cli = Cli::try_parse_from(["wizard", "show", "--lat", "-33.87", "--lon", "151.21"]).unwrap();
        match cli.command {
            Some(Command::Show { lat, lon, location, .. }) => {
                assert_eq!(lat, Some(-33.87));
                assert_eq!(lon, Some(151.21));
                assert!(location.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn show_rejects_place_and_here_together() {
        assert!(Cli::try_parse_from(["wizard", "show", "Paris", "--here"]).is_err());
    }

    #[test]
    fn lat_requires_lon() {
        assert!(Cli::try_parse_from(["wizard", "show", "--lat", "1.0"]).is_err());
    }
}
