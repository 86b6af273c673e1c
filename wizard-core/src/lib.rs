//! Core library for the `wizard` weather lookup.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeatherMap client behind the [`WeatherApi`] trait
//! - Location resolution (search suggestions, device position)
//! - Weather retrieval
//! - The UI state machine that sequences the two
//!
//! It is used by `wizard-cli`, but holds no terminal-specific code.

pub mod binder;
pub mod condition;
pub mod config;
pub mod dropdown;
pub mod error;
pub mod fetcher;
pub mod model;
pub mod position;
pub mod provider;
pub mod resolver;
pub mod runner;

#[cfg(test)]
mod testing;

pub use binder::{Action, Binder, Completion, Effect, Phase, Ticket, UiView};
pub use condition::ConditionCategory;
pub use config::{Config, HomePosition};
pub use dropdown::{Dropdown, DropdownEntry};
pub use error::{ApiError, FetchError, GeolocationError};
pub use fetcher::WeatherFetcher;
pub use model::{Condition, Coordinates, LocationCandidate, LocationQuery, WeatherSnapshot};
pub use position::{DeniedPosition, FixedPosition, PositionSource};
pub use provider::{WeatherApi, openweather::OpenWeatherClient};
pub use resolver::{LocationResolver, Suggestions};
pub use runner::EffectRunner;
