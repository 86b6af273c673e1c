//! UI state and the transitions between idle, loading, success and error.
//!
//! The binder never performs I/O. User actions go in through
//! [`Binder::handle`], which may return an [`Effect`] for the caller to run.
//! Its result comes back through [`Binder::complete`]. Every effect carries the
//! [`Ticket`] of the action that caused it, and only the latest ticket is
//! allowed to change state, so a slow response to an older search can never
//! overwrite a newer one.

use crate::{
    condition::ConditionCategory,
    error::{FetchError, GeolocationError},
    model::{Coordinates, LocationCandidate, LocationQuery, WeatherSnapshot},
};

pub const MSG_NO_LOCATION: &str = "Please select a location";
pub const MSG_GEOLOCATION_UNSUPPORTED: &str = "Geolocation is not supported on this device";
pub const MSG_POSITION_FAILED: &str = "Unable to retrieve your location";
pub const MSG_NOT_FOUND: &str = "Location not found";
pub const MSG_POSITION_WEATHER_FAILED: &str = "Unable to retrieve weather data for your location";
pub const MSG_SEARCH_FAILED: &str = "Unable to find location";

/// Identity of one user-triggered request. Later tickets compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The search text changed. Records the query, starts nothing.
    EnterText(String),
    SelectCandidate(LocationCandidate),
    UseCurrentLocation,
    /// Fetch weather for whatever query is currently held.
    Search,
}

/// Work the binder wants done outside of it.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    LocateDevice { ticket: Ticket },
    FetchWeather { ticket: Ticket, query: LocationQuery },
}

impl Effect {
    pub fn ticket(&self) -> Ticket {
        match self {
            Effect::LocateDevice { ticket } | Effect::FetchWeather { ticket, .. } => *ticket,
        }
    }
}

/// The outcome of an [`Effect`].
#[derive(Debug)]
pub enum Completion {
    Located { ticket: Ticket, result: Result<Coordinates, GeolocationError> },
    Fetched { ticket: Ticket, result: Result<WeatherSnapshot, FetchError> },
}

impl Completion {
    pub fn ticket(&self) -> Ticket {
        match self {
            Completion::Located { ticket, .. } | Completion::Fetched { ticket, .. } => *ticket,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Success(WeatherSnapshot),
    Error(String),
}

#[derive(Debug, Default)]
struct UiState {
    query: Option<LocationQuery>,
    phase: Phase,
}

/// Read-only projection of the UI state for rendering.
#[derive(Debug, Clone, Copy)]
pub struct UiView<'a> {
    pub query: Option<&'a LocationQuery>,
    pub phase: &'a Phase,
}

impl<'a> UiView<'a> {
    pub fn snapshot(&self) -> Option<&'a WeatherSnapshot> {
        match self.phase {
            Phase::Success(snap) => Some(snap),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&'a str> {
        match self.phase {
            Phase::Error(msg) => Some(msg.as_str()),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading)
    }

    /// Decorative category of the live snapshot; `Unknown` when there is none.
    pub fn category(&self) -> ConditionCategory {
        self.snapshot().map(ConditionCategory::of).unwrap_or_default()
    }
}

#[derive(Debug)]
pub struct Binder {
    state: UiState,
    geolocation_supported: bool,
    issued: u64,
    /// Query of the fetch the latest ticket is waiting on.
    in_flight: Option<LocationQuery>,
}

impl Binder {
    pub fn new(geolocation_supported: bool) -> Self {
        Self { state: UiState::default(), geolocation_supported, issued: 0, in_flight: None }
    }

    pub fn view(&self) -> UiView<'_> {
        UiView { query: self.state.query.as_ref(), phase: &self.state.phase }
    }

    /// The most recently issued ticket, if any action has started work yet.
    pub fn latest_ticket(&self) -> Option<Ticket> {
        (self.issued > 0).then_some(Ticket(self.issued))
    }

    pub fn handle(&mut self, action: Action) -> Option<Effect> {
        match action {
            Action::EnterText(text) => {
                self.state.query = LocationQuery::text(text);
                None
            }
            Action::SelectCandidate(candidate) => {
                let query = LocationQuery::from(&candidate);
                self.state.query = Some(query.clone());
                Some(self.start_fetch(query))
            }
            Action::UseCurrentLocation => {
                if !self.geolocation_supported {
                    self.fail_now(MSG_GEOLOCATION_UNSUPPORTED);
                    return None;
                }
                let ticket = self.issue();
                self.in_flight = None;
                self.state.phase = Phase::Loading;
                Some(Effect::LocateDevice { ticket })
            }
            Action::Search => match self.state.query.clone() {
                Some(query) => Some(self.start_fetch(query)),
                None => {
                    self.fail_now(MSG_NO_LOCATION);
                    None
                }
            },
        }
    }

    pub fn complete(&mut self, completion: Completion) -> Option<Effect> {
        let ticket = completion.ticket();
        if Some(ticket) != self.latest_ticket() {
            tracing::debug!(?ticket, latest = ?self.latest_ticket(), "dropping stale completion");
            return None;
        }

        match completion {
            Completion::Located { ticket, result: Ok(coordinates) } => {
                let query = LocationQuery::Coordinates(coordinates);
                self.state.query = Some(query.clone());
                self.in_flight = Some(query.clone());
                Some(Effect::FetchWeather { ticket, query })
            }
            Completion::Located { result: Err(err), .. } => {
                tracing::warn!(error = %err, "device position unavailable");
                self.state.phase = Phase::Error(MSG_POSITION_FAILED.to_string());
                None
            }
            Completion::Fetched { result: Ok(snapshot), .. } => {
                self.in_flight = None;
                self.state.phase = Phase::Success(snapshot);
                None
            }
            Completion::Fetched { result: Err(err), .. } => {
                tracing::warn!(error = %err, "weather lookup failed");
                let query = self.in_flight.take();
                self.state.phase = Phase::Error(failure_message(&err, query.as_ref()));
                None
            }
        }
    }

    fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    fn start_fetch(&mut self, query: LocationQuery) -> Effect {
        let ticket = self.issue();
        self.in_flight = Some(query.clone());
        self.state.phase = Phase::Loading;
        Effect::FetchWeather { ticket, query }
    }

    /// Input errors settle immediately and supersede anything still in flight.
    fn fail_now(&mut self, message: &str) {
        self.issue();
        self.in_flight = None;
        self.state.phase = Phase::Error(message.to_string());
    }
}

fn failure_message(err: &FetchError, query: Option<&LocationQuery>) -> String {
    if let FetchError::NotFound { .. } = err {
        return MSG_NOT_FOUND.to_string();
    }
    if let Some(message) = err.upstream_message() {
        return message.to_string();
    }
    match query {
        Some(q) if q.is_coordinates() => MSG_POSITION_WEATHER_FAILED.to_string(),
        _ => MSG_SEARCH_FAILED.to_string(),
    }
}
